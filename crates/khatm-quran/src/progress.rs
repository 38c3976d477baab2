use khatm_types::models::Position;

/// Count Arabic-alphabet code points only: U+0621 through U+064A inclusive.
/// Tashkeel (U+064B..) and Quranic annotation marks fall outside the range,
/// as do the extended letter forms above U+064A.
pub fn count_arabic_letters(text: &str) -> u64 {
    text.chars()
        .filter(|c| ('\u{0621}'..='\u{064A}').contains(c))
        .count() as u64
}

/// An inclusive verse range within one surah. `to` of `None` means "to the
/// end of the surah".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseSpan {
    pub surah: u16,
    pub from: u16,
    pub to: Option<u16>,
}

/// Decompose a move between two positions into per-surah verse spans to
/// sum. A non-forward move decomposes to nothing — backward movement is
/// free and lossless, and costs no network calls.
pub fn spans_between(old: Position, new: Position) -> Vec<VerseSpan> {
    if new <= old {
        return Vec::new();
    }

    if old.surah == new.surah {
        return vec![VerseSpan {
            surah: old.surah,
            from: old.verse + 1,
            to: Some(new.verse),
        }];
    }

    let mut spans = vec![VerseSpan {
        surah: old.surah,
        from: old.verse + 1,
        to: None,
    }];
    for surah in old.surah + 1..new.surah {
        spans.push(VerseSpan {
            surah,
            from: 1,
            to: None,
        });
    }
    spans.push(VerseSpan {
        surah: new.surah,
        from: 1,
        to: Some(new.verse),
    });
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_letters_and_skips_diacritics() {
        // Bare letters
        assert_eq!(count_arabic_letters("محمد"), 4);
        // With tashkeel: only the base letters count
        assert_eq!(count_arabic_letters("مَن"), 2);
        assert_eq!(count_arabic_letters("بِسْمِ"), 3);
        // Alef wasla (U+0671) is outside the counted range
        assert_eq!(count_arabic_letters("ٱلرَّحِيمِ"), 5);
    }

    #[test]
    fn ignores_non_arabic_text() {
        assert_eq!(count_arabic_letters(""), 0);
        assert_eq!(count_arabic_letters("abc 123 !?"), 0);
        assert_eq!(count_arabic_letters("abc من 123"), 2);
    }

    #[test]
    fn backward_or_equal_moves_produce_no_spans() {
        let at = Position::new(2, 5);
        assert!(spans_between(at, at).is_empty());
        assert!(spans_between(at, Position::new(2, 4)).is_empty());
        assert!(spans_between(at, Position::new(1, 100)).is_empty());
    }

    #[test]
    fn same_surah_move_is_one_span() {
        let spans = spans_between(Position::new(2, 5), Position::new(2, 20));
        assert_eq!(
            spans,
            vec![VerseSpan {
                surah: 2,
                from: 6,
                to: Some(20)
            }]
        );
    }

    #[test]
    fn cross_surah_move_covers_tail_middles_and_head() {
        let spans = spans_between(Position::new(2, 5), Position::new(5, 10));
        assert_eq!(
            spans,
            vec![
                VerseSpan { surah: 2, from: 6, to: None },
                VerseSpan { surah: 3, from: 1, to: None },
                VerseSpan { surah: 4, from: 1, to: None },
                VerseSpan { surah: 5, from: 1, to: Some(10) },
            ]
        );
    }

    #[test]
    fn adjacent_surah_move_has_no_middles() {
        let spans = spans_between(Position::new(113, 3), Position::new(114, 2));
        assert_eq!(
            spans,
            vec![
                VerseSpan { surah: 113, from: 4, to: None },
                VerseSpan { surah: 114, from: 1, to: Some(2) },
            ]
        );
    }
}
