use crate::Database;
use crate::models::{
    BookmarkRef, BookmarkRow, GroupRow, GroupSummaryRow, MemberDetailRow, MemberRow, ProfileRow,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use uuid::Uuid;

impl Database {
    // -- Profiles --

    /// Lazy provisioning: inserts the profile on first sight, no-op after.
    pub fn ensure_profile(
        &self,
        id: &str,
        display_name: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO profiles (id, display_name, avatar_url) VALUES (?1, ?2, ?3)",
                (id, display_name, avatar_url),
            )?;
            Ok(())
        })
    }

    pub fn get_profile(&self, id: &str) -> Result<Option<ProfileRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, display_name, avatar_url, created_at FROM profiles WHERE id = ?1",
            )?;
            let row = stmt
                .query_row([id], |row| {
                    Ok(ProfileRow {
                        id: row.get(0)?,
                        display_name: row.get(1)?,
                        avatar_url: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    pub fn update_profile(
        &self,
        id: &str,
        display_name: &str,
        avatar_url: Option<&str>,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE profiles SET display_name = ?2, avatar_url = ?3 WHERE id = ?1",
                (id, display_name, avatar_url),
            )?;
            Ok(changed > 0)
        })
    }

    pub fn set_avatar(&self, id: &str, avatar_url: Option<&str>) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE profiles SET avatar_url = ?2 WHERE id = ?1",
                (id, avatar_url),
            )?;
            Ok(changed > 0)
        })
    }

    // -- Bookmarks --

    pub fn insert_bookmark(
        &self,
        id: &str,
        user_id: &str,
        name: &str,
        surah_number: u16,
        verse_number: u16,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO bookmarks (id, user_id, name, surah_number, verse_number)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (id, user_id, name, surah_number, verse_number),
            )?;
            Ok(())
        })
    }

    pub fn bookmarks_for_user(&self, user_id: &str) -> Result<Vec<BookmarkRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, name, surah_number, verse_number, created_at, updated_at
                 FROM bookmarks WHERE user_id = ?1 ORDER BY updated_at DESC",
            )?;
            let rows = stmt
                .query_map([user_id], map_bookmark_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Ownership-scoped lookup: a bookmark is only visible to its owner.
    pub fn get_bookmark(&self, id: &str, user_id: &str) -> Result<Option<BookmarkRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, name, surah_number, verse_number, created_at, updated_at
                 FROM bookmarks WHERE id = ?1 AND user_id = ?2",
            )?;
            let row = stmt.query_row((id, user_id), map_bookmark_row).optional()?;
            Ok(row)
        })
    }

    pub fn rename_bookmark(&self, id: &str, user_id: &str, name: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE bookmarks SET name = ?3 WHERE id = ?1 AND user_id = ?2",
                (id, user_id, name),
            )?;
            Ok(changed > 0)
        })
    }

    /// Deletes a bookmark and clears any active-bookmark references to it
    /// in the same transaction.
    pub fn delete_bookmark(&self, id: &str, user_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "UPDATE group_members SET current_bookmark_id = NULL
                 WHERE current_bookmark_id = ?1 AND user_id = ?2",
                (id, user_id),
            )?;
            let deleted = tx.execute(
                "DELETE FROM bookmarks WHERE id = ?1 AND user_id = ?2",
                (id, user_id),
            )?;
            tx.commit()?;
            Ok(deleted > 0)
        })
    }

    /// Moves a bookmark and appends one reading log per group where it is
    /// the member's active bookmark, all in one transaction. The group list
    /// is filtered to non-deleted groups; zero progress appends nothing.
    /// Returns the group ids that received a log row.
    pub fn reposition_bookmark(
        &self,
        id: &str,
        user_id: &str,
        surah_number: u16,
        verse_number: u16,
        character_count: u64,
        period_start: &str,
        period_end: &str,
    ) -> Result<Vec<String>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let changed = tx.execute(
                "UPDATE bookmarks
                 SET surah_number = ?3, verse_number = ?4, updated_at = datetime('now')
                 WHERE id = ?1 AND user_id = ?2",
                (id, user_id, surah_number, verse_number),
            )?;
            if changed == 0 {
                return Err(anyhow!("Bookmark not found: {}", id));
            }

            let group_ids: Vec<String> = if character_count > 0 {
                let mut stmt = tx.prepare(
                    "SELECT gm.group_id FROM group_members gm
                     JOIN groups g ON g.id = gm.group_id
                     WHERE gm.user_id = ?1 AND gm.current_bookmark_id = ?2
                       AND g.deleted_at IS NULL",
                )?;
                let ids = stmt
                    .query_map((user_id, id), |row| row.get(0))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                ids
            } else {
                Vec::new()
            };

            for group_id in &group_ids {
                tx.execute(
                    "INSERT INTO reading_logs
                     (id, user_id, group_id, character_count, period_start, period_end)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    (
                        Uuid::new_v4().to_string(),
                        user_id,
                        group_id,
                        character_count as i64,
                        period_start,
                        period_end,
                    ),
                )?;
            }

            tx.commit()?;
            Ok(group_ids)
        })
    }

    // -- Reading logs --

    pub fn insert_reading_log(
        &self,
        id: &str,
        user_id: &str,
        group_id: Option<&str>,
        character_count: u64,
        period_start: &str,
        period_end: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO reading_logs
                 (id, user_id, group_id, character_count, period_start, period_end)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (
                    id,
                    user_id,
                    group_id,
                    character_count as i64,
                    period_start,
                    period_end,
                ),
            )?;
            Ok(())
        })
    }

    /// Per-user character sums for a group, highest first. The optional
    /// window is a pair of `datetime('now')`-format bounds, inclusive.
    /// Only users with at least one log row appear.
    pub fn sum_progress_by_user(
        &self,
        group_id: &str,
        window: Option<(&str, &str)>,
    ) -> Result<Vec<(String, u64)>> {
        self.with_conn(|conn| {
            let map = |row: &rusqlite::Row<'_>| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?.max(0) as u64))
            };
            let rows = match window {
                Some((start, end)) => {
                    let mut stmt = conn.prepare(
                        "SELECT user_id, SUM(character_count) FROM reading_logs
                         WHERE group_id = ?1 AND created_at >= ?2 AND created_at <= ?3
                         GROUP BY user_id
                         ORDER BY SUM(character_count) DESC",
                    )?;
                    stmt.query_map((group_id, start, end), map)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                }
                None => {
                    let mut stmt = conn.prepare(
                        "SELECT user_id, SUM(character_count) FROM reading_logs
                         WHERE group_id = ?1
                         GROUP BY user_id
                         ORDER BY SUM(character_count) DESC",
                    )?;
                    stmt.query_map([group_id], map)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                }
            };
            Ok(rows)
        })
    }

    // -- Groups --

    /// Creates the group and its admin membership in one transaction.
    pub fn create_group(
        &self,
        id: &str,
        name: &str,
        group_code: &str,
        created_by: &str,
        member_id: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO groups (id, name, group_code, created_by) VALUES (?1, ?2, ?3, ?4)",
                (id, name, group_code, created_by),
            )?;
            tx.execute(
                "INSERT INTO group_members (id, group_id, user_id, role) VALUES (?1, ?2, ?3, 'admin')",
                (member_id, id, created_by),
            )?;
            tx.commit()?;
            Ok(())
        })
    }

    pub fn get_group(&self, id: &str) -> Result<Option<GroupRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, group_code, created_by, created_at, deleted_at
                 FROM groups WHERE id = ?1 AND deleted_at IS NULL",
            )?;
            let row = stmt.query_row([id], map_group_row).optional()?;
            Ok(row)
        })
    }

    pub fn find_group_by_code(&self, group_code: &str) -> Result<Option<GroupRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, group_code, created_by, created_at, deleted_at
                 FROM groups WHERE group_code = ?1 AND deleted_at IS NULL",
            )?;
            let row = stmt.query_row([group_code], map_group_row).optional()?;
            Ok(row)
        })
    }

    /// Checked against ALL rows: deleted groups keep their codes and the
    /// column is UNIQUE across them.
    pub fn group_code_exists(&self, group_code: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM groups WHERE group_code = ?1",
                    [group_code],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn groups_for_user(&self, user_id: &str) -> Result<Vec<GroupSummaryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT g.id, g.name, g.group_code, gm.role,
                        (SELECT COUNT(*) FROM group_members m2 WHERE m2.group_id = g.id)
                 FROM group_members gm
                 JOIN groups g ON g.id = gm.group_id
                 WHERE gm.user_id = ?1 AND g.deleted_at IS NULL
                 ORDER BY g.created_at DESC",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(GroupSummaryRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        group_code: row.get(2)?,
                        role: row.get(3)?,
                        member_count: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn soft_delete_group(&self, id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE groups SET deleted_at = datetime('now')
                 WHERE id = ?1 AND deleted_at IS NULL",
                [id],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Membership --

    pub fn get_member(&self, group_id: &str, user_id: &str) -> Result<Option<MemberRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, group_id, user_id, role, current_bookmark_id, created_at
                 FROM group_members WHERE group_id = ?1 AND user_id = ?2",
            )?;
            let row = stmt
                .query_row((group_id, user_id), |row| {
                    Ok(MemberRow {
                        id: row.get(0)?,
                        group_id: row.get(1)?,
                        user_id: row.get(2)?,
                        role: row.get(3)?,
                        current_bookmark_id: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    /// The (group_id, user_id) UNIQUE constraint turns a duplicate-join
    /// race into a rejected insert; that case surfaces as `Ok(false)`.
    pub fn insert_member(
        &self,
        id: &str,
        group_id: &str,
        user_id: &str,
        role: &str,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO group_members (id, group_id, user_id, role) VALUES (?1, ?2, ?3, ?4)",
                (id, group_id, user_id, role),
            );
            match inserted {
                Ok(_) => Ok(true),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Ok(false)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn delete_member(&self, group_id: &str, user_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute(
                "DELETE FROM group_members WHERE group_id = ?1 AND user_id = ?2",
                (group_id, user_id),
            )?;
            Ok(deleted > 0)
        })
    }

    pub fn set_active_bookmark(
        &self,
        group_id: &str,
        user_id: &str,
        bookmark_id: &str,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE group_members SET current_bookmark_id = ?3
                 WHERE group_id = ?1 AND user_id = ?2",
                (group_id, user_id, bookmark_id),
            )?;
            Ok(changed > 0)
        })
    }

    /// Members of a group with their profile and active bookmark joined in
    /// a single query (eliminates N+1).
    pub fn group_members_detailed(&self, group_id: &str) -> Result<Vec<MemberDetailRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT gm.user_id, gm.role, p.display_name, p.avatar_url,
                        b.id, b.name, b.surah_number, b.verse_number
                 FROM group_members gm
                 LEFT JOIN profiles p ON p.id = gm.user_id
                 LEFT JOIN bookmarks b ON b.id = gm.current_bookmark_id
                 WHERE gm.group_id = ?1",
            )?;
            let rows = stmt
                .query_map([group_id], |row| {
                    let bookmark = match row.get::<_, Option<String>>(4)? {
                        Some(id) => Some(BookmarkRef {
                            id,
                            name: row.get(5)?,
                            surah_number: row.get(6)?,
                            verse_number: row.get(7)?,
                        }),
                        None => None,
                    };
                    Ok(MemberDetailRow {
                        user_id: row.get(0)?,
                        role: row.get(1)?,
                        display_name: row.get(2)?,
                        avatar_url: row.get(3)?,
                        bookmark,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn map_bookmark_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BookmarkRow> {
    Ok(BookmarkRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        surah_number: row.get(3)?,
        verse_number: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn map_group_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<GroupRow> {
    Ok(GroupRow {
        id: row.get(0)?,
        name: row.get(1)?,
        group_code: row.get(2)?,
        created_by: row.get(3)?,
        created_at: row.get(4)?,
        deleted_at: row.get(5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    fn db_with_users(users: &[&str]) -> Database {
        let db = Database::open_in_memory().unwrap();
        for user in users {
            db.ensure_profile(user, Some(user), None).unwrap();
        }
        db
    }

    fn log_count(db: &Database, group_id: &str) -> i64 {
        db.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM reading_logs WHERE group_id = ?1",
                [group_id],
                |row| row.get(0),
            )?)
        })
        .unwrap()
    }

    #[test]
    fn ensure_profile_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.ensure_profile("u1", Some("Aisha"), None).unwrap();
        db.ensure_profile("u1", Some("Someone Else"), Some("http://x/a.png"))
            .unwrap();

        let profile = db.get_profile("u1").unwrap().unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Aisha"));
        assert_eq!(profile.avatar_url, None);
    }

    #[test]
    fn bookmark_access_is_ownership_scoped() {
        let db = db_with_users(&["u1", "u2"]);
        db.insert_bookmark("b1", "u1", "Daily wird", 2, 5).unwrap();

        assert!(db.get_bookmark("b1", "u2").unwrap().is_none());
        assert!(!db.rename_bookmark("b1", "u2", "stolen").unwrap());
        assert!(!db.delete_bookmark("b1", "u2").unwrap());

        assert!(db.rename_bookmark("b1", "u1", "Morning wird").unwrap());
        let row = db.get_bookmark("b1", "u1").unwrap().unwrap();
        assert_eq!(row.name, "Morning wird");
        assert_eq!((row.surah_number, row.verse_number), (2, 5));

        assert!(db.delete_bookmark("b1", "u1").unwrap());
        assert!(db.get_bookmark("b1", "u1").unwrap().is_none());
    }

    #[test]
    fn bookmarks_listed_newest_updated_first() {
        let db = db_with_users(&["u1"]);
        db.insert_bookmark("b1", "u1", "one", 1, 1).unwrap();
        db.insert_bookmark("b2", "u1", "two", 2, 1).unwrap();
        db.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE bookmarks SET updated_at = '2020-01-01 00:00:00' WHERE id = 'b1'",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let rows = db.bookmarks_for_user("u1").unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b2", "b1"]);
    }

    #[test]
    fn create_group_makes_creator_admin() {
        let db = db_with_users(&["u1"]);
        db.create_group("g1", "Tadarus", "AB12C", "u1", "m1").unwrap();

        let member = db.get_member("g1", "u1").unwrap().unwrap();
        assert_eq!(member.role, "admin");

        let groups = db.groups_for_user("u1").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group_code, "AB12C");
        assert_eq!(groups[0].member_count, 1);
    }

    #[test]
    fn duplicate_membership_is_rejected() {
        let db = db_with_users(&["u1", "u2"]);
        db.create_group("g1", "Tadarus", "AB12C", "u1", "m1").unwrap();

        assert!(db.insert_member("m2", "g1", "u2", "member").unwrap());
        assert!(!db.insert_member("m3", "g1", "u2", "member").unwrap());
    }

    #[test]
    fn soft_deleted_groups_are_hidden_from_reads() {
        let db = db_with_users(&["u1"]);
        db.create_group("g1", "Tadarus", "AB12C", "u1", "m1").unwrap();
        assert!(db.soft_delete_group("g1").unwrap());

        assert!(db.get_group("g1").unwrap().is_none());
        assert!(db.find_group_by_code("AB12C").unwrap().is_none());
        assert!(db.groups_for_user("u1").unwrap().is_empty());
        // Codes stay reserved: the UNIQUE column spans deleted rows.
        assert!(db.group_code_exists("AB12C").unwrap());

        // Second delete is a no-op.
        assert!(!db.soft_delete_group("g1").unwrap());
    }

    #[test]
    fn reposition_logs_only_groups_with_this_bookmark_active() {
        let db = db_with_users(&["u1"]);
        db.insert_bookmark("b1", "u1", "wird", 2, 5).unwrap();
        db.insert_bookmark("b2", "u1", "other", 10, 1).unwrap();
        db.create_group("g1", "A", "AAAAA", "u1", "m1").unwrap();
        db.create_group("g2", "B", "BBBBB", "u1", "m2").unwrap();
        db.create_group("g3", "C", "CCCCC", "u1", "m3").unwrap();
        db.set_active_bookmark("g1", "u1", "b1").unwrap();
        db.set_active_bookmark("g2", "u1", "b2").unwrap();

        let logged = db
            .reposition_bookmark(
                "b1",
                "u1",
                2,
                20,
                120,
                "2026-08-03 00:00:00",
                "2026-08-09 23:59:59",
            )
            .unwrap();
        assert_eq!(logged, vec!["g1".to_string()]);
        assert_eq!(log_count(&db, "g1"), 1);
        assert_eq!(log_count(&db, "g2"), 0);
        assert_eq!(log_count(&db, "g3"), 0);

        let row = db.get_bookmark("b1", "u1").unwrap().unwrap();
        assert_eq!((row.surah_number, row.verse_number), (2, 20));
    }

    #[test]
    fn reposition_with_zero_progress_appends_nothing() {
        let db = db_with_users(&["u1"]);
        db.insert_bookmark("b1", "u1", "wird", 2, 20).unwrap();
        db.create_group("g1", "A", "AAAAA", "u1", "m1").unwrap();
        db.set_active_bookmark("g1", "u1", "b1").unwrap();

        let logged = db
            .reposition_bookmark("b1", "u1", 2, 10, 0, "2026-08-03 00:00:00", "2026-08-09 23:59:59")
            .unwrap();
        assert!(logged.is_empty());
        assert_eq!(log_count(&db, "g1"), 0);

        // Backward move still lands.
        let row = db.get_bookmark("b1", "u1").unwrap().unwrap();
        assert_eq!((row.surah_number, row.verse_number), (2, 10));
    }

    #[test]
    fn reposition_skips_soft_deleted_groups() {
        let db = db_with_users(&["u1"]);
        db.insert_bookmark("b1", "u1", "wird", 2, 5).unwrap();
        db.create_group("g1", "A", "AAAAA", "u1", "m1").unwrap();
        db.set_active_bookmark("g1", "u1", "b1").unwrap();
        db.soft_delete_group("g1").unwrap();

        let logged = db
            .reposition_bookmark("b1", "u1", 2, 20, 120, "2026-08-03 00:00:00", "2026-08-09 23:59:59")
            .unwrap();
        assert!(logged.is_empty());
        assert_eq!(log_count(&db, "g1"), 0);
    }

    #[test]
    fn delete_bookmark_clears_active_references() {
        let db = db_with_users(&["u1"]);
        db.insert_bookmark("b1", "u1", "wird", 2, 5).unwrap();
        db.create_group("g1", "A", "AAAAA", "u1", "m1").unwrap();
        db.set_active_bookmark("g1", "u1", "b1").unwrap();

        assert!(db.delete_bookmark("b1", "u1").unwrap());
        let member = db.get_member("g1", "u1").unwrap().unwrap();
        assert_eq!(member.current_bookmark_id, None);
    }

    #[test]
    fn progress_sums_accumulate_and_sort_descending() {
        let db = db_with_users(&["a", "b"]);
        db.create_group("g1", "A", "AAAAA", "a", "m1").unwrap();
        db.insert_member("m2", "g1", "b", "member").unwrap();

        db.insert_reading_log("l1", "a", Some("g1"), 50, "s", "e").unwrap();
        db.insert_reading_log("l2", "b", Some("g1"), 80, "s", "e").unwrap();
        db.insert_reading_log("l3", "a", Some("g1"), 10, "s", "e").unwrap();

        let sums = db.sum_progress_by_user("g1", None).unwrap();
        assert_eq!(
            sums,
            vec![("b".to_string(), 80), ("a".to_string(), 60)]
        );
    }

    #[test]
    fn progress_window_filters_by_created_at() {
        let db = db_with_users(&["a"]);
        db.create_group("g1", "A", "AAAAA", "a", "m1").unwrap();

        db.with_conn_mut(|conn| {
            conn.execute_batch(
                "INSERT INTO reading_logs (id, user_id, group_id, character_count, created_at)
                     VALUES ('l1', 'a', 'g1', 100, '2026-08-04 10:00:00');
                 INSERT INTO reading_logs (id, user_id, group_id, character_count, created_at)
                     VALUES ('l2', 'a', 'g1', 999, '2026-07-01 10:00:00');",
            )?;
            Ok(())
        })
        .unwrap();

        let windowed = db
            .sum_progress_by_user("g1", Some(("2026-08-03 00:00:00", "2026-08-09 23:59:59")))
            .unwrap();
        assert_eq!(windowed, vec![("a".to_string(), 100)]);

        let all = db.sum_progress_by_user("g1", None).unwrap();
        assert_eq!(all, vec![("a".to_string(), 1099)]);
    }
}
