pub mod client;
pub mod progress;

pub use client::{QuranClient, QuranError, Verse};
pub use progress::count_arabic_letters;
