//! Story Wall text filters
//!
//! Everything a submission passes through before it reaches the store:
//! markup stripping with a length cap, and the word-list profanity check
//! that decides whether a story is auto-flagged.

pub mod profanity;
pub mod sanitize;

pub use profanity::ProfanityFilter;
pub use sanitize::{MAX_INPUT_CHARS, clean_input};
