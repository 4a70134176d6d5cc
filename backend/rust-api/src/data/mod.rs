//! Static reference content compiled into the binary.

pub mod blog;
pub mod fallback_questions;
pub mod units;
