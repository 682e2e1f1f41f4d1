//! Diff previews of section merges.
//!
//! Dry runs log what a section merge would change as a unified diff, one log
//! line per diff line.

/// Unified diff generation for section text
pub mod unified;

pub use unified::{SectionDiff, section_diff};
