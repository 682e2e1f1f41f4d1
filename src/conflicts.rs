//! Per-file conflict detection and resolution policy
//!
//! Given every copy of one logical file, decide what the pass should do with
//! it. Copies are compared on `(size, modified)` only; creation time and
//! content are never consulted.

use crate::config::Location;
use crate::scanner::FileCopy;
use std::fmt;

/// How a logical file with diverging copies is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// The newest copy replaces every differing copy without confirmation
    Automatic,
    /// The operator picks the authoritative copy
    Interactive,
    /// Only configured sections of the newest copy are merged into the others
    SectionMerge,
}

/// What the pass should do with one logical file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncDecision {
    /// Every copy already agrees and every location has one
    NoAction,
    /// Copy `source` into locations that lack the file
    Propagate {
        /// Copy to replicate
        source: FileCopy,
        /// Locations without the file
        missing: Vec<Location>,
    },
    /// Overwrite `targets` (and fill `missing`) with the newest copy
    AutoReplace {
        /// Newest copy
        source: FileCopy,
        /// Copies differing from `source`
        targets: Vec<FileCopy>,
        /// Locations without the file
        missing: Vec<Location>,
    },
    /// Ask which of `copies` (newest first) should win
    NeedsChoice {
        /// Every copy, newest first
        copies: Vec<FileCopy>,
        /// Locations without the file
        missing: Vec<Location>,
    },
    /// Merge configured sections of `source` into each of `targets`
    MergeSections {
        /// Newest copy
        source: FileCopy,
        /// Copies differing from `source`
        targets: Vec<FileCopy>,
        /// Locations without the file
        missing: Vec<Location>,
    },
}

impl SyncDecision {
    /// Whether executing this decision can change anything on disk
    #[must_use]
    pub const fn is_action(&self) -> bool {
        !matches!(self, Self::NoAction)
    }

    /// Short label for status output
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NoAction => "in sync",
            Self::Propagate { .. } => "new file",
            Self::AutoReplace { .. } => "auto update",
            Self::NeedsChoice { .. } => "needs choice",
            Self::MergeSections { .. } => "section merge",
        }
    }
}

impl fmt::Display for SyncDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAction => write!(f, "{}", self.label()),
            Self::Propagate { source, missing } => write!(
                f,
                "{}: copy from '{}' to {}",
                self.label(),
                source.location.name,
                location_names(missing)
            ),
            Self::AutoReplace { source, targets, .. } | Self::MergeSections { source, targets, .. } => {
                write!(
                    f,
                    "{}: newest in '{}', {} older cop{}",
                    self.label(),
                    source.location.name,
                    targets.len(),
                    if targets.len() == 1 { "y" } else { "ies" }
                )
            }
            Self::NeedsChoice { copies, .. } => {
                write!(f, "{}: {} differing copies", self.label(), copies.len())
            }
        }
    }
}

fn location_names(locations: &[Location]) -> String {
    locations
        .iter()
        .map(|l| format!("'{}'", l.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Classify the copies of one logical file.
///
/// - Fewer than two copies: propagate the single copy wherever it is missing.
/// - All copies share `(size, modified)`: nothing to do beyond filling
///   locations that lack the file.
/// - Otherwise the copies are ordered newest first (stable, so equal
///   timestamps keep their location order) and `mode` decides the action.
#[must_use]
pub fn classify(copies: &[FileCopy], locations: &[Location], mode: ResolveMode) -> SyncDecision {
    let missing = missing_locations(copies, locations);

    let Some(first) = copies.first() else {
        return SyncDecision::NoAction;
    };

    let all_agree = copies
        .iter()
        .all(|c| c.properties.same_content_as(&first.properties));

    if copies.len() < 2 || all_agree {
        return if missing.is_empty() {
            SyncDecision::NoAction
        } else {
            SyncDecision::Propagate {
                source: first.clone(),
                missing,
            }
        };
    }

    let ordered = newest_first(copies);
    let source = ordered[0].clone();

    match mode {
        ResolveMode::Automatic => SyncDecision::AutoReplace {
            targets: differing_from(&source, &ordered),
            source,
            missing,
        },
        ResolveMode::Interactive => SyncDecision::NeedsChoice {
            copies: ordered,
            missing,
        },
        ResolveMode::SectionMerge => SyncDecision::MergeSections {
            targets: differing_from(&source, &ordered),
            source,
            missing,
        },
    }
}

/// Copies ordered by modification time, newest first. Ties keep input order.
#[must_use]
pub fn newest_first(copies: &[FileCopy]) -> Vec<FileCopy> {
    let mut ordered = copies.to_vec();
    ordered.sort_by(|a, b| b.properties.modified.cmp(&a.properties.modified));
    ordered
}

/// Every copy other than `source` whose `(size, modified)` differs from it
#[must_use]
pub fn differing_from(source: &FileCopy, copies: &[FileCopy]) -> Vec<FileCopy> {
    copies
        .iter()
        .filter(|c| c.path != source.path && !c.properties.same_content_as(&source.properties))
        .cloned()
        .collect()
}

/// Locations, in configured order, holding no copy
#[must_use]
pub fn missing_locations(copies: &[FileCopy], locations: &[Location]) -> Vec<Location> {
    locations
        .iter()
        .filter(|l| !copies.iter().any(|c| c.location.name == l.name))
        .cloned()
        .collect()
}
