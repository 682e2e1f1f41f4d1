use similar::{ChangeTag, TextDiff};
use tracing::{Level, debug, span};

/// Number of unchanged lines shown around each change
const CONTEXT_LINES: usize = 2;

/// Unified diff of one section, ready to be logged line by line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionDiff {
    /// Hunk headers and `+`/`-`/` ` prefixed lines, without terminators
    pub lines: Vec<String>,
    /// Lines only present in the new text
    pub inserted: usize,
    /// Lines only present in the old text
    pub deleted: usize,
}

impl SectionDiff {
    /// True when both texts are the same
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.deleted == 0
    }
}

/// Diff `old` (the section currently in the target) against `new`.
///
/// `label` names the section in the `---`/`+++` headers.
#[must_use]
pub fn section_diff(old: &str, new: &str, label: &str) -> SectionDiff {
    let span = span!(Level::DEBUG, "section_diff", section = label);
    let _guard = span.enter();

    let diff = TextDiff::from_lines(old, new);
    let mut result = SectionDiff::default();

    for hunk in diff
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .iter_hunks()
    {
        if result.lines.is_empty() {
            result.lines.push(format!("--- {label} (current)"));
            result.lines.push(format!("+++ {label} (incoming)"));
        }
        result.lines.push(hunk.header().to_string());

        for change in hunk.iter_changes() {
            let prefix = match change.tag() {
                ChangeTag::Delete => {
                    result.deleted += 1;
                    '-'
                }
                ChangeTag::Insert => {
                    result.inserted += 1;
                    '+'
                }
                ChangeTag::Equal => ' ',
            };
            let text = change.to_string_lossy();
            result
                .lines
                .push(format!("{prefix}{}", text.trim_end_matches(['\r', '\n'])));
        }
    }

    debug!(
        inserted = result.inserted,
        deleted = result.deleted,
        "Section diff complete"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_sections_produce_no_lines() {
        let diff = section_diff("[Recent]\na.rpp\n", "[Recent]\na.rpp\n", "[Recent]");
        assert!(diff.is_empty());
        assert!(diff.lines.is_empty());
    }

    #[test]
    fn test_changed_lines_are_prefixed() {
        let diff = section_diff(
            "[Recent]\na.rpp\n",
            "[Recent]\nb.rpp\nc.rpp\n",
            "[Recent]",
        );

        assert_eq!(diff.deleted, 1);
        assert_eq!(diff.inserted, 2);
        assert_eq!(diff.lines[0], "--- [Recent] (current)");
        assert!(diff.lines.contains(&"-a.rpp".to_string()));
        assert!(diff.lines.contains(&"+b.rpp".to_string()));
        assert!(diff.lines.contains(&"+c.rpp".to_string()));
        assert!(diff.lines.contains(&" [Recent]".to_string()));
    }

    #[test]
    fn test_absent_section_is_all_inserts() {
        let diff = section_diff("", "[RecentFX]\nfx=1\n", "[RecentFX]");
        assert_eq!(diff.inserted, 2);
        assert_eq!(diff.deleted, 0);
    }
}
