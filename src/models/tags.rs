//! Tag edit operations.

use std::collections::BTreeSet;
use std::fmt;

/// A parsed tag edit: tags to strip, tags to add, and whether to clear first.
///
/// Produced by [`crate::services::parse_tag_edit`]. `add` and `remove` never
/// share a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagEdit {
    /// Tags to strip from the entry.
    pub remove: BTreeSet<String>,
    /// Tags to add to the entry.
    pub add: BTreeSet<String>,
    /// Strip every existing tag before applying `add`.
    pub replace_all: bool,
}

impl TagEdit {
    /// Returns true if applying this edit changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty() && !self.replace_all
    }

    /// Applies the edit to an existing tag list.
    ///
    /// Existing order is kept; added tags are appended in sorted order and
    /// never duplicated.
    #[must_use]
    pub fn apply(&self, existing: &[String]) -> Vec<String> {
        let mut tags: Vec<String> = if self.replace_all {
            Vec::new()
        } else {
            existing
                .iter()
                .filter(|t| !self.remove.contains(*t))
                .cloned()
                .collect()
        };

        for tag in &self.add {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }

    /// Renders the edit in the canonical form accepted by the parser.
    #[must_use]
    pub fn to_tag_string(&self) -> String {
        let mut tokens: Vec<String> = Vec::new();
        if self.replace_all {
            tokens.push("--".to_string());
        }
        for tag in &self.add {
            if tag.starts_with('-') {
                tokens.push(format!("\\{tag}"));
            } else {
                tokens.push(tag.clone());
            }
        }
        tokens.extend(self.remove.iter().map(|tag| format!("-{tag}")));

        // A lone empty tag needs a separator or it reads back as no edit.
        if let [only] = tokens.as_slice()
            && only.is_empty()
        {
            return ",".to_string();
        }
        tokens.join(", ")
    }
}

impl fmt::Display for TagEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_tag_string())
    }
}
