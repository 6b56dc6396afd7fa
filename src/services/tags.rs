//! Tag edit grammar.
//!
//! Parses a single comma-separated string into a [`TagEdit`]:
//! - `tag1, tag2` - Add `tag1` and `tag2`
//! - `-tag3` - Remove `tag3`
//! - `\-tag5` - Add the literal tag `-tag5`
//! - `--` - Remove every existing tag before applying the rest

use crate::models::TagEdit;

/// Token that clears every existing tag.
const CLEAR_ALL: &str = "--";

/// Parses a tag edit string into a [`TagEdit`].
///
/// A single space after each comma is ignored. Empty input yields an empty
/// edit. Every token is classified; empty tokens (from `a,,b`) become an
/// empty-string tag. When the same tag is both added and removed, the later
/// token wins.
///
/// # Examples
///
/// ```
/// use feedcl::services::parse_tag_edit;
///
/// let edit = parse_tag_edit("--, tag6");
/// assert!(edit.replace_all);
/// assert!(edit.add.contains("tag6"));
/// assert!(edit.remove.is_empty());
///
/// let edit = parse_tag_edit(r"\-tag5");
/// assert!(edit.add.contains("-tag5"));
/// ```
#[must_use]
pub fn parse_tag_edit(tags: &str) -> TagEdit {
    let mut edit = TagEdit::default();
    if tags.is_empty() {
        return edit;
    }

    let normalized = tags.replace(", ", ",");
    for token in normalized.split(',') {
        classify_token(token, &mut edit);
    }

    edit
}

/// Classifies a single token into the edit.
fn classify_token(token: &str, edit: &mut TagEdit) {
    if token == "-" || token == CLEAR_ALL {
        edit.replace_all = true;
        return;
    }

    if let Some(literal) = token.strip_prefix('\\').filter(|rest| rest.starts_with('-')) {
        add_tag(literal, edit);
    } else if let Some(tag) = token.strip_prefix('-') {
        edit.add.remove(tag);
        edit.remove.insert(tag.to_string());
    } else {
        add_tag(token, edit);
    }
}

fn add_tag(tag: &str, edit: &mut TagEdit) {
    edit.remove.remove(tag);
    edit.add.insert(tag.to_string());
}
