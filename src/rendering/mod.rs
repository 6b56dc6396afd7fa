//! Entry rendering.
//!
//! Turns entries into delimited lines of requested fields for output.

mod entry_format;

pub use entry_format::{DEFAULT_FIELDS, EntryFormatter, Field, compile_entry_string};

use crate::config::DEFAULT_MISSING_FIELD_VALUE;

/// Which link the `url` field renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlStyle {
    /// Link to the content itself.
    Direct,
    /// Link to the page hosting the content.
    #[default]
    Site,
}

impl UrlStyle {
    /// Parses a style name. Anything other than `direct` is `Site`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("direct") {
            Self::Direct
        } else {
            Self::Site
        }
    }

    /// Returns the style name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Site => "site",
        }
    }
}

/// Formatting options passed to [`EntryFormatter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSettings {
    /// Which link `url` renders.
    pub url_style: UrlStyle,
    /// Placeholder for fields an entry does not have.
    pub missing_field_value: String,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            url_style: UrlStyle::Site,
            missing_field_value: DEFAULT_MISSING_FIELD_VALUE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_style_parse() {
        assert_eq!(UrlStyle::parse("direct"), UrlStyle::Direct);
        assert_eq!(UrlStyle::parse(" DIRECT "), UrlStyle::Direct);
        assert_eq!(UrlStyle::parse("site"), UrlStyle::Site);
        assert_eq!(UrlStyle::parse("bogus"), UrlStyle::Site);
        assert_eq!(UrlStyle::Direct.as_str(), "direct");
    }
}
