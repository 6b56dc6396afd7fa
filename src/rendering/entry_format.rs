//! Delimited field rendering for entries.
//!
//! A line is built from a list of field names:
//!
//! ```text
//! fields = ["title", "url"], delimiter = ","  =>  "Vacation,http://host/a1"
//! ```
//!
//! Occurrences of the delimiter inside a value are replaced by a space.
//! Multi-valued fields (tags) are joined with `;` when the delimiter is a
//! comma and with `,` otherwise. The `xml` field dumps the raw entry as JSON
//! and replaces everything rendered before it.

use super::{FormatSettings, UrlStyle};
use crate::models::Entry;

/// Fields rendered when none are requested.
pub const DEFAULT_FIELDS: &[&str] = &["title", "url"];

/// A renderable entry property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Service-assigned id.
    Id,
    /// Title (alias `name`).
    Title,
    /// Link chosen by the configured [`UrlStyle`].
    Url,
    /// Link to the content itself, falling back to the site link.
    UrlDirect,
    /// Link to the hosting page, falling back to the content link.
    UrlSite,
    /// Summary (alias `description`).
    Summary,
    /// Tags (aliases `labels`, `keywords`).
    Tags,
    /// Last modification time, RFC 3339.
    Updated,
    /// The whole entry serialized as JSON.
    Xml,
}

impl Field {
    /// Parses a field name or alias.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "id" => Some(Self::Id),
            "title" | "name" => Some(Self::Title),
            "url" => Some(Self::Url),
            "url_direct" => Some(Self::UrlDirect),
            "url_site" => Some(Self::UrlSite),
            "summary" | "description" => Some(Self::Summary),
            "tags" | "labels" | "keywords" => Some(Self::Tags),
            "updated" => Some(Self::Updated),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }
}

/// Renders entries as delimited lines.
#[derive(Debug, Clone)]
pub struct EntryFormatter {
    fields: Vec<Option<Field>>,
    delimiter: String,
    settings: FormatSettings,
}

impl EntryFormatter {
    /// Creates a formatter for the given field names.
    ///
    /// Unknown names are kept and render as the missing-field value. An empty
    /// delimiter means `,`.
    #[must_use]
    pub fn new<I, S>(fields: I, delimiter: &str, settings: FormatSettings) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = fields
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                let field = Field::parse(name);
                if field.is_none() {
                    tracing::warn!(field = name, "Unknown field, rendering placeholder");
                }
                field
            })
            .collect();
        let delimiter = if delimiter.is_empty() { "," } else { delimiter };

        Self {
            fields,
            delimiter: delimiter.to_string(),
            settings,
        }
    }

    /// Creates a formatter from a comma-separated field list such as `title,url`.
    #[must_use]
    pub fn from_field_list(list: &str, delimiter: &str, settings: FormatSettings) -> Self {
        Self::new(
            list.split(',').filter(|name| !name.trim().is_empty()),
            delimiter,
            settings,
        )
    }

    /// Renders one entry.
    #[must_use]
    pub fn format(&self, entry: &Entry) -> String {
        let delimiter = self.delimiter.as_str();
        let intra = if delimiter.trim() == "," { ";" } else { "," };
        let missing = self.settings.missing_field_value.as_str();

        let mut line = String::new();
        for field in &self.fields {
            let value = field
                .and_then(|f| self.value_of(f, entry, intra))
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| missing.to_string());

            if *field == Some(Field::Xml) {
                line = value;
            } else {
                line.push_str(&value.replace(delimiter, " "));
                line.push_str(delimiter);
            }
        }

        line.trim_end_matches(|c| delimiter.contains(c)).to_string()
    }

    fn value_of(&self, field: Field, entry: &Entry, intra: &str) -> Option<String> {
        match field {
            Field::Id => Some(entry.id.clone()),
            Field::Title => entry.title.clone(),
            Field::Url => url(entry, self.settings.url_style),
            Field::UrlDirect => url(entry, UrlStyle::Direct),
            Field::UrlSite => url(entry, UrlStyle::Site),
            Field::Summary => entry.summary.clone(),
            Field::Tags => Some(entry.tags.join(&format!("{intra} "))),
            Field::Updated => entry.updated.map(|t| t.to_rfc3339()),
            Field::Xml => serde_json::to_string(entry)
                .map_err(|e| tracing::warn!("Failed to serialize entry: {e}"))
                .ok(),
        }
    }
}

fn url(entry: &Entry, style: UrlStyle) -> Option<String> {
    let (first, second) = match style {
        UrlStyle::Direct => (&entry.content_src, &entry.html_link),
        UrlStyle::Site => (&entry.html_link, &entry.content_src),
    };
    first
        .as_ref()
        .filter(|s| !s.is_empty())
        .or(second.as_ref())
        .cloned()
}

/// Renders `entry` as the requested fields joined by `delimiter`.
///
/// # Examples
///
/// ```
/// use feedcl::models::Entry;
/// use feedcl::rendering::{FormatSettings, compile_entry_string};
///
/// let entry = Entry::new("1", "Trip, day 1");
/// let line = compile_entry_string(&entry, &["title", "summary"], ",", &FormatSettings::default());
/// assert_eq!(line, "Trip  day 1,N/A");
/// ```
#[must_use]
pub fn compile_entry_string<S: AsRef<str>>(
    entry: &Entry,
    fields: &[S],
    delimiter: &str,
    settings: &FormatSettings,
) -> String {
    EntryFormatter::new(fields, delimiter, settings.clone()).format(entry)
}
