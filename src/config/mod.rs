//! Configuration management.
//!
//! Settings live in a TOML file with a `[general]` table and optional
//! per-service tables that override it:
//!
//! ```toml
//! [general]
//! regex = true
//! max_results = 10000
//!
//! [services.photos]
//! cap_results = true
//! max_results = 50
//! ```

use crate::rendering::{FormatSettings, UrlStyle};
use crate::services::{DispatchSettings, FeedSettings};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Page size used when results are not capped.
pub const LARGE_MAX_RESULTS: u32 = 10_000;

/// Placeholder rendered for fields an entry does not have.
pub const DEFAULT_MISSING_FIELD_VALUE: &str = "N/A";

/// Main configuration for feedcl.
#[derive(Debug, Default)]
pub struct FeedclConfig {
    /// Settings shared by every service.
    pub general: SettingsSection,
    /// Per-service overrides, keyed by service name.
    pub services: BTreeMap<String, SettingsSection>,
    /// Logging settings.
    pub logging: Option<LoggingSettings>,
}

/// Settings section in the config file; every key is optional.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsSection {
    /// Match titles as regular expressions.
    pub regex: Option<bool>,
    /// Ask for tags when none were given.
    pub tags_prompt: Option<bool>,
    /// Ask before deleting each entry.
    pub delete_prompt: Option<bool>,
    /// Answer used when the delete question is left blank.
    pub delete_by_default: Option<bool>,
    /// Stop after the first page.
    pub cap_results: Option<bool>,
    /// Page size requested from the service.
    pub max_results: Option<u32>,
    /// Which link `url` renders: `site` or `direct`.
    pub url_style: Option<String>,
    /// Placeholder for missing fields.
    pub missing_field_value: Option<String>,
    /// Bearer token for the feed service.
    #[serde(default, deserialize_with = "secret_serde::deserialize")]
    pub token: Option<SecretString>,
}

/// Logging section in the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Filter directive, e.g. `feedcl=info`.
    pub filter: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    general: Option<SettingsSection>,
    services: Option<BTreeMap<String, SettingsSection>>,
    logging: Option<LoggingSettings>,
}

/// Effective settings for one service.
#[derive(Debug)]
pub struct ServiceSettings {
    /// Match titles as regular expressions.
    pub use_regex: bool,
    /// Ask for tags when none were given.
    pub tags_prompt: bool,
    /// Ask before deleting each entry.
    pub delete_prompt: bool,
    /// Answer used when the delete question is left blank.
    pub delete_by_default: bool,
    /// Stop after the first page.
    pub cap_results: bool,
    /// Page size requested from the service.
    pub max_results: u32,
    /// Which link `url` renders.
    pub url_style: UrlStyle,
    /// Placeholder for missing fields.
    pub missing_field_value: String,
    /// Bearer token for the feed service.
    pub token: Option<SecretString>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            use_regex: true,
            tags_prompt: false,
            delete_prompt: true,
            delete_by_default: true,
            cap_results: false,
            max_results: LARGE_MAX_RESULTS,
            url_style: UrlStyle::Site,
            missing_field_value: DEFAULT_MISSING_FIELD_VALUE.to_string(),
            token: None,
        }
    }
}

impl ServiceSettings {
    /// Applies every key present in `section`.
    fn merge(&mut self, section: &SettingsSection) {
        if let Some(v) = section.regex {
            self.use_regex = v;
        }
        if let Some(v) = section.tags_prompt {
            self.tags_prompt = v;
        }
        if let Some(v) = section.delete_prompt {
            self.delete_prompt = v;
        }
        if let Some(v) = section.delete_by_default {
            self.delete_by_default = v;
        }
        if let Some(v) = section.cap_results {
            self.cap_results = v;
        }
        if let Some(v) = section.max_results {
            self.max_results = v;
        }
        if let Some(ref v) = section.url_style {
            self.url_style = UrlStyle::parse(v);
        }
        if let Some(ref v) = section.missing_field_value {
            self.missing_field_value.clone_from(v);
        }
        if let Some(ref v) = section.token {
            self.token = Some(SecretString::from(v.expose_secret().to_string()));
        }
    }

    /// Raises `max_results` to the large page size unless results are capped.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if !self.cap_results && self.max_results < LARGE_MAX_RESULTS {
            self.max_results = LARGE_MAX_RESULTS;
        }
        self
    }

    /// Returns the aggregator settings.
    #[must_use]
    pub const fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            max_results: self.max_results,
            cap_results: self.cap_results,
        }
    }

    /// Returns the dispatcher settings.
    #[must_use]
    pub const fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            feed: self.feed_settings(),
            use_regex: self.use_regex,
            tags_prompt: self.tags_prompt,
            delete_prompt: self.delete_prompt,
            delete_by_default: self.delete_by_default,
        }
    }

    /// Returns the formatter settings.
    #[must_use]
    pub fn format_settings(&self) -> FormatSettings {
        FormatSettings {
            url_style: self.url_style,
            missing_field_value: self.missing_field_value.clone(),
        }
    }
}

impl FeedclConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::parse(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration TOML.
    pub fn parse(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self {
            general: file.general.unwrap_or_default(),
            services: file.services.unwrap_or_default(),
            logging: file.logging,
        })
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/feedcl/` on macOS)
    /// 2. XDG config dir (`~/.config/feedcl/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("feedcl").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("feedcl")
                .join("config.toml"),
        ];

        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path.display(), "Ignoring config file: {e}"),
            }
        }

        Self::default()
    }

    /// Returns the effective settings for a service.
    ///
    /// Service overrides are applied on top of `[general]`, then the page
    /// size floor is enforced.
    #[must_use]
    pub fn service(&self, name: Option<&str>) -> ServiceSettings {
        let mut settings = ServiceSettings::default();
        settings.merge(&self.general);
        if let Some(section) = name.and_then(|n| self.services.get(n)) {
            settings.merge(section);
        }
        settings.normalized()
    }
}

/// Serde module for reading tokens straight into `SecretString`.
mod secret_serde {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(SecretString::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[general]
regex = false
delete_prompt = false
delete_by_default = false
missing_field_value = "-"
url_style = "direct"
token = "abc"

[services.photos]
cap_results = true
max_results = 50
regex = true

[services.docs]
max_results = 25

[logging]
format = "json"
"#;

    #[test]
    fn test_defaults() {
        let settings = FeedclConfig::new().service(None);
        assert!(settings.use_regex);
        assert!(settings.delete_prompt);
        assert!(!settings.cap_results);
        assert_eq!(settings.max_results, LARGE_MAX_RESULTS);
        assert_eq!(settings.missing_field_value, "N/A");
    }

    #[test]
    fn test_service_overrides_general() {
        let config = FeedclConfig::parse(SAMPLE).expect("valid config");
        let photos = config.service(Some("photos"));
        assert!(photos.use_regex);
        assert!(!photos.delete_prompt);
        assert!(!photos.dispatch_settings().delete_by_default);
        assert_eq!(photos.dispatch_settings().feed.max_results, 50);
        assert!(photos.cap_results);
        assert_eq!(photos.max_results, 50);
        assert_eq!(photos.url_style, UrlStyle::Direct);
        assert_eq!(photos.missing_field_value, "-");
        assert_eq!(
            photos.token.as_ref().map(|t| t.expose_secret().to_string()),
            Some("abc".to_string())
        );

        let general = config.service(None);
        assert!(!general.use_regex);
    }

    #[test]
    fn test_uncapped_small_page_size_is_raised() {
        let config = FeedclConfig::parse(SAMPLE).expect("valid config");
        assert_eq!(config.service(Some("docs")).max_results, LARGE_MAX_RESULTS);
    }

    #[test]
    fn test_unknown_service_uses_general() {
        let config = FeedclConfig::parse(SAMPLE).expect("valid config");
        let settings = config.service(Some("contacts"));
        assert!(!settings.use_regex);
        assert!(!settings.cap_results);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write config");

        let config = FeedclConfig::load_from_file(file.path()).expect("load config");
        assert_eq!(config.services.len(), 2);
        assert_eq!(
            config.logging.and_then(|l| l.format).as_deref(),
            Some("json")
        );
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let result = FeedclConfig::parse("[general\nregex = ");
        assert!(matches!(
            result,
            Err(crate::Error::OperationFailed { ref operation, .. }) if operation == "parse_config_file"
        ));
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = FeedclConfig::load_from_file(Path::new("/nonexistent/feedcl.toml"));
        assert!(result.is_err());
    }
}
