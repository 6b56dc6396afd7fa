//! Per-invocation attribute lookup.

use std::collections::BTreeMap;

/// The options a user supplied for one invocation.
///
/// Maps attribute names to optional values. An attribute counts as supplied
/// ("truthy") only when it is present with a non-empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeContext {
    values: BTreeMap<String, Option<String>>,
}

impl AttributeContext {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Sets an attribute value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, Some(value.into()));
        self
    }

    /// Sets an attribute from an optional value.
    #[must_use]
    pub fn with_opt(mut self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.insert(name, value.map(Into::into));
        self
    }

    /// Records a boolean flag. Unset flags are stored as absent.
    #[must_use]
    pub fn with_flag(mut self, name: impl Into<String>, set: bool) -> Self {
        self.insert(name, set.then(|| "true".to_string()));
        self
    }

    /// Inserts or replaces an attribute.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.values.insert(name.into(), value);
    }

    /// Returns the value of an attribute if it is supplied.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(Option::as_deref)
            .filter(|v| !v.is_empty())
    }

    /// Returns true if the attribute has a truthy value.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over the names of all supplied attributes.
    pub fn supplied(&self) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .filter(|(_, v)| v.as_deref().is_some_and(|v| !v.is_empty()))
            .map(|(k, _)| k.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeContext
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut ctx = Self::new();
        for (k, v) in iter {
            ctx.insert(k, Some(v.into()));
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_is_not_set() {
        let ctx = AttributeContext::new()
            .with("title", "")
            .with_opt("query", None::<String>)
            .with("feed", "http://x/feed");

        assert!(!ctx.is_set("title"));
        assert!(!ctx.is_set("query"));
        assert!(!ctx.is_set("missing"));
        assert_eq!(ctx.get("feed"), Some("http://x/feed"));
        assert_eq!(ctx.supplied().collect::<Vec<_>>(), vec!["feed"]);
    }

    #[test]
    fn test_flags() {
        let ctx = AttributeContext::new()
            .with_flag("force", true)
            .with_flag("regex", false);
        assert!(ctx.is_set("force"));
        assert!(!ctx.is_set("regex"));
    }

    #[test]
    fn test_from_iter() {
        let ctx: AttributeContext = [("a", "x"), ("b", "y")].into_iter().collect();
        assert_eq!(ctx.get("a"), Some("x"));
        assert_eq!(ctx.get("b"), Some("y"));
    }
}
