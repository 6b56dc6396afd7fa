//! Task requirement declarations.
//!
//! A [`RequirementSpec`] lists the attributes a task needs. Each required term
//! is either a single attribute or a group of alternatives:
//!
//! ```text
//! ["feed", ["title", "id"]]   =>  feed AND (title OR id)
//! ```

use crate::models::AttributeContext;
use crate::{Error, Result};
use std::fmt;

/// One required term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// A single mandatory attribute.
    Single(String),
    /// At least one of these attributes must be supplied.
    AnyOf(Vec<String>),
}

impl Requirement {
    /// Creates an alternative group.
    #[must_use]
    pub fn any_of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(names.into_iter().map(Into::into).collect())
    }

    /// Returns the attribute names this term mentions.
    #[must_use]
    pub fn names(&self) -> &[String] {
        match self {
            Self::Single(name) => std::slice::from_ref(name),
            Self::AnyOf(names) => names,
        }
    }

    /// Returns true if `ctx` satisfies this term.
    #[must_use]
    pub fn is_satisfied(&self, ctx: &AttributeContext) -> bool {
        self.names().iter().any(|name| ctx.is_set(name))
    }
}

impl From<&str> for Requirement {
    fn from(name: &str) -> Self {
        Self::Single(name.to_string())
    }
}

impl From<String> for Requirement {
    fn from(name: String) -> Self {
        Self::Single(name)
    }
}

impl<const N: usize> From<[&str; N]> for Requirement {
    fn from(names: [&str; N]) -> Self {
        Self::any_of(names)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(name) => f.write_str(name),
            Self::AnyOf(names) => write!(f, "({})", names.join(" OR ")),
        }
    }
}

/// Attributes a task requires and accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementSpec {
    required: Vec<Requirement>,
    optional: Vec<String>,
    usage: String,
}

impl RequirementSpec {
    /// Starts building a spec.
    #[must_use]
    pub fn builder() -> RequirementSpecBuilder {
        RequirementSpecBuilder::default()
    }

    /// Creates a spec from required terms and optional names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a name is both required and optional.
    pub fn new<R, O>(required: R, optional: O, args_desc: &str) -> Result<Self>
    where
        R: IntoIterator,
        R::Item: Into<Requirement>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        let required: Vec<Requirement> = required.into_iter().map(Into::into).collect();
        let optional: Vec<String> = optional.into_iter().map(Into::into).collect();

        if let Some(name) = required
            .iter()
            .flat_map(Requirement::names)
            .find(|name| optional.contains(name))
        {
            return Err(Error::InvalidInput(format!(
                "attribute '{name}' is declared both required and optional"
            )));
        }

        let usage = render_usage(&required, &optional, args_desc);
        Ok(Self {
            required,
            optional,
            usage,
        })
    }

    /// Returns the required terms in declaration order.
    #[must_use]
    pub fn required(&self) -> &[Requirement] {
        &self.required
    }

    /// Returns the optional attribute names.
    #[must_use]
    pub fn optional(&self) -> &[String] {
        &self.optional
    }

    /// Returns the usage string, e.g. `Requires: user Optional: tags`.
    #[must_use]
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Returns true if `attr` is a bare required term.
    #[must_use]
    pub fn is_required(&self, attr: &str) -> bool {
        self.required
            .iter()
            .any(|term| matches!(term, Requirement::Single(name) if name == attr))
    }

    /// Returns true if `attr` is optional.
    #[must_use]
    pub fn is_optional(&self, attr: &str) -> bool {
        self.optional.iter().any(|name| name == attr)
    }

    /// Returns every alternative group that contains `attr`.
    #[must_use]
    pub fn alternatives_containing(&self, attr: &str) -> Vec<&[String]> {
        self.required
            .iter()
            .filter_map(|term| match term {
                Requirement::AnyOf(names) if names.iter().any(|n| n == attr) => {
                    Some(names.as_slice())
                },
                _ => None,
            })
            .collect()
    }

    /// Returns true if the caller must still supply `attr`.
    ///
    /// - Bare required term: true iff `ctx` has no value for it.
    /// - Member of alternative groups: true iff no group containing `attr`
    ///   has any supplied member.
    /// - Anything else: false.
    #[must_use]
    pub fn still_needed(&self, attr: &str, ctx: &AttributeContext) -> bool {
        if self.is_required(attr) {
            return !ctx.is_set(attr);
        }

        let groups = self.alternatives_containing(attr);
        if groups.is_empty() {
            return false;
        }
        groups
            .iter()
            .all(|group| group.iter().all(|name| !ctx.is_set(name)))
    }

    /// Returns every required term `ctx` does not satisfy, in declaration order.
    #[must_use]
    pub fn missing(&self, ctx: &AttributeContext) -> Vec<&Requirement> {
        self.required
            .iter()
            .filter(|term| !term.is_satisfied(ctx))
            .collect()
    }
}

/// Builder for [`RequirementSpec`].
#[derive(Debug, Default)]
pub struct RequirementSpecBuilder {
    required: Vec<Requirement>,
    optional: Vec<String>,
    args_desc: String,
}

impl RequirementSpecBuilder {
    /// Adds a required term.
    #[must_use]
    pub fn require(mut self, term: impl Into<Requirement>) -> Self {
        self.required.push(term.into());
        self
    }

    /// Adds an alternative group.
    #[must_use]
    pub fn require_any<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.push(Requirement::any_of(names));
        self
    }

    /// Adds an optional attribute.
    #[must_use]
    pub fn optional(mut self, name: impl Into<String>) -> Self {
        self.optional.push(name.into());
        self
    }

    /// Sets the argument description appended to the usage string.
    #[must_use]
    pub fn args(mut self, desc: impl Into<String>) -> Self {
        self.args_desc = desc.into();
        self
    }

    /// Builds the spec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a name is both required and optional.
    pub fn build(self) -> Result<RequirementSpec> {
        RequirementSpec::new(self.required, self.optional, &self.args_desc)
    }
}

fn render_usage(required: &[Requirement], optional: &[String], args_desc: &str) -> String {
    let req = if required.is_empty() {
        "none".to_string()
    } else {
        required
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" AND ")
    };

    let mut usage = format!("Requires: {req}");
    if !optional.is_empty() {
        usage.push_str(" Optional: ");
        usage.push_str(&optional.join(", "));
    }
    if !args_desc.is_empty() {
        usage.push_str(" Arguments: ");
        usage.push_str(args_desc);
    }
    usage
}
