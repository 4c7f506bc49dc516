//! Namespace names.
//!
//! Namespaces are normalized before use: surrounding whitespace is trimmed, the
//! name is lowercased, and every space becomes an underscore. An empty result is
//! a validation error; there is no default namespace.

use crate::config;
use crate::error::ValidationError;
use std::fmt;

/// A validated, normalized namespace name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    /// Normalizes and validates `raw`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let name = normalize(raw);
        if name.is_empty() {
            return Err(ValidationError::MissingNamespace);
        }
        if name.chars().count() > config::MAX_NAMESPACE_LEN {
            return Err(ValidationError::NamespaceTooLong {
                max: config::MAX_NAMESPACE_LEN,
            });
        }
        Ok(Self(name))
    }

    /// The normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Normalizes a namespace name without validating it.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(Namespace::parse("  Think And Grow Rich ").unwrap().as_str(), "think_and_grow_rich");
        assert_eq!(Namespace::parse("animals").unwrap().as_str(), "animals");
        assert_eq!(Namespace::parse("a  b").unwrap().as_str(), "a__b");
    }

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!(Namespace::parse(""), Err(ValidationError::MissingNamespace));
        assert_eq!(Namespace::parse("   "), Err(ValidationError::MissingNamespace));
    }

    #[test]
    fn test_too_long_is_rejected() {
        let long = "x".repeat(config::MAX_NAMESPACE_LEN + 1);
        assert!(matches!(
            Namespace::parse(&long),
            Err(ValidationError::NamespaceTooLong { .. })
        ));
        let max = "x".repeat(config::MAX_NAMESPACE_LEN);
        assert!(Namespace::parse(&max).is_ok());
    }
}
