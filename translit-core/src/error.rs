//! Error types for the transliteration engine
//!
//! This module provides error handling using the `thiserror` crate.
//! Errors are categorized by the phase that raises them: lookup, rule set
//! construction, or replacement template validation. `transliterate` itself
//! never fails.

use thiserror::Error;

/// The main error type for the transliteration engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslitError {
    /// A rule set could not be resolved by name
    #[error("no such input method: '{name}'")]
    NotFound {
        /// The name that was looked up
        name: String,
    },

    /// The rule set definition is unusable
    #[error("malformed definition{}: {kind}", locate(.id, .rule))]
    MalformedDefinition {
        /// Identifier of the offending rule set, when known
        id: Option<String>,
        /// Position of the offending rule in definition order, when known
        rule: Option<usize>,
        /// What is wrong with it
        kind: DefinitionErrorKind,
    },

    /// A replacement template references groups incorrectly
    #[error("invalid backreference in '{template}' at position {position}: {reason}")]
    InvalidBackreference {
        /// The full replacement template
        template: String,
        /// Character offset of the offending token
        position: usize,
        /// The specific problem
        reason: BackreferenceErrorKind,
    },
}

/// Specific kinds of definition errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionErrorKind {
    /// A required metadata attribute is absent
    #[error("missing required attribute '{0}'")]
    MissingAttribute(&'static str),

    /// A pattern failed to compile
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern text as written by the rule author
        pattern: String,
        /// Message from the regex compiler
        message: String,
    },
}

/// Specific kinds of backreference errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackreferenceErrorKind {
    /// `$` at the end of the template or followed by a non-digit
    #[error("'$' must be followed by a group number")]
    MissingGroupNumber,

    /// The first digit names a group the pattern does not have
    #[error("group {group} does not exist (pattern has {group_count})")]
    NoSuchGroup {
        /// The referenced group
        group: usize,
        /// Number of capture groups in the pattern
        group_count: usize,
    },

    /// A `\` with nothing after it
    #[error("dangling escape at end of template")]
    DanglingEscape,
}

fn locate(id: &Option<String>, rule: &Option<usize>) -> String {
    match (id, rule) {
        (Some(id), Some(rule)) => format!(" for '{id}' (rule {rule})"),
        (Some(id), None) => format!(" for '{id}'"),
        (None, Some(rule)) => format!(" (rule {rule})"),
        (None, None) => String::new(),
    }
}

impl TranslitError {
    /// Build a `MalformedDefinition` error without location
    pub fn malformed(kind: DefinitionErrorKind) -> Self {
        TranslitError::MalformedDefinition {
            id: None,
            rule: None,
            kind,
        }
    }

    /// Attach the rule set id and rule index to a definition error
    ///
    /// Other variants are returned unchanged.
    pub fn in_definition(self, definition_id: &str, rule_index: Option<usize>) -> Self {
        match self {
            TranslitError::MalformedDefinition { id, rule, kind } => {
                TranslitError::MalformedDefinition {
                    id: id.or_else(|| Some(definition_id.to_string())),
                    rule: rule.or(rule_index),
                    kind,
                }
            }
            other => other,
        }
    }

    /// Whether this is a lookup miss rather than a broken definition
    pub fn is_not_found(&self) -> bool {
        matches!(self, TranslitError::NotFound { .. })
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, TranslitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = TranslitError::NotFound {
            name: "does-not-exist".to_string(),
        };
        assert_eq!(err.to_string(), "no such input method: 'does-not-exist'");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_attribute_display() {
        let err = TranslitError::malformed(DefinitionErrorKind::MissingAttribute("id"));
        assert_eq!(
            err.to_string(),
            "malformed definition: missing required attribute 'id'"
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_in_definition_adds_location() {
        let err = TranslitError::malformed(DefinitionErrorKind::InvalidPattern {
            pattern: "(".to_string(),
            message: "unclosed group".to_string(),
        })
        .in_definition("ml-inscript", Some(3));
        assert_eq!(
            err.to_string(),
            "malformed definition for 'ml-inscript' (rule 3): invalid pattern '(': unclosed group"
        );
    }

    #[test]
    fn test_in_definition_keeps_existing_location() {
        let err = TranslitError::MalformedDefinition {
            id: Some("first".to_string()),
            rule: Some(1),
            kind: DefinitionErrorKind::MissingAttribute("name"),
        }
        .in_definition("second", Some(2));
        assert!(matches!(
            err,
            TranslitError::MalformedDefinition { ref id, rule: Some(1), .. } if id.as_deref() == Some("first")
        ));
    }

    #[test]
    fn test_in_definition_passes_other_variants() {
        let err = TranslitError::NotFound {
            name: "x".to_string(),
        };
        assert_eq!(err.clone().in_definition("y", Some(0)), err);
    }

    #[test]
    fn test_backreference_display() {
        let err = TranslitError::InvalidBackreference {
            template: "x$".to_string(),
            position: 1,
            reason: BackreferenceErrorKind::MissingGroupNumber,
        };
        assert_eq!(
            err.to_string(),
            "invalid backreference in 'x$' at position 1: '$' must be followed by a group number"
        );
    }

    #[test]
    fn test_no_such_group_display() {
        let reason = BackreferenceErrorKind::NoSuchGroup {
            group: 3,
            group_count: 1,
        };
        assert_eq!(reason.to_string(), "group 3 does not exist (pattern has 1)");
    }
}
