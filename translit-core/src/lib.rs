//! Translit Core Library
//!
//! A rule-based transliteration engine for input methods. A [`RuleSet`] holds
//! an ordered list of [`PatternRule`]s; [`RuleSet::transliterate`] applies the
//! first rule whose input pattern matches the end of the input buffer, whose
//! context pattern (if any) matches the end of the context buffer, and whose
//! modifier flag equals the requested one.
//!
//! ```
//! use translit_core::{PatternRule, RuleSet};
//!
//! let rules = RuleSet::builder("demo")
//!     .rule(PatternRule::new("aa", "ā")?)
//!     .rule(PatternRule::new("a", "a")?)
//!     .build();
//!
//! assert_eq!(rules.transliterate("kaa", "", false), "kā");
//! # Ok::<(), translit_core::TranslitError>(())
//! ```

pub mod composer;
pub mod definition;
pub mod error;
pub mod ffi;
pub mod library;
pub mod replace;
pub mod rule;
pub mod ruleset;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use composer::Composer;
pub use definition::{RuleDefinition, RuleSetDefinition};
pub use error::{BackreferenceErrorKind, DefinitionErrorKind, Result, TranslitError};
pub use library::RuleSetLibrary;
pub use replace::{Replacement, ReplacementPart, expand};
pub use rule::{CapturedMatch, PatternRule};
pub use ruleset::{RuleSet, RuleSetBuilder, RuleSetInfo};

/// Compile a rule set from parsed definition data
///
/// Shorthand for [`RuleSet::from_definition`].
pub fn compile(definition: &RuleSetDefinition) -> Result<RuleSet> {
    RuleSet::from_definition(definition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end() {
        let definition = RuleSetDefinition {
            id: Some("demo".to_string()),
            name: Some("Demo".to_string()),
            description: Some("Demo".to_string()),
            author: Some("Demo".to_string()),
            version: Some("0.1".to_string()),
            rules: vec![
                RuleDefinition::new("(k)h", "$1ʰ"),
                RuleDefinition::new("k", "k"),
            ],
            ..Default::default()
        };
        let rules = compile(&definition).unwrap();
        assert_eq!(rules.transliterate("kh", "", false), "kʰ");
    }

    #[test]
    fn test_unparsable_pattern_builds_nothing() {
        let definition = RuleSetDefinition {
            id: Some("broken".to_string()),
            name: Some("Broken".to_string()),
            description: Some(String::new()),
            author: Some(String::new()),
            version: Some(String::new()),
            rules: vec![RuleDefinition::new("a)", "b")],
            ..Default::default()
        };
        let err = compile(&definition).unwrap_err();
        assert!(matches!(err, TranslitError::MalformedDefinition { .. }));
    }
}
