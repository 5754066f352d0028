//! Parsed rule set definition records
//!
//! These are the plain, uncompiled shapes a definition loader hands to the
//! engine. They derive `serde` traits so any self-describing format can fill
//! them in; the engine itself never reads files.
//!
//! Metadata fields are optional here so that a missing attribute surfaces as
//! [`DefinitionErrorKind::MissingAttribute`](crate::DefinitionErrorKind)
//! when the rule set is compiled, not as a format error.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rule::PatternRule;

/// One uncompiled rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Pattern matched against the end of the input buffer
    pub input: String,
    /// Replacement template
    pub replacement: String,
    /// Pattern matched against the end of the context buffer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Modifier state the rule is keyed to
    #[serde(default, alias = "altGr")]
    pub alt_gr: bool,
}

impl RuleDefinition {
    /// A rule with no context that applies without the modifier
    pub fn new(input: impl Into<String>, replacement: impl Into<String>) -> Self {
        RuleDefinition {
            input: input.into(),
            replacement: replacement.into(),
            context: None,
            alt_gr: false,
        }
    }

    /// Compile into a [`PatternRule`]
    pub fn compile(&self) -> Result<PatternRule> {
        let rule = PatternRule::new(&self.input, &self.replacement)?.with_alt_gr(self.alt_gr);
        match &self.context {
            Some(context) => rule.with_context(context),
            None => Ok(rule),
        }
    }
}

impl From<&PatternRule> for RuleDefinition {
    fn from(rule: &PatternRule) -> Self {
        RuleDefinition {
            input: rule.input().to_string(),
            replacement: rule.replacement().to_string(),
            context: rule.context().map(str::to_string),
            alt_gr: rule.alt_gr(),
        }
    }
}

/// One uncompiled rule set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSetDefinition {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub version: Option<String>,
    #[serde(default, alias = "maxKeyLength", skip_serializing_if = "Option::is_none")]
    pub max_key_length: Option<usize>,
    #[serde(default, alias = "contextLength", skip_serializing_if = "Option::is_none")]
    pub context_length: Option<usize>,
    /// Rules in priority order
    #[serde(default, alias = "patterns")]
    pub rules: Vec<RuleDefinition>,
}

impl From<&crate::RuleSet> for RuleSetDefinition {
    fn from(rule_set: &crate::RuleSet) -> Self {
        let info = rule_set.info();
        RuleSetDefinition {
            id: Some(info.id.clone()),
            name: Some(info.name.clone()),
            description: Some(info.description.clone()),
            author: Some(info.author.clone()),
            version: Some(info.version.clone()),
            max_key_length: Some(info.max_key_length),
            context_length: Some(info.context_length),
            rules: rule_set.rules().iter().map(RuleDefinition::from).collect(),
        }
    }
}
