//! Registry for resolving rule sets by name
//!
//! A [`RuleSetLibrary`] is an explicit, caller-owned collection of compiled
//! rule sets keyed by id. Definitions are compiled when they are added, so a
//! broken definition is reported at load time and lookups only ever fail with
//! [`TranslitError::NotFound`].

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::definition::RuleSetDefinition;
use crate::error::{Result, TranslitError};
use crate::ruleset::RuleSet;

/// Rule sets keyed by id
#[derive(Debug, Clone, Default)]
pub struct RuleSetLibrary {
    rule_sets: BTreeMap<String, Arc<RuleSet>>,
}

impl RuleSetLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every definition and collect them
    ///
    /// Fails on the first definition that does not compile.
    pub fn from_definitions<'a, I>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a RuleSetDefinition>,
    {
        let mut library = Self::new();
        for definition in definitions {
            library.insert_definition(definition)?;
        }
        Ok(library)
    }

    /// Add a compiled rule set, replacing any with the same id
    ///
    /// Returns the rule set previously registered under that id.
    pub fn insert(&mut self, rule_set: RuleSet) -> Option<Arc<RuleSet>> {
        let id = rule_set.id().to_string();
        debug!(id = %id, rules = rule_set.len(), "registering rule set");
        let previous = self.rule_sets.insert(id, Arc::new(rule_set));
        if let Some(previous) = &previous {
            debug!(id = previous.id(), "replaced rule set with the same id");
        }
        previous
    }

    /// Compile a definition and add it, replacing any rule set with the same id
    ///
    /// Returns the compiled rule set.
    pub fn insert_definition(&mut self, definition: &RuleSetDefinition) -> Result<Arc<RuleSet>> {
        let rule_set = RuleSet::from_definition(definition)?;
        let id = rule_set.id().to_string();
        self.insert(rule_set);
        self.get(&id)
    }

    /// Resolve a rule set by id
    ///
    /// # Errors
    /// [`TranslitError::NotFound`] when no rule set has that id.
    pub fn get(&self, name: &str) -> Result<Arc<RuleSet>> {
        self.rule_sets.get(name).cloned().ok_or_else(|| {
            debug!(name, "rule set lookup missed");
            TranslitError::NotFound {
                name: name.to_string(),
            }
        })
    }

    /// Whether a rule set with this id is registered
    pub fn contains(&self, name: &str) -> bool {
        self.rule_sets.contains_key(name)
    }

    /// Registered ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rule_sets.keys().map(String::as_str)
    }

    /// Number of registered rule sets
    pub fn len(&self) -> usize {
        self.rule_sets.len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::RuleDefinition;
    use crate::error::DefinitionErrorKind;

    fn definition(id: &str) -> RuleSetDefinition {
        RuleSetDefinition {
            id: Some(id.to_string()),
            name: Some(id.to_uppercase()),
            description: Some(String::new()),
            author: Some(String::new()),
            version: Some("1".to_string()),
            rules: vec![RuleDefinition::new("a", id)],
            ..Default::default()
        }
    }

    #[test]
    fn test_lookup_missing_is_not_found() {
        let library = RuleSetLibrary::new();
        let err = library.get("does-not-exist").unwrap_err();
        assert_eq!(
            err,
            TranslitError::NotFound {
                name: "does-not-exist".to_string()
            }
        );
    }

    #[test]
    fn test_lookup_registered() {
        let library =
            RuleSetLibrary::from_definitions(&[definition("one"), definition("two")]).unwrap();
        assert_eq!(library.len(), 2);
        assert!(library.contains("one"));
        assert_eq!(library.ids().collect::<Vec<_>>(), vec!["one", "two"]);

        let two = library.get("two").unwrap();
        assert_eq!(two.transliterate("a", "", false), "two");
    }

    #[test]
    fn test_bad_definition_fails_load() {
        let mut bad = definition("bad");
        bad.name = None;
        let err = RuleSetLibrary::from_definitions(&[definition("ok"), bad]).unwrap_err();
        assert!(matches!(
            err,
            TranslitError::MalformedDefinition {
                kind: DefinitionErrorKind::MissingAttribute("name"),
                ..
            }
        ));
    }

    #[test]
    fn test_insert_replaces() {
        let mut library = RuleSetLibrary::new();
        assert!(library.insert(RuleSet::builder("x").build()).is_none());
        let previous = library.insert(RuleSet::builder("x").name("again").build());
        assert!(previous.is_some());
        assert_eq!(library.get("x").unwrap().name(), "again");
    }

    #[test]
    fn test_insert_definition_replaces() {
        let mut library = RuleSetLibrary::new();
        library.insert_definition(&definition("x")).unwrap();
        let mut again = definition("x");
        again.name = Some("again".to_string());
        let inserted = library.insert_definition(&again).unwrap();

        assert_eq!(library.len(), 1);
        assert_eq!(inserted.name(), "again");
        assert_eq!(library.get("x").unwrap().name(), "again");
    }

    #[test]
    fn test_shared_rule_set() {
        let mut library = RuleSetLibrary::new();
        let inserted = library.insert_definition(&definition("one")).unwrap();
        let looked_up = library.get("one").unwrap();
        assert!(Arc::ptr_eq(&inserted, &looked_up));
    }
}
