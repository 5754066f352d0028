//! Rule sets and the transliteration loop
//!
//! A [`RuleSet`] is an ordered list of [`PatternRule`]s plus descriptive
//! metadata. Order is the only priority mechanism: the first rule whose
//! predicates hold is applied, all others are ignored.

use regex::NoExpand;
use tracing::{debug, trace};

use crate::definition::RuleSetDefinition;
use crate::error::{DefinitionErrorKind, Result, TranslitError};
use crate::rule::PatternRule;

/// Default for `max_key_length` when a definition leaves it out
pub const DEFAULT_MAX_KEY_LENGTH: usize = 1;

/// Default for `context_length` when a definition leaves it out
pub const DEFAULT_CONTEXT_LENGTH: usize = 0;

/// Metadata describing a rule set
///
/// The engine does not interpret any of these fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSetInfo {
    /// Unique identifier, e.g. `ml-transliteration`
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Author credit
    pub author: String,
    /// Version string
    pub version: String,
    /// How many trailing input characters a host should pass in
    pub max_key_length: usize,
    /// How many trailing context characters a host should pass in
    pub context_length: usize,
}

impl RuleSetInfo {
    /// Metadata with the given id and everything else empty or defaulted
    pub fn new(id: impl Into<String>) -> Self {
        RuleSetInfo {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            author: String::new(),
            version: String::new(),
            max_key_length: DEFAULT_MAX_KEY_LENGTH,
            context_length: DEFAULT_CONTEXT_LENGTH,
        }
    }
}

/// An immutable, ordered collection of rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    info: RuleSetInfo,
    rules: Vec<PatternRule>,
}

impl RuleSet {
    /// Create a rule set from metadata and already compiled rules
    pub fn new(info: RuleSetInfo, rules: Vec<PatternRule>) -> Self {
        debug!(id = %info.id, rules = rules.len(), "rule set built");
        RuleSet { info, rules }
    }

    /// Start building a rule set with the given id
    pub fn builder(id: impl Into<String>) -> RuleSetBuilder {
        RuleSetBuilder::new(id)
    }

    /// Compile a rule set from parsed definition data
    ///
    /// # Errors
    /// [`TranslitError::MalformedDefinition`] when `id`, `name`,
    /// `description`, `author` or `version` is missing or a pattern does not
    /// compile; [`TranslitError::InvalidBackreference`] when a template does
    /// not fit its pattern. Nothing is returned on failure.
    pub fn from_definition(definition: &RuleSetDefinition) -> Result<Self> {
        let id = definition
            .id
            .clone()
            .ok_or_else(|| TranslitError::malformed(DefinitionErrorKind::MissingAttribute("id")))?;

        let required = |value: &Option<String>, attribute: &'static str| {
            value.clone().ok_or_else(|| {
                TranslitError::malformed(DefinitionErrorKind::MissingAttribute(attribute))
                    .in_definition(&id, None)
            })
        };

        let info = RuleSetInfo {
            name: required(&definition.name, "name")?,
            description: required(&definition.description, "description")?,
            author: required(&definition.author, "author")?,
            version: required(&definition.version, "version")?,
            max_key_length: definition.max_key_length.unwrap_or(DEFAULT_MAX_KEY_LENGTH),
            context_length: definition.context_length.unwrap_or(DEFAULT_CONTEXT_LENGTH),
            id: id.clone(),
        };

        let rules = definition
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| rule.compile().map_err(|e| e.in_definition(&id, Some(index))))
            .collect::<Result<Vec<_>>>()?;

        Ok(RuleSet::new(info, rules))
    }

    /// Transliterate `input` using the first rule that applies
    ///
    /// The selected rule's template is expanded against its match at the end
    /// of `input`, then every occurrence of the rule's input pattern anywhere
    /// in `input` is replaced by that text. Returns `input` unchanged when no
    /// rule applies.
    pub fn transliterate(&self, input: &str, context: &str, alt_gr: bool) -> String {
        for (index, rule) in self.rules.iter().enumerate() {
            if let Some(captured) = rule.matches(input, context, alt_gr) {
                trace!(id = %self.info.id, rule = index, "rule selected");
                let replacement = rule.template().apply(&captured);
                return rule
                    .input_regex()
                    .replace_all(input, NoExpand(&replacement))
                    .into_owned();
            }
        }

        input.to_string()
    }

    /// Find the rule `transliterate` would apply, with its index
    pub fn find_rule(&self, input: &str, context: &str, alt_gr: bool) -> Option<(usize, &PatternRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(input, context, alt_gr).is_some())
    }

    /// Append one keystroke to a composed buffer and transliterate it
    ///
    /// Only the last `max_key_length` characters of `buffer` plus `key` are
    /// handed to the rules, and only the last `context_length` characters of
    /// `context`. The untouched prefix of `buffer` is kept as is.
    pub fn transliterate_keystroke(&self, buffer: &str, key: &str, context: &str, alt_gr: bool) -> String {
        let (committed, tail) = buffer.split_at(tail_start(buffer, self.info.max_key_length));
        let context = &context[tail_start(context, self.info.context_length)..];

        let mut input = String::with_capacity(tail.len() + key.len());
        input.push_str(tail);
        input.push_str(key);

        let mut result = String::with_capacity(committed.len() + input.len());
        result.push_str(committed);
        result.push_str(&self.transliterate(&input, context, alt_gr));
        result
    }

    /// Full metadata
    pub fn info(&self) -> &RuleSetInfo {
        &self.info
    }

    /// Unique identifier
    pub fn id(&self) -> &str {
        &self.info.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Description
    pub fn description(&self) -> &str {
        &self.info.description
    }

    /// Author
    pub fn author(&self) -> &str {
        &self.info.author
    }

    /// Version
    pub fn version(&self) -> &str {
        &self.info.version
    }

    /// Maximum number of trailing input characters rules look at
    pub fn max_key_length(&self) -> usize {
        self.info.max_key_length
    }

    /// Maximum number of trailing context characters rules look at
    pub fn context_length(&self) -> usize {
        self.info.context_length
    }

    /// Rules in priority order
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the rule set has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Byte offset of the last `chars` characters of `text`
pub(crate) fn tail_start(text: &str, chars: usize) -> usize {
    if chars == 0 {
        return text.len();
    }
    text.char_indices()
        .rev()
        .nth(chars - 1)
        .map_or(0, |(offset, _)| offset)
}

/// Incremental construction of a [`RuleSet`]
#[derive(Debug, Clone)]
pub struct RuleSetBuilder {
    info: RuleSetInfo,
    rules: Vec<PatternRule>,
}

impl RuleSetBuilder {
    /// Create a builder for a rule set with the given id
    pub fn new(id: impl Into<String>) -> Self {
        RuleSetBuilder {
            info: RuleSetInfo::new(id),
            rules: Vec::new(),
        }
    }

    /// Set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.info.name = name.into();
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.info.description = description.into();
        self
    }

    /// Set the author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.info.author = author.into();
        self
    }

    /// Set the version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.info.version = version.into();
        self
    }

    /// Set the maximum key length
    pub fn max_key_length(mut self, max_key_length: usize) -> Self {
        self.info.max_key_length = max_key_length;
        self
    }

    /// Set the context length
    pub fn context_length(mut self, context_length: usize) -> Self {
        self.info.context_length = context_length;
        self
    }

    /// Append a rule; it has lower priority than every rule added before
    pub fn rule(mut self, rule: PatternRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append a rule in place
    pub fn push_rule(&mut self, rule: PatternRule) {
        self.rules.push(rule);
    }

    /// Number of rules added so far
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules have been added
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Finish the rule set
    pub fn build(self) -> RuleSet {
        RuleSet::new(self.info, self.rules)
    }
}
