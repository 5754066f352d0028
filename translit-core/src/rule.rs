//! Pattern rules and the matches they produce
//!
//! A [`PatternRule`] tests the end of the input buffer, optionally the end of
//! a context buffer, and the modifier state. Patterns are compiled once when
//! the rule is built; a rule that exists always has valid patterns and a
//! template that fits its group count.

use regex::{Captures, Regex};

use crate::error::{DefinitionErrorKind, Result, TranslitError};
use crate::replace::Replacement;

/// A successful rule match against an input buffer
///
/// Group 0 is the whole match. Groups that exist in the pattern but did not
/// participate are kept as `None`, never as empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedMatch<'h> {
    haystack: &'h str,
    groups: Vec<Option<(usize, usize)>>,
}

impl<'h> CapturedMatch<'h> {
    /// Build a match from raw byte spans
    ///
    /// `groups[0]` must be the span of the whole match.
    pub(crate) fn from_spans(haystack: &'h str, groups: Vec<Option<(usize, usize)>>) -> Self {
        CapturedMatch { haystack, groups }
    }

    fn from_captures(haystack: &'h str, captures: &Captures<'h>) -> Self {
        let groups = captures
            .iter()
            .map(|group| group.map(|m| (m.start(), m.end())))
            .collect();
        CapturedMatch { haystack, groups }
    }

    /// Byte offset where the match starts
    pub fn start(&self) -> usize {
        self.span().0
    }

    /// Byte offset where the match ends (exclusive)
    pub fn end(&self) -> usize {
        self.span().1
    }

    fn span(&self) -> (usize, usize) {
        self.groups.first().copied().flatten().unwrap_or((0, 0))
    }

    /// The matched text
    pub fn as_str(&self) -> &'h str {
        let (start, end) = self.span();
        &self.haystack[start..end]
    }

    /// Text of group `n`, or `None` if the group did not participate
    pub fn group(&self, n: usize) -> Option<&'h str> {
        self.groups
            .get(n)
            .copied()
            .flatten()
            .map(|(start, end)| &self.haystack[start..end])
    }

    /// Number of capture groups, excluding group 0
    pub fn group_count(&self) -> usize {
        self.groups.len().saturating_sub(1)
    }
}

/// One transformation rule
#[derive(Debug, Clone)]
pub struct PatternRule {
    input: String,
    context: Option<String>,
    replacement: String,
    alt_gr: bool,
    input_regex: Regex,
    anchored_input: Regex,
    anchored_context: Option<Regex>,
    template: Replacement,
}

impl PatternRule {
    /// Compile a rule without context that applies when the modifier is up
    ///
    /// # Errors
    /// [`TranslitError::MalformedDefinition`] if `input` does not compile,
    /// [`TranslitError::InvalidBackreference`] if `replacement` refers to
    /// groups the pattern does not have.
    pub fn new(input: &str, replacement: &str) -> Result<Self> {
        let input_regex = compile(input)?;
        let anchored_input = compile_anchored(input)?;
        let template = Replacement::parse(replacement, input_regex.captures_len() - 1)?;

        Ok(PatternRule {
            input: input.to_string(),
            context: None,
            replacement: replacement.to_string(),
            alt_gr: false,
            input_regex,
            anchored_input,
            anchored_context: None,
            template,
        })
    }

    /// Require the end of the context buffer to match `context`
    pub fn with_context(mut self, context: &str) -> Result<Self> {
        self.anchored_context = Some(compile_anchored(context)?);
        self.context = Some(context.to_string());
        Ok(self)
    }

    /// Set the modifier state this rule is keyed to
    pub fn with_alt_gr(mut self, alt_gr: bool) -> Self {
        self.alt_gr = alt_gr;
        self
    }

    /// Test this rule against the buffers and modifier state
    ///
    /// Returns the input match when every predicate holds.
    pub fn matches<'h>(
        &self,
        input: &'h str,
        context: &str,
        alt_gr: bool,
    ) -> Option<CapturedMatch<'h>> {
        let captures = self.anchored_input.captures(input)?;

        if let Some(anchored_context) = &self.anchored_context
            && !anchored_context.is_match(context)
        {
            return None;
        }

        if self.alt_gr != alt_gr {
            return None;
        }

        Some(CapturedMatch::from_captures(input, &captures))
    }

    /// The input pattern as written
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The context pattern as written, if any
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// The replacement template as written
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Modifier state this rule is keyed to
    pub fn alt_gr(&self) -> bool {
        self.alt_gr
    }

    /// The parsed replacement template
    pub fn template(&self) -> &Replacement {
        &self.template
    }

    /// The unanchored input pattern, used for substitution
    pub(crate) fn input_regex(&self) -> &Regex {
        &self.input_regex
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| invalid_pattern(pattern, e))
}

fn compile_anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("(?:{pattern})$")).map_err(|e| invalid_pattern(pattern, e))
}

fn invalid_pattern(pattern: &str, error: regex::Error) -> TranslitError {
    TranslitError::malformed(DefinitionErrorKind::InvalidPattern {
        pattern: pattern.to_string(),
        message: error.to_string(),
    })
}
