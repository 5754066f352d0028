//! Replacement template handling
//!
//! Templates mix literal text with two kinds of tokens:
//! - `\x` copies `x` literally
//! - `$n` inserts the text of capture group `n` (`$0` is the whole match)
//!
//! Group numbers are resolved greedily but never past the pattern's group
//! count: with three groups `$12` is group 1 followed by a literal `2`, while
//! with twelve groups it is group 12. A group that exists but did not take
//! part in the match expands to the empty string.
//!
//! The output of [`Replacement::apply`] is plain text. Callers must insert it
//! without further interpretation.

use crate::error::{BackreferenceErrorKind, Result, TranslitError};
use crate::rule::CapturedMatch;

/// A part of a replacement template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplacementPart {
    /// Literal text, escapes already resolved
    Literal(String),
    /// Capture group by number
    Group(usize),
}

/// A parsed replacement template, validated against a group count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    parts: Vec<ReplacementPart>,
    group_count: usize,
}

impl Replacement {
    /// Parse a template for a pattern with `group_count` capture groups
    ///
    /// `group_count` excludes the implicit whole-match group 0.
    ///
    /// # Errors
    /// Returns [`TranslitError::InvalidBackreference`] for a `$` without a
    /// following digit, a first digit naming a group beyond `group_count`, or
    /// a trailing `\`.
    pub fn parse(template: &str, group_count: usize) -> Result<Self> {
        let mut parts = Vec::new();
        let mut chars = template.chars().enumerate().peekable();
        let mut current_literal = String::new();

        let invalid = |position, reason| TranslitError::InvalidBackreference {
            template: template.to_string(),
            position,
            reason,
        };

        while let Some((position, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, escaped)) => current_literal.push(escaped),
                    None => return Err(invalid(position, BackreferenceErrorKind::DanglingEscape)),
                },
                '$' => {
                    let first = chars
                        .next_if(|(_, d)| d.is_ascii_digit())
                        .and_then(|(_, d)| d.to_digit(10))
                        .ok_or_else(|| invalid(position, BackreferenceErrorKind::MissingGroupNumber))?;

                    let mut group = first as usize;
                    if group > group_count {
                        return Err(invalid(
                            position,
                            BackreferenceErrorKind::NoSuchGroup { group, group_count },
                        ));
                    }

                    // Take the largest group number that still exists
                    while let Some(&(_, next)) = chars.peek() {
                        let Some(digit) = next.to_digit(10) else {
                            break;
                        };
                        let extended = group * 10 + digit as usize;
                        if extended > group_count {
                            break;
                        }
                        group = extended;
                        chars.next();
                    }

                    if !current_literal.is_empty() {
                        parts.push(ReplacementPart::Literal(std::mem::take(&mut current_literal)));
                    }
                    parts.push(ReplacementPart::Group(group));
                }
                _ => current_literal.push(c),
            }
        }

        if !current_literal.is_empty() {
            parts.push(ReplacementPart::Literal(current_literal));
        }

        Ok(Replacement { parts, group_count })
    }

    /// Resolve the template against a match
    ///
    /// Groups that did not participate contribute nothing.
    pub fn apply(&self, captured: &CapturedMatch<'_>) -> String {
        let mut result = String::new();

        for part in &self.parts {
            match part {
                ReplacementPart::Literal(text) => result.push_str(text),
                ReplacementPart::Group(n) => {
                    if let Some(text) = captured.group(*n) {
                        result.push_str(text);
                    }
                }
            }
        }

        result
    }

    /// Get the parts of the template
    pub fn parts(&self) -> &[ReplacementPart] {
        &self.parts
    }

    /// Number of capture groups this template was validated against
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Whether the template contains no group references
    pub fn is_literal(&self) -> bool {
        self.parts
            .iter()
            .all(|part| matches!(part, ReplacementPart::Literal(_)))
    }
}

/// Expand `template` against a completed match in one step
///
/// Equivalent to parsing with the match's group count and applying.
pub fn expand(template: &str, captured: &CapturedMatch<'_>) -> Result<String> {
    Ok(Replacement::parse(template, captured.group_count())?.apply(captured))
}
