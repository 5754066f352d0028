//! Keystroke-by-keystroke composition on top of a rule set
//!
//! The composer keeps the composed text and the recent raw keystrokes. Each
//! key press hands the tail of the text plus the new key to the rule set, with
//! the recent keystrokes as the context buffer, the way a host input method
//! would drive the engine. Only the last `context_length` keystrokes are kept.

use crate::ruleset::{RuleSet, tail_start};

/// Composition state for one text field
#[derive(Debug, Clone)]
pub struct Composer<'r> {
    rules: &'r RuleSet,
    text: String,
    keys: String,
}

impl<'r> Composer<'r> {
    /// Create an empty composer
    pub fn new(rules: &'r RuleSet) -> Self {
        Self {
            rules,
            text: String::new(),
            keys: String::new(),
        }
    }

    /// The composed text so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Recent raw keystrokes, at most `context_length` of them, most recent last
    pub fn keys(&self) -> &str {
        &self.keys
    }

    /// The rule set driving this composer
    pub fn rules(&self) -> &'r RuleSet {
        self.rules
    }

    /// Apply one key press and return the new composed text
    pub fn press(&mut self, key: char, alt_gr: bool) -> &str {
        let mut encoded = [0u8; 4];
        let key_str = key.encode_utf8(&mut encoded);

        self.text = self
            .rules
            .transliterate_keystroke(&self.text, key_str, &self.keys, alt_gr);
        self.keys.push(key);
        let start = tail_start(&self.keys, self.rules.context_length());
        self.keys.drain(..start);
        &self.text
    }

    /// Apply every character of `keys` without the modifier
    pub fn type_str(&mut self, keys: &str) -> &str {
        for key in keys.chars() {
            self.press(key, false);
        }
        &self.text
    }

    /// Clear text and keystroke history
    pub fn clear(&mut self) {
        self.text.clear();
        self.keys.clear();
    }

    /// Take the composed text and start over
    pub fn commit(&mut self) -> String {
        self.keys.clear();
        std::mem::take(&mut self.text)
    }
}
