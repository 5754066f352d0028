//! WebAssembly bindings for JavaScript
//!
//! This module provides WASM bindings using wasm-bindgen for browser input
//! methods and Node.js. Enable with the "wasm" feature flag.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::rule::PatternRule;
#[cfg(feature = "wasm")]
use crate::ruleset::{RuleSet, RuleSetBuilder};

/// JavaScript-facing rule set builder
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct JsRuleSetBuilder {
    builder: Option<RuleSetBuilder>,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl JsRuleSetBuilder {
    /// Start a rule set with the given id
    #[wasm_bindgen(constructor)]
    pub fn new(id: &str) -> JsRuleSetBuilder {
        JsRuleSetBuilder {
            builder: Some(RuleSet::builder(id)),
        }
    }

    /// Set display name
    #[wasm_bindgen(js_name = setName)]
    pub fn set_name(&mut self, name: &str) -> Result<(), JsValue> {
        self.update(|b| b.name(name))
    }

    /// Set description
    #[wasm_bindgen(js_name = setDescription)]
    pub fn set_description(&mut self, description: &str) -> Result<(), JsValue> {
        self.update(|b| b.description(description))
    }

    /// Set author
    #[wasm_bindgen(js_name = setAuthor)]
    pub fn set_author(&mut self, author: &str) -> Result<(), JsValue> {
        self.update(|b| b.author(author))
    }

    /// Set version
    #[wasm_bindgen(js_name = setVersion)]
    pub fn set_version(&mut self, version: &str) -> Result<(), JsValue> {
        self.update(|b| b.version(version))
    }

    /// Set how many trailing characters of input and context a host passes
    #[wasm_bindgen(js_name = setLengths)]
    pub fn set_lengths(&mut self, max_key_length: usize, context_length: usize) -> Result<(), JsValue> {
        self.update(|b| b.max_key_length(max_key_length).context_length(context_length))
    }

    /// Append a rule
    ///
    /// Returns an error string if a pattern or the template is invalid
    #[wasm_bindgen(js_name = addRule)]
    pub fn add_rule(
        &mut self,
        input: &str,
        replacement: &str,
        context: Option<String>,
        alt_gr: bool,
    ) -> Result<(), JsValue> {
        let rule = PatternRule::new(input, replacement)
            .and_then(|rule| match context.as_deref() {
                Some(context) => rule.with_context(context),
                None => Ok(rule),
            })
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.update(|b| b.rule(rule.with_alt_gr(alt_gr)))
    }

    /// Finish the rule set
    pub fn build(&mut self) -> Result<JsRuleSet, JsValue> {
        self.builder
            .take()
            .map(|builder| JsRuleSet {
                rule_set: builder.build(),
            })
            .ok_or_else(|| JsValue::from_str("builder already consumed"))
    }
}

#[cfg(feature = "wasm")]
impl JsRuleSetBuilder {
    fn update(&mut self, f: impl FnOnce(RuleSetBuilder) -> RuleSetBuilder) -> Result<(), JsValue> {
        let builder = self
            .builder
            .take()
            .ok_or_else(|| JsValue::from_str("builder already consumed"))?;
        self.builder = Some(f(builder));
        Ok(())
    }
}

/// JavaScript-facing rule set wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct JsRuleSet {
    rule_set: RuleSet,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl JsRuleSet {
    /// Transliterate a buffer
    pub fn transliterate(&self, input: &str, context: &str, alt_gr: bool) -> String {
        self.rule_set.transliterate(input, context, alt_gr)
    }

    /// Append a keystroke to a buffer and transliterate the tail
    #[wasm_bindgen(js_name = transliterateKeystroke)]
    pub fn transliterate_keystroke(&self, buffer: &str, key: &str, context: &str, alt_gr: bool) -> String {
        self.rule_set
            .transliterate_keystroke(buffer, key, context, alt_gr)
    }

    /// Rule set id
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> String {
        self.rule_set.id().to_string()
    }

    /// Display name
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.rule_set.name().to_string()
    }

    /// Maximum key length
    #[wasm_bindgen(getter, js_name = maxKeyLength)]
    pub fn max_key_length(&self) -> usize {
        self.rule_set.max_key_length()
    }

    /// Context length
    #[wasm_bindgen(getter, js_name = contextLength)]
    pub fn context_length(&self) -> usize {
        self.rule_set.context_length()
    }

    /// Rule input patterns in priority order
    #[wasm_bindgen(getter)]
    pub fn inputs(&self) -> js_sys::Array {
        self.rule_set
            .rules()
            .iter()
            .map(|rule| JsValue::from_str(rule.input()))
            .collect()
    }
}

/// Initialize panic hook for better error messages in WASM
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}
