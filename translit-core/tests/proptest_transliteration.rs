//! Property-based tests for rule selection and template expansion.
//!
//! 1. **Identity**: no applicable rule ⇒ output equals input
//! 2. **Modifier exactness**: a rule never fires under the other modifier state
//! 3. **Context neutrality**: context-free rules ignore the context buffer
//! 4. **Escape literalness**: `\x` in a template always yields `x`
//! 5. **Absent groups**: unmatched optional groups expand to nothing

use proptest::prelude::*;
use translit_core::{PatternRule, RuleSet};

fn arb_latin() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z ]{0,16}").unwrap()
}

fn arb_digits() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9]{0,16}").unwrap()
}

fn latin_rules() -> RuleSet {
    RuleSet::builder("latin")
        .rule(PatternRule::new("([a-z])h", "$1ʰ").unwrap())
        .rule(PatternRule::new("aa", "ā").unwrap())
        .rule(PatternRule::new("q", "Q").unwrap().with_alt_gr(true))
        .build()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn identity_without_applicable_rule(input in arb_digits(), context in arb_latin(), alt_gr in any::<bool>()) {
        // No rule can match a buffer of digits
        let rules = latin_rules();
        prop_assert_eq!(rules.transliterate(&input, &context, alt_gr), input);
    }

    #[test]
    fn alt_gr_rule_needs_alt_gr(prefix in arb_latin()) {
        let rules = latin_rules();
        let input = format!("{prefix}q");
        prop_assert_eq!(rules.transliterate(&input, "", false), input.clone());
        prop_assert!(rules.transliterate(&input, "", true).ends_with('Q'));
    }

    #[test]
    fn plain_rule_never_fires_with_alt_gr(prefix in arb_latin()) {
        let rules = RuleSet::builder("plain")
            .rule(PatternRule::new("x", "y").unwrap())
            .build();
        let input = format!("{prefix}x");
        prop_assert_eq!(rules.transliterate(&input, "", true), input);
    }

    #[test]
    fn context_free_rule_ignores_context(prefix in arb_latin(), context in arb_latin()) {
        let rules = latin_rules();
        let input = format!("{prefix}kh");
        prop_assert_eq!(
            rules.transliterate(&input, &context, false),
            rules.transliterate(&input, "", false)
        );
    }

    #[test]
    fn escaped_characters_are_literal(c in any::<char>()) {
        let template = format!("\\{c}");
        let rules = RuleSet::builder("escape")
            .rule(PatternRule::new("z", &template).unwrap())
            .build();
        prop_assert_eq!(rules.transliterate("z", "", false), c.to_string());
    }

    #[test]
    fn absent_group_expands_to_nothing(prefix in arb_digits()) {
        let rules = RuleSet::builder("optional")
            .rule(PatternRule::new("(x)?a", "[$1]").unwrap())
            .build();
        let input = format!("{prefix}a");
        prop_assert_eq!(rules.transliterate(&input, "", false), format!("{prefix}[]"));
    }
}
