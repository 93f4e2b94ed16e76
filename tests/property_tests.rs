//! Property-based tests through the public matching rule API

use ldapschema::{ConditionResult, Schema};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_integer_ordering_agrees_with_numbers(a in any::<i64>(), b in any::<i64>()) {
        let schema = Schema::core();
        let rule = schema.get_matching_rule("integerOrderingMatch").unwrap();
        let less_than_b = rule.get_assertion(&schema, b.to_string().as_bytes()).unwrap();
        let result = rule.evaluate(&schema, less_than_b.as_ref(), a.to_string().as_bytes());
        prop_assert_eq!(result, ConditionResult::from_bool(a < b));
    }

    #[test]
    fn prop_integer_equality_ignores_leading_zeros(n in 0u64..1_000_000, zeros in 0usize..4) {
        let schema = Schema::core();
        let rule = schema.get_matching_rule("integerMatch").unwrap();
        let padded = format!("{}{}", "0".repeat(zeros), n);
        let assertion = rule.get_assertion(&schema, padded.as_bytes()).unwrap();
        prop_assert_eq!(
            rule.evaluate(&schema, assertion.as_ref(), n.to_string().as_bytes()),
            ConditionResult::True
        );
    }

    #[test]
    fn prop_ordered_words_match_as_substrings(words in proptest::collection::vec("[a-z]{1,6}", 1..6), keep in any::<u8>()) {
        let schema = Schema::core();
        let rule = schema.get_matching_rule("caseIgnoreSubstringsMatch").unwrap();
        let value = words.join(" ");
        // any subsequence of the words, in order, matches
        let any: Vec<&[u8]> = words
            .iter()
            .enumerate()
            .filter(|(i, _)| keep & (1 << (i % 8)) != 0)
            .map(|(_, w)| w.as_bytes())
            .collect();
        let assertion = rule.get_substring_assertion(&schema, None, &any, None).unwrap();
        prop_assert_eq!(
            rule.evaluate(&schema, assertion.as_ref(), value.to_uppercase().as_bytes()),
            ConditionResult::True
        );
    }

    #[test]
    fn prop_dn_normalization_ignores_case(uid in "[a-zA-Z][a-zA-Z0-9]{0,8}", dc in "[a-zA-Z]{1,8}") {
        let schema = Schema::core();
        let rule = schema.get_matching_rule("distinguishedNameMatch").unwrap();
        let upper = format!("UID={},DC={},DC=net", uid, dc);
        let lower = upper.to_lowercase();
        prop_assert_eq!(
            rule.normalize_attribute_value(&schema, upper.as_bytes()).unwrap(),
            rule.normalize_attribute_value(&schema, lower.as_bytes()).unwrap()
        );
    }
}
