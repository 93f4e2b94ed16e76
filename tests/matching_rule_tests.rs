//! Matching rule integration tests
//!
//! Rules are reached through the attribute types of the core schema, the way
//! a directory server evaluates search filters.

use ldapschema::schema::constants::*;
use ldapschema::{ConditionResult, Error, Schema};
use pretty_assertions::assert_eq;

fn equality(schema: &Schema, attribute: &str, assertion: &str, value: &str) -> ConditionResult {
    let rule = schema
        .get_attribute_type(attribute)
        .unwrap()
        .equality_matching_rule()
        .clone();
    let assertion = rule.get_assertion(schema, assertion.as_bytes()).unwrap();
    rule.evaluate(schema, assertion.as_ref(), value.as_bytes())
}

fn substring(schema: &Schema, attribute: &str, filter: &str, value: &str) -> ConditionResult {
    let rule = schema
        .get_attribute_type(attribute)
        .unwrap()
        .substring_matching_rule()
        .clone();
    let assertion = rule.get_assertion(schema, filter.as_bytes()).unwrap();
    rule.evaluate(schema, assertion.as_ref(), value.as_bytes())
}

// ============================================================================
// Equality
// ============================================================================

#[test]
fn test_case_ignore_attribute() {
    let schema = Schema::core();
    assert_eq!(equality(&schema, "cn", "  John   SMITH ", "john smith"), ConditionResult::True);
    assert_eq!(equality(&schema, "cn", "John Smith", "John Smyth"), ConditionResult::False);
}

#[test]
fn test_generalized_time_equality() {
    let schema = Schema::core();
    assert_eq!(
        equality(&schema, "createTimestamp", "20060906130000.000Z", "2006090613Z"),
        ConditionResult::True
    );
    assert_eq!(
        equality(&schema, "createTimestamp", "20060906135030.012Z", "20060906135030.0118Z"),
        ConditionResult::True
    );
    assert_eq!(
        equality(&schema, "createTimestamp", "20060906155030+0200", "20060906135030Z"),
        ConditionResult::True
    );
    assert_eq!(
        equality(&schema, "createTimestamp", "20060906130000Z", "not a time"),
        ConditionResult::Undefined
    );
}

#[test]
fn test_distinguished_name_equality() {
    let schema = Schema::core();
    assert_eq!(
        equality(&schema, "member", "UID=jsmith,DC=example,DC=net", "uid=jsmith,dc=example,dc=net"),
        ConditionResult::True
    );
    assert_eq!(
        equality(
            &schema,
            "member",
            "givenName=John+cn=Doe,dc=example,dc=net",
            "cn=doe+givenname=john,dc=example,dc=net"
        ),
        ConditionResult::True
    );
    assert_eq!(
        equality(&schema, "member", "cn=doe+sn=john", "cn=doe,sn=john"),
        ConditionResult::False
    );

    let rule = schema.get_matching_rule("distinguishedNameMatch").unwrap();
    let once = rule
        .normalize_attribute_value(&schema, b"CN=Doe+givenName=John,O=Acme\\, Inc.,C=US")
        .unwrap();
    assert!(matches!(
        rule.get_assertion(&schema, b"cn=missing,value"),
        Err(Error::Decode(_))
    ));
    assert!(!once.is_empty());
}

#[test]
fn test_integer_matching_is_lenient() {
    let schema = Schema::core();
    let rule = schema.get_matching_rule("integerMatch").unwrap();
    let assertion = rule.get_assertion(&schema, b"+0042").unwrap();
    assert_eq!(rule.evaluate(&schema, assertion.as_ref(), b"42"), ConditionResult::True);
    assert_eq!(rule.evaluate(&schema, assertion.as_ref(), b"x"), ConditionResult::Undefined);

    // The syntax stays strict
    let syntax = schema.get_syntax(SYNTAX_INTEGER_OID).unwrap();
    assert!(syntax.value_is_acceptable(&schema, b"42"));
    assert!(!syntax.value_is_acceptable(&schema, b"+0042"));
}

#[test]
fn test_misc_equality_rules() {
    let schema = Schema::core();
    let check = |rule: &str, assertion: &str, value: &str| {
        let rule = schema.get_matching_rule(rule).unwrap();
        let assertion = rule.get_assertion(&schema, assertion.as_bytes()).unwrap();
        rule.evaluate(&schema, assertion.as_ref(), value.as_bytes())
    };

    assert_eq!(check("telephoneNumberMatch", "+1 408 555 1212", "+1-408-555-1212"), ConditionResult::True);
    assert_eq!(check("booleanMatch", "true", "TRUE"), ConditionResult::True);
    assert_eq!(
        check("uuidMatch", "12345678-9ABC-DEF0-1234-1234567890AB", "12345678-9abc-def0-1234-1234567890ab"),
        ConditionResult::True
    );
    assert_eq!(check("numericStringMatch", "12 34", "1234"), ConditionResult::True);
    assert_eq!(check("caseExactMatch", "Doe", "doe"), ConditionResult::False);
    assert_eq!(check("objectIdentifierMatch", "person", "2.5.6.6"), ConditionResult::True);
}

#[test]
fn test_approximate_match() {
    let schema = Schema::core();
    let rule = schema
        .get_attribute_type("cn")
        .unwrap()
        .approximate_matching_rule()
        .clone();
    let assertion = rule.get_assertion(&schema, b"John Smith").unwrap();
    assert_eq!(rule.evaluate(&schema, assertion.as_ref(), b"jon SMYTH"), ConditionResult::True);
    assert_eq!(rule.evaluate(&schema, assertion.as_ref(), b"John Jones"), ConditionResult::False);
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_ordering_assertions() {
    let schema = Schema::core();
    let rule = schema.get_matching_rule("integerOrderingMatch").unwrap();

    let less = rule.get_assertion(&schema, b"10").unwrap();
    assert_eq!(rule.evaluate(&schema, less.as_ref(), b"9"), ConditionResult::True);
    assert_eq!(rule.evaluate(&schema, less.as_ref(), b"10"), ConditionResult::False);
    assert_eq!(rule.evaluate(&schema, less.as_ref(), b"-100"), ConditionResult::True);

    let ge = rule.get_greater_or_equal_assertion(&schema, b"10").unwrap();
    assert_eq!(rule.evaluate(&schema, ge.as_ref(), b"10"), ConditionResult::True);
    assert_eq!(rule.evaluate(&schema, ge.as_ref(), b"100000000000000000000"), ConditionResult::True);

    let le = rule.get_less_or_equal_assertion(&schema, b"-1").unwrap();
    assert_eq!(rule.evaluate(&schema, le.as_ref(), b"0"), ConditionResult::False);
}

#[test]
fn test_case_ignore_ordering() {
    let schema = Schema::core();
    let rule = schema.get_attribute_type("sn").unwrap().ordering_matching_rule().clone();
    let ge = rule.get_greater_or_equal_assertion(&schema, b"m").unwrap();
    assert_eq!(rule.evaluate(&schema, ge.as_ref(), b"Smith"), ConditionResult::True);
    assert_eq!(rule.evaluate(&schema, ge.as_ref(), b"Adams"), ConditionResult::False);
}

#[test]
fn test_equality_rule_refuses_other_assertions() {
    let schema = Schema::core();
    let rule = schema.get_matching_rule("caseIgnoreMatch").unwrap();
    assert!(matches!(
        rule.get_greater_or_equal_assertion(&schema, b"x"),
        Err(Error::Unsupported(_))
    ));
}

// ============================================================================
// Substrings
// ============================================================================

#[test]
fn test_substring_components_in_order() {
    let schema = Schema::core();
    assert_eq!(
        substring(&schema, "description", "*this*is*a*value*", "this is a value"),
        ConditionResult::True
    );
    assert_eq!(
        substring(&schema, "description", "*value*this*", "this is a value"),
        ConditionResult::False
    );
    assert_eq!(
        substring(&schema, "description", "THIS*VALUE", "this is a value"),
        ConditionResult::True
    );
    assert_eq!(
        substring(&schema, "description", "this*a*value*", "this value"),
        ConditionResult::False
    );
}

#[test]
fn test_substring_components_api() {
    let schema = Schema::core();
    let rule = schema.get_matching_rule("caseIgnoreSubstringsMatch").unwrap();
    let any: [&[u8]; 2] = [b"cd", b"EF"];
    let assertion = rule
        .get_substring_assertion(&schema, Some(b"AB"), &any, Some(b"gh"))
        .unwrap();
    assert_eq!(rule.evaluate(&schema, assertion.as_ref(), b"abcdefgh"), ConditionResult::True);
    assert_eq!(rule.evaluate(&schema, assertion.as_ref(), b"abefcdgh"), ConditionResult::False);
}

#[test]
fn test_malformed_substring_filter() {
    let schema = Schema::core();
    let rule = schema.get_matching_rule("caseIgnoreSubstringsMatch").unwrap();
    assert!(matches!(rule.get_assertion(&schema, b"no wildcard"), Err(Error::Decode(_))));
}
