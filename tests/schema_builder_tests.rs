//! Schema builder integration tests
//!
//! These tests build schemas on top of the core schema through the public
//! builder API and inspect the frozen snapshots.

use ldapschema::matching::rules::SimpleCollator;
use ldapschema::schema::constants::*;
use ldapschema::schema::{AttributeUsage, ObjectClassType};
use ldapschema::{ConditionResult, Error, OidSchemaElement, Schema, SchemaBuilder, SchemaElement, SchemaOptions};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn core_builder() -> SchemaBuilder {
    SchemaBuilder::from_schema(&Schema::core())
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_inherits_everything_from_object_class_attribute() {
    let mut builder = core_builder();
    builder
        .build_attribute_type("1.2.3")
        .superior_type(OBJECT_CLASS_OID)
        .add_to_schema()
        .unwrap();
    let schema = builder.to_schema();

    assert!(schema.warnings().is_empty(), "{:?}", schema.warnings());
    let child = schema.get_attribute_type("1.2.3").unwrap();
    let parent = schema.get_attribute_type(OBJECT_CLASS_OID).unwrap();
    assert_eq!(child.syntax().oid(), parent.syntax().oid());
    assert_eq!(child.equality_matching_rule().oid(), parent.equality_matching_rule().oid());
    assert_eq!(child.ordering_matching_rule().oid(), parent.ordering_matching_rule().oid());
    assert_eq!(child.substring_matching_rule().oid(), parent.substring_matching_rule().oid());
    assert_eq!(
        child.approximate_matching_rule().oid(),
        parent.approximate_matching_rule().oid()
    );
    assert!(child.is_sub_type_of(parent));
}

#[test]
fn test_staging_order_does_not_matter() {
    let stage_parent = |builder: &mut SchemaBuilder| {
        builder
            .build_attribute_type("1.2.3.100")
            .name("parentType")
            .syntax(SYNTAX_INTEGER_OID)
            .add_to_schema()
            .unwrap();
    };
    let stage_child = |builder: &mut SchemaBuilder| {
        builder
            .build_attribute_type("1.2.3.101")
            .name("childType")
            .superior_type("parentType")
            .add_to_schema()
            .unwrap();
    };

    let mut parent_first = core_builder();
    stage_parent(&mut parent_first);
    stage_child(&mut parent_first);
    let mut child_first = core_builder();
    stage_child(&mut child_first);
    stage_parent(&mut child_first);

    let a = parent_first.to_schema();
    let b = child_first.to_schema();
    assert!(a.warnings().is_empty());
    assert!(b.warnings().is_empty());

    let child_a = a.get_attribute_type("childType").unwrap();
    let child_b = b.get_attribute_type("childType").unwrap();
    assert_eq!(child_a.syntax().oid(), SYNTAX_INTEGER_OID);
    assert_eq!(child_a.syntax().oid(), child_b.syntax().oid());
    assert_eq!(
        child_a.equality_matching_rule().oid(),
        child_b.equality_matching_rule().oid()
    );
}

#[test]
fn test_unset_slot_uses_own_syntax_before_superior_fallback() {
    let mut builder = core_builder();
    builder
        .build_attribute_type("1.2.3.110")
        .name("flagParent")
        .syntax(SYNTAX_BOOLEAN_OID)
        .add_to_schema()
        .unwrap()
        .build_attribute_type("1.2.3.111")
        .name("countChild")
        .superior_type("flagParent")
        .syntax(SYNTAX_INTEGER_OID)
        .add_to_schema()
        .unwrap();
    let schema = builder.to_schema();
    assert!(schema.warnings().is_empty(), "{:?}", schema.warnings());

    let parent = schema.get_attribute_type("flagParent").unwrap();
    assert_eq!(parent.ordering_matching_rule().oid(), EMR_OCTET_STRING_OID);

    let child = schema.get_attribute_type("countChild").unwrap();
    // The superior's real equality rule is inherited
    assert_eq!(child.equality_matching_rule().oid(), EMR_BOOLEAN_OID);
    // Its defaulted ordering slot is not, the child's syntax supplies one
    assert_eq!(child.ordering_matching_rule().oid(), OMR_INTEGER_OID);

    let ordering = child.ordering_matching_rule();
    let at_least_ten = ordering.get_greater_or_equal_assertion(&schema, b"10").unwrap();
    assert_eq!(
        ordering.evaluate(&schema, at_least_ten.as_ref(), b"42"),
        ConditionResult::True
    );
    assert_eq!(
        ordering.evaluate(&schema, at_least_ten.as_ref(), b"7"),
        ConditionResult::False
    );
}

#[test]
fn test_excluded_element_does_not_shadow_names() {
    let mut builder = core_builder();
    builder
        .build_attribute_type("1.2.3.120")
        .name("c")
        .syntax("9.9.9.9")
        .add_to_schema()
        .unwrap()
        .build_attribute_type("1.2.3.121")
        .name("homeCountry")
        .superior_type("c")
        .add_to_schema()
        .unwrap()
        .build_object_class("1.2.3.122")
        .name("region")
        .superior_classes(["top"])
        .required_attributes(["c"])
        .add_to_schema()
        .unwrap();
    let schema = builder.to_schema();

    assert!(!schema.has_attribute_type("1.2.3.120"));
    assert_eq!(schema.warnings().len(), 1, "{:?}", schema.warnings());
    assert_eq!(schema.get_attribute_type("c").unwrap().oid(), "2.5.4.6");

    // References through the shared name reach the valid core type
    assert!(schema.has_object_class("country"));
    let region = schema.get_object_class("region").unwrap();
    assert!(region.required_attributes().any(|a| a.oid() == "2.5.4.6"));
    let home = schema.get_attribute_type("homeCountry").unwrap();
    assert_eq!(home.superior().unwrap().oid(), "2.5.4.6");
}

#[test]
fn test_invalid_elements_become_warnings() {
    let mut builder = core_builder();
    builder
        .build_attribute_type("1.2.3.200")
        .name("unknownSyntax")
        .syntax("9.9.9.9")
        .add_to_schema()
        .unwrap()
        .build_object_class("1.2.3.201")
        .name("needsMissing")
        .superior_classes(["top"])
        .required_attributes(["doesNotExist"])
        .add_to_schema()
        .unwrap();
    let schema = builder.to_schema();

    assert!(!schema.has_attribute_type("unknownSyntax"));
    assert!(!schema.has_object_class("needsMissing"));
    assert_eq!(schema.warnings().len(), 2, "{:?}", schema.warnings());
}

#[test]
fn test_object_class_inheritance() {
    let mut builder = core_builder();
    builder
        .build_object_class("1.2.3.300")
        .name("employee")
        .superior_classes(["inetOrgPerson"])
        .required_attributes(["employeeNumber"])
        .add_to_schema()
        .unwrap()
        .build_object_class("1.2.3.301")
        .name("badge")
        .object_class_type(ObjectClassType::Auxiliary)
        .optional_attributes(["description"])
        .add_to_schema()
        .unwrap();
    let schema = builder.to_schema();
    assert!(schema.warnings().is_empty(), "{:?}", schema.warnings());

    let employee = schema.get_object_class("employee").unwrap();
    assert_eq!(employee.object_class_type(), ObjectClassType::Structural);
    let required: Vec<&str> = employee.required_attributes().map(|a| a.name_or_oid()).collect();
    assert!(required.contains(&"employeeNumber"));
    assert!(required.contains(&"sn"));
    assert!(required.contains(&"objectClass"));
    assert!(employee.optional_attributes().all(|a| a.name_or_oid() != "employeeNumber"));

    let badge = schema.get_object_class("badge").unwrap();
    assert_eq!(badge.object_class_type(), ObjectClassType::Auxiliary);
    assert_eq!(badge.superiors()[0].oid(), TOP_OBJECTCLASS_OID);
}

#[test]
fn test_dit_rules() {
    let mut builder = core_builder();
    builder
        .build_name_form("1.2.3.400")
        .name("personNameForm")
        .structural_class("person")
        .required_attributes(["cn"])
        .add_to_schema()
        .unwrap()
        .build_dit_structure_rule(1)
        .name("personRule")
        .name_form("personNameForm")
        .add_to_schema()
        .unwrap()
        .build_dit_structure_rule(2)
        .name_form("personNameForm")
        .superior_rules([1])
        .add_to_schema()
        .unwrap()
        .build_dit_content_rule("person")
        .name("personContent")
        .auxiliary_classes(["uidObject"])
        .prohibited_attributes(["description"])
        .add_to_schema()
        .unwrap();
    let schema = builder.to_schema();
    assert!(schema.warnings().is_empty(), "{:?}", schema.warnings());

    let person = schema.get_object_class("person").unwrap();
    let forms = schema.name_forms_for(person);
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].oid(), "1.2.3.400");

    let rules = schema.dit_structure_rules_for(forms[0]);
    assert_eq!(rules.len(), 2);
    let child = schema.get_dit_structure_rule(2).unwrap();
    assert_eq!(child.superior_rules()[0].rule_id(), 1);
    assert_eq!(schema.get_dit_structure_rule_by_name("personRule").unwrap().rule_id(), 1);

    let content = schema.dit_content_rule_for(person).unwrap();
    assert_eq!(content.auxiliary_classes()[0].name_or_oid(), "uidObject");
    assert!(content
        .prohibited_attributes()
        .iter()
        .any(|a| a.has_name("description")));
}

// ============================================================================
// Conflicts and arguments
// ============================================================================

#[test]
fn test_conflicts_are_raised_at_add_time() {
    let core = Schema::core();
    let cn = core.get_attribute_type("cn").unwrap();
    let mut builder = SchemaBuilder::from_schema(&core);

    // Restaging the identical description is accepted
    builder.add_attribute_type(cn.definition().clone(), false).unwrap();

    let mut changed = cn.definition().clone();
    changed.description = "different".to_string();
    let result = builder.add_attribute_type(changed.clone(), false);
    assert!(matches!(result, Err(Error::ConflictingSchemaElement(_))));

    builder.add_attribute_type(changed, true).unwrap();
    assert_eq!(builder.to_schema().get_attribute_type("cn").unwrap().description(), "different");
}

#[test]
fn test_operational_attribute_via_builder() {
    let mut builder = core_builder();
    builder
        .build_attribute_type("1.2.3.500")
        .name("lastLoginTime")
        .syntax(SYNTAX_GENERALIZED_TIME_OID)
        .single_value(true)
        .no_user_modification(true)
        .usage(AttributeUsage::DirectoryOperation)
        .add_to_schema()
        .unwrap();
    let schema = builder.to_schema();
    assert!(schema.warnings().is_empty(), "{:?}", schema.warnings());

    let attr = schema.get_attribute_type("lastLoginTime").unwrap();
    assert!(attr.is_operational());
    assert!(attr.is_single_value());
    assert_eq!(attr.ordering_matching_rule().oid(), OMR_GENERALIZED_TIME_OID);
}

// ============================================================================
// Copy-on-write
// ============================================================================

#[test]
fn test_unmodified_builder_returns_base_instance() {
    let core = Schema::core();
    let schema = SchemaBuilder::from_schema(&core).to_schema();
    assert!(schema.is_same_instance(&core));
}

#[test]
fn test_options_change_produces_new_instance() {
    let core = Schema::core();
    let schema = SchemaBuilder::from_schema(&core)
        .with_options(SchemaOptions::new().with_allow_zero_length_directory_strings(true))
        .to_schema();
    assert!(!schema.is_same_instance(&core));
    assert!(schema.options().allow_zero_length_directory_strings);
    assert!(!core.options().allow_zero_length_directory_strings);
}

#[test]
fn test_to_builder_round_trip() {
    let core = Schema::core();
    let mut builder = core.to_builder();
    assert!(builder.to_schema().is_same_instance(&core));
}

// ============================================================================
// Extension syntaxes and collation rules
// ============================================================================

#[test]
fn test_enumeration_attribute() {
    let mut builder = core_builder();
    builder
        .add_enumeration_syntax("1.2.3.600", "Days", false, ["monday", "tuesday", "wednesday"])
        .unwrap()
        .build_attribute_type("1.2.3.601")
        .name("workDay")
        .syntax("1.2.3.600")
        .ordering_matching_rule(format!("{}1.2.3.600", OMR_ENUM_OID_PREFIX))
        .add_to_schema()
        .unwrap();
    let schema = builder.to_schema();
    assert!(schema.warnings().is_empty(), "{:?}", schema.warnings());

    let attr = schema.get_attribute_type("workDay").unwrap();
    assert!(attr.syntax().value_is_acceptable(&schema, b"Tuesday"));
    assert!(!attr.syntax().value_is_acceptable(&schema, b"sunday"));

    let ordering = attr.ordering_matching_rule();
    let before_wednesday = ordering.get_assertion(&schema, b"wednesday").unwrap();
    assert_eq!(
        ordering.evaluate(&schema, before_wednesday.as_ref(), b"monday"),
        ConditionResult::True
    );
    assert_eq!(
        ordering.evaluate(&schema, before_wednesday.as_ref(), b"wednesday"),
        ConditionResult::False
    );
    assert_eq!(
        ordering.evaluate(&schema, before_wednesday.as_ref(), b"sunday"),
        ConditionResult::Undefined
    );
}

#[test]
fn test_collation_rules() {
    let mut builder = core_builder();
    builder
        .add_collation_matching_rules("it", "1.3.6.1.4.1.42.2.27.9.4.94.1", Arc::new(SimpleCollator), false)
        .unwrap();
    let schema = builder.to_schema();
    assert!(schema.warnings().is_empty(), "{:?}", schema.warnings());

    let equality = schema.get_matching_rule("it").unwrap();
    let assertion = equality.get_assertion(&schema, b"Citta").unwrap();
    assert_eq!(equality.evaluate(&schema, assertion.as_ref(), b"citt\xc3\xa0"), ConditionResult::True);

    let less = schema.get_matching_rule("it.lt").unwrap();
    let assertion = less.get_assertion(&schema, b"b").unwrap();
    assert_eq!(less.evaluate(&schema, assertion.as_ref(), b"\xc3\x80rea"), ConditionResult::True);
}
