//! Attribute type elements

use crate::schema::base::{impl_schema_element, AttributeUsage, ExtraProperties, OidSchemaElement};
use crate::schema::matching_rules::MatchingRule;
use crate::schema::syntaxes::Syntax;
use std::sync::Arc;

/// Parsed attribute type description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeTypeDescription {
    /// Numeric OID
    pub oid: String,
    /// Names, primary name first
    pub names: Vec<String>,
    /// Free-text description
    pub description: String,
    /// OBSOLETE flag
    pub obsolete: bool,
    /// Superior attribute type (name or OID)
    pub superior: Option<String>,
    /// Syntax OID
    pub syntax: Option<String>,
    /// Equality matching rule (name or OID)
    pub equality_matching_rule: Option<String>,
    /// Ordering matching rule (name or OID)
    pub ordering_matching_rule: Option<String>,
    /// Substring matching rule (name or OID)
    pub substring_matching_rule: Option<String>,
    /// Approximate matching rule (name or OID)
    pub approximate_matching_rule: Option<String>,
    /// SINGLE-VALUE flag
    pub single_value: bool,
    /// COLLECTIVE flag
    pub collective: bool,
    /// NO-USER-MODIFICATION flag
    pub no_user_modification: bool,
    /// Intended use
    pub usage: AttributeUsage,
    /// Extension properties
    pub extra_properties: ExtraProperties,
}

/// A matching rule bound to one slot of an attribute type
#[derive(Debug, Clone)]
pub(crate) struct RuleSlot {
    pub(crate) rule: Arc<MatchingRule>,
    /// Filled with the schema default because nothing else supplied a rule
    pub(crate) defaulted: bool,
}

impl RuleSlot {
    pub(crate) fn bound(rule: Arc<MatchingRule>) -> Self {
        Self { rule, defaulted: false }
    }

    pub(crate) fn defaulted(rule: Arc<MatchingRule>) -> Self {
        Self { rule, defaulted: true }
    }

    /// The rule a subtype inherits, if this slot was not defaulted
    pub(crate) fn inheritable(&self) -> Option<&Arc<MatchingRule>> {
        (!self.defaulted).then_some(&self.rule)
    }
}

/// A validated attribute type with its inherited bindings resolved
#[derive(Debug, Clone)]
pub struct AttributeType {
    pub(crate) definition: AttributeTypeDescription,
    pub(crate) superior: Option<Arc<AttributeType>>,
    pub(crate) syntax: Arc<Syntax>,
    pub(crate) equality: RuleSlot,
    pub(crate) ordering: RuleSlot,
    pub(crate) substring: RuleSlot,
    pub(crate) approximate: RuleSlot,
}

impl_schema_element!(AttributeType, oid);

impl AttributeType {
    /// The description this attribute type was built from
    pub fn definition(&self) -> &AttributeTypeDescription {
        &self.definition
    }

    /// Superior attribute type
    pub fn superior(&self) -> Option<&Arc<AttributeType>> {
        self.superior.as_ref()
    }

    /// Effective syntax
    pub fn syntax(&self) -> &Arc<Syntax> {
        &self.syntax
    }

    /// Effective equality matching rule
    pub fn equality_matching_rule(&self) -> &Arc<MatchingRule> {
        &self.equality.rule
    }

    /// Effective ordering matching rule
    pub fn ordering_matching_rule(&self) -> &Arc<MatchingRule> {
        &self.ordering.rule
    }

    /// Effective substring matching rule
    pub fn substring_matching_rule(&self) -> &Arc<MatchingRule> {
        &self.substring.rule
    }

    /// Effective approximate matching rule
    pub fn approximate_matching_rule(&self) -> &Arc<MatchingRule> {
        &self.approximate.rule
    }

    /// Intended use
    pub fn usage(&self) -> AttributeUsage {
        self.definition.usage
    }

    /// Returns true for operational attribute types
    pub fn is_operational(&self) -> bool {
        self.definition.usage.is_operational()
    }

    /// SINGLE-VALUE flag
    pub fn is_single_value(&self) -> bool {
        self.definition.single_value
    }

    /// COLLECTIVE flag
    pub fn is_collective(&self) -> bool {
        self.definition.collective
    }

    /// NO-USER-MODIFICATION flag
    pub fn is_no_user_modification(&self) -> bool {
        self.definition.no_user_modification
    }

    /// Returns true if this type is `other` or one of its subtypes
    pub fn is_sub_type_of(&self, other: &AttributeType) -> bool {
        let mut current = Some(self);
        while let Some(attribute_type) = current {
            if attribute_type.oid() == other.oid() {
                return true;
            }
            current = attribute_type.superior.as_deref();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::constants::*;
    use crate::schema::{OidSchemaElement, Schema};

    #[test]
    fn test_core_attribute_bindings() {
        let schema = Schema::core();
        let cn = schema.get_attribute_type("commonName").unwrap();
        assert_eq!(cn.oid(), "2.5.4.3");
        assert_eq!(cn.syntax().oid(), SYNTAX_DIRECTORY_STRING_OID);
        assert_eq!(cn.equality_matching_rule().oid(), EMR_CASE_IGNORE_OID);
        assert_eq!(cn.substring_matching_rule().oid(), SMR_CASE_IGNORE_OID);

        let name = schema.get_attribute_type("name").unwrap();
        assert!(cn.is_sub_type_of(&name));
        assert!(!name.is_sub_type_of(&cn));
    }
}
