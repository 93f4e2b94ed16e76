//! Matching rule and matching rule use elements

use crate::bytes::ByteString;
use crate::error::Result;
use crate::matching::assertion::{Assertion, ConditionResult};
use crate::matching::indexer::Indexer;
use crate::matching::rules::{
    core_implementation, EqualityMatchingRule, MatchingRuleDefinition, OctetStringNormalizer,
};
use crate::matching::{MatchingRuleImpl, MatchingRuleKind};
use crate::options::IndexingOptions;
use crate::schema::attribute_types::AttributeType;
use crate::schema::base::{impl_schema_element, ExtraProperties, OidSchemaElement};
use crate::schema::constants::EMR_OCTET_STRING_OID;
use crate::schema::syntaxes::Syntax;
use crate::schema::Schema;
use std::sync::Arc;

/// Parsed matching rule description
#[derive(Debug, Clone, Default)]
pub struct MatchingRuleDescription {
    /// Numeric OID
    pub oid: String,
    /// Names, primary name first
    pub names: Vec<String>,
    /// Free-text description
    pub description: String,
    /// OBSOLETE flag
    pub obsolete: bool,
    /// OID of the assertion syntax
    pub syntax: String,
    /// Extension properties
    pub extra_properties: ExtraProperties,
    /// Explicit behaviour; the core registry supplies it when absent
    pub implementation: Option<Arc<dyn MatchingRuleImpl>>,
}

impl PartialEq for MatchingRuleDescription {
    fn eq(&self, other: &Self) -> bool {
        let same_impl = match (&self.implementation, &other.implementation) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.oid == other.oid
            && self.names == other.names
            && self.description == other.description
            && self.obsolete == other.obsolete
            && self.syntax == other.syntax
            && self.extra_properties == other.extra_properties
            && same_impl
    }
}

impl From<&MatchingRuleDefinition> for MatchingRuleDescription {
    fn from(rule: &MatchingRuleDefinition) -> Self {
        Self {
            oid: rule.oid.clone(),
            names: rule.names.clone(),
            syntax: rule.syntax_oid.clone(),
            implementation: Some(rule.implementation.clone()),
            ..Default::default()
        }
    }
}

/// A validated matching rule bound to its assertion syntax
#[derive(Debug, Clone)]
pub struct MatchingRule {
    pub(crate) definition: MatchingRuleDescription,
    pub(crate) syntax: Arc<Syntax>,
    pub(crate) implementation: Arc<dyn MatchingRuleImpl>,
}

impl_schema_element!(MatchingRule, oid);

impl MatchingRule {
    /// The description this rule was built from
    pub fn definition(&self) -> &MatchingRuleDescription {
        &self.definition
    }

    /// Assertion syntax
    pub fn syntax(&self) -> &Arc<Syntax> {
        &self.syntax
    }

    /// Behaviour of the rule
    pub fn implementation(&self) -> &Arc<dyn MatchingRuleImpl> {
        &self.implementation
    }

    /// Comparison semantics
    pub fn kind(&self) -> MatchingRuleKind {
        self.implementation.kind()
    }

    /// Normalize an attribute value
    pub fn normalize_attribute_value(&self, schema: &Schema, value: &[u8]) -> Result<ByteString> {
        self.implementation.normalize_attribute_value(schema, value)
    }

    /// Build an assertion from an assertion value
    pub fn get_assertion(&self, schema: &Schema, value: &[u8]) -> Result<Box<dyn Assertion>> {
        self.implementation.get_assertion(schema, value)
    }

    /// Build a substring assertion from raw components
    pub fn get_substring_assertion(
        &self,
        schema: &Schema,
        initial: Option<&[u8]>,
        any: &[&[u8]],
        final_: Option<&[u8]>,
    ) -> Result<Box<dyn Assertion>> {
        self.implementation
            .get_substring_assertion(schema, initial, any, final_)
    }

    /// Build an `attribute >= value` assertion
    pub fn get_greater_or_equal_assertion(&self, schema: &Schema, value: &[u8]) -> Result<Box<dyn Assertion>> {
        self.implementation.get_greater_or_equal_assertion(schema, value)
    }

    /// Build an `attribute <= value` assertion
    pub fn get_less_or_equal_assertion(&self, schema: &Schema, value: &[u8]) -> Result<Box<dyn Assertion>> {
        self.implementation.get_less_or_equal_assertion(schema, value)
    }

    /// Indexers maintaining the indexes this rule's assertions query
    pub fn create_indexers(&self, options: &IndexingOptions) -> Vec<Box<dyn Indexer>> {
        self.implementation.create_indexers(options)
    }

    /// Normalize a raw attribute value and test it against `assertion`.
    ///
    /// Values the rule cannot normalize evaluate to `Undefined`.
    pub fn evaluate(&self, schema: &Schema, assertion: &dyn Assertion, value: &[u8]) -> ConditionResult {
        match self.normalize_attribute_value(schema, value) {
            Ok(normalized) => assertion.matches(&normalized),
            Err(_) => ConditionResult::Undefined,
        }
    }

    /// The rule used when no other is available: octetStringMatch
    pub(crate) fn fallback(oid: &str, syntax: Arc<Syntax>) -> Self {
        let implementation = core_implementation(EMR_OCTET_STRING_OID).unwrap_or_else(|| {
            Arc::new(EqualityMatchingRule::new(EMR_OCTET_STRING_OID, OctetStringNormalizer))
        });
        Self {
            definition: MatchingRuleDescription {
                oid: oid.to_string(),
                names: vec!["octetStringMatch".to_string()],
                syntax: syntax.oid().to_string(),
                ..Default::default()
            },
            syntax,
            implementation,
        }
    }
}

/// Parsed matching rule use description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchingRuleUseDescription {
    /// OID of the matching rule
    pub oid: String,
    /// Names, primary name first
    pub names: Vec<String>,
    /// Free-text description
    pub description: String,
    /// OBSOLETE flag
    pub obsolete: bool,
    /// Attribute types the rule applies to
    pub attributes: Vec<String>,
    /// Extension properties
    pub extra_properties: ExtraProperties,
}

/// The attribute types a matching rule may be used with in extensible filters
#[derive(Debug, Clone)]
pub struct MatchingRuleUse {
    pub(crate) definition: MatchingRuleUseDescription,
    pub(crate) matching_rule: Arc<MatchingRule>,
    pub(crate) attributes: Vec<Arc<AttributeType>>,
}

impl_schema_element!(MatchingRuleUse, oid);

impl MatchingRuleUse {
    /// The description this element was built from
    pub fn definition(&self) -> &MatchingRuleUseDescription {
        &self.definition
    }

    /// The matching rule
    pub fn matching_rule(&self) -> &Arc<MatchingRule> {
        &self.matching_rule
    }

    /// Attribute types the rule applies to
    pub fn attributes(&self) -> &[Arc<AttributeType>] {
        &self.attributes
    }

    /// Returns true if the rule applies to `attribute_type`
    pub fn applies_to(&self, attribute_type: &AttributeType) -> bool {
        self.attributes
            .iter()
            .any(|a| a.oid() == attribute_type.oid())
    }
}
