//! Serializable schema summaries
//!
//! A [`SchemaDump`] is a plain data view of a [`Schema`] used by the
//! command-line `dump` command and by tests comparing schemas as JSON.

use crate::schema::{OidSchemaElement, Schema, SchemaElement};
use serde::{Deserialize, Serialize};

/// Summary of a schema snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaDump {
    /// Schema name
    pub name: String,

    /// Number of elements per kind
    pub counts: ElementCounts,

    /// Syntaxes
    pub syntaxes: Vec<SyntaxInfo>,

    /// Matching rules
    pub matching_rules: Vec<MatchingRuleInfo>,

    /// Attribute types
    pub attribute_types: Vec<AttributeTypeInfo>,

    /// Object classes
    pub object_classes: Vec<ObjectClassInfo>,

    /// Build warnings
    pub warnings: Vec<String>,
}

/// Number of elements per kind
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElementCounts {
    /// Syntaxes
    pub syntaxes: usize,
    /// Matching rules
    pub matching_rules: usize,
    /// Attribute types
    pub attribute_types: usize,
    /// Object classes
    pub object_classes: usize,
    /// Matching rule uses
    pub matching_rule_uses: usize,
    /// Name forms
    pub name_forms: usize,
    /// DIT content rules
    pub dit_content_rules: usize,
    /// DIT structure rules
    pub dit_structure_rules: usize,
}

/// Syntax summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyntaxInfo {
    /// OID
    pub oid: String,
    /// Description
    pub description: String,
    /// Whether values are text
    pub human_readable: bool,
}

/// Matching rule summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchingRuleInfo {
    /// OID
    pub oid: String,
    /// Names
    pub names: Vec<String>,
    /// equality, ordering, substring or approximate
    pub kind: String,
    /// Assertion syntax OID
    pub syntax: String,
}

/// Attribute type summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeTypeInfo {
    /// OID
    pub oid: String,
    /// Names
    pub names: Vec<String>,
    /// Superior type, by primary name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superior: Option<String>,
    /// Effective syntax OID
    pub syntax: String,
    /// Effective equality matching rule
    pub equality: String,
    /// Effective ordering matching rule
    pub ordering: String,
    /// Effective substring matching rule
    pub substring: String,
    /// Effective approximate matching rule
    pub approximate: String,
    /// Usage
    pub usage: String,
    /// SINGLE-VALUE flag
    pub single_value: bool,
}

/// Object class summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectClassInfo {
    /// OID
    pub oid: String,
    /// Names
    pub names: Vec<String>,
    /// ABSTRACT, STRUCTURAL or AUXILIARY
    pub kind: String,
    /// Direct superiors, by primary name
    pub superiors: Vec<String>,
    /// Required attribute types including inherited ones
    pub required: Vec<String>,
    /// Optional attribute types including inherited ones
    pub optional: Vec<String>,
}

impl SchemaDump {
    /// Summarize `schema`
    pub fn from_schema(schema: &Schema) -> Self {
        let counts = ElementCounts {
            syntaxes: schema.syntaxes().count(),
            matching_rules: schema.matching_rules().count(),
            attribute_types: schema.attribute_types().count(),
            object_classes: schema.object_classes().count(),
            matching_rule_uses: schema.matching_rule_uses().count(),
            name_forms: schema.name_forms().count(),
            dit_content_rules: schema.dit_content_rules().count(),
            dit_structure_rules: schema.dit_structure_rules().count(),
        };

        let syntaxes = schema
            .syntaxes()
            .map(|s| SyntaxInfo {
                oid: s.oid().to_string(),
                description: s.description().to_string(),
                human_readable: s.is_human_readable(),
            })
            .collect();

        let matching_rules = schema
            .matching_rules()
            .map(|r| MatchingRuleInfo {
                oid: r.oid().to_string(),
                names: r.names().to_vec(),
                kind: r.kind().to_string(),
                syntax: r.syntax().oid().to_string(),
            })
            .collect();

        let attribute_types = schema
            .attribute_types()
            .map(|a| AttributeTypeInfo {
                oid: a.oid().to_string(),
                names: a.names().to_vec(),
                superior: a.superior().map(|s| s.name_or_oid().to_string()),
                syntax: a.syntax().oid().to_string(),
                equality: a.equality_matching_rule().name_or_oid().to_string(),
                ordering: a.ordering_matching_rule().name_or_oid().to_string(),
                substring: a.substring_matching_rule().name_or_oid().to_string(),
                approximate: a.approximate_matching_rule().name_or_oid().to_string(),
                usage: a.usage().to_string(),
                single_value: a.is_single_value(),
            })
            .collect();

        let object_classes = schema
            .object_classes()
            .map(|c| ObjectClassInfo {
                oid: c.oid().to_string(),
                names: c.names().to_vec(),
                kind: c.object_class_type().to_string(),
                superiors: c.superiors().iter().map(|s| s.name_or_oid().to_string()).collect(),
                required: c.required_attributes().map(|a| a.name_or_oid().to_string()).collect(),
                optional: c.optional_attributes().map(|a| a.name_or_oid().to_string()).collect(),
            })
            .collect();

        Self {
            name: schema.name().to_string(),
            counts,
            syntaxes,
            matching_rules,
            attribute_types,
            object_classes,
            warnings: schema.warnings().to_vec(),
        }
    }

    /// Pretty printed JSON
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
