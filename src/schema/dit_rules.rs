//! DIT content rule and DIT structure rule elements

use crate::schema::attribute_types::AttributeType;
use crate::schema::base::{impl_schema_element, ExtraProperties, SchemaElement};
use crate::schema::name_forms::NameForm;
use crate::schema::object_classes::ObjectClass;
use std::sync::Arc;

/// Parsed DIT content rule description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DitContentRuleDescription {
    /// OID of the structural object class the rule governs
    pub structural_class: String,
    /// Names, primary name first
    pub names: Vec<String>,
    /// Free-text description
    pub description: String,
    /// OBSOLETE flag
    pub obsolete: bool,
    /// Permitted auxiliary classes (names or OIDs)
    pub auxiliary_classes: Vec<String>,
    /// Additional required attribute types
    pub required: Vec<String>,
    /// Additional optional attribute types
    pub optional: Vec<String>,
    /// Prohibited attribute types
    pub prohibited: Vec<String>,
    /// Extension properties
    pub extra_properties: ExtraProperties,
}

/// A validated DIT content rule
#[derive(Debug, Clone)]
pub struct DitContentRule {
    pub(crate) definition: DitContentRuleDescription,
    pub(crate) structural_class: Arc<ObjectClass>,
    pub(crate) auxiliary_classes: Vec<Arc<ObjectClass>>,
    pub(crate) required: Vec<Arc<AttributeType>>,
    pub(crate) optional: Vec<Arc<AttributeType>>,
    pub(crate) prohibited: Vec<Arc<AttributeType>>,
}

impl_schema_element!(DitContentRule, structural_class);

impl DitContentRule {
    /// The description this rule was built from
    pub fn definition(&self) -> &DitContentRuleDescription {
        &self.definition
    }

    /// Structural object class
    pub fn structural_class(&self) -> &Arc<ObjectClass> {
        &self.structural_class
    }

    /// Permitted auxiliary classes
    pub fn auxiliary_classes(&self) -> &[Arc<ObjectClass>] {
        &self.auxiliary_classes
    }

    /// Additional required attribute types
    pub fn required_attributes(&self) -> &[Arc<AttributeType>] {
        &self.required
    }

    /// Additional optional attribute types
    pub fn optional_attributes(&self) -> &[Arc<AttributeType>] {
        &self.optional
    }

    /// Prohibited attribute types
    pub fn prohibited_attributes(&self) -> &[Arc<AttributeType>] {
        &self.prohibited
    }
}

/// Parsed DIT structure rule description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DitStructureRuleDescription {
    /// Rule ID
    pub rule_id: u32,
    /// Names, primary name first
    pub names: Vec<String>,
    /// Free-text description
    pub description: String,
    /// OBSOLETE flag
    pub obsolete: bool,
    /// Name form (name or OID)
    pub name_form: String,
    /// IDs of the superior rules
    pub superior_rules: Vec<u32>,
    /// Extension properties
    pub extra_properties: ExtraProperties,
}

/// A validated DIT structure rule
#[derive(Debug, Clone)]
pub struct DitStructureRule {
    pub(crate) definition: DitStructureRuleDescription,
    pub(crate) name_form: Arc<NameForm>,
    pub(crate) superior_rules: Vec<Arc<DitStructureRule>>,
}

impl DitStructureRule {
    /// The description this rule was built from
    pub fn definition(&self) -> &DitStructureRuleDescription {
        &self.definition
    }

    /// Rule ID
    pub fn rule_id(&self) -> u32 {
        self.definition.rule_id
    }

    /// The primary name, or the rule ID if there is no name
    pub fn name_or_rule_id(&self) -> String {
        self.definition
            .names
            .first()
            .cloned()
            .unwrap_or_else(|| self.definition.rule_id.to_string())
    }

    /// Name form
    pub fn name_form(&self) -> &Arc<NameForm> {
        &self.name_form
    }

    /// Superior rules
    pub fn superior_rules(&self) -> &[Arc<DitStructureRule>] {
        &self.superior_rules
    }
}

impl SchemaElement for DitStructureRule {
    fn names(&self) -> &[String] {
        &self.definition.names
    }

    fn description(&self) -> &str {
        &self.definition.description
    }

    fn is_obsolete(&self) -> bool {
        self.definition.obsolete
    }

    fn extra_properties(&self) -> &ExtraProperties {
        &self.definition.extra_properties
    }
}
