//! Name form elements

use crate::schema::attribute_types::AttributeType;
use crate::schema::base::{impl_schema_element, ExtraProperties};
use crate::schema::object_classes::ObjectClass;
use std::sync::Arc;

/// Parsed name form description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameFormDescription {
    /// Numeric OID
    pub oid: String,
    /// Names, primary name first
    pub names: Vec<String>,
    /// Free-text description
    pub description: String,
    /// OBSOLETE flag
    pub obsolete: bool,
    /// Structural object class (name or OID)
    pub structural_class: String,
    /// Attribute types that must appear in the RDN (names or OIDs)
    pub required: Vec<String>,
    /// Attribute types that may appear in the RDN (names or OIDs)
    pub optional: Vec<String>,
    /// Extension properties
    pub extra_properties: ExtraProperties,
}

/// A validated name form: the RDN attributes of entries of a structural class
#[derive(Debug, Clone)]
pub struct NameForm {
    pub(crate) definition: NameFormDescription,
    pub(crate) structural_class: Arc<ObjectClass>,
    pub(crate) required: Vec<Arc<AttributeType>>,
    pub(crate) optional: Vec<Arc<AttributeType>>,
}

impl_schema_element!(NameForm, oid);

impl NameForm {
    /// The description this name form was built from
    pub fn definition(&self) -> &NameFormDescription {
        &self.definition
    }

    /// Structural object class
    pub fn structural_class(&self) -> &Arc<ObjectClass> {
        &self.structural_class
    }

    /// Required RDN attribute types
    pub fn required_attributes(&self) -> &[Arc<AttributeType>] {
        &self.required
    }

    /// Optional RDN attribute types
    pub fn optional_attributes(&self) -> &[Arc<AttributeType>] {
        &self.optional
    }
}
