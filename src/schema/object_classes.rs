//! Object class elements

use crate::schema::attribute_types::AttributeType;
use crate::schema::base::{impl_schema_element, ExtraProperties, ObjectClassType, OidSchemaElement};
use indexmap::IndexMap;
use std::sync::Arc;

/// Parsed object class description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectClassDescription {
    /// Numeric OID
    pub oid: String,
    /// Names, primary name first
    pub names: Vec<String>,
    /// Free-text description
    pub description: String,
    /// OBSOLETE flag
    pub obsolete: bool,
    /// Superior classes (names or OIDs)
    pub superiors: Vec<String>,
    /// Kind of class
    pub object_class_type: ObjectClassType,
    /// Required attribute types (names or OIDs)
    pub required: Vec<String>,
    /// Optional attribute types (names or OIDs)
    pub optional: Vec<String>,
    /// Extension properties
    pub extra_properties: ExtraProperties,
}

/// A validated object class
///
/// The required and optional sets include the attributes inherited through
/// every superior class, keyed by OID.
#[derive(Debug, Clone)]
pub struct ObjectClass {
    pub(crate) definition: ObjectClassDescription,
    pub(crate) superiors: Vec<Arc<ObjectClass>>,
    pub(crate) declared_required: Vec<Arc<AttributeType>>,
    pub(crate) declared_optional: Vec<Arc<AttributeType>>,
    pub(crate) required: IndexMap<String, Arc<AttributeType>>,
    pub(crate) optional: IndexMap<String, Arc<AttributeType>>,
}

impl_schema_element!(ObjectClass, oid);

impl ObjectClass {
    /// The description this object class was built from
    pub fn definition(&self) -> &ObjectClassDescription {
        &self.definition
    }

    /// Kind of class
    pub fn object_class_type(&self) -> ObjectClassType {
        self.definition.object_class_type
    }

    /// Direct superior classes
    pub fn superiors(&self) -> &[Arc<ObjectClass>] {
        &self.superiors
    }

    /// Required attribute types declared by this class
    pub fn declared_required_attributes(&self) -> &[Arc<AttributeType>] {
        &self.declared_required
    }

    /// Optional attribute types declared by this class
    pub fn declared_optional_attributes(&self) -> &[Arc<AttributeType>] {
        &self.declared_optional
    }

    /// Required attribute types, inherited ones included
    pub fn required_attributes(&self) -> impl Iterator<Item = &Arc<AttributeType>> {
        self.required.values()
    }

    /// Optional attribute types, inherited ones included
    pub fn optional_attributes(&self) -> impl Iterator<Item = &Arc<AttributeType>> {
        self.optional.values()
    }

    /// Returns true if `attribute_type` is required
    pub fn is_required(&self, attribute_type: &AttributeType) -> bool {
        self.required.contains_key(attribute_type.oid())
    }

    /// Returns true if `attribute_type` is optional
    pub fn is_optional(&self, attribute_type: &AttributeType) -> bool {
        self.optional.contains_key(attribute_type.oid())
    }

    /// Returns true if this class is `other` or inherits from it
    pub fn is_descendant_of(&self, other: &ObjectClass) -> bool {
        self.oid() == other.oid() || self.superiors.iter().any(|s| s.is_descendant_of(other))
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::base::ObjectClassType;
    use crate::schema::{Schema, SchemaElement};

    #[test]
    fn test_inherited_attributes() {
        let schema = Schema::core();
        let person = schema.get_object_class("person").unwrap();
        let top = schema.get_object_class("top").unwrap();
        let object_class = schema.get_attribute_type("objectClass").unwrap();
        let sn = schema.get_attribute_type("sn").unwrap();

        assert_eq!(person.object_class_type(), ObjectClassType::Structural);
        assert!(person.is_descendant_of(&top));
        assert!(person.is_required(&object_class));
        assert!(person.is_required(&sn));
        assert!(person.declared_required_attributes().iter().all(|a| !a.has_name("objectClass")));
    }
}
