//! Common schema element behaviour

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Extension properties (`X-...`) of a schema element, in declaration order
pub type ExtraProperties = IndexMap<String, Vec<String>>;

/// Accessors shared by every schema element
pub trait SchemaElement {
    /// Names, primary name first
    fn names(&self) -> &[String];

    /// Free-text description
    fn description(&self) -> &str;

    /// Whether the element is marked OBSOLETE
    fn is_obsolete(&self) -> bool;

    /// Extension properties
    fn extra_properties(&self) -> &ExtraProperties;

    /// Returns true if `name` is one of the names, ignoring case
    fn has_name(&self, name: &str) -> bool {
        self.names().iter().any(|n| n.eq_ignore_ascii_case(name))
    }
}

/// Schema elements identified by an OID
pub trait OidSchemaElement: SchemaElement {
    /// Numeric OID
    fn oid(&self) -> &str;

    /// The primary name, or the OID if there is no name
    fn name_or_oid(&self) -> &str {
        self.names().first().map(String::as_str).unwrap_or_else(|| self.oid())
    }

    /// Returns true if `name_or_oid` is the OID or one of the names
    fn has_name_or_oid(&self, name_or_oid: &str) -> bool {
        self.oid() == name_or_oid || self.has_name(name_or_oid)
    }
}

/// Implements [`SchemaElement`] and [`OidSchemaElement`] for an element
/// wrapping a description with the usual fields
macro_rules! impl_schema_element {
    ($element:ty, $oid:ident) => {
        impl $crate::schema::base::SchemaElement for $element {
            fn names(&self) -> &[String] {
                &self.definition.names
            }

            fn description(&self) -> &str {
                &self.definition.description
            }

            fn is_obsolete(&self) -> bool {
                self.definition.obsolete
            }

            fn extra_properties(&self) -> &$crate::schema::base::ExtraProperties {
                &self.definition.extra_properties
            }
        }

        impl $crate::schema::base::OidSchemaElement for $element {
            fn oid(&self) -> &str {
                &self.definition.$oid
            }
        }
    };
}

pub(crate) use impl_schema_element;

/// Intended use of an attribute type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum AttributeUsage {
    /// User attribute
    #[default]
    UserApplications,
    /// Operational attribute used by the directory
    DirectoryOperation,
    /// Operational attribute shared between servers
    DistributedOperation,
    /// Operational attribute specific to one server
    DsaOperation,
}

impl AttributeUsage {
    /// RFC 4512 keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeUsage::UserApplications => "userApplications",
            AttributeUsage::DirectoryOperation => "directoryOperation",
            AttributeUsage::DistributedOperation => "distributedOperation",
            AttributeUsage::DsaOperation => "dSAOperation",
        }
    }

    /// Parse an RFC 4512 keyword, ignoring case
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "userapplications" => Ok(AttributeUsage::UserApplications),
            "directoryoperation" => Ok(AttributeUsage::DirectoryOperation),
            "distributedoperation" => Ok(AttributeUsage::DistributedOperation),
            "dsaoperation" => Ok(AttributeUsage::DsaOperation),
            _ => Err(Error::InvalidArgument(format!("unknown attribute usage '{}'", s))),
        }
    }

    /// Returns true for every usage other than user applications
    pub fn is_operational(&self) -> bool {
        *self != AttributeUsage::UserApplications
    }
}

impl fmt::Display for AttributeUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of an object class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ObjectClassType {
    /// Can only be inherited
    Abstract,
    /// Defines the entry
    #[default]
    Structural,
    /// Adds attributes to an entry
    Auxiliary,
}

impl ObjectClassType {
    /// RFC 4512 keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectClassType::Abstract => "ABSTRACT",
            ObjectClassType::Structural => "STRUCTURAL",
            ObjectClassType::Auxiliary => "AUXILIARY",
        }
    }
}

impl fmt::Display for ObjectClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_usage() {
        assert_eq!(AttributeUsage::from_str("dSAOperation").unwrap(), AttributeUsage::DsaOperation);
        assert_eq!(AttributeUsage::default(), AttributeUsage::UserApplications);
        assert!(AttributeUsage::DirectoryOperation.is_operational());
        assert!(!AttributeUsage::UserApplications.is_operational());
        assert!(AttributeUsage::from_str("bogus").is_err());
    }

    #[test]
    fn test_object_class_type_display() {
        assert_eq!(ObjectClassType::Auxiliary.to_string(), "AUXILIARY");
        assert_eq!(ObjectClassType::default(), ObjectClassType::Structural);
    }
}
