//! The core schema
//!
//! Standard syntaxes and matching rules (RFC 4517 plus the directory
//! specific rules), the user attribute types and object classes of RFC 4519,
//! and the operational attributes of RFC 4512.

use crate::error::Result;
use crate::matching::rules::CORE_MATCHING_RULES;
use crate::schema::base::{AttributeUsage, ObjectClassType};
use crate::schema::builders::SchemaBuilder;
use crate::schema::constants::*;
use crate::schema::matching_rules::MatchingRuleDescription;
use crate::schema::syntaxes::{SyntaxDescription, SyntaxImpl, CORE_SYNTAXES};
use crate::schema::Schema;
use tracing::error;

const SINGLE_VALUE: u8 = 0x01;
const NO_USER_MODIFICATION: u8 = 0x02;
const DIRECTORY_OPERATION: u8 = 0x04;

const OPERATIONAL: u8 = SINGLE_VALUE | NO_USER_MODIFICATION | DIRECTORY_OPERATION;

const X_ORIGIN_RFC4512: &str = "RFC 4512";
const X_ORIGIN_RFC4519: &str = "RFC 4519";

/// (oid, names, superior, syntax, [equality, ordering, substring], flags)
type AttributeRow = (
    &'static str,
    &'static [&'static str],
    Option<&'static str>,
    Option<&'static str>,
    [Option<&'static str>; 3],
    u8,
);

const CASE_IGNORE: [Option<&str>; 3] = [Some("caseIgnoreMatch"), None, Some("caseIgnoreSubstringsMatch")];
const CASE_IGNORE_IA5: [Option<&str>; 3] =
    [Some("caseIgnoreIA5Match"), None, Some("caseIgnoreIA5SubstringsMatch")];
const DN_MATCH: [Option<&str>; 3] = [Some("distinguishedNameMatch"), None, None];
const TIME_MATCH: [Option<&str>; 3] =
    [Some("generalizedTimeMatch"), Some("generalizedTimeOrderingMatch"), None];
const FIRST_COMPONENT: [Option<&str>; 3] = [Some("objectIdentifierFirstComponentMatch"), None, None];
const INHERITED: [Option<&str>; 3] = [None, None, None];

const ATTRIBUTE_TYPES: &[AttributeRow] = &[
    // RFC 4512
    (OBJECT_CLASS_OID, &["objectClass"], None, Some(SYNTAX_OID_OID), [Some("objectIdentifierMatch"), None, None], 0),
    ("2.5.4.1", &["aliasedObjectName"], None, Some(SYNTAX_DN_OID), DN_MATCH, SINGLE_VALUE),
    ("2.5.18.1", &["createTimestamp"], None, Some(SYNTAX_GENERALIZED_TIME_OID), TIME_MATCH, OPERATIONAL),
    ("2.5.18.2", &["modifyTimestamp"], None, Some(SYNTAX_GENERALIZED_TIME_OID), TIME_MATCH, OPERATIONAL),
    ("2.5.18.3", &["creatorsName"], None, Some(SYNTAX_DN_OID), DN_MATCH, OPERATIONAL),
    ("2.5.18.4", &["modifiersName"], None, Some(SYNTAX_DN_OID), DN_MATCH, OPERATIONAL),
    ("2.5.18.10", &["subschemaSubentry"], None, Some(SYNTAX_DN_OID), DN_MATCH, OPERATIONAL),
    (
        "1.3.6.1.1.16.4",
        &["entryUUID"],
        None,
        Some(SYNTAX_UUID_OID),
        [Some("uuidMatch"), Some("uuidOrderingMatch"), None],
        OPERATIONAL,
    ),
    ("1.3.6.1.4.1.1466.101.120.16", &["ldapSyntaxes"], None, Some(SYNTAX_LDAP_SYNTAX_OID), FIRST_COMPONENT, DIRECTORY_OPERATION),
    ("2.5.21.4", &["matchingRules"], None, Some(SYNTAX_MATCHING_RULE_OID), FIRST_COMPONENT, DIRECTORY_OPERATION),
    ("2.5.21.5", &["attributeTypes"], None, Some(SYNTAX_ATTRIBUTE_TYPE_OID), FIRST_COMPONENT, DIRECTORY_OPERATION),
    ("2.5.21.6", &["objectClasses"], None, Some(SYNTAX_OBJECTCLASS_OID), FIRST_COMPONENT, DIRECTORY_OPERATION),
    ("2.5.21.8", &["matchingRuleUse"], None, Some(SYNTAX_MATCHING_RULE_USE_OID), FIRST_COMPONENT, DIRECTORY_OPERATION),
    ("2.5.21.7", &["nameForms"], None, Some(SYNTAX_NAME_FORM_OID), FIRST_COMPONENT, DIRECTORY_OPERATION),
    ("2.5.21.2", &["dITContentRules"], None, Some(SYNTAX_DIT_CONTENT_RULE_OID), FIRST_COMPONENT, DIRECTORY_OPERATION),
    (
        "2.5.21.1",
        &["dITStructureRules"],
        None,
        Some(SYNTAX_DIT_STRUCTURE_RULE_OID),
        [Some("integerFirstComponentMatch"), None, None],
        DIRECTORY_OPERATION,
    ),
    // RFC 4519
    ("2.5.4.41", &["name"], None, Some(SYNTAX_DIRECTORY_STRING_OID), CASE_IGNORE, 0),
    ("2.5.4.3", &["cn", "commonName"], Some("name"), None, INHERITED, 0),
    ("2.5.4.4", &["sn", "surname"], Some("name"), None, INHERITED, 0),
    ("2.5.4.42", &["givenName", "gn"], Some("name"), None, INHERITED, 0),
    ("2.5.4.43", &["initials"], Some("name"), None, INHERITED, 0),
    ("2.5.4.7", &["l", "localityName"], Some("name"), None, INHERITED, 0),
    ("2.5.4.8", &["st", "stateOrProvinceName"], Some("name"), None, INHERITED, 0),
    ("2.5.4.10", &["o", "organizationName"], Some("name"), None, INHERITED, 0),
    ("2.5.4.11", &["ou", "organizationalUnitName"], Some("name"), None, INHERITED, 0),
    ("2.5.4.12", &["title"], Some("name"), None, INHERITED, 0),
    ("2.5.4.6", &["c", "countryName"], Some("name"), Some(SYNTAX_COUNTRY_STRING_OID), INHERITED, SINGLE_VALUE),
    ("2.5.4.5", &["serialNumber"], None, Some(SYNTAX_PRINTABLE_STRING_OID), CASE_IGNORE, 0),
    ("2.5.4.9", &["street", "streetAddress"], None, Some(SYNTAX_DIRECTORY_STRING_OID), CASE_IGNORE, 0),
    ("2.5.4.13", &["description"], None, Some(SYNTAX_DIRECTORY_STRING_OID), CASE_IGNORE, 0),
    ("2.5.4.17", &["postalCode"], None, Some(SYNTAX_DIRECTORY_STRING_OID), CASE_IGNORE, 0),
    (
        "2.5.4.16",
        &["postalAddress"],
        None,
        Some(SYNTAX_POSTAL_ADDRESS_OID),
        [Some("caseIgnoreListMatch"), None, Some("caseIgnoreListSubstringsMatch")],
        0,
    ),
    (
        "2.5.4.20",
        &["telephoneNumber"],
        None,
        Some(SYNTAX_TELEPHONE_OID),
        [Some("telephoneNumberMatch"), None, Some("telephoneNumberSubstringsMatch")],
        0,
    ),
    ("2.5.4.49", &["distinguishedName"], None, Some(SYNTAX_DN_OID), DN_MATCH, 0),
    ("2.5.4.31", &["member"], Some("distinguishedName"), None, INHERITED, 0),
    ("2.5.4.32", &["owner"], Some("distinguishedName"), None, INHERITED, 0),
    ("2.5.4.34", &["seeAlso"], Some("distinguishedName"), None, INHERITED, 0),
    (
        "2.5.4.50",
        &["uniqueMember"],
        None,
        Some(SYNTAX_NAME_AND_OPTIONAL_UID_OID),
        [Some("uniqueMemberMatch"), None, None],
        0,
    ),
    ("2.5.4.35", &["userPassword"], None, Some(SYNTAX_OCTET_STRING_OID), [Some("octetStringMatch"), None, None], 0),
    (
        "2.5.4.36",
        &["userCertificate"],
        None,
        Some(SYNTAX_CERTIFICATE_OID),
        [Some("certificateExactMatch"), None, None],
        0,
    ),
    ("0.9.2342.19200300.100.1.1", &["uid", "userid"], None, Some(SYNTAX_DIRECTORY_STRING_OID), CASE_IGNORE, 0),
    ("0.9.2342.19200300.100.1.3", &["mail", "rfc822Mailbox"], None, Some(SYNTAX_IA5_STRING_OID), CASE_IGNORE_IA5, 0),
    (
        "0.9.2342.19200300.100.1.25",
        &["dc", "domainComponent"],
        None,
        Some(SYNTAX_IA5_STRING_OID),
        CASE_IGNORE_IA5,
        SINGLE_VALUE,
    ),
    ("0.9.2342.19200300.100.1.60", &["jpegPhoto"], None, Some(SYNTAX_JPEG_OID), INHERITED, 0),
    ("2.16.840.1.113730.3.1.3", &["employeeNumber"], None, Some(SYNTAX_DIRECTORY_STRING_OID), CASE_IGNORE, SINGLE_VALUE),
    (
        "2.16.840.1.113730.3.1.4",
        &["employeeType"],
        None,
        Some(SYNTAX_DIRECTORY_STRING_OID),
        CASE_IGNORE,
        0,
    ),
];

/// (oid, names, superiors, kind, required, optional)
type ObjectClassRow = (
    &'static str,
    &'static [&'static str],
    &'static [&'static str],
    ObjectClassType,
    &'static [&'static str],
    &'static [&'static str],
);

const ORGANIZATION_OPTIONAL: &[&str] = &[
    "userPassword",
    "telephoneNumber",
    "postalAddress",
    "postalCode",
    "street",
    "st",
    "l",
    "description",
    "seeAlso",
];

const OBJECT_CLASSES: &[ObjectClassRow] = &[
    (TOP_OBJECTCLASS_OID, &[TOP_OBJECTCLASS_NAME], &[], ObjectClassType::Abstract, &["objectClass"], &[]),
    ("2.5.6.1", &["alias"], &["top"], ObjectClassType::Structural, &["aliasedObjectName"], &[]),
    ("2.5.6.2", &["country"], &["top"], ObjectClassType::Structural, &["c"], &["description"]),
    (
        "2.5.6.3",
        &["locality"],
        &["top"],
        ObjectClassType::Structural,
        &[],
        &["street", "seeAlso", "st", "l", "description"],
    ),
    ("2.5.6.4", &["organization"], &["top"], ObjectClassType::Structural, &["o"], ORGANIZATION_OPTIONAL),
    ("2.5.6.5", &["organizationalUnit"], &["top"], ObjectClassType::Structural, &["ou"], ORGANIZATION_OPTIONAL),
    (
        "2.5.6.6",
        &["person"],
        &["top"],
        ObjectClassType::Structural,
        &["sn", "cn"],
        &["userPassword", "telephoneNumber", "seeAlso", "description"],
    ),
    (
        "2.5.6.7",
        &["organizationalPerson"],
        &["person"],
        ObjectClassType::Structural,
        &[],
        &["title", "ou", "l", "st", "street", "postalAddress", "postalCode"],
    ),
    (
        "2.16.840.1.113730.3.2.2",
        &["inetOrgPerson"],
        &["organizationalPerson"],
        ObjectClassType::Structural,
        &[],
        &[
            "givenName",
            "initials",
            "mail",
            "uid",
            "jpegPhoto",
            "userCertificate",
            "employeeNumber",
            "employeeType",
        ],
    ),
    (
        "2.5.6.9",
        &["groupOfNames"],
        &["top"],
        ObjectClassType::Structural,
        &["member", "cn"],
        &["owner", "ou", "o", "description", "seeAlso"],
    ),
    (
        "2.5.6.17",
        &["groupOfUniqueNames"],
        &["top"],
        ObjectClassType::Structural,
        &["uniqueMember", "cn"],
        &["owner", "ou", "o", "description", "seeAlso"],
    ),
    (
        "0.9.2342.19200300.100.4.13",
        &["domain"],
        &["top"],
        ObjectClassType::Structural,
        &["dc"],
        &["userPassword", "telephoneNumber", "street", "st", "l", "description", "seeAlso", "o"],
    ),
    ("1.3.6.1.4.1.1466.344", &["dcObject"], &["top"], ObjectClassType::Auxiliary, &["dc"], &[]),
    ("1.3.6.1.1.3.1", &["uidObject"], &["top"], ObjectClassType::Auxiliary, &["uid"], &[]),
    (
        EXTENSIBLE_OBJECT_OBJECTCLASS_OID,
        &["extensibleObject"],
        &["top"],
        ObjectClassType::Auxiliary,
        &[],
        &[],
    ),
    (
        "2.5.20.1",
        &["subschema"],
        &["top"],
        ObjectClassType::Auxiliary,
        &[],
        &[
            "dITStructureRules",
            "nameForms",
            "dITContentRules",
            "objectClasses",
            "attributeTypes",
            "matchingRules",
            "matchingRuleUse",
            "ldapSyntaxes",
        ],
    ),
];

/// Build the core schema
pub(crate) fn build_core_schema() -> Schema {
    let mut builder = SchemaBuilder::with_name("Core Schema");
    if let Err(e) = populate(&mut builder) {
        error!("failed to stage the core schema: {}", e);
    }
    builder.to_schema()
}

fn populate(builder: &mut SchemaBuilder) -> Result<()> {
    for (oid, syntax) in CORE_SYNTAXES.iter() {
        builder.add_syntax(
            SyntaxDescription {
                oid: oid.to_string(),
                description: syntax.name().to_string(),
                ..Default::default()
            },
            false,
        )?;
    }

    for rule in CORE_MATCHING_RULES.values() {
        builder.add_matching_rule(MatchingRuleDescription::from(rule), false)?;
    }

    for (oid, names, superior, syntax, [equality, ordering, substring], flags) in ATTRIBUTE_TYPES {
        let origin = if *flags & DIRECTORY_OPERATION != 0 || *oid == OBJECT_CLASS_OID {
            X_ORIGIN_RFC4512
        } else {
            X_ORIGIN_RFC4519
        };
        let mut attribute_type = builder
            .build_attribute_type(*oid)
            .names(names.iter().copied())
            .single_value(flags & SINGLE_VALUE != 0)
            .no_user_modification(flags & NO_USER_MODIFICATION != 0)
            .extra_property(SCHEMA_PROPERTY_ORIGIN, [origin]);
        if flags & DIRECTORY_OPERATION != 0 {
            attribute_type = attribute_type.usage(AttributeUsage::DirectoryOperation);
        }
        if let Some(superior) = superior {
            attribute_type = attribute_type.superior_type(*superior);
        }
        if let Some(syntax) = syntax {
            attribute_type = attribute_type.syntax(*syntax);
        }
        if let Some(rule) = equality {
            attribute_type = attribute_type.equality_matching_rule(*rule);
        }
        if let Some(rule) = ordering {
            attribute_type = attribute_type.ordering_matching_rule(*rule);
        }
        if let Some(rule) = substring {
            attribute_type = attribute_type.substring_matching_rule(*rule);
        }
        attribute_type.add_to_schema()?;
    }

    for (oid, names, superiors, kind, required, optional) in OBJECT_CLASSES {
        builder
            .build_object_class(*oid)
            .names(names.iter().copied())
            .superior_classes(superiors.iter().copied())
            .object_class_type(*kind)
            .required_attributes(required.iter().copied())
            .optional_attributes(optional.iter().copied())
            .extra_property(SCHEMA_PROPERTY_ORIGIN, [X_ORIGIN_RFC4519])
            .add_to_schema()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::schema::constants::*;
    use crate::schema::{AttributeUsage, OidSchemaElement, Schema, SchemaElement};

    #[test]
    fn test_core_has_no_warnings() {
        let schema = Schema::core();
        assert!(schema.warnings().is_empty(), "{:?}", schema.warnings());
        assert_eq!(schema.name(), "Core Schema");
    }

    #[test]
    fn test_inherited_rules() {
        let schema = Schema::core();
        let cn = schema.get_attribute_type("commonName").unwrap();
        assert_eq!(cn.syntax().oid(), SYNTAX_DIRECTORY_STRING_OID);
        assert_eq!(cn.equality_matching_rule().oid(), EMR_CASE_IGNORE_OID);
        assert_eq!(cn.substring_matching_rule().oid(), SMR_CASE_IGNORE_OID);
        // Not declared by name: taken from the syntax defaults
        assert_eq!(cn.ordering_matching_rule().oid(), OMR_CASE_IGNORE_OID);
        assert_eq!(cn.approximate_matching_rule().oid(), AMR_DOUBLE_METAPHONE_OID);

        let member = schema.get_attribute_type("member").unwrap();
        assert_eq!(member.equality_matching_rule().oid(), EMR_DN_OID);
        // DN has no default ordering rule
        assert_eq!(member.ordering_matching_rule().oid(), EMR_OCTET_STRING_OID);
    }

    #[test]
    fn test_operational_attributes() {
        let schema = Schema::core();
        let created = schema.get_attribute_type("createTimestamp").unwrap();
        assert!(created.is_operational());
        assert!(created.is_single_value());
        assert!(created.is_no_user_modification());
        assert_eq!(created.usage(), AttributeUsage::DirectoryOperation);
        assert_eq!(
            created.extra_properties().get(SCHEMA_PROPERTY_ORIGIN),
            Some(&vec!["RFC 4512".to_string()])
        );
    }

    #[test]
    fn test_core_rules_and_syntaxes() {
        let schema = Schema::core();
        assert!(schema.has_syntax(SYNTAX_UUID_OID));
        assert!(schema.has_matching_rule("caseIgnoreOrderingMatch"));
        assert!(schema.has_matching_rule("ds-mr-double-metaphone-approx"));
        assert!(schema.has_matching_rule(MR_PARTIAL_DATE_AND_TIME_OID));
        assert!(schema.has_matching_rule("fr.lt"));
        let inet = schema.get_object_class("inetOrgPerson").unwrap();
        let mail = schema.get_attribute_type("mail").unwrap();
        assert!(inet.is_optional(mail));
        let sn = schema.get_attribute_type("sn").unwrap();
        assert!(inet.is_required(sn));
    }
}
