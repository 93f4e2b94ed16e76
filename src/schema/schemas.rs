//! Immutable schema snapshots
//!
//! A [`Schema`] is a cheaply clonable handle on a frozen set of validated
//! elements. Elements are indexed by OID and by every declared name; names
//! are case-insensitive. Snapshots are only produced by
//! [`SchemaBuilder::to_schema`](crate::schema::SchemaBuilder::to_schema).

use crate::error::{Error, Result};
use crate::names::{strip_oid_suffix, to_lower_case};
use crate::options::SchemaOptions;
use crate::schema::attribute_types::AttributeType;
use crate::schema::base::{OidSchemaElement, SchemaElement};
use crate::schema::builders::{Definitions, SchemaBuilder};
use crate::schema::core_schema::build_core_schema;
use crate::schema::dit_rules::{DitContentRule, DitStructureRule};
use crate::schema::matching_rules::{MatchingRule, MatchingRuleUse};
use crate::schema::name_forms::NameForm;
use crate::schema::object_classes::ObjectClass;
use crate::schema::syntaxes::Syntax;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Lower-case name to the keys of the elements carrying it
type NameMap<K> = HashMap<String, Vec<K>>;

static CORE_SCHEMA: Lazy<Schema> = Lazy::new(build_core_schema);

static EMPTY_SCHEMA: Lazy<Schema> = Lazy::new(|| SchemaBuilder::with_name("Empty Schema").to_schema());

/// Result of looking up a name or OID
enum Found<'a, T> {
    One(&'a Arc<T>),
    Missing,
    Ambiguous,
}

impl<'a, T> Found<'a, T> {
    fn into_option(self) -> Option<&'a Arc<T>> {
        match self {
            Found::One(element) => Some(element),
            _ => None,
        }
    }

    fn into_result(self, kind: &str, name_or_oid: &str) -> Result<&'a Arc<T>> {
        match self {
            Found::One(element) => Ok(element),
            Found::Missing => Err(Error::UnknownSchemaElement(format!(
                "{} '{}' is not defined",
                kind, name_or_oid
            ))),
            Found::Ambiguous => Err(Error::AmbiguousSchemaElement(format!(
                "{} name '{}' is shared by several elements",
                kind, name_or_oid
            ))),
        }
    }
}

fn find<'a, K, T>(elements: &'a IndexMap<K, Arc<T>>, names: &NameMap<K>, key: Option<&K>, name: &str) -> Found<'a, T>
where
    K: Hash + Eq,
{
    if let Some(element) = key.and_then(|k| elements.get(k)) {
        return Found::One(element);
    }
    match names.get(&to_lower_case(name)).map(Vec::as_slice) {
        Some([only]) => elements.get(only).map_or(Found::Missing, Found::One),
        Some([_, _, ..]) => Found::Ambiguous,
        _ => Found::Missing,
    }
}

fn index_names<'a, K, T, I>(elements: I) -> NameMap<K>
where
    K: Clone + 'a,
    T: SchemaElement + 'a,
    I: IntoIterator<Item = (&'a K, &'a Arc<T>)>,
{
    let mut names: NameMap<K> = HashMap::new();
    for (key, element) in elements {
        for name in element.names() {
            names.entry(to_lower_case(name)).or_default().push(key.clone());
        }
    }
    names
}

#[derive(Debug, Default)]
pub(crate) struct NameIndex {
    matching_rules: NameMap<String>,
    attribute_types: NameMap<String>,
    object_classes: NameMap<String>,
    matching_rule_uses: NameMap<String>,
    name_forms: NameMap<String>,
    dit_content_rules: NameMap<String>,
    dit_structure_rules: NameMap<u32>,
}

/// Everything a snapshot owns
#[derive(Debug)]
pub(crate) struct SchemaInner {
    pub(crate) name: String,
    pub(crate) options: SchemaOptions,
    pub(crate) definitions: Definitions,
    pub(crate) syntaxes: IndexMap<String, Arc<Syntax>>,
    pub(crate) matching_rules: IndexMap<String, Arc<MatchingRule>>,
    pub(crate) attribute_types: IndexMap<String, Arc<AttributeType>>,
    pub(crate) object_classes: IndexMap<String, Arc<ObjectClass>>,
    pub(crate) matching_rule_uses: IndexMap<String, Arc<MatchingRuleUse>>,
    pub(crate) name_forms: IndexMap<String, Arc<NameForm>>,
    pub(crate) dit_content_rules: IndexMap<String, Arc<DitContentRule>>,
    pub(crate) dit_structure_rules: IndexMap<u32, Arc<DitStructureRule>>,
    pub(crate) default_syntax: Arc<Syntax>,
    pub(crate) default_matching_rule: Arc<MatchingRule>,
    pub(crate) warnings: Vec<String>,
    pub(crate) names: NameIndex,
}

impl SchemaInner {
    pub(crate) fn index_names(&mut self) {
        self.names = NameIndex {
            matching_rules: index_names(&self.matching_rules),
            attribute_types: index_names(&self.attribute_types),
            object_classes: index_names(&self.object_classes),
            matching_rule_uses: index_names(&self.matching_rule_uses),
            name_forms: index_names(&self.name_forms),
            dit_content_rules: index_names(&self.dit_content_rules),
            dit_structure_rules: index_names(&self.dit_structure_rules),
        };
    }
}

/// An immutable schema snapshot
#[derive(Debug, Clone)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

impl Schema {
    pub(crate) fn from_inner(mut inner: SchemaInner) -> Self {
        inner.index_names();
        Self {
            inner: Arc::new(inner),
        }
    }

    /// The core schema: standard syntaxes, matching rules, attribute types
    /// and object classes
    pub fn core() -> Schema {
        CORE_SCHEMA.clone()
    }

    /// A schema without elements, using the fallback default syntax and
    /// matching rule
    pub fn empty() -> Schema {
        EMPTY_SCHEMA.clone()
    }

    /// Schema name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Options the schema was built with
    pub fn options(&self) -> &SchemaOptions {
        &self.inner.options
    }

    /// Warnings recorded while the schema was built
    pub fn warnings(&self) -> &[String] {
        &self.inner.warnings
    }

    /// Syntax of attribute types that have none
    pub fn default_syntax(&self) -> &Arc<Syntax> {
        &self.inner.default_syntax
    }

    /// Matching rule used where no other can be bound
    pub fn default_matching_rule(&self) -> &Arc<MatchingRule> {
        &self.inner.default_matching_rule
    }

    /// Returns true if both handles refer to the same snapshot
    pub fn is_same_instance(&self, other: &Schema) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// A builder initialized with the elements of this schema
    pub fn to_builder(&self) -> SchemaBuilder {
        SchemaBuilder::from_schema(self)
    }

    pub(crate) fn definitions(&self) -> &Definitions {
        &self.inner.definitions
    }

    // ------------------------------------------------------------------
    // Syntaxes
    // ------------------------------------------------------------------

    /// Syntax with the given OID
    pub fn get_syntax(&self, oid: &str) -> Result<&Arc<Syntax>> {
        self.lookup_syntax(oid)
            .ok_or_else(|| Error::UnknownSchemaElement(format!("syntax '{}' is not defined", oid)))
    }

    /// Syntax with the given OID, if any
    pub fn lookup_syntax(&self, oid: &str) -> Option<&Arc<Syntax>> {
        self.inner.syntaxes.get(strip_oid_suffix(oid.trim()))
    }

    /// Returns true if the syntax exists
    pub fn has_syntax(&self, oid: &str) -> bool {
        self.lookup_syntax(oid).is_some()
    }

    /// Every syntax
    pub fn syntaxes(&self) -> impl Iterator<Item = &Arc<Syntax>> {
        self.inner.syntaxes.values()
    }

    // ------------------------------------------------------------------
    // Matching rules
    // ------------------------------------------------------------------

    fn find_matching_rule(&self, name_or_oid: &str) -> Found<'_, MatchingRule> {
        let key = strip_oid_suffix(name_or_oid.trim()).to_string();
        find(&self.inner.matching_rules, &self.inner.names.matching_rules, Some(&key), name_or_oid)
    }

    /// Matching rule with the given name or OID
    pub fn get_matching_rule(&self, name_or_oid: &str) -> Result<&Arc<MatchingRule>> {
        self.find_matching_rule(name_or_oid)
            .into_result("matching rule", name_or_oid)
    }

    /// Matching rule with the given name or OID, if unique
    pub fn lookup_matching_rule(&self, name_or_oid: &str) -> Option<&Arc<MatchingRule>> {
        self.find_matching_rule(name_or_oid).into_option()
    }

    /// Returns true if the matching rule exists
    pub fn has_matching_rule(&self, name_or_oid: &str) -> bool {
        self.lookup_matching_rule(name_or_oid).is_some()
    }

    /// Every matching rule
    pub fn matching_rules(&self) -> impl Iterator<Item = &Arc<MatchingRule>> {
        self.inner.matching_rules.values()
    }

    // ------------------------------------------------------------------
    // Attribute types
    // ------------------------------------------------------------------

    fn find_attribute_type(&self, name_or_oid: &str) -> Found<'_, AttributeType> {
        let key = strip_oid_suffix(name_or_oid.trim()).to_string();
        find(&self.inner.attribute_types, &self.inner.names.attribute_types, Some(&key), name_or_oid)
    }

    /// Attribute type with the given name or OID
    pub fn get_attribute_type(&self, name_or_oid: &str) -> Result<&Arc<AttributeType>> {
        self.find_attribute_type(name_or_oid)
            .into_result("attribute type", name_or_oid)
    }

    /// Attribute type with the given name or OID, if unique
    pub fn lookup_attribute_type(&self, name_or_oid: &str) -> Option<&Arc<AttributeType>> {
        self.find_attribute_type(name_or_oid).into_option()
    }

    /// Returns true if the attribute type exists
    pub fn has_attribute_type(&self, name_or_oid: &str) -> bool {
        self.lookup_attribute_type(name_or_oid).is_some()
    }

    /// Every attribute type
    pub fn attribute_types(&self) -> impl Iterator<Item = &Arc<AttributeType>> {
        self.inner.attribute_types.values()
    }

    // ------------------------------------------------------------------
    // Object classes
    // ------------------------------------------------------------------

    fn find_object_class(&self, name_or_oid: &str) -> Found<'_, ObjectClass> {
        let key = strip_oid_suffix(name_or_oid.trim()).to_string();
        find(&self.inner.object_classes, &self.inner.names.object_classes, Some(&key), name_or_oid)
    }

    /// Object class with the given name or OID
    pub fn get_object_class(&self, name_or_oid: &str) -> Result<&Arc<ObjectClass>> {
        self.find_object_class(name_or_oid)
            .into_result("object class", name_or_oid)
    }

    /// Object class with the given name or OID, if unique
    pub fn lookup_object_class(&self, name_or_oid: &str) -> Option<&Arc<ObjectClass>> {
        self.find_object_class(name_or_oid).into_option()
    }

    /// Returns true if the object class exists
    pub fn has_object_class(&self, name_or_oid: &str) -> bool {
        self.lookup_object_class(name_or_oid).is_some()
    }

    /// Every object class
    pub fn object_classes(&self) -> impl Iterator<Item = &Arc<ObjectClass>> {
        self.inner.object_classes.values()
    }

    // ------------------------------------------------------------------
    // Matching rule uses
    // ------------------------------------------------------------------

    fn find_matching_rule_use(&self, name_or_oid: &str) -> Found<'_, MatchingRuleUse> {
        let key = strip_oid_suffix(name_or_oid.trim()).to_string();
        find(
            &self.inner.matching_rule_uses,
            &self.inner.names.matching_rule_uses,
            Some(&key),
            name_or_oid,
        )
    }

    /// Matching rule use with the given name or OID
    pub fn get_matching_rule_use(&self, name_or_oid: &str) -> Result<&Arc<MatchingRuleUse>> {
        self.find_matching_rule_use(name_or_oid)
            .into_result("matching rule use", name_or_oid)
    }

    /// Matching rule use with the given name or OID, if unique
    pub fn lookup_matching_rule_use(&self, name_or_oid: &str) -> Option<&Arc<MatchingRuleUse>> {
        self.find_matching_rule_use(name_or_oid).into_option()
    }

    /// Returns true if the matching rule use exists
    pub fn has_matching_rule_use(&self, name_or_oid: &str) -> bool {
        self.lookup_matching_rule_use(name_or_oid).is_some()
    }

    /// The matching rule use of a matching rule
    pub fn matching_rule_use_for(&self, matching_rule: &MatchingRule) -> Option<&Arc<MatchingRuleUse>> {
        self.inner.matching_rule_uses.get(matching_rule.oid())
    }

    /// Every matching rule use
    pub fn matching_rule_uses(&self) -> impl Iterator<Item = &Arc<MatchingRuleUse>> {
        self.inner.matching_rule_uses.values()
    }

    // ------------------------------------------------------------------
    // Name forms
    // ------------------------------------------------------------------

    fn find_name_form(&self, name_or_oid: &str) -> Found<'_, NameForm> {
        let key = strip_oid_suffix(name_or_oid.trim()).to_string();
        find(&self.inner.name_forms, &self.inner.names.name_forms, Some(&key), name_or_oid)
    }

    /// Name form with the given name or OID
    pub fn get_name_form(&self, name_or_oid: &str) -> Result<&Arc<NameForm>> {
        self.find_name_form(name_or_oid)
            .into_result("name form", name_or_oid)
    }

    /// Name form with the given name or OID, if unique
    pub fn lookup_name_form(&self, name_or_oid: &str) -> Option<&Arc<NameForm>> {
        self.find_name_form(name_or_oid).into_option()
    }

    /// Returns true if the name form exists
    pub fn has_name_form(&self, name_or_oid: &str) -> bool {
        self.lookup_name_form(name_or_oid).is_some()
    }

    /// Name forms whose structural class is `object_class`
    pub fn name_forms_for(&self, object_class: &ObjectClass) -> Vec<&Arc<NameForm>> {
        self.inner
            .name_forms
            .values()
            .filter(|nf| nf.structural_class().oid() == object_class.oid())
            .collect()
    }

    /// Every name form
    pub fn name_forms(&self) -> impl Iterator<Item = &Arc<NameForm>> {
        self.inner.name_forms.values()
    }

    // ------------------------------------------------------------------
    // DIT content rules
    // ------------------------------------------------------------------

    fn find_dit_content_rule(&self, name_or_oid: &str) -> Found<'_, DitContentRule> {
        // Rules are keyed by their structural class, which may be named
        let key = match self.lookup_object_class(name_or_oid) {
            Some(object_class) => object_class.oid().to_string(),
            None => strip_oid_suffix(name_or_oid.trim()).to_string(),
        };
        find(
            &self.inner.dit_content_rules,
            &self.inner.names.dit_content_rules,
            Some(&key),
            name_or_oid,
        )
    }

    /// DIT content rule with the given name, or whose structural class has
    /// the given name or OID
    pub fn get_dit_content_rule(&self, name_or_oid: &str) -> Result<&Arc<DitContentRule>> {
        self.find_dit_content_rule(name_or_oid)
            .into_result("DIT content rule", name_or_oid)
    }

    /// DIT content rule with the given name or structural class, if unique
    pub fn lookup_dit_content_rule(&self, name_or_oid: &str) -> Option<&Arc<DitContentRule>> {
        self.find_dit_content_rule(name_or_oid).into_option()
    }

    /// Returns true if the DIT content rule exists
    pub fn has_dit_content_rule(&self, name_or_oid: &str) -> bool {
        self.lookup_dit_content_rule(name_or_oid).is_some()
    }

    /// The DIT content rule governing `object_class`
    pub fn dit_content_rule_for(&self, object_class: &ObjectClass) -> Option<&Arc<DitContentRule>> {
        self.inner.dit_content_rules.get(object_class.oid())
    }

    /// Every DIT content rule
    pub fn dit_content_rules(&self) -> impl Iterator<Item = &Arc<DitContentRule>> {
        self.inner.dit_content_rules.values()
    }

    // ------------------------------------------------------------------
    // DIT structure rules
    // ------------------------------------------------------------------

    /// DIT structure rule with the given rule ID
    pub fn get_dit_structure_rule(&self, rule_id: u32) -> Result<&Arc<DitStructureRule>> {
        self.inner.dit_structure_rules.get(&rule_id).ok_or_else(|| {
            Error::UnknownSchemaElement(format!("DIT structure rule {} is not defined", rule_id))
        })
    }

    /// DIT structure rule with the given name or rule ID
    pub fn get_dit_structure_rule_by_name(&self, name: &str) -> Result<&Arc<DitStructureRule>> {
        let key = name.trim().parse::<u32>().ok();
        find(
            &self.inner.dit_structure_rules,
            &self.inner.names.dit_structure_rules,
            key.as_ref(),
            name,
        )
        .into_result("DIT structure rule", name)
    }

    /// Returns true if the DIT structure rule exists
    pub fn has_dit_structure_rule(&self, rule_id: u32) -> bool {
        self.inner.dit_structure_rules.contains_key(&rule_id)
    }

    /// DIT structure rules using `name_form`
    pub fn dit_structure_rules_for(&self, name_form: &NameForm) -> Vec<&Arc<DitStructureRule>> {
        self.inner
            .dit_structure_rules
            .values()
            .filter(|rule| rule.name_form().oid() == name_form.oid())
            .collect()
    }

    /// Every DIT structure rule
    pub fn dit_structure_rules(&self) -> impl Iterator<Item = &Arc<DitStructureRule>> {
        self.inner.dit_structure_rules.values()
    }

    // ------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------

    /// The OID of the attribute type, object class, matching rule or name
    /// form carrying `name`
    pub fn oid_for_name(&self, name: &str) -> Option<&str> {
        if let Some(at) = self.lookup_attribute_type(name) {
            return Some(at.oid());
        }
        if let Some(oc) = self.lookup_object_class(name) {
            return Some(oc.oid());
        }
        if let Some(mr) = self.lookup_matching_rule(name) {
            return Some(mr.oid());
        }
        self.lookup_name_form(name).map(|nf| nf.oid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::constants::*;

    #[test]
    fn test_core_is_shared() {
        assert!(Schema::core().is_same_instance(&Schema::core()));
        assert!(!Schema::core().is_same_instance(&Schema::empty()));
        assert!(Schema::core().warnings().is_empty(), "{:?}", Schema::core().warnings());
    }

    #[test]
    fn test_lookups() {
        let schema = Schema::core();
        assert_eq!(schema.get_attribute_type("CN").unwrap().oid(), "2.5.4.3");
        assert_eq!(schema.get_attribute_type("2.5.4.3").unwrap().name_or_oid(), "cn");
        assert!(schema.has_object_class("top"));
        assert!(schema.has_syntax(SYNTAX_DIRECTORY_STRING_OID));
        assert!(schema.lookup_attribute_type("noSuchAttribute").is_none());
        assert!(matches!(
            schema.get_object_class("noSuchClass"),
            Err(Error::UnknownSchemaElement(_))
        ));
    }

    #[test]
    fn test_oid_for_name() {
        let schema = Schema::core();
        assert_eq!(schema.oid_for_name("commonName"), Some("2.5.4.3"));
        assert_eq!(schema.oid_for_name("person"), Some("2.5.6.6"));
        assert_eq!(schema.oid_for_name("caseIgnoreMatch"), Some(EMR_CASE_IGNORE_OID));
        assert_eq!(schema.oid_for_name("unknown"), None);
    }

    #[test]
    fn test_empty_schema_defaults() {
        let schema = Schema::empty();
        assert_eq!(schema.attribute_types().count(), 0);
        assert_eq!(schema.default_syntax().oid(), SYNTAX_OCTET_STRING_OID);
        assert_eq!(schema.default_matching_rule().oid(), EMR_OCTET_STRING_OID);
    }
}
