//! Schema builder
//!
//! A [`SchemaBuilder`] stages raw element descriptions in any order and
//! freezes them into a [`Schema`] with [`SchemaBuilder::to_schema`]. Adding
//! an element whose OID (or rule ID) is already staged with different
//! content is a conflict unless overwriting is requested. Semantic problems
//! never fail the build: the offending elements are left out of the snapshot
//! and a warning is recorded on it.

use crate::error::{Error, Result};
use crate::matching::rules::{collation_rule_definitions, Collator};
use crate::names::{strip_oid_suffix, to_lower_case, validate_oid};
use crate::options::SchemaOptions;
use crate::schema::attribute_types::{AttributeType, AttributeTypeDescription};
use crate::schema::base::{AttributeUsage, ObjectClassType};
use crate::schema::constants::*;
use crate::schema::dit_rules::{
    DitContentRule, DitContentRuleDescription, DitStructureRule, DitStructureRuleDescription,
};
use crate::schema::matching_rules::{
    MatchingRule, MatchingRuleDescription, MatchingRuleUse, MatchingRuleUseDescription,
};
use crate::schema::name_forms::{NameForm, NameFormDescription};
use crate::schema::object_classes::{ObjectClass, ObjectClassDescription};
use crate::schema::syntaxes::{Syntax, SyntaxDescription, SyntaxImpl};
use crate::schema::validation::validate;
use crate::schema::Schema;
use indexmap::IndexMap;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, trace};

/// Staged element descriptions, keyed by OID (rule ID for DIT structure rules)
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Definitions {
    pub(crate) syntaxes: IndexMap<String, SyntaxDescription>,
    pub(crate) matching_rules: IndexMap<String, MatchingRuleDescription>,
    pub(crate) attribute_types: IndexMap<String, AttributeTypeDescription>,
    pub(crate) object_classes: IndexMap<String, ObjectClassDescription>,
    pub(crate) matching_rule_uses: IndexMap<String, MatchingRuleUseDescription>,
    pub(crate) name_forms: IndexMap<String, NameFormDescription>,
    pub(crate) dit_content_rules: IndexMap<String, DitContentRuleDescription>,
    pub(crate) dit_structure_rules: IndexMap<u32, DitStructureRuleDescription>,
}

fn stage<K, V>(map: &mut IndexMap<K, V>, key: K, value: V, overwrite: bool, kind: &str) -> Result<()>
where
    K: Hash + Eq + std::fmt::Display,
    V: PartialEq,
{
    if !overwrite {
        if let Some(existing) = map.get(&key) {
            if *existing != value {
                return Err(Error::ConflictingSchemaElement(format!(
                    "{} {} is already defined with different content",
                    kind, key
                )));
            }
        }
    }
    map.insert(key, value);
    Ok(())
}

fn staged_key<V>(map: &IndexMap<String, V>, name_or_oid: &str, names: impl Fn(&V) -> &[String]) -> Option<String> {
    let oid = strip_oid_suffix(name_or_oid.trim());
    if map.contains_key(oid) {
        return Some(oid.to_string());
    }
    let wanted = to_lower_case(name_or_oid);
    map.iter()
        .find(|(_, v)| names(v).iter().any(|n| to_lower_case(n) == wanted))
        .map(|(k, _)| k.clone())
}

fn required_oid(oid: impl Into<String>) -> Result<String> {
    let oid = oid.into().trim().to_string();
    validate_oid(&oid)?;
    Ok(oid)
}

/// Mutable accumulator of schema element descriptions
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    options: SchemaOptions,
    definitions: Definitions,
    base: Option<Schema>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::with_name("Schema")
    }

    /// Create an empty builder for a schema called `name`
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: SchemaOptions::default(),
            definitions: Definitions::default(),
            base: None,
        }
    }

    /// Create a builder holding every element of `schema`.
    ///
    /// If nothing changes, [`to_schema`](Self::to_schema) returns `schema` itself.
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            name: schema.name().to_string(),
            options: schema.options().clone(),
            definitions: schema.definitions().clone(),
            base: Some(schema.clone()),
        }
    }

    /// Replace the options
    pub fn with_options(mut self, options: SchemaOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the options in place
    pub fn set_options(&mut self, options: SchemaOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Rename the schema
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Current options
    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    /// Stage every element of `schema`
    pub fn add_schema(&mut self, schema: &Schema, overwrite: bool) -> Result<&mut Self> {
        let definitions = schema.definitions();
        for syntax in definitions.syntaxes.values() {
            self.add_syntax(syntax.clone(), overwrite)?;
        }
        for rule in definitions.matching_rules.values() {
            self.add_matching_rule(rule.clone(), overwrite)?;
        }
        for attribute_type in definitions.attribute_types.values() {
            self.add_attribute_type(attribute_type.clone(), overwrite)?;
        }
        for object_class in definitions.object_classes.values() {
            self.add_object_class(object_class.clone(), overwrite)?;
        }
        for rule_use in definitions.matching_rule_uses.values() {
            self.add_matching_rule_use(rule_use.clone(), overwrite)?;
        }
        for name_form in definitions.name_forms.values() {
            self.add_name_form(name_form.clone(), overwrite)?;
        }
        for rule in definitions.dit_content_rules.values() {
            self.add_dit_content_rule(rule.clone(), overwrite)?;
        }
        for rule in definitions.dit_structure_rules.values() {
            self.add_dit_structure_rule(rule.clone(), overwrite)?;
        }
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Direct adders
    // ------------------------------------------------------------------

    /// Stage a syntax
    pub fn add_syntax(&mut self, mut syntax: SyntaxDescription, overwrite: bool) -> Result<&mut Self> {
        syntax.oid = required_oid(syntax.oid)?;
        stage(&mut self.definitions.syntaxes, syntax.oid.clone(), syntax, overwrite, "syntax")?;
        Ok(self)
    }

    /// Stage a matching rule
    pub fn add_matching_rule(&mut self, mut rule: MatchingRuleDescription, overwrite: bool) -> Result<&mut Self> {
        rule.oid = required_oid(rule.oid)?;
        if rule.syntax.trim().is_empty() {
            return Err(Error::InvalidArgument(format!(
                "matching rule {} has no syntax",
                rule.oid
            )));
        }
        stage(&mut self.definitions.matching_rules, rule.oid.clone(), rule, overwrite, "matching rule")?;
        Ok(self)
    }

    /// Stage an attribute type
    pub fn add_attribute_type(
        &mut self,
        mut attribute_type: AttributeTypeDescription,
        overwrite: bool,
    ) -> Result<&mut Self> {
        attribute_type.oid = required_oid(attribute_type.oid)?;
        stage(
            &mut self.definitions.attribute_types,
            attribute_type.oid.clone(),
            attribute_type,
            overwrite,
            "attribute type",
        )?;
        Ok(self)
    }

    /// Stage an object class
    pub fn add_object_class(&mut self, mut object_class: ObjectClassDescription, overwrite: bool) -> Result<&mut Self> {
        object_class.oid = required_oid(object_class.oid)?;
        stage(
            &mut self.definitions.object_classes,
            object_class.oid.clone(),
            object_class,
            overwrite,
            "object class",
        )?;
        Ok(self)
    }

    /// Stage a matching rule use
    pub fn add_matching_rule_use(
        &mut self,
        mut rule_use: MatchingRuleUseDescription,
        overwrite: bool,
    ) -> Result<&mut Self> {
        rule_use.oid = required_oid(rule_use.oid)?;
        stage(
            &mut self.definitions.matching_rule_uses,
            rule_use.oid.clone(),
            rule_use,
            overwrite,
            "matching rule use",
        )?;
        Ok(self)
    }

    /// Stage a name form
    pub fn add_name_form(&mut self, mut name_form: NameFormDescription, overwrite: bool) -> Result<&mut Self> {
        name_form.oid = required_oid(name_form.oid)?;
        if name_form.structural_class.trim().is_empty() {
            return Err(Error::InvalidArgument(format!(
                "name form {} has no structural object class",
                name_form.oid
            )));
        }
        if name_form.required.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "name form {} has no required attribute types",
                name_form.oid
            )));
        }
        stage(&mut self.definitions.name_forms, name_form.oid.clone(), name_form, overwrite, "name form")?;
        Ok(self)
    }

    /// Stage a DIT content rule
    pub fn add_dit_content_rule(&mut self, mut rule: DitContentRuleDescription, overwrite: bool) -> Result<&mut Self> {
        rule.structural_class = required_oid(rule.structural_class)?;
        stage(
            &mut self.definitions.dit_content_rules,
            rule.structural_class.clone(),
            rule,
            overwrite,
            "DIT content rule",
        )?;
        Ok(self)
    }

    /// Stage a DIT structure rule
    pub fn add_dit_structure_rule(
        &mut self,
        mut rule: DitStructureRuleDescription,
        overwrite: bool,
    ) -> Result<&mut Self> {
        rule.name_form = rule.name_form.trim().to_string();
        if rule.name_form.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "DIT structure rule {} has no name form",
                rule.rule_id
            )));
        }
        stage(
            &mut self.definitions.dit_structure_rules,
            rule.rule_id,
            rule,
            overwrite,
            "DIT structure rule",
        )?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Extension syntaxes and rule families
    // ------------------------------------------------------------------

    /// Stage a syntax accepting only `values`, and an ordering rule
    /// (`OMR_ENUM_OID_PREFIX` + syntax OID) ordering them by declaration
    pub fn add_enumeration_syntax<I, S>(
        &mut self,
        oid: &str,
        description: &str,
        overwrite: bool,
        values: I,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "enumeration syntax {} has no values",
                oid
            )));
        }
        let oid = required_oid(oid)?;
        self.build_syntax(&oid)
            .description(description)
            .extra_property(SCHEMA_PROPERTY_ENUM, values)
            .add(overwrite)?;
        self.build_matching_rule(format!("{}{}", OMR_ENUM_OID_PREFIX, oid))
            .description(description)
            .syntax(&oid)
            .add(overwrite)
    }

    /// Stage a directory string syntax restricted to a regular expression
    pub fn add_pattern_syntax(
        &mut self,
        oid: &str,
        description: &str,
        pattern: &str,
        overwrite: bool,
    ) -> Result<&mut Self> {
        self.build_syntax(oid)
            .description(description)
            .extra_property(SCHEMA_PROPERTY_PATTERN, [pattern])
            .add(overwrite)
    }

    /// Stage a syntax that behaves as the syntax `substitute`
    pub fn add_substitution_syntax(
        &mut self,
        oid: &str,
        description: &str,
        substitute: &str,
        overwrite: bool,
    ) -> Result<&mut Self> {
        self.build_syntax(oid)
            .description(description)
            .extra_property(SCHEMA_PROPERTY_SUBST, [substitute])
            .add(overwrite)
    }

    /// Stage the collation rules of a locale: equality, ordering (lt, lte,
    /// gte, gt) and substring, below `base_oid`
    pub fn add_collation_matching_rules(
        &mut self,
        locale: &str,
        base_oid: &str,
        collator: Arc<dyn Collator>,
        overwrite: bool,
    ) -> Result<&mut Self> {
        let base_oid = required_oid(base_oid)?;
        for rule in collation_rule_definitions(&[locale], &base_oid, collator) {
            let mut description = MatchingRuleDescription::from(&rule);
            description.description = format!("{} collation {}", locale, rule.implementation.kind());
            self.add_matching_rule(description, overwrite)?;
        }
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Unstage a syntax
    pub fn remove_syntax(&mut self, oid: &str) -> bool {
        self.definitions
            .syntaxes
            .shift_remove(strip_oid_suffix(oid.trim()))
            .is_some()
    }

    /// Unstage a matching rule
    pub fn remove_matching_rule(&mut self, name_or_oid: &str) -> bool {
        staged_key(&self.definitions.matching_rules, name_or_oid, |d| d.names.as_slice())
            .and_then(|key| self.definitions.matching_rules.shift_remove(&key))
            .is_some()
    }

    /// Unstage an attribute type
    pub fn remove_attribute_type(&mut self, name_or_oid: &str) -> bool {
        staged_key(&self.definitions.attribute_types, name_or_oid, |d| d.names.as_slice())
            .and_then(|key| self.definitions.attribute_types.shift_remove(&key))
            .is_some()
    }

    /// Unstage an object class
    pub fn remove_object_class(&mut self, name_or_oid: &str) -> bool {
        staged_key(&self.definitions.object_classes, name_or_oid, |d| d.names.as_slice())
            .and_then(|key| self.definitions.object_classes.shift_remove(&key))
            .is_some()
    }

    /// Unstage a matching rule use
    pub fn remove_matching_rule_use(&mut self, name_or_oid: &str) -> bool {
        staged_key(&self.definitions.matching_rule_uses, name_or_oid, |d| d.names.as_slice())
            .and_then(|key| self.definitions.matching_rule_uses.shift_remove(&key))
            .is_some()
    }

    /// Unstage a name form
    pub fn remove_name_form(&mut self, name_or_oid: &str) -> bool {
        staged_key(&self.definitions.name_forms, name_or_oid, |d| d.names.as_slice())
            .and_then(|key| self.definitions.name_forms.shift_remove(&key))
            .is_some()
    }

    /// Unstage a DIT content rule
    pub fn remove_dit_content_rule(&mut self, name_or_oid: &str) -> bool {
        staged_key(&self.definitions.dit_content_rules, name_or_oid, |d| d.names.as_slice())
            .and_then(|key| self.definitions.dit_content_rules.shift_remove(&key))
            .is_some()
    }

    /// Unstage a DIT structure rule
    pub fn remove_dit_structure_rule(&mut self, rule_id: u32) -> bool {
        self.definitions.dit_structure_rules.shift_remove(&rule_id).is_some()
    }

    // ------------------------------------------------------------------
    // Element builders
    // ------------------------------------------------------------------

    /// Start a syntax description
    pub fn build_syntax(&mut self, oid: impl Into<String>) -> SyntaxBuilder<'_> {
        SyntaxBuilder {
            definition: SyntaxDescription {
                oid: oid.into(),
                ..Default::default()
            },
            builder: self,
        }
    }

    /// Start a syntax description copied from `syntax`
    pub fn build_syntax_from(&mut self, syntax: &Syntax) -> SyntaxBuilder<'_> {
        SyntaxBuilder {
            definition: syntax.definition().clone(),
            builder: self,
        }
    }

    /// Start a matching rule description
    pub fn build_matching_rule(&mut self, oid: impl Into<String>) -> MatchingRuleBuilder<'_> {
        MatchingRuleBuilder {
            definition: MatchingRuleDescription {
                oid: oid.into(),
                ..Default::default()
            },
            builder: self,
        }
    }

    /// Start a matching rule description copied from `rule`
    pub fn build_matching_rule_from(&mut self, rule: &MatchingRule) -> MatchingRuleBuilder<'_> {
        MatchingRuleBuilder {
            definition: rule.definition().clone(),
            builder: self,
        }
    }

    /// Start an attribute type description
    pub fn build_attribute_type(&mut self, oid: impl Into<String>) -> AttributeTypeBuilder<'_> {
        AttributeTypeBuilder {
            definition: AttributeTypeDescription {
                oid: oid.into(),
                ..Default::default()
            },
            builder: self,
        }
    }

    /// Start an attribute type description copied from `attribute_type`
    pub fn build_attribute_type_from(&mut self, attribute_type: &AttributeType) -> AttributeTypeBuilder<'_> {
        AttributeTypeBuilder {
            definition: attribute_type.definition().clone(),
            builder: self,
        }
    }

    /// Start an object class description
    pub fn build_object_class(&mut self, oid: impl Into<String>) -> ObjectClassBuilder<'_> {
        ObjectClassBuilder {
            definition: ObjectClassDescription {
                oid: oid.into(),
                ..Default::default()
            },
            builder: self,
        }
    }

    /// Start an object class description copied from `object_class`
    pub fn build_object_class_from(&mut self, object_class: &ObjectClass) -> ObjectClassBuilder<'_> {
        ObjectClassBuilder {
            definition: object_class.definition().clone(),
            builder: self,
        }
    }

    /// Start a matching rule use description
    pub fn build_matching_rule_use(&mut self, oid: impl Into<String>) -> MatchingRuleUseBuilder<'_> {
        MatchingRuleUseBuilder {
            definition: MatchingRuleUseDescription {
                oid: oid.into(),
                ..Default::default()
            },
            builder: self,
        }
    }

    /// Start a matching rule use description copied from `rule_use`
    pub fn build_matching_rule_use_from(&mut self, rule_use: &MatchingRuleUse) -> MatchingRuleUseBuilder<'_> {
        MatchingRuleUseBuilder {
            definition: rule_use.definition().clone(),
            builder: self,
        }
    }

    /// Start a name form description
    pub fn build_name_form(&mut self, oid: impl Into<String>) -> NameFormBuilder<'_> {
        NameFormBuilder {
            definition: NameFormDescription {
                oid: oid.into(),
                ..Default::default()
            },
            builder: self,
        }
    }

    /// Start a name form description copied from `name_form`
    pub fn build_name_form_from(&mut self, name_form: &NameForm) -> NameFormBuilder<'_> {
        NameFormBuilder {
            definition: name_form.definition().clone(),
            builder: self,
        }
    }

    /// Start a DIT content rule description for a structural class
    pub fn build_dit_content_rule(&mut self, structural_class: impl Into<String>) -> DitContentRuleBuilder<'_> {
        DitContentRuleBuilder {
            definition: DitContentRuleDescription {
                structural_class: structural_class.into(),
                ..Default::default()
            },
            builder: self,
        }
    }

    /// Start a DIT content rule description copied from `rule`
    pub fn build_dit_content_rule_from(&mut self, rule: &DitContentRule) -> DitContentRuleBuilder<'_> {
        DitContentRuleBuilder {
            definition: rule.definition().clone(),
            builder: self,
        }
    }

    /// Start a DIT structure rule description
    pub fn build_dit_structure_rule(&mut self, rule_id: u32) -> DitStructureRuleBuilder<'_> {
        DitStructureRuleBuilder {
            definition: DitStructureRuleDescription {
                rule_id,
                ..Default::default()
            },
            builder: self,
        }
    }

    /// Start a DIT structure rule description copied from `rule`
    pub fn build_dit_structure_rule_from(&mut self, rule: &DitStructureRule) -> DitStructureRuleBuilder<'_> {
        DitStructureRuleBuilder {
            definition: rule.definition().clone(),
            builder: self,
        }
    }

    // ------------------------------------------------------------------
    // Freezing
    // ------------------------------------------------------------------

    /// Validate the staged elements and freeze them into a schema.
    ///
    /// Returns the base schema itself when nothing differs from it. The
    /// builder keeps its staged elements, invalid ones included, and
    /// continues from the returned snapshot.
    pub fn to_schema(&mut self) -> Schema {
        if let Some(base) = &self.base {
            if base.name() == self.name
                && base.options() == &self.options
                && base.definitions() == &self.definitions
            {
                trace!(schema = %self.name, "no changes, reusing the base schema");
                return base.clone();
            }
        }

        let schema = validate(&self.name, &self.options, &self.definitions);
        debug!(
            schema = %schema.name(),
            syntaxes = schema.syntaxes().count(),
            matching_rules = schema.matching_rules().count(),
            attribute_types = schema.attribute_types().count(),
            object_classes = schema.object_classes().count(),
            warnings = schema.warnings().len(),
            "schema built"
        );

        self.base = Some(schema.clone());
        schema
    }
}

// ============================================================================
// Element builders
// ============================================================================

macro_rules! common_builder_methods {
    () => {
        /// Replace the names
        pub fn names<I, S>(mut self, names: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.definition.names = names.into_iter().map(Into::into).collect();
            self
        }

        /// Add a name
        pub fn name(mut self, name: impl Into<String>) -> Self {
            self.definition.names.push(name.into());
            self
        }

        /// Set the description
        pub fn description(mut self, description: impl Into<String>) -> Self {
            self.definition.description = description.into();
            self
        }

        /// Set the OBSOLETE flag
        pub fn obsolete(mut self, obsolete: bool) -> Self {
            self.definition.obsolete = obsolete;
            self
        }

        /// Set an extension property
        pub fn extra_property<I, S>(mut self, key: impl Into<String>, values: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.definition
                .extra_properties
                .insert(key.into(), values.into_iter().map(Into::into).collect());
            self
        }

        /// Remove an extension property
        pub fn remove_extra_property(mut self, key: &str) -> Self {
            self.definition.extra_properties.shift_remove(key);
            self
        }
    };
}

fn strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

/// Builds a syntax description
#[derive(Debug)]
pub struct SyntaxBuilder<'a> {
    builder: &'a mut SchemaBuilder,
    definition: SyntaxDescription,
}

impl<'a> SyntaxBuilder<'a> {
    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.definition.description = description.into();
        self
    }

    /// Set an extension property
    pub fn extra_property<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition
            .extra_properties
            .insert(key.into(), strings(values));
        self
    }

    /// Remove an extension property
    pub fn remove_extra_property(mut self, key: &str) -> Self {
        self.definition.extra_properties.shift_remove(key);
        self
    }

    /// Set the behaviour explicitly
    pub fn implementation(mut self, implementation: Arc<dyn SyntaxImpl>) -> Self {
        self.definition.implementation = Some(implementation);
        self
    }

    fn add(self, overwrite: bool) -> Result<&'a mut SchemaBuilder> {
        self.builder.add_syntax(self.definition, overwrite)
    }

    /// Stage the syntax; conflicts with different staged content fail
    pub fn add_to_schema(self) -> Result<&'a mut SchemaBuilder> {
        self.add(false)
    }

    /// Stage the syntax, replacing any staged one with the same OID
    pub fn add_to_schema_overwrite(self) -> Result<&'a mut SchemaBuilder> {
        self.add(true)
    }
}

/// Builds a matching rule description
#[derive(Debug)]
pub struct MatchingRuleBuilder<'a> {
    builder: &'a mut SchemaBuilder,
    definition: MatchingRuleDescription,
}

impl<'a> MatchingRuleBuilder<'a> {
    common_builder_methods!();

    /// Set the assertion syntax OID
    pub fn syntax(mut self, oid: impl Into<String>) -> Self {
        self.definition.syntax = oid.into();
        self
    }

    /// Set the behaviour explicitly
    pub fn implementation(mut self, implementation: Arc<dyn crate::matching::MatchingRuleImpl>) -> Self {
        self.definition.implementation = Some(implementation);
        self
    }

    fn add(self, overwrite: bool) -> Result<&'a mut SchemaBuilder> {
        self.builder.add_matching_rule(self.definition, overwrite)
    }

    /// Stage the matching rule; conflicts with different staged content fail
    pub fn add_to_schema(self) -> Result<&'a mut SchemaBuilder> {
        self.add(false)
    }

    /// Stage the matching rule, replacing any staged one with the same OID
    pub fn add_to_schema_overwrite(self) -> Result<&'a mut SchemaBuilder> {
        self.add(true)
    }
}

/// Builds an attribute type description
#[derive(Debug)]
pub struct AttributeTypeBuilder<'a> {
    builder: &'a mut SchemaBuilder,
    definition: AttributeTypeDescription,
}

impl<'a> AttributeTypeBuilder<'a> {
    common_builder_methods!();

    /// Set the superior type
    pub fn superior_type(mut self, name_or_oid: impl Into<String>) -> Self {
        self.definition.superior = Some(name_or_oid.into());
        self
    }

    /// Set the syntax OID
    pub fn syntax(mut self, oid: impl Into<String>) -> Self {
        self.definition.syntax = Some(oid.into());
        self
    }

    /// Set the equality matching rule
    pub fn equality_matching_rule(mut self, name_or_oid: impl Into<String>) -> Self {
        self.definition.equality_matching_rule = Some(name_or_oid.into());
        self
    }

    /// Set the ordering matching rule
    pub fn ordering_matching_rule(mut self, name_or_oid: impl Into<String>) -> Self {
        self.definition.ordering_matching_rule = Some(name_or_oid.into());
        self
    }

    /// Set the substring matching rule
    pub fn substring_matching_rule(mut self, name_or_oid: impl Into<String>) -> Self {
        self.definition.substring_matching_rule = Some(name_or_oid.into());
        self
    }

    /// Set the approximate matching rule
    pub fn approximate_matching_rule(mut self, name_or_oid: impl Into<String>) -> Self {
        self.definition.approximate_matching_rule = Some(name_or_oid.into());
        self
    }

    /// Set the SINGLE-VALUE flag
    pub fn single_value(mut self, single_value: bool) -> Self {
        self.definition.single_value = single_value;
        self
    }

    /// Set the COLLECTIVE flag
    pub fn collective(mut self, collective: bool) -> Self {
        self.definition.collective = collective;
        self
    }

    /// Set the NO-USER-MODIFICATION flag
    pub fn no_user_modification(mut self, no_user_modification: bool) -> Self {
        self.definition.no_user_modification = no_user_modification;
        self
    }

    /// Set the usage
    pub fn usage(mut self, usage: AttributeUsage) -> Self {
        self.definition.usage = usage;
        self
    }

    /// Stage the attribute type; conflicts with different staged content fail
    pub fn add_to_schema(self) -> Result<&'a mut SchemaBuilder> {
        self.builder.add_attribute_type(self.definition, false)
    }

    /// Stage the attribute type, replacing any staged one with the same OID
    pub fn add_to_schema_overwrite(self) -> Result<&'a mut SchemaBuilder> {
        self.builder.add_attribute_type(self.definition, true)
    }
}

/// Builds an object class description
#[derive(Debug)]
pub struct ObjectClassBuilder<'a> {
    builder: &'a mut SchemaBuilder,
    definition: ObjectClassDescription,
}

impl<'a> ObjectClassBuilder<'a> {
    common_builder_methods!();

    /// Replace the superior classes
    pub fn superior_classes<I, S>(mut self, superiors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.superiors = strings(superiors);
        self
    }

    /// Set the kind of class
    pub fn object_class_type(mut self, object_class_type: ObjectClassType) -> Self {
        self.definition.object_class_type = object_class_type;
        self
    }

    /// Add required attribute types
    pub fn required_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.required.extend(strings(attributes));
        self
    }

    /// Add optional attribute types
    pub fn optional_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.optional.extend(strings(attributes));
        self
    }

    /// Stage the object class; conflicts with different staged content fail
    pub fn add_to_schema(self) -> Result<&'a mut SchemaBuilder> {
        self.builder.add_object_class(self.definition, false)
    }

    /// Stage the object class, replacing any staged one with the same OID
    pub fn add_to_schema_overwrite(self) -> Result<&'a mut SchemaBuilder> {
        self.builder.add_object_class(self.definition, true)
    }
}

/// Builds a matching rule use description
#[derive(Debug)]
pub struct MatchingRuleUseBuilder<'a> {
    builder: &'a mut SchemaBuilder,
    definition: MatchingRuleUseDescription,
}

impl<'a> MatchingRuleUseBuilder<'a> {
    common_builder_methods!();

    /// Add attribute types the rule applies to
    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.attributes.extend(strings(attributes));
        self
    }

    /// Stage the matching rule use; conflicts with different staged content fail
    pub fn add_to_schema(self) -> Result<&'a mut SchemaBuilder> {
        self.builder.add_matching_rule_use(self.definition, false)
    }

    /// Stage the matching rule use, replacing any staged one with the same OID
    pub fn add_to_schema_overwrite(self) -> Result<&'a mut SchemaBuilder> {
        self.builder.add_matching_rule_use(self.definition, true)
    }
}

/// Builds a name form description
#[derive(Debug)]
pub struct NameFormBuilder<'a> {
    builder: &'a mut SchemaBuilder,
    definition: NameFormDescription,
}

impl<'a> NameFormBuilder<'a> {
    common_builder_methods!();

    /// Set the structural object class
    pub fn structural_class(mut self, name_or_oid: impl Into<String>) -> Self {
        self.definition.structural_class = name_or_oid.into();
        self
    }

    /// Add required RDN attribute types
    pub fn required_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.required.extend(strings(attributes));
        self
    }

    /// Add optional RDN attribute types
    pub fn optional_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.optional.extend(strings(attributes));
        self
    }

    /// Stage the name form; conflicts with different staged content fail
    pub fn add_to_schema(self) -> Result<&'a mut SchemaBuilder> {
        self.builder.add_name_form(self.definition, false)
    }

    /// Stage the name form, replacing any staged one with the same OID
    pub fn add_to_schema_overwrite(self) -> Result<&'a mut SchemaBuilder> {
        self.builder.add_name_form(self.definition, true)
    }
}

/// Builds a DIT content rule description
#[derive(Debug)]
pub struct DitContentRuleBuilder<'a> {
    builder: &'a mut SchemaBuilder,
    definition: DitContentRuleDescription,
}

impl<'a> DitContentRuleBuilder<'a> {
    common_builder_methods!();

    /// Add permitted auxiliary classes
    pub fn auxiliary_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.auxiliary_classes.extend(strings(classes));
        self
    }

    /// Add required attribute types
    pub fn required_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.required.extend(strings(attributes));
        self
    }

    /// Add optional attribute types
    pub fn optional_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.optional.extend(strings(attributes));
        self
    }

    /// Add prohibited attribute types
    pub fn prohibited_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.prohibited.extend(strings(attributes));
        self
    }

    /// Stage the rule; conflicts with different staged content fail
    pub fn add_to_schema(self) -> Result<&'a mut SchemaBuilder> {
        self.builder.add_dit_content_rule(self.definition, false)
    }

    /// Stage the rule, replacing any staged one for the same structural class
    pub fn add_to_schema_overwrite(self) -> Result<&'a mut SchemaBuilder> {
        self.builder.add_dit_content_rule(self.definition, true)
    }
}

/// Builds a DIT structure rule description
#[derive(Debug)]
pub struct DitStructureRuleBuilder<'a> {
    builder: &'a mut SchemaBuilder,
    definition: DitStructureRuleDescription,
}

impl<'a> DitStructureRuleBuilder<'a> {
    common_builder_methods!();

    /// Set the name form
    pub fn name_form(mut self, name_or_oid: impl Into<String>) -> Self {
        self.definition.name_form = name_or_oid.into();
        self
    }

    /// Add superior rule IDs
    pub fn superior_rules<I: IntoIterator<Item = u32>>(mut self, rule_ids: I) -> Self {
        self.definition.superior_rules.extend(rule_ids);
        self
    }

    /// Stage the rule; conflicts with different staged content fail
    pub fn add_to_schema(self) -> Result<&'a mut SchemaBuilder> {
        self.builder.add_dit_structure_rule(self.definition, false)
    }

    /// Stage the rule, replacing any staged one with the same rule ID
    pub fn add_to_schema_overwrite(self) -> Result<&'a mut SchemaBuilder> {
        self.builder.add_dit_structure_rule(self.definition, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{OidSchemaElement, SchemaElement};

    #[test]
    fn test_conflicting_attribute_type() {
        let mut builder = SchemaBuilder::from_schema(&Schema::core());
        builder
            .build_attribute_type("1.2.3.4")
            .name("first")
            .add_to_schema()
            .unwrap();
        // Identical content is not a conflict
        builder
            .build_attribute_type("1.2.3.4")
            .name("first")
            .add_to_schema()
            .unwrap();
        let conflict = builder.build_attribute_type("1.2.3.4").name("second").add_to_schema();
        assert!(matches!(conflict, Err(Error::ConflictingSchemaElement(_))));

        builder
            .build_attribute_type("1.2.3.4")
            .name("second")
            .add_to_schema_overwrite()
            .unwrap();
        let schema = builder.to_schema();
        assert!(schema.has_attribute_type("second"));
        assert!(!schema.has_attribute_type("first"));
    }

    #[test]
    fn test_invalid_arguments() {
        let mut builder = SchemaBuilder::new();
        assert!(matches!(
            builder.build_attribute_type("  ").add_to_schema(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            builder
                .build_name_form("1.2.3")
                .structural_class("person")
                .add_to_schema(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(builder
            .add_enumeration_syntax("1.2.3", "nothing", false, Vec::<String>::new())
            .is_err());
    }

    #[test]
    fn test_remove_by_name() {
        let mut builder = SchemaBuilder::from_schema(&Schema::core());
        assert!(builder.remove_attribute_type("userPassword"));
        assert!(!builder.remove_attribute_type("userPassword"));
        let schema = builder.to_schema();
        assert!(!schema.has_attribute_type("userPassword"));
        assert!(Schema::core().has_attribute_type("userPassword"));
    }

    #[test]
    fn test_copy_constructor() {
        let core = Schema::core();
        let cn = core.get_attribute_type("cn").unwrap().clone();
        let mut builder = SchemaBuilder::from_schema(&core);
        builder
            .build_attribute_type_from(&cn)
            .description("modified")
            .add_to_schema_overwrite()
            .unwrap();
        let schema = builder.to_schema();
        let modified = schema.get_attribute_type("cn").unwrap();
        assert_eq!(modified.description(), "modified");
        assert_eq!(modified.names(), cn.names());
        assert_eq!(modified.oid(), cn.oid());
    }

    #[test]
    fn test_builder_continues_after_to_schema() {
        let mut builder = SchemaBuilder::from_schema(&Schema::core());
        builder
            .build_attribute_type("1.2.3.10")
            .name("first")
            .syntax(SYNTAX_DIRECTORY_STRING_OID)
            .add_to_schema()
            .unwrap();
        let first = builder.to_schema();
        assert!(builder.to_schema().is_same_instance(&first));

        builder
            .build_attribute_type("1.2.3.11")
            .name("second")
            .superior_type("first")
            .add_to_schema()
            .unwrap();
        let second = builder.to_schema();
        assert!(!second.is_same_instance(&first));
        assert!(second.has_attribute_type("first"));
        assert!(second.has_attribute_type("second"));
        assert!(!first.has_attribute_type("second"));
    }
}
