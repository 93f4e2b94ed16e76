//! Schema validation
//!
//! Turns staged definitions into a frozen [`Schema`]. References are resolved
//! against the whole staged set, so the order in which elements were added
//! never matters. Hierarchical elements (attribute types, object classes and
//! DIT structure rules) are resolved on demand with a visiting set; meeting
//! an element that is still being resolved means a cycle. An element whose
//! references fail is left out of the snapshot and a warning is recorded.

use crate::matching::rules::{
    core_implementation, EnumerationOrderingNormalizer, EqualityMatchingRule, OctetStringNormalizer,
    OrderingMatchingRule,
};
use crate::matching::MatchingRuleImpl;
use crate::names::{is_valid_descr, is_valid_extension_key, strip_oid_suffix, to_lower_case};
use crate::options::SchemaOptions;
use crate::schema::attribute_types::{AttributeType, AttributeTypeDescription, RuleSlot};
use crate::schema::base::{AttributeUsage, ExtraProperties, ObjectClassType, OidSchemaElement};
use crate::schema::builders::Definitions;
use crate::schema::constants::*;
use crate::schema::dit_rules::{DitContentRule, DitContentRuleDescription, DitStructureRule};
use crate::schema::matching_rules::{MatchingRule, MatchingRuleDescription, MatchingRuleUse};
use crate::schema::name_forms::NameForm;
use crate::schema::object_classes::{ObjectClass, ObjectClassDescription};
use crate::schema::schemas::{NameIndex, SchemaInner};
use crate::schema::syntaxes::{
    core_syntax_implementation, EnumerationSyntax, PatternSyntax, SubstitutionSyntax, Syntax, SyntaxDescription,
    SyntaxImpl,
};
use crate::schema::Schema;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;
use tracing::warn;

type StagedNames = HashMap<String, Vec<String>>;

type Checked<T> = std::result::Result<T, String>;

fn staged_names<'d, V: 'd>(
    staged: &'d IndexMap<String, V>,
    names: impl Fn(&'d V) -> &'d [String],
) -> StagedNames {
    let mut index: StagedNames = HashMap::new();
    for (key, value) in staged {
        for name in names(value) {
            index.entry(to_lower_case(name)).or_default().push(key.clone());
        }
    }
    index
}

/// Keys of the staged elements with OID or name `name_or_oid`
fn candidate_keys<V>(staged: &IndexMap<String, V>, names: &StagedNames, name_or_oid: &str) -> Vec<String> {
    let trimmed = name_or_oid.trim();
    let oid = strip_oid_suffix(trimmed);
    if staged.contains_key(oid) {
        return vec![oid.to_string()];
    }
    names.get(&to_lower_case(trimmed)).cloned().unwrap_or_default()
}

/// Key of the only candidate for `name_or_oid` accepted by `is_valid`
fn resolve_key<V>(
    staged: &IndexMap<String, V>,
    names: &StagedNames,
    name_or_oid: &str,
    is_valid: impl Fn(&str) -> bool,
) -> Option<String> {
    let mut candidates = candidate_keys(staged, names, name_or_oid)
        .into_iter()
        .filter(|key| is_valid(key.as_str()));
    match (candidates.next(), candidates.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

/// Entries of `built` in the order their keys were staged
fn in_staged_order<K, V, T>(staged: &IndexMap<K, V>, mut built: IndexMap<K, T>) -> IndexMap<K, T>
where
    K: Hash + Eq + Clone,
{
    staged
        .keys()
        .filter_map(|key| built.swap_remove(key).map(|element| (key.clone(), element)))
        .collect()
}

fn first_property<'d>(properties: &'d ExtraProperties, key: &str) -> Option<&'d str> {
    properties
        .get(key)
        .and_then(|values| values.first())
        .map(String::as_str)
}

/// Validate `definitions` and freeze the valid elements into a schema
pub(crate) fn validate(name: &str, options: &SchemaOptions, definitions: &Definitions) -> Schema {
    let mut validator = Validator::new(name, options, definitions);
    validator.validate_syntaxes();
    validator.validate_matching_rules();
    validator.choose_defaults();
    validator.validate_attribute_types();
    validator.validate_object_classes();
    validator.validate_matching_rule_uses();
    validator.validate_name_forms();
    validator.validate_dit_content_rules();
    validator.validate_dit_structure_rules();
    validator.finish()
}

struct Validator<'a> {
    schema_name: &'a str,
    options: &'a SchemaOptions,
    defs: &'a Definitions,
    warnings: Vec<String>,

    matching_rule_names: StagedNames,
    attribute_type_names: StagedNames,
    object_class_names: StagedNames,
    name_form_names: StagedNames,

    syntaxes: IndexMap<String, Arc<Syntax>>,
    matching_rules: IndexMap<String, Arc<MatchingRule>>,
    attribute_types: IndexMap<String, Arc<AttributeType>>,
    object_classes: IndexMap<String, Arc<ObjectClass>>,
    matching_rule_uses: IndexMap<String, Arc<MatchingRuleUse>>,
    name_forms: IndexMap<String, Arc<NameForm>>,
    dit_content_rules: IndexMap<String, Arc<DitContentRule>>,
    dit_structure_rules: IndexMap<u32, Arc<DitStructureRule>>,

    default_syntax: Option<Arc<Syntax>>,
    default_matching_rule: Option<Arc<MatchingRule>>,

    failed_attribute_types: HashSet<String>,
    failed_object_classes: HashSet<String>,
    failed_dit_structure_rules: HashSet<u32>,
    visiting_attribute_types: HashSet<String>,
    visiting_object_classes: HashSet<String>,
    visiting_dit_structure_rules: HashSet<u32>,
}

impl<'a> Validator<'a> {
    fn new(schema_name: &'a str, options: &'a SchemaOptions, defs: &'a Definitions) -> Self {
        Self {
            schema_name,
            options,
            defs,
            warnings: Vec::new(),
            matching_rule_names: staged_names(&defs.matching_rules, |d| d.names.as_slice()),
            attribute_type_names: staged_names(&defs.attribute_types, |d| d.names.as_slice()),
            object_class_names: staged_names(&defs.object_classes, |d| d.names.as_slice()),
            name_form_names: staged_names(&defs.name_forms, |d| d.names.as_slice()),
            syntaxes: IndexMap::new(),
            matching_rules: IndexMap::new(),
            attribute_types: IndexMap::new(),
            object_classes: IndexMap::new(),
            matching_rule_uses: IndexMap::new(),
            name_forms: IndexMap::new(),
            dit_content_rules: IndexMap::new(),
            dit_structure_rules: IndexMap::new(),
            default_syntax: None,
            default_matching_rule: None,
            failed_attribute_types: HashSet::new(),
            failed_object_classes: HashSet::new(),
            failed_dit_structure_rules: HashSet::new(),
            visiting_attribute_types: HashSet::new(),
            visiting_object_classes: HashSet::new(),
            visiting_dit_structure_rules: HashSet::new(),
        }
    }

    fn warn(&mut self, message: String) {
        warn!(schema = %self.schema_name, "{}", message);
        self.warnings.push(message);
    }

    fn check_names(&self, kind: &str, key: &str, names: &[String], properties: &ExtraProperties) -> Checked<()> {
        let allow_malformed = self.options.allow_malformed_names_and_options;
        if let Some(name) = names.iter().find(|n| !is_valid_descr(n, allow_malformed)) {
            return Err(format!("{} {} has an invalid name '{}'", kind, key, name));
        }
        if let Some(property) = properties.keys().find(|k| !is_valid_extension_key(k)) {
            return Err(format!(
                "{} {} has an invalid extension property '{}'",
                kind, key, property
            ));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookups among validated elements
    // ------------------------------------------------------------------

    fn lookup_matching_rule(&self, name_or_oid: &str) -> Option<Arc<MatchingRule>> {
        resolve_key(&self.defs.matching_rules, &self.matching_rule_names, name_or_oid, |key| {
            self.matching_rules.contains_key(key)
        })
        .and_then(|key| self.matching_rules.get(&key).cloned())
    }

    fn lookup_attribute_type(&self, name_or_oid: &str) -> Option<Arc<AttributeType>> {
        resolve_key(&self.defs.attribute_types, &self.attribute_type_names, name_or_oid, |key| {
            self.attribute_types.contains_key(key)
        })
        .and_then(|key| self.attribute_types.get(&key).cloned())
    }

    fn lookup_object_class(&self, name_or_oid: &str) -> Option<Arc<ObjectClass>> {
        resolve_key(&self.defs.object_classes, &self.object_class_names, name_or_oid, |key| {
            self.object_classes.contains_key(key)
        })
        .and_then(|key| self.object_classes.get(&key).cloned())
    }

    fn attribute_list(&self, kind: &str, key: &str, role: &str, refs: &[String]) -> Checked<Vec<Arc<AttributeType>>> {
        refs.iter()
            .map(|r| {
                self.lookup_attribute_type(r).ok_or_else(|| {
                    format!(
                        "{} {} references unknown or invalid {} attribute type {}",
                        kind, key, role, r
                    )
                })
            })
            .collect()
    }

    /// Key of the superior attribute type named `name`. When a name is shared,
    /// every candidate is resolved first and the invalid ones are ignored.
    fn superior_attribute_type_key(&mut self, name: &str) -> Option<String> {
        let candidates = candidate_keys(&self.defs.attribute_types, &self.attribute_type_names, name);
        if candidates.len() < 2 {
            return candidates.into_iter().next();
        }
        for key in &candidates {
            if !self.visiting_attribute_types.contains(key) {
                self.attribute_type(key);
            }
        }
        let failed = &self.failed_attribute_types;
        resolve_key(&self.defs.attribute_types, &self.attribute_type_names, name, |key| {
            !failed.contains(key)
        })
    }

    /// Key of the superior object class named `name`, resolved like
    /// [`Self::superior_attribute_type_key`]
    fn superior_object_class_key(&mut self, name: &str) -> Option<String> {
        let candidates = candidate_keys(&self.defs.object_classes, &self.object_class_names, name);
        if candidates.len() < 2 {
            return candidates.into_iter().next();
        }
        for key in &candidates {
            if !self.visiting_object_classes.contains(key) {
                self.object_class(key);
            }
        }
        let failed = &self.failed_object_classes;
        resolve_key(&self.defs.object_classes, &self.object_class_names, name, |key| {
            !failed.contains(key)
        })
    }

    fn default_syntax(&self) -> Arc<Syntax> {
        self.default_syntax
            .clone()
            .unwrap_or_else(|| Arc::new(Syntax::fallback(SYNTAX_OCTET_STRING_OID)))
    }

    fn default_matching_rule(&self) -> Arc<MatchingRule> {
        self.default_matching_rule
            .clone()
            .unwrap_or_else(|| Arc::new(MatchingRule::fallback(EMR_OCTET_STRING_OID, self.default_syntax())))
    }

    // ------------------------------------------------------------------
    // Syntaxes
    // ------------------------------------------------------------------

    fn validate_syntaxes(&mut self) {
        let defs = self.defs;
        // Substitution targets must be plain syntaxes validated in the first pass
        for substitutions in [false, true] {
            for (oid, d) in &defs.syntaxes {
                let is_substitution =
                    d.implementation.is_none() && d.extra_properties.contains_key(SCHEMA_PROPERTY_SUBST);
                if is_substitution != substitutions {
                    continue;
                }
                match self.build_syntax(oid, d) {
                    Ok(syntax) => {
                        self.syntaxes.insert(oid.clone(), Arc::new(syntax));
                    }
                    Err(message) => self.warn(message),
                }
            }
        }
        self.syntaxes = in_staged_order(&defs.syntaxes, std::mem::take(&mut self.syntaxes));
    }

    fn build_syntax(&mut self, oid: &str, d: &SyntaxDescription) -> Checked<Syntax> {
        self.check_names("syntax", oid, &[], &d.extra_properties)?;
        let implementation = self.syntax_implementation(oid, d)?;
        let equality_oid = self.syntax_default_rule(oid, "equality", implementation.equality_matching_rule());
        let ordering_oid = self.syntax_default_rule(oid, "ordering", implementation.ordering_matching_rule());
        let substring_oid = self.syntax_default_rule(oid, "substring", implementation.substring_matching_rule());
        let approximate_oid =
            self.syntax_default_rule(oid, "approximate", implementation.approximate_matching_rule());
        Ok(Syntax {
            definition: d.clone(),
            implementation,
            equality_oid,
            ordering_oid,
            substring_oid,
            approximate_oid,
        })
    }

    fn syntax_implementation(&mut self, oid: &str, d: &SyntaxDescription) -> Checked<Arc<dyn SyntaxImpl>> {
        if let Some(implementation) = &d.implementation {
            return Ok(implementation.clone());
        }

        if let Some(target) = first_property(&d.extra_properties, SCHEMA_PROPERTY_SUBST) {
            let target_oid = strip_oid_suffix(target.trim());
            let resolved = self.syntaxes.get(target_oid).cloned();
            return Ok(match resolved {
                Some(target) => Arc::new(SubstitutionSyntax::new(target_oid, target.implementation().clone())),
                None => {
                    self.warn(format!(
                        "syntax {} substitutes unknown syntax {}, using the default syntax",
                        oid, target
                    ));
                    self.default_syntax_implementation()
                }
            });
        }

        if let Some(pattern) = first_property(&d.extra_properties, SCHEMA_PROPERTY_PATTERN) {
            return PatternSyntax::new(pattern)
                .map(|syntax| Arc::new(syntax) as Arc<dyn SyntaxImpl>)
                .map_err(|e| format!("syntax {} has an invalid pattern '{}': {}", oid, pattern, e));
        }

        if let Some(values) = d.extra_properties.get(SCHEMA_PROPERTY_ENUM) {
            let mut seen = HashSet::new();
            if let Some(duplicate) = values.iter().find(|v| !seen.insert(to_lower_case(v))) {
                return Err(format!(
                    "syntax {} declares the enumeration value '{}' more than once",
                    oid, duplicate
                ));
            }
            let ordering_rule = format!("{}{}", OMR_ENUM_OID_PREFIX, oid);
            return Ok(Arc::new(EnumerationSyntax::new(values.clone(), ordering_rule)));
        }

        if let Some(implementation) = core_syntax_implementation(oid) {
            return Ok(implementation);
        }
        self.warn(format!(
            "syntax {} has no implementation, using the default syntax",
            oid
        ));
        Ok(self.default_syntax_implementation())
    }

    fn default_syntax_implementation(&self) -> Arc<dyn SyntaxImpl> {
        let default_oid = self.options.default_syntax_oid.as_str();
        self.syntaxes
            .get(default_oid)
            .map(|syntax| syntax.implementation().clone())
            .or_else(|| core_syntax_implementation(default_oid))
            .unwrap_or_else(|| Syntax::fallback(SYNTAX_OCTET_STRING_OID).implementation().clone())
    }

    fn syntax_default_rule(&mut self, oid: &str, kind: &str, rule: Option<&str>) -> Option<String> {
        let rule = rule?;
        match resolve_key(&self.defs.matching_rules, &self.matching_rule_names, rule, |_| true) {
            Some(key) => Some(key),
            None => {
                self.warn(format!(
                    "syntax {} default {} matching rule {} is not defined, using {}",
                    oid, kind, rule, self.options.default_matching_rule_oid
                ));
                Some(self.options.default_matching_rule_oid.clone())
            }
        }
    }

    // ------------------------------------------------------------------
    // Matching rules
    // ------------------------------------------------------------------

    fn validate_matching_rules(&mut self) {
        let defs = self.defs;
        for (oid, d) in &defs.matching_rules {
            match self.build_matching_rule(oid, d) {
                Ok(rule) => {
                    self.matching_rules.insert(oid.clone(), Arc::new(rule));
                }
                Err(message) => self.warn(message),
            }
        }
    }

    fn build_matching_rule(&mut self, oid: &str, d: &MatchingRuleDescription) -> Checked<MatchingRule> {
        self.check_names("matching rule", oid, &d.names, &d.extra_properties)?;
        let syntax = self
            .syntaxes
            .get(strip_oid_suffix(d.syntax.trim()))
            .cloned()
            .ok_or_else(|| format!("matching rule {} uses unknown syntax {}", oid, d.syntax))?;
        let implementation = match &d.implementation {
            Some(implementation) => implementation.clone(),
            None => match core_implementation(oid).or_else(|| self.enumeration_ordering(oid)) {
                Some(implementation) => implementation,
                None => {
                    self.warn(format!(
                        "matching rule {} has no implementation, using the implementation of {}",
                        oid, self.options.default_matching_rule_oid
                    ));
                    self.default_rule_implementation()
                }
            },
        };
        Ok(MatchingRule {
            definition: d.clone(),
            syntax,
            implementation,
        })
    }

    /// Ordering rule generated for an enumeration syntax
    fn enumeration_ordering(&self, oid: &str) -> Option<Arc<dyn MatchingRuleImpl>> {
        let syntax_oid = oid.strip_prefix(OMR_ENUM_OID_PREFIX)?;
        let values = self
            .defs
            .syntaxes
            .get(syntax_oid)?
            .extra_properties
            .get(SCHEMA_PROPERTY_ENUM)?;
        Some(Arc::new(OrderingMatchingRule::new(
            oid,
            EnumerationOrderingNormalizer::new(values),
        )))
    }

    fn default_rule_implementation(&self) -> Arc<dyn MatchingRuleImpl> {
        let default_oid = self.options.default_matching_rule_oid.as_str();
        self.defs
            .matching_rules
            .get(default_oid)
            .and_then(|d| d.implementation.clone())
            .or_else(|| core_implementation(default_oid))
            .or_else(|| core_implementation(EMR_OCTET_STRING_OID))
            .unwrap_or_else(|| Arc::new(EqualityMatchingRule::new(EMR_OCTET_STRING_OID, OctetStringNormalizer)))
    }

    fn choose_defaults(&mut self) {
        let default_syntax = self
            .syntaxes
            .get(&self.options.default_syntax_oid)
            .cloned()
            .unwrap_or_else(|| Arc::new(Syntax::fallback(SYNTAX_OCTET_STRING_OID)));
        let default_matching_rule = self
            .matching_rules
            .get(&self.options.default_matching_rule_oid)
            .cloned()
            .unwrap_or_else(|| Arc::new(MatchingRule::fallback(EMR_OCTET_STRING_OID, default_syntax.clone())));
        self.default_syntax = Some(default_syntax);
        self.default_matching_rule = Some(default_matching_rule);
    }

    // ------------------------------------------------------------------
    // Attribute types
    // ------------------------------------------------------------------

    fn validate_attribute_types(&mut self) {
        let defs = self.defs;
        for oid in defs.attribute_types.keys() {
            self.attribute_type(oid);
        }
        self.attribute_types = in_staged_order(&defs.attribute_types, std::mem::take(&mut self.attribute_types));
    }

    fn attribute_type(&mut self, oid: &str) -> Option<Arc<AttributeType>> {
        if let Some(attribute_type) = self.attribute_types.get(oid) {
            return Some(attribute_type.clone());
        }
        if self.failed_attribute_types.contains(oid) {
            return None;
        }
        let defs = self.defs;
        let d = defs.attribute_types.get(oid)?;
        if !self.visiting_attribute_types.insert(oid.to_string()) {
            // Cycle; the element that closes it reports the failure
            return None;
        }
        let result = self.build_attribute_type(oid, d);
        self.visiting_attribute_types.remove(oid);
        match result {
            Ok(attribute_type) => {
                let attribute_type = Arc::new(attribute_type);
                self.attribute_types.insert(oid.to_string(), attribute_type.clone());
                Some(attribute_type)
            }
            Err(message) => {
                self.warn(message);
                self.failed_attribute_types.insert(oid.to_string());
                None
            }
        }
    }

    fn build_attribute_type(&mut self, oid: &str, d: &AttributeTypeDescription) -> Checked<AttributeType> {
        self.check_names("attribute type", oid, &d.names, &d.extra_properties)?;

        let superior = match &d.superior {
            Some(name) => {
                let key = self
                    .superior_attribute_type_key(name)
                    .ok_or_else(|| format!("attribute type {} has unknown superior type {}", oid, name))?;
                let superior = self.attribute_type(&key).ok_or_else(|| {
                    format!(
                        "attribute type {} has invalid or cyclic superior type {}",
                        oid, name
                    )
                })?;
                if superior.usage() != d.usage {
                    return Err(format!(
                        "attribute type {} has usage {} but its superior type {} has usage {}",
                        oid,
                        d.usage,
                        name,
                        superior.usage()
                    ));
                }
                if superior.is_collective() && !d.collective {
                    return Err(format!(
                        "attribute type {} is not collective but its superior type {} is",
                        oid, name
                    ));
                }
                Some(superior)
            }
            None => None,
        };

        let syntax = match &d.syntax {
            Some(syntax) => self
                .syntaxes
                .get(strip_oid_suffix(syntax.trim()))
                .cloned()
                .ok_or_else(|| format!("attribute type {} uses unknown syntax {}", oid, syntax))?,
            None => superior
                .as_ref()
                .map(|s| s.syntax().clone())
                .unwrap_or_else(|| self.default_syntax()),
        };

        let equality = self.rule_slot(
            oid,
            "equality",
            d.equality_matching_rule.as_deref(),
            superior.as_ref().and_then(|s| s.equality.inheritable()),
            syntax.equality_matching_rule_oid(),
        )?;
        let ordering = self.rule_slot(
            oid,
            "ordering",
            d.ordering_matching_rule.as_deref(),
            superior.as_ref().and_then(|s| s.ordering.inheritable()),
            syntax.ordering_matching_rule_oid(),
        )?;
        let substring = self.rule_slot(
            oid,
            "substring",
            d.substring_matching_rule.as_deref(),
            superior.as_ref().and_then(|s| s.substring.inheritable()),
            syntax.substring_matching_rule_oid(),
        )?;
        let approximate = self.rule_slot(
            oid,
            "approximate",
            d.approximate_matching_rule.as_deref(),
            superior.as_ref().and_then(|s| s.approximate.inheritable()),
            syntax.approximate_matching_rule_oid(),
        )?;

        if d.collective && d.usage.is_operational() {
            self.warn(format!(
                "attribute type {} is collective but has operational usage {}",
                oid, d.usage
            ));
        }
        if d.no_user_modification && d.usage == AttributeUsage::UserApplications {
            self.warn(format!(
                "attribute type {} is NO-USER-MODIFICATION but has usage {}",
                oid, d.usage
            ));
        }

        Ok(AttributeType {
            definition: d.clone(),
            superior,
            syntax,
            equality,
            ordering,
            substring,
            approximate,
        })
    }

    /// Explicit rule, else the superior's, else the syntax default, else the
    /// schema default. A superior slot that was itself defaulted is skipped.
    fn rule_slot(
        &self,
        oid: &str,
        kind: &str,
        explicit: Option<&str>,
        inherited: Option<&Arc<MatchingRule>>,
        syntax_default: Option<&str>,
    ) -> Checked<RuleSlot> {
        if let Some(rule) = explicit {
            return self
                .lookup_matching_rule(rule)
                .map(RuleSlot::bound)
                .ok_or_else(|| format!("attribute type {} uses unknown {} matching rule {}", oid, kind, rule));
        }
        if let Some(rule) = inherited {
            return Ok(RuleSlot::bound(rule.clone()));
        }
        Ok(syntax_default
            .and_then(|rule| self.matching_rules.get(rule).cloned())
            .map(RuleSlot::bound)
            .unwrap_or_else(|| RuleSlot::defaulted(self.default_matching_rule())))
    }

    // ------------------------------------------------------------------
    // Object classes
    // ------------------------------------------------------------------

    fn validate_object_classes(&mut self) {
        let defs = self.defs;
        for oid in defs.object_classes.keys() {
            self.object_class(oid);
        }
        self.object_classes = in_staged_order(&defs.object_classes, std::mem::take(&mut self.object_classes));
    }

    fn object_class(&mut self, oid: &str) -> Option<Arc<ObjectClass>> {
        if let Some(object_class) = self.object_classes.get(oid) {
            return Some(object_class.clone());
        }
        if self.failed_object_classes.contains(oid) {
            return None;
        }
        let defs = self.defs;
        let d = defs.object_classes.get(oid)?;
        if !self.visiting_object_classes.insert(oid.to_string()) {
            return None;
        }
        let result = self.build_object_class(oid, d);
        self.visiting_object_classes.remove(oid);
        match result {
            Ok(object_class) => {
                let object_class = Arc::new(object_class);
                self.object_classes.insert(oid.to_string(), object_class.clone());
                Some(object_class)
            }
            Err(message) => {
                self.warn(message);
                self.failed_object_classes.insert(oid.to_string());
                None
            }
        }
    }

    fn build_object_class(&mut self, oid: &str, d: &ObjectClassDescription) -> Checked<ObjectClass> {
        self.check_names("object class", oid, &d.names, &d.extra_properties)?;

        let mut superior_refs: Vec<&str> = d.superiors.iter().map(String::as_str).collect();
        if superior_refs.is_empty()
            && oid != TOP_OBJECTCLASS_OID
            && self.defs.object_classes.contains_key(TOP_OBJECTCLASS_OID)
        {
            superior_refs.push(TOP_OBJECTCLASS_OID);
        }

        let mut superiors = Vec::with_capacity(superior_refs.len());
        for name in superior_refs {
            let key = self
                .superior_object_class_key(name)
                .ok_or_else(|| format!("object class {} has unknown superior class {}", oid, name))?;
            let superior = self.object_class(&key).ok_or_else(|| {
                format!(
                    "object class {} has invalid or cyclic superior class {}",
                    oid, name
                )
            })?;
            let allowed = match (d.object_class_type, superior.object_class_type()) {
                (ObjectClassType::Abstract, other) => other == ObjectClassType::Abstract,
                (ObjectClassType::Auxiliary, ObjectClassType::Structural) => false,
                (ObjectClassType::Structural, ObjectClassType::Auxiliary) => false,
                _ => true,
            };
            if !allowed {
                return Err(format!(
                    "{} object class {} may not inherit from {} object class {}",
                    d.object_class_type,
                    oid,
                    superior.object_class_type(),
                    name
                ));
            }
            superiors.push(superior);
        }

        let declared_required = self.attribute_list("object class", oid, "required", &d.required)?;
        let declared_optional = self.attribute_list("object class", oid, "optional", &d.optional)?;

        let mut required: IndexMap<String, Arc<AttributeType>> = IndexMap::new();
        let mut optional: IndexMap<String, Arc<AttributeType>> = IndexMap::new();
        for superior in &superiors {
            required.extend(superior.required.iter().map(|(k, v)| (k.clone(), v.clone())));
            optional.extend(superior.optional.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        required.extend(declared_required.iter().map(|a| (a.oid().to_string(), a.clone())));
        optional.extend(declared_optional.iter().map(|a| (a.oid().to_string(), a.clone())));
        optional.retain(|key, _| !required.contains_key(key));

        Ok(ObjectClass {
            definition: d.clone(),
            superiors,
            declared_required,
            declared_optional,
            required,
            optional,
        })
    }

    // ------------------------------------------------------------------
    // Matching rule uses, name forms, DIT content rules
    // ------------------------------------------------------------------

    fn validate_matching_rule_uses(&mut self) {
        let defs = self.defs;
        for (oid, d) in &defs.matching_rule_uses {
            let result = self
                .check_names("matching rule use", oid, &d.names, &d.extra_properties)
                .and_then(|_| {
                    let matching_rule = self.lookup_matching_rule(oid).ok_or_else(|| {
                        format!("matching rule use {} refers to an unknown matching rule", oid)
                    })?;
                    let attributes = self.attribute_list("matching rule use", oid, "applied", &d.attributes)?;
                    Ok(MatchingRuleUse {
                        definition: d.clone(),
                        matching_rule,
                        attributes,
                    })
                });
            match result {
                Ok(rule_use) => {
                    self.matching_rule_uses.insert(oid.clone(), Arc::new(rule_use));
                }
                Err(message) => self.warn(message),
            }
        }
    }

    fn validate_name_forms(&mut self) {
        let defs = self.defs;
        for (oid, d) in &defs.name_forms {
            let result = self
                .check_names("name form", oid, &d.names, &d.extra_properties)
                .and_then(|_| {
                    let structural_class = self.lookup_object_class(&d.structural_class).ok_or_else(|| {
                        format!(
                            "name form {} has unknown or invalid structural class {}",
                            oid, d.structural_class
                        )
                    })?;
                    if structural_class.object_class_type() != ObjectClassType::Structural {
                        return Err(format!(
                            "name form {} uses {} object class {} as its structural class",
                            oid,
                            structural_class.object_class_type(),
                            d.structural_class
                        ));
                    }
                    if d.required.is_empty() {
                        return Err(format!("name form {} has no required attribute types", oid));
                    }
                    let required = self.attribute_list("name form", oid, "required", &d.required)?;
                    let optional = self.attribute_list("name form", oid, "optional", &d.optional)?;
                    Ok(NameForm {
                        definition: d.clone(),
                        structural_class,
                        required,
                        optional,
                    })
                });
            match result {
                Ok(name_form) => {
                    self.name_forms.insert(oid.clone(), Arc::new(name_form));
                }
                Err(message) => self.warn(message),
            }
        }
    }

    fn validate_dit_content_rules(&mut self) {
        let defs = self.defs;
        for (key, d) in &defs.dit_content_rules {
            match self.build_dit_content_rule(key, d) {
                Ok(rule) => {
                    let oid = rule.structural_class().oid().to_string();
                    if self.dit_content_rules.contains_key(&oid) {
                        self.warn(format!(
                            "DIT content rule {} duplicates the rule for structural class {}",
                            key, oid
                        ));
                    } else {
                        self.dit_content_rules.insert(oid, Arc::new(rule));
                    }
                }
                Err(message) => self.warn(message),
            }
        }
    }

    fn build_dit_content_rule(&self, key: &str, d: &DitContentRuleDescription) -> Checked<DitContentRule> {
        const KIND: &str = "DIT content rule";
        self.check_names(KIND, key, &d.names, &d.extra_properties)?;
        let structural_class = self
            .lookup_object_class(&d.structural_class)
            .ok_or_else(|| format!("{} {} has unknown or invalid structural class", KIND, key))?;
        if structural_class.object_class_type() != ObjectClassType::Structural {
            return Err(format!(
                "{} {} governs {} object class {}",
                KIND,
                key,
                structural_class.object_class_type(),
                structural_class.name_or_oid()
            ));
        }

        let mut auxiliary_classes = Vec::with_capacity(d.auxiliary_classes.len());
        for name in &d.auxiliary_classes {
            let auxiliary = self
                .lookup_object_class(name)
                .ok_or_else(|| format!("{} {} allows unknown or invalid auxiliary class {}", KIND, key, name))?;
            if auxiliary.object_class_type() != ObjectClassType::Auxiliary {
                return Err(format!(
                    "{} {} allows {} object class {} as an auxiliary class",
                    KIND,
                    key,
                    auxiliary.object_class_type(),
                    name
                ));
            }
            auxiliary_classes.push(auxiliary);
        }

        Ok(DitContentRule {
            definition: d.clone(),
            structural_class,
            auxiliary_classes,
            required: self.attribute_list(KIND, key, "required", &d.required)?,
            optional: self.attribute_list(KIND, key, "optional", &d.optional)?,
            prohibited: self.attribute_list(KIND, key, "prohibited", &d.prohibited)?,
        })
    }

    // ------------------------------------------------------------------
    // DIT structure rules
    // ------------------------------------------------------------------

    fn validate_dit_structure_rules(&mut self) {
        let defs = self.defs;
        for rule_id in defs.dit_structure_rules.keys() {
            self.dit_structure_rule(*rule_id);
        }
        self.dit_structure_rules = in_staged_order(
            &defs.dit_structure_rules,
            std::mem::take(&mut self.dit_structure_rules),
        );
    }

    fn dit_structure_rule(&mut self, rule_id: u32) -> Option<Arc<DitStructureRule>> {
        if let Some(rule) = self.dit_structure_rules.get(&rule_id) {
            return Some(rule.clone());
        }
        if self.failed_dit_structure_rules.contains(&rule_id) {
            return None;
        }
        let defs = self.defs;
        let d = defs.dit_structure_rules.get(&rule_id)?;
        if !self.visiting_dit_structure_rules.insert(rule_id) {
            return None;
        }
        let result = self
            .check_names("DIT structure rule", &rule_id.to_string(), &d.names, &d.extra_properties)
            .and_then(|_| {
                let name_form = resolve_key(&defs.name_forms, &self.name_form_names, &d.name_form, |key| {
                    self.name_forms.contains_key(key)
                })
                .and_then(|key| self.name_forms.get(&key).cloned())
                    .ok_or_else(|| {
                        format!(
                            "DIT structure rule {} uses unknown or invalid name form {}",
                            rule_id, d.name_form
                        )
                    })?;
                let mut superior_rules = Vec::with_capacity(d.superior_rules.len());
                for superior_id in &d.superior_rules {
                    let superior = self.dit_structure_rule(*superior_id).ok_or_else(|| {
                        format!(
                            "DIT structure rule {} has unknown, invalid or cyclic superior rule {}",
                            rule_id, superior_id
                        )
                    })?;
                    superior_rules.push(superior);
                }
                Ok(DitStructureRule {
                    definition: d.clone(),
                    name_form,
                    superior_rules,
                })
            });
        self.visiting_dit_structure_rules.remove(&rule_id);
        match result {
            Ok(rule) => {
                let rule = Arc::new(rule);
                self.dit_structure_rules.insert(rule_id, rule.clone());
                Some(rule)
            }
            Err(message) => {
                self.warn(message);
                self.failed_dit_structure_rules.insert(rule_id);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Snapshot
    // ------------------------------------------------------------------

    fn finish(self) -> Schema {
        let default_syntax = self.default_syntax();
        let default_matching_rule = self.default_matching_rule();
        Schema::from_inner(SchemaInner {
            name: self.schema_name.to_string(),
            options: self.options.clone(),
            definitions: self.defs.clone(),
            syntaxes: self.syntaxes,
            matching_rules: self.matching_rules,
            attribute_types: self.attribute_types,
            object_classes: self.object_classes,
            matching_rule_uses: self.matching_rule_uses,
            name_forms: self.name_forms,
            dit_content_rules: self.dit_content_rules,
            dit_structure_rules: self.dit_structure_rules,
            default_syntax,
            default_matching_rule,
            warnings: self.warnings,
            names: NameIndex::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::options::SchemaOptions;
    use crate::schema::constants::*;
    use crate::schema::{AttributeUsage, ObjectClassType, OidSchemaElement, Schema, SchemaBuilder};

    fn builder() -> SchemaBuilder {
        SchemaBuilder::from_schema(&Schema::core())
    }

    #[test]
    fn test_order_independent_superior() {
        let mut child_first = builder();
        child_first
            .build_attribute_type("1.2.3.2")
            .name("child")
            .superior_type("parent")
            .add_to_schema()
            .unwrap()
            .build_attribute_type("1.2.3.1")
            .name("parent")
            .syntax(SYNTAX_INTEGER_OID)
            .add_to_schema()
            .unwrap();
        let schema = child_first.to_schema();
        assert!(schema.warnings().is_empty(), "{:?}", schema.warnings());
        let child = schema.get_attribute_type("child").unwrap();
        assert_eq!(child.syntax().oid(), SYNTAX_INTEGER_OID);
        assert_eq!(child.equality_matching_rule().oid(), EMR_INTEGER_OID);
        assert_eq!(child.ordering_matching_rule().oid(), OMR_INTEGER_OID);
        assert_eq!(child.superior().unwrap().oid(), "1.2.3.1");
    }

    #[test]
    fn test_unknown_superior_is_excluded() {
        let mut builder = builder();
        builder
            .build_attribute_type("1.2.3.3")
            .name("orphan")
            .superior_type("doesNotExist")
            .add_to_schema()
            .unwrap()
            .build_attribute_type("1.2.3.4")
            .name("grandOrphan")
            .superior_type("orphan")
            .add_to_schema()
            .unwrap();
        let schema = builder.to_schema();
        assert!(!schema.has_attribute_type("orphan"));
        assert!(!schema.has_attribute_type("grandOrphan"));
        assert_eq!(schema.warnings().len(), 2);
    }

    #[test]
    fn test_superior_cycle() {
        let mut builder = builder();
        builder
            .build_attribute_type("1.2.3.5")
            .name("a")
            .superior_type("b")
            .add_to_schema()
            .unwrap()
            .build_attribute_type("1.2.3.6")
            .name("b")
            .superior_type("a")
            .add_to_schema()
            .unwrap();
        let schema = builder.to_schema();
        assert!(!schema.has_attribute_type("a"));
        assert!(!schema.has_attribute_type("b"));
        assert!(!schema.warnings().is_empty());
    }

    #[test]
    fn test_usage_must_match_superior() {
        let mut builder = builder();
        builder
            .build_attribute_type("1.2.3.7")
            .name("operationalName")
            .superior_type("name")
            .usage(AttributeUsage::DirectoryOperation)
            .add_to_schema()
            .unwrap();
        let schema = builder.to_schema();
        assert!(!schema.has_attribute_type("operationalName"));
        assert_eq!(schema.warnings().len(), 1);
    }

    #[test]
    fn test_usage_warnings_keep_element() {
        let mut builder = builder();
        builder
            .build_attribute_type("1.2.3.8")
            .name("readOnly")
            .syntax(SYNTAX_DIRECTORY_STRING_OID)
            .no_user_modification(true)
            .add_to_schema()
            .unwrap();
        let schema = builder.to_schema();
        assert!(schema.has_attribute_type("readOnly"));
        assert_eq!(schema.warnings().len(), 1);
    }

    #[test]
    fn test_object_class_kinds() {
        let mut builder = builder();
        builder
            .build_object_class("1.2.3.20")
            .name("aux")
            .object_class_type(ObjectClassType::Auxiliary)
            .add_to_schema()
            .unwrap()
            .build_object_class("1.2.3.21")
            .name("badStructural")
            .superior_classes(["aux"])
            .add_to_schema()
            .unwrap()
            .build_object_class("1.2.3.22")
            .name("implicitTop")
            .required_attributes(["cn"])
            .add_to_schema()
            .unwrap();
        let schema = builder.to_schema();
        assert!(schema.has_object_class("aux"));
        assert!(!schema.has_object_class("badStructural"));
        let implicit = schema.get_object_class("implicitTop").unwrap();
        assert_eq!(implicit.superiors()[0].oid(), TOP_OBJECTCLASS_OID);
        assert!(implicit.required_attributes().any(|a| a.oid() == OBJECT_CLASS_OID));
    }

    #[test]
    fn test_name_form_requires_structural_class() {
        let mut builder = builder();
        builder
            .build_name_form("1.2.3.30")
            .name("topForm")
            .structural_class("top")
            .required_attributes(["cn"])
            .add_to_schema()
            .unwrap()
            .build_name_form("1.2.3.31")
            .name("personForm")
            .structural_class("person")
            .required_attributes(["cn"])
            .add_to_schema()
            .unwrap()
            .build_dit_structure_rule(1)
            .name_form("personForm")
            .add_to_schema()
            .unwrap()
            .build_dit_structure_rule(2)
            .name_form("personForm")
            .superior_rules([1, 3])
            .add_to_schema()
            .unwrap();
        let schema = builder.to_schema();
        assert!(!schema.has_name_form("topForm"));
        assert!(schema.has_name_form("personForm"));
        assert!(schema.has_dit_structure_rule(1));
        assert!(!schema.has_dit_structure_rule(2));
        assert_eq!(schema.warnings().len(), 2);
    }

    #[test]
    fn test_enumeration_syntax() {
        let mut builder = builder();
        builder
            .add_enumeration_syntax("1.2.3.40", "Day", false, ["monday", "tuesday", "wednesday"])
            .unwrap()
            .add_enumeration_syntax("1.2.3.41", "Broken", false, ["one", "ONE"])
            .unwrap();
        let schema = builder.to_schema();
        let day = schema.get_syntax("1.2.3.40").unwrap();
        assert!(day.value_is_acceptable(&schema, b"Tuesday"));
        assert!(!day.value_is_acceptable(&schema, b"sunday"));
        let ordering = schema
            .get_matching_rule(&format!("{}1.2.3.40", OMR_ENUM_OID_PREFIX))
            .unwrap();
        let monday = ordering.normalize_attribute_value(&schema, b"monday").unwrap();
        let wednesday = ordering.normalize_attribute_value(&schema, b"wednesday").unwrap();
        assert!(monday < wednesday);
        assert!(!schema.has_syntax("1.2.3.41"));
    }

    #[test]
    fn test_substitution_and_pattern_syntaxes() {
        let mut builder = builder();
        builder
            .add_substitution_syntax("1.2.3.50", "Like integer", SYNTAX_INTEGER_OID, false)
            .unwrap()
            .add_substitution_syntax("1.2.3.51", "Missing target", "9.9.9", false)
            .unwrap()
            .add_pattern_syntax("1.2.3.52", "Digits", "^[0-9]+$", false)
            .unwrap()
            .add_pattern_syntax("1.2.3.53", "Broken", "([", false)
            .unwrap();
        let schema = builder.to_schema();
        let like_integer = schema.get_syntax("1.2.3.50").unwrap();
        assert!(like_integer.value_is_acceptable(&schema, b"42"));
        assert!(!like_integer.value_is_acceptable(&schema, b"forty-two"));
        assert!(schema.has_syntax("1.2.3.51"));
        let digits = schema.get_syntax("1.2.3.52").unwrap();
        assert!(digits.value_is_acceptable(&schema, b"123"));
        assert!(!digits.value_is_acceptable(&schema, b"12a"));
        assert!(!schema.has_syntax("1.2.3.53"));
        assert_eq!(schema.warnings().len(), 2);
    }

    #[test]
    fn test_invalid_names() {
        let mut builder = builder();
        builder
            .build_attribute_type("1.2.3.60")
            .name("bad name")
            .add_to_schema()
            .unwrap()
            .build_attribute_type("1.2.3.61")
            .name("goodName")
            .extra_property("ORIGIN", ["nowhere"])
            .add_to_schema()
            .unwrap()
            .build_attribute_type("1.2.3.62")
            .name("under_score")
            .add_to_schema()
            .unwrap();
        let schema = builder.to_schema();
        assert!(!schema.has_attribute_type("1.2.3.60"));
        assert!(!schema.has_attribute_type("1.2.3.61"));
        assert!(schema.has_attribute_type("under_score"));

        builder.set_options(SchemaOptions::strict());
        let strict = builder.to_schema();
        assert!(!strict.has_attribute_type("under_score"));
        assert!(strict.has_attribute_type("cn"));
    }
}
