//! LDAP schema
//!
//! Elements are staged in a [`SchemaBuilder`] and frozen into immutable
//! [`Schema`] snapshots. Each element kind has a plain description type
//! (what was declared) and a validated element type (the description with
//! its references resolved).

mod attribute_types;
mod base;
mod builders;
pub mod constants;
mod core_schema;
mod dit_rules;
mod matching_rules;
mod name_forms;
mod object_classes;
mod schemas;
mod syntaxes;
mod validation;

pub use attribute_types::{AttributeType, AttributeTypeDescription};
pub use base::{AttributeUsage, ExtraProperties, ObjectClassType, OidSchemaElement, SchemaElement};
pub use builders::{
    AttributeTypeBuilder, DitContentRuleBuilder, DitStructureRuleBuilder, MatchingRuleBuilder,
    MatchingRuleUseBuilder, NameFormBuilder, ObjectClassBuilder, SchemaBuilder, SyntaxBuilder,
};
pub use dit_rules::{DitContentRule, DitContentRuleDescription, DitStructureRule, DitStructureRuleDescription};
pub use matching_rules::{MatchingRule, MatchingRuleDescription, MatchingRuleUse, MatchingRuleUseDescription};
pub use name_forms::{NameForm, NameFormDescription};
pub use object_classes::{ObjectClass, ObjectClassDescription};
pub use schemas::Schema;
pub use syntaxes::{
    core_syntax_implementation, CoreSyntax, EnumerationSyntax, PatternSyntax, SubstitutionSyntax, Syntax,
    SyntaxDescription, SyntaxImpl, CORE_SYNTAXES,
};
