//! Command-line interface for ldapschema

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::collections::BTreeSet;
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use base64::{engine::general_purpose::STANDARD, Engine as _};
#[cfg(feature = "cli")]
use ldapschema::dump::SchemaDump;
#[cfg(feature = "cli")]
use ldapschema::{
    Assertion, ByteString, Error, IndexQuery, IndexQueryBuilder, Indexer, IndexingOptions, Result, Schema, SchemaBuilder,
    SchemaOptions,
};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "ldapschema")]
#[command(author, version, about = "LDAP schema matching rule tool", long_about = None)]
struct Cli {
    /// JSON file with schema options applied to the core schema
    #[arg(long, global = true, value_name = "FILE")]
    options: Option<PathBuf>,

    /// JSON file with indexing options
    #[arg(long, global = true, value_name = "FILE")]
    indexing_options: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the normalized form of a value as hex
    Normalize {
        /// Matching rule name or OID
        #[arg(short, long)]
        rule: String,

        /// Attribute value, prefix with b64: for binary values
        value: String,
    },

    /// Evaluate an assertion against a value
    Match {
        /// Matching rule name or OID
        #[arg(short, long)]
        rule: String,

        /// Assertion value
        #[arg(short, long)]
        assertion: String,

        /// Attribute value
        value: String,
    },

    /// Evaluate a substring assertion against a value
    Substring {
        /// Substring matching rule name or OID
        #[arg(short, long)]
        rule: String,

        /// Initial component
        #[arg(long)]
        initial: Option<String>,

        /// Any component, may be repeated
        #[arg(long)]
        any: Vec<String>,

        /// Final component
        #[arg(long = "final")]
        final_: Option<String>,

        /// Attribute value
        value: String,
    },

    /// Print the index keys generated for a value
    Keys {
        /// Matching rule name or OID
        #[arg(short, long)]
        rule: String,

        /// Substring index key size
        #[arg(long)]
        key_size: Option<usize>,

        /// Attribute value
        value: String,
    },

    /// Print the index query for an assertion as JSON
    Query {
        /// Matching rule name or OID
        #[arg(short, long)]
        rule: String,

        /// Assertion value
        #[arg(short, long)]
        assertion: String,
    },

    /// Summarize the core schema
    Dump {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = load_schema(cli.options.as_ref()).and_then(|schema| {
        let indexing = load_indexing_options(cli.indexing_options.as_ref())?;
        match cli.command {
            Commands::Normalize { rule, value } => cmd_normalize(&schema, &rule, &value),
            Commands::Match { rule, assertion, value } => cmd_match(&schema, &rule, &assertion, &value),
            Commands::Substring {
                rule,
                initial,
                any,
                final_,
                value,
            } => cmd_substring(&schema, &rule, initial.as_deref(), &any, final_.as_deref(), &value),
            Commands::Keys { rule, key_size, value } => cmd_keys(&schema, indexing, &rule, key_size, &value),
            Commands::Query { rule, assertion } => cmd_query(&schema, indexing, &rule, &assertion),
            Commands::Dump { json } => cmd_dump(&schema, json),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn load_schema(options: Option<&PathBuf>) -> Result<Schema> {
    let core = Schema::core();
    match options {
        None => Ok(core),
        Some(path) => {
            let options = SchemaOptions::from_json(&fs::read_to_string(path)?)?;
            Ok(SchemaBuilder::from_schema(&core).with_options(options).to_schema())
        }
    }
}

#[cfg(feature = "cli")]
fn load_indexing_options(path: Option<&PathBuf>) -> Result<IndexingOptions> {
    match path {
        None => Ok(IndexingOptions::default()),
        Some(path) => IndexingOptions::from_json(&fs::read_to_string(path)?),
    }
}

/// Decode a command-line value, `b64:` prefixed values are base64
#[cfg(feature = "cli")]
fn decode_value(value: &str) -> Result<Vec<u8>> {
    match value.strip_prefix("b64:") {
        Some(encoded) => STANDARD
            .decode(encoded)
            .map_err(|e| Error::InvalidArgument(format!("invalid base64 value: {}", e))),
        None => Ok(value.as_bytes().to_vec()),
    }
}

#[cfg(feature = "cli")]
fn cmd_normalize(schema: &Schema, rule: &str, value: &str) -> Result<()> {
    let rule = schema.get_matching_rule(rule)?;
    let normalized = rule.normalize_attribute_value(schema, &decode_value(value)?)?;
    println!("{}", normalized.to_hex_string());
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_match(schema: &Schema, rule: &str, assertion: &str, value: &str) -> Result<()> {
    let rule = schema.get_matching_rule(rule)?;
    let assertion = rule.get_assertion(schema, &decode_value(assertion)?)?;
    println!("{}", rule.evaluate(schema, assertion.as_ref(), &decode_value(value)?));
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_substring(
    schema: &Schema,
    rule: &str,
    initial: Option<&str>,
    any: &[String],
    final_: Option<&str>,
    value: &str,
) -> Result<()> {
    let rule = schema.get_matching_rule(rule)?;
    let initial = initial.map(decode_value).transpose()?;
    let final_ = final_.map(decode_value).transpose()?;
    let any = any.iter().map(|a| decode_value(a)).collect::<Result<Vec<_>>>()?;
    let any_slices: Vec<&[u8]> = any.iter().map(Vec::as_slice).collect();

    let assertion = rule.get_substring_assertion(schema, initial.as_deref(), &any_slices, final_.as_deref())?;
    println!("{}", rule.evaluate(schema, assertion.as_ref(), &decode_value(value)?));
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_keys(
    schema: &Schema,
    indexing: IndexingOptions,
    rule: &str,
    key_size: Option<usize>,
    value: &str,
) -> Result<()> {
    let rule = schema.get_matching_rule(rule)?;
    let indexing = match key_size {
        Some(size) => indexing.with_substring_key_size(size)?,
        None => indexing,
    };
    let value = decode_value(value)?;

    for indexer in rule.create_indexers(&indexing) {
        let mut keys = BTreeSet::<ByteString>::new();
        indexer.create_keys(schema, &value, &mut keys)?;
        println!("{}", indexer.index_id());
        for key in &keys {
            println!("  {}", key.to_hex_string());
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_query(schema: &Schema, indexing: IndexingOptions, rule: &str, assertion: &str) -> Result<()> {
    let rule = schema.get_matching_rule(rule)?;
    let assertion: Box<dyn Assertion> = rule.get_assertion(schema, &decode_value(assertion)?)?;
    let query: IndexQuery = assertion.create_index_query(&IndexQueryBuilder::new(indexing))?;
    println!("{}", serde_json::to_string_pretty(&query)?);
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_dump(schema: &Schema, json: bool) -> Result<()> {
    let dump = SchemaDump::from_schema(schema);
    if json {
        println!("{}", dump.to_json()?);
        return Ok(());
    }

    println!("=== Schema: {} ===", dump.name);
    println!("Syntaxes: {}", dump.counts.syntaxes);
    println!("Matching rules: {}", dump.counts.matching_rules);
    println!("Attribute types: {}", dump.counts.attribute_types);
    println!("Object classes: {}", dump.counts.object_classes);
    println!("Matching rule uses: {}", dump.counts.matching_rule_uses);
    println!("Name forms: {}", dump.counts.name_forms);
    println!("DIT content rules: {}", dump.counts.dit_content_rules);
    println!("DIT structure rules: {}", dump.counts.dit_structure_rules);

    if !dump.warnings.is_empty() {
        println!("\n=== Warnings ===");
        for warning in &dump.warnings {
            println!("  - {}", warning);
        }
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
