//! # SCIM Schema Validator
//!
//! A command-line utility for validating SCIM schema files to ensure they can be
//! loaded by the library's schema registry.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin schema-validator schemas/User.json
//! cargo run --bin schema-validator ./schemas/
//! ```
//!
//! ## Validation Rules
//!
//! - Must be valid JSON deserializable as a schema document
//! - Schema `id` and `name` cannot be empty
//! - Attribute `type` must be one of the SCIM datatypes
//! - Attribute names cannot be empty
//! - Non-complex attributes cannot have sub-attributes
//! - Reference types only on reference attributes
//!
//! Schemas without attributes, complex attributes without sub-attributes and
//! canonical values on non-string attributes load, but are reported as warnings.
//!
//! ## Exit Codes
//!
//! - `0`: All schemas are valid
//! - `1`: One or more schemas are invalid or validation error occurred

use scim_kit::schema::{AttributeType, DataType, Schema, SchemaRegistry};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <schema-file-or-directory>", args[0]);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} schemas/User.json", args[0]);
        eprintln!("  {} ./schemas/", args[0]);
        process::exit(1);
    }

    let path = Path::new(&args[1]);

    if path.is_file() {
        validate_single_file(path);
    } else if path.is_dir() {
        validate_directory(path);
    } else {
        eprintln!(
            "Error: '{}' is not a valid file or directory",
            path.display()
        );
        process::exit(1);
    }
}

fn validate_single_file(file_path: &Path) {
    println!("Validating schema file: {}", file_path.display());

    match SchemaRegistry::load_schema_from_file(file_path) {
        Ok(schema) => {
            println!("✓ Schema is valid!");
            print_warnings(&schema, "  ");
            print_schema_summary(&schema);
        }
        Err(e) => {
            eprintln!("❌ Schema validation failed: {}", e);
            process::exit(1);
        }
    }
}

fn validate_directory(dir_path: &Path) {
    println!("Validating schemas in directory: {}", dir_path.display());

    let entries = match fs::read_dir(dir_path) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error reading directory: {}", e);
            process::exit(1);
        }
    };

    let mut valid_count = 0;
    let mut error_count = 0;

    for path in entries.flatten().map(|entry| entry.path()) {
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("\nValidating: {}", file_name);

        match SchemaRegistry::load_schema_from_file(&path) {
            Ok(schema) => {
                println!("  ✓ Valid - {} ({})", schema.name, schema.id);
                print_warnings(&schema, "    ");
                valid_count += 1;
            }
            Err(e) => {
                eprintln!("  ❌ Invalid - {}", e);
                error_count += 1;
            }
        }
    }

    println!("\nValidation Summary:");
    println!("  Valid schemas: {}", valid_count);
    println!("  Invalid schemas: {}", error_count);

    if error_count > 0 {
        process::exit(1);
    }

    println!("\nTesting schema registry loading...");
    match SchemaRegistry::from_schema_dir(dir_path) {
        Ok(registry) => {
            println!("✓ Schema registry loaded successfully");
            let schemas = registry.schemas();
            println!("  Total schemas loaded: {}", schemas.len());
            for schema in schemas {
                println!("    - {} ({})", schema.name, schema.id);
            }
        }
        Err(e) => {
            eprintln!("❌ Failed to load schema registry: {}", e);
            process::exit(1);
        }
    }
}

fn print_warnings(schema: &Schema, indent: &str) {
    let mut warnings = Vec::new();
    if schema.attributes().is_empty() {
        warnings.push("schema declares no attributes".to_string());
    }
    for attribute in schema.attributes() {
        collect_warnings(attribute, attribute.name(), &mut warnings);
    }
    for warning in warnings {
        println!("{}⚠ {}", indent, warning);
    }
}

fn collect_warnings(attribute: &AttributeType, path: &str, warnings: &mut Vec<String>) {
    if attribute.datatype() == DataType::Complex && attribute.sub_attributes().is_empty() {
        warnings.push(format!("{}: complex attribute has no sub-attributes", path));
    }
    if attribute.canonical_values().is_some()
        && !matches!(attribute.datatype(), DataType::String | DataType::Reference)
    {
        warnings.push(format!(
            "{}: canonical values on a {} attribute are not checked",
            path,
            attribute.datatype()
        ));
    }
    for sub_attribute in attribute.sub_attributes() {
        let sub_path = format!("{}.{}", path, sub_attribute.name());
        collect_warnings(sub_attribute, &sub_path, warnings);
    }
}

fn print_schema_summary(schema: &Schema) {
    println!();
    println!("Schema Summary:");
    println!("  ID: {}", schema.id);
    println!("  Name: {}", schema.name);
    println!("  Description: {}", schema.description);
    println!("  Attributes: {}", schema.attributes().len());

    let mut type_counts = BTreeMap::new();
    for attribute in schema.attributes() {
        *type_counts.entry(attribute.datatype().as_str()).or_insert(0) += 1;
    }
    let required: Vec<&str> = schema
        .attributes()
        .iter()
        .filter(|attribute| attribute.required())
        .map(|attribute| attribute.name())
        .collect();
    let multi_valued = schema
        .attributes()
        .iter()
        .filter(|attribute| attribute.multi_valued())
        .count();

    println!("  Required attributes: {}", required.len());
    println!("  Multi-valued attributes: {}", multi_valued);
    println!("  Attribute types:");
    for (datatype, count) in type_counts {
        println!("    - {}: {}", datatype, count);
    }

    if !required.is_empty() {
        println!("  Required attribute names: {}", required.join(", "));
    }
}
