//! Loading the bundled schema documents and binding resources from them.

use crate::common::builders::ENTERPRISE_USER;
use crate::common::init_logging;
use scim_kit::{DataType, Mode, Mutability, Returned, Schema, SchemaRegistry};
use serde_json::json;
use std::path::PathBuf;

fn schema_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schemas")
}

fn registry() -> SchemaRegistry {
    SchemaRegistry::from_schema_dir(schema_dir()).expect("bundled schema directory is readable")
}

#[test]
fn test_bundled_schemas_load() {
    init_logging();

    let registry = registry();
    assert_eq!(registry.schemas().len(), 3);

    let user = registry.get_schema(Schema::USER).expect("User schema is bundled");
    assert_eq!(user.name, "User");
    let password = user.attribute("password").expect("password is declared");
    assert_eq!(password.mutability(), Mutability::WriteOnly);
    assert_eq!(password.returned(), Returned::Never);

    let certificates = user.attribute("x509Certificates").expect("certificates are declared");
    assert_eq!(
        certificates.sub_attribute("value").map(|value| value.datatype()),
        Some(DataType::Binary)
    );
    assert!(registry.get_schema(Schema::GROUP).is_some());
    assert!(registry.get_schema(ENTERPRISE_USER).is_some());
}

#[test]
fn test_group_from_registry() {
    let registry = registry();
    let mut group = registry
        .resource_for(&[Schema::GROUP], "https://example.com/v2/Groups/e9e30dba")
        .unwrap();
    group
        .assign_json(&json!({
            "id": "e9e30dba-f08f-4109-8486-d5c6a331660a",
            "displayName": "Tour Guides",
            "members": [
                {
                    "value": "2819c223-7f76-453a-919d-413861904646",
                    "$ref": "https://example.com/v2/Users/2819c223-7f76-453a-919d-413861904646",
                    "type": "User"
                }
            ]
        }))
        .unwrap();

    assert!(group.is_valid(), "{}", group.errors());
    let json = group.as_json();
    assert_eq!(json["meta"]["resourceType"], json!("Group"));
    assert_eq!(json["members"][0]["type"], json!("User"));

    // Immutable members are still sent by a client
    let group = group.with_mode(Mode::Client);
    assert_eq!(group.as_json()["members"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_enterprise_user_from_registry() {
    let registry = registry();
    let mut user = registry
        .resource_for(&[Schema::USER, ENTERPRISE_USER], "https://example.com/v2/Users/1")
        .unwrap();
    user.id = Some("1".to_string());
    user.set("userName", "bjensen").unwrap();
    user.set("manager.displayName", "John Smith").unwrap();
    user.set("manager_value", "26118915").unwrap();

    assert!(user.is_valid());
    assert_eq!(
        user.as_json()["manager"],
        json!({"value": "26118915", "displayName": "John Smith"})
    );

    let user = user.with_mode(Mode::Client);
    assert_eq!(user.as_json()["manager"], json!({"value": "26118915"}));
}

#[test]
fn test_bad_file_skipped_by_directory_loader() {
    let dir = std::env::temp_dir().join(format!("scim-kit-schemas-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("Thing.json"),
        r#"{"id": "urn:example:Thing", "name": "Thing", "attributes": [{"name": "size", "type": "integer"}]}"#,
    )
    .unwrap();
    std::fs::write(dir.join("Broken.json"), r#"{"id": "urn:example:Broken""#).unwrap();
    std::fs::write(dir.join("notes.txt"), "not a schema").unwrap();

    let registry = SchemaRegistry::from_schema_dir(&dir).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(registry.schemas().len(), 1);
    assert!(registry.get_schema("urn:example:Thing").is_some());
}

#[test]
fn test_missing_directory_is_an_error() {
    assert!(SchemaRegistry::from_schema_dir(schema_dir().join("does-not-exist")).is_err());
}
