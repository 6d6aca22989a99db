//! Schema builders for test data.
//!
//! The core schemas follow RFC 7643 Section 4 and Section 8.7.1, trimmed to the
//! attributes the suites exercise.

use scim_kit::{AttributeType, DataType, Mutability, Returned, Schema, Uniqueness};

pub const ENTERPRISE_USER: &str = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

/// Fluent builder over [`Schema`] for concise test schemas.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            schema: Schema::new(id, name, format!("https://example.com/v2/Schemas/{}", id)),
        }
    }

    /// Add a single-valued attribute with default characteristics.
    pub fn attribute(mut self, name: &str, datatype: DataType) -> Self {
        self.schema.add_attribute(name, datatype);
        self
    }

    /// Add an attribute configured by `configure`.
    pub fn attribute_with<F>(mut self, name: &str, datatype: DataType, configure: F) -> Self
    where
        F: FnOnce(&mut AttributeType),
    {
        self.schema.add_attribute_with(name, datatype, configure);
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

/// `emails`, `phoneNumbers` and similar multi-valued complex attributes.
fn multi_valued_contact(attribute: &mut AttributeType, types: &[&str]) {
    attribute.set_multi_valued(true);
    attribute.add_attribute_with("value", DataType::String, |value| value.set_required(true));
    attribute.add_attribute("display", DataType::String);
    attribute.add_attribute_with("type", DataType::String, |kind| {
        kind.set_canonical_values(types.iter().copied());
    });
    attribute.add_attribute("primary", DataType::Boolean);
}

pub fn user_schema() -> Schema {
    SchemaBuilder::new(Schema::USER, "User")
        .attribute_with("userName", DataType::String, |user_name| {
            user_name.set_required(true);
            user_name
                .set_uniqueness(Uniqueness::Server)
                .expect("valid uniqueness");
        })
        .attribute_with("name", DataType::Complex, |name| {
            name.add_attribute("formatted", DataType::String);
            name.add_attribute("familyName", DataType::String);
            name.add_attribute("givenName", DataType::String);
            name.add_attribute("middleName", DataType::String);
        })
        .attribute("displayName", DataType::String)
        .attribute("nickName", DataType::String)
        .attribute("title", DataType::String)
        .attribute("active", DataType::Boolean)
        .attribute_with("password", DataType::String, |password| {
            password
                .set_mutability(Mutability::WriteOnly)
                .expect("valid mutability");
            password
                .set_returned(Returned::Never)
                .expect("valid returned");
        })
        .attribute_with("emails", DataType::Complex, |emails| {
            multi_valued_contact(emails, &["work", "home", "other"]);
        })
        .attribute_with("phoneNumbers", DataType::Complex, |phones| {
            multi_valued_contact(phones, &["work", "home", "mobile", "fax", "pager", "other"]);
        })
        .attribute_with("groups", DataType::Complex, |groups| {
            groups.set_multi_valued(true);
            groups
                .set_mutability(Mutability::ReadOnly)
                .expect("valid mutability");
            groups.add_attribute("value", DataType::String);
            groups.add_attribute_with("$ref", DataType::Reference, |reference| {
                reference.set_reference_types(["User", "Group"]);
            });
            groups.add_attribute("display", DataType::String);
        })
        .build()
}

pub fn enterprise_user_schema() -> Schema {
    SchemaBuilder::new(ENTERPRISE_USER, "EnterpriseUser")
        .attribute("employeeNumber", DataType::String)
        .attribute("costCenter", DataType::String)
        .attribute("organization", DataType::String)
        .attribute_with("manager", DataType::Complex, |manager| {
            manager.add_attribute("value", DataType::String);
            manager.add_attribute_with("$ref", DataType::Reference, |reference| {
                reference.set_reference_types(["User"]);
            });
            manager.add_attribute_with("displayName", DataType::String, |display_name| {
                display_name
                    .set_mutability(Mutability::ReadOnly)
                    .expect("valid mutability");
            });
        })
        .build()
}

pub fn group_schema() -> Schema {
    SchemaBuilder::new(Schema::GROUP, "Group")
        .attribute_with("displayName", DataType::String, |display_name| {
            display_name.set_required(true);
        })
        .attribute_with("members", DataType::Complex, |members| {
            members.set_multi_valued(true);
            members.add_attribute("value", DataType::String);
            members.add_attribute_with("$ref", DataType::Reference, |reference| {
                reference.set_reference_types(["User", "Group"]);
            });
            members.add_attribute_with("type", DataType::String, |kind| {
                kind.set_canonical_values(["User", "Group"]);
            });
        })
        .build()
}
