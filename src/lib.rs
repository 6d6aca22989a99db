//! SCIM 2.0 schema and resource modelling for Rust.
//!
//! Describes identity resources with typed attribute descriptors, binds values to
//! them with type-directed coercion, validates the result, and renders SCIM JSON
//! filtered by whether the document is produced as a protocol client or server.
//! No transport or storage is included.
//!
//! # Core Components
//!
//! - [`AttributeType`] - Attribute descriptor (datatype, multiplicity, mutability, ...)
//! - [`Attribute`] - Runtime value bound to one descriptor
//! - [`Resource`] - Resource instance bound to one or more [`Schema`]s
//! - [`SchemaRegistry`] - Loads and serves schema documents
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use scim_kit::{DataType, Mode, Resource, Schema};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::build(Schema::USER, "User", "https://example.com/v2/Schemas/User", |schema| {
//!     schema.add_attribute_with("userName", DataType::String, |user_name| {
//!         user_name.set_required(true);
//!     });
//!     schema.add_attribute_with("password", DataType::String, |password| {
//!         password.set_mutability("writeOnly").unwrap();
//!     });
//! });
//!
//! let mut user = Resource::new(vec![Arc::new(schema)], "https://example.com/v2/Users/1")?;
//! user.id = Some("1".to_string());
//! user.set("userName", "bjensen")?;
//! user.set("password", "t1meMa$heen")?;
//! user.validate()?;
//!
//! // Servers never emit write-only attributes.
//! assert!(user.as_json().get("password").is_none());
//! assert_eq!(user.as_json()["userName"], json!("bjensen"));
//!
//! let user = user.with_mode(Mode::Client);
//! assert_eq!(user.as_json()["password"], json!("t1meMa$heen"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod resource;
pub mod schema;

// Re-export commonly used types for convenience
pub use error::{ScimError, ScimResult, ValidationError, ValidationErrors, ValidationResult};
pub use resource::{Attribute, AttributeValue, Meta, Mode, Resource, ResourceAdapter};
pub use schema::{AttributeType, DataType, Mutability, Returned, Schema, SchemaRegistry, Uniqueness};
