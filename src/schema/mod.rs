//! Schema definitions for SCIM resources.
//!
//! This module provides the attribute descriptors and schema containers of
//! the RFC 7643 resource model, and a registry for loading schema documents.
//!
//! # Key Types
//!
//! - [`Schema`] - SCIM schema definition with attributes and metadata
//! - [`AttributeType`] - Individual attribute specifications and constraints
//! - [`SchemaRegistry`] - Registry for loading and accessing schemas
//!
//! # Examples
//!
//! ```rust
//! use scim_kit::schema::{DataType, Schema};
//!
//! let mut schema = Schema::new(Schema::USER, "User", "https://example.com/v2/Schemas/User");
//! schema.add_attribute_with("emails", DataType::Complex, |emails| {
//!     emails.set_multi_valued(true);
//!     emails.add_attribute_with("value", DataType::String, |value| value.set_required(true));
//!     emails.add_attribute("primary", DataType::Boolean);
//! });
//! assert_eq!(schema.attributes()[0].sub_attributes().len(), 2);
//! ```

pub mod registry;
pub mod types;


// Re-export the main types for convenience
pub use registry::SchemaRegistry;
pub use types::{AttributeType, DataType, Mutability, Returned, Schema, Uniqueness};
