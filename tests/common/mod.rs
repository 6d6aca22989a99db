//! Common test utilities for SCIM attribute and resource testing.
//!
//! Provides schema builders, JSON fixtures and logging setup shared across the
//! validation and integration suites.

use scim_kit::{Attribute, AttributeType, DataType, Mode, Resource};
use std::sync::Arc;

pub mod builders;
pub mod fixtures;

pub const USER_LOCATION: &str = "https://example.com/v2/Users/2819c223-7f76-453a-919d-413861904646";

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Bind a descriptor configured by `configure` to a fresh attribute.
pub fn attribute_with<F>(name: &str, datatype: DataType, configure: F) -> Attribute
where
    F: FnOnce(&mut AttributeType),
{
    let mut attribute_type = AttributeType::new(name, datatype);
    configure(&mut attribute_type);
    Attribute::new(Arc::new(attribute_type))
}

/// Bind an unconfigured descriptor to a fresh attribute.
pub fn attribute(name: &str, datatype: DataType) -> Attribute {
    attribute_with(name, datatype, |_| {})
}

/// A User resource bound to the core User schema from `builders`.
pub fn user_resource(mode: Mode) -> Resource {
    let schema = Arc::new(builders::user_schema());
    Resource::new(vec![schema], USER_LOCATION)
        .expect("one schema is bound")
        .with_mode(mode)
}

/// Convenience for asserting the error keys present after validation.
pub fn error_fields(errors: &scim_kit::ValidationErrors) -> Vec<String> {
    errors.fields().map(str::to_string).collect()
}
