//! Error types for SCIM schema and resource operations.
//!
//! Two families of errors exist. [`ScimError`] covers structural mistakes made while
//! authoring schemas or wiring resources; these are returned immediately from the call
//! that introduced them. [`ValidationError`]s describe problems with assigned data and
//! are never returned from assignment: they are collected into a [`ValidationErrors`]
//! mapping by an explicit validation pass so that invalid state can still be inspected.

use std::collections::BTreeMap;
use std::fmt;

/// Main error type for schema authoring and resource wiring.
#[derive(Debug, thiserror::Error)]
pub enum ScimError {
    /// Attribute declared with a datatype outside the SCIM closed set
    #[error("Invalid attribute datatype: {datatype}")]
    InvalidDatatype { datatype: String },

    /// Mutability, returned, or uniqueness set to an unrecognized token
    #[error("Invalid {kind} value: {value}")]
    InvalidEnumValue { kind: &'static str, value: String },

    /// Schema document breaks a structural invariant
    #[error("Invalid schema: {message}")]
    InvalidSchema { message: String },

    /// Schema not found errors
    #[error("Schema not found: {schema_id}")]
    SchemaNotFound { schema_id: String },

    /// Resource constructed without any schema
    #[error("A resource must be bound to at least one schema")]
    MissingSchemas,

    /// Accessor lookup for a name no bound schema declares
    #[error("Unknown attribute: {name}")]
    UnknownAttribute { name: String },

    /// Resource document with the wrong top-level shape
    #[error("Invalid resource document: {message}")]
    InvalidDocument { message: String },

    /// Aggregate validation failure requested through an explicit validate call
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema file access errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single validation problem attached to one field key.
///
/// The display form is the short message that follows the field name, so
/// `ValidationError::Required` renders as `is required`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required attribute has no value
    #[error("is required")]
    Required,

    /// String value outside the declared canonical values
    #[error("'{value}' is not one of the canonical values {allowed:?}")]
    NotCanonical { value: String, allowed: Vec<String> },

    /// Value has the wrong shape for the declared datatype
    #[error("has invalid type, expected {expected}, got {actual}")]
    InvalidType { expected: String, actual: String },

    /// Value has the right shape but unparsable content
    #[error("is not a valid {expected}: {value}")]
    InvalidFormat { expected: String, value: String },

    /// Single value provided for a multi-valued attribute
    #[error("must be multi-valued (array)")]
    ExpectedMultiValue,

    /// Array provided for a single-valued attribute
    #[error("must be single-valued (not array)")]
    ExpectedSingleValue,

    /// Key in a complex value that matches no declared sub-attribute
    #[error("is not a recognized attribute")]
    UnknownAttribute,
}

/// Validation problems keyed by field name.
///
/// Keys are attribute names exactly as declared. Errors found in nested
/// sub-attributes are merged in under the sub-attribute's own name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<ValidationError>>,
}

impl ValidationErrors {
    /// Create an empty error mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field.
    pub fn add(&mut self, field: impl Into<String>, error: ValidationError) {
        self.fields.entry(field.into()).or_default().push(error);
    }

    /// Copy every entry of `other` into this mapping.
    pub fn merge(&mut self, other: &ValidationErrors) {
        for (field, errors) in &other.fields {
            self.fields
                .entry(field.clone())
                .or_default()
                .extend(errors.iter().cloned());
        }
    }

    /// Errors recorded for a field, empty when there are none.
    pub fn get(&self, field: &str) -> &[ValidationError] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any error is recorded for a field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Short messages recorded for a field.
    pub fn messages(&self, field: &str) -> Vec<String> {
        self.get(field).iter().map(ToString::to_string).collect()
    }

    /// Every message prefixed with its field name, e.g. `userName is required`.
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(field, errors)| errors.iter().map(move |e| format!("{field} {e}")))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with at least one error.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ValidationError])> {
        self.fields
            .iter()
            .map(|(field, errors)| (field.as_str(), errors.as_slice()))
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

// Convenience methods for creating common errors
impl ScimError {
    /// Create an invalid datatype error
    pub fn invalid_datatype(datatype: impl Into<String>) -> Self {
        Self::InvalidDatatype {
            datatype: datatype.into(),
        }
    }

    /// Create an invalid enum token error
    pub fn invalid_enum_value(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidEnumValue {
            kind,
            value: value.into(),
        }
    }

    /// Create an invalid schema error
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }

    /// Create a schema not found error
    pub fn schema_not_found(schema_id: impl Into<String>) -> Self {
        Self::SchemaNotFound {
            schema_id: schema_id.into(),
        }
    }

    /// Create an unknown attribute error
    pub fn unknown_attribute(name: impl Into<String>) -> Self {
        Self::UnknownAttribute { name: name.into() }
    }
}

impl ValidationError {
    /// Create an invalid type error
    pub fn invalid_type(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::InvalidType {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid format error
    pub fn invalid_format(expected: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidFormat {
            expected: expected.into(),
            value: value.into(),
        }
    }
}

impl From<ValidationErrors> for ScimError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

// Result type aliases for convenience
pub type ScimResult<T> = Result<T, ScimError>;
pub type ValidationResult<T> = Result<T, ValidationErrors>;
