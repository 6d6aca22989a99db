//! Core schema type definitions for SCIM resources.
//!
//! This module contains the descriptors that define SCIM schemas and their
//! attribute characteristics as specified in RFC 7643. Descriptors never hold
//! values; see [`crate::resource::Attribute`] for the runtime side.

use crate::error::{ScimError, ScimResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// SCIM attribute data types.
///
/// Represents the valid data types for SCIM attributes as defined in RFC 7643.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DataType {
    /// String value
    #[default]
    String,
    /// Boolean value
    Boolean,
    /// Decimal number
    Decimal,
    /// Integer number
    Integer,
    /// DateTime in ISO 8601 extended format
    #[serde(alias = "datetime")]
    DateTime,
    /// Binary data (base64 encoded)
    Binary,
    /// URI reference
    Reference,
    /// Complex attribute with sub-attributes
    Complex,
}

impl DataType {
    /// The SCIM token for this datatype.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Decimal => "decimal",
            Self::Integer => "integer",
            Self::DateTime => "dateTime",
            Self::Binary => "binary",
            Self::Reference => "reference",
            Self::Complex => "complex",
        }
    }
}

impl FromStr for DataType {
    type Err = ScimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "boolean" => Ok(Self::Boolean),
            "decimal" => Ok(Self::Decimal),
            "integer" => Ok(Self::Integer),
            "dateTime" | "datetime" => Ok(Self::DateTime),
            "binary" => Ok(Self::Binary),
            "reference" => Ok(Self::Reference),
            "complex" => Ok(Self::Complex),
            other => Err(ScimError::invalid_datatype(other)),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute mutability characteristics.
///
/// Defines whether and how an attribute can be modified.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    /// Read-only attribute (managed by server)
    ReadOnly,
    /// Read-write attribute (can be modified by clients)
    #[default]
    ReadWrite,
    /// Immutable attribute (set once, never modified)
    Immutable,
    /// Write-only attribute (passwords, etc.)
    WriteOnly,
}

impl Mutability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadOnly => "readOnly",
            Self::ReadWrite => "readWrite",
            Self::Immutable => "immutable",
            Self::WriteOnly => "writeOnly",
        }
    }
}

impl FromStr for Mutability {
    type Err = ScimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "readOnly" | "read_only" => Ok(Self::ReadOnly),
            "readWrite" | "read_write" => Ok(Self::ReadWrite),
            "immutable" => Ok(Self::Immutable),
            "writeOnly" | "write_only" => Ok(Self::WriteOnly),
            other => Err(ScimError::invalid_enum_value("mutability", other)),
        }
    }
}

/// When an attribute is included in a response.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Returned {
    /// Always returned, regardless of requested attributes
    Always,
    /// Never returned
    Never,
    /// Returned unless excluded
    #[default]
    Default,
    /// Returned only when requested
    Request,
}

impl Returned {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Never => "never",
            Self::Default => "default",
            Self::Request => "request",
        }
    }
}

impl FromStr for Returned {
    type Err = ScimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            "default" => Ok(Self::Default),
            "request" => Ok(Self::Request),
            other => Err(ScimError::invalid_enum_value("returned", other)),
        }
    }
}

/// Attribute uniqueness constraints.
///
/// Defines the scope of uniqueness for attribute values.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Uniqueness {
    /// No uniqueness constraint
    #[default]
    None,
    /// Unique within the server
    Server,
    /// Globally unique
    Global,
}

impl Uniqueness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Server => "server",
            Self::Global => "global",
        }
    }
}

impl FromStr for Uniqueness {
    type Err = ScimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "server" => Ok(Self::Server),
            "global" => Ok(Self::Global),
            other => Err(ScimError::invalid_enum_value("uniqueness", other)),
        }
    }
}

macro_rules! token_traits {
    ($($ty:ty),*) => {
        $(
            impl AsRef<str> for $ty {
                fn as_ref(&self) -> &str {
                    self.as_str()
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

token_traits!(Mutability, Returned, Uniqueness);

/// Definition of a SCIM attribute.
///
/// Defines all characteristics of an attribute including type, constraints,
/// visibility, and (for complex attributes) the ordered sub-attributes.
/// Once wrapped in an `Arc` by its parent or schema the descriptor is shared
/// read-only by every [`Attribute`](crate::resource::Attribute) bound to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeType {
    name: String,
    #[serde(rename = "type", default)]
    datatype: DataType,
    #[serde(default)]
    multi_valued: bool,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    case_exact: bool,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    canonical_values: Option<Vec<String>>,
    #[serde(default)]
    mutability: Mutability,
    #[serde(default)]
    returned: Returned,
    #[serde(default)]
    uniqueness: Uniqueness,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sub_attributes: Vec<Arc<AttributeType>>,
}

impl AttributeType {
    /// Create a descriptor with default characteristics.
    pub fn new(name: impl Into<String>, datatype: DataType) -> Self {
        Self {
            name: name.into(),
            datatype,
            multi_valued: false,
            required: false,
            case_exact: false,
            description: String::new(),
            canonical_values: None,
            mutability: Mutability::default(),
            returned: Returned::default(),
            uniqueness: Uniqueness::default(),
            reference_types: None,
            sub_attributes: Vec::new(),
        }
    }

    /// Create a descriptor from a datatype token such as `"dateTime"`.
    ///
    /// Fails with [`ScimError::InvalidDatatype`] for tokens outside the SCIM set.
    pub fn try_new(name: impl Into<String>, datatype: &str) -> ScimResult<Self> {
        Ok(Self::new(name, datatype.parse()?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    pub fn multi_valued(&self) -> bool {
        self.multi_valued
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn case_exact(&self) -> bool {
        self.case_exact
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn canonical_values(&self) -> Option<&[String]> {
        self.canonical_values.as_deref()
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub fn returned(&self) -> Returned {
        self.returned
    }

    pub fn uniqueness(&self) -> Uniqueness {
        self.uniqueness
    }

    pub fn reference_types(&self) -> Option<&[String]> {
        self.reference_types.as_deref()
    }

    /// Ordered sub-attributes of a complex attribute.
    pub fn sub_attributes(&self) -> &[Arc<AttributeType>] {
        &self.sub_attributes
    }

    /// Find a sub-attribute by name, ignoring case.
    pub fn sub_attribute(&self, name: &str) -> Option<&Arc<AttributeType>> {
        self.sub_attributes
            .iter()
            .find(|sub| sub.name.eq_ignore_ascii_case(name))
    }

    pub fn set_multi_valued(&mut self, multi_valued: bool) {
        self.multi_valued = multi_valued;
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub fn set_case_exact(&mut self, case_exact: bool) {
        self.case_exact = case_exact;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_canonical_values<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.canonical_values = Some(values.into_iter().map(Into::into).collect());
    }

    /// Set mutability from a [`Mutability`] value or its token (`"readOnly"`, `"read_only"`).
    pub fn set_mutability(&mut self, value: impl AsRef<str>) -> ScimResult<()> {
        self.mutability = value.as_ref().parse()?;
        Ok(())
    }

    /// Set the returned characteristic from a [`Returned`] value or its token.
    pub fn set_returned(&mut self, value: impl AsRef<str>) -> ScimResult<()> {
        self.returned = value.as_ref().parse()?;
        Ok(())
    }

    /// Set uniqueness from a [`Uniqueness`] value or its token.
    pub fn set_uniqueness(&mut self, value: impl AsRef<str>) -> ScimResult<()> {
        self.uniqueness = value.as_ref().parse()?;
        Ok(())
    }

    /// Restrict a reference attribute to the given target types.
    ///
    /// Switches the datatype to `reference`.
    pub fn set_reference_types<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.datatype = DataType::Reference;
        self.reference_types = Some(values.into_iter().map(Into::into).collect());
    }

    /// Append a sub-attribute with default characteristics.
    ///
    /// Switches the datatype to `complex`.
    pub fn add_attribute(&mut self, name: impl Into<String>, datatype: DataType) {
        self.add_attribute_with(name, datatype, |_| {});
    }

    /// Append a sub-attribute, configuring it before it is frozen into the tree.
    ///
    /// Switches the datatype to `complex`.
    pub fn add_attribute_with<F>(&mut self, name: impl Into<String>, datatype: DataType, configure: F)
    where
        F: FnOnce(&mut AttributeType),
    {
        self.datatype = DataType::Complex;
        let mut sub_attribute = AttributeType::new(name, datatype);
        configure(&mut sub_attribute);
        self.sub_attributes.push(Arc::new(sub_attribute));
    }

    pub(crate) fn is_complex(&self) -> bool {
        self.datatype == DataType::Complex
    }

    pub(crate) fn is_string(&self) -> bool {
        self.datatype == DataType::String
    }

    pub(crate) fn is_reference(&self) -> bool {
        self.datatype == DataType::Reference
    }

    /// Verify structural invariants of this descriptor and its sub-attributes.
    ///
    /// Deserialized descriptors bypass the mutators, so loaders call this to
    /// reject documents that declare sub-attributes on a non-complex type.
    pub fn check_structure(&self) -> ScimResult<()> {
        if self.name.trim().is_empty() {
            return Err(ScimError::invalid_schema("attribute name cannot be empty"));
        }
        if !self.sub_attributes.is_empty() && !self.is_complex() {
            return Err(ScimError::invalid_schema(format!(
                "attribute '{}' of type {} cannot have sub-attributes",
                self.name, self.datatype
            )));
        }
        if self.reference_types.is_some() && !self.is_reference() {
            return Err(ScimError::invalid_schema(format!(
                "attribute '{}' of type {} cannot declare reference types",
                self.name, self.datatype
            )));
        }
        self.sub_attributes
            .iter()
            .try_for_each(|sub_attribute| sub_attribute.check_structure())
    }
}

/// A SCIM schema definition.
///
/// Represents a complete schema with its metadata and attribute definitions.
/// Each schema defines the structure and validation rules for a specific
/// resource type like User or Group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Unique schema identifier (URI)
    pub id: String,
    /// Human-readable schema name
    pub name: String,
    /// Schema description
    #[serde(default)]
    pub description: String,
    /// Where the schema document is published
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(default)]
    attributes: Vec<Arc<AttributeType>>,
}

impl Schema {
    pub const ERROR: &'static str = "urn:ietf:params:scim:api:messages:2.0:Error";
    pub const GROUP: &'static str = "urn:ietf:params:scim:schemas:core:2.0:Group";
    pub const RESOURCE_TYPE: &'static str = "urn:ietf:params:scim:schemas:core:2.0:ResourceType";
    pub const SERVICE_PROVIDER_CONFIGURATION: &'static str =
        "urn:ietf:params:scim:schemas:core:2.0:ServiceProviderConfig";
    pub const USER: &'static str = "urn:ietf:params:scim:schemas:core:2.0:User";

    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            location: location.into(),
            attributes: Vec::new(),
        }
    }

    /// Create a schema and populate it in one expression.
    ///
    /// ```rust
    /// use scim_kit::schema::{DataType, Schema};
    ///
    /// let schema = Schema::build(Schema::USER, "User", "https://example.com/v2/Schemas/User", |schema| {
    ///     schema.add_attribute_with("userName", DataType::String, |user_name| {
    ///         user_name.set_required(true);
    ///     });
    /// });
    /// assert_eq!(schema.attributes().len(), 1);
    /// ```
    pub fn build<F>(
        id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        configure: F,
    ) -> Self
    where
        F: FnOnce(&mut Schema),
    {
        let mut schema = Self::new(id, name, location);
        configure(&mut schema);
        schema
    }

    pub fn attributes(&self) -> &[Arc<AttributeType>] {
        &self.attributes
    }

    /// Find a top-level attribute by name, ignoring case.
    pub fn attribute(&self, name: &str) -> Option<&Arc<AttributeType>> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name().eq_ignore_ascii_case(name))
    }

    pub fn add_attribute(&mut self, name: impl Into<String>, datatype: DataType) {
        self.add_attribute_with(name, datatype, |_| {});
    }

    pub fn add_attribute_with<F>(&mut self, name: impl Into<String>, datatype: DataType, configure: F)
    where
        F: FnOnce(&mut AttributeType),
    {
        let mut attribute = AttributeType::new(name, datatype);
        configure(&mut attribute);
        self.attributes.push(Arc::new(attribute));
    }

    /// Verify the schema document and every attribute descriptor it declares.
    pub fn check_structure(&self) -> ScimResult<()> {
        if self.id.trim().is_empty() {
            return Err(ScimError::invalid_schema("schema id cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(ScimError::invalid_schema(format!(
                "schema '{}' has an empty name",
                self.id
            )));
        }
        self.attributes
            .iter()
            .try_for_each(|attribute| attribute.check_structure())
    }
}
