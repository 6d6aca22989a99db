//! SCIM resource representation and validation.
//!
//! A [`Resource`] binds one [`Attribute`] per top-level attribute declared by its
//! schemas and adds the common first-class fields (`id`, `externalId`, `meta`).
//! Attributes are reached through a lookup table rather than generated members:
//! the declared name (case-insensitive), its snake_case accessor form, and for
//! single-valued complex attributes the composed `parent_child` and
//! `parent.child` forms all resolve to the same attribute.

use super::attribute::Attribute;
use super::context::{Mode, ResourceAdapter};
use super::meta::Meta;
use super::value::AttributeValue;
use super::version::version_from_content;
use crate::error::{ScimError, ScimResult, ValidationError, ValidationErrors};
use crate::schema::Schema;

use log::debug;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A SCIM resource instance bound to one or more schemas.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use scim_kit::resource::Resource;
/// use scim_kit::schema::{DataType, Schema};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let schema = Schema::build(Schema::USER, "User", "https://example.com/v2/Schemas/User", |schema| {
///         schema.add_attribute("userName", DataType::String);
///     });
///     let mut user = Resource::new(vec![Arc::new(schema)], "https://example.com/v2/Users/1")?;
///     user.id = Some("1".to_string());
///     user.set("user_name", "bjensen")?;
///
///     assert_eq!(user.get("userName")?.as_str(), Some("bjensen"));
///     assert!(user.is_valid());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Resource {
    /// Server-assigned identifier
    pub id: Option<String>,
    /// Identifier assigned by the provisioning client
    pub external_id: Option<String>,
    meta: Meta,
    schemas: Vec<Arc<Schema>>,
    attributes: Vec<Attribute>,
    accessors: HashMap<String, Accessor>,
    mode: Mode,
    errors: ValidationErrors,
}

/// Position of an attribute reachable by some accessor name.
#[derive(Debug, Clone)]
struct Accessor {
    index: usize,
    child: Option<String>,
}

impl Resource {
    /// Bind a resource to its schemas.
    ///
    /// The first schema's name becomes `meta.resourceType`. When several schemas
    /// declare the same attribute name the first declaration wins.
    pub fn new(schemas: Vec<Arc<Schema>>, location: impl Into<String>) -> ScimResult<Self> {
        let resource_type = schemas.first().ok_or(ScimError::MissingSchemas)?.name.clone();

        let mut attributes: Vec<Attribute> = Vec::new();
        let mut accessors = HashMap::new();
        for schema in &schemas {
            for attribute_type in schema.attributes() {
                let name = attribute_type.name();
                if attributes
                    .iter()
                    .any(|attribute| attribute.name().eq_ignore_ascii_case(name))
                {
                    debug!(
                        "Attribute '{}' from schema {} already bound, skipping",
                        name, schema.id
                    );
                    continue;
                }

                let index = attributes.len();
                register(&mut accessors, &[name], index, None);
                if attribute_type.is_complex() && !attribute_type.multi_valued() {
                    for sub_attribute in attribute_type.sub_attributes() {
                        register(
                            &mut accessors,
                            &[name, sub_attribute.name()],
                            index,
                            Some(sub_attribute.name()),
                        );
                    }
                }
                attributes.push(Attribute::new(Arc::clone(attribute_type)));
            }
        }

        Ok(Self {
            id: None,
            external_id: None,
            meta: Meta::new(resource_type, location),
            schemas,
            attributes,
            accessors,
            mode: Mode::default(),
            errors: ValidationErrors::new(),
        })
    }

    /// Switch the protocol side this resource renders for.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    pub fn schemas(&self) -> &[Arc<Schema>] {
        &self.schemas
    }

    /// Top-level attributes in binding order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up an attribute by declared name or accessor form.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        let accessor = self.accessors.get(&name.to_ascii_lowercase())?;
        let attribute = self.attributes.get(accessor.index)?;
        match &accessor.child {
            Some(child) => attribute.child(child),
            None => Some(attribute),
        }
    }

    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        let accessor = self.accessors.get(&name.to_ascii_lowercase())?;
        let attribute = self.attributes.get_mut(accessor.index)?;
        match &accessor.child {
            Some(child) => attribute.child_mut(child),
            None => Some(attribute),
        }
    }

    /// Read an attribute's coerced value.
    pub fn get(&self, name: &str) -> ScimResult<AttributeValue> {
        self.attribute(name)
            .map(Attribute::value)
            .ok_or_else(|| ScimError::unknown_attribute(name))
    }

    /// Assign through the attribute's coercion rules.
    pub fn set(&mut self, name: &str, value: impl Into<AttributeValue>) -> ScimResult<()> {
        let attribute = self
            .attribute_mut(name)
            .ok_or_else(|| ScimError::unknown_attribute(name))?;
        attribute.assign(value);
        Ok(())
    }

    /// Populate the resource from a SCIM JSON document.
    ///
    /// `id` and `externalId` fill the first-class fields; `schemas` and `meta`
    /// are ignored. Keys no bound schema declares are skipped.
    pub fn assign_json(&mut self, document: &Value) -> ScimResult<()> {
        let object = document.as_object().ok_or_else(|| ScimError::InvalidDocument {
            message: "resource document must be a JSON object".to_string(),
        })?;

        for (key, value) in object {
            match key.as_str() {
                "id" => self.id = text_field(value),
                "externalId" => self.external_id = text_field(value),
                "schemas" | "meta" => {}
                _ => match self.attribute_mut(key) {
                    Some(attribute) => attribute.assign(value),
                    None => debug!("Skipping undeclared attribute '{}'", key),
                },
            }
        }
        Ok(())
    }

    /// Recompute errors for the resource and every attribute.
    pub fn is_valid(&mut self) -> bool {
        let mut errors = ValidationErrors::new();
        if self.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            errors.add("id", ValidationError::Required);
        }
        for attribute in &mut self.attributes {
            if !attribute.is_valid() {
                errors.merge(attribute.errors());
            }
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Recompute errors and fail with [`ScimError::Validation`] when there are any.
    pub fn validate(&mut self) -> ScimResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ScimError::Validation(self.errors.clone()))
        }
    }

    /// Errors found by the most recent validity check.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Render the resource for the current mode.
    pub fn as_json(&self) -> Value {
        let mut object = self.content(self.mode);
        object.insert("meta".to_string(), self.meta.to_json());
        Value::Object(object)
    }

    /// Hash the server-side content into `meta.version` and return it.
    pub fn compute_version(&mut self) -> &str {
        let content = Value::Object(self.content(Mode::Server)).to_string();
        self.meta
            .version
            .insert(version_from_content(content.as_bytes()))
    }

    fn content(&self, mode: Mode) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert(
            "schemas".to_string(),
            Value::Array(
                self.schemas
                    .iter()
                    .map(|schema| Value::String(schema.id.clone()))
                    .collect(),
            ),
        );
        if let Some(id) = &self.id {
            object.insert("id".to_string(), Value::String(id.clone()));
        }
        if let Some(external_id) = &self.external_id {
            object.insert("externalId".to_string(), Value::String(external_id.clone()));
        }
        for attribute in &self.attributes {
            if let Some(value) = attribute.render(mode).filter(|value| !value.is_null()) {
                object.insert(attribute.name().to_string(), value);
            }
        }
        object
    }
}

impl ResourceAdapter for Resource {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn attribute_for(&self, name: &str) -> Option<&Attribute> {
        self.attribute(name)
    }

    fn attribute_for_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attribute_mut(name)
    }

    fn errors(&self) -> &ValidationErrors {
        &self.errors
    }
}

/// Register the declared (dotted) and snake_case forms of an attribute path.
fn register(
    accessors: &mut HashMap<String, Accessor>,
    path: &[&str],
    index: usize,
    child: Option<&str>,
) {
    let declared = path.join(".").to_ascii_lowercase();
    let snake = path
        .iter()
        .map(|segment| snake_case(segment))
        .collect::<Vec<_>>()
        .join("_");
    for key in [declared, snake] {
        accessors.entry(key).or_insert_with(|| Accessor {
            index,
            child: child.map(str::to_string),
        });
    }
}

/// `userName` -> `user_name`, `x509Certificates` -> `x509_certificates`.
fn snake_case(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    let mut previous: Option<char> = None;
    for c in name.chars() {
        if c.is_ascii_uppercase()
            && previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            snake.push('_');
        }
        snake.push(c.to_ascii_lowercase());
        previous = Some(c);
    }
    snake
}

fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
