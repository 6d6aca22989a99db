//! Runtime attribute values bound to schema descriptors.
//!
//! An [`Attribute`] pairs one shared [`AttributeType`] with the value assigned to
//! it. Assignment coerces input according to the descriptor's datatype and never
//! fails; problems with the data are reported by an explicit validation pass.
//! Rendering produces a JSON tree filtered by the mutability and returned
//! characteristics for the given [`Mode`].
//!
//! # Coercion
//!
//! | datatype    | stored as                                                    |
//! |-------------|--------------------------------------------------------------|
//! | `string`    | text; numbers, booleans and date/times use their text form   |
//! | `boolean`   | as given                                                     |
//! | `decimal`   | `f64`; integers widen, numeric text is parsed                |
//! | `integer`   | `i64`; decimals truncate toward zero, numeric text is parsed |
//! | `dateTime`  | native date/time; text is parsed when possible               |
//! | `binary`    | Base64 text; raw bytes are encoded                           |
//! | `reference` | as given                                                     |
//! | `complex`   | one child attribute per declared sub-attribute               |
//!
//! Input that cannot be coerced is kept verbatim so validation can report it.

use super::context::Mode;
use super::value::{AttributeValue, decimal_to_json, format_datetime};
use crate::error::{ValidationError, ValidationErrors, ValidationResult};
use crate::schema::{AttributeType, DataType, Mutability, Returned};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use log::{debug, trace};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A value holder bound to one attribute descriptor.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use scim_kit::resource::{Attribute, Mode};
/// use scim_kit::schema::{AttributeType, DataType};
/// use serde_json::json;
///
/// let mut name = AttributeType::new("name", DataType::Complex);
/// name.add_attribute("familyName", DataType::String);
/// name.add_attribute("givenName", DataType::String);
///
/// let mut attribute = Attribute::new(Arc::new(name));
/// attribute.assign(json!({"familyName": "Garrett", "givenName": "Tsuyoshi"}));
///
/// assert!(attribute.is_valid());
/// assert_eq!(
///     attribute.as_json(Mode::Server),
///     json!({"name": {"familyName": "Garrett", "givenName": "Tsuyoshi"}})
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Attribute {
    attribute_type: Arc<AttributeType>,
    slot: Slot,
    errors: ValidationErrors,
}

#[derive(Debug, Clone)]
enum Slot {
    /// Scalar or list storage; also holds shapes a complex attribute cannot take.
    Value(AttributeValue),
    /// Single-valued complex attribute.
    Complex(SubAttributes),
    /// Multi-valued complex attribute.
    Items(Vec<Item>),
}

#[derive(Debug, Clone)]
enum Item {
    Object(SubAttributes),
    Other(AttributeValue),
}

/// Child attributes of one complex value, in declaration order.
#[derive(Debug, Clone)]
struct SubAttributes {
    attributes: Vec<Attribute>,
    unknown: Vec<String>,
}

impl Attribute {
    /// Bind a descriptor with no value assigned.
    ///
    /// Multi-valued attributes start as an empty list.
    pub fn new(attribute_type: Arc<AttributeType>) -> Self {
        let slot = empty_slot(&attribute_type);
        Self {
            attribute_type,
            slot,
            errors: ValidationErrors::new(),
        }
    }

    /// Declared attribute name.
    pub fn name(&self) -> &str {
        self.attribute_type.name()
    }

    pub fn attribute_type(&self) -> &AttributeType {
        &self.attribute_type
    }

    /// Assign a value, coercing it according to the declared datatype.
    pub fn assign(&mut self, value: impl Into<AttributeValue>) {
        self.store(value.into(), true);
    }

    /// Assign a value without scalar coercion.
    ///
    /// Complex values are still routed to their sub-attributes.
    pub fn assign_uncoerced(&mut self, value: impl Into<AttributeValue>) {
        self.store(value.into(), false);
    }

    fn store(&mut self, value: AttributeValue, coerce: bool) {
        self.slot = if self.attribute_type.is_complex() {
            complex_slot(&self.attribute_type, value, coerce)
        } else if coerce {
            Slot::Value(coerce_value(&self.attribute_type, value))
        } else {
            Slot::Value(value)
        };
    }

    /// The stored representation.
    ///
    /// Complex values read back as a map of their non-null sub-attributes.
    pub fn value(&self) -> AttributeValue {
        match &self.slot {
            Slot::Value(value) => value.clone(),
            Slot::Complex(sub_attributes) if sub_attributes.is_blank() => AttributeValue::Null,
            Slot::Complex(sub_attributes) => sub_attributes.value(),
            Slot::Items(items) => AttributeValue::List(items.iter().map(Item::value).collect()),
        }
    }

    /// Whether nothing (null or an empty list) is assigned.
    pub fn is_blank(&self) -> bool {
        match &self.slot {
            Slot::Value(value) => value.is_blank(),
            Slot::Complex(sub_attributes) => sub_attributes.is_blank(),
            Slot::Items(items) => items.is_empty(),
        }
    }

    /// Sub-attribute of a single-valued complex attribute.
    pub fn child(&self, name: &str) -> Option<&Attribute> {
        match &self.slot {
            Slot::Complex(sub_attributes) => sub_attributes.find(name),
            _ => None,
        }
    }

    /// Mutable sub-attribute of a single-valued complex attribute.
    ///
    /// A previously assigned value of the wrong shape is discarded.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        if !self.attribute_type.is_complex() || self.attribute_type.multi_valued() {
            return None;
        }
        if !matches!(self.slot, Slot::Complex(_)) {
            self.slot = Slot::Complex(SubAttributes::bind(&self.attribute_type));
        }
        match &mut self.slot {
            Slot::Complex(sub_attributes) => sub_attributes.find_mut(name),
            _ => None,
        }
    }

    /// Recompute errors and report whether there are none.
    pub fn is_valid(&mut self) -> bool {
        self.errors = self.collect_errors();
        self.errors.is_empty()
    }

    /// Recompute errors and return them as a result.
    pub fn validate(&mut self) -> ValidationResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self.errors.clone())
        }
    }

    /// Errors found by the most recent validity check.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Compute the errors for the current value without storing them.
    pub fn collect_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let attribute_type = &self.attribute_type;

        if attribute_type.required() && self.is_blank() {
            errors.add(attribute_type.name(), ValidationError::Required);
        }

        match &self.slot {
            Slot::Value(value) => check_value(attribute_type, value, &mut errors),
            Slot::Complex(sub_attributes) => sub_attributes.collect_errors(&mut errors),
            Slot::Items(items) => {
                for item in items {
                    match item {
                        Item::Object(sub_attributes) => sub_attributes.collect_errors(&mut errors),
                        Item::Other(value) => check_scalar(attribute_type, value, &mut errors),
                    }
                }
            }
        }

        errors
    }

    /// Whether this attribute appears in output rendered for `mode`.
    pub fn is_renderable(&self, mode: Mode) -> bool {
        if self.attribute_type.returned() == Returned::Never {
            return false;
        }
        match (mode, self.attribute_type.mutability()) {
            (Mode::Server, Mutability::WriteOnly) => false,
            (Mode::Client, Mutability::ReadOnly) => false,
            (Mode::Client, Mutability::WriteOnly) => !self.is_blank(),
            _ => true,
        }
    }

    /// The rendered value, or `None` when the attribute is hidden in `mode`.
    pub fn render(&self, mode: Mode) -> Option<Value> {
        self.is_renderable(mode).then(|| self.render_value(mode))
    }

    /// `{name: value}` for this attribute, or an empty object when hidden.
    pub fn as_json(&self, mode: Mode) -> Value {
        let mut object = Map::new();
        if let Some(value) = self.render(mode) {
            object.insert(self.name().to_string(), value);
        }
        Value::Object(object)
    }

    fn render_value(&self, mode: Mode) -> Value {
        let datatype = self.attribute_type.datatype();
        match &self.slot {
            Slot::Value(AttributeValue::Null) if self.attribute_type.multi_valued() => {
                Value::Array(Vec::new())
            }
            Slot::Value(AttributeValue::List(items)) => Value::Array(
                items
                    .iter()
                    .map(|item| render_scalar(datatype, item))
                    .collect(),
            ),
            Slot::Value(value) => render_scalar(datatype, value),
            Slot::Complex(sub_attributes) => sub_attributes.render(mode),
            Slot::Items(items) => Value::Array(
                items
                    .iter()
                    .map(|item| match item {
                        Item::Object(sub_attributes) => sub_attributes.render(mode),
                        Item::Other(value) => value.to_json(),
                    })
                    .collect(),
            ),
        }
    }
}

impl SubAttributes {
    fn bind(attribute_type: &AttributeType) -> Self {
        Self {
            attributes: attribute_type
                .sub_attributes()
                .iter()
                .map(|sub_attribute| Attribute::new(Arc::clone(sub_attribute)))
                .collect(),
            unknown: Vec::new(),
        }
    }

    fn assign(&mut self, parent: &str, values: BTreeMap<String, AttributeValue>, coerce: bool) {
        for (key, value) in values {
            match self.find_mut(&key) {
                Some(attribute) => attribute.store(value, coerce),
                None => {
                    debug!("Unknown sub-attribute '{}' assigned to '{}'", key, parent);
                    self.unknown.push(key);
                }
            }
        }
    }

    fn find(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name() == name)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|attribute| attribute.name().eq_ignore_ascii_case(name))
            })
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        let index = self
            .attributes
            .iter()
            .position(|attribute| attribute.name() == name)
            .or_else(|| {
                self.attributes
                    .iter()
                    .position(|attribute| attribute.name().eq_ignore_ascii_case(name))
            })?;
        self.attributes.get_mut(index)
    }

    fn is_blank(&self) -> bool {
        self.attributes.iter().all(Attribute::is_blank)
    }

    fn value(&self) -> AttributeValue {
        self.attributes
            .iter()
            .map(|attribute| (attribute.name(), attribute.value()))
            .filter(|(_, value)| !value.is_null())
            .collect()
    }

    fn collect_errors(&self, errors: &mut ValidationErrors) {
        for attribute in &self.attributes {
            errors.merge(&attribute.collect_errors());
        }
        for key in &self.unknown {
            errors.add(key.as_str(), ValidationError::UnknownAttribute);
        }
    }

    fn render(&self, mode: Mode) -> Value {
        let object = self
            .attributes
            .iter()
            .filter_map(|attribute| {
                let value = attribute.render(mode)?;
                (!value.is_null()).then(|| (attribute.name().to_string(), value))
            })
            .collect::<Map<String, Value>>();
        Value::Object(object)
    }
}

impl Item {
    fn value(&self) -> AttributeValue {
        match self {
            Self::Object(sub_attributes) => sub_attributes.value(),
            Self::Other(value) => value.clone(),
        }
    }
}

fn empty_slot(attribute_type: &AttributeType) -> Slot {
    match (attribute_type.is_complex(), attribute_type.multi_valued()) {
        (true, true) => Slot::Items(Vec::new()),
        (true, false) => Slot::Complex(SubAttributes::bind(attribute_type)),
        (false, true) => Slot::Value(AttributeValue::List(Vec::new())),
        (false, false) => Slot::Value(AttributeValue::Null),
    }
}

fn complex_slot(attribute_type: &AttributeType, value: AttributeValue, coerce: bool) -> Slot {
    match (attribute_type.multi_valued(), value) {
        (_, AttributeValue::Null) => empty_slot(attribute_type),
        (false, AttributeValue::Map(values)) => {
            let mut sub_attributes = SubAttributes::bind(attribute_type);
            sub_attributes.assign(attribute_type.name(), values, coerce);
            Slot::Complex(sub_attributes)
        }
        (true, AttributeValue::List(items)) => Slot::Items(
            items
                .into_iter()
                .map(|item| match item {
                    AttributeValue::Map(values) => {
                        let mut sub_attributes = SubAttributes::bind(attribute_type);
                        sub_attributes.assign(attribute_type.name(), values, coerce);
                        Item::Object(sub_attributes)
                    }
                    other => Item::Other(other),
                })
                .collect(),
        ),
        (_, other) => {
            trace!(
                "Keeping {} value for complex attribute '{}' as given",
                other.kind(),
                attribute_type.name()
            );
            Slot::Value(other)
        }
    }
}

fn coerce_value(attribute_type: &AttributeType, value: AttributeValue) -> AttributeValue {
    let datatype = attribute_type.datatype();
    match value {
        AttributeValue::Null if attribute_type.multi_valued() => AttributeValue::List(Vec::new()),
        AttributeValue::List(items) if attribute_type.multi_valued() => AttributeValue::List(
            items
                .into_iter()
                .map(|item| coerce_scalar(datatype, item))
                .collect(),
        ),
        other => coerce_scalar(datatype, other),
    }
}

fn coerce_scalar(datatype: DataType, value: AttributeValue) -> AttributeValue {
    use AttributeValue as V;

    match (datatype, value) {
        (DataType::String, V::Integer(i)) => V::String(i.to_string()),
        (DataType::String, V::Decimal(f)) => V::String(decimal_text(f)),
        (DataType::String, V::Boolean(b)) => V::String(b.to_string()),
        (DataType::String, V::DateTime(dt)) => V::String(format_datetime(&dt)),
        (DataType::Decimal, V::Integer(i)) => V::Decimal(i as f64),
        (DataType::Decimal, V::String(s)) => match parse_finite(&s) {
            Some(f) => V::Decimal(f),
            None => keep_text(datatype, s),
        },
        (DataType::Integer, V::Decimal(f)) => match truncate_to_i64(f) {
            Some(i) => V::Integer(i),
            None => {
                trace!("Keeping out of range decimal {} for integer validation", f);
                V::Decimal(f)
            }
        },
        (DataType::Integer, V::String(s)) => match s.trim().parse::<i64>() {
            Ok(i) => V::Integer(i),
            Err(_) => match parse_finite(&s).and_then(truncate_to_i64) {
                Some(i) => V::Integer(i),
                None => keep_text(datatype, s),
            },
        },
        (DataType::DateTime, V::String(s)) => match parse_datetime(&s) {
            Some(dt) => V::DateTime(dt),
            None => keep_text(datatype, s),
        },
        (DataType::Binary, V::Binary(bytes)) => V::String(BASE64.encode(bytes)),
        (_, other) => other,
    }
}

fn keep_text(datatype: DataType, text: String) -> AttributeValue {
    trace!("Storing unparsable {} text '{}' for validation", datatype, text);
    AttributeValue::String(text)
}

fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Truncate toward zero when the result fits in `i64`.
fn truncate_to_i64(f: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    let truncated = f.trunc();
    (truncated.is_finite() && (-LIMIT..LIMIT).contains(&truncated)).then(|| truncated as i64)
}

/// Decimal text that stays distinguishable from an integer: `42.0`, not `42`.
fn decimal_text(f: f64) -> String {
    let mut text = f.to_string();
    if f.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}

fn parse_boolean(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse ISO 8601 text, also accepting a space separator, a missing offset
/// (taken as UTC), or a bare date (midnight UTC).
fn parse_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f %z"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(text, "%Y-%m-%d")
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
                .map(|naive| naive.and_utc().fixed_offset())
        })
}

fn check_value(attribute_type: &AttributeType, value: &AttributeValue, errors: &mut ValidationErrors) {
    match value {
        AttributeValue::Null => {}
        AttributeValue::List(_) if !attribute_type.multi_valued() => {
            errors.add(attribute_type.name(), ValidationError::ExpectedSingleValue);
        }
        AttributeValue::List(items) => {
            for item in items {
                check_scalar(attribute_type, item, errors);
            }
        }
        other => {
            if attribute_type.multi_valued() {
                errors.add(attribute_type.name(), ValidationError::ExpectedMultiValue);
            }
            check_scalar(attribute_type, other, errors);
        }
    }
}

fn check_scalar(attribute_type: &AttributeType, value: &AttributeValue, errors: &mut ValidationErrors) {
    use AttributeValue as V;

    let datatype = attribute_type.datatype();
    let error = match (datatype, value) {
        (_, V::Null) => None,
        (DataType::String | DataType::Reference, V::String(s)) => {
            check_canonical(attribute_type, s)
        }
        (DataType::Boolean, V::Boolean(_))
        | (DataType::Decimal, V::Decimal(_) | V::Integer(_))
        | (DataType::Integer, V::Integer(_))
        | (DataType::DateTime, V::DateTime(_))
        | (DataType::Binary, V::Binary(_))
        | (DataType::Complex, V::Map(_)) => None,
        (DataType::Boolean, V::String(s)) if parse_boolean(s).is_some() => None,
        (DataType::Binary, V::String(s)) if BASE64.decode(s).is_ok() => None,
        (
            DataType::Boolean | DataType::Decimal | DataType::Integer | DataType::DateTime | DataType::Binary,
            V::String(s),
        ) => Some(ValidationError::invalid_format(datatype.as_str(), s.as_str())),
        (_, V::List(_)) if !attribute_type.multi_valued() => Some(ValidationError::ExpectedSingleValue),
        (_, other) => Some(ValidationError::invalid_type(datatype.as_str(), other.kind())),
    };

    if let Some(error) = error {
        errors.add(attribute_type.name(), error);
    }
}

/// Exact membership check against the declared canonical values.
fn check_canonical(attribute_type: &AttributeType, value: &str) -> Option<ValidationError> {
    if !(attribute_type.is_string() || attribute_type.is_reference()) {
        return None;
    }
    let allowed = attribute_type.canonical_values()?;
    (!allowed.iter().any(|candidate| candidate == value)).then(|| ValidationError::NotCanonical {
        value: value.to_string(),
        allowed: allowed.to_vec(),
    })
}

fn render_scalar(datatype: DataType, value: &AttributeValue) -> Value {
    match (datatype, value) {
        (DataType::Boolean, AttributeValue::String(s)) => {
            parse_boolean(s).map_or_else(|| value.to_json(), Value::Bool)
        }
        (DataType::Decimal, AttributeValue::Integer(i)) => decimal_to_json(*i as f64),
        _ => value.to_json(),
    }
}
