//! Common SCIM resource metadata.
//!
//! Meta attributes contain the metadata shared by all SCIM resources:
//! resource type, location, timestamps, and version.

use super::value::format_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// The `meta` attribute of a SCIM resource as defined in RFC 7643 §3.1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub resource_type: String,
    pub location: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_timestamp"
    )]
    pub created: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_timestamp"
    )]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Meta {
    pub fn new(resource_type: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            location: location.into(),
            created: None,
            last_modified: None,
            version: None,
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Set both timestamps to now, for a newly created resource.
    pub fn mark_created(&mut self) {
        let now = Utc::now();
        self.created = Some(now);
        self.last_modified = Some(now);
    }

    /// Update the last modified timestamp to now.
    pub fn touch(&mut self) {
        self.last_modified = Some(Utc::now());
    }

    /// Render as the JSON `meta` object.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("resourceType".to_string(), Value::String(self.resource_type.clone()));
        object.insert("location".to_string(), Value::String(self.location.clone()));
        for (key, timestamp) in [("created", self.created), ("lastModified", self.last_modified)] {
            if let Some(timestamp) = timestamp {
                object.insert(
                    key.to_string(),
                    Value::String(format_datetime(&timestamp.fixed_offset())),
                );
            }
        }
        if let Some(version) = &self.version {
            object.insert("version".to_string(), Value::String(version.clone()));
        }
        Value::Object(object)
    }
}

fn serialize_timestamp<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(timestamp) => serializer.serialize_str(&format_datetime(&timestamp.fixed_offset())),
        None => serializer.serialize_none(),
    }
}
