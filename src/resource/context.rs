//! Rendering mode and the contract attributes expect from their owning resource.

use super::attribute::Attribute;
use crate::error::ValidationErrors;
use serde::{Deserialize, Serialize};

/// Which side of the SCIM protocol a resource is being built for.
///
/// The mode changes which attributes are visible when rendering: a server
/// never emits write-only values, a client never sends read-only ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Client,
    #[default]
    Server,
}

/// Minimal interface between attributes and the container that owns them.
pub trait ResourceAdapter {
    /// Protocol side the container renders for.
    fn mode(&self) -> Mode;

    /// Look up an owned attribute by declared or accessor name.
    fn attribute_for(&self, name: &str) -> Option<&Attribute>;

    fn attribute_for_mut(&mut self, name: &str) -> Option<&mut Attribute>;

    /// Errors collected by the most recent validity check.
    fn errors(&self) -> &ValidationErrors;
}
