//! SCIM resource model: attribute values bound to schema descriptors.
//!
//! # Key Components
//!
//! * [`Attribute`] - Value holder performing coercion, validation and rendering
//! * [`AttributeValue`] - Dynamic input and stored representation
//! * [`Resource`] - Container binding one attribute per schema attribute
//! * [`Mode`] - Client or server side, controlling attribute visibility
//! * [`Meta`] - Common resource metadata

pub mod attribute;
pub mod context;
pub mod meta;
pub mod resource;
pub mod value;
pub mod version;

pub use attribute::Attribute;
pub use context::{Mode, ResourceAdapter};
pub use meta::Meta;
pub use resource::Resource;
pub use value::AttributeValue;
pub use version::version_from_content;
