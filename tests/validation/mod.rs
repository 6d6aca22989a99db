//! Validation tests module.
//!
//! Coercion and validation behaviour of individual attributes, organized by
//! category.

pub mod characteristics;
