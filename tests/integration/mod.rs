//! Integration tests over whole resources.

pub mod schema_loading;
