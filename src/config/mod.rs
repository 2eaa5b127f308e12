//! Editor configuration
//!
//! Provides types and parsing for `pxsprite.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
