// src/dictionary/mod.rs
//
// JSON schema dictionary of named views and their fields.

pub mod render;
pub mod store;
pub mod types;

pub use render::{write_all, write_view, write_view_field};
pub use types::{DatabaseSchema, Field, View};
