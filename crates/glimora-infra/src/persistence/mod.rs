//! Session persistence implementations.

mod json;

pub use json::JsonSessionPersistence;
