//! Schema-driven form engine core.
//!
//! Provides the field schema model, column layout, editor dispatch,
//! per-document form state, fetch-binding index, and the schema builder.

pub mod builder;
pub mod config;
pub mod editor;
pub mod error;
pub mod form;
pub mod layout;
pub mod schema;

pub use error::{ErrorKind, FormError, Result};
