//! Field schema model, fetch bindings and integrity checks.

mod binding;
mod field;
#[allow(clippy::module_inception)]
mod schema;
pub(crate) mod validation;

pub use binding::{DependencyIndex, FetchBinding};
pub use field::{FieldDescriptor, FieldType, PHONE_OPTION};
pub use schema::Schema;
