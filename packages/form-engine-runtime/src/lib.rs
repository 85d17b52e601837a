//! Async side of the form engine: dependency resolution against a document
//! store, editing sessions, and builder lookups that need the schema source.

use form_engine_core::error::FormError;

mod candidates;
pub mod collaborator;
pub mod resolver;
pub mod session;

pub use candidates::binding_candidates;
pub use collaborator::{DocumentFetch, FetchError, InMemoryDocuments, InMemorySchemas, SchemaSource};
pub use resolver::{DependencyResolver, FetchOutcome, FetchPlan, Resolution};
pub use session::FormSession;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, FormError>;
