//! Live value, dirty and error state for one open document.

mod state;
mod value;

pub use state::{FormSnapshot, FormState, SourceCommit};
pub use value::{check_value, is_empty_value};
