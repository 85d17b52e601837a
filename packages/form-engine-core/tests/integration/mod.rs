//! Integration test suite.
//!
//! 1. Builder sessions end to end (layout, reorder, settings)
//! 2. Schema wire format as produced by external schema tooling
//! 3. Form state over a loaded schema

pub mod builder_session_tests;
pub mod form_state_tests;
pub mod schema_wire_tests;
