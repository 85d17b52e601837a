//! Interactive schema builder: add, remove, reorder and reconfigure fields.

#[allow(clippy::module_inception)]
mod builder;

pub use builder::{derive_field_name, Builder, BuilderState, DropTarget};

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
