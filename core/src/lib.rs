//! # glimmer core
//!
//! Driver-independent building blocks shared by the glimmer object wrappers:
//!
//! - [`Version`] - API version numbers and the set of defined versions
//! - [`change`] - push-based change notification between objects
//! - [`source`] - providers of shader source text

pub mod change;
pub mod source;
pub mod version;

pub use change::{ChangeListener, Changeable, ListenerId};
pub use source::{CompositeStringSource, StaticStringSource, StringSource};
pub use version::{VALID_VERSIONS, Version};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
