//! # glimmer objects
//!
//! Owned wrappers around graphics driver objects.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`Context`] - Per-thread driver context with error checking and named strings
//! - [`Driver`] - Trait for driver implementations, with [`DummyDriver`] for testing
//! - [`Texture`], [`Shader`], [`Program`], [`Buffer`] - Object wrappers
//! - [`include`] - `#include` resolution against named strings
//!
//! Every wrapper call is followed by an error check on the driver. Failures
//! are logged and kept as [`Diagnostic`]s on the context.
//!
//! ## Example
//!
//! ```
//! use glimmer_objects::{Context, DummyDriver, Program, Shader, ShaderType};
//!
//! let context = Context::new(DummyDriver::new());
//! let vertex = Shader::from_string(
//!     &context,
//!     ShaderType::Vertex,
//!     "#version 450\nvoid main() { gl_Position = vec4(0.0); }\n",
//! );
//! let program = Program::with_shaders(&context, &[vertex]);
//! assert!(program.use_program());
//! ```

pub mod buffer;
pub mod context;
pub mod driver;
pub mod error;
pub mod gl;
pub mod include;
pub mod object;
pub mod program;
pub mod shader;
pub mod texture;
pub mod types;

// Re-export main types for convenience
pub use buffer::Buffer;
pub use context::{Context, ContextConfig};
pub use driver::{Driver, DriverCall, DummyDriver, Handle, ResidentHandle};
pub use error::{Diagnostic, GlError, IncludeError};
pub use object::{Object, ObjectBase, ObjectKind, ObjectVisitor, Ownership};
pub use program::Program;
pub use shader::{CompileState, Shader};
pub use texture::{Texture, TextureBinding, TextureParameter};
pub use types::{
    BufferStorageFlags, BufferTarget, BufferUsage, ImageAccess, ShaderType, TextureTarget,
};

pub use glimmer_core::{
    ChangeListener, Changeable, CompositeStringSource, ListenerId, StaticStringSource,
    StringSource, Version,
};

/// Objects library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the objects library.
///
/// Only logs the library version.
pub fn init() {
    log::info!("glimmer objects v{} initialized", VERSION);
}
