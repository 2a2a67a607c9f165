//! Driver error codes and diagnostics.
//!
//! Nothing in this crate unwinds on a driver failure. Failures become a
//! [`Diagnostic`] that is logged and retained by the
//! [`Context`](crate::Context), and the failing call returns a sentinel value.

use thiserror::Error;

use crate::driver::Handle;
use crate::gl;

/// An error code reported by the driver's error register.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlError {
    /// An enum argument is out of range.
    #[error("GL_INVALID_ENUM")]
    InvalidEnum,
    /// A numeric argument is out of range.
    #[error("GL_INVALID_VALUE")]
    InvalidValue,
    /// The operation is not allowed in the current state.
    #[error("GL_INVALID_OPERATION")]
    InvalidOperation,
    /// A stack push would overflow.
    #[error("GL_STACK_OVERFLOW")]
    StackOverflow,
    /// A stack pop would underflow.
    #[error("GL_STACK_UNDERFLOW")]
    StackUnderflow,
    /// Not enough memory left to execute the command.
    #[error("GL_OUT_OF_MEMORY")]
    OutOfMemory,
    /// The framebuffer object is not complete.
    #[error("GL_INVALID_FRAMEBUFFER_OPERATION")]
    InvalidFramebufferOperation,
    /// The context has been lost.
    #[error("GL_CONTEXT_LOST")]
    ContextLost,
    /// A code this crate does not know.
    #[error("unknown error 0x{0:04X}")]
    Unknown(u32),
}

impl GlError {
    /// Translate a raw error register value. `NO_ERROR` yields `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            gl::NO_ERROR => None,
            gl::INVALID_ENUM => Some(Self::InvalidEnum),
            gl::INVALID_VALUE => Some(Self::InvalidValue),
            gl::INVALID_OPERATION => Some(Self::InvalidOperation),
            gl::STACK_OVERFLOW => Some(Self::StackOverflow),
            gl::STACK_UNDERFLOW => Some(Self::StackUnderflow),
            gl::OUT_OF_MEMORY => Some(Self::OutOfMemory),
            gl::INVALID_FRAMEBUFFER_OPERATION => Some(Self::InvalidFramebufferOperation),
            gl::CONTEXT_LOST => Some(Self::ContextLost),
            other => Some(Self::Unknown(other)),
        }
    }

    /// The raw error register value.
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidEnum => gl::INVALID_ENUM,
            Self::InvalidValue => gl::INVALID_VALUE,
            Self::InvalidOperation => gl::INVALID_OPERATION,
            Self::StackOverflow => gl::STACK_OVERFLOW,
            Self::StackUnderflow => gl::STACK_UNDERFLOW,
            Self::OutOfMemory => gl::OUT_OF_MEMORY,
            Self::InvalidFramebufferOperation => gl::INVALID_FRAMEBUFFER_OPERATION,
            Self::ContextLost => gl::CONTEXT_LOST,
            Self::Unknown(code) => *code,
        }
    }
}

/// A reported problem.
///
/// Driver call failures are API misuse; compilation and link failures are
/// problems with the shader content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A driver call set the error register.
    #[error("{call} failed: {error}")]
    DriverCall {
        /// Name of the failing driver entry point.
        call: &'static str,
        /// The reported error.
        error: GlError,
    },
    /// A shader failed to compile.
    #[error("compiling {shader} failed:\n{info_log}")]
    Compilation {
        /// Description of the shader (type and source).
        shader: String,
        /// Info log produced by the driver or include processor.
        info_log: String,
    },
    /// A program failed to link.
    #[error("linking program {program} failed:\n{info_log}")]
    Link {
        /// Program handle.
        program: Handle,
        /// Info log produced by the driver.
        info_log: String,
    },
}

impl Diagnostic {
    /// Returns the driver error for [`Diagnostic::DriverCall`].
    pub fn driver_error(&self) -> Option<GlError> {
        match self {
            Self::DriverCall { error, .. } => Some(*error),
            _ => None,
        }
    }
}

/// Errors from resolving `#include` directives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IncludeError {
    /// Named string names must start with `/`.
    #[error("invalid named string name \"{0}\": names must start with '/'")]
    InvalidName(String),
    /// No named string matches the include.
    #[error("include not found: \"{0}\"")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(GlError::from_code(gl::NO_ERROR), None);
        assert_eq!(
            GlError::from_code(gl::INVALID_OPERATION),
            Some(GlError::InvalidOperation)
        );
        assert_eq!(GlError::from_code(0x1234), Some(GlError::Unknown(0x1234)));
        assert_eq!(GlError::OutOfMemory.code(), gl::OUT_OF_MEMORY);
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::DriverCall {
            call: "glBindTexture",
            error: GlError::InvalidOperation,
        };
        assert_eq!(
            diagnostic.to_string(),
            "glBindTexture failed: GL_INVALID_OPERATION"
        );
        assert_eq!(diagnostic.driver_error(), Some(GlError::InvalidOperation));

        let err = GlError::Unknown(0xBEEF);
        assert_eq!(err.to_string(), "unknown error 0xBEEF");
    }

    #[test]
    fn test_include_error_display() {
        let err = IncludeError::NotFound("/lib/common.glsl".into());
        assert_eq!(err.to_string(), "include not found: \"/lib/common.glsl\"");
    }
}
