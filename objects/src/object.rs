//! Base object model shared by every wrapper.
//!
//! An object owns a driver [`Handle`] and knows whether it is responsible for
//! releasing it. Releasing happens in exactly one place, the `Drop` of
//! [`ObjectBase`], and only for [`Ownership::Owned`] handles.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::buffer::Buffer;
use crate::context::Context;
use crate::driver::Handle;
use crate::program::Program;
use crate::shader::Shader;
use crate::texture::Texture;

/// Whether a wrapper releases its handle when dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// The wrapper deletes the handle on drop.
    Owned,
    /// The handle's lifetime is managed elsewhere.
    Borrowed,
}

/// Concrete wrapper kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// [`Texture`]
    Texture,
    /// [`Shader`]
    Shader,
    /// [`Program`]
    Program,
    /// [`Buffer`]
    Buffer,
}

impl ObjectKind {
    /// Driver entry point that releases handles of this kind.
    pub fn delete_call(self) -> &'static str {
        match self {
            Self::Texture => "glDeleteTextures",
            Self::Shader => "glDeleteShader",
            Self::Program => "glDeleteProgram",
            Self::Buffer => "glDeleteBuffers",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Texture => "texture",
            Self::Shader => "shader",
            Self::Program => "program",
            Self::Buffer => "buffer",
        };
        f.write_str(name)
    }
}

/// State common to every wrapper: context, handle, ownership and debug name.
pub struct ObjectBase {
    context: Rc<Context>,
    kind: ObjectKind,
    id: Handle,
    ownership: Cell<Ownership>,
    name: RefCell<Option<String>>,
}

impl ObjectBase {
    pub(crate) fn new(
        context: &Rc<Context>,
        kind: ObjectKind,
        id: Handle,
        ownership: Ownership,
    ) -> Self {
        context.object_created(kind);
        log::trace!("Wrapped {} {} ({:?})", kind, id, ownership);
        Self {
            context: Rc::clone(context),
            kind,
            id,
            ownership: Cell::new(ownership),
            name: RefCell::new(None),
        }
    }

    /// The owning context.
    pub fn context(&self) -> &Rc<Context> {
        &self.context
    }

    /// The wrapper kind.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// The driver handle.
    pub fn id(&self) -> Handle {
        self.id
    }

    /// Current ownership.
    pub fn ownership(&self) -> Ownership {
        self.ownership.get()
    }

    /// Change ownership.
    pub fn set_ownership(&self, ownership: Ownership) {
        self.ownership.set(ownership);
    }

    /// The debug name.
    pub fn name(&self) -> Option<String> {
        self.name.borrow().clone()
    }

    /// Set the debug name.
    pub fn set_name(&self, name: &str) {
        *self.name.borrow_mut() = Some(name.to_string());
    }

    /// Returns true if a debug name is set.
    pub fn has_name(&self) -> bool {
        self.name.borrow().is_some()
    }
}

impl Drop for ObjectBase {
    fn drop(&mut self) {
        self.context.object_destroyed(self.kind);
        if self.ownership.get() != Ownership::Owned || self.id == 0 {
            return;
        }
        log::trace!("Releasing {} {}", self.kind, self.id);
        let id = self.id;
        match self.kind {
            ObjectKind::Texture => self
                .context
                .call(self.kind.delete_call(), |d| d.delete_texture(id)),
            ObjectKind::Shader => self
                .context
                .call(self.kind.delete_call(), |d| d.delete_shader(id)),
            ObjectKind::Program => self
                .context
                .call(self.kind.delete_call(), |d| d.delete_program(id)),
            ObjectKind::Buffer => self
                .context
                .call(self.kind.delete_call(), |d| d.delete_buffer(id)),
        }
    }
}

impl fmt::Debug for ObjectBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBase")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("ownership", &self.ownership.get())
            .field("name", &self.name.borrow())
            .finish()
    }
}

/// Type dispatch over concrete wrappers.
///
/// Every method defaults to doing nothing, so a visitor only implements the
/// kinds it cares about.
pub trait ObjectVisitor {
    /// Called for textures.
    fn visit_texture(&mut self, _texture: &Texture) {}
    /// Called for shaders.
    fn visit_shader(&mut self, _shader: &Shader) {}
    /// Called for programs.
    fn visit_program(&mut self, _program: &Program) {}
    /// Called for buffers.
    fn visit_buffer(&mut self, _buffer: &Buffer) {}
}

/// Common interface of every wrapper.
pub trait Object {
    /// Shared object state.
    fn base(&self) -> &ObjectBase;

    /// Invoke the visitor method matching this wrapper's kind.
    fn accept(&self, visitor: &mut dyn ObjectVisitor);

    /// The driver handle.
    fn id(&self) -> Handle {
        self.base().id()
    }

    /// The wrapper kind.
    fn kind(&self) -> ObjectKind {
        self.base().kind()
    }

    /// The owning context.
    fn context(&self) -> &Rc<Context> {
        self.base().context()
    }

    /// Current ownership.
    fn ownership(&self) -> Ownership {
        self.base().ownership()
    }

    /// Returns true if dropping this wrapper releases the handle.
    fn owns_handle(&self) -> bool {
        self.ownership() == Ownership::Owned
    }

    /// Make this wrapper responsible for releasing the handle.
    fn take_ownership(&self) {
        self.base().set_ownership(Ownership::Owned);
    }

    /// Stop this wrapper from releasing the handle. Returns the handle, which
    /// now has to be released by someone else.
    fn release_ownership(&self) -> Handle {
        self.base().set_ownership(Ownership::Borrowed);
        self.id()
    }

    /// The debug name.
    fn name(&self) -> Option<String> {
        self.base().name()
    }

    /// Set the debug name.
    fn set_name(&self, name: &str) {
        self.base().set_name(name);
    }

    /// Returns true if a debug name is set.
    fn has_name(&self) -> bool {
        self.base().has_name()
    }
}
