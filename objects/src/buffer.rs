//! Buffer wrapper.
//!
//! Data calls bind the buffer to the context's working target (see
//! [`ContextConfig::buffer_working_target`](crate::ContextConfig)) and then
//! issue the substantive call. Copies use the dedicated copy targets.

use std::fmt;
use std::rc::Rc;

use bytemuck::Pod;

use crate::context::Context;
use crate::driver::Handle;
use crate::gl;
use crate::object::{Object, ObjectBase, ObjectKind, ObjectVisitor, Ownership};
use crate::types::{BufferStorageFlags, BufferTarget, BufferUsage};

/// A buffer object.
///
/// # Example
///
/// ```
/// use glimmer_objects::{BufferUsage, Buffer, Context, DummyDriver};
///
/// let context = Context::new(DummyDriver::new());
/// let buffer = Buffer::new(&context);
/// buffer.set_data_from(&[1.0f32, 2.0, 3.0], BufferUsage::StaticDraw);
/// assert_eq!(buffer.size(), 12);
/// ```
pub struct Buffer {
    base: ObjectBase,
}

impl Buffer {
    /// Create a buffer.
    pub fn new(context: &Rc<Context>) -> Self {
        let id = context.call("glGenBuffers", |d| d.gen_buffer());
        Self::with_ownership(context, id, Ownership::Owned)
    }

    /// Wrap an existing buffer without taking ownership.
    pub fn from_id(context: &Rc<Context>, id: Handle) -> Self {
        Self::with_ownership(context, id, Ownership::Borrowed)
    }

    /// Wrap an existing buffer.
    pub fn with_ownership(context: &Rc<Context>, id: Handle, ownership: Ownership) -> Self {
        Self {
            base: ObjectBase::new(context, ObjectKind::Buffer, id, ownership),
        }
    }

    fn ctx(&self) -> &Context {
        self.base.context()
    }

    /// Bind to the working target and return its raw value.
    fn bind_working(&self) -> u32 {
        let target = self.ctx().config().buffer_working_target;
        self.bind(target);
        target.to_raw()
    }

    // ---- Binding -------------------------------------------------------

    /// Bind to `target`.
    pub fn bind(&self, target: BufferTarget) {
        let (target, id) = (target.to_raw(), self.id());
        self.ctx().call("glBindBuffer", |d| d.bind_buffer(target, id));
    }

    /// Unbind whatever buffer is bound to `target`.
    pub fn unbind(context: &Context, target: BufferTarget) {
        let target = target.to_raw();
        context.call("glBindBuffer", |d| d.bind_buffer(target, 0));
    }

    /// Unbind an indexed binding point.
    pub fn unbind_index(context: &Context, target: BufferTarget, index: u32) {
        let target = target.to_raw();
        context.call("glBindBufferBase", |d| d.bind_buffer_base(target, index, 0));
    }

    /// Bind the whole buffer to an indexed binding point.
    pub fn bind_base(&self, target: BufferTarget, index: u32) {
        let (target, id) = (target.to_raw(), self.id());
        self.ctx()
            .call("glBindBufferBase", |d| d.bind_buffer_base(target, index, id));
    }

    /// Bind a range of the buffer to an indexed binding point.
    pub fn bind_range(&self, target: BufferTarget, index: u32, offset: isize, size: isize) {
        let (target, id) = (target.to_raw(), self.id());
        self.ctx().call("glBindBufferRange", |d| {
            d.bind_buffer_range(target, index, id, offset, size)
        });
    }

    // ---- Data ----------------------------------------------------------

    /// Replace the contents, reallocating to `data.len()` bytes.
    pub fn set_data(&self, data: &[u8], usage: BufferUsage) {
        let target = self.bind_working();
        self.ctx().call("glBufferData", |d| {
            d.buffer_data(target, data.len() as isize, Some(data), usage.to_raw())
        });
    }

    /// Replace the contents with typed elements.
    pub fn set_data_from<T: Pod>(&self, data: &[T], usage: BufferUsage) {
        self.set_data(bytemuck::cast_slice(data), usage);
    }

    /// Reallocate to `size` zeroed bytes.
    pub fn allocate(&self, size: isize, usage: BufferUsage) {
        let target = self.bind_working();
        self.ctx().call("glBufferData", |d| {
            d.buffer_data(target, size, None, usage.to_raw())
        });
    }

    /// Overwrite part of the contents.
    pub fn set_sub_data(&self, offset: isize, data: &[u8]) {
        let target = self.bind_working();
        self.ctx()
            .call("glBufferSubData", |d| d.buffer_sub_data(target, offset, data));
    }

    /// Allocate immutable storage initialized from `data`.
    pub fn set_storage(&self, data: &[u8], flags: BufferStorageFlags) {
        let target = self.bind_working();
        self.ctx().call("glBufferStorage", |d| {
            d.buffer_storage(target, data.len() as isize, Some(data), flags.bits())
        });
    }

    /// Allocate `size` bytes of zeroed immutable storage.
    pub fn allocate_storage(&self, size: isize, flags: BufferStorageFlags) {
        let target = self.bind_working();
        self.ctx().call("glBufferStorage", |d| {
            d.buffer_storage(target, size, None, flags.bits())
        });
    }

    /// Fill the contents with a repeated value. `None` fills with zeros.
    pub fn clear_data(&self, internal_format: u32, format: u32, ty: u32, data: Option<&[u8]>) {
        let target = self.bind_working();
        self.ctx().call("glClearBufferData", |d| {
            d.clear_buffer_data(target, internal_format, format, ty, data)
        });
    }

    // ---- Queries -------------------------------------------------------

    /// Query a buffer parameter.
    pub fn get_parameter(&self, pname: u32) -> i32 {
        let target = self.bind_working();
        self.ctx()
            .call("glGetBufferParameteriv", |d| d.get_buffer_parameter_i(target, pname))
    }

    /// Size in bytes.
    pub fn size(&self) -> i32 {
        self.get_parameter(gl::BUFFER_SIZE)
    }

    /// Read back `size` bytes starting at `offset`.
    pub fn read_sub_data(&self, offset: isize, size: isize) -> Vec<u8> {
        let target = self.bind_working();
        self.ctx().call("glGetBufferSubData", |d| {
            d.get_buffer_sub_data(target, offset, size)
        })
    }

    // ---- Copies --------------------------------------------------------

    /// Copy `size` bytes into `dest`.
    pub fn copy_sub_data(
        &self,
        dest: &Buffer,
        read_offset: isize,
        write_offset: isize,
        size: isize,
    ) {
        self.bind(BufferTarget::CopyRead);
        dest.bind(BufferTarget::CopyWrite);
        let (read, write) = (gl::COPY_READ_BUFFER, gl::COPY_WRITE_BUFFER);
        self.ctx().call("glCopyBufferSubData", |d| {
            d.copy_buffer_sub_data(read, write, read_offset, write_offset, size)
        });
    }

    /// Reallocate `dest` to `size` bytes and copy the first `size` bytes into it.
    pub fn copy_data(&self, dest: &Buffer, size: isize, usage: BufferUsage) {
        dest.allocate(size, usage);
        self.copy_sub_data(dest, 0, 0, size);
    }
}

impl Object for Buffer {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn accept(&self, visitor: &mut dyn ObjectVisitor) {
        visitor.visit_buffer(self);
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("id", &self.id())
            .field("ownership", &self.ownership())
            .field("name", &self.name())
            .finish()
    }
}

// Buffers are bound to the thread of their context
static_assertions::assert_not_impl_any!(Buffer: Send, Sync);
