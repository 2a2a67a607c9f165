//! Driver abstraction layer.
//!
//! Every wrapper in this crate talks to the native graphics subsystem through
//! the [`Driver`] trait. A driver exposes the GL-shaped entry points the
//! wrappers need and nothing more: it does not check errors itself, it only
//! records them in its error register for [`Driver::get_error`] to report.
//!
//! # Available drivers
//!
//! - [`DummyDriver`]: in-memory simulation used for testing and development
//!
//! Bindings to a real driver implement the same trait; the wrappers never
//! depend on a concrete implementation.
//!
//! # Conventions
//!
//! Enum arguments are raw `u32` values (see [`crate::gl`]). Sizes and offsets
//! are `isize` to match the driver's pointer-sized integer types. Calls that
//! fail leave their error code in the error register and return a zero value.

pub mod dummy;

pub use dummy::{DriverCall, DummyDriver};

/// Driver-side name of a resource. Zero means "no resource".
pub type Handle = u32;

/// 64-bit handle of a resident texture.
pub type ResidentHandle = u64;

/// GL-shaped driver entry points.
///
/// All methods take `&self`; drivers are bound to the thread that owns the
/// native context and keep their mutable state behind interior mutability.
pub trait Driver {
    /// Human readable driver name.
    fn name(&self) -> &'static str;

    // ---- General state -------------------------------------------------

    /// Return and clear the error register.
    fn get_error(&self) -> u32;

    /// Query an integer state value.
    fn get_integer(&self, pname: u32) -> i32;

    // ---- Textures ------------------------------------------------------

    /// Allocate a texture name.
    fn gen_texture(&self) -> Handle;

    /// Release a texture name. Unknown names and zero are ignored.
    fn delete_texture(&self, texture: Handle);

    /// Select the active texture unit (`TEXTURE0 + n`).
    fn active_texture(&self, unit: u32);

    /// Bind `texture` to `target` on the active unit. Zero unbinds.
    fn bind_texture(&self, target: u32, texture: Handle);

    /// Set an integer parameter of the texture bound to `target`.
    fn tex_parameter_i(&self, target: u32, pname: u32, value: i32);

    /// Set a float parameter of the texture bound to `target`.
    fn tex_parameter_f(&self, target: u32, pname: u32, value: f32);

    /// Read an integer parameter of the texture bound to `target`.
    fn get_tex_parameter_i(&self, target: u32, pname: u32) -> i32;

    /// Read an integer parameter of one mip level.
    fn get_tex_level_parameter_i(&self, target: u32, level: i32, pname: u32) -> i32;

    /// Specify a two-dimensional image for one level.
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        border: i32,
        format: u32,
        ty: u32,
        data: Option<&[u8]>,
    );

    /// Specify a three-dimensional image for one level.
    #[allow(clippy::too_many_arguments)]
    fn tex_image_3d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        depth: i32,
        border: i32,
        format: u32,
        ty: u32,
        data: Option<&[u8]>,
    );

    /// Allocate immutable two-dimensional storage.
    fn tex_storage_2d(
        &self,
        target: u32,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    );

    /// Allocate immutable three-dimensional storage.
    fn tex_storage_3d(
        &self,
        target: u32,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        depth: i32,
    );

    /// Generate the mip chain from level zero.
    fn generate_mipmap(&self, target: u32);

    /// Bind one level of a texture to an image unit.
    #[allow(clippy::too_many_arguments)]
    fn bind_image_texture(
        &self,
        unit: u32,
        texture: Handle,
        level: i32,
        layered: bool,
        layer: i32,
        access: u32,
        format: u32,
    );

    // ---- Texture residency ---------------------------------------------

    /// Return the residency handle of a texture.
    fn get_texture_handle(&self, texture: Handle) -> ResidentHandle;

    /// Returns true if the handle is resident.
    fn is_texture_handle_resident(&self, handle: ResidentHandle) -> bool;

    /// Make a handle resident.
    fn make_texture_handle_resident(&self, handle: ResidentHandle);

    /// Make a handle non-resident.
    fn make_texture_handle_non_resident(&self, handle: ResidentHandle);

    // ---- Shaders -------------------------------------------------------

    /// Create a shader of the given type.
    fn create_shader(&self, ty: u32) -> Handle;

    /// Delete a shader. Zero is ignored.
    fn delete_shader(&self, shader: Handle);

    /// Replace the source text of a shader.
    fn shader_source(&self, shader: Handle, source: &str);

    /// Compile the current source text.
    fn compile_shader(&self, shader: Handle);

    /// Query a shader parameter.
    fn get_shader_i(&self, shader: Handle, pname: u32) -> i32;

    /// Info log of the last compile.
    fn get_shader_info_log(&self, shader: Handle) -> String;

    /// Source text as stored by the driver.
    fn get_shader_source(&self, shader: Handle) -> String;

    // ---- Programs ------------------------------------------------------

    /// Create an empty program.
    fn create_program(&self) -> Handle;

    /// Delete a program. Zero is ignored.
    fn delete_program(&self, program: Handle);

    /// Attach a shader to a program.
    fn attach_shader(&self, program: Handle, shader: Handle);

    /// Detach a shader from a program.
    fn detach_shader(&self, program: Handle, shader: Handle);

    /// Link the attached shaders.
    fn link_program(&self, program: Handle);

    /// Make a program current. Zero makes no program current.
    fn use_program(&self, program: Handle);

    /// Query a program parameter.
    fn get_program_i(&self, program: Handle, pname: u32) -> i32;

    /// Info log of the last link.
    fn get_program_info_log(&self, program: Handle) -> String;

    // ---- Buffers -------------------------------------------------------

    /// Allocate a buffer name.
    fn gen_buffer(&self) -> Handle;

    /// Release a buffer name. Unknown names and zero are ignored.
    fn delete_buffer(&self, buffer: Handle);

    /// Bind a buffer to a target. Zero unbinds.
    fn bind_buffer(&self, target: u32, buffer: Handle);

    /// Bind a buffer to an indexed binding point.
    fn bind_buffer_base(&self, target: u32, index: u32, buffer: Handle);

    /// Bind a range of a buffer to an indexed binding point.
    fn bind_buffer_range(&self, target: u32, index: u32, buffer: Handle, offset: isize, size: isize);

    /// (Re)allocate mutable storage for the bound buffer.
    fn buffer_data(&self, target: u32, size: isize, data: Option<&[u8]>, usage: u32);

    /// Overwrite part of the bound buffer.
    fn buffer_sub_data(&self, target: u32, offset: isize, data: &[u8]);

    /// Allocate immutable storage for the bound buffer.
    fn buffer_storage(&self, target: u32, size: isize, data: Option<&[u8]>, flags: u32);

    /// Copy between the buffers bound to two targets.
    fn copy_buffer_sub_data(
        &self,
        read_target: u32,
        write_target: u32,
        read_offset: isize,
        write_offset: isize,
        size: isize,
    );

    /// Fill the bound buffer with a repeated value. `None` fills with zeros.
    fn clear_buffer_data(
        &self,
        target: u32,
        internal_format: u32,
        format: u32,
        ty: u32,
        data: Option<&[u8]>,
    );

    /// Query a parameter of the bound buffer.
    fn get_buffer_parameter_i(&self, target: u32, pname: u32) -> i32;

    /// Read back part of the bound buffer.
    fn get_buffer_sub_data(&self, target: u32, offset: isize, size: isize) -> Vec<u8>;
}
