//! Texture wrapper.
//!
//! Configuration calls bind the texture to its target on the active unit and
//! then issue the substantive call. Binding silently replaces whatever was
//! bound to the same target before.

use std::fmt;
use std::rc::Rc;

use bytemuck::Pod;

use crate::context::Context;
use crate::driver::{Handle, ResidentHandle};
use crate::gl;
use crate::object::{Object, ObjectBase, ObjectKind, ObjectVisitor, Ownership};
use crate::types::{ImageAccess, TextureTarget};

/// Value of a texture parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextureParameter {
    /// Set with `glTexParameteri`.
    Int(i32),
    /// Set with `glTexParameterf`.
    Float(f32),
}

impl From<i32> for TextureParameter {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for TextureParameter {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

/// A texture object.
///
/// # Example
///
/// ```
/// use glimmer_objects::{gl, Context, DummyDriver, Texture};
///
/// let context = Context::new(DummyDriver::new());
/// let texture = Texture::new(&context);
/// texture.storage_2d(1, gl::RGBA8, 256, 256);
/// texture.set_parameter(gl::TEXTURE_MIN_FILTER, gl::LINEAR);
/// assert_eq!(texture.get_level_parameter(0, gl::TEXTURE_WIDTH), 256);
/// ```
pub struct Texture {
    base: ObjectBase,
    target: TextureTarget,
}

impl Texture {
    /// Create a 2D texture.
    pub fn new(context: &Rc<Context>) -> Self {
        Self::with_target(context, TextureTarget::Texture2d)
    }

    /// Create a texture for the given target.
    pub fn with_target(context: &Rc<Context>, target: TextureTarget) -> Self {
        let id = context.call("glGenTextures", |d| d.gen_texture());
        Self::with_ownership(context, id, target, Ownership::Owned)
    }

    /// Wrap an existing texture without taking ownership.
    pub fn from_id(context: &Rc<Context>, id: Handle, target: TextureTarget) -> Self {
        Self::with_ownership(context, id, target, Ownership::Borrowed)
    }

    /// Wrap an existing texture.
    pub fn with_ownership(
        context: &Rc<Context>,
        id: Handle,
        target: TextureTarget,
        ownership: Ownership,
    ) -> Self {
        Self {
            base: ObjectBase::new(context, ObjectKind::Texture, id, ownership),
            target,
        }
    }

    /// The binding target.
    pub fn target(&self) -> TextureTarget {
        self.target
    }

    fn ctx(&self) -> &Context {
        self.base.context()
    }

    // ---- Binding -------------------------------------------------------

    /// Bind to the target on the active unit.
    pub fn bind(&self) {
        let (target, id) = (self.target.to_raw(), self.id());
        self.ctx().call("glBindTexture", |d| d.bind_texture(target, id));
    }

    /// Unbind this texture's target on the active unit.
    pub fn unbind(&self) {
        Self::unbind_target(self.ctx(), self.target);
    }

    /// Unbind whatever texture is bound to `target` on the active unit.
    pub fn unbind_target(context: &Context, target: TextureTarget) {
        let target = target.to_raw();
        context.call("glBindTexture", |d| d.bind_texture(target, 0));
    }

    /// Make `unit` active and bind to it.
    pub fn bind_active(&self, unit: u32) {
        self.ctx()
            .call("glActiveTexture", |d| d.active_texture(texture_unit(unit)));
        self.bind();
    }

    /// Make `unit` active and unbind this texture's target on it.
    pub fn unbind_active(&self, unit: u32) {
        self.ctx()
            .call("glActiveTexture", |d| d.active_texture(texture_unit(unit)));
        self.unbind();
    }

    /// Bind until the returned guard is dropped.
    pub fn bound(&self) -> TextureBinding<'_> {
        self.bind();
        TextureBinding { texture: self }
    }

    // ---- Parameters ----------------------------------------------------

    /// Set an integer or float parameter.
    pub fn set_parameter(&self, name: u32, value: impl Into<TextureParameter>) {
        let target = self.target.to_raw();
        self.bind();
        match value.into() {
            TextureParameter::Int(value) => self.ctx().call("glTexParameteri", |d| {
                d.tex_parameter_i(target, name, value)
            }),
            TextureParameter::Float(value) => self.ctx().call("glTexParameterf", |d| {
                d.tex_parameter_f(target, name, value)
            }),
        }
    }

    /// Read an integer parameter.
    pub fn get_parameter(&self, name: u32) -> i32 {
        let target = self.target.to_raw();
        self.bind();
        self.ctx()
            .call("glGetTexParameteriv", |d| d.get_tex_parameter_i(target, name))
    }

    /// Read an integer parameter of one mip level.
    pub fn get_level_parameter(&self, level: i32, name: u32) -> i32 {
        let target = self.target.to_raw();
        self.bind();
        self.ctx().call("glGetTexLevelParameteriv", |d| {
            d.get_tex_level_parameter_i(target, level, name)
        })
    }

    // ---- Images and storage --------------------------------------------

    /// Specify a 2D image for one level.
    #[allow(clippy::too_many_arguments)]
    pub fn image_2d(
        &self,
        level: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        border: i32,
        format: u32,
        ty: u32,
        data: Option<&[u8]>,
    ) {
        let target = self.target.to_raw();
        self.bind();
        self.ctx().call("glTexImage2D", |d| {
            d.tex_image_2d(
                target,
                level,
                internal_format as i32,
                width,
                height,
                border,
                format,
                ty,
                data,
            )
        });
    }

    /// Specify a 2D image from typed pixels.
    #[allow(clippy::too_many_arguments)]
    pub fn image_2d_from<T: Pod>(
        &self,
        level: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: &[T],
    ) {
        let bytes: &[u8] = bytemuck::cast_slice(pixels);
        self.image_2d(
            level,
            internal_format,
            width,
            height,
            0,
            format,
            ty,
            Some(bytes),
        );
    }

    /// Specify a 3D image for one level.
    #[allow(clippy::too_many_arguments)]
    pub fn image_3d(
        &self,
        level: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        depth: i32,
        border: i32,
        format: u32,
        ty: u32,
        data: Option<&[u8]>,
    ) {
        let target = self.target.to_raw();
        self.bind();
        self.ctx().call("glTexImage3D", |d| {
            d.tex_image_3d(
                target,
                level,
                internal_format as i32,
                width,
                height,
                depth,
                border,
                format,
                ty,
                data,
            )
        });
    }

    /// Allocate immutable 2D storage with `levels` mip levels.
    pub fn storage_2d(&self, levels: i32, internal_format: u32, width: i32, height: i32) {
        let target = self.target.to_raw();
        self.bind();
        self.ctx().call("glTexStorage2D", |d| {
            d.tex_storage_2d(target, levels, internal_format, width, height)
        });
    }

    /// Allocate immutable 3D storage with `levels` mip levels.
    pub fn storage_3d(
        &self,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        depth: i32,
    ) {
        let target = self.target.to_raw();
        self.bind();
        self.ctx().call("glTexStorage3D", |d| {
            d.tex_storage_3d(target, levels, internal_format, width, height, depth)
        });
    }

    /// Generate the mip chain from level zero.
    pub fn generate_mipmap(&self) {
        let target = self.target.to_raw();
        self.bind();
        self.ctx()
            .call("glGenerateMipmap", |d| d.generate_mipmap(target));
    }

    /// Bind one level to an image unit for shader load/store.
    pub fn bind_image_texture(
        &self,
        unit: u32,
        level: i32,
        layered: bool,
        layer: i32,
        access: ImageAccess,
        format: u32,
    ) {
        let id = self.id();
        self.bind();
        self.ctx().call("glBindImageTexture", |d| {
            d.bind_image_texture(unit, id, level, layered, layer, access.to_raw(), format)
        });
    }

    // ---- Residency -----------------------------------------------------

    /// The 64-bit residency handle. Zero on failure.
    pub fn texture_handle(&self) -> ResidentHandle {
        let id = self.id();
        self.ctx()
            .call("glGetTextureHandleARB", |d| d.get_texture_handle(id))
    }

    /// Returns true if the texture's handle is resident.
    pub fn is_resident(&self) -> bool {
        let handle = self.texture_handle();
        self.ctx().call("glIsTextureHandleResidentARB", |d| {
            d.is_texture_handle_resident(handle)
        })
    }

    /// Make the texture resident and return its handle.
    pub fn make_resident(&self) -> ResidentHandle {
        let handle = self.texture_handle();
        self.ctx().call("glMakeTextureHandleResidentARB", |d| {
            d.make_texture_handle_resident(handle)
        });
        handle
    }

    /// Make the texture non-resident.
    pub fn make_non_resident(&self) {
        let handle = self.texture_handle();
        self.ctx().call("glMakeTextureHandleNonResidentARB", |d| {
            d.make_texture_handle_non_resident(handle)
        });
    }
}

impl Object for Texture {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn accept(&self, visitor: &mut dyn ObjectVisitor) {
        visitor.visit_texture(self);
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id())
            .field("target", &self.target)
            .field("ownership", &self.ownership())
            .field("name", &self.name())
            .finish()
    }
}

/// Raw enum of texture unit `unit`. Out of range units saturate, which the
/// driver rejects with `INVALID_ENUM`.
fn texture_unit(unit: u32) -> u32 {
    gl::TEXTURE0.saturating_add(unit)
}

/// Keeps a texture bound; unbinds its target when dropped.
#[must_use = "the texture is unbound as soon as the guard is dropped"]
pub struct TextureBinding<'a> {
    texture: &'a Texture,
}

impl TextureBinding<'_> {
    /// The bound texture.
    pub fn texture(&self) -> &Texture {
        self.texture
    }
}

impl Drop for TextureBinding<'_> {
    fn drop(&mut self) {
        self.texture.unbind();
    }
}

// Textures are bound to the thread of their context
static_assertions::assert_not_impl_any!(Texture: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DummyDriver;
    use crate::error::{Diagnostic, GlError};

    fn setup() -> (DummyDriver, Rc<Context>) {
        let driver = DummyDriver::new();
        let context = Context::new(driver.clone());
        (driver, context)
    }

    #[test]
    fn test_bind_active_selects_unit() {
        let (driver, context) = setup();
        let texture = Texture::new(&context);

        texture.bind_active(2);
        assert_eq!(driver.bound_texture(2, gl::TEXTURE_2D), texture.id());

        texture.unbind_active(2);
        assert_eq!(driver.bound_texture(2, gl::TEXTURE_2D), 0);
    }

    #[test]
    fn test_binding_guard_unbinds() {
        let (driver, context) = setup();
        let texture = Texture::with_target(&context, TextureTarget::CubeMap);
        {
            let binding = texture.bound();
            assert_eq!(binding.texture().id(), texture.id());
            assert_eq!(driver.bound_texture(0, gl::TEXTURE_CUBE_MAP), texture.id());
        }
        assert_eq!(driver.bound_texture(0, gl::TEXTURE_CUBE_MAP), 0);
    }

    #[test]
    fn test_set_parameter_int_and_float() {
        let (driver, context) = setup();
        let texture = Texture::new(&context);

        texture.set_parameter(gl::TEXTURE_MAG_FILTER, gl::NEAREST);
        texture.set_parameter(gl::TEXTURE_MAX_LOD, 4.0f32);

        assert_eq!(texture.get_parameter(gl::TEXTURE_MAG_FILTER), gl::NEAREST);
        assert_eq!(texture.get_parameter(gl::TEXTURE_MAX_LOD), 4);
        assert_eq!(driver.count_calls("glTexParameterf"), 1);
        assert!(context.diagnostics().is_empty());
    }

    #[test]
    fn test_invalid_parameter_reports_and_continues() {
        let (_driver, context) = setup();
        let texture = Texture::new(&context);

        texture.set_parameter(gl::TEXTURE_MAG_FILTER, gl::LINEAR_MIPMAP_LINEAR);
        texture.set_parameter(gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE);

        assert_eq!(
            context.diagnostics(),
            vec![Diagnostic::DriverCall {
                call: "glTexParameteri",
                error: GlError::InvalidEnum,
            }]
        );
        assert_eq!(texture.get_parameter(gl::TEXTURE_WRAP_S), gl::CLAMP_TO_EDGE);
    }

    #[test]
    fn test_image_2d_from_pixels() {
        let (_driver, context) = setup();
        let texture = Texture::new(&context);
        let pixels: [u32; 4] = [0xFF0000FF; 4];

        texture.image_2d_from(0, gl::RGBA8, 2, 2, gl::RGBA, gl::UNSIGNED_BYTE, &pixels);
        texture.generate_mipmap();

        assert_eq!(texture.get_level_parameter(0, gl::TEXTURE_WIDTH), 2);
        assert_eq!(texture.get_level_parameter(1, gl::TEXTURE_WIDTH), 1);
        assert_eq!(
            texture.get_level_parameter(0, gl::TEXTURE_INTERNAL_FORMAT),
            gl::RGBA8 as i32
        );
        assert!(context.diagnostics().is_empty());
    }

    #[test]
    fn test_storage_3d() {
        let (_driver, context) = setup();
        let texture = Texture::with_target(&context, TextureTarget::Texture2dArray);
        texture.storage_3d(2, gl::RGBA16F, 8, 8, 6);

        assert_eq!(texture.get_level_parameter(1, gl::TEXTURE_WIDTH), 4);
        assert_eq!(texture.get_level_parameter(1, gl::TEXTURE_DEPTH), 6);
        assert_eq!(texture.get_parameter(gl::TEXTURE_IMMUTABLE_FORMAT), gl::TRUE);
    }

    #[test]
    fn test_residency_round_trip() {
        let (_driver, context) = setup();
        let texture = Texture::new(&context);
        texture.storage_2d(1, gl::RGBA8, 4, 4);

        assert!(!texture.is_resident());
        let handle = texture.make_resident();
        assert_eq!(handle, texture.texture_handle());
        assert!(texture.is_resident());

        texture.make_non_resident();
        assert!(!texture.is_resident());
        assert!(context.diagnostics().is_empty());
    }

    #[test]
    fn test_bind_image_texture() {
        let (driver, context) = setup();
        let texture = Texture::new(&context);
        texture.storage_2d(1, gl::R32F, 16, 16);

        texture.bind_image_texture(1, 0, false, 0, ImageAccess::WriteOnly, gl::R32F);
        assert_eq!(driver.bound_image(1), texture.id());
    }
}
