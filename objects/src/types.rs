//! Typed binding points and usage hints.
//!
//! Each enum maps one-to-one onto a raw driver value through `to_raw()`.

use bitflags::bitflags;

use crate::gl;

/// Texture binding target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureTarget {
    /// One-dimensional texture.
    Texture1d,
    /// Two-dimensional texture.
    #[default]
    Texture2d,
    /// Three-dimensional texture.
    Texture3d,
    /// Array of one-dimensional layers.
    Texture1dArray,
    /// Array of two-dimensional layers.
    Texture2dArray,
    /// Rectangle texture (no mipmaps, unnormalized coordinates).
    Rectangle,
    /// Cube map.
    CubeMap,
    /// Array of cube maps.
    CubeMapArray,
    /// Texture backed by a buffer object.
    Buffer,
    /// Multisampled two-dimensional texture.
    Texture2dMultisample,
    /// Array of multisampled two-dimensional layers.
    Texture2dMultisampleArray,
}

impl TextureTarget {
    /// All texture targets.
    pub const ALL: [TextureTarget; 11] = [
        Self::Texture1d,
        Self::Texture2d,
        Self::Texture3d,
        Self::Texture1dArray,
        Self::Texture2dArray,
        Self::Rectangle,
        Self::CubeMap,
        Self::CubeMapArray,
        Self::Buffer,
        Self::Texture2dMultisample,
        Self::Texture2dMultisampleArray,
    ];

    /// Raw driver value.
    pub fn to_raw(self) -> u32 {
        match self {
            Self::Texture1d => gl::TEXTURE_1D,
            Self::Texture2d => gl::TEXTURE_2D,
            Self::Texture3d => gl::TEXTURE_3D,
            Self::Texture1dArray => gl::TEXTURE_1D_ARRAY,
            Self::Texture2dArray => gl::TEXTURE_2D_ARRAY,
            Self::Rectangle => gl::TEXTURE_RECTANGLE,
            Self::CubeMap => gl::TEXTURE_CUBE_MAP,
            Self::CubeMapArray => gl::TEXTURE_CUBE_MAP_ARRAY,
            Self::Buffer => gl::TEXTURE_BUFFER,
            Self::Texture2dMultisample => gl::TEXTURE_2D_MULTISAMPLE,
            Self::Texture2dMultisampleArray => gl::TEXTURE_2D_MULTISAMPLE_ARRAY,
        }
    }

    /// Look up a target from its raw driver value.
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|target| target.to_raw() == raw)
    }
}

/// Shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderType {
    /// Vertex shader.
    Vertex,
    /// Tessellation control shader.
    TessControl,
    /// Tessellation evaluation shader.
    TessEvaluation,
    /// Geometry shader.
    Geometry,
    /// Fragment shader.
    Fragment,
    /// Compute shader.
    Compute,
}

impl ShaderType {
    /// All shader types.
    pub const ALL: [ShaderType; 6] = [
        Self::Vertex,
        Self::TessControl,
        Self::TessEvaluation,
        Self::Geometry,
        Self::Fragment,
        Self::Compute,
    ];

    /// Raw driver value.
    pub fn to_raw(self) -> u32 {
        match self {
            Self::Vertex => gl::VERTEX_SHADER,
            Self::TessControl => gl::TESS_CONTROL_SHADER,
            Self::TessEvaluation => gl::TESS_EVALUATION_SHADER,
            Self::Geometry => gl::GEOMETRY_SHADER,
            Self::Fragment => gl::FRAGMENT_SHADER,
            Self::Compute => gl::COMPUTE_SHADER,
        }
    }

    /// Look up a shader type from its raw driver value.
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.to_raw() == raw)
    }

    /// The driver's name for this shader type, e.g. `GL_VERTEX_SHADER`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "GL_VERTEX_SHADER",
            Self::TessControl => "GL_TESS_CONTROL_SHADER",
            Self::TessEvaluation => "GL_TESS_EVALUATION_SHADER",
            Self::Geometry => "GL_GEOMETRY_SHADER",
            Self::Fragment => "GL_FRAGMENT_SHADER",
            Self::Compute => "GL_COMPUTE_SHADER",
        }
    }
}

/// Buffer binding target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attributes.
    Array,
    /// Vertex indices.
    ElementArray,
    /// Pixel read-back destination.
    PixelPack,
    /// Pixel upload source.
    PixelUnpack,
    /// Uniform block storage.
    Uniform,
    /// Transform feedback output.
    TransformFeedback,
    /// Copy source.
    CopyRead,
    /// Copy destination.
    CopyWrite,
    /// Indirect draw arguments.
    DrawIndirect,
    /// Shader storage blocks.
    ShaderStorage,
    /// Atomic counters.
    AtomicCounter,
    /// Texture buffer storage.
    Texture,
}

impl BufferTarget {
    /// All buffer targets.
    pub const ALL: [BufferTarget; 12] = [
        Self::Array,
        Self::ElementArray,
        Self::PixelPack,
        Self::PixelUnpack,
        Self::Uniform,
        Self::TransformFeedback,
        Self::CopyRead,
        Self::CopyWrite,
        Self::DrawIndirect,
        Self::ShaderStorage,
        Self::AtomicCounter,
        Self::Texture,
    ];

    /// Look up a target from its raw driver value.
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|target| target.to_raw() == raw)
    }

    /// Raw driver value.
    pub fn to_raw(self) -> u32 {
        match self {
            Self::Array => gl::ARRAY_BUFFER,
            Self::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
            Self::PixelPack => gl::PIXEL_PACK_BUFFER,
            Self::PixelUnpack => gl::PIXEL_UNPACK_BUFFER,
            Self::Uniform => gl::UNIFORM_BUFFER,
            Self::TransformFeedback => gl::TRANSFORM_FEEDBACK_BUFFER,
            Self::CopyRead => gl::COPY_READ_BUFFER,
            Self::CopyWrite => gl::COPY_WRITE_BUFFER,
            Self::DrawIndirect => gl::DRAW_INDIRECT_BUFFER,
            Self::ShaderStorage => gl::SHADER_STORAGE_BUFFER,
            Self::AtomicCounter => gl::ATOMIC_COUNTER_BUFFER,
            Self::Texture => gl::TEXTURE_BUFFER,
        }
    }

    /// Returns true for targets that have indexed binding points
    /// (`bind_base` / `bind_range`).
    pub fn is_indexed(self) -> bool {
        matches!(
            self,
            Self::Uniform | Self::TransformFeedback | Self::ShaderStorage | Self::AtomicCounter
        )
    }
}

/// Usage hint for mutable buffer data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Written once, drawn a few times.
    StreamDraw,
    /// Written once by the driver, read a few times.
    StreamRead,
    /// Written once by the driver, used a few times by the driver.
    StreamCopy,
    /// Written once, drawn many times.
    #[default]
    StaticDraw,
    /// Written once by the driver, read many times.
    StaticRead,
    /// Written once by the driver, used many times by the driver.
    StaticCopy,
    /// Rewritten often, drawn many times.
    DynamicDraw,
    /// Rewritten often by the driver, read many times.
    DynamicRead,
    /// Rewritten often by the driver, used many times by the driver.
    DynamicCopy,
}

impl BufferUsage {
    /// Raw driver value.
    pub fn to_raw(self) -> u32 {
        match self {
            Self::StreamDraw => gl::STREAM_DRAW,
            Self::StreamRead => gl::STREAM_READ,
            Self::StreamCopy => gl::STREAM_COPY,
            Self::StaticDraw => gl::STATIC_DRAW,
            Self::StaticRead => gl::STATIC_READ,
            Self::StaticCopy => gl::STATIC_COPY,
            Self::DynamicDraw => gl::DYNAMIC_DRAW,
            Self::DynamicRead => gl::DYNAMIC_READ,
            Self::DynamicCopy => gl::DYNAMIC_COPY,
        }
    }
}

bitflags! {
    /// Flags for immutable buffer storage.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferStorageFlags: u32 {
        /// Storage may be mapped for reading.
        const MAP_READ = gl::MAP_READ_BIT;
        /// Storage may be mapped for writing.
        const MAP_WRITE = gl::MAP_WRITE_BIT;
        /// Storage may stay mapped while the driver uses it.
        const MAP_PERSISTENT = gl::MAP_PERSISTENT_BIT;
        /// Persistent mappings are coherent.
        const MAP_COHERENT = gl::MAP_COHERENT_BIT;
        /// Contents may be updated with `set_sub_data`.
        const DYNAMIC_STORAGE = gl::DYNAMIC_STORAGE_BIT;
        /// Prefer client-side memory.
        const CLIENT_STORAGE = gl::CLIENT_STORAGE_BIT;
    }
}

impl Default for BufferStorageFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Access mode for image load/store bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageAccess {
    /// Shaders only read.
    ReadOnly,
    /// Shaders only write.
    WriteOnly,
    /// Shaders read and write.
    #[default]
    ReadWrite,
}

impl ImageAccess {
    /// Raw driver value.
    pub fn to_raw(self) -> u32 {
        match self {
            Self::ReadOnly => gl::READ_ONLY,
            Self::WriteOnly => gl::WRITE_ONLY,
            Self::ReadWrite => gl::READ_WRITE,
        }
    }
}
