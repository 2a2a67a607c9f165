//! Dummy driver for testing and development.
//!
//! This driver keeps every object in memory and simulates the parts of driver
//! behavior the wrappers rely on: per-unit texture bindings, texture levels and
//! parameters, residency handles, buffer contents, shader compilation and
//! program linking. Like a real driver it keeps a sticky error register that
//! holds the first error raised since the last [`Driver::get_error`].
//!
//! Every entry point is recorded in a call log so tests can assert on the exact
//! sequence of driver calls a wrapper issues. The log keeps the most recent
//! [`DEFAULT_CALL_LOG_LIMIT`] calls unless configured otherwise.
//!
//! Clones share state: keep a clone in the test and hand another to the
//! [`Context`](crate::Context).

use std::cell::{RefCell, RefMut};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use crate::gl;
use crate::types::{BufferTarget, ShaderType, TextureTarget};

use super::{Driver, Handle, ResidentHandle};

/// Number of texture image units.
const MAX_TEXTURE_UNITS: u32 = 32;
/// Number of image load/store units.
const MAX_IMAGE_UNITS: u32 = 8;
/// Number of indexed buffer binding points per target.
const MAX_INDEXED_BINDINGS: u32 = 16;
/// Number of calls the log keeps by default.
pub const DEFAULT_CALL_LOG_LIMIT: usize = 65_536;
/// High bits of every residency handle.
const RESIDENT_HANDLE_BASE: u64 = 0x1_0000_0000;

/// One recorded driver entry point invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverCall {
    /// Entry point name, e.g. `glBindTexture`.
    pub function: &'static str,
    /// Scalar arguments. Slices are recorded by length.
    pub args: Vec<i64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Level {
    width: i32,
    height: i32,
    depth: i32,
    internal_format: i32,
}

#[derive(Debug, Default)]
struct TextureState {
    target: Option<u32>,
    int_params: HashMap<u32, i32>,
    float_params: HashMap<u32, f32>,
    levels: HashMap<i32, Level>,
    immutable_levels: Option<i32>,
}

#[derive(Debug)]
struct ShaderState {
    ty: u32,
    source: String,
    compiled: bool,
    info_log: String,
}

#[derive(Debug, Default)]
struct ProgramState {
    attached: Vec<Handle>,
    linked: bool,
    info_log: String,
}

#[derive(Debug, Default)]
struct BufferState {
    data: Vec<u8>,
    usage: u32,
    immutable: bool,
    storage_flags: u32,
}

#[derive(Debug)]
struct State {
    version: (i32, i32),
    error: u32,
    calls: VecDeque<DriverCall>,
    call_log_limit: usize,
    next_name: Handle,
    active_unit: u32,
    texture_bindings: HashMap<(u32, u32), Handle>,
    image_units: HashMap<u32, Handle>,
    textures: HashMap<Handle, TextureState>,
    resident: HashSet<ResidentHandle>,
    shaders: HashMap<Handle, ShaderState>,
    programs: HashMap<Handle, ProgramState>,
    current_program: Handle,
    buffers: HashMap<Handle, BufferState>,
    buffer_bindings: HashMap<u32, Handle>,
    indexed_buffer_bindings: HashMap<(u32, u32), Handle>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            version: (4, 5),
            error: gl::NO_ERROR,
            calls: VecDeque::new(),
            call_log_limit: DEFAULT_CALL_LOG_LIMIT,
            next_name: 1,
            active_unit: 0,
            texture_bindings: HashMap::new(),
            image_units: HashMap::new(),
            textures: HashMap::new(),
            resident: HashSet::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            current_program: 0,
            buffers: HashMap::new(),
            buffer_bindings: HashMap::new(),
            indexed_buffer_bindings: HashMap::new(),
        }
    }
}

impl State {
    /// Raise an error unless one is already pending.
    fn raise(&mut self, code: u32) {
        if self.error == gl::NO_ERROR {
            log::trace!("DummyDriver: raising error 0x{:04X}", code);
            self.error = code;
        }
    }

    fn alloc_name(&mut self) -> Handle {
        let name = self.next_name;
        self.next_name += 1;
        name
    }

    fn active_binding(&self, target: u32) -> i32 {
        self.texture_bindings
            .get(&(self.active_unit, target))
            .copied()
            .unwrap_or(0) as i32
    }

    /// Name of the texture bound to `target` on the active unit, after
    /// validating the target.
    fn bound_texture(&mut self, target: u32) -> Option<Handle> {
        if TextureTarget::from_raw(target).is_none() {
            self.raise(gl::INVALID_ENUM);
            return None;
        }
        match self.texture_bindings.get(&(self.active_unit, target)) {
            Some(&name) if name != 0 => Some(name),
            _ => {
                self.raise(gl::INVALID_OPERATION);
                None
            }
        }
    }

    fn bound_texture_state(&mut self, target: u32) -> Option<&mut TextureState> {
        let name = self.bound_texture(target)?;
        self.textures.get_mut(&name)
    }

    /// Name of the buffer bound to `target`, after validating the target.
    fn bound_buffer(&mut self, target: u32) -> Option<Handle> {
        if BufferTarget::from_raw(target).is_none() {
            self.raise(gl::INVALID_ENUM);
            return None;
        }
        match self.buffer_bindings.get(&target) {
            Some(&name) if name != 0 => Some(name),
            _ => {
                self.raise(gl::INVALID_OPERATION);
                None
            }
        }
    }

    fn bound_buffer_state(&mut self, target: u32) -> Option<&mut BufferState> {
        let name = self.bound_buffer(target)?;
        self.buffers.get_mut(&name)
    }

    /// Validates a byte range against a buffer length.
    fn check_range(&mut self, offset: isize, size: isize, len: usize) -> Option<(usize, usize)> {
        let end = offset.checked_add(size).filter(|_| offset >= 0 && size >= 0);
        match end {
            Some(end) if end as usize <= len => Some((offset as usize, end as usize)),
            _ => {
                self.raise(gl::INVALID_VALUE);
                None
            }
        }
    }

    fn texture_for_handle(&mut self, handle: ResidentHandle) -> Option<Handle> {
        let name = (handle & 0xFFFF_FFFF) as Handle;
        if handle & RESIDENT_HANDLE_BASE == 0 || !self.textures.contains_key(&name) {
            self.raise(gl::INVALID_OPERATION);
            return None;
        }
        Some(name)
    }
}

/// In-memory driver.
#[derive(Debug, Clone, Default)]
pub struct DummyDriver {
    state: Rc<RefCell<State>>,
}

impl DummyDriver {
    /// Create a dummy driver reporting version 4.5.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dummy driver reporting the given version.
    pub fn with_version(major: i32, minor: i32) -> Self {
        let driver = Self::default();
        driver.state.borrow_mut().version = (major, minor);
        driver
    }

    /// Create a dummy driver whose call log keeps the last `limit` calls.
    /// A limit of zero disables the log.
    pub fn with_call_log_limit(limit: usize) -> Self {
        let driver = Self::default();
        driver.state.borrow_mut().call_log_limit = limit;
        driver
    }

    /// Record a call and return the state for the call to act on.
    fn record(&self, function: &'static str, args: &[i64]) -> RefMut<'_, State> {
        let mut state = self.state.borrow_mut();
        if state.call_log_limit == 0 {
            return state;
        }
        while state.calls.len() >= state.call_log_limit {
            state.calls.pop_front();
        }
        state.calls.push_back(DriverCall {
            function,
            args: args.to_vec(),
        });
        state
    }

    // ---- Inspection helpers --------------------------------------------

    /// Every call recorded so far.
    pub fn calls(&self) -> Vec<DriverCall> {
        self.state.borrow().calls.iter().cloned().collect()
    }

    /// Names of every call recorded so far.
    pub fn call_names(&self) -> Vec<&'static str> {
        self.state.borrow().calls.iter().map(|c| c.function).collect()
    }

    /// Number of recorded calls to `function`.
    pub fn count_calls(&self, function: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.function == function)
            .count()
    }

    /// Forget every recorded call.
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Raise an error as if the next call had failed.
    pub fn inject_error(&self, code: u32) {
        self.state.borrow_mut().raise(code);
    }

    /// The texture bound to `target` on `unit`, or zero.
    pub fn bound_texture(&self, unit: u32, target: u32) -> Handle {
        self.state
            .borrow()
            .texture_bindings
            .get(&(unit, target))
            .copied()
            .unwrap_or(0)
    }

    /// The buffer bound to `target`, or zero.
    pub fn bound_buffer(&self, target: u32) -> Handle {
        self.state
            .borrow()
            .buffer_bindings
            .get(&target)
            .copied()
            .unwrap_or(0)
    }

    /// The buffer bound to an indexed binding point, or zero.
    pub fn bound_buffer_index(&self, target: u32, index: u32) -> Handle {
        self.state
            .borrow()
            .indexed_buffer_bindings
            .get(&(target, index))
            .copied()
            .unwrap_or(0)
    }

    /// The texture bound to an image unit, or zero.
    pub fn bound_image(&self, unit: u32) -> Handle {
        self.state
            .borrow()
            .image_units
            .get(&unit)
            .copied()
            .unwrap_or(0)
    }

    /// The current program, or zero.
    pub fn current_program(&self) -> Handle {
        self.state.borrow().current_program
    }

    /// Returns true if the texture name is live.
    pub fn texture_exists(&self, texture: Handle) -> bool {
        self.state.borrow().textures.contains_key(&texture)
    }

    /// Returns true if the shader name is live.
    pub fn shader_exists(&self, shader: Handle) -> bool {
        self.state.borrow().shaders.contains_key(&shader)
    }

    /// Returns true if the program name is live.
    pub fn program_exists(&self, program: Handle) -> bool {
        self.state.borrow().programs.contains_key(&program)
    }

    /// Returns true if the buffer name is live.
    pub fn buffer_exists(&self, buffer: Handle) -> bool {
        self.state.borrow().buffers.contains_key(&buffer)
    }

    /// Contents of a buffer.
    pub fn buffer_contents(&self, buffer: Handle) -> Option<Vec<u8>> {
        self.state
            .borrow()
            .buffers
            .get(&buffer)
            .map(|b| b.data.clone())
    }
}

/// Number of mip levels of a full chain for the given extent.
fn full_chain_levels(extent: i32) -> i32 {
    32 - (extent.max(1) as u32).leading_zeros() as i32
}

/// Targets whose last dimension counts layers rather than texels.
fn is_layered(target: u32) -> bool {
    matches!(
        target,
        gl::TEXTURE_1D_ARRAY
            | gl::TEXTURE_2D_ARRAY
            | gl::TEXTURE_CUBE_MAP_ARRAY
            | gl::TEXTURE_2D_MULTISAMPLE_ARRAY
    )
}

fn mip_extent(extent: i32, level: i32) -> i32 {
    (extent >> level).max(1)
}

fn valid_int_parameter(pname: u32, value: i32) -> Result<(), u32> {
    match pname {
        gl::TEXTURE_MAG_FILTER => match value {
            gl::NEAREST | gl::LINEAR => Ok(()),
            _ => Err(gl::INVALID_ENUM),
        },
        gl::TEXTURE_MIN_FILTER => match value {
            gl::NEAREST
            | gl::LINEAR
            | gl::NEAREST_MIPMAP_NEAREST
            | gl::LINEAR_MIPMAP_NEAREST
            | gl::NEAREST_MIPMAP_LINEAR
            | gl::LINEAR_MIPMAP_LINEAR => Ok(()),
            _ => Err(gl::INVALID_ENUM),
        },
        gl::TEXTURE_WRAP_S | gl::TEXTURE_WRAP_T | gl::TEXTURE_WRAP_R => match value {
            gl::REPEAT | gl::CLAMP_TO_EDGE | gl::MIRRORED_REPEAT => Ok(()),
            _ => Err(gl::INVALID_ENUM),
        },
        gl::TEXTURE_BASE_LEVEL | gl::TEXTURE_MAX_LEVEL if value < 0 => Err(gl::INVALID_VALUE),
        gl::TEXTURE_BASE_LEVEL
        | gl::TEXTURE_MAX_LEVEL
        | gl::TEXTURE_MIN_LOD
        | gl::TEXTURE_MAX_LOD
        | gl::TEXTURE_LOD_BIAS
        | gl::TEXTURE_MAX_ANISOTROPY => Ok(()),
        _ => Err(gl::INVALID_ENUM),
    }
}

fn default_int_parameter(texture: &TextureState, pname: u32) -> Option<i32> {
    let value = match pname {
        gl::TEXTURE_MAG_FILTER => gl::LINEAR,
        gl::TEXTURE_MIN_FILTER => gl::NEAREST_MIPMAP_LINEAR,
        gl::TEXTURE_WRAP_S | gl::TEXTURE_WRAP_T | gl::TEXTURE_WRAP_R => gl::REPEAT,
        gl::TEXTURE_BASE_LEVEL => 0,
        gl::TEXTURE_MAX_LEVEL => 1000,
        gl::TEXTURE_MIN_LOD => -1000,
        gl::TEXTURE_MAX_LOD => 1000,
        gl::TEXTURE_LOD_BIAS => 0,
        gl::TEXTURE_MAX_ANISOTROPY => 1,
        gl::TEXTURE_IMMUTABLE_FORMAT => i32::from(texture.immutable_levels.is_some()),
        gl::TEXTURE_IMMUTABLE_LEVELS => texture.immutable_levels.unwrap_or(0),
        _ => return None,
    };
    Some(value)
}

/// Compile step of the dummy driver: returns the info log on failure.
fn compile_source(ty: u32, source: &str) -> Result<(), String> {
    if source.trim().is_empty() {
        return Err(String::from("ERROR: 0:1: empty shader source"));
    }
    validate_glsl(ty, source)
}

fn check_entry_point(source: &str) -> Result<(), String> {
    if source.contains("main") {
        Ok(())
    } else {
        Err(String::from("ERROR: missing entry point main()"))
    }
}

#[cfg(feature = "glsl-validation")]
fn validate_glsl(ty: u32, source: &str) -> Result<(), String> {
    let stage = match ty {
        gl::VERTEX_SHADER => naga::ShaderStage::Vertex,
        gl::FRAGMENT_SHADER => naga::ShaderStage::Fragment,
        gl::COMPUTE_SHADER => naga::ShaderStage::Compute,
        // No front end for the remaining stages.
        _ => return check_entry_point(source),
    };

    let options = naga::front::glsl::Options {
        stage,
        defines: naga::FastHashMap::default(),
    };
    let mut frontend = naga::front::glsl::Frontend::default();
    let module = frontend
        .parse(&options, source)
        .map_err(|errors| format!("GLSL parse error:\n{errors}"))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| format!("Validation error: {e}"))?;
    Ok(())
}

#[cfg(not(feature = "glsl-validation"))]
fn validate_glsl(_ty: u32, source: &str) -> Result<(), String> {
    check_entry_point(source)
}

fn log_length(text: &str) -> i32 {
    // Includes the terminating NUL, zero when empty.
    if text.is_empty() {
        0
    } else {
        text.len() as i32 + 1
    }
}

fn len_arg(data: Option<&[u8]>) -> i64 {
    data.map_or(-1, |d| d.len() as i64)
}

impl Driver for DummyDriver {
    fn name(&self) -> &'static str {
        "Dummy"
    }

    fn get_error(&self) -> u32 {
        let mut s = self.record("glGetError", &[]);
        std::mem::replace(&mut s.error, gl::NO_ERROR)
    }

    fn get_integer(&self, pname: u32) -> i32 {
        let mut s = self.record("glGetIntegerv", &[pname.into()]);
        match pname {
            gl::MAJOR_VERSION => s.version.0,
            gl::MINOR_VERSION => s.version.1,
            gl::ACTIVE_TEXTURE => (gl::TEXTURE0 + s.active_unit) as i32,
            gl::CURRENT_PROGRAM => s.current_program as i32,
            gl::TEXTURE_BINDING_1D => s.active_binding(gl::TEXTURE_1D),
            gl::TEXTURE_BINDING_2D => s.active_binding(gl::TEXTURE_2D),
            gl::TEXTURE_BINDING_3D => s.active_binding(gl::TEXTURE_3D),
            gl::TEXTURE_BINDING_CUBE_MAP => s.active_binding(gl::TEXTURE_CUBE_MAP),
            gl::TEXTURE_BINDING_2D_ARRAY => s.active_binding(gl::TEXTURE_2D_ARRAY),
            _ => {
                s.raise(gl::INVALID_ENUM);
                0
            }
        }
    }

    // ---- Textures ------------------------------------------------------

    fn gen_texture(&self) -> Handle {
        let mut s = self.record("glGenTextures", &[1]);
        let name = s.alloc_name();
        s.textures.insert(name, TextureState::default());
        log::trace!("DummyDriver: created texture {}", name);
        name
    }

    fn delete_texture(&self, texture: Handle) {
        let mut s = self.record("glDeleteTextures", &[texture.into()]);
        if s.textures.remove(&texture).is_none() {
            return;
        }
        s.texture_bindings.retain(|_, bound| *bound != texture);
        s.image_units.retain(|_, bound| *bound != texture);
        s.resident.remove(&(RESIDENT_HANDLE_BASE | u64::from(texture)));
        log::trace!("DummyDriver: deleted texture {}", texture);
    }

    fn active_texture(&self, unit: u32) {
        let mut s = self.record("glActiveTexture", &[unit.into()]);
        match unit.checked_sub(gl::TEXTURE0) {
            Some(index) if index < MAX_TEXTURE_UNITS => s.active_unit = index,
            _ => s.raise(gl::INVALID_ENUM),
        }
    }

    fn bind_texture(&self, target: u32, texture: Handle) {
        let mut s = self.record("glBindTexture", &[target.into(), texture.into()]);
        if TextureTarget::from_raw(target).is_none() {
            return s.raise(gl::INVALID_ENUM);
        }
        if texture != 0 {
            let fixed = match s.textures.get(&texture) {
                Some(state) => state.target,
                None => return s.raise(gl::INVALID_OPERATION),
            };
            if fixed.is_some_and(|existing| existing != target) {
                return s.raise(gl::INVALID_OPERATION);
            }
            if let Some(state) = s.textures.get_mut(&texture) {
                state.target = Some(target);
            }
        }
        let unit = s.active_unit;
        s.texture_bindings.insert((unit, target), texture);
    }

    fn tex_parameter_i(&self, target: u32, pname: u32, value: i32) {
        let mut s = self.record(
            "glTexParameteri",
            &[target.into(), pname.into(), value.into()],
        );
        if let Err(code) = valid_int_parameter(pname, value) {
            return s.raise(code);
        }
        if let Some(texture) = s.bound_texture_state(target) {
            texture.float_params.remove(&pname);
            texture.int_params.insert(pname, value);
        }
    }

    fn tex_parameter_f(&self, target: u32, pname: u32, value: f32) {
        let mut s = self.record(
            "glTexParameterf",
            &[target.into(), pname.into(), i64::from(value.to_bits())],
        );
        if let Err(code) = valid_int_parameter(pname, value as i32) {
            return s.raise(code);
        }
        if let Some(texture) = s.bound_texture_state(target) {
            texture.int_params.remove(&pname);
            texture.float_params.insert(pname, value);
        }
    }

    fn get_tex_parameter_i(&self, target: u32, pname: u32) -> i32 {
        let mut s = self.record("glGetTexParameteriv", &[target.into(), pname.into()]);
        let Some(texture) = s.bound_texture_state(target) else {
            return 0;
        };
        let value = texture
            .int_params
            .get(&pname)
            .copied()
            .or_else(|| texture.float_params.get(&pname).map(|v| v.round() as i32))
            .or_else(|| default_int_parameter(texture, pname));
        match value {
            Some(value) => value,
            None => {
                s.raise(gl::INVALID_ENUM);
                0
            }
        }
    }

    fn get_tex_level_parameter_i(&self, target: u32, level: i32, pname: u32) -> i32 {
        let mut s = self.record(
            "glGetTexLevelParameteriv",
            &[target.into(), level.into(), pname.into()],
        );
        if level < 0 {
            s.raise(gl::INVALID_VALUE);
            return 0;
        }
        let Some(texture) = s.bound_texture_state(target) else {
            return 0;
        };
        let info = texture.levels.get(&level).copied().unwrap_or_default();
        match pname {
            gl::TEXTURE_WIDTH => info.width,
            gl::TEXTURE_HEIGHT => info.height,
            gl::TEXTURE_DEPTH => info.depth,
            gl::TEXTURE_INTERNAL_FORMAT => info.internal_format,
            _ => {
                s.raise(gl::INVALID_ENUM);
                0
            }
        }
    }

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
    ) {
        self.tex_image_3d_impl(
            "glTexImage2D",
            target,
            level,
            internal_format,
            (width, height, 1),
            border,
            format,
            ty,
            data,
        );
    }

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
    ) {
        self.tex_image_3d_impl(
            "glTexImage3D",
            target,
            level,
            internal_format,
            (width, height, depth),
            border,
            format,
            ty,
            data,
        );
    }

    fn tex_storage_2d(
        &self,
        target: u32,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    ) {
        self.tex_storage_impl(
            "glTexStorage2D",
            target,
            levels,
            internal_format,
            (width, height, 1),
        );
    }

    fn tex_storage_3d(
        &self,
        target: u32,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        depth: i32,
    ) {
        self.tex_storage_impl(
            "glTexStorage3D",
            target,
            levels,
            internal_format,
            (width, height, depth),
        );
    }

    fn generate_mipmap(&self, target: u32) {
        let mut s = self.record("glGenerateMipmap", &[target.into()]);
        let Some(texture) = s.bound_texture_state(target) else {
            return;
        };
        let Some(base) = texture.levels.get(&0).copied() else {
            return s.raise(gl::INVALID_OPERATION);
        };
        let layered = is_layered(target);
        let depth_extent = if layered { 1 } else { base.depth };
        let count = full_chain_levels(base.width.max(base.height).max(depth_extent));
        let count = texture.immutable_levels.map_or(count, |n| n.min(count));
        for level in 1..count {
            texture.levels.insert(
                level,
                Level {
                    width: mip_extent(base.width, level),
                    height: mip_extent(base.height, level),
                    depth: if layered {
                        base.depth
                    } else {
                        mip_extent(base.depth, level)
                    },
                    internal_format: base.internal_format,
                },
            );
        }
    }

    fn bind_image_texture(
        &self,
        unit: u32,
        texture: Handle,
        level: i32,
        layered: bool,
        layer: i32,
        access: u32,
        format: u32,
    ) {
        let mut s = self.record(
            "glBindImageTexture",
            &[
                unit.into(),
                texture.into(),
                level.into(),
                i64::from(layered),
                layer.into(),
                access.into(),
                format.into(),
            ],
        );
        if !matches!(access, gl::READ_ONLY | gl::WRITE_ONLY | gl::READ_WRITE) {
            return s.raise(gl::INVALID_ENUM);
        }
        if unit >= MAX_IMAGE_UNITS || level < 0 || layer < 0 {
            return s.raise(gl::INVALID_VALUE);
        }
        if texture != 0 && !s.textures.contains_key(&texture) {
            return s.raise(gl::INVALID_VALUE);
        }
        s.image_units.insert(unit, texture);
    }

    // ---- Texture residency ---------------------------------------------

    fn get_texture_handle(&self, texture: Handle) -> ResidentHandle {
        let mut s = self.record("glGetTextureHandleARB", &[texture.into()]);
        if !s.textures.contains_key(&texture) {
            s.raise(gl::INVALID_VALUE);
            return 0;
        }
        RESIDENT_HANDLE_BASE | u64::from(texture)
    }

    fn is_texture_handle_resident(&self, handle: ResidentHandle) -> bool {
        let mut s = self.record("glIsTextureHandleResidentARB", &[handle as i64]);
        if s.texture_for_handle(handle).is_none() {
            return false;
        }
        s.resident.contains(&handle)
    }

    fn make_texture_handle_resident(&self, handle: ResidentHandle) {
        let mut s = self.record("glMakeTextureHandleResidentARB", &[handle as i64]);
        if s.texture_for_handle(handle).is_none() {
            return;
        }
        if !s.resident.insert(handle) {
            s.raise(gl::INVALID_OPERATION);
        }
    }

    fn make_texture_handle_non_resident(&self, handle: ResidentHandle) {
        let mut s = self.record("glMakeTextureHandleNonResidentARB", &[handle as i64]);
        if s.texture_for_handle(handle).is_none() {
            return;
        }
        if !s.resident.remove(&handle) {
            s.raise(gl::INVALID_OPERATION);
        }
    }

    // ---- Shaders -------------------------------------------------------

    fn create_shader(&self, ty: u32) -> Handle {
        let mut s = self.record("glCreateShader", &[ty.into()]);
        if ShaderType::from_raw(ty).is_none() {
            s.raise(gl::INVALID_ENUM);
            return 0;
        }
        let name = s.alloc_name();
        s.shaders.insert(
            name,
            ShaderState {
                ty,
                source: String::new(),
                compiled: false,
                info_log: String::new(),
            },
        );
        log::trace!("DummyDriver: created shader {} (type 0x{:04X})", name, ty);
        name
    }

    fn delete_shader(&self, shader: Handle) {
        let mut s = self.record("glDeleteShader", &[shader.into()]);
        if shader == 0 {
            return;
        }
        if s.shaders.remove(&shader).is_none() {
            return s.raise(gl::INVALID_VALUE);
        }
        for program in s.programs.values_mut() {
            program.attached.retain(|&attached| attached != shader);
        }
        log::trace!("DummyDriver: deleted shader {}", shader);
    }

    fn shader_source(&self, shader: Handle, source: &str) {
        let mut s = self.record("glShaderSource", &[shader.into(), source.len() as i64]);
        match s.shaders.get_mut(&shader) {
            Some(state) => state.source = source.to_string(),
            None => s.raise(gl::INVALID_VALUE),
        }
    }

    fn compile_shader(&self, shader: Handle) {
        let mut s = self.record("glCompileShader", &[shader.into()]);
        let Some(state) = s.shaders.get_mut(&shader) else {
            return s.raise(gl::INVALID_VALUE);
        };
        match compile_source(state.ty, &state.source) {
            Ok(()) => {
                state.compiled = true;
                state.info_log.clear();
            }
            Err(log) => {
                log::trace!("DummyDriver: shader {} failed to compile", shader);
                state.compiled = false;
                state.info_log = log;
            }
        }
    }

    fn get_shader_i(&self, shader: Handle, pname: u32) -> i32 {
        let mut s = self.record("glGetShaderiv", &[shader.into(), pname.into()]);
        let Some(state) = s.shaders.get(&shader) else {
            s.raise(gl::INVALID_VALUE);
            return 0;
        };
        match pname {
            gl::SHADER_TYPE => state.ty as i32,
            gl::DELETE_STATUS => gl::FALSE,
            gl::COMPILE_STATUS => i32::from(state.compiled),
            gl::INFO_LOG_LENGTH => log_length(&state.info_log),
            gl::SHADER_SOURCE_LENGTH => log_length(&state.source),
            _ => {
                s.raise(gl::INVALID_ENUM);
                0
            }
        }
    }

    fn get_shader_info_log(&self, shader: Handle) -> String {
        let mut s = self.record("glGetShaderInfoLog", &[shader.into()]);
        match s.shaders.get(&shader) {
            Some(state) => state.info_log.clone(),
            None => {
                s.raise(gl::INVALID_VALUE);
                String::new()
            }
        }
    }

    fn get_shader_source(&self, shader: Handle) -> String {
        let mut s = self.record("glGetShaderSource", &[shader.into()]);
        match s.shaders.get(&shader) {
            Some(state) => state.source.clone(),
            None => {
                s.raise(gl::INVALID_VALUE);
                String::new()
            }
        }
    }

    // ---- Programs ------------------------------------------------------

    fn create_program(&self) -> Handle {
        let mut s = self.record("glCreateProgram", &[]);
        let name = s.alloc_name();
        s.programs.insert(name, ProgramState::default());
        log::trace!("DummyDriver: created program {}", name);
        name
    }

    fn delete_program(&self, program: Handle) {
        let mut s = self.record("glDeleteProgram", &[program.into()]);
        if program == 0 {
            return;
        }
        if s.programs.remove(&program).is_none() {
            return s.raise(gl::INVALID_VALUE);
        }
        if s.current_program == program {
            s.current_program = 0;
        }
        log::trace!("DummyDriver: deleted program {}", program);
    }

    fn attach_shader(&self, program: Handle, shader: Handle) {
        let mut s = self.record("glAttachShader", &[program.into(), shader.into()]);
        if !s.shaders.contains_key(&shader) {
            return s.raise(gl::INVALID_VALUE);
        }
        let Some(state) = s.programs.get_mut(&program) else {
            return s.raise(gl::INVALID_VALUE);
        };
        if state.attached.contains(&shader) {
            return s.raise(gl::INVALID_OPERATION);
        }
        state.attached.push(shader);
    }

    fn detach_shader(&self, program: Handle, shader: Handle) {
        let mut s = self.record("glDetachShader", &[program.into(), shader.into()]);
        let Some(state) = s.programs.get_mut(&program) else {
            return s.raise(gl::INVALID_VALUE);
        };
        let before = state.attached.len();
        state.attached.retain(|&attached| attached != shader);
        if state.attached.len() == before {
            s.raise(gl::INVALID_OPERATION);
        }
    }

    fn link_program(&self, program: Handle) {
        let mut s = self.record("glLinkProgram", &[program.into()]);
        let Some(state) = s.programs.get(&program) else {
            return s.raise(gl::INVALID_VALUE);
        };
        let result = if state.attached.is_empty() {
            Err(String::from("error: no shaders attached"))
        } else {
            state
                .attached
                .iter()
                .find(|&&shader| !s.shaders.get(&shader).is_some_and(|sh| sh.compiled))
                .map_or(Ok(()), |shader| {
                    Err(format!("error: shader {shader} is not compiled"))
                })
        };
        if let Some(state) = s.programs.get_mut(&program) {
            match result {
                Ok(()) => {
                    state.linked = true;
                    state.info_log.clear();
                }
                Err(log) => {
                    state.linked = false;
                    state.info_log = log;
                }
            }
        }
    }

    fn use_program(&self, program: Handle) {
        let mut s = self.record("glUseProgram", &[program.into()]);
        if program != 0 {
            match s.programs.get(&program).map(|state| state.linked) {
                None => return s.raise(gl::INVALID_VALUE),
                Some(false) => return s.raise(gl::INVALID_OPERATION),
                Some(true) => {}
            }
        }
        s.current_program = program;
    }

    fn get_program_i(&self, program: Handle, pname: u32) -> i32 {
        let mut s = self.record("glGetProgramiv", &[program.into(), pname.into()]);
        let Some(state) = s.programs.get(&program) else {
            s.raise(gl::INVALID_VALUE);
            return 0;
        };
        match pname {
            gl::LINK_STATUS => i32::from(state.linked),
            gl::DELETE_STATUS | gl::VALIDATE_STATUS => gl::FALSE,
            gl::ATTACHED_SHADERS => state.attached.len() as i32,
            gl::INFO_LOG_LENGTH => log_length(&state.info_log),
            _ => {
                s.raise(gl::INVALID_ENUM);
                0
            }
        }
    }

    fn get_program_info_log(&self, program: Handle) -> String {
        let mut s = self.record("glGetProgramInfoLog", &[program.into()]);
        match s.programs.get(&program) {
            Some(state) => state.info_log.clone(),
            None => {
                s.raise(gl::INVALID_VALUE);
                String::new()
            }
        }
    }

    // ---- Buffers -------------------------------------------------------

    fn gen_buffer(&self) -> Handle {
        let mut s = self.record("glGenBuffers", &[1]);
        let name = s.alloc_name();
        s.buffers.insert(name, BufferState::default());
        log::trace!("DummyDriver: created buffer {}", name);
        name
    }

    fn delete_buffer(&self, buffer: Handle) {
        let mut s = self.record("glDeleteBuffers", &[buffer.into()]);
        if s.buffers.remove(&buffer).is_none() {
            return;
        }
        s.buffer_bindings.retain(|_, bound| *bound != buffer);
        s.indexed_buffer_bindings.retain(|_, bound| *bound != buffer);
        log::trace!("DummyDriver: deleted buffer {}", buffer);
    }

    fn bind_buffer(&self, target: u32, buffer: Handle) {
        let mut s = self.record("glBindBuffer", &[target.into(), buffer.into()]);
        if BufferTarget::from_raw(target).is_none() {
            return s.raise(gl::INVALID_ENUM);
        }
        if buffer != 0 && !s.buffers.contains_key(&buffer) {
            return s.raise(gl::INVALID_OPERATION);
        }
        s.buffer_bindings.insert(target, buffer);
    }

    fn bind_buffer_base(&self, target: u32, index: u32, buffer: Handle) {
        let mut s = self.record(
            "glBindBufferBase",
            &[target.into(), index.into(), buffer.into()],
        );
        if !BufferTarget::from_raw(target).is_some_and(BufferTarget::is_indexed) {
            return s.raise(gl::INVALID_ENUM);
        }
        if index >= MAX_INDEXED_BINDINGS || (buffer != 0 && !s.buffers.contains_key(&buffer)) {
            return s.raise(gl::INVALID_VALUE);
        }
        s.indexed_buffer_bindings.insert((target, index), buffer);
        s.buffer_bindings.insert(target, buffer);
    }

    fn bind_buffer_range(
        &self,
        target: u32,
        index: u32,
        buffer: Handle,
        offset: isize,
        size: isize,
    ) {
        let mut s = self.record(
            "glBindBufferRange",
            &[
                target.into(),
                index.into(),
                buffer.into(),
                offset as i64,
                size as i64,
            ],
        );
        if !BufferTarget::from_raw(target).is_some_and(BufferTarget::is_indexed) {
            return s.raise(gl::INVALID_ENUM);
        }
        if index >= MAX_INDEXED_BINDINGS || offset < 0 {
            return s.raise(gl::INVALID_VALUE);
        }
        if buffer != 0 && (size <= 0 || !s.buffers.contains_key(&buffer)) {
            return s.raise(gl::INVALID_VALUE);
        }
        s.indexed_buffer_bindings.insert((target, index), buffer);
        s.buffer_bindings.insert(target, buffer);
    }

    fn buffer_data(&self, target: u32, size: isize, data: Option<&[u8]>, usage: u32) {
        let mut s = self.record(
            "glBufferData",
            &[target.into(), size as i64, len_arg(data), usage.into()],
        );
        if size < 0 {
            return s.raise(gl::INVALID_VALUE);
        }
        let Some(buffer) = s.bound_buffer_state(target) else {
            return;
        };
        if buffer.immutable {
            return s.raise(gl::INVALID_OPERATION);
        }
        let mut contents = data.map(<[u8]>::to_vec).unwrap_or_default();
        contents.resize(size as usize, 0);
        buffer.data = contents;
        buffer.usage = usage;
    }

    fn buffer_sub_data(&self, target: u32, offset: isize, data: &[u8]) {
        let mut s = self.record(
            "glBufferSubData",
            &[target.into(), offset as i64, data.len() as i64],
        );
        let Some(len) = s.bound_buffer_state(target).map(|b| b.data.len()) else {
            return;
        };
        let Some((start, end)) = s.check_range(offset, data.len() as isize, len) else {
            return;
        };
        if let Some(buffer) = s.bound_buffer_state(target) {
            if buffer.immutable && buffer.storage_flags & gl::DYNAMIC_STORAGE_BIT == 0 {
                return s.raise(gl::INVALID_OPERATION);
            }
            buffer.data[start..end].copy_from_slice(data);
        }
    }

    fn buffer_storage(&self, target: u32, size: isize, data: Option<&[u8]>, flags: u32) {
        let mut s = self.record(
            "glBufferStorage",
            &[target.into(), size as i64, len_arg(data), flags.into()],
        );
        let known = gl::MAP_READ_BIT
            | gl::MAP_WRITE_BIT
            | gl::MAP_PERSISTENT_BIT
            | gl::MAP_COHERENT_BIT
            | gl::DYNAMIC_STORAGE_BIT
            | gl::CLIENT_STORAGE_BIT;
        if size <= 0 || flags & !known != 0 {
            return s.raise(gl::INVALID_VALUE);
        }
        let Some(buffer) = s.bound_buffer_state(target) else {
            return;
        };
        if buffer.immutable {
            return s.raise(gl::INVALID_OPERATION);
        }
        let mut contents = data.map(<[u8]>::to_vec).unwrap_or_default();
        contents.resize(size as usize, 0);
        buffer.data = contents;
        buffer.immutable = true;
        buffer.storage_flags = flags;
    }

    fn copy_buffer_sub_data(
        &self,
        read_target: u32,
        write_target: u32,
        read_offset: isize,
        write_offset: isize,
        size: isize,
    ) {
        let mut s = self.record(
            "glCopyBufferSubData",
            &[
                read_target.into(),
                write_target.into(),
                read_offset as i64,
                write_offset as i64,
                size as i64,
            ],
        );
        let (Some(source), Some(dest)) = (s.bound_buffer(read_target), s.bound_buffer(write_target))
        else {
            return;
        };
        let source_len = s.buffers.get(&source).map_or(0, |b| b.data.len());
        let dest_len = s.buffers.get(&dest).map_or(0, |b| b.data.len());
        let Some((read_start, read_end)) = s.check_range(read_offset, size, source_len) else {
            return;
        };
        let Some((write_start, write_end)) = s.check_range(write_offset, size, dest_len) else {
            return;
        };
        if source == dest && read_start < write_end && write_start < read_end {
            return s.raise(gl::INVALID_VALUE);
        }
        let bytes = s
            .buffers
            .get(&source)
            .map(|b| b.data[read_start..read_end].to_vec())
            .unwrap_or_default();
        if let Some(buffer) = s.buffers.get_mut(&dest) {
            buffer.data[write_start..write_end].copy_from_slice(&bytes);
        }
    }

    fn clear_buffer_data(
        &self,
        target: u32,
        internal_format: u32,
        format: u32,
        ty: u32,
        data: Option<&[u8]>,
    ) {
        let mut s = self.record(
            "glClearBufferData",
            &[
                target.into(),
                internal_format.into(),
                format.into(),
                ty.into(),
                len_arg(data),
            ],
        );
        let Some(buffer) = s.bound_buffer_state(target) else {
            return;
        };
        match data {
            None => buffer.data.fill(0),
            Some(pattern) if !pattern.is_empty() && buffer.data.len() % pattern.len() == 0 => {
                for chunk in buffer.data.chunks_mut(pattern.len()) {
                    chunk.copy_from_slice(pattern);
                }
            }
            Some(_) => s.raise(gl::INVALID_VALUE),
        }
    }

    fn get_buffer_parameter_i(&self, target: u32, pname: u32) -> i32 {
        let mut s = self.record(
            "glGetBufferParameteriv",
            &[target.into(), pname.into()],
        );
        let Some(buffer) = s.bound_buffer_state(target) else {
            return 0;
        };
        match pname {
            gl::BUFFER_SIZE => buffer.data.len() as i32,
            gl::BUFFER_USAGE => buffer.usage as i32,
            gl::BUFFER_IMMUTABLE_STORAGE => i32::from(buffer.immutable),
            gl::BUFFER_STORAGE_FLAGS => buffer.storage_flags as i32,
            _ => {
                s.raise(gl::INVALID_ENUM);
                0
            }
        }
    }

    fn get_buffer_sub_data(&self, target: u32, offset: isize, size: isize) -> Vec<u8> {
        let mut s = self.record(
            "glGetBufferSubData",
            &[target.into(), offset as i64, size as i64],
        );
        let Some(len) = s.bound_buffer_state(target).map(|b| b.data.len()) else {
            return Vec::new();
        };
        let Some((start, end)) = s.check_range(offset, size, len) else {
            return Vec::new();
        };
        s.bound_buffer_state(target)
            .map(|b| b.data[start..end].to_vec())
            .unwrap_or_default()
    }
}

impl DummyDriver {
    #[allow(clippy::too_many_arguments)]
    fn tex_image_3d_impl(
        &self,
        function: &'static str,
        target: u32,
        level: i32,
        internal_format: i32,
        (width, height, depth): (i32, i32, i32),
        border: i32,
        format: u32,
        ty: u32,
        data: Option<&[u8]>,
    ) {
        let mut s = self.record(
            function,
            &[
                target.into(),
                level.into(),
                internal_format.into(),
                width.into(),
                height.into(),
                depth.into(),
                border.into(),
                format.into(),
                ty.into(),
                len_arg(data),
            ],
        );
        if level < 0 || width < 0 || height < 0 || depth < 0 || border != 0 {
            return s.raise(gl::INVALID_VALUE);
        }
        let Some(texture) = s.bound_texture_state(target) else {
            return;
        };
        if texture.immutable_levels.is_some() {
            return s.raise(gl::INVALID_OPERATION);
        }
        texture.levels.insert(
            level,
            Level {
                width,
                height,
                depth,
                internal_format,
            },
        );
    }

    fn tex_storage_impl(
        &self,
        function: &'static str,
        target: u32,
        levels: i32,
        internal_format: u32,
        (width, height, depth): (i32, i32, i32),
    ) {
        let mut s = self.record(
            function,
            &[
                target.into(),
                levels.into(),
                internal_format.into(),
                width.into(),
                height.into(),
                depth.into(),
            ],
        );
        if levels < 1 || width < 1 || height < 1 || depth < 1 {
            return s.raise(gl::INVALID_VALUE);
        }
        let layered = is_layered(target);
        // 1D arrays keep their layer count in the height.
        let shrink_height = target != gl::TEXTURE_1D_ARRAY;
        let shrink_depth = !layered && depth > 1;
        let mut extent = width;
        if shrink_height {
            extent = extent.max(height);
        }
        if shrink_depth {
            extent = extent.max(depth);
        }
        if levels > full_chain_levels(extent) {
            return s.raise(gl::INVALID_OPERATION);
        }
        let Some(texture) = s.bound_texture_state(target) else {
            return;
        };
        if texture.immutable_levels.is_some() {
            return s.raise(gl::INVALID_OPERATION);
        }
        for level in 0..levels {
            texture.levels.insert(
                level,
                Level {
                    width: mip_extent(width, level),
                    height: if shrink_height {
                        mip_extent(height, level)
                    } else {
                        height
                    },
                    depth: if shrink_depth {
                        mip_extent(depth, level)
                    } else {
                        depth
                    },
                    internal_format: internal_format as i32,
                },
            );
        }
        texture.immutable_levels = Some(levels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = "#version 450
layout(location = 0) in vec3 a_position;
void main() {
    gl_Position = vec4(a_position, 1.0);
}
";

    #[test]
    fn test_error_register_is_sticky() {
        let driver = DummyDriver::new();
        driver.bind_texture(0xDEAD, 0);
        driver.bind_texture(gl::TEXTURE_2D, 999);

        assert_eq!(driver.get_error(), gl::INVALID_ENUM);
        assert_eq!(driver.get_error(), gl::NO_ERROR);
    }

    #[test]
    fn test_texture_bindings_per_unit() {
        let driver = DummyDriver::new();
        let texture = driver.gen_texture();

        driver.active_texture(gl::TEXTURE0 + 3);
        driver.bind_texture(gl::TEXTURE_2D, texture);

        assert_eq!(driver.bound_texture(3, gl::TEXTURE_2D), texture);
        assert_eq!(driver.bound_texture(0, gl::TEXTURE_2D), 0);
        assert_eq!(
            driver.get_integer(gl::TEXTURE_BINDING_2D),
            texture as i32
        );
    }

    #[test]
    fn test_texture_target_is_fixed_on_first_bind() {
        let driver = DummyDriver::new();
        let texture = driver.gen_texture();
        driver.bind_texture(gl::TEXTURE_2D, texture);
        assert_eq!(driver.get_error(), gl::NO_ERROR);

        driver.bind_texture(gl::TEXTURE_3D, texture);
        assert_eq!(driver.get_error(), gl::INVALID_OPERATION);
    }

    #[test]
    fn test_parameter_defaults_and_overrides() {
        let driver = DummyDriver::new();
        let texture = driver.gen_texture();
        driver.bind_texture(gl::TEXTURE_2D, texture);

        assert_eq!(
            driver.get_tex_parameter_i(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER),
            gl::NEAREST_MIPMAP_LINEAR
        );
        driver.tex_parameter_i(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR);
        assert_eq!(
            driver.get_tex_parameter_i(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER),
            gl::LINEAR
        );

        driver.tex_parameter_i(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR_MIPMAP_LINEAR);
        assert_eq!(driver.get_error(), gl::INVALID_ENUM);
    }

    #[test]
    fn test_storage_levels() {
        let driver = DummyDriver::new();
        let texture = driver.gen_texture();
        driver.bind_texture(gl::TEXTURE_2D, texture);
        driver.tex_storage_2d(gl::TEXTURE_2D, 3, gl::RGBA8, 64, 16);

        assert_eq!(
            driver.get_tex_level_parameter_i(gl::TEXTURE_2D, 2, gl::TEXTURE_WIDTH),
            16
        );
        assert_eq!(
            driver.get_tex_level_parameter_i(gl::TEXTURE_2D, 2, gl::TEXTURE_HEIGHT),
            4
        );
        assert_eq!(
            driver.get_tex_parameter_i(gl::TEXTURE_2D, gl::TEXTURE_IMMUTABLE_LEVELS),
            3
        );

        driver.tex_image_2d(
            gl::TEXTURE_2D,
            0,
            gl::RGBA8 as i32,
            4,
            4,
            0,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            None,
        );
        assert_eq!(driver.get_error(), gl::INVALID_OPERATION);
    }

    #[test]
    fn test_too_many_storage_levels() {
        let driver = DummyDriver::new();
        let texture = driver.gen_texture();
        driver.bind_texture(gl::TEXTURE_2D, texture);
        driver.tex_storage_2d(gl::TEXTURE_2D, 4, gl::RGBA8, 4, 4);
        assert_eq!(driver.get_error(), gl::INVALID_OPERATION);
    }

    #[test]
    fn test_generate_mipmap_needs_base_level() {
        let driver = DummyDriver::new();
        let texture = driver.gen_texture();
        driver.bind_texture(gl::TEXTURE_2D, texture);
        driver.generate_mipmap(gl::TEXTURE_2D);
        assert_eq!(driver.get_error(), gl::INVALID_OPERATION);

        driver.tex_image_2d(
            gl::TEXTURE_2D,
            0,
            gl::RGBA8 as i32,
            8,
            2,
            0,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            None,
        );
        driver.generate_mipmap(gl::TEXTURE_2D);
        assert_eq!(driver.get_error(), gl::NO_ERROR);
        assert_eq!(
            driver.get_tex_level_parameter_i(gl::TEXTURE_2D, 3, gl::TEXTURE_WIDTH),
            1
        );
    }

    #[test]
    fn test_residency() {
        let driver = DummyDriver::new();
        let texture = driver.gen_texture();
        let handle = driver.get_texture_handle(texture);
        assert_ne!(handle, 0);

        assert!(!driver.is_texture_handle_resident(handle));
        driver.make_texture_handle_resident(handle);
        assert!(driver.is_texture_handle_resident(handle));

        driver.make_texture_handle_resident(handle);
        assert_eq!(driver.get_error(), gl::INVALID_OPERATION);

        driver.delete_texture(texture);
        assert!(!driver.texture_exists(texture));
    }

    #[test]
    fn test_compile_and_link() {
        let driver = DummyDriver::new();
        let shader = driver.create_shader(gl::VERTEX_SHADER);
        driver.shader_source(shader, VERTEX);
        driver.compile_shader(shader);
        assert_eq!(driver.get_shader_i(shader, gl::COMPILE_STATUS), gl::TRUE);
        assert_eq!(driver.get_shader_i(shader, gl::INFO_LOG_LENGTH), 0);

        let program = driver.create_program();
        driver.attach_shader(program, shader);
        driver.link_program(program);
        assert_eq!(driver.get_program_i(program, gl::LINK_STATUS), gl::TRUE);

        driver.use_program(program);
        assert_eq!(driver.current_program(), program);
        assert_eq!(driver.get_error(), gl::NO_ERROR);
    }

    #[cfg(feature = "glsl-validation")]
    #[test]
    fn test_compile_failure_sets_info_log() {
        let driver = DummyDriver::new();
        let shader = driver.create_shader(gl::FRAGMENT_SHADER);
        driver.shader_source(shader, "#version 450\nvoid main() { undefined_call(); }\n");
        driver.compile_shader(shader);

        assert_eq!(driver.get_shader_i(shader, gl::COMPILE_STATUS), gl::FALSE);
        assert!(!driver.get_shader_info_log(shader).is_empty());
        assert_eq!(driver.get_error(), gl::NO_ERROR);
    }

    #[test]
    fn test_link_requires_compiled_shaders() {
        let driver = DummyDriver::new();
        let shader = driver.create_shader(gl::VERTEX_SHADER);
        let program = driver.create_program();
        driver.attach_shader(program, shader);
        driver.link_program(program);

        assert_eq!(driver.get_program_i(program, gl::LINK_STATUS), gl::FALSE);
        assert!(driver.get_program_info_log(program).contains("not compiled"));

        driver.use_program(program);
        assert_eq!(driver.get_error(), gl::INVALID_OPERATION);
    }

    #[test]
    fn test_buffer_data_and_copy() {
        let driver = DummyDriver::new();
        let a = driver.gen_buffer();
        let b = driver.gen_buffer();

        driver.bind_buffer(gl::COPY_READ_BUFFER, a);
        driver.buffer_data(gl::COPY_READ_BUFFER, 4, Some(&[1, 2, 3, 4]), gl::STATIC_DRAW);
        driver.bind_buffer(gl::COPY_WRITE_BUFFER, b);
        driver.buffer_data(gl::COPY_WRITE_BUFFER, 4, None, gl::STATIC_DRAW);

        driver.copy_buffer_sub_data(gl::COPY_READ_BUFFER, gl::COPY_WRITE_BUFFER, 1, 0, 3);
        assert_eq!(driver.buffer_contents(b), Some(vec![2, 3, 4, 0]));

        driver.copy_buffer_sub_data(gl::COPY_READ_BUFFER, gl::COPY_WRITE_BUFFER, 2, 0, 3);
        assert_eq!(driver.get_error(), gl::INVALID_VALUE);
    }

    #[test]
    fn test_immutable_buffer_storage() {
        let driver = DummyDriver::new();
        let buffer = driver.gen_buffer();
        driver.bind_buffer(gl::ARRAY_BUFFER, buffer);
        driver.buffer_storage(gl::ARRAY_BUFFER, 8, None, gl::MAP_READ_BIT);

        driver.buffer_sub_data(gl::ARRAY_BUFFER, 0, &[1, 2]);
        assert_eq!(driver.get_error(), gl::INVALID_OPERATION);

        driver.buffer_data(gl::ARRAY_BUFFER, 4, None, gl::STATIC_DRAW);
        assert_eq!(driver.get_error(), gl::INVALID_OPERATION);
        assert_eq!(
            driver.get_buffer_parameter_i(gl::ARRAY_BUFFER, gl::BUFFER_IMMUTABLE_STORAGE),
            gl::TRUE
        );
    }

    #[test]
    fn test_call_log() {
        let driver = DummyDriver::new();
        let texture = driver.gen_texture();
        driver.bind_texture(gl::TEXTURE_2D, texture);
        driver.get_error();

        assert_eq!(
            driver.call_names(),
            vec!["glGenTextures", "glBindTexture", "glGetError"]
        );
        assert_eq!(
            driver.calls()[1].args,
            vec![i64::from(gl::TEXTURE_2D), i64::from(texture)]
        );
        assert_eq!(driver.count_calls("glGetError"), 1);
    }

    #[test]
    fn test_call_log_keeps_most_recent() {
        let driver = DummyDriver::with_call_log_limit(2);
        let texture = driver.gen_texture();
        driver.bind_texture(gl::TEXTURE_2D, texture);
        driver.get_error();

        assert_eq!(driver.call_names(), vec!["glBindTexture", "glGetError"]);

        let silent = DummyDriver::with_call_log_limit(0);
        silent.gen_buffer();
        assert!(silent.calls().is_empty());
    }

    #[test]
    fn test_overflowing_range_is_rejected() {
        let driver = DummyDriver::new();
        let buffer = driver.gen_buffer();
        driver.bind_buffer(gl::ARRAY_BUFFER, buffer);
        driver.buffer_data(gl::ARRAY_BUFFER, 4, None, gl::STATIC_DRAW);

        assert!(driver
            .get_buffer_sub_data(gl::ARRAY_BUFFER, isize::MAX, 1)
            .is_empty());
        assert_eq!(driver.get_error(), gl::INVALID_VALUE);

        driver.buffer_sub_data(gl::ARRAY_BUFFER, 1, &[0; 4]);
        assert_eq!(driver.get_error(), gl::INVALID_VALUE);
        assert_eq!(driver.buffer_contents(buffer), Some(vec![0; 4]));
    }
}
