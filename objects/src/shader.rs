//! Shader wrapper.
//!
//! A shader's source text comes from an externally owned [`StringSource`].
//! The shader listens to that source, to every named string its last upload
//! included, and (while it uses includes) to the context's named string
//! registry. It drops back to [`CompileState::Uncompiled`] whenever
//! one of them changes. Recompiling is always an explicit [`Shader::compile`].
//!
//! The shader is itself observable through [`Shader::changeable`]: listeners
//! are notified each time it leaves `Compiled` or `CompilationFailed`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use glimmer_core::{ChangeListener, Changeable, ListenerId, StaticStringSource, StringSource};

use crate::context::Context;
use crate::driver::Handle;
use crate::error::Diagnostic;
use crate::gl;
use crate::include;
use crate::object::{Object, ObjectBase, ObjectKind, ObjectVisitor, Ownership};
use crate::types::ShaderType;

/// Compilation state of a shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompileState {
    /// Not compiled since the last change.
    #[default]
    Uncompiled,
    /// Compiled successfully.
    Compiled,
    /// The last compile failed; see [`Shader::info_log`].
    CompilationFailed,
}

type Subscription = (Rc<dyn StringSource>, ListenerId);

/// A shader object.
///
/// # Example
///
/// ```
/// use glimmer_objects::{Context, DummyDriver, Shader, ShaderType};
///
/// let context = Context::new(DummyDriver::new());
/// let shader = Shader::from_string(
///     &context,
///     ShaderType::Fragment,
///     "#version 450\nlayout(location = 0) out vec4 color;\nvoid main() { color = vec4(1.0); }\n",
/// );
/// assert!(shader.compile());
///
/// shader.set_source_string("#version 450\nvoid main() {}\n");
/// assert!(!shader.is_compiled());
/// ```
pub struct Shader {
    base: ObjectBase,
    ty: ShaderType,
    source: RefCell<Option<Subscription>>,
    include_paths: RefCell<Vec<String>>,
    includes: RefCell<Vec<Subscription>>,
    registry_listener: Cell<Option<ListenerId>>,
    state: Cell<CompileState>,
    source_dirty: Cell<bool>,
    include_error: RefCell<Option<String>>,
    changeable: Changeable,
    self_ref: Weak<Shader>,
}

impl Shader {
    /// Create a shader without source.
    pub fn new(context: &Rc<Context>, ty: ShaderType) -> Rc<Self> {
        let raw = ty.to_raw();
        let id = context.call("glCreateShader", |d| d.create_shader(raw));
        Self::with_ownership(context, id, ty, Ownership::Owned)
    }

    /// Wrap an existing shader without taking ownership.
    pub fn from_id(context: &Rc<Context>, id: Handle, ty: ShaderType) -> Rc<Self> {
        Self::with_ownership(context, id, ty, Ownership::Borrowed)
    }

    /// Wrap an existing shader.
    pub fn with_ownership(
        context: &Rc<Context>,
        id: Handle,
        ty: ShaderType,
        ownership: Ownership,
    ) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            base: ObjectBase::new(context, ObjectKind::Shader, id, ownership),
            ty,
            source: RefCell::new(None),
            include_paths: RefCell::new(Vec::new()),
            includes: RefCell::new(Vec::new()),
            registry_listener: Cell::new(None),
            state: Cell::new(CompileState::Uncompiled),
            source_dirty: Cell::new(true),
            include_error: RefCell::new(None),
            changeable: Changeable::new(),
            self_ref: self_ref.clone(),
        })
    }

    /// Create a shader reading its text from `source`.
    pub fn with_source(
        context: &Rc<Context>,
        ty: ShaderType,
        source: Rc<dyn StringSource>,
    ) -> Rc<Self> {
        let shader = Self::new(context, ty);
        shader.set_source(source);
        shader
    }

    /// Create a shader reading its text from `source`, resolving includes
    /// against `include_paths`.
    pub fn with_source_and_includes(
        context: &Rc<Context>,
        ty: ShaderType,
        source: Rc<dyn StringSource>,
        include_paths: Vec<String>,
    ) -> Rc<Self> {
        let shader = Self::with_source(context, ty, source);
        *shader.include_paths.borrow_mut() = include_paths;
        shader
    }

    /// Create a shader from literal text.
    pub fn from_string(context: &Rc<Context>, ty: ShaderType, text: impl Into<String>) -> Rc<Self> {
        Self::with_source(context, ty, Rc::new(StaticStringSource::new(text)))
    }

    fn ctx(&self) -> &Context {
        self.base.context()
    }

    fn listener(&self) -> Weak<dyn ChangeListener> {
        self.self_ref.clone()
    }

    // ---- Source --------------------------------------------------------

    /// Replace the source provider. Invalidates the shader.
    pub fn set_source(&self, source: Rc<dyn StringSource>) {
        let id = source.changeable().register_listener(self.listener());
        let previous = self.source.replace(Some((source, id)));
        if let Some((old, old_id)) = previous {
            old.changeable().deregister_listener(old_id);
        }
        self.source_dirty.set(true);
        self.invalidate();
    }

    /// Replace the source with literal text.
    pub fn set_source_string(&self, text: impl Into<String>) {
        self.set_source(Rc::new(StaticStringSource::new(text)));
    }

    /// The current source provider.
    pub fn source(&self) -> Option<Rc<dyn StringSource>> {
        self.source.borrow().as_ref().map(|(source, _)| Rc::clone(source))
    }

    /// Set the paths relative includes are resolved against. Invalidates the
    /// shader but does not recompile it.
    pub fn set_include_paths(&self, paths: Vec<String>) {
        *self.include_paths.borrow_mut() = paths;
        self.source_dirty.set(true);
        self.invalidate();
    }

    /// The include paths.
    pub fn include_paths(&self) -> Vec<String> {
        self.include_paths.borrow().clone()
    }

    /// Resolve includes and upload the current source text to the driver.
    ///
    /// Returns false if an include could not be resolved; the error is then
    /// available through [`info_log`](Self::info_log).
    pub fn update_source(&self) -> bool {
        let text = self
            .source
            .borrow()
            .as_ref()
            .map(|(source, _)| source.string())
            .unwrap_or_default();
        let paths = self.include_paths();

        let processed = match include::process(self.ctx(), &text, &paths) {
            Ok(processed) => processed,
            Err(e) => {
                *self.include_error.borrow_mut() = Some(e.to_string());
                self.watch_registry(true);
                return false;
            }
        };
        *self.include_error.borrow_mut() = None;

        let id = self.id();
        self.ctx()
            .call("glShaderSource", |d| d.shader_source(id, &processed.text));
        self.watch_registry(!processed.included.is_empty());
        self.watch_includes(processed.included);
        self.source_dirty.set(false);
        true
    }

    /// Listen to named string registration while includes are in use.
    fn watch_registry(&self, watch: bool) {
        let registry = self.ctx().named_strings_changeable();
        match (watch, self.registry_listener.get()) {
            (true, None) => {
                let id = registry.register_listener(self.listener());
                self.registry_listener.set(Some(id));
            }
            (false, Some(id)) => {
                registry.deregister_listener(id);
                self.registry_listener.set(None);
            }
            _ => {}
        }
    }

    /// Listen to the named strings pulled in by the last upload.
    fn watch_includes(&self, included: Vec<Rc<dyn StringSource>>) {
        let subscriptions: Vec<Subscription> = included
            .into_iter()
            .map(|named| {
                let id = named.changeable().register_listener(self.listener());
                (named, id)
            })
            .collect();
        let previous = self.includes.replace(subscriptions);
        for (named, id) in previous {
            named.changeable().deregister_listener(id);
        }
    }

    // ---- Compilation ---------------------------------------------------

    /// Compile if needed. Returns true if the shader is compiled.
    ///
    /// Does nothing when already compiled. After a failed compile the shader
    /// stays failed until its source changes or it is invalidated.
    pub fn compile(&self) -> bool {
        match self.state.get() {
            CompileState::Compiled => return true,
            CompileState::CompilationFailed => return false,
            CompileState::Uncompiled => {}
        }

        if self.source_dirty.get() && !self.update_source() {
            self.fail(self.info_log());
            return false;
        }

        let id = self.id();
        self.ctx().call("glCompileShader", |d| d.compile_shader(id));
        if self.check_compile_status() {
            log::debug!("Compiled {}", self.describe());
            self.state.set(CompileState::Compiled);
            true
        } else {
            self.fail(self.info_log());
            false
        }
    }

    fn fail(&self, info_log: String) {
        self.state.set(CompileState::CompilationFailed);
        self.ctx().report(Diagnostic::Compilation {
            shader: self.describe(),
            info_log,
        });
    }

    /// Returns true if the shader is compiled.
    pub fn is_compiled(&self) -> bool {
        self.state.get() == CompileState::Compiled
    }

    /// The compilation state.
    pub fn state(&self) -> CompileState {
        self.state.get()
    }

    /// Drop back to [`CompileState::Uncompiled`] and notify listeners.
    ///
    /// Does nothing if already uncompiled.
    pub fn invalidate(&self) {
        if self.state.replace(CompileState::Uncompiled) == CompileState::Uncompiled {
            return;
        }
        log::trace!("Invalidated {}", self.describe());
        self.changeable.changed();
    }

    /// Notified whenever the shader leaves a compiled or failed state.
    pub fn changeable(&self) -> &Changeable {
        &self.changeable
    }

    // ---- Queries -------------------------------------------------------

    /// Query a shader parameter.
    pub fn get(&self, pname: u32) -> i32 {
        let id = self.id();
        self.ctx()
            .call("glGetShaderiv", |d| d.get_shader_i(id, pname))
    }

    /// The source text as stored by the driver, with includes resolved.
    pub fn get_source(&self) -> String {
        let id = self.id();
        self.ctx()
            .call("glGetShaderSource", |d| d.get_shader_source(id))
    }

    /// Ask the driver whether the last compile succeeded.
    pub fn check_compile_status(&self) -> bool {
        self.get(gl::COMPILE_STATUS) == gl::TRUE
    }

    /// The info log of the last compile attempt.
    ///
    /// If include resolution failed this is the resolution error, otherwise
    /// the driver's log.
    pub fn info_log(&self) -> String {
        if let Some(error) = self.include_error.borrow().as_ref() {
            return error.clone();
        }
        let id = self.id();
        self.ctx()
            .call("glGetShaderInfoLog", |d| d.get_shader_info_log(id))
    }

    /// The shader stage.
    pub fn shader_type(&self) -> ShaderType {
        self.ty
    }

    /// The driver's name for the stage, e.g. `GL_VERTEX_SHADER`.
    pub fn type_string(&self) -> &'static str {
        self.ty.name()
    }

    fn describe(&self) -> String {
        let subject = match (self.name(), self.source.borrow().as_ref()) {
            (Some(name), _) => name,
            (None, Some((source, _))) => source.short_info(),
            (None, None) => String::from("<no source>"),
        };
        format!("{} {} ({})", self.type_string(), self.id(), subject)
    }
}

impl ChangeListener for Shader {
    fn notify_changed(&self, _sender: &Changeable) {
        self.source_dirty.set(true);
        self.invalidate();
    }
}

impl Object for Shader {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn accept(&self, visitor: &mut dyn ObjectVisitor) {
        visitor.visit_shader(self);
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        if let Some((source, id)) = self.source.get_mut().take() {
            source.changeable().deregister_listener(id);
        }
        for (named, id) in self.includes.get_mut().drain(..) {
            named.changeable().deregister_listener(id);
        }
        if let Some(id) = self.registry_listener.take() {
            self.base
                .context()
                .named_strings_changeable()
                .deregister_listener(id);
        }
    }
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("id", &self.id())
            .field("type", &self.ty)
            .field("state", &self.state.get())
            .field("include_paths", &self.include_paths.borrow())
            .finish_non_exhaustive()
    }
}

// Shaders are bound to the thread of their context
static_assertions::assert_not_impl_any!(Shader: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DummyDriver;

    const FRAGMENT: &str = "#version 450
layout(location = 0) out vec4 o_color;
void main() {
    o_color = vec4(1.0, 0.0, 0.0, 1.0);
}
";

    #[derive(Default)]
    struct Counter {
        count: Cell<u32>,
    }

    impl ChangeListener for Counter {
        fn notify_changed(&self, _sender: &Changeable) {
            self.count.set(self.count.get() + 1);
        }
    }

    fn watch(shader: &Shader) -> Rc<Counter> {
        let counter = Rc::new(Counter::default());
        let listener: Rc<dyn ChangeListener> = counter.clone();
        shader.changeable().register_listener(Rc::downgrade(&listener));
        counter
    }

    fn setup() -> (DummyDriver, Rc<Context>) {
        let driver = DummyDriver::new();
        let context = Context::new(driver.clone());
        (driver, context)
    }

    #[test]
    fn test_compile_is_idempotent() {
        let (driver, context) = setup();
        let shader = Shader::from_string(&context, ShaderType::Fragment, FRAGMENT);

        assert!(shader.compile());
        assert!(shader.compile());
        assert_eq!(driver.count_calls("glCompileShader"), 1);
        assert_eq!(driver.count_calls("glShaderSource"), 1);
    }

    #[test]
    fn test_failed_compile_is_sticky() {
        let (driver, context) = setup();
        let shader = Shader::from_string(&context, ShaderType::Fragment, "");

        assert!(!shader.compile());
        assert_eq!(shader.state(), CompileState::CompilationFailed);
        assert!(!shader.info_log().is_empty());
        assert!(matches!(
            context.last_diagnostic(),
            Some(Diagnostic::Compilation { .. })
        ));

        assert!(!shader.compile());
        assert_eq!(driver.count_calls("glCompileShader"), 1);
    }

    #[test]
    fn test_invalidate_recompiles_without_upload() {
        let (driver, context) = setup();
        let shader = Shader::from_string(&context, ShaderType::Fragment, FRAGMENT);
        assert!(shader.compile());

        shader.invalidate();
        assert_eq!(shader.state(), CompileState::Uncompiled);
        assert!(shader.compile());

        assert_eq!(driver.count_calls("glShaderSource"), 1);
        assert_eq!(driver.count_calls("glCompileShader"), 2);
    }

    #[test]
    fn test_notifications_only_on_transition() {
        let (_driver, context) = setup();
        let source = Rc::new(StaticStringSource::new(FRAGMENT));
        let shader = Shader::with_source(&context, ShaderType::Fragment, source.clone());
        let counter = watch(&shader);

        source.set_string(FRAGMENT);
        assert_eq!(counter.count.get(), 0);

        assert!(shader.compile());
        source.set_string(FRAGMENT);
        source.set_string(FRAGMENT);
        assert_eq!(counter.count.get(), 1);
        assert_eq!(shader.state(), CompileState::Uncompiled);
    }

    #[test]
    fn test_replaced_source_is_no_longer_watched() {
        let (_driver, context) = setup();
        let first = Rc::new(StaticStringSource::new(FRAGMENT));
        let shader = Shader::with_source(&context, ShaderType::Fragment, first.clone());
        shader.set_source_string(FRAGMENT);
        assert_eq!(first.changeable().listener_count(), 0);

        assert!(shader.compile());
        first.set_string("garbage");
        assert!(shader.is_compiled());
    }

    #[test]
    fn test_unresolved_include_fails() {
        let (driver, context) = setup();
        let shader = Shader::from_string(
            &context,
            ShaderType::Fragment,
            "#version 450\n#include \"missing.glsl\"\nvoid main() {}\n",
        );

        assert!(!shader.compile());
        assert_eq!(shader.info_log(), "include not found: \"missing.glsl\"");
        assert_eq!(driver.count_calls("glCompileShader"), 0);
    }

    fn register(context: &Context, name: &str, text: &str) {
        let source: Rc<dyn StringSource> = Rc::new(StaticStringSource::new(text));
        context
            .register_named_string(name, source)
            .expect("valid name");
    }

    const INCLUDING: &str = "#version 450
#include \"/lib/color.glsl\"
layout(location = 0) out vec4 o_color;
void main() {
    o_color = color();
}
";

    #[test]
    fn test_replaced_named_string_invalidates() {
        let (_driver, context) = setup();
        register(&context, "/lib/color.glsl", "vec4 color() { return vec4(1.0); }");
        let shader = Shader::from_string(&context, ShaderType::Fragment, INCLUDING);
        let plain = Shader::from_string(&context, ShaderType::Fragment, FRAGMENT);
        assert!(shader.compile());
        assert!(plain.compile());

        register(&context, "/lib/color.glsl", "vec4 color() { return vec4(0.5); }");
        assert_eq!(shader.state(), CompileState::Uncompiled);
        assert!(plain.is_compiled());

        assert!(shader.compile());
        assert!(shader.get_source().contains("vec4(0.5)"));
    }

    #[test]
    fn test_removed_named_string_invalidates() {
        let (_driver, context) = setup();
        register(&context, "/lib/color.glsl", "vec4 color() { return vec4(1.0); }");
        let shader = Shader::from_string(&context, ShaderType::Fragment, INCLUDING);
        assert!(shader.compile());

        assert!(context.unregister_named_string("/lib/color.glsl"));
        assert_eq!(shader.state(), CompileState::Uncompiled);
        assert!(!shader.compile());
        assert!(shader.info_log().contains("/lib/color.glsl"));

        register(&context, "/lib/color.glsl", "vec4 color() { return vec4(0.0); }");
        assert!(shader.compile());
    }

    #[test]
    fn test_dropped_shader_leaves_registry() {
        let (_driver, context) = setup();
        register(&context, "/lib/color.glsl", "vec4 color() { return vec4(1.0); }");
        let shader = Shader::from_string(&context, ShaderType::Fragment, INCLUDING);
        assert!(shader.compile());
        assert_eq!(context.named_strings_changeable().listener_count(), 1);

        drop(shader);
        assert_eq!(context.named_strings_changeable().listener_count(), 0);
    }

    #[test]
    fn test_include_path_change_keeps_source() {
        let (_driver, context) = setup();
        let source: Rc<dyn StringSource> = Rc::new(StaticStringSource::new(FRAGMENT));
        let shader = Shader::with_source(&context, ShaderType::Fragment, source.clone());
        assert!(shader.compile());

        shader.set_include_paths(vec!["/lib".to_string()]);

        assert_eq!(shader.state(), CompileState::Uncompiled);
        assert_eq!(shader.include_paths(), vec!["/lib".to_string()]);
        let current = shader.source().expect("source is set");
        assert!(Rc::ptr_eq(&current, &source));
    }

    #[test]
    fn test_type_string_and_queries() {
        let (_driver, context) = setup();
        let shader = Shader::new(&context, ShaderType::Vertex);
        assert_eq!(shader.type_string(), "GL_VERTEX_SHADER");
        assert_eq!(shader.get(gl::SHADER_TYPE), gl::VERTEX_SHADER as i32);
        assert!(!shader.check_compile_status());
    }

    #[test]
    fn test_drop_deletes_once() {
        let (driver, context) = setup();
        let shader = Shader::new(&context, ShaderType::Compute);
        let id = shader.id();
        drop(shader);

        assert!(!driver.shader_exists(id));
        assert_eq!(driver.count_calls("glDeleteShader"), 1);
    }
}
