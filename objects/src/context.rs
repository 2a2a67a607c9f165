//! Driver context.
//!
//! The [`Context`] owns the [`Driver`] and is the only path wrappers use to
//! reach it. [`Context::call`] issues one driver call and immediately queries
//! the error register, so the check always sees the error of the call it
//! guards. Failures are logged and retained as [`Diagnostic`]s.

use std::cell::{OnceCell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use glimmer_core::{Changeable, StringSource, Version};

use crate::driver::Driver;
use crate::error::{Diagnostic, GlError, IncludeError};
use crate::gl;
use crate::object::ObjectKind;
use crate::types::BufferTarget;

/// Context configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    /// Query the error register after every driver call.
    pub check_errors: bool,
    /// Number of diagnostics retained; the oldest are dropped first.
    pub max_diagnostics: usize,
    /// Binding point used by buffer data calls.
    pub buffer_working_target: BufferTarget,
    /// Debug label used in log messages.
    pub label: Option<String>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            check_errors: true,
            max_diagnostics: 256,
            buffer_working_target: BufferTarget::CopyWrite,
            label: None,
        }
    }
}

impl ContextConfig {
    /// Enable or disable error checking.
    pub fn with_check_errors(mut self, check_errors: bool) -> Self {
        self.check_errors = check_errors;
        self
    }

    /// Set the number of retained diagnostics.
    pub fn with_max_diagnostics(mut self, max_diagnostics: usize) -> Self {
        self.max_diagnostics = max_diagnostics;
        self
    }

    /// Set the buffer working target.
    pub fn with_buffer_working_target(mut self, target: BufferTarget) -> Self {
        self.buffer_working_target = target;
        self
    }

    /// Set the debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A driver context.
///
/// Wrappers hold an `Rc<Context>`, which keeps the context alive for as long
/// as any wrapper exists.
///
/// # Example
///
/// ```
/// use glimmer_objects::{Context, DummyDriver, Texture};
///
/// let context = Context::new(DummyDriver::new());
/// let texture = Texture::new(&context);
/// texture.bind();
/// assert!(context.diagnostics().is_empty());
/// ```
pub struct Context {
    driver: Box<dyn Driver>,
    config: ContextConfig,
    version: OnceCell<Version>,
    diagnostics: RefCell<VecDeque<Diagnostic>>,
    named_strings: RefCell<HashMap<String, Rc<dyn StringSource>>>,
    named_strings_changed: Changeable,
    live_objects: RefCell<HashMap<ObjectKind, usize>>,
}

impl Context {
    /// Create a context with the default configuration.
    pub fn new(driver: impl Driver + 'static) -> Rc<Self> {
        Self::with_config(driver, ContextConfig::default())
    }

    /// Create a context with the given configuration.
    pub fn with_config(driver: impl Driver + 'static, config: ContextConfig) -> Rc<Self> {
        log::info!(
            "Created context {:?} on {} driver (error checking: {})",
            config.label.as_deref().unwrap_or("<unnamed>"),
            driver.name(),
            config.check_errors
        );
        Rc::new(Self {
            driver: Box::new(driver),
            config,
            version: OnceCell::new(),
            diagnostics: RefCell::new(VecDeque::new()),
            named_strings: RefCell::new(HashMap::new()),
            named_strings_changed: Changeable::new(),
            live_objects: RefCell::new(HashMap::new()),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Get the driver name.
    pub fn driver_name(&self) -> &'static str {
        self.driver.name()
    }

    /// Issue one driver call, then check the error register.
    ///
    /// `name` is the driver entry point, used in the diagnostic if the call
    /// fails. The closure must issue exactly one driver call.
    pub fn call<R>(&self, name: &'static str, f: impl FnOnce(&dyn Driver) -> R) -> R {
        let result = f(self.driver.as_ref());
        self.check_error(name);
        result
    }

    /// Query the error register and report a pending error against `call`.
    ///
    /// Does nothing when error checking is disabled.
    pub fn check_error(&self, call: &'static str) -> Option<GlError> {
        if !self.config.check_errors {
            return None;
        }
        let error = GlError::from_code(self.driver.get_error())?;
        self.report(Diagnostic::DriverCall { call, error });
        Some(error)
    }

    /// Log a diagnostic and retain it.
    pub fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::DriverCall { .. } => log::error!("{}", diagnostic),
            Diagnostic::Compilation { .. } | Diagnostic::Link { .. } => {
                log::warn!("{}", diagnostic)
            }
        }

        let max = self.config.max_diagnostics;
        if max == 0 {
            return;
        }
        let mut diagnostics = self.diagnostics.borrow_mut();
        while diagnostics.len() >= max {
            diagnostics.pop_front();
        }
        diagnostics.push_back(diagnostic);
    }

    /// Retained diagnostics, oldest first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().iter().cloned().collect()
    }

    /// Remove and return the retained diagnostics.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow_mut().drain(..).collect()
    }

    /// The most recent diagnostic.
    pub fn last_diagnostic(&self) -> Option<Diagnostic> {
        self.diagnostics.borrow().back().cloned()
    }

    /// The driver's API version, queried once and cached.
    pub fn version(&self) -> Version {
        *self.version.get_or_init(|| {
            let major = self.call("glGetIntegerv", |d| d.get_integer(gl::MAJOR_VERSION));
            let minor = self.call("glGetIntegerv", |d| d.get_integer(gl::MINOR_VERSION));
            let version = Version::new(major, minor);
            if !version.is_valid() {
                log::warn!(
                    "Driver reports unknown version {}, nearest known is {}",
                    version,
                    version.nearest_valid_version()
                );
            }
            version
        })
    }

    // ---- Named strings -------------------------------------------------

    /// Register a string that shader sources can `#include`.
    ///
    /// Names must start with `/`. Registering an existing name replaces it.
    /// Shaders that resolve includes are invalidated either way, since the
    /// new name may change what their includes resolve to.
    pub fn register_named_string(
        &self,
        name: impl Into<String>,
        source: Rc<dyn StringSource>,
    ) -> Result<(), IncludeError> {
        let name = name.into();
        if !name.starts_with('/') || name.ends_with('/') {
            return Err(IncludeError::InvalidName(name));
        }
        log::debug!("Registered named string {}", name);
        self.named_strings.borrow_mut().insert(name, source);
        self.named_strings_changed.changed();
        Ok(())
    }

    /// Remove a named string. Returns false if it was not registered.
    ///
    /// Shaders that resolve includes are invalidated.
    pub fn unregister_named_string(&self, name: &str) -> bool {
        let removed = self.named_strings.borrow_mut().remove(name).is_some();
        if removed {
            self.named_strings_changed.changed();
        }
        removed
    }

    /// Notified whenever a named string is registered, replaced or removed.
    pub fn named_strings_changeable(&self) -> &Changeable {
        &self.named_strings_changed
    }

    /// Look up a named string.
    pub fn named_string(&self, name: &str) -> Option<Rc<dyn StringSource>> {
        self.named_strings.borrow().get(name).cloned()
    }

    /// Returns true if a named string is registered under `name`.
    pub fn has_named_string(&self, name: &str) -> bool {
        self.named_strings.borrow().contains_key(name)
    }

    // ---- Object tracking -----------------------------------------------

    /// Number of live wrappers of the given kind.
    pub fn live_objects(&self, kind: ObjectKind) -> usize {
        self.live_objects.borrow().get(&kind).copied().unwrap_or(0)
    }

    pub(crate) fn object_created(&self, kind: ObjectKind) {
        *self.live_objects.borrow_mut().entry(kind).or_insert(0) += 1;
    }

    pub(crate) fn object_destroyed(&self, kind: ObjectKind) {
        if let Some(count) = self.live_objects.borrow_mut().get_mut(&kind) {
            *count = count.saturating_sub(1);
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("driver", &self.driver.name())
            .field("config", &self.config)
            .field("diagnostics", &self.diagnostics.borrow().len())
            .finish_non_exhaustive()
    }
}

// Contexts are bound to the thread that owns the driver
static_assertions::assert_not_impl_any!(Context: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DummyDriver;
    use glimmer_core::StaticStringSource;

    #[test]
    fn test_call_checks_error() {
        let driver = DummyDriver::new();
        let context = Context::new(driver.clone());

        context.call("glBindTexture", |d| d.bind_texture(0xDEAD, 0));

        assert_eq!(
            context.last_diagnostic(),
            Some(Diagnostic::DriverCall {
                call: "glBindTexture",
                error: GlError::InvalidEnum,
            })
        );
        assert_eq!(driver.call_names(), vec!["glBindTexture", "glGetError"]);
    }

    #[test]
    fn test_error_checking_disabled() {
        let driver = DummyDriver::new();
        let context =
            Context::with_config(driver.clone(), ContextConfig::default().with_check_errors(false));

        context.call("glBindTexture", |d| d.bind_texture(0xDEAD, 0));

        assert!(context.diagnostics().is_empty());
        assert_eq!(driver.count_calls("glGetError"), 0);
    }

    #[test]
    fn test_diagnostics_are_bounded() {
        let driver = DummyDriver::new();
        let context =
            Context::with_config(driver.clone(), ContextConfig::default().with_max_diagnostics(2));

        for _ in 0..3 {
            driver.inject_error(gl::OUT_OF_MEMORY);
            context.check_error("glBufferData");
        }
        driver.inject_error(gl::INVALID_VALUE);
        context.check_error("glBufferSubData");

        let diagnostics = context.take_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].driver_error(), Some(GlError::InvalidValue));
        assert!(context.diagnostics().is_empty());
    }

    #[test]
    fn test_version_is_cached() {
        let driver = DummyDriver::with_version(4, 3);
        let context = Context::new(driver.clone());

        assert_eq!(context.version(), Version::new(4, 3));
        assert_eq!(context.version(), Version::new(4, 3));
        assert_eq!(driver.count_calls("glGetIntegerv"), 2);
    }

    #[test]
    fn test_named_string_names() {
        let context = Context::new(DummyDriver::new());
        let source: Rc<dyn StringSource> = Rc::new(StaticStringSource::new("float x;"));

        assert!(context
            .register_named_string("/lib/x.glsl", source.clone())
            .is_ok());
        assert_eq!(
            context.register_named_string("lib/x.glsl", source),
            Err(IncludeError::InvalidName("lib/x.glsl".into()))
        );
        assert!(context.has_named_string("/lib/x.glsl"));
        assert!(context.unregister_named_string("/lib/x.glsl"));
        assert!(context.named_string("/lib/x.glsl").is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ContextConfig::default()
            .with_label("main")
            .with_buffer_working_target(BufferTarget::Array);
        assert_eq!(config.label.as_deref(), Some("main"));
        assert_eq!(config.buffer_working_target, BufferTarget::Array);
        assert!(config.check_errors);
        assert_eq!(config.max_diagnostics, 256);
    }
}
