//! Program wrapper.
//!
//! A program observes its attached shaders. When any of them leaves the
//! compiled state the program is no longer linked, and it forwards that as a
//! notification of its own.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use glimmer_core::{ChangeListener, Changeable, ListenerId};

use crate::context::Context;
use crate::driver::Handle;
use crate::error::Diagnostic;
use crate::gl;
use crate::object::{Object, ObjectBase, ObjectKind, ObjectVisitor, Ownership};
use crate::shader::Shader;

/// A program object.
pub struct Program {
    base: ObjectBase,
    shaders: RefCell<Vec<(Rc<Shader>, ListenerId)>>,
    linked: Cell<bool>,
    changeable: Changeable,
    self_ref: Weak<Program>,
}

impl Program {
    /// Create an empty program.
    pub fn new(context: &Rc<Context>) -> Rc<Self> {
        let id = context.call("glCreateProgram", |d| d.create_program());
        Self::with_ownership(context, id, Ownership::Owned)
    }

    /// Wrap an existing program without taking ownership.
    pub fn from_id(context: &Rc<Context>, id: Handle) -> Rc<Self> {
        Self::with_ownership(context, id, Ownership::Borrowed)
    }

    /// Wrap an existing program.
    pub fn with_ownership(context: &Rc<Context>, id: Handle, ownership: Ownership) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            base: ObjectBase::new(context, ObjectKind::Program, id, ownership),
            shaders: RefCell::new(Vec::new()),
            linked: Cell::new(false),
            changeable: Changeable::new(),
            self_ref: self_ref.clone(),
        })
    }

    /// Create a program with the given shaders attached.
    pub fn with_shaders(context: &Rc<Context>, shaders: &[Rc<Shader>]) -> Rc<Self> {
        let program = Self::new(context);
        for shader in shaders {
            program.attach(shader);
        }
        program
    }

    fn ctx(&self) -> &Context {
        self.base.context()
    }

    // ---- Attachments ---------------------------------------------------

    /// Attach a shader. Attaching the same shader twice does nothing.
    pub fn attach(&self, shader: &Rc<Shader>) {
        if self.is_attached(shader) {
            return;
        }
        let listener: Weak<dyn ChangeListener> = self.self_ref.clone();
        let listener_id = shader.changeable().register_listener(listener);
        self.shaders
            .borrow_mut()
            .push((Rc::clone(shader), listener_id));

        let (program, id) = (self.id(), shader.id());
        self.ctx()
            .call("glAttachShader", |d| d.attach_shader(program, id));
        self.invalidate();
    }

    /// Detach a shader. Returns false if it was not attached.
    pub fn detach(&self, shader: &Rc<Shader>) -> bool {
        let removed = {
            let mut shaders = self.shaders.borrow_mut();
            let index = shaders
                .iter()
                .position(|(attached, _)| Rc::ptr_eq(attached, shader));
            index.map(|index| shaders.remove(index))
        };
        let Some((shader, listener_id)) = removed else {
            return false;
        };
        shader.changeable().deregister_listener(listener_id);

        let (program, id) = (self.id(), shader.id());
        self.ctx()
            .call("glDetachShader", |d| d.detach_shader(program, id));
        self.invalidate();
        true
    }

    /// Returns true if `shader` is attached.
    pub fn is_attached(&self, shader: &Rc<Shader>) -> bool {
        self.shaders
            .borrow()
            .iter()
            .any(|(attached, _)| Rc::ptr_eq(attached, shader))
    }

    /// The attached shaders, in attachment order.
    pub fn attached_shaders(&self) -> Vec<Rc<Shader>> {
        self.shaders
            .borrow()
            .iter()
            .map(|(shader, _)| Rc::clone(shader))
            .collect()
    }

    // ---- Linking -------------------------------------------------------

    /// Compile the attached shaders as needed and link.
    ///
    /// Returns true if the program is linked. If any shader fails to compile
    /// the link is not attempted.
    pub fn link(&self) -> bool {
        if self.linked.get() {
            return true;
        }

        let shaders = self.attached_shaders();
        if !shaders.iter().all(|shader| shader.compile()) {
            log::warn!("Program {} not linked: a shader failed to compile", self.id());
            return false;
        }

        let id = self.id();
        self.ctx().call("glLinkProgram", |d| d.link_program(id));
        if self.check_link_status() {
            log::debug!("Linked program {} ({} shaders)", id, shaders.len());
            self.linked.set(true);
            true
        } else {
            self.ctx().report(Diagnostic::Link {
                program: id,
                info_log: self.info_log(),
            });
            false
        }
    }

    /// Returns true if the program is linked.
    pub fn is_linked(&self) -> bool {
        self.linked.get()
    }

    /// Ask the driver whether the last link succeeded.
    pub fn check_link_status(&self) -> bool {
        self.get(gl::LINK_STATUS) == gl::TRUE
    }

    /// The info log of the last link.
    pub fn info_log(&self) -> String {
        let id = self.id();
        self.ctx()
            .call("glGetProgramInfoLog", |d| d.get_program_info_log(id))
    }

    /// Query a program parameter.
    pub fn get(&self, pname: u32) -> i32 {
        let id = self.id();
        self.ctx()
            .call("glGetProgramiv", |d| d.get_program_i(id, pname))
    }

    /// Link if needed and make this the current program.
    pub fn use_program(&self) -> bool {
        if !self.link() {
            return false;
        }
        let id = self.id();
        self.ctx().call("glUseProgram", |d| d.use_program(id));
        true
    }

    /// Make no program current.
    pub fn release(&self) {
        self.ctx().call("glUseProgram", |d| d.use_program(0));
    }

    /// Mark the program as not linked and notify listeners.
    ///
    /// Does nothing if not linked.
    pub fn invalidate(&self) {
        if !self.linked.replace(false) {
            return;
        }
        log::trace!("Invalidated program {}", self.id());
        self.changeable.changed();
    }

    /// Notified whenever the program stops being linked.
    pub fn changeable(&self) -> &Changeable {
        &self.changeable
    }
}

impl ChangeListener for Program {
    fn notify_changed(&self, _sender: &Changeable) {
        self.invalidate();
    }
}

impl Object for Program {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn accept(&self, visitor: &mut dyn ObjectVisitor) {
        visitor.visit_program(self);
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        for (shader, listener_id) in self.shaders.get_mut().drain(..) {
            shader.changeable().deregister_listener(listener_id);
        }
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("id", &self.id())
            .field("shaders", &self.shaders.borrow().len())
            .field("linked", &self.linked.get())
            .finish_non_exhaustive()
    }
}

// Programs are bound to the thread of their context
static_assertions::assert_not_impl_any!(Program: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DummyDriver;
    use crate::types::ShaderType;

    const VERTEX: &str = "#version 450
layout(location = 0) in vec3 a_position;
void main() {
    gl_Position = vec4(a_position, 1.0);
}
";

    const FRAGMENT: &str = "#version 450
layout(location = 0) out vec4 o_color;
void main() {
    o_color = vec4(1.0);
}
";

    fn setup() -> (DummyDriver, Rc<Context>) {
        let driver = DummyDriver::new();
        let context = Context::new(driver.clone());
        (driver, context)
    }

    #[test]
    fn test_link_compiles_shaders() {
        let (driver, context) = setup();
        let vertex = Shader::from_string(&context, ShaderType::Vertex, VERTEX);
        let fragment = Shader::from_string(&context, ShaderType::Fragment, FRAGMENT);
        let program = Program::with_shaders(&context, &[vertex.clone(), fragment.clone()]);

        assert!(program.use_program());
        assert!(vertex.is_compiled());
        assert!(fragment.is_compiled());
        assert_eq!(driver.current_program(), program.id());
        assert_eq!(program.get(gl::ATTACHED_SHADERS), 2);

        assert!(program.link());
        assert_eq!(driver.count_calls("glLinkProgram"), 1);

        program.release();
        assert_eq!(driver.current_program(), 0);
    }

    #[test]
    fn test_link_skipped_when_shader_fails() {
        let (driver, context) = setup();
        let broken = Shader::from_string(&context, ShaderType::Fragment, "");
        let program = Program::with_shaders(&context, &[broken]);

        assert!(!program.link());
        assert_eq!(driver.count_calls("glLinkProgram"), 0);
        assert!(!program.use_program());
    }

    #[test]
    fn test_link_failure_reports_diagnostic() {
        let (_driver, context) = setup();
        let program = Program::new(&context);

        assert!(!program.link());
        assert!(!program.info_log().is_empty());
        assert!(matches!(
            context.last_diagnostic(),
            Some(Diagnostic::Link { program: id, .. }) if id == program.id()
        ));
    }

    #[test]
    fn test_shader_invalidation_unlinks() {
        let (_driver, context) = setup();
        let vertex = Shader::from_string(&context, ShaderType::Vertex, VERTEX);
        let program = Program::with_shaders(&context, &[vertex.clone()]);
        assert!(program.link());

        vertex.invalidate();
        assert!(!program.is_linked());

        assert!(program.link());
        assert!(vertex.is_compiled());
    }

    #[test]
    fn test_attach_detach() {
        let (_driver, context) = setup();
        let vertex = Shader::from_string(&context, ShaderType::Vertex, VERTEX);
        let program = Program::new(&context);

        program.attach(&vertex);
        program.attach(&vertex);
        assert_eq!(program.attached_shaders().len(), 1);
        assert_eq!(vertex.changeable().listener_count(), 1);

        assert!(program.detach(&vertex));
        assert!(!program.detach(&vertex));
        assert_eq!(vertex.changeable().listener_count(), 0);
        assert!(context.diagnostics().is_empty());
    }
}
