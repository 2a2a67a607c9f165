//! Common utilities for object integration tests.

#![allow(dead_code)]

use std::rc::Rc;

use glimmer_objects::{Context, ContextConfig, DummyDriver};

pub const VERTEX_SOURCE: &str = "#version 450
layout(location = 0) in vec3 a_position;
void main() {
    gl_Position = vec4(a_position, 1.0);
}
";

pub const FRAGMENT_SOURCE: &str = "#version 450
layout(location = 0) out vec4 o_color;
void main() {
    o_color = vec4(1.0, 0.5, 0.25, 1.0);
}
";

/// Fragment shader split into a header and a body, for composite sources.
pub const FRAGMENT_HEADER: &str = "#version 450
layout(location = 0) out vec4 o_color;
";

pub const FRAGMENT_BODY: &str = "void main() {
    o_color = vec4(0.0, 1.0, 0.0, 1.0);
}
";

/// Test harness with a dummy driver and a context on top of it.
pub struct TestContext {
    pub driver: DummyDriver,
    pub context: Rc<Context>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(ContextConfig::default())
    }

    pub fn with_config(config: ContextConfig) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let driver = DummyDriver::new();
        let context = Context::with_config(driver.clone(), config);
        Self { driver, context }
    }

    /// Panic if any diagnostic was reported.
    pub fn assert_clean(&self) {
        let diagnostics = self.context.diagnostics();
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    }
}
