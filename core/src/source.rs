//! Providers of shader source text.
//!
//! A [`StringSource`] hands out its current text and owns a [`Changeable`]
//! that fires whenever that text changes. Consumers never poll for changes:
//! the source is the only authority on when its content is stale.
//!
//! - [`StaticStringSource`] - text set directly by the caller
//! - [`CompositeStringSource`] - concatenation of other sources, forwarding
//!   their change notifications

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::change::{ChangeListener, Changeable, ListenerId};

/// A provider of text that announces its own changes.
pub trait StringSource {
    /// The current text.
    fn string(&self) -> String;

    /// The changeable that fires whenever [`string`](Self::string) would
    /// return something different.
    fn changeable(&self) -> &Changeable;

    /// Short human readable description used in diagnostics.
    fn short_info(&self) -> String {
        String::from("<string>")
    }
}

/// A string source holding caller-provided text.
///
/// # Example
///
/// ```
/// use glimmer_core::source::{StaticStringSource, StringSource};
///
/// let source = StaticStringSource::new("#version 450\n");
/// source.set_string("#version 460\n");
/// assert_eq!(source.string(), "#version 460\n");
/// ```
#[derive(Default)]
pub struct StaticStringSource {
    text: RefCell<String>,
    changeable: Changeable,
}

impl StaticStringSource {
    /// Create a source with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: RefCell::new(text.into()),
            changeable: Changeable::new(),
        }
    }

    /// Replace the text and notify listeners.
    ///
    /// Listeners are notified even if the new text equals the old one.
    pub fn set_string(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
        self.changeable.changed();
    }
}

impl StringSource for StaticStringSource {
    fn string(&self) -> String {
        self.text.borrow().clone()
    }

    fn changeable(&self) -> &Changeable {
        &self.changeable
    }

    fn short_info(&self) -> String {
        let text = self.text.borrow();
        match text.lines().next() {
            Some(first) if text.lines().nth(1).is_some() => format!("{first} ..."),
            Some(first) => first.to_string(),
            None => String::from("<empty>"),
        }
    }
}

impl fmt::Debug for StaticStringSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticStringSource")
            .field("len", &self.text.borrow().len())
            .field("changeable", &self.changeable)
            .finish()
    }
}

/// A string source made of other sources, joined in order.
///
/// The composite listens to each of its parts and re-announces their changes,
/// so anything listening to the composite is invalidated transitively.
pub struct CompositeStringSource {
    parts: RefCell<Vec<(Rc<dyn StringSource>, ListenerId)>>,
    changeable: Changeable,
    self_ref: Weak<CompositeStringSource>,
}

impl CompositeStringSource {
    /// Create an empty composite.
    pub fn new() -> Rc<Self> {
        Self::with_parts(Vec::new())
    }

    /// Create a composite from the given parts.
    pub fn with_parts(parts: Vec<Rc<dyn StringSource>>) -> Rc<Self> {
        let composite = Rc::new_cyclic(|self_ref| Self {
            parts: RefCell::new(Vec::new()),
            changeable: Changeable::new(),
            self_ref: self_ref.clone(),
        });
        for part in parts {
            composite.attach(part);
        }
        composite
    }

    /// Append a part and notify listeners.
    pub fn append(&self, part: Rc<dyn StringSource>) {
        self.attach(part);
        self.changeable.changed();
    }

    /// Remove every part equal (by pointer) to `part`.
    ///
    /// Returns false if `part` was not present.
    pub fn remove(&self, part: &Rc<dyn StringSource>) -> bool {
        let removed: Vec<_> = {
            let mut parts = self.parts.borrow_mut();
            let (removed, kept) = parts
                .drain(..)
                .partition(|(existing, _)| Rc::ptr_eq(existing, part));
            *parts = kept;
            removed
        };
        for (source, id) in &removed {
            source.changeable().deregister_listener(*id);
        }
        if removed.is_empty() {
            return false;
        }
        self.changeable.changed();
        true
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.borrow().len()
    }

    /// Returns true if the composite has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.borrow().is_empty()
    }

    fn attach(&self, part: Rc<dyn StringSource>) {
        let listener: Weak<dyn ChangeListener> = self.self_ref.clone();
        let id = part.changeable().register_listener(listener);
        self.parts.borrow_mut().push((part, id));
    }
}

impl StringSource for CompositeStringSource {
    fn string(&self) -> String {
        self.parts
            .borrow()
            .iter()
            .map(|(part, _)| part.string())
            .collect()
    }

    fn changeable(&self) -> &Changeable {
        &self.changeable
    }

    fn short_info(&self) -> String {
        let infos: Vec<String> = self
            .parts
            .borrow()
            .iter()
            .map(|(part, _)| part.short_info())
            .collect();
        format!("composite [{}]", infos.join(", "))
    }
}

impl ChangeListener for CompositeStringSource {
    fn notify_changed(&self, _sender: &Changeable) {
        self.changeable.changed();
    }
}

impl Drop for CompositeStringSource {
    fn drop(&mut self) {
        for (part, id) in self.parts.get_mut().drain(..) {
            part.changeable().deregister_listener(id);
        }
    }
}

impl fmt::Debug for CompositeStringSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeStringSource")
            .field("parts", &self.len())
            .field("changeable", &self.changeable)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Recorder {
        count: Cell<u32>,
    }

    impl ChangeListener for Recorder {
        fn notify_changed(&self, _sender: &Changeable) {
            self.count.set(self.count.get() + 1);
        }
    }

    fn listen(source: &dyn StringSource) -> Rc<Recorder> {
        let recorder = Rc::new(Recorder::default());
        let listener: Rc<dyn ChangeListener> = recorder.clone();
        source.changeable().register_listener(Rc::downgrade(&listener));
        recorder
    }

    #[test]
    fn test_static_source_notifies() {
        let source = StaticStringSource::new("a");
        let recorder = listen(&source);

        source.set_string("b");
        assert_eq!(source.string(), "b");
        assert_eq!(recorder.count.get(), 1);
    }

    #[test]
    fn test_static_short_info() {
        assert_eq!(StaticStringSource::new("").short_info(), "<empty>");
        assert_eq!(StaticStringSource::new("one").short_info(), "one");
        assert_eq!(StaticStringSource::new("one\ntwo").short_info(), "one ...");
    }

    #[test]
    fn test_composite_concatenates() {
        let a: Rc<dyn StringSource> = Rc::new(StaticStringSource::new("void "));
        let b: Rc<dyn StringSource> = Rc::new(StaticStringSource::new("main() {}"));
        let composite = CompositeStringSource::with_parts(vec![a, b]);

        assert_eq!(composite.string(), "void main() {}");
        assert_eq!(composite.len(), 2);
    }

    #[test]
    fn test_composite_forwards_part_changes() {
        let part = Rc::new(StaticStringSource::new("x"));
        let dyn_part: Rc<dyn StringSource> = part.clone();
        let composite = CompositeStringSource::with_parts(vec![dyn_part]);
        let recorder = listen(composite.as_ref());

        part.set_string("y");

        assert_eq!(recorder.count.get(), 1);
        assert_eq!(composite.string(), "y");
    }

    #[test]
    fn test_composite_remove_stops_forwarding() {
        let part = Rc::new(StaticStringSource::new("x"));
        let dyn_part: Rc<dyn StringSource> = part.clone();
        let composite = CompositeStringSource::with_parts(vec![dyn_part.clone()]);
        let recorder = listen(composite.as_ref());

        assert!(composite.remove(&dyn_part));
        assert_eq!(recorder.count.get(), 1);
        assert!(composite.is_empty());
        assert_eq!(part.changeable().listener_count(), 0);

        part.set_string("y");
        assert_eq!(recorder.count.get(), 1);
        assert!(!composite.remove(&dyn_part));
    }

    #[test]
    fn test_composite_drop_deregisters() {
        let part = Rc::new(StaticStringSource::new("x"));
        {
            let dyn_part: Rc<dyn StringSource> = part.clone();
            let _composite = CompositeStringSource::with_parts(vec![dyn_part]);
            assert_eq!(part.changeable().listener_count(), 1);
        }
        assert_eq!(part.changeable().listener_count(), 0);
    }
}
