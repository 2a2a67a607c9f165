//! Push-based change notification.
//!
//! A [`Changeable`] keeps a list of weakly referenced [`ChangeListener`]s and
//! invokes them synchronously whenever its owner reports a change. Listeners
//! are identified by the [`ListenerId`] returned at registration so they can
//! deregister later.
//!
//! Everything here is single-threaded: listeners are held as
//! `Weak<dyn ChangeListener>` and dispatch happens on the caller's stack.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use glimmer_core::change::{ChangeListener, Changeable};
//!
//! struct Counter(Cell<u32>);
//!
//! impl ChangeListener for Counter {
//!     fn notify_changed(&self, _sender: &Changeable) {
//!         self.0.set(self.0.get() + 1);
//!     }
//! }
//!
//! let changeable = Changeable::new();
//! let counter = Rc::new(Counter(Cell::new(0)));
//! let listener: Rc<dyn ChangeListener> = counter.clone();
//! changeable.register_listener(Rc::downgrade(&listener));
//!
//! changeable.changed();
//! assert_eq!(counter.0.get(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Weak;

/// Receiver of change notifications.
pub trait ChangeListener {
    /// Called synchronously when `sender` reports a change.
    ///
    /// Listeners observing several changeables can tell them apart with
    /// [`Changeable::is_same`].
    fn notify_changed(&self, sender: &Changeable);
}

/// Identifies a registered listener within one [`Changeable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// A source of change notifications.
#[derive(Default)]
pub struct Changeable {
    listeners: RefCell<Vec<(ListenerId, Weak<dyn ChangeListener>)>>,
    next_id: Cell<u64>,
}

impl Changeable {
    /// Create a changeable with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener and return its id.
    ///
    /// The same listener may be registered more than once; it is then notified
    /// once per registration.
    pub fn register_listener(&self, listener: Weak<dyn ChangeListener>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Remove a listener. Returns false if the id is unknown.
    pub fn deregister_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Notify every live listener.
    ///
    /// The listener list is snapshotted first, so listeners may register or
    /// deregister (on this or any other changeable) from inside the callback.
    /// Listeners that have been dropped are pruned.
    pub fn changed(&self) {
        let snapshot: Vec<_> = {
            let mut listeners = self.listeners.borrow_mut();
            let before = listeners.len();
            listeners.retain(|(_, listener)| listener.strong_count() > 0);
            if listeners.len() != before {
                log::trace!("Pruned {} dropped listeners", before - listeners.len());
            }
            listeners.iter().map(|(_, l)| l.clone()).collect()
        };

        for listener in snapshot {
            if let Some(listener) = listener.upgrade() {
                listener.notify_changed(self);
            }
        }
    }

    /// Number of registered listeners that are still alive.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, l)| l.strong_count() > 0)
            .count()
    }

    /// Returns true if `other` is this very changeable.
    pub fn is_same(&self, other: &Changeable) -> bool {
        std::ptr::eq(self, other)
    }
}

impl fmt::Debug for Changeable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Changeable")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        count: Cell<u32>,
    }

    impl ChangeListener for Recorder {
        fn notify_changed(&self, _sender: &Changeable) {
            self.count.set(self.count.get() + 1);
        }
    }

    fn register(changeable: &Changeable, recorder: &Rc<Recorder>) -> ListenerId {
        let listener: Rc<dyn ChangeListener> = recorder.clone();
        changeable.register_listener(Rc::downgrade(&listener))
    }

    #[test]
    fn test_notify_all_listeners() {
        let changeable = Changeable::new();
        let a = Rc::new(Recorder::default());
        let b = Rc::new(Recorder::default());
        register(&changeable, &a);
        register(&changeable, &b);

        changeable.changed();
        changeable.changed();

        assert_eq!(a.count.get(), 2);
        assert_eq!(b.count.get(), 2);
    }

    #[test]
    fn test_deregister() {
        let changeable = Changeable::new();
        let recorder = Rc::new(Recorder::default());
        let id = register(&changeable, &recorder);

        assert!(changeable.deregister_listener(id));
        assert!(!changeable.deregister_listener(id));

        changeable.changed();
        assert_eq!(recorder.count.get(), 0);
        assert_eq!(changeable.listener_count(), 0);
    }

    #[test]
    fn test_dropped_listener_pruned() {
        let changeable = Changeable::new();
        {
            let recorder = Rc::new(Recorder::default());
            register(&changeable, &recorder);
            assert_eq!(changeable.listener_count(), 1);
        }
        assert_eq!(changeable.listener_count(), 0);
        changeable.changed();
        assert!(changeable.listeners.borrow().is_empty());
    }

    struct SelfRemoving {
        target: Rc<Changeable>,
        id: Cell<Option<ListenerId>>,
        count: Cell<u32>,
    }

    impl ChangeListener for SelfRemoving {
        fn notify_changed(&self, sender: &Changeable) {
            assert!(sender.is_same(&self.target));
            self.count.set(self.count.get() + 1);
            if let Some(id) = self.id.take() {
                self.target.deregister_listener(id);
            }
        }
    }

    #[test]
    fn test_deregister_during_dispatch() {
        let changeable = Rc::new(Changeable::new());
        let listener = Rc::new(SelfRemoving {
            target: changeable.clone(),
            id: Cell::new(None),
            count: Cell::new(0),
        });
        let dyn_listener: Rc<dyn ChangeListener> = listener.clone();
        let id = changeable.register_listener(Rc::downgrade(&dyn_listener));
        listener.id.set(Some(id));

        changeable.changed();
        changeable.changed();

        assert_eq!(listener.count.get(), 1);
    }

    #[test]
    fn test_is_same() {
        let a = Changeable::new();
        let b = Changeable::new();
        assert!(a.is_same(&a));
        assert!(!a.is_same(&b));
    }
}
