#![forbid(unsafe_code)]

//! Scoped event listeners.
//!
//! A [`ListenerSet`] holds callbacks for one event type. Subscribing returns
//! a [`ListenerGuard`]; the callback stays registered for exactly as long as
//! the guard lives. Dropping the guard (or calling [`ListenerGuard::detach`])
//! removes it, so a container that is torn down cannot leak a listener on the
//! element it was watching.
//!
//! # Re-entrancy
//!
//! [`ListenerSet::emit`] snapshots the registered callbacks before invoking
//! them, so a callback may subscribe or drop guards while being called. A
//! callback that emits on the same set recursively is skipped for the nested
//! emission rather than panicking on a double borrow.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Identifier of a registered listener, unique within its set.
pub type ListenerId = u64;

type Callback<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Registry<E> {
    next_id: ListenerId,
    entries: Vec<(ListenerId, Callback<E>)>,
}

impl<E> Registry<E> {
    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }
}

/// A set of callbacks for events of type `E`.
///
/// Single-threaded: the set and its guards are `!Send`.
pub struct ListenerSet<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E: 'static> ListenerSet<E> {
    /// Create an empty listener set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a callback. It is removed when the returned guard is dropped.
    #[must_use = "dropping the guard immediately detaches the listener"]
    pub fn subscribe(&self, callback: impl FnMut(&E) + 'static) -> ListenerGuard {
        let callback: Callback<E> = Rc::new(RefCell::new(callback));
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, callback));
            id
        };

        let weak: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.registry);
        ListenerGuard {
            id,
            detach: Some(Box::new(move || {
                weak.upgrade()
                    .is_some_and(|registry| registry.borrow_mut().remove(id))
            })),
        }
    }

    /// Invoke every registered callback with `event`.
    ///
    /// Returns the number of callbacks that ran.
    pub fn emit(&self, event: &E) -> usize {
        let snapshot: Vec<Callback<E>> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();

        let mut ran = 0;
        for callback in snapshot {
            if let Ok(mut cb) = callback.try_borrow_mut() {
                (&mut *cb)(event);
                ran += 1;
            }
        }
        ran
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Check if no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: 'static> Default for ListenerSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for ListenerSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.registry.borrow().entries.len())
            .finish()
    }
}

/// Keeps a listener registered. Detaches it on drop.
pub struct ListenerGuard {
    id: ListenerId,
    detach: Option<Box<dyn FnOnce() -> bool>>,
}

impl ListenerGuard {
    /// The listener's id within its set.
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Detach now.
    ///
    /// Returns `false` if the listener set was already gone.
    pub fn detach(mut self) -> bool {
        self.detach.take().is_some_and(|detach| detach())
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("id", &self.id)
            .field("attached", &self.detach.is_some())
            .finish()
    }
}
