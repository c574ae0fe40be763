use crate::observer::{Subscribers, SubscriptionId};
use crate::signal::SignalRef;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum LibraryEvent {
    Added(SignalRef),
    Removed(SignalRef),
}

impl LibraryEvent {
    pub fn signal(&self) -> &SignalRef {
        match self {
            LibraryEvent::Added(signal) | LibraryEvent::Removed(signal) => signal,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    #[error("signal index {index} out of range for a library of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Ordered signal collection. Membership is by identity; insertion order is
/// display order.
#[derive(Default)]
pub struct SignalLibrary {
    signals: RefCell<Vec<SignalRef>>,
    events: Subscribers<LibraryEvent>,
}

impl SignalLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `signal` and announces it. Returns `false` without notifying
    /// when that exact signal is already present.
    pub fn add(&self, signal: SignalRef) -> bool {
        if self.contains(&signal) {
            return false;
        }
        self.signals.borrow_mut().push(Rc::clone(&signal));
        self.events.emit(&LibraryEvent::Added(signal));
        true
    }

    /// Removes `signal` if present. Absent signals are ignored.
    pub fn remove(&self, signal: &SignalRef) -> bool {
        let removed = {
            let mut signals = self.signals.borrow_mut();
            match signals.iter().position(|member| Rc::ptr_eq(member, signal)) {
                Some(index) => signals.remove(index),
                None => return false,
            }
        };
        self.events.emit(&LibraryEvent::Removed(removed));
        true
    }

    pub fn get(&self, index: usize) -> Result<SignalRef, LibraryError> {
        let signals = self.signals.borrow();
        signals
            .get(index)
            .cloned()
            .ok_or(LibraryError::IndexOutOfRange {
                index,
                len: signals.len(),
            })
    }

    pub fn position(&self, signal: &SignalRef) -> Option<usize> {
        self.signals
            .borrow()
            .iter()
            .position(|member| Rc::ptr_eq(member, signal))
    }

    pub fn contains(&self, signal: &SignalRef) -> bool {
        self.position(signal).is_some()
    }

    pub fn len(&self) -> usize {
        self.signals.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.borrow().is_empty()
    }

    /// Snapshot of the current members in order.
    pub fn signals(&self) -> Vec<SignalRef> {
        self.signals.borrow().clone()
    }

    pub fn iter(&self) -> std::vec::IntoIter<SignalRef> {
        self.signals().into_iter()
    }

    pub fn subscribe(&self, listener: impl Fn(&LibraryEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }
}

impl fmt::Debug for SignalLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.signals.borrow().iter()).finish()
    }
}
