use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

pub type SubscriptionId = usize;
pub type Listener<E> = Rc<dyn Fn(&E)>;

/// Synchronous listener registry.
///
/// Listeners run on the emitting thread in subscription order. `emit` walks a
/// snapshot, so a listener may subscribe or unsubscribe while being called.
pub struct Subscribers<E> {
    listeners: RefCell<Vec<(SubscriptionId, Listener<E>)>>,
    next_id: Cell<SubscriptionId>,
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.len())
            .finish()
    }
}
