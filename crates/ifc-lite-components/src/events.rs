// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-channel observer lists
//!
//! Handlers run synchronously, in subscription order, inside the call that
//! triggers them.

use ifc_lite_fragments::FragmentIdMap;
use std::fmt;

/// Handle returned by [`Event::add`], used to unsubscribe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered list of handlers for one kind of notification
pub struct Event<T> {
    handlers: Vec<(SubscriptionId, Box<dyn FnMut(&T)>)>,
    next_id: u64,
}

impl<T> Default for Event<T> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl<T> Event<T> {
    /// Create an event with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler
    pub fn add(&mut self, handler: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Unsubscribe a handler; returns false if it was not subscribed
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    /// Deliver a value to every handler
    pub fn trigger(&mut self, value: &T) {
        for (_, handler) in &mut self.handlers {
            handler(value);
        }
    }

    /// Drop every handler
    pub fn reset(&mut self) {
        self.handlers.clear();
    }

    /// Check if no handler is subscribed
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Notifications of one highlight channel
#[derive(Debug, Default)]
pub struct HighlightEvents {
    /// Fired with the channel's whole selection after it changes
    pub on_highlight: Event<FragmentIdMap>,
    /// Fired when the channel is cleared
    pub on_clear: Event<()>,
    /// Fired after a double-click selection lands in the channel
    pub on_double_click: Event<()>,
}

impl HighlightEvents {
    /// Drop every handler of every notification
    pub fn reset(&mut self) {
        self.on_highlight.reset();
        self.on_clear.reset();
        self.on_double_click.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_delivery_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut event = Event::<u32>::new();

        let first = Rc::clone(&log);
        event.add(move |v| first.borrow_mut().push(("first", *v)));
        let second = Rc::clone(&log);
        event.add(move |v| second.borrow_mut().push(("second", *v)));

        event.trigger(&7);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut event = Event::<()>::new();
        let c = Rc::clone(&count);
        let id = event.add(move |_| *c.borrow_mut() += 1);

        event.trigger(&());
        assert!(event.remove(id));
        assert!(!event.remove(id));
        event.trigger(&());
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_reset() {
        let mut events = HighlightEvents::default();
        events.on_clear.add(|_| {});
        events.on_highlight.add(|_| {});
        events.reset();
        assert!(events.on_clear.is_empty());
        assert!(events.on_highlight.is_empty());
    }
}
