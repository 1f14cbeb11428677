//! Observer channel for room events.
//!
//! A [`Subject`] keeps a set of [`Observer`]s and pushes notifications to
//! them in subscription order. Subscribers are held weakly: dropping an
//! observer silently removes it from every subject it was subscribed to.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Receiver of room notifications.
pub trait Observer {
    /// Called by a subject for each notification.
    ///
    /// Implementations must not panic and must return promptly.
    fn update(&self, message: &str, room_name: &str);
}

/// Source of room notifications.
pub trait Subject {
    /// Add an observer. Subscribing twice is a no-op.
    fn subscribe(&self, observer: Rc<dyn Observer>) -> bool;

    /// Remove an observer. Unsubscribing a stranger is a no-op.
    fn unsubscribe(&self, observer: Rc<dyn Observer>) -> bool;

    /// Notify every subscriber in subscription order.
    ///
    /// Returns the number of observers notified.
    fn notify_all(&self, message: &str, room_name: &str) -> usize;
}

/// Ordered, duplicate-free list of weakly held observers.
#[derive(Default)]
pub struct SubscriberList {
    observers: RefCell<Vec<Weak<dyn Observer>>>,
}

impl SubscriberList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer at the end of the list.
    ///
    /// Returns false if it was already subscribed.
    pub fn subscribe(&self, observer: &Rc<dyn Observer>) -> bool {
        let mut observers = self.observers.borrow_mut();
        observers.retain(|o| o.strong_count() > 0);
        if observers.iter().any(|o| same_observer(o, observer)) {
            return false;
        }
        observers.push(Rc::downgrade(observer));
        true
    }

    /// Remove an observer.
    ///
    /// Returns false if it was not subscribed.
    pub fn unsubscribe(&self, observer: &Rc<dyn Observer>) -> bool {
        let mut observers = self.observers.borrow_mut();
        match observers.iter().position(|o| same_observer(o, observer)) {
            Some(index) => {
                observers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Check whether an observer is subscribed.
    pub fn contains(&self, observer: &Rc<dyn Observer>) -> bool {
        self.observers
            .borrow()
            .iter()
            .any(|o| o.strong_count() > 0 && same_observer(o, observer))
    }

    /// Deliver a notification to every live subscriber.
    ///
    /// The list is snapshotted first, so observers may subscribe or
    /// unsubscribe from inside `update` without affecting this round.
    pub fn notify(&self, message: &str, room_name: &str) -> usize {
        let live: Vec<Rc<dyn Observer>> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|o| o.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };

        for observer in &live {
            observer.update(message, room_name);
        }
        live.len()
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|o| o.strong_count() > 0)
            .count()
    }

    /// Check if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn same_observer(held: &Weak<dyn Observer>, observer: &Rc<dyn Observer>) -> bool {
    std::ptr::addr_eq(held.as_ptr(), Rc::as_ptr(observer))
}
