//! Test helpers for chat integration tests.
//!
//! Provides an order-recording mediator and helpers for building rooms.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use petspace::chat::{ChatRoom, HistoryIter, Mediator, MemberIter, User};

/// Mediator that records every call and forwards it to a real room.
pub struct RecordingMediator {
    inner: Rc<ChatRoom>,
    calls: RefCell<Vec<String>>,
}

impl RecordingMediator {
    pub fn new(name: &str) -> Rc<Self> {
        Rc::new(Self {
            inner: ChatRoom::new(name),
            calls: RefCell::new(Vec::new()),
        })
    }

    /// Calls seen so far, e.g. `"route:Alice:hi"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Record an arbitrary marker in the call log.
    pub fn mark(&self, marker: impl Into<String>) {
        self.calls.borrow_mut().push(marker.into());
    }

    pub fn room(&self) -> &Rc<ChatRoom> {
        &self.inner
    }
}

impl Mediator for RecordingMediator {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn register(&self, user: &Rc<User>) -> bool {
        self.mark(format!("register:{}", user.name()));
        self.inner.register(user)
    }

    fn remove(&self, user: &User) -> bool {
        self.mark(format!("remove:{}", user.name()));
        self.inner.remove(user)
    }

    fn route(&self, message: &str, from: &User) -> usize {
        self.mark(format!("route:{}:{}", from.name(), message));
        let delivered = self.inner.route(message, from);
        self.mark(format!("delivered:{delivered}"));
        delivered
    }

    fn persist(&self, message: &str, from: &User) {
        self.mark(format!("persist:{}:{}", from.name(), message));
        self.inner.persist(message, from);
    }

    fn members(&self) -> MemberIter {
        self.inner.members()
    }

    fn history(&self) -> HistoryIter {
        self.inner.history()
    }
}

/// Names of the users a cursor yields.
pub fn member_names(members: MemberIter) -> Vec<String> {
    members.map(|u| u.name().to_string()).collect()
}

/// Rooms CtrlCat and Dogorithm with Alice+Bob in the first and
/// Alice+Charlie in the second.
pub fn pet_rooms() -> (Rc<ChatRoom>, Rc<ChatRoom>, Rc<User>, Rc<User>, Rc<User>) {
    let ctrl_cat = ChatRoom::ctrl_cat();
    let dogorithm = ChatRoom::dogorithm();
    let alice = User::new("Alice");
    let bob = User::new("Bob");
    let charlie = User::new("Charlie");

    ctrl_cat.register(&alice);
    ctrl_cat.register(&bob);
    dogorithm.register(&alice);
    dogorithm.register(&charlie);

    (ctrl_cat, dogorithm, alice, bob, charlie)
}
