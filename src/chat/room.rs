//! Chat room implementation for PetSpace.
//!
//! A [`ChatRoom`] is the mediator between its members: it routes each
//! message to everyone but the sender and keeps an append-only history.
//! It is also the [`Subject`] users subscribe to for join and leave
//! notices.
//!
//! Rooms never own their members. Membership and subscriptions are weak
//! references, so dropping a user removes it from every room.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, info};

use super::iterator::{Cursor, HistoryIter, MemberIter};
use super::observer::{Observer, Subject, SubscriberList};
use super::user::User;

/// Name of the cat lovers' room.
pub const CTRL_CAT: &str = "CtrlCat";

/// Name of the dog lovers' room.
pub const DOGORITHM: &str = "Dogorithm";

/// Notice sent to subscribers when a user joins.
pub fn join_notice(name: &str) -> String {
    format!("{name} has joined the room!")
}

/// Notice sent to subscribers when a user leaves.
pub fn leave_notice(name: &str) -> String {
    format!("{name} has left the room.")
}

/// Coordinator through which users talk to each other.
pub trait Mediator {
    /// Room name.
    fn name(&self) -> &str;

    /// Add a member.
    ///
    /// Returns false (and changes nothing) if the user is already a member.
    fn register(&self, user: &Rc<User>) -> bool;

    /// Remove a member.
    ///
    /// Returns false if the user was not a member.
    fn remove(&self, user: &User) -> bool;

    /// Deliver a message to every member except `from`, in membership order.
    ///
    /// Returns the number of recipients.
    fn route(&self, message: &str, from: &User) -> usize;

    /// Append `"{from}: {message}"` to the history.
    fn persist(&self, message: &str, from: &User);

    /// Cursor over a snapshot of the current members.
    fn members(&self) -> MemberIter;

    /// Cursor over a snapshot of the history.
    fn history(&self) -> HistoryIter;
}

/// A named chat room.
pub struct ChatRoom {
    this: Weak<ChatRoom>,
    name: String,
    announce_membership: bool,
    members: RefCell<Vec<Weak<User>>>,
    history: RefCell<Vec<String>>,
    subscribers: SubscriberList,
}

impl ChatRoom {
    /// Create a room that announces joins and leaves to its subscribers.
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Self::with_announcements(name, true)
    }

    /// Create a room, choosing whether membership changes are announced.
    pub fn with_announcements(name: impl Into<String>, announce_membership: bool) -> Rc<Self> {
        let name = name.into();
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            name,
            announce_membership,
            members: RefCell::new(Vec::new()),
            history: RefCell::new(Vec::new()),
            subscribers: SubscriberList::new(),
        })
    }

    /// The CtrlCat room.
    pub fn ctrl_cat() -> Rc<Self> {
        Self::new(CTRL_CAT)
    }

    /// The Dogorithm room.
    pub fn dogorithm() -> Rc<Self> {
        Self::new(DOGORITHM)
    }

    /// Whether joins and leaves are announced.
    pub fn announces_membership(&self) -> bool {
        self.announce_membership
    }

    /// Number of live members.
    pub fn member_count(&self) -> usize {
        self.members
            .borrow()
            .iter()
            .filter(|m| m.strong_count() > 0)
            .count()
    }

    /// Number of history entries.
    pub fn history_len(&self) -> usize {
        self.history.borrow().len()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Check if a user is a member.
    pub fn is_member(&self, user: &User) -> bool {
        self.members
            .borrow()
            .iter()
            .any(|m| m.strong_count() > 0 && std::ptr::eq(m.as_ptr(), user))
    }

    /// Check if an observer is subscribed.
    pub fn is_subscribed(&self, observer: Rc<dyn Observer>) -> bool {
        self.subscribers.contains(&observer)
    }

    fn live_members(&self) -> Vec<Rc<User>> {
        self.members.borrow().iter().filter_map(Weak::upgrade).collect()
    }
}

impl Mediator for ChatRoom {
    fn name(&self) -> &str {
        &self.name
    }

    fn register(&self, user: &Rc<User>) -> bool {
        {
            let mut members = self.members.borrow_mut();
            members.retain(|m| m.strong_count() > 0);
            if members.iter().any(|m| std::ptr::eq(m.as_ptr(), Rc::as_ptr(user))) {
                return false;
            }
            members.push(Rc::downgrade(user));
        }

        let room: Weak<dyn Mediator> = self.this.clone();
        user.attach_room(room);

        info!(room = %self.name, user = %user.name(), user_id = %user.id(), "user joined");
        if self.announce_membership {
            self.notify_all(&join_notice(user.name()), &self.name);
        }
        true
    }

    fn remove(&self, user: &User) -> bool {
        let removed = {
            let mut members = self.members.borrow_mut();
            match members.iter().position(|m| std::ptr::eq(m.as_ptr(), user)) {
                Some(index) => {
                    members.remove(index);
                    true
                }
                None => false,
            }
        };
        if !removed {
            return false;
        }

        user.detach_room(self);

        info!(room = %self.name, user = %user.name(), user_id = %user.id(), "user left");
        if self.announce_membership {
            self.notify_all(&leave_notice(user.name()), &self.name);
        }
        true
    }

    fn route(&self, message: &str, from: &User) -> usize {
        if !self.is_member(from) {
            debug!(room = %self.name, user = %from.name(), "routing message from non-member");
        }

        let recipients: Vec<Rc<User>> = self
            .live_members()
            .into_iter()
            .filter(|m| !std::ptr::eq(Rc::as_ptr(m), from))
            .collect();

        for recipient in &recipients {
            recipient.receive(message, from, self);
        }

        debug!(room = %self.name, from = %from.name(), recipients = recipients.len(), "message routed");
        recipients.len()
    }

    fn persist(&self, message: &str, from: &User) {
        let entry = format!("{}: {}", from.name(), message);
        debug!(room = %self.name, entry = %entry, "message saved");
        self.history.borrow_mut().push(entry);
    }

    fn members(&self) -> MemberIter {
        Cursor::new(self.live_members())
    }

    fn history(&self) -> HistoryIter {
        Cursor::new(self.history.borrow().clone())
    }
}

impl Subject for ChatRoom {
    fn subscribe(&self, observer: Rc<dyn Observer>) -> bool {
        let added = self.subscribers.subscribe(&observer);
        debug!(room = %self.name, added, "subscribe");
        added
    }

    fn unsubscribe(&self, observer: Rc<dyn Observer>) -> bool {
        let removed = self.subscribers.unsubscribe(&observer);
        debug!(room = %self.name, removed, "unsubscribe");
        removed
    }

    fn notify_all(&self, message: &str, room_name: &str) -> usize {
        let notified = self.subscribers.notify(message, room_name);
        debug!(room = %self.name, notified, "{}", message);
        notified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::iterator::RestartableIterator;

    fn names(iter: MemberIter) -> Vec<String> {
        iter.map(|u| u.name().to_string()).collect()
    }

    #[test]
    fn test_chat_room_new() {
        let room = ChatRoom::new("Lobby");
        assert_eq!(room.name(), "Lobby");
        assert_eq!(room.member_count(), 0);
        assert_eq!(room.history_len(), 0);
        assert_eq!(room.subscriber_count(), 0);
        assert!(room.announces_membership());
    }

    #[test]
    fn test_concrete_rooms() {
        assert_eq!(ChatRoom::ctrl_cat().name(), "CtrlCat");
        assert_eq!(ChatRoom::dogorithm().name(), "Dogorithm");
    }

    #[test]
    fn test_register() {
        let room = ChatRoom::new("Lobby");
        let alice = User::new("Alice");

        assert!(room.register(&alice));
        assert!(room.is_member(&alice));
        assert_eq!(room.member_count(), 1);
    }

    #[test]
    fn test_register_duplicate() {
        let room = ChatRoom::new("Lobby");
        let alice = User::new("Alice");

        assert!(room.register(&alice));
        assert!(!room.register(&alice));
        assert_eq!(room.member_count(), 1);
    }

    #[test]
    fn test_same_name_users_are_distinct_members() {
        let room = ChatRoom::new("Lobby");
        let first = User::new("Alice");
        let second = User::new("Alice");

        assert!(room.register(&first));
        assert!(room.register(&second));
        assert_eq!(room.member_count(), 2);
    }

    #[test]
    fn test_remove() {
        let room = ChatRoom::new("Lobby");
        let alice = User::new("Alice");
        room.register(&alice);

        assert!(room.remove(&alice));
        assert!(!room.is_member(&alice));
        assert_eq!(room.member_count(), 0);
    }

    #[test]
    fn test_remove_not_member() {
        let room = ChatRoom::new("Lobby");
        let alice = User::new("Alice");
        assert!(!room.remove(&alice));
    }

    #[test]
    fn test_members_in_registration_order() {
        let room = ChatRoom::new("Lobby");
        let alice = User::new("Alice");
        let bob = User::new("Bob");
        let charlie = User::new("Charlie");
        room.register(&charlie);
        room.register(&alice);
        room.register(&bob);

        assert_eq!(names(room.members()), vec!["Charlie", "Alice", "Bob"]);
    }

    #[test]
    fn test_route_excludes_sender() {
        let room = ChatRoom::new("Lobby");
        let alice = User::new("Alice");
        let bob = User::new("Bob");
        let charlie = User::new("Charlie");
        room.register(&alice);
        room.register(&bob);
        room.register(&charlie);

        assert_eq!(room.route("hello", &alice), 2);

        assert!(alice.inbox().is_empty());
        assert_eq!(bob.inbox()[0].content, "hello");
        assert_eq!(bob.inbox()[0].sender_name, "Alice");
        assert_eq!(charlie.inbox()[0].content, "hello");
        assert_eq!(room.history_len(), 0);
    }

    #[test]
    fn test_route_from_non_member_is_delivered() {
        let room = ChatRoom::new("Lobby");
        let outsider = User::new("Eve");
        let bob = User::new("Bob");
        room.register(&bob);

        assert_eq!(room.route("knock knock", &outsider), 1);
        assert_eq!(bob.inbox()[0].sender_name, "Eve");
    }

    #[test]
    fn test_persist_formats_entry() {
        let room = ChatRoom::new("Lobby");
        let alice = User::new("Alice");

        room.persist("first", &alice);
        room.persist("second", &alice);

        assert_eq!(
            room.history().collect::<Vec<_>>(),
            vec!["Alice: first", "Alice: second"]
        );
    }

    #[test]
    fn test_history_iterator_is_snapshot() {
        let room = ChatRoom::new("Lobby");
        let alice = User::new("Alice");
        room.persist("one", &alice);

        let mut history = room.history();
        room.persist("two", &alice);

        assert_eq!(history.len(), 1);
        history.reset();
        assert_eq!(history.next().as_deref(), Some("Alice: one"));
        assert!(!history.has_next());
        assert_eq!(room.history_len(), 2);
    }

    #[test]
    fn test_member_iterator_is_snapshot() {
        let room = ChatRoom::new("Lobby");
        let alice = User::new("Alice");
        let bob = User::new("Bob");
        room.register(&alice);
        room.register(&bob);

        let members = room.members();
        room.remove(&bob);

        assert_eq!(names(members), vec!["Alice", "Bob"]);
        assert_eq!(names(room.members()), vec!["Alice"]);
    }

    #[test]
    fn test_dropped_user_leaves_membership() {
        let room = ChatRoom::new("Lobby");
        let alice = User::new("Alice");
        {
            let bob = User::new("Bob");
            room.register(&bob);
            room.register(&alice);
            assert_eq!(room.member_count(), 2);
        }

        assert_eq!(room.member_count(), 1);
        assert_eq!(room.route("still here?", &alice), 0);
    }

    #[test]
    fn test_join_and_leave_notify_subscribers() {
        let room = ChatRoom::new("CtrlCat");
        let alice = User::new("Alice");
        let diana = User::new("Diana");
        room.subscribe(alice.clone());

        room.register(&diana);
        room.register(&diana);
        room.remove(&diana);
        room.remove(&diana);

        assert_eq!(
            alice.notifications(),
            vec![
                "[CtrlCat] Diana has joined the room!",
                "[CtrlCat] Diana has left the room."
            ]
        );
    }

    #[test]
    fn test_silent_room_does_not_announce() {
        let room = ChatRoom::with_announcements("Quiet", false);
        let alice = User::new("Alice");
        let bob = User::new("Bob");
        room.subscribe(alice.clone());

        room.register(&bob);
        room.remove(&bob);

        assert!(alice.notifications().is_empty());
        assert_eq!(room.notify_all("manual", "Quiet"), 1);
        assert_eq!(alice.notifications(), vec!["[Quiet] manual"]);
    }

    #[test]
    fn test_subscribe_idempotent() {
        let room = ChatRoom::new("Lobby");
        let alice = User::new("Alice");

        assert!(room.subscribe(alice.clone()));
        assert!(!room.subscribe(alice.clone()));
        assert_eq!(room.subscriber_count(), 1);
        assert!(room.is_subscribed(alice.clone()));
    }

    #[test]
    fn test_unsubscribe() {
        let room = ChatRoom::new("Lobby");
        let alice = User::new("Alice");
        let bob = User::new("Bob");
        room.subscribe(alice.clone());
        room.subscribe(bob.clone());

        assert!(room.unsubscribe(bob.clone()));
        assert!(!room.unsubscribe(bob.clone()));
        assert_eq!(room.notify_all("ping", "Lobby"), 1);

        assert_eq!(alice.notifications().len(), 1);
        assert!(bob.notifications().is_empty());
    }

    #[test]
    fn test_subscriber_need_not_be_member() {
        let room = ChatRoom::new("Lobby");
        let watcher = User::new("Watcher");
        room.subscribe(watcher.clone());

        room.register(&User::new("Bob"));

        assert!(!room.is_member(&watcher));
        assert_eq!(watcher.notifications().len(), 1);
    }
}
