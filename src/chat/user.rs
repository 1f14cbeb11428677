//! Chat users.
//!
//! A user talks to other users only through a room ([`Mediator`]). Sending
//! queues a deliver command and a persist command on the user and drains
//! the queue immediately. Users are also [`Observer`]s and keep a log of
//! room notifications they were subscribed to.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use super::command::{CommandQueue, MessageCommand};
use super::observer::Observer;
use super::room::Mediator;

/// Unique user identifier.
///
/// Display names may repeat; the identifier never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message routed to a user by a room.
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    /// Name of the room that routed the message.
    pub room: String,
    /// Sender's identifier.
    pub sender_id: UserId,
    /// Sender's display name.
    pub sender_name: String,
    /// Message content.
    pub content: String,
    /// When the message arrived.
    pub received_at: DateTime<Utc>,
}

impl ReceivedMessage {
    /// Format the message for display.
    pub fn format(&self) -> String {
        format!("[{}] {}: {}", self.room, self.sender_name, self.content)
    }
}

/// A chat participant.
pub struct User {
    id: UserId,
    name: String,
    rooms: RefCell<Vec<Weak<dyn Mediator>>>,
    commands: CommandQueue<MessageCommand>,
    notifications: RefCell<Vec<String>>,
    inbox: RefCell<Vec<ReceivedMessage>>,
}

impl User {
    /// Create a new user.
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            id: UserId::new(),
            name: name.into(),
            rooms: RefCell::new(Vec::new()),
            commands: CommandQueue::new(),
            notifications: RefCell::new(Vec::new()),
            inbox: RefCell::new(Vec::new()),
        })
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Send a message to a room.
    ///
    /// Queues a deliver command followed by a persist command and runs both
    /// before returning, so recipients see the message before the room
    /// records it. Membership in `room` is not required.
    pub fn send(self: &Rc<Self>, message: impl Into<String>, room: Rc<dyn Mediator>) {
        let message = message.into();
        debug!(user = %self.name, room = room.name(), "sending message");

        self.add_command(MessageCommand::deliver(
            Rc::clone(&room),
            message.clone(),
            Rc::clone(self),
        ));
        self.add_command(MessageCommand::persist(room, message, Rc::clone(self)));
        self.execute_all();
    }

    /// Called by a room when another user's message is routed here.
    pub fn receive(&self, message: &str, from: &User, room: &dyn Mediator) {
        info!(
            user = %self.name,
            from = %from.name,
            room = room.name(),
            "{} says: {}",
            from.name,
            message
        );
        self.inbox.borrow_mut().push(ReceivedMessage {
            room: room.name().to_string(),
            sender_id: from.id,
            sender_name: from.name.clone(),
            content: message.to_string(),
            received_at: Utc::now(),
        });
    }

    /// Queue a command without running it.
    pub fn add_command(&self, command: MessageCommand) {
        self.commands.push(command);
    }

    /// Run every queued command in order and empty the queue.
    ///
    /// Returns the number of commands executed.
    pub fn execute_all(&self) -> usize {
        self.commands.execute_all()
    }

    /// Number of queued commands.
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Notifications received so far, oldest first.
    pub fn notifications(&self) -> Vec<String> {
        self.notifications.borrow().clone()
    }

    /// Messages routed to this user so far, oldest first.
    pub fn inbox(&self) -> Vec<ReceivedMessage> {
        self.inbox.borrow().clone()
    }

    /// Rooms this user is registered in, in registration order.
    pub fn rooms(&self) -> Vec<Rc<dyn Mediator>> {
        self.rooms.borrow().iter().filter_map(Weak::upgrade).collect()
    }

    /// Names of the rooms this user is registered in.
    pub fn room_names(&self) -> Vec<String> {
        self.rooms()
            .iter()
            .map(|room| room.name().to_string())
            .collect()
    }

    pub(crate) fn attach_room(&self, room: Weak<dyn Mediator>) {
        let mut rooms = self.rooms.borrow_mut();
        rooms.retain(|r| r.strong_count() > 0);
        if !rooms.iter().any(|r| std::ptr::addr_eq(r.as_ptr(), room.as_ptr())) {
            rooms.push(room);
        }
    }

    pub(crate) fn detach_room(&self, room: &dyn Mediator) {
        let target = std::ptr::from_ref(room);
        self.rooms
            .borrow_mut()
            .retain(|r| r.strong_count() > 0 && !std::ptr::addr_eq(r.as_ptr(), target));
    }
}

impl Observer for User {
    fn update(&self, message: &str, room_name: &str) {
        debug!(user = %self.name, room = room_name, "notification: {}", message);
        self.notifications
            .borrow_mut()
            .push(format!("[{room_name}] {message}"));
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("rooms", &self.room_names())
            .field("pending_commands", &self.pending_commands())
            .finish()
    }
}
