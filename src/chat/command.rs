//! Message commands and the per-user command queue.
//!
//! Sending a message is split into two commands bound to the same room,
//! payload and sender: [`MessageAction::Deliver`] routes the message to the
//! other members and [`MessageAction::Persist`] appends it to the room's
//! history. Commands are plain values consumed by [`Command::execute`], so
//! each one runs at most once.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use super::room::Mediator;
use super::user::User;

/// A deferred unit of work.
pub trait Command {
    /// Run the command, consuming it.
    fn execute(self);
}

/// The mediator operation a [`MessageCommand`] forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAction {
    /// Route the message to every other member.
    Deliver,
    /// Append the message to the room history.
    Persist,
}

impl MessageAction {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageAction::Deliver => "deliver",
            MessageAction::Persist => "persist",
        }
    }
}

impl fmt::Display for MessageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message bound to its target room and sender.
pub struct MessageCommand {
    action: MessageAction,
    room: Rc<dyn Mediator>,
    message: String,
    sender: Rc<User>,
}

impl MessageCommand {
    /// Build a command that routes `message` through `room`.
    pub fn deliver(room: Rc<dyn Mediator>, message: impl Into<String>, sender: Rc<User>) -> Self {
        Self {
            action: MessageAction::Deliver,
            room,
            message: message.into(),
            sender,
        }
    }

    /// Build a command that records `message` in the history of `room`.
    pub fn persist(room: Rc<dyn Mediator>, message: impl Into<String>, sender: Rc<User>) -> Self {
        Self {
            action: MessageAction::Persist,
            room,
            message: message.into(),
            sender,
        }
    }

    pub fn action(&self) -> MessageAction {
        self.action
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn sender(&self) -> &User {
        &self.sender
    }

    pub fn room_name(&self) -> &str {
        self.room.name()
    }
}

impl Command for MessageCommand {
    fn execute(self) {
        match self.action {
            MessageAction::Deliver => {
                self.room.route(&self.message, &self.sender);
            }
            MessageAction::Persist => self.room.persist(&self.message, &self.sender),
        }
    }
}

impl fmt::Debug for MessageCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageCommand")
            .field("action", &self.action)
            .field("room", &self.room.name())
            .field("message", &self.message)
            .field("sender", &self.sender.name())
            .finish()
    }
}

/// FIFO queue of pending commands.
pub struct CommandQueue<C = MessageCommand> {
    pending: RefCell<VecDeque<C>>,
}

impl<C: Command> CommandQueue<C> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            pending: RefCell::new(VecDeque::new()),
        }
    }

    /// Append a command to the back of the queue.
    pub fn push(&self, command: C) {
        self.pending.borrow_mut().push_back(command);
    }

    /// Number of commands waiting to run.
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Check if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Run queued commands front to back until the queue is empty.
    ///
    /// Each command is popped before it runs, so a command may enqueue more
    /// work without holding the queue borrowed; that work runs in the same
    /// drain. Returns the number of commands executed.
    pub fn execute_all(&self) -> usize {
        let mut executed = 0;
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(command) = next else {
                break;
            };
            command.execute();
            executed += 1;
        }
        executed
    }
}

impl<C: Command> Default for CommandQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}
