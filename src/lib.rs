//! PetSpace - in-process chat simulation
//!
//! Rooms mediate every message between users, senders queue deliver and
//! persist commands, subscribers hear about joins and leaves, and room
//! membership and history are walked through restartable cursors.

pub mod chat;
pub mod config;
pub mod error;
pub mod logging;

pub use chat::{
    ChatRoom, Command, CommandQueue, Cursor, HistoryIter, Mediator, MemberIter, MessageAction,
    MessageCommand, Observer, ReceivedMessage, RestartableIterator, RoomDirectory, Subject, User,
    UserId,
};
pub use config::Config;
pub use error::{PetspaceError, Result};
