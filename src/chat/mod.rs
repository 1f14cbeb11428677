//! Chat module for PetSpace.
//!
//! This module provides in-process chat rooms including:
//! - Rooms that mediate all traffic between their members
//! - Deliver and persist commands queued by each sender
//! - Join/leave notifications for subscribed observers
//! - Restartable cursors over membership and history

mod command;
mod directory;
mod iterator;
mod observer;
mod room;
mod user;

pub use command::{Command, CommandQueue, MessageAction, MessageCommand};
pub use directory::{DirectoryError, RoomDirectory, RoomInfo};
pub use iterator::{Cursor, HistoryIter, MemberIter, RestartableIterator};
pub use observer::{Observer, Subject, SubscriberList};
pub use room::{join_notice, leave_notice, ChatRoom, Mediator, CTRL_CAT, DOGORITHM};
pub use user::{ReceivedMessage, User, UserId};
