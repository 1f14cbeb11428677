//! Room directory for PetSpace.
//!
//! Owns the named rooms of a simulation run and answers lookups by name.
//! Every room in a directory shares the same membership announcement policy.

use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;
use tracing::info;

use super::room::{ChatRoom, Mediator, CTRL_CAT, DOGORITHM};
use super::user::User;
use crate::config::ChatConfig;

/// Rooms created by [`RoomDirectory::with_defaults`].
const DEFAULT_ROOMS: &[&str] = &[CTRL_CAT, DOGORITHM];

/// Named collection of chat rooms.
pub struct RoomDirectory {
    rooms: HashMap<String, Rc<ChatRoom>>,
    announce_membership: bool,
}

impl RoomDirectory {
    /// Create an empty directory.
    pub fn new(announce_membership: bool) -> Self {
        Self {
            rooms: HashMap::new(),
            announce_membership,
        }
    }

    /// Create a directory holding CtrlCat and Dogorithm.
    pub fn with_defaults() -> Self {
        let mut directory = Self::new(true);
        for name in DEFAULT_ROOMS {
            directory.create_room(*name);
        }
        directory
    }

    /// Create a directory from configuration.
    pub fn from_config(config: &ChatConfig) -> Self {
        let mut directory = Self::new(config.announce_membership);
        for name in &config.default_rooms {
            directory.create_room(name.as_str());
        }
        directory
    }

    /// Create a new room.
    ///
    /// Returns the room if created, or None if a room with that name already exists.
    pub fn create_room(&mut self, name: impl Into<String>) -> Option<Rc<ChatRoom>> {
        let name = name.into();
        if self.rooms.contains_key(&name) {
            return None;
        }

        let room = ChatRoom::with_announcements(&name, self.announce_membership);
        self.rooms.insert(name.clone(), Rc::clone(&room));
        info!(room = %name, "room created");
        Some(room)
    }

    /// Get a room by name.
    pub fn get_room(&self, name: &str) -> Option<Rc<ChatRoom>> {
        self.rooms.get(name).cloned()
    }

    /// List all rooms, sorted by name.
    pub fn list_rooms(&self) -> Vec<RoomInfo> {
        let mut result: Vec<RoomInfo> = self
            .rooms
            .values()
            .map(|room| RoomInfo {
                name: room.name().to_string(),
                member_count: room.member_count(),
                message_count: room.history_len(),
                subscriber_count: room.subscriber_count(),
            })
            .collect();

        result.sort_by(|a, b| a.name.cmp(&b.name));
        result
    }

    /// Get the number of rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Remove a user from every room.
    ///
    /// Returns the number of rooms the user left.
    pub fn leave_all_rooms(&self, user: &User) -> usize {
        self.rooms.values().filter(|room| room.remove(user)).count()
    }

    /// Total number of memberships across all rooms.
    pub fn total_members(&self) -> usize {
        self.rooms.values().map(|room| room.member_count()).sum()
    }

    /// Delete a room.
    ///
    /// Returns the room name, or an error if the room doesn't exist or still
    /// has members.
    pub fn delete_room(&mut self, name: &str) -> Result<String, DirectoryError> {
        let room = self.rooms.get(name).ok_or(DirectoryError::NotFound)?;
        if room.member_count() > 0 {
            return Err(DirectoryError::HasMembers);
        }

        self.rooms.remove(name);
        info!(room = %name, "room deleted");
        Ok(name.to_string())
    }
}

impl Default for RoomDirectory {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Summary of a chat room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    /// Room name.
    pub name: String,
    /// Number of members.
    pub member_count: usize,
    /// Number of history entries.
    pub message_count: usize,
    /// Number of subscribers.
    pub subscriber_count: usize,
}

/// Error when deleting a room.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Room not found.
    #[error("room not found")]
    NotFound,
    /// Room still has members.
    #[error("room still has members")]
    HasMembers,
}
