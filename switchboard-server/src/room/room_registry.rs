use crate::room::Room;
use dashmap::DashMap;
use std::sync::Arc;
use switchboard_core::RoomId;
use tracing::info;

/// Maps room ids to live rooms.
///
/// The map has its own locking, separate from each room's. Callers take the
/// registry step first and drop it before touching a room; the only nesting
/// is [`RoomRegistry::remove_if_empty`], which locks one room while holding
/// its map entry and never the other way round.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<DashMap<RoomId, Arc<Room>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the room for `room_id`, creating it if needed. Concurrent
    /// callers for the same id always get the same instance.
    pub fn get_or_create(&self, room_id: &RoomId) -> Arc<Room> {
        if let Some(room) = self.rooms.get(room_id) {
            return Arc::clone(room.value());
        }

        let room = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            info!(room = %room_id, "Creating new room");
            Arc::new(Room::new(room_id.clone()))
        });
        Arc::clone(room.value())
    }

    pub fn get(&self, room_id: &RoomId) -> Option<Arc<Room>> {
        self.rooms.get(room_id).map(|room| Arc::clone(room.value()))
    }

    /// Unconditionally drops the entry. The removed room is closed so that a
    /// caller still holding it cannot add members to an unreachable room.
    pub fn remove(&self, room_id: &RoomId) -> Option<Arc<Room>> {
        let (_, room) = self.rooms.remove(room_id)?;
        room.close();
        info!(room = %room_id, "Room removed");
        Some(room)
    }

    /// Drops `room` only if it is still the registered instance and still
    /// empty. A join that slipped in first keeps the room alive; a join that
    /// comes later sees it closed and creates a fresh one.
    pub fn remove_if_empty(&self, room: &Arc<Room>) -> bool {
        let removed = self
            .rooms
            .remove_if(room.id(), |_, current| {
                Arc::ptr_eq(current, room) && current.close_if_empty()
            })
            .is_some();

        if removed {
            info!(room = %room.id(), "Room removed (empty)");
        }
        removed
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.iter().map(|entry| entry.key().clone()).collect()
    }
}
