use crate::error::RoomError;
use crate::session::Member;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use switchboard_core::{ClientId, ConnectionId, Envelope, RoomId};

/// A set of joined sessions sharing one room id.
///
/// Membership is guarded by a room-local mutex. The guard is only ever held
/// for plain map work and is released before any enqueue is awaited, so a
/// slow recipient cannot wedge the room.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    state: Mutex<RoomState>,
}

#[derive(Debug, Default)]
struct RoomState {
    members: HashMap<ConnectionId, Arc<Member>>,
    // Set once the registry has dropped this room; late joiners must retry.
    closed: bool,
}

impl Room {
    pub(crate) fn new(id: RoomId) -> Self {
        Self {
            id,
            state: Mutex::new(RoomState::default()),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Inserts `member` and returns everyone who was already inside at that
    /// instant. Each pair of members therefore sees exactly one join notice.
    pub fn add(&self, member: Arc<Member>) -> Result<Vec<Arc<Member>>, RoomError> {
        let mut state = self.lock();

        if state.closed {
            return Err(RoomError::Closed(self.id.clone()));
        }

        let taken = state
            .members
            .values()
            .any(|m| m.id == member.id && m.conn_id != member.conn_id);
        if taken {
            return Err(RoomError::DuplicateClientId {
                id: member.id.clone(),
                room_id: self.id.clone(),
            });
        }

        let peers = state.members.values().cloned().collect();
        state.members.insert(member.conn_id, member);
        Ok(peers)
    }

    /// Removes the session's entry and returns how many members remain.
    pub fn remove(&self, conn_id: &ConnectionId) -> usize {
        let mut state = self.lock();
        state.members.remove(conn_id);
        state.members.len()
    }

    pub fn find_by_id(&self, id: &ClientId) -> Option<Arc<Member>> {
        self.lock().members.values().find(|m| &m.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().members.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn members(&self) -> Vec<Arc<Member>> {
        self.lock().members.values().cloned().collect()
    }

    /// Enqueues a copy of `envelope` for every member except `sender`.
    /// Returns how many recipients accepted it.
    pub async fn broadcast_except(&self, sender: &ClientId, envelope: Envelope) -> usize {
        let recipients: Vec<Arc<Member>> = self
            .lock()
            .members
            .values()
            .filter(|m| &m.id != sender)
            .cloned()
            .collect();

        fan_out(recipients, envelope).await
    }

    /// Marks the room closed if nobody is in it. Called by the registry while
    /// it holds the map entry, so the check and the unlink are one step.
    pub(crate) fn close_if_empty(&self) -> bool {
        let mut state = self.lock();
        if state.members.is_empty() {
            state.closed = true;
        }
        state.closed
    }

    pub(crate) fn close(&self) {
        self.lock().closed = true;
    }

    fn lock(&self) -> MutexGuard<'_, RoomState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Enqueues a copy of `envelope` on each recipient, one after another.
pub(crate) async fn fan_out(recipients: Vec<Arc<Member>>, envelope: Envelope) -> usize {
    let mut delivered = 0;
    for member in recipients {
        if member.deliver(envelope.clone()).await {
            delivered += 1;
        }
    }
    delivered
}
