use crate::room::Room;
use crate::session::{Member, Outbox};
use std::sync::Arc;
use switchboard_core::{ConnectionId, RoomId};

/// Where a session is in `unjoined -> joined -> left | disconnected`.
#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Unjoined,
    Joined(Membership),
    Left,
    Disconnected,
}

/// A joined session's entry and the exact room instance that holds it.
#[derive(Debug, Clone)]
pub struct Membership {
    pub member: Arc<Member>,
    pub room: Arc<Room>,
}

/// Per-connection state, owned and mutated only by that connection's read
/// task.
#[derive(Debug)]
pub struct ClientSession {
    conn_id: ConnectionId,
    outbox: Outbox,
    state: SessionState,
}

impl ClientSession {
    pub fn new(outbox: Outbox) -> Self {
        Self {
            conn_id: outbox.conn_id(),
            outbox,
            state: SessionState::Unjoined,
        }
    }

    pub fn conn_id(&self) -> ConnectionId {
        self.conn_id
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn membership(&self) -> Option<&Membership> {
        match &self.state {
            SessionState::Joined(membership) => Some(membership),
            _ => None,
        }
    }

    pub fn member(&self) -> Option<&Arc<Member>> {
        self.membership().map(|m| &m.member)
    }

    pub fn room_id(&self) -> Option<&RoomId> {
        self.member().map(|m| &m.room_id)
    }

    /// Terminal: the session left explicitly or its transport is gone.
    pub fn is_closed(&self) -> bool {
        matches!(self.state, SessionState::Left | SessionState::Disconnected)
    }

    pub(crate) fn set_joined(&mut self, membership: Membership) {
        self.state = SessionState::Joined(membership);
    }

    /// Moves to `next`, handing back the membership if there was one.
    pub(crate) fn take_membership(&mut self, next: SessionState) -> Option<Membership> {
        match std::mem::replace(&mut self.state, next) {
            SessionState::Joined(membership) => Some(membership),
            _ => None,
        }
    }
}
