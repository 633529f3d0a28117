use crate::error::{RoomError, RouteError};
use crate::room::{RoomRegistry, fan_out};
use crate::session::{ClientSession, Member, Membership, SessionState};
use std::sync::Arc;
use switchboard_core::{ClientId, Envelope, EnvelopeKind};
use tracing::{debug, info};

/// Decides who receives what for each inbound envelope.
///
/// Runs inline on the sender's read task. Every operation updates the
/// session's state before its first `.await`, so a route cut short mid-way
/// (connection torn down while an enqueue is pending) only loses
/// notifications and never leaves a member stranded in a room.
#[derive(Clone, Default)]
pub struct SignalRouter {
    registry: RoomRegistry,
}

impl SignalRouter {
    pub fn new(registry: RoomRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub async fn route(
        &self,
        session: &mut ClientSession,
        envelope: Envelope,
    ) -> Result<(), RouteError> {
        if session.is_closed() {
            return Err(RouteError::SessionClosed {
                kind: envelope.kind,
            });
        }

        match envelope.kind {
            EnvelopeKind::Join => self.join(session, envelope).await,
            EnvelopeKind::Offer | EnvelopeKind::Answer | EnvelopeKind::IceCandidate => {
                self.signal(session, envelope).await
            }
            EnvelopeKind::Leave => self.leave(session).await,
            kind => Err(RouteError::UnsupportedKind(kind)),
        }
    }

    /// Cleanup after the transport is gone. Same as `leave` for a joined
    /// session; a session that never joined just becomes disconnected.
    pub async fn disconnect(&self, session: &mut ClientSession) {
        self.depart(session, SessionState::Disconnected).await;
    }

    async fn join(&self, session: &mut ClientSession, envelope: Envelope) -> Result<(), RouteError> {
        let Some(room_id) = envelope.room_id else {
            return Err(RouteError::MissingRoomId);
        };
        let id = envelope
            .from
            .unwrap_or_else(|| ClientId::from(session.conn_id()));

        // Checked before any auto-leave so a refused re-join keeps the old room.
        // `Room::add` still has the final word if the id is taken meanwhile.
        if let Some(holder) = self.registry.get(&room_id).and_then(|r| r.find_by_id(&id)) {
            if holder.conn_id != session.conn_id() {
                return Err(RoomError::DuplicateClientId { id, room_id }.into());
            }
        }

        if let Some(previous) = session.room_id() {
            info!(
                conn = %session.conn_id(),
                from = %previous,
                to = %room_id,
                "Re-join, leaving previous room first"
            );
            self.depart(session, SessionState::Unjoined).await;
        }

        let member = Arc::new(Member::new(
            id.clone(),
            envelope.username,
            room_id.clone(),
            session.outbox().clone(),
        ));

        let (room, peers) = loop {
            let room = self.registry.get_or_create(&room_id);
            match room.add(Arc::clone(&member)) {
                Ok(peers) => break (room, peers),
                // Reaped between lookup and add; the next lookup creates a new one.
                Err(RoomError::Closed(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        };

        session.set_joined(Membership {
            member: Arc::clone(&member),
            room: Arc::clone(&room),
        });

        info!(
            conn = %session.conn_id(),
            client = %id,
            username = member.username.as_deref().unwrap_or(""),
            room = %room_id,
            members = room.len(),
            "Client joined room"
        );

        let notice = Envelope::user_joined(id.clone(), member.username.clone(), room_id.clone());
        let notified = fan_out(peers, notice).await;
        debug!(client = %id, room = %room_id, notified, "Sent user-joined");

        member.deliver(Envelope::joined(room_id, id)).await;
        Ok(())
    }

    async fn signal(&self, session: &mut ClientSession, mut envelope: Envelope) -> Result<(), RouteError> {
        let Some(to) = envelope.to.clone() else {
            return Err(RouteError::MissingRecipient {
                kind: envelope.kind,
            });
        };
        let Some(sender) = session.member() else {
            return Err(RouteError::NotJoined {
                kind: envelope.kind,
            });
        };

        let room = self
            .registry
            .get(&sender.room_id)
            .ok_or_else(|| RouteError::RoomNotFound(sender.room_id.clone()))?;

        let target = room
            .find_by_id(&to)
            .ok_or_else(|| RouteError::RecipientNotFound {
                to: to.clone(),
                room_id: sender.room_id.clone(),
            })?;

        // Whatever the peer claimed, `from` is the sender's joined identity.
        envelope.from = Some(sender.id.clone());

        debug!(
            kind = %envelope.kind,
            from = %sender.id,
            to = %to,
            room = %sender.room_id,
            "Forwarding signal"
        );
        target.deliver(envelope).await;
        Ok(())
    }

    async fn leave(&self, session: &mut ClientSession) -> Result<(), RouteError> {
        if session.membership().is_none() {
            return Err(RouteError::NotJoined {
                kind: EnvelopeKind::Leave,
            });
        }
        self.depart(session, SessionState::Left).await;
        Ok(())
    }

    async fn depart(&self, session: &mut ClientSession, next: SessionState) {
        let Some(Membership { member, room }) = session.take_membership(next) else {
            return;
        };

        let remaining = room.remove(&member.conn_id);
        if remaining == 0 {
            self.registry.remove_if_empty(&room);
        }

        info!(
            conn = %member.conn_id,
            client = %member.id,
            room = %member.room_id,
            remaining,
            "Client left room"
        );

        // Already removed, so the exclusion only guards against a reused id.
        let notice = Envelope::user_left(member.id.clone(), member.room_id.clone());
        room.broadcast_except(&member.id, notice).await;
    }
}
