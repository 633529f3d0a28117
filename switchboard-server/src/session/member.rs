use crate::error::DeliveryError;
use crate::session::Outbox;
use switchboard_core::{ClientId, ConnectionId, Envelope, RoomId};
use tracing::{debug, warn};

/// The shared, read-only face of a session once it has joined a room.
///
/// Built once per successful join and never mutated afterwards, so other
/// sessions' read tasks can resolve and address it without further locking.
#[derive(Debug)]
pub struct Member {
    pub conn_id: ConnectionId,
    pub id: ClientId,
    pub username: Option<String>,
    pub room_id: RoomId,
    outbox: Outbox,
}

impl Member {
    pub fn new(id: ClientId, username: Option<String>, room_id: RoomId, outbox: Outbox) -> Self {
        Self {
            conn_id: outbox.conn_id(),
            id,
            username,
            room_id,
            outbox,
        }
    }

    /// Enqueues onto this member's outbound queue. Failures are logged and
    /// swallowed; senders never learn about them.
    pub async fn deliver(&self, envelope: Envelope) -> bool {
        let kind = envelope.kind.clone();
        match self.outbox.deliver(envelope).await {
            Ok(()) => true,
            Err(DeliveryError::QueueFull) => {
                warn!(
                    client = %self.id,
                    room = %self.room_id,
                    %kind,
                    "Outbound queue full, dropping envelope"
                );
                false
            }
            Err(DeliveryError::Closed) => {
                debug!(client = %self.id, %kind, "Recipient already disconnected");
                false
            }
        }
    }
}
