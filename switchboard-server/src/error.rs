use switchboard_core::{ClientId, EnvelopeKind, RoomId};
use thiserror::Error;

/// Failure of the underlying duplex channel. Fatal to that one connection.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection closed by peer")]
    Closed,

    #[error("websocket error: {0}")]
    WebSocket(#[from] axum::Error),
}

/// Enqueue onto a recipient's outbound queue failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("outbound queue is full")]
    QueueFull,

    #[error("recipient connection is gone")]
    Closed,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    /// The room was reaped after the caller looked it up.
    #[error("room {0} is closed")]
    Closed(RoomId),

    #[error("client id {id} is already taken in room {room_id}")]
    DuplicateClientId { id: ClientId, room_id: RoomId },
}

/// Protocol misuse by a peer. The envelope is dropped and nothing is sent
/// back; the connection stays up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("join without roomId")]
    MissingRoomId,

    #[error("{kind} without recipient")]
    MissingRecipient { kind: EnvelopeKind },

    #[error("{kind} from a session that has not joined a room")]
    NotJoined { kind: EnvelopeKind },

    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    #[error("recipient {to} not found in room {room_id}")]
    RecipientNotFound { to: ClientId, room_id: RoomId },

    #[error("session is closed, ignoring {kind}")]
    SessionClosed { kind: EnvelopeKind },

    #[error("unsupported envelope type '{0}'")]
    UnsupportedKind(EnvelopeKind),

    #[error(transparent)]
    Room(#[from] RoomError),
}
