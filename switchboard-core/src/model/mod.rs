mod client;
mod envelope;
mod room;

pub use client::{ClientId, ConnectionId};
pub use envelope::{Envelope, EnvelopeKind};
pub use room::RoomId;
