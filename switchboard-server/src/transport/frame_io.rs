use crate::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;

/// Inbound half of a message-framed duplex connection.
#[async_trait]
pub trait FrameSource: Send {
    /// Waits for the next frame. Each frame carries one JSON document.
    /// Returns [`TransportError::Closed`] once the peer has gone away.
    async fn read_frame(&mut self) -> Result<Bytes, TransportError>;
}

/// Outbound half of a message-framed duplex connection.
///
/// Not safe to drive from more than one task; the delivery pump is its only
/// writer.
#[async_trait]
pub trait FrameSink: Send {
    async fn write_frame(&mut self, frame: String) -> Result<(), TransportError>;

    async fn close(&mut self);
}
