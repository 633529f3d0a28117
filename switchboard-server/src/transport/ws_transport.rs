use crate::error::TransportError;
use crate::transport::{FrameSink, FrameSource};
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tracing::trace;

/// Splits an upgraded WebSocket into the two halves the session drives.
pub fn split_websocket(socket: WebSocket) -> (WsFrameSink, WsFrameSource) {
    let (sender, receiver) = socket.split();
    (WsFrameSink(sender), WsFrameSource(receiver))
}

pub struct WsFrameSource(SplitStream<WebSocket>);

#[async_trait]
impl FrameSource for WsFrameSource {
    async fn read_frame(&mut self) -> Result<Bytes, TransportError> {
        loop {
            match self.0.next().await {
                None => return Err(TransportError::Closed),
                Some(Err(e)) => return Err(TransportError::WebSocket(e)),
                Some(Ok(Message::Text(text))) => {
                    return Ok(Bytes::copy_from_slice(text.as_str().as_bytes()));
                }
                Some(Ok(Message::Binary(data))) => return Ok(data),
                Some(Ok(Message::Close(frame))) => {
                    trace!(?frame, "Close frame received");
                    return Err(TransportError::Closed);
                }
                // axum answers pings itself
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
            }
        }
    }
}

pub struct WsFrameSink(SplitSink<WebSocket, Message>);

#[async_trait]
impl FrameSink for WsFrameSink {
    async fn write_frame(&mut self, frame: String) -> Result<(), TransportError> {
        self.0
            .send(Message::Text(frame.into()))
            .await
            .map_err(TransportError::WebSocket)
    }

    async fn close(&mut self) {
        if let Err(e) = self.0.close().await {
            trace!("WebSocket close failed: {}", e);
        }
    }
}
