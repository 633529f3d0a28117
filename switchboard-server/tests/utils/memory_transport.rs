use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use switchboard_server::{FrameSink, FrameSource, TransportError};
use tokio::sync::mpsc;

/// Inbound half fed by the test. Dropping the feeding sender looks like a
/// peer hang-up; sending `Err` looks like a network failure.
pub struct MemorySource {
    rx: mpsc::UnboundedReceiver<Result<Bytes, TransportError>>,
}

#[async_trait]
impl FrameSource for MemorySource {
    async fn read_frame(&mut self) -> Result<Bytes, TransportError> {
        self.rx.recv().await.unwrap_or(Err(TransportError::Closed))
    }
}

/// Outbound half that hands every written frame to the test.
pub struct MemorySink {
    tx: mpsc::UnboundedSender<String>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl FrameSink for MemorySink {
    async fn write_frame(&mut self, frame: String) -> Result<(), TransportError> {
        self.tx.send(frame).map_err(|_| TransportError::Closed)
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Test-side ends of one in-memory connection.
pub struct MemoryRemote {
    pub inbound: mpsc::UnboundedSender<Result<Bytes, TransportError>>,
    pub outbound: mpsc::UnboundedReceiver<String>,
    pub closed: Arc<AtomicBool>,
}

pub fn memory_transport() -> (MemorySource, MemorySink, MemoryRemote) {
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let closed = Arc::new(AtomicBool::new(false));

    (
        MemorySource { rx: in_rx },
        MemorySink {
            tx: out_tx,
            closed: Arc::clone(&closed),
        },
        MemoryRemote {
            inbound: in_tx,
            outbound: out_rx,
            closed,
        },
    )
}
