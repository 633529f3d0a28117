use crate::config::{DeliveryPolicy, MAX_QUEUE_CAPACITY};
use crate::error::DeliveryError;
use switchboard_core::{ConnectionId, Envelope};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Producer side of one session's bounded outbound queue.
///
/// Any number of router operations may hold a clone; the single consumer is
/// that session's delivery pump.
#[derive(Clone, Debug)]
pub struct Outbox {
    conn_id: ConnectionId,
    tx: mpsc::Sender<Envelope>,
    policy: DeliveryPolicy,
}

impl Outbox {
    pub fn channel(
        conn_id: ConnectionId,
        capacity: usize,
        policy: DeliveryPolicy,
    ) -> (Self, mpsc::Receiver<Envelope>) {
        let (tx, rx) = mpsc::channel(capacity.clamp(1, MAX_QUEUE_CAPACITY));
        (
            Self {
                conn_id,
                tx,
                policy,
            },
            rx,
        )
    }

    pub fn conn_id(&self) -> ConnectionId {
        self.conn_id
    }

    pub async fn deliver(&self, envelope: Envelope) -> Result<(), DeliveryError> {
        match self.policy {
            DeliveryPolicy::Backpressure => self
                .tx
                .send(envelope)
                .await
                .map_err(|_| DeliveryError::Closed),
            DeliveryPolicy::DropNewest => self.tx.try_send(envelope).map_err(|e| match e {
                TrySendError::Full(_) => DeliveryError::QueueFull,
                TrySendError::Closed(_) => DeliveryError::Closed,
            }),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
