use crate::transport::FrameSink;
use switchboard_core::{ConnectionId, Envelope};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Drains one session's outbound queue into its transport, in queue order.
///
/// Sole writer of the sink. Stops when every producer is gone and the
/// queue is empty, or on the first write failure; either way the sink is
/// closed and the queue receiver dropped, which fails any pending enqueue.
pub async fn run_delivery_pump<K: FrameSink>(
    conn_id: ConnectionId,
    mut queue: mpsc::Receiver<Envelope>,
    mut sink: K,
) {
    while let Some(envelope) = queue.recv().await {
        let frame = match envelope.encode() {
            Ok(frame) => frame,
            Err(e) => {
                error!(conn = %conn_id, kind = %envelope.kind, "Dropping envelope: {}", e);
                continue;
            }
        };

        if let Err(e) = sink.write_frame(frame).await {
            warn!(conn = %conn_id, "Write failed, stopping delivery: {}", e);
            break;
        }
    }

    queue.close();
    sink.close().await;
    debug!(conn = %conn_id, "Delivery pump finished");
}
