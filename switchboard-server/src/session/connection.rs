use crate::config::ServerConfig;
use crate::error::TransportError;
use crate::router::SignalRouter;
use crate::session::{ClientSession, Outbox, run_delivery_pump};
use crate::transport::{FrameSink, FrameSource};
use switchboard_core::{ConnectionId, Envelope};
use tracing::{debug, error, info, warn};

/// Drives one accepted connection from accept to teardown.
///
/// Two tasks per connection: this one reads, decodes and routes; a spawned
/// delivery pump is the only writer. When either side ends, the session's
/// room membership is cleaned up, the queue is drained and the transport
/// closed.
pub async fn run_session<S, K>(router: SignalRouter, config: &ServerConfig, mut source: S, sink: K)
where
    S: FrameSource,
    K: FrameSink + 'static,
{
    let conn_id = ConnectionId::new();
    let (outbox, queue) = Outbox::channel(conn_id, config.queue_capacity, config.delivery);
    let mut session = ClientSession::new(outbox);

    info!(conn = %conn_id, "New connection");

    let mut pump = tokio::spawn(run_delivery_pump(conn_id, queue, sink));

    let pump_finished = tokio::select! {
        _ = read_loop(&router, &mut session, &mut source) => false,
        _ = &mut pump => {
            warn!(conn = %conn_id, "Delivery stopped before the peer hung up");
            true
        }
    };

    router.disconnect(&mut session).await;
    // Last producer owned by this connection; the pump drains and exits.
    drop(session);

    if !pump_finished {
        if let Err(e) = pump.await {
            error!(conn = %conn_id, "Delivery pump panicked: {}", e);
        }
    }

    info!(conn = %conn_id, "Connection closed");
}

async fn read_loop<S: FrameSource>(
    router: &SignalRouter,
    session: &mut ClientSession,
    source: &mut S,
) {
    let conn_id = session.conn_id();

    loop {
        let frame = match source.read_frame().await {
            Ok(frame) => frame,
            Err(TransportError::Closed) => {
                debug!(conn = %conn_id, "Peer closed the connection");
                return;
            }
            Err(e) => {
                warn!(conn = %conn_id, "Read failed: {}", e);
                return;
            }
        };

        let envelope = match Envelope::decode(&frame) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(conn = %conn_id, "Discarding frame: {}", e);
                continue;
            }
        };

        debug!(
            conn = %conn_id,
            kind = %envelope.kind,
            from = ?envelope.from,
            "Received envelope"
        );

        if let Err(e) = router.route(session, envelope).await {
            warn!(conn = %conn_id, "Dropped envelope: {}", e);
        }
    }
}
