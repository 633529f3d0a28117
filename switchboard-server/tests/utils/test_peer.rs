use anyhow::{Context, Result, bail};
use bytes::Bytes;
use std::sync::atomic::Ordering;
use std::time::Duration;
use switchboard_core::{Envelope, EnvelopeKind};
use switchboard_server::{ServerConfig, SignalRouter, TransportError, run_session};
use tokio::task::JoinHandle;

use super::memory_transport::{MemoryRemote, memory_transport};
use super::signal_helpers::{RECV_TIMEOUT_MS, SILENCE_WINDOW_MS, join};

/// One simulated browser connected to a relay through an in-memory
/// transport.
pub struct TestPeer {
    /// The id this peer announces on join.
    pub id: String,
    remote: MemoryRemote,
    session: JoinHandle<()>,
}

impl TestPeer {
    pub fn connect(id: &str, router: &SignalRouter, config: &ServerConfig) -> Self {
        let (source, sink, remote) = memory_transport();
        let router = router.clone();
        let config = config.clone();

        let session = tokio::spawn(async move {
            run_session(router, &config, source, sink).await;
        });

        Self {
            id: id.to_string(),
            remote,
            session,
        }
    }

    pub fn send(&self, envelope: &Envelope) -> Result<()> {
        let json = envelope.encode()?;
        self.send_raw(json.as_bytes())
    }

    pub fn send_raw(&self, frame: &[u8]) -> Result<()> {
        self.remote
            .inbound
            .send(Ok(Bytes::copy_from_slice(frame)))
            .context("session already gone")
    }

    /// Joins `room` under this peer's id and waits for the confirmation.
    pub async fn join(&mut self, room: &str) -> Result<()> {
        let envelope = join(&self.id, room);
        self.send(&envelope)?;
        let reply = self.recv_kind(EnvelopeKind::Joined).await?;
        tracing::debug!("[TestPeer] {} joined {:?}", self.id, reply.room_id);
        Ok(())
    }

    pub async fn recv(&mut self) -> Result<Envelope> {
        let frame = tokio::time::timeout(
            Duration::from_millis(RECV_TIMEOUT_MS),
            self.remote.outbound.recv(),
        )
        .await
        .with_context(|| format!("{} timed out waiting for an envelope", self.id))?
        .context("outbound stream closed")?;

        Ok(Envelope::decode(frame.as_bytes())?)
    }

    pub async fn recv_kind(&mut self, kind: EnvelopeKind) -> Result<Envelope> {
        let envelope = self.recv().await?;
        if envelope.kind != kind {
            bail!("{} expected {} but got {}", self.id, kind, envelope.kind);
        }
        Ok(envelope)
    }

    /// Skips envelopes of other kinds until one of `kind` arrives.
    pub async fn recv_until(&mut self, kind: EnvelopeKind) -> Result<Envelope> {
        loop {
            let envelope = self.recv().await?;
            if envelope.kind == kind {
                return Ok(envelope);
            }
        }
    }

    /// Collects everything that arrives until the connection goes quiet.
    pub async fn drain(&mut self) -> Vec<Envelope> {
        let mut received = Vec::new();
        while let Ok(Some(frame)) = tokio::time::timeout(
            Duration::from_millis(SILENCE_WINDOW_MS),
            self.remote.outbound.recv(),
        )
        .await
        {
            match Envelope::decode(frame.as_bytes()) {
                Ok(envelope) => received.push(envelope),
                Err(e) => tracing::warn!("[TestPeer] {} got undecodable frame: {}", self.id, e),
            }
        }
        received
    }

    /// Asserts nothing arrives for a short while.
    pub async fn expect_silence(&mut self) -> Result<()> {
        let waited = tokio::time::timeout(
            Duration::from_millis(SILENCE_WINDOW_MS),
            self.remote.outbound.recv(),
        )
        .await;

        match waited {
            Err(_) | Ok(None) => Ok(()),
            Ok(Some(frame)) => bail!("{} unexpectedly received {}", self.id, frame),
        }
    }

    /// Simulates a network failure on the read side.
    pub fn fail_transport(&self) -> Result<()> {
        self.remote
            .inbound
            .send(Err(TransportError::Closed))
            .context("session already gone")
    }

    /// Breaks only the write side: the relay's next frame to this peer fails
    /// while the peer keeps its end of the inbound stream open.
    pub fn fail_outbound(&mut self) {
        self.remote.outbound.close();
    }

    pub fn transport_closed(&self) -> bool {
        self.remote.closed.load(Ordering::SeqCst)
    }

    /// Hangs up and waits until the relay has finished cleaning up.
    pub async fn disconnect(self) -> Result<()> {
        let Self {
            remote, session, ..
        } = self;
        drop(remote);
        tokio::time::timeout(Duration::from_millis(RECV_TIMEOUT_MS), session)
            .await
            .context("session did not shut down")??;
        Ok(())
    }

    /// Waits for the session task after the transport was failed.
    pub async fn wait_closed(&mut self) -> Result<()> {
        tokio::time::timeout(Duration::from_millis(RECV_TIMEOUT_MS), &mut self.session)
            .await
            .context("session did not shut down")??;
        Ok(())
    }
}
