use switchboard_core::EnvelopeKind;
use switchboard_server::DeliveryPolicy;

use crate::integration::{create_test_relay, create_test_relay_with, init_tracing};
use crate::utils::signal;

#[tokio::test]
async fn test_rapid_message_sending() {
    init_tracing();

    let relay = create_test_relay();
    let mut alice = relay.connect("alice");
    let mut bob = relay.connect("bob");
    alice.join("r").await.unwrap();
    bob.join("r").await.unwrap();
    alice.recv_kind(EnvelopeKind::UserJoined).await.unwrap();

    let message_count = 100;
    for i in 0..message_count {
        alice
            .send(&signal(EnvelopeKind::IceCandidate, "bob", &format!("candidate {i}")))
            .unwrap();
    }

    for i in 0..message_count {
        let env = bob.recv_kind(EnvelopeKind::IceCandidate).await.unwrap();
        let expected = format!(r#""candidate {i}""#);
        assert_eq!(env.data_json(), Some(expected.as_str()), "Message {} out of order", i);
    }
    bob.expect_silence().await.unwrap();
}

/// With a tiny queue and backpressure nothing is lost; the sender just waits.
#[tokio::test]
async fn test_backpressure_loses_nothing() {
    init_tracing();

    let relay = create_test_relay_with(DeliveryPolicy::Backpressure, 2);
    let mut alice = relay.connect("alice");
    let mut bob = relay.connect("bob");
    alice.join("r").await.unwrap();
    bob.join("r").await.unwrap();
    alice.recv_kind(EnvelopeKind::UserJoined).await.unwrap();

    for i in 0..40 {
        alice
            .send(&signal(EnvelopeKind::Offer, "bob", &i.to_string()))
            .unwrap();
    }

    for i in 0..40 {
        let env = bob.recv_kind(EnvelopeKind::Offer).await.unwrap();
        let expected = format!(r#""{i}""#);
        assert_eq!(env.data_json(), Some(expected.as_str()));
    }
}
