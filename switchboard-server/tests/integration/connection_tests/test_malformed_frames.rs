use switchboard_core::{Envelope, EnvelopeKind, RoomId};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::join;

#[tokio::test]
async fn test_malformed_frames_are_skipped() {
    init_tracing();

    let relay = create_test_relay();
    let mut alice = relay.connect("alice");

    alice.send_raw(b"{not json").unwrap();
    alice.send_raw(br#"{"from":"alice"}"#).unwrap();
    alice.send_raw(b"").unwrap();

    alice.send(&join("alice", "r")).unwrap();
    alice
        .recv_kind(EnvelopeKind::Joined)
        .await
        .expect("Session should survive bad frames");
}

#[tokio::test]
async fn test_join_without_room_is_ignored() {
    init_tracing();

    let relay = create_test_relay();
    let mut alice = relay.connect("alice");

    alice
        .send(&Envelope::new(EnvelopeKind::Join).with_from("alice"))
        .unwrap();
    alice.send_raw(br#"{"type":"join","from":"alice","roomId":""}"#).unwrap();
    alice.expect_silence().await.expect("No error reply");
    assert!(relay.registry().is_empty());

    alice.join("r").await.expect("Still able to join");
    assert!(relay.registry().contains(&RoomId::from("r")));
}

#[tokio::test]
async fn test_unknown_type_is_ignored() {
    init_tracing();

    let relay = create_test_relay();
    let mut alice = relay.connect("alice");
    let mut bob = relay.connect("bob");
    alice.join("r").await.unwrap();
    bob.join("r").await.unwrap();
    alice.recv_kind(EnvelopeKind::UserJoined).await.unwrap();

    alice
        .send_raw(br#"{"type":"chat","to":"bob","data":"hello"}"#)
        .unwrap();
    alice
        .send_raw(br#"{"type":"user-left","from":"bob"}"#)
        .unwrap();

    bob.expect_silence().await.expect("Unknown types are not forwarded");
    alice.expect_silence().await.expect("No reply to unknown types");
}
