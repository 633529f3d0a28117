
use tracing::Level;

use switchboard_server::{DeliveryPolicy, RoomRegistry, ServerConfig, SignalRouter};

use crate::utils::TestPeer;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A relay with its own registry, so tests never share rooms.
pub struct TestRelay {
    pub router: SignalRouter,
    pub config: ServerConfig,
}

impl TestRelay {
    pub fn connect(&self, id: &str) -> TestPeer {
        TestPeer::connect(id, &self.router, &self.config)
    }

    pub fn registry(&self) -> &RoomRegistry {
        self.router.registry()
    }
}

pub fn create_test_relay() -> TestRelay {
    create_test_relay_with(ServerConfig::default().delivery, 256)
}

pub fn create_test_relay_with(delivery: DeliveryPolicy, queue_capacity: usize) -> TestRelay {
    TestRelay {
        router: SignalRouter::new(RoomRegistry::new()),
        config: ServerConfig {
            queue_capacity,
            delivery,
            ..Default::default()
        },
    }
}
