pub use switchboard_core::model::{ClientId, RoomId};

pub mod model {
    pub use switchboard_core::model::*;
    pub use switchboard_core::EnvelopeError;
}

#[cfg(feature = "server")]
pub mod server {
    pub use switchboard_server::*;
}
