mod client_session;
mod connection;
mod delivery_pump;
mod member;
mod outbox;

pub use client_session::*;
pub use connection::*;
pub use delivery_pump::*;
pub use member::*;
pub use outbox::*;
