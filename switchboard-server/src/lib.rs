mod config;
mod error;
mod room;
mod router;
mod server;
mod session;
mod signaling;
mod transport;

pub use config::*;
pub use error::*;
pub use room::*;
pub use router::*;
pub use server::*;
pub use session::*;
pub use signaling::*;
pub use transport::*;
