mod frame_io;
mod ws_transport;

pub use frame_io::*;
pub use ws_transport::*;
