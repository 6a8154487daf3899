//! Local transport for reflection snapshot delivery.
//!
//! A producer process binds a well-known Unix domain socket and serves one
//! snapshot frame per accepted connection; the consumer connects read-only,
//! receives the frame, and disconnects. This is the lowest layer of
//! reflscope. Everything else builds on the [`IpcStream`] type provided here.

pub mod error;
pub mod traits;

#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
pub use traits::IpcStream;

#[cfg(unix)]
pub use uds::{UnixChannel, DEFAULT_CHANNEL_PATH};
