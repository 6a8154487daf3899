//! Reflection snapshot inspection over local IPC.
//!
//! reflscope receives serialized type-metadata snapshots from a running
//! process over a well-known Unix domain socket, decodes them with a
//! schema-tolerant parser, and makes them available for inspection.
//!
//! # Crate Structure
//!
//! - [`transport`] — Unix domain socket transport and the well-known channel
//! - [`frame`] — 4-byte length-prefixed snapshot framing
//! - [`schema`] — generic value grammar + allow-list projection into the
//!   reflection model
//! - [`listener`] — background connect/read/decode loop with channel-based
//!   event delivery

/// Re-export transport types.
pub mod transport {
    pub use reflscope_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use reflscope_frame::*;
}

/// Re-export schema and model types.
pub mod schema {
    pub use reflscope_schema::*;
}

/// Re-export listener types.
pub mod listener {
    pub use reflscope_listener::*;
}
