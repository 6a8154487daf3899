//! Length-prefixed snapshot framing.
//!
//! One frame per connection cycle. Wire format:
//! - A 4-byte signed little-endian payload length
//! - `length` bytes of payload text
//!
//! No magic bytes, no checksum, no trailing data. The length prefix must
//! satisfy `0 < length <= 100 MiB`; anything else is rejected before a body
//! read is attempted.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{encode_frame, FrameConfig, LENGTH_PREFIX_LEN, MAX_PAYLOAD};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
