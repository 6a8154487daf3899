use std::io::{ErrorKind, Read};

use bytes::Bytes;
use reflscope_transport::IpcStream;
use tracing::trace;

use crate::codec::{validate_length, FrameConfig, LENGTH_PREFIX_LEN};
use crate::error::{FrameError, Result};

/// Reads one length-prefixed frame from any `Read` stream.
///
/// The frame is all-or-nothing: either the complete payload is returned, or
/// an error — no partial payload is ever handed to the decoder.
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Read one complete frame (blocking) and return its payload.
    ///
    /// 1. Reads exactly 4 bytes as a signed little-endian length prefix.
    /// 2. Validates `0 < length <= max_payload_size` before any body read.
    /// 3. Reads exactly `length` bytes, accumulating partial reads.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        let mut prefix = [0u8; LENGTH_PREFIX_LEN];
        read_full(&mut self.inner, &mut prefix).map_err(FrameError::LengthRead)?;

        let raw_length = i32::from_le_bytes(prefix);
        let length = validate_length(raw_length, self.config.max_payload_size)?;
        trace!(length, "frame header read");

        let mut payload = vec![0u8; length];
        read_full(&mut self.inner, &mut payload).map_err(FrameError::DataRead)?;

        Ok(Bytes::from(payload))
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameReader<IpcStream> {
    /// Create a frame reader for `IpcStream` and apply read timeout from config.
    pub fn with_config_ipc(inner: IpcStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}

/// Fill `buf` completely, retrying `Interrupted` and treating EOF as
/// `UnexpectedEof`.
fn read_full<T: Read>(inner: &mut T, buf: &mut [u8]) -> std::io::Result<()> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match inner.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "stream closed mid-frame",
                ))
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

fn transport_to_frame_error(err: reflscope_transport::TransportError) -> FrameError {
    match err {
        reflscope_transport::TransportError::Io(io)
        | reflscope_transport::TransportError::Accept(io) => FrameError::Io(io),
        reflscope_transport::TransportError::Bind { source, .. }
        | reflscope_transport::TransportError::Connect { source, .. } => FrameError::Io(source),
        other => FrameError::Io(std::io::Error::other(other.to_string())),
    }
}
