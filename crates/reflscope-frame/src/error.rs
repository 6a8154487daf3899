/// Errors that can occur during frame reading/writing.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The stream ended or errored before a full length prefix arrived.
    #[error("failed to read length")]
    LengthRead(#[source] std::io::Error),

    /// The length prefix is zero, negative, or above the payload ceiling.
    #[error("invalid data length: {0}")]
    InvalidLength(i32),

    /// The stream ended or errored before the full payload arrived.
    #[error("failed to read data")]
    DataRead(#[source] std::io::Error),

    /// The payload exceeds the configured maximum size (write side).
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The connection was closed before a complete frame was written.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,

    /// An I/O error occurred while writing a frame.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
