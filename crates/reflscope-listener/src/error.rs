/// Failures of one listener cycle.
///
/// Every variant is transient: the cycle that produced it is abandoned and
/// the loop carries on. Display text is forwarded verbatim to the consumer
/// as the error event.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// The channel could not be opened this cycle.
    #[error(transparent)]
    Connect(#[from] reflscope_transport::TransportError),

    /// The frame could not be read (short prefix, invalid length, truncated
    /// payload).
    #[error(transparent)]
    Frame(#[from] reflscope_frame::FrameError),

    /// The payload could not be decoded at the top level.
    #[error(transparent)]
    Decode(#[from] reflscope_schema::SchemaError),
}

pub type Result<T> = std::result::Result<T, ListenerError>;
