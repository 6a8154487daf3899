/// Errors that can occur while decoding a snapshot payload.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The payload ended before the value being parsed was closed.
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEnd(usize),

    /// A required delimiter was missing.
    #[error("expected '{expected}' at byte {at}")]
    Expected { expected: char, at: usize },

    /// A value started with no recognizable token.
    #[error("malformed value at byte {0}")]
    MalformedValue(usize),

    /// The payload parsed, but its root is not an object.
    #[error("snapshot root is not an object")]
    RootNotObject,
}

pub type Result<T> = std::result::Result<T, SchemaError>;
