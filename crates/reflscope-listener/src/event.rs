use reflscope_schema::AssemblySnapshot;

/// One delivery from the listener thread.
///
/// Events arrive strictly in the order their cycles completed and never
/// overlap. A delivered snapshot is owned by the consumer; the listener
/// keeps no reference to it.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenerEvent {
    /// A frame was received and decoded.
    Snapshot(AssemblySnapshot),
    /// A connect, read, or top-level decode failure. Human-readable
    /// diagnostic, not a structured code.
    Error(String),
}
