use std::path::PathBuf;
use std::time::Duration;

use reflscope_frame::MAX_PAYLOAD;
use reflscope_transport::DEFAULT_CHANNEL_PATH;

/// Controls listener cadence and limits.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Channel path to connect to. Default: the well-known rendezvous.
    pub channel_path: PathBuf,
    /// Pause after a failed connect attempt.
    pub retry_interval: Duration,
    /// Pause after a completed cycle (success or failure) before the next
    /// connect attempt.
    pub cycle_interval: Duration,
    /// Maximum accepted frame payload.
    pub max_payload_size: usize,
    /// Read timeout for the frame read; bounds how long `stop()` can be
    /// delayed by a connected but silent producer.
    pub read_timeout: Option<Duration>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            channel_path: PathBuf::from(DEFAULT_CHANNEL_PATH),
            retry_interval: Duration::from_secs(1),
            cycle_interval: Duration::from_millis(500),
            max_payload_size: MAX_PAYLOAD,
            read_timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl ListenerConfig {
    /// Config pointing at an explicit channel path, defaults otherwise.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            channel_path: path.into(),
            ..Self::default()
        }
    }
}
