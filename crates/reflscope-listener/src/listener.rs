use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use reflscope_frame::{FrameConfig, FrameReader};
use reflscope_schema::{decode_snapshot, AssemblySnapshot};
use reflscope_transport::UnixChannel;
use tracing::{debug, trace};

use crate::config::ListenerConfig;
use crate::error::ListenerError;
use crate::event::ListenerEvent;

/// Listener lifecycle states, observable via [`SnapshotListener::state`].
///
/// Best-effort instantaneous snapshot: reading `Connected` is no guarantee
/// the next cycle succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ListenerState {
    Idle = 0,
    Connecting = 1,
    Connected = 2,
    AwaitingRetry = 3,
    Stopped = 4,
}

struct StateCell(AtomicU8);

impl StateCell {
    fn new(state: ListenerState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    fn store(&self, state: ListenerState) {
        self.0.store(state as u8, Ordering::Release);
    }

    fn load(&self) -> ListenerState {
        match self.0.load(Ordering::Acquire) {
            1 => ListenerState::Connecting,
            2 => ListenerState::Connected,
            3 => ListenerState::AwaitingRetry,
            4 => ListenerState::Stopped,
            _ => ListenerState::Idle,
        }
    }
}

/// Background listener driving the connect / read / decode / teardown cycle.
///
/// One dedicated thread owns the connection for its whole lifetime; at most
/// one connection and one in-flight decode exist at any time. Results are
/// pushed onto an unbounded single-consumer channel obtained from
/// [`SnapshotListener::events`].
pub struct SnapshotListener {
    config: ListenerConfig,
    state: Arc<StateCell>,
    events_tx: Sender<ListenerEvent>,
    events_rx: Receiver<ListenerEvent>,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SnapshotListener {
    /// Listener on the well-known channel path with default cadence.
    pub fn new() -> Self {
        Self::with_config(ListenerConfig::default())
    }

    /// Listener with explicit configuration.
    pub fn with_config(config: ListenerConfig) -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            config,
            state: Arc::new(StateCell::new(ListenerState::Idle)),
            events_tx,
            events_rx,
            stop_tx: None,
            handle: None,
        }
    }

    /// The event receiver. Intended for a single consumer; events arrive in
    /// cycle-completion order and never overlap.
    pub fn events(&self) -> Receiver<ListenerEvent> {
        self.events_rx.clone()
    }

    /// Spawn the listener thread. Calling while already running is a no-op.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            debug!("listener already running");
            return;
        }

        let (stop_tx, stop_rx) = unbounded();
        let config = self.config.clone();
        let state = Arc::clone(&self.state);
        let events = self.events_tx.clone();

        debug!(path = ?config.channel_path, "starting listener");
        self.stop_tx = Some(stop_tx);
        self.handle = Some(std::thread::spawn(move || {
            run(config, state, events, stop_rx)
        }));
    }

    /// Signal the loop to exit and join the thread.
    ///
    /// Cooperative: an in-progress frame read runs to completion (bounded by
    /// the configured read timeout), interval waits are woken immediately.
    /// After this returns no further event is produced. Idempotent.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        drop(self.stop_tx.take());
        let _ = handle.join();
        self.state.store(ListenerState::Stopped);
    }

    /// Whether the last observed state is `Connected`.
    pub fn is_connected(&self) -> bool {
        self.state.load() == ListenerState::Connected
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ListenerState {
        self.state.load()
    }
}

impl Default for SnapshotListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SnapshotListener {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(
    config: ListenerConfig,
    state: Arc<StateCell>,
    events: Sender<ListenerEvent>,
    stop_rx: Receiver<()>,
) {
    loop {
        if stop_requested(&stop_rx) {
            break;
        }

        state.store(ListenerState::Connecting);
        match UnixChannel::connect(&config.channel_path) {
            Ok(stream) => {
                state.store(ListenerState::Connected);
                debug!("channel connected");

                match read_and_decode(stream, &config) {
                    Ok(snapshot) => {
                        debug!(
                            assembly = %snapshot.assembly_name,
                            types = snapshot.types.len(),
                            "snapshot decoded"
                        );
                        let _ = events.send(ListenerEvent::Snapshot(snapshot));
                    }
                    Err(err) => {
                        debug!(error = %err, "cycle failed");
                        let _ = events.send(ListenerEvent::Error(err.to_string()));
                    }
                }

                // The stream was torn down inside read_and_decode; one frame
                // per connection, success or not.
                state.store(ListenerState::AwaitingRetry);
                if wait_or_stop(&stop_rx, config.cycle_interval) {
                    break;
                }
            }
            Err(err) => {
                trace!(error = %err, "connect attempt failed");
                let _ = events.send(ListenerEvent::Error(err.to_string()));
                state.store(ListenerState::AwaitingRetry);
                if wait_or_stop(&stop_rx, config.retry_interval) {
                    break;
                }
            }
        }
    }
    state.store(ListenerState::Stopped);
    debug!("listener stopped");
}

/// One cycle: read exactly one frame, decode it, drop the connection.
fn read_and_decode(
    stream: reflscope_transport::IpcStream,
    config: &ListenerConfig,
) -> Result<AssemblySnapshot, ListenerError> {
    let frame_config = FrameConfig {
        max_payload_size: config.max_payload_size,
        read_timeout: config.read_timeout,
        write_timeout: None,
    };
    let mut reader = FrameReader::with_config_ipc(stream, frame_config)?;
    let payload = reader.read_frame()?;
    Ok(decode_snapshot(&payload)?)
}

fn stop_requested(stop_rx: &Receiver<()>) -> bool {
    !matches!(stop_rx.try_recv(), Err(TryRecvError::Empty))
}

/// Wait out an interval, returning true if stop was signalled meanwhile.
fn wait_or_stop(stop_rx: &Receiver<()>, interval: Duration) -> bool {
    !matches!(
        stop_rx.recv_timeout(interval),
        Err(RecvTimeoutError::Timeout)
    )
}
