use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reflscope_listener::{ListenerConfig, ListenerEvent, SnapshotListener};
use reflscope_transport::DEFAULT_CHANNEL_PATH;

use crate::cmd::WatchArgs;
use crate::exit::{CliError, CliResult, SUCCESS};
use crate::output::{print_snapshot, OutputFormat};

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(200);

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let path = args
        .path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CHANNEL_PATH));

    let mut listener = SnapshotListener::with_config(ListenerConfig::at_path(&path));
    let events = listener.events();

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    tracing::info!(?path, "watching snapshot channel");
    listener.start();

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        let event = match events.recv_timeout(EVENT_POLL_INTERVAL) {
            Ok(event) => event,
            Err(_) => continue,
        };

        match event {
            ListenerEvent::Snapshot(snapshot) => {
                print_snapshot(&snapshot, format);
                printed = printed.saturating_add(1);
                if let Some(count) = args.count {
                    if printed >= count {
                        break;
                    }
                }
            }
            ListenerEvent::Error(message) => {
                if args.print_errors {
                    println!("error: {message}");
                } else {
                    tracing::warn!(error = %message, "listener cycle failed");
                }
            }
        }
    }

    listener.stop();
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
