use std::fs;
use std::time::Duration;

use reflscope_frame::{FrameConfig, FrameWriter};
use reflscope_transport::UnixChannel;

use crate::cmd::EmitArgs;
use crate::exit::{frame_error, io_error, transport_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::OutputFormat;

/// Serve a payload file as one frame per accepted connection.
///
/// This is the test producer: it mirrors the protocol's producer side so the
/// watch command and the integration tests have something to talk to.
pub fn run(args: EmitArgs, _format: OutputFormat) -> CliResult<i32> {
    let payload = fs::read(&args.file)
        .map_err(|err| io_error(&format!("failed reading {}", args.file.display()), err))?;
    if payload.is_empty() {
        return Err(CliError::new(USAGE, "payload file is empty"));
    }

    let channel =
        UnixChannel::bind(&args.path).map_err(|err| transport_error("bind failed", err))?;
    tracing::info!(path = ?args.path, bytes = payload.len(), "serving snapshot payload");

    let frame_config = FrameConfig {
        write_timeout: Some(Duration::from_secs(5)),
        ..FrameConfig::default()
    };

    for served in 0..args.count {
        let stream = match channel.accept() {
            Ok(stream) => stream,
            Err(err) => return Err(transport_error("accept failed", err)),
        };

        let mut writer = match FrameWriter::with_config_ipc(stream, frame_config.clone()) {
            Ok(writer) => writer,
            Err(err) => return Err(frame_error("writer setup failed", err)),
        };
        match writer.send(&payload) {
            Ok(()) => tracing::debug!(connection = served + 1, "frame served"),
            // A consumer that vanished mid-write is not fatal to the server.
            Err(err) => tracing::warn!(error = %err, "frame not delivered"),
        }
    }

    Ok(SUCCESS)
}
