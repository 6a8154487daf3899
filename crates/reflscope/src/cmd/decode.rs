use std::fs;
use std::io::Cursor;

use reflscope_frame::FrameReader;
use reflscope_schema::decode_snapshot;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, schema_error, CliResult, SUCCESS};
use crate::output::{print_snapshot, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = fs::read(&args.file)
        .map_err(|err| io_error(&format!("failed reading {}", args.file.display()), err))?;

    let payload = if args.framed {
        let mut reader = FrameReader::new(Cursor::new(bytes));
        reader
            .read_frame()
            .map_err(|err| frame_error("frame decode failed", err))?
            .to_vec()
    } else {
        bytes
    };

    let snapshot =
        decode_snapshot(&payload).map_err(|err| schema_error("snapshot decode failed", err))?;

    tracing::debug!(
        assembly = %snapshot.assembly_name,
        types = snapshot.types.len(),
        "payload decoded"
    );
    print_snapshot(&snapshot, format);
    Ok(SUCCESS)
}
