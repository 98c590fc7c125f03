use linkframe_frame::{ErrorCode, SUB_FRAME_SIZE};
use tracing::warn;

use crate::cmd::ChecksumArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_checksum, OutputFormat};

pub fn run(args: ChecksumArgs, code: ErrorCode, format: OutputFormat) -> CliResult<i32> {
    let data = args.payload.resolve()?;
    if data.len() > SUB_FRAME_SIZE {
        warn!(
            size = data.len(),
            "input is longer than one sub-frame; checksum covers all of it"
        );
    }
    print_checksum(&data, code, format);
    Ok(SUCCESS)
}
