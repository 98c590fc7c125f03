use linkframe_frame::{create_frame, sub_frame_count, ErrorCode};
use tracing::debug;

use crate::cmd::EncodeArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, code: ErrorCode, format: OutputFormat) -> CliResult<i32> {
    let payload = args.payload.resolve()?;
    let wire = create_frame(&payload, code);
    debug!(payload = payload.len(), wire = wire.len(), %code, "payload framed");

    print_encoded(&wire, payload.len(), sub_frame_count(payload.len()), code, format);
    Ok(SUCCESS)
}
