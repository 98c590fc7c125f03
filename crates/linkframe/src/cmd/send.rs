use linkframe_frame::{sub_frame_count, ErrorCode, FrameConfig, FrameWriter};
use linkframe_transport::{NoiseConfig, NoisyStream, UnixLink};
use tracing::info;

use crate::cmd::SendArgs;
use crate::exit::{frame_error, transport_error, CliResult, SUCCESS};

pub fn run(args: SendArgs, code: ErrorCode) -> CliResult<i32> {
    let payload = args.payload.resolve()?;

    let stream =
        UnixLink::connect(&args.path).map_err(|err| transport_error("connect failed", err))?;
    let noisy = NoisyStream::new(stream, NoiseConfig::flip_every(args.flip_every, 0));
    let mut writer = FrameWriter::with_config(noisy, FrameConfig::with_error_code(code));

    writer
        .send(&payload)
        .map_err(|err| frame_error("send failed", err))?;

    let noisy = writer.into_inner();
    info!(
        payload = payload.len(),
        sub_frames = sub_frame_count(payload.len()),
        flipped = noisy.flipped(),
        %code,
        "payload sent"
    );
    noisy
        .get_ref()
        .shutdown_write()
        .map_err(|err| transport_error("shutdown failed", err))?;

    Ok(SUCCESS)
}
