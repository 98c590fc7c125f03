use std::thread;

use linkframe_frame::{
    sub_frame_count, ErrorCode, FrameConfig, FrameError, FrameReader, FrameWriter, SUB_FRAME_SIZE,
};
use linkframe_transport::{LinkStream, NoiseConfig, NoisyStream};
use tracing::debug;

use crate::cmd::SimulateArgs;
use crate::exit::{frame_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE};
use crate::output::{print_simulation, OutputFormat, SimulationReport};

pub fn run(args: SimulateArgs, code: ErrorCode, format: OutputFormat) -> CliResult<i32> {
    if args.repeat == 0 {
        return Err(CliError::new(USAGE, "--repeat must be greater than zero"));
    }
    let payload = args.payload.resolve()?;
    let repeat = args.repeat;
    let noise = NoiseConfig::flip_every(args.flip_every, args.flip_bit);

    let (left, right) = LinkStream::pair().map_err(|err| transport_error("loopback failed", err))?;
    let config = FrameConfig::with_error_code(code);

    let sender = {
        let payload = payload.clone();
        let config = config.clone();
        thread::spawn(move || -> Result<usize, FrameError> {
            let mut writer = FrameWriter::with_config(NoisyStream::new(left, noise), config);
            for _ in 0..repeat {
                writer.send(&payload)?;
            }
            let noisy = writer.into_inner();
            let flipped = noisy.flipped();
            noisy
                .get_ref()
                .shutdown_write()
                .map_err(|err| FrameError::Io(std::io::Error::other(err.to_string())))?;
            Ok(flipped)
        })
    };

    let sub_frames: Vec<&[u8]> = if payload.is_empty() {
        vec![&payload[..]]
    } else {
        payload.chunks(SUB_FRAME_SIZE).collect()
    };

    let mut reader = FrameReader::with_config(right, config);
    let mut undetected = 0u64;
    loop {
        match reader.read_frame() {
            Ok(received) => {
                if !sub_frames.contains(&received.as_ref()) {
                    debug!(size = received.len(), "damaged frame passed the checksum");
                    undetected += 1;
                }
            }
            Err(FrameError::ConnectionClosed) => break,
            Err(err) => return Err(frame_error("receive failed", err)),
        }
    }

    let bytes_flipped = sender
        .join()
        .map_err(|_| CliError::new(INTERNAL, "sender thread panicked"))?
        .map_err(|err| frame_error("send failed", err))?;

    let stats = reader.stats();
    let report = SimulationReport {
        error_code: code.name(),
        frames_sent: (repeat * sub_frame_count(payload.len())) as u64,
        bytes_flipped,
        frames_decoded: stats.frames_decoded,
        frames_dropped: stats.frames_dropped(),
        undetected,
    };
    print_simulation(&report, format);
    Ok(SUCCESS)
}
