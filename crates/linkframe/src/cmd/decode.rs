use bytes::BytesMut;
use linkframe_frame::{Deframe, Deframer, ErrorCode, LinkStats};

use crate::cmd::DecodeArgs;
use crate::exit::{CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_decoded, FrameRecord, OutputFormat};

pub fn run(args: DecodeArgs, code: ErrorCode, format: OutputFormat) -> CliResult<i32> {
    let wire = args.wire.resolve()?;
    let mut buf = BytesMut::from(wire.as_slice());

    let (records, payloads, stats) = drain(&Deframer::new(code), &mut buf);
    print_decoded(&records, &payloads, &stats, buf.len(), code, format);

    if stats.frames_dropped() > 0 {
        Ok(DATA_INVALID)
    } else {
        Ok(SUCCESS)
    }
}

/// Run the deframer until it needs more bytes.
fn drain(deframer: &Deframer, buf: &mut BytesMut) -> (Vec<FrameRecord>, Vec<u8>, LinkStats) {
    let mut records = Vec::new();
    let mut payloads = Vec::new();
    let mut stats = LinkStats::default();

    loop {
        let outcome = deframer.process_frame(buf);
        stats.record(&outcome);
        match outcome {
            Deframe::Done(payload) => {
                records.push(FrameRecord::done(records.len(), &payload));
                payloads.extend_from_slice(&payload);
            }
            Deframe::Corrupt(reason) => records.push(FrameRecord::corrupt(records.len(), &reason)),
            Deframe::Incomplete => return (records, payloads, stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use linkframe_frame::create_frame;

    use super::*;

    #[test]
    fn drains_frames_and_counts_drops() {
        let mut buf = BytesMut::from(&create_frame(b"0123456789", ErrorCode::Crc8)[..]);
        buf.extend_from_slice(b"{}{par");

        let (records, payloads, stats) = drain(&Deframer::new(ErrorCode::Crc8), &mut buf);
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].status, "corrupt");
        assert_eq!(payloads, b"0123456789");
        assert_eq!(stats.frames_decoded, 2);
        assert_eq!(stats.malformed, 1);
        assert_eq!(buf.as_ref(), b"{par");
    }
}
