use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use linkframe_frame::{ErrorCode, FrameConfig, FrameError, FrameReader};
use linkframe_transport::UnixLink;
use tracing::info;

use crate::cmd::ListenArgs;
use crate::exit::{frame_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_record, FrameRecord, OutputFormat};

/// How often a blocked read wakes up to check for Ctrl-C.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(200);

pub fn run(args: ListenArgs, code: ErrorCode, format: OutputFormat) -> CliResult<i32> {
    let listener = UnixLink::bind(&args.path).map_err(|err| transport_error("bind failed", err))?;

    let stream = listener
        .accept()
        .map_err(|err| transport_error("accept failed", err))?;
    let config = FrameConfig {
        read_timeout: Some(STOP_POLL_INTERVAL),
        ..FrameConfig::with_error_code(code)
    };
    let mut reader = FrameReader::with_config_link(stream, config)
        .map_err(|err| frame_error("link setup failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        let payload = match reader.read_frame() {
            Ok(payload) => payload,
            Err(FrameError::ConnectionClosed) => break,
            Err(err) if is_poll_timeout(&err) => continue,
            Err(err) => return Err(frame_error("receive failed", err)),
        };

        print_record(&FrameRecord::done(printed, &payload), format);
        printed = printed.saturating_add(1);

        if args.count.is_some_and(|count| printed >= count) {
            break;
        }
    }

    let stats = reader.stats();
    info!(
        decoded = stats.frames_decoded,
        dropped = stats.frames_dropped(),
        pending = reader.buffered().len(),
        "listener finished"
    );
    Ok(SUCCESS)
}

/// A read that ran out its poll interval with no data.
fn is_poll_timeout(err: &FrameError) -> bool {
    matches!(err, FrameError::Io(io) if matches!(io.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut))
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_read_timeouts_are_polled_again() {
        assert!(is_poll_timeout(&FrameError::Io(ErrorKind::WouldBlock.into())));
        assert!(is_poll_timeout(&FrameError::Io(ErrorKind::TimedOut.into())));
        assert!(!is_poll_timeout(&FrameError::Io(ErrorKind::BrokenPipe.into())));
        assert!(!is_poll_timeout(&FrameError::ConnectionClosed));
    }
}
