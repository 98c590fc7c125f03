//! Loopback example: frames a payload over a socket pair and reads it back.
//!
//! Run with:
//!   cargo run --example loopback

#[cfg(unix)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::thread;

    use linkframe::frame::{ErrorCode, FrameConfig, FrameError, FrameReader, FrameWriter};
    use linkframe::transport::LinkStream;

    let (left, right) = LinkStream::pair()?;
    let config = FrameConfig::with_error_code(ErrorCode::Crc8);

    let sender = {
        let config = config.clone();
        thread::spawn(move || -> Result<(), FrameError> {
            let mut writer = FrameWriter::with_config(left, config);
            writer.send(b"hello over an unreliable link")?;
            writer.send(b"")?;
            Ok(())
        })
    };

    let mut reader = FrameReader::with_config(right, config);
    loop {
        match reader.read_frame() {
            Ok(sub_frame) => eprintln!(
                "[receiver] sub-frame ({} bytes): {}",
                sub_frame.len(),
                String::from_utf8_lossy(&sub_frame)
            ),
            Err(FrameError::ConnectionClosed) => break,
            Err(err) => return Err(err.into()),
        }
    }

    sender
        .join()
        .map_err(|_| "sender thread panicked")??;
    eprintln!(
        "[receiver] decoded={} dropped={}",
        reader.stats().frames_decoded,
        reader.stats().frames_dropped()
    );
    Ok(())
}

#[cfg(not(unix))]
fn main() {
    eprintln!("loopback example requires a Unix platform");
}
