//! `tokio_util::codec` adapter for async channels.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::checksum::ErrorCode;
use crate::deframer::{Deframe, Deframer};
use crate::error::FrameError;
use crate::framer::Framer;
use crate::stats::LinkStats;

/// Frames outgoing payloads and yields verified incoming sub-frames.
///
/// Corrupt frames are counted and skipped, so a `FramedRead` stream only
/// ends on EOF or an I/O error.
#[derive(Debug, Clone, Default)]
pub struct LinkCodec {
    framer: Framer,
    deframer: Deframer,
    stats: LinkStats,
}

impl LinkCodec {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            framer: Framer::new(code),
            deframer: Deframer::new(code),
            stats: LinkStats::default(),
        }
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }
}

impl Decoder for LinkCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let outcome = self.deframer.process_frame(src);
            self.stats.record(&outcome);
            match outcome {
                Deframe::Done(payload) => return Ok(Some(payload)),
                Deframe::Incomplete => return Ok(None),
                Deframe::Corrupt(_) => continue,
            }
        }
    }
}

impl Encoder<Bytes> for LinkCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.framer.encode_into(&item, dst);
        Ok(())
    }
}

impl Encoder<&[u8]> for LinkCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.framer.encode_into(item, dst);
        Ok(())
    }
}
