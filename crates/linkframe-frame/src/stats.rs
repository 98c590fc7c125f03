use crate::deframer::Deframe;
use crate::error::Corruption;

/// Running counters for a receiving link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub frames_decoded: u64,
    pub checksum_mismatches: u64,
    pub malformed: u64,
    pub oversized: u64,
}

impl LinkStats {
    /// Count one deframer outcome. `Incomplete` is not counted.
    pub fn record(&mut self, outcome: &Deframe) {
        match outcome {
            Deframe::Done(_) => self.frames_decoded += 1,
            Deframe::Incomplete => {}
            Deframe::Corrupt(reason) => self.record_corruption(reason),
        }
    }

    pub fn record_corruption(&mut self, reason: &Corruption) {
        match reason {
            Corruption::Malformed => self.malformed += 1,
            Corruption::ChecksumMismatch { .. } => self.checksum_mismatches += 1,
            Corruption::OversizedSubFrame { .. } => self.oversized += 1,
        }
    }

    /// Frames dropped for any reason.
    pub fn frames_dropped(&self) -> u64 {
        self.checksum_mismatches + self.malformed + self.oversized
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn counts_each_outcome() {
        let mut stats = LinkStats::default();
        stats.record(&Deframe::Done(Bytes::from_static(b"a")));
        stats.record(&Deframe::Incomplete);
        stats.record(&Deframe::Corrupt(Corruption::Malformed));
        stats.record(&Deframe::Corrupt(Corruption::ChecksumMismatch {
            expected: 1,
            received: 0,
        }));
        stats.record(&Deframe::Corrupt(Corruption::OversizedSubFrame { len: 10 }));

        assert_eq!(stats.frames_decoded, 1);
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.checksum_mismatches, 1);
        assert_eq!(stats.oversized, 1);
        assert_eq!(stats.frames_dropped(), 3);
    }
}
