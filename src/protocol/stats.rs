use std::sync::atomic::{AtomicU64, Ordering};

use super::Error;

/// Lock-free counters kept by a [`Codec`](super::Codec).
#[derive(Debug, Default)]
pub(crate) struct CodecStats {
    frames_encoded: AtomicU64,
    frames_decoded: AtomicU64,
    checksum_failures: AtomicU64,
    unknown_messages: AtomicU64,
    truncated_frames: AtomicU64,
    other_errors: AtomicU64,
}

impl CodecStats {
    #[inline]
    pub(crate) fn record_encoded(&self) {
        self.frames_encoded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_decoded(&self) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self, error: &Error) {
        let counter = match error {
            Error::ChecksumMismatch { .. } => &self.checksum_failures,
            Error::UnknownMessageId { .. } => &self.unknown_messages,
            Error::TruncatedPayload { .. } => &self.truncated_frames,
            _ => &self.other_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_encoded: self.frames_encoded.load(Ordering::Relaxed),
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            checksum_failures: self.checksum_failures.load(Ordering::Relaxed),
            unknown_messages: self.unknown_messages.load(Ordering::Relaxed),
            truncated_frames: self.truncated_frames.load(Ordering::Relaxed),
            other_errors: self.other_errors.load(Ordering::Relaxed),
        }
    }
}

/// Copy of the codec counters at one point in time.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct StatsSnapshot {
    /// Frames produced by `encode`
    pub frames_encoded: u64,
    /// Frames that passed every check on receive
    pub frames_decoded: u64,
    pub checksum_failures: u64,
    pub unknown_messages: u64,
    /// Frames or payloads shorter than declared
    pub truncated_frames: u64,
    /// Everything else, including refused sends
    pub other_errors: u64,
}

impl StatsSnapshot {
    /// Frames rejected on receive or refused on send.
    #[must_use]
    pub fn total_errors(&self) -> u64 {
        self.checksum_failures + self.unknown_messages + self.truncated_frames + self.other_errors
    }
}
