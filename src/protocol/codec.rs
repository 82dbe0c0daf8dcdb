//! Message codec (encode/decode)
//!
//! Free functions for one-shot use, plus [`Codec`] which bundles a shared
//! registry with configuration, sequence numbering and counters.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::{debug, trace};

use super::stats::{CodecStats, StatsSnapshot};
use super::{CodecConfig, Error, Frame, MavHeader, Message, ProtocolVersion, Registry, Result};

/// Encode a message into frame bytes
///
/// # Format
///
/// ```text
/// [HEADER (6 or 10 bytes)] [PAYLOAD (0-255)] [CHECKSUM (2 bytes)]
/// ```
///
/// # Errors
///
/// Fails if the message id is unknown to `registry`, if the id does not fit
/// the version, or if a field value does not match its definition.
pub fn encode(registry: &Registry, message: &Message, version: ProtocolVersion) -> Result<Vec<u8>> {
    Ok(Frame::pack(registry, message, version)?.to_bytes())
}

/// Decode one frame into a message
///
/// # Errors
///
/// Returns an error if:
/// - The start byte is neither `0xFE` nor `0xFD`
/// - The buffer is shorter than the declared frame
/// - The message id is not registered
/// - The checksum doesn't match
pub fn decode(registry: &Registry, bytes: &[u8]) -> Result<Message> {
    let frame = Frame::parse(bytes)?;
    frame.verify(registry)?;
    registry.dispatch(&frame)
}

/// Shared encoder/decoder bound to one registry
///
/// Safe to use from several threads at once: the registry is immutable and
/// the sequence counter and statistics are atomics.
#[derive(Debug)]
pub struct Codec {
    registry: Arc<Registry>,
    config: CodecConfig,
    sequence: AtomicU8,
    stats: CodecStats,
}

impl Codec {
    /// Create a codec with the default configuration
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, CodecConfig::default())
    }

    /// Create a codec with an explicit configuration
    #[must_use]
    pub fn with_config(registry: Arc<Registry>, config: CodecConfig) -> Self {
        Self {
            registry,
            config,
            sequence: AtomicU8::new(0),
            stats: CodecStats::default(),
        }
    }

    /// Registry in use
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Next outbound sequence number, wrapping after 255
    pub fn next_sequence(&self) -> u8 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Create a default-valued message stamped with this codec's ids and the next sequence
    pub fn new_message(&self, name: &str) -> Result<Message> {
        let header = MavHeader::new(
            self.config.system_id,
            self.config.component_id,
            self.next_sequence(),
        );
        Ok(self.registry.message(name)?.with_header(header))
    }

    /// Encode a message for the given protocol version
    pub fn encode(&self, message: &Message, version: ProtocolVersion) -> Result<Vec<u8>> {
        let result =
            Frame::pack_with_flags(&self.registry, message, version, self.config.compat_flags)
                .map(|frame| frame.to_bytes());
        match &result {
            Ok(bytes) => {
                self.stats.record_encoded();
                trace!(msgid = message.message_id(), len = bytes.len(), "encoded message");
            }
            Err(err) => {
                self.stats.record_error(err);
                debug!(msgid = message.message_id(), error = %err, "refusing to encode message");
            }
        }
        result
    }

    /// Encode a message with the configured protocol version
    pub fn send(&self, message: &Message) -> Result<Vec<u8>> {
        self.encode(message, self.config.version)
    }

    /// Decode one frame
    ///
    /// Failures are counted and logged at debug level, then returned; none
    /// of them leave the codec unusable for the next frame.
    pub fn decode(&self, bytes: &[u8]) -> Result<Message> {
        self.decode_frame(bytes).map(|(_, message)| message)
    }

    /// Decode one frame, also returning the parsed frame
    pub fn decode_frame(&self, bytes: &[u8]) -> Result<(Frame, Message)> {
        let result = self.decode_inner(bytes);
        match &result {
            Ok((frame, _)) => {
                self.stats.record_decoded();
                trace!(
                    msgid = frame.message_id(),
                    version = %frame.version(),
                    seq = frame.sequence(),
                    "decoded message"
                );
            }
            Err(err) => {
                self.stats.record_error(err);
                debug!(error = %err, len = bytes.len(), "dropping frame");
            }
        }
        result
    }

    fn decode_inner(&self, bytes: &[u8]) -> Result<(Frame, Message)> {
        let frame = Frame::parse(bytes)?;
        if frame.incompat_flags().is_signed() && !self.config.accept_signed {
            return Err(Error::UnsupportedIncompatFlags {
                flags: frame.incompat_flags().as_u8(),
            });
        }
        frame.verify(&self.registry)?;
        let message = self.registry.dispatch(&frame)?;
        Ok((frame, message))
    }

    /// Counter snapshot
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}
