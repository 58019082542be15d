//! Packet framing for the tlog container format.
//!
//! A tlog interleaves an 8-byte big-endian microsecond timestamp with each
//! raw MAVLink packet. `FrameIter` walks a fully buffered file and yields
//! one `Frame` per packet, recovering alignment byte-by-byte when the
//! expected magic is missing and stopping at a truncated trailer.

use tracing::trace;

/// MAVLink protocol v1 magic (6-byte header).
pub const MAGIC_V1: u8 = 0xfe;
/// MAVLink protocol v2 magic (10-byte header).
pub const MAGIC_V2: u8 = 0xfd;

/// Length of the timestamp the logging tool prepends to each packet.
const TIMESTAMP_LEN: usize = 8;
/// CRC trailer length.
const CRC_LEN: usize = 2;

/// The framing header preceding one MAVLink packet inside a tlog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketEnvelope {
    /// Microsecond timestamp written by the logging tool, not part of the
    /// MAVLink wire packet itself.
    pub external_timestamp_usec: u64,
    pub magic: u8,
    pub payload_len: u8,
}

impl PacketEnvelope {
    pub fn header_len(&self) -> usize {
        if self.magic == MAGIC_V2 {
            10
        } else {
            6
        }
    }

    /// Whole wire packet: header, payload, CRC trailer.
    pub fn total_len(&self) -> usize {
        self.header_len() + usize::from(self.payload_len) + CRC_LEN
    }
}

/// One framed packet: its envelope plus the full wire bytes
/// (magic through CRC inclusive).
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub envelope: PacketEnvelope,
    pub bytes: &'a [u8],
}

/// Iterator over the framed packets of a tlog buffer.
#[derive(Debug, Clone)]
pub struct FrameIter<'a> {
    buf: &'a [u8],
    cursor: usize,
}

impl<'a> FrameIter<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        FrameIter { buf, cursor: 0 }
    }

    /// Current byte offset into the buffer. After the iterator is
    /// exhausted on a clean capture this equals the buffer length.
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl<'a> Iterator for FrameIter<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Frame<'a>> {
        loop {
            // Fewer than 8 bytes left is a trailing partial timestamp.
            if self.buf.len().saturating_sub(self.cursor) < TIMESTAMP_LEN {
                return None;
            }
            let start = self.cursor + TIMESTAMP_LEN;
            let magic = *self.buf.get(start)?;
            if magic != MAGIC_V1 && magic != MAGIC_V2 {
                // Desynchronized: the true packet start may be anywhere,
                // so advance a single byte and retry.
                trace!(offset = self.cursor, byte = magic, "bad magic, resyncing");
                self.cursor += 1;
                continue;
            }
            let payload_len = *self.buf.get(start + 1)?;

            let ts_bytes: [u8; 8] = self.buf[self.cursor..start].try_into().ok()?;
            let envelope = PacketEnvelope {
                external_timestamp_usec: u64::from_be_bytes(ts_bytes),
                magic,
                payload_len,
            };

            let end = start + envelope.total_len();
            if end > self.buf.len() {
                // Truncated capture; everything framed so far stands.
                trace!(offset = start, needed = envelope.total_len(), "incomplete final packet");
                return None;
            }

            let bytes = &self.buf[start..end];
            self.cursor = end;
            return Some(Frame { envelope, bytes });
        }
    }
}
