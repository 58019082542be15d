//! MAVLink packet checksum (X.25 / CRC-16-MCRF4XX).
//!
//! The checksum covers every packet byte after the magic and before the
//! trailing CRC, plus a per-message CRC_EXTRA seed byte taken from the
//! protocol dictionary.

/// Fold one byte into a running X.25 checksum.
pub fn accumulate(byte: u8, crc: &mut u16) {
    let mut tmp = byte ^ (*crc & 0xff) as u8;
    tmp ^= tmp << 4;
    *crc = (*crc >> 8) ^ (u16::from(tmp) << 8) ^ (u16::from(tmp) << 3) ^ (u16::from(tmp) >> 4);
}

/// X.25 checksum of a byte slice, initialized to 0xffff.
pub fn x25(data: &[u8]) -> u16 {
    let mut crc = 0xffff;
    for &b in data {
        accumulate(b, &mut crc);
    }
    crc
}
