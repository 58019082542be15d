//! Decoding of framed MAVLink packets into [`DecodedMessage`] values.
//!
//! Message identity is resolved by message-id lookup against the small
//! dictionary this crate carries (GPS_RAW_INT, GLOBAL_POSITION_INT,
//! ATTITUDE, STATUSTEXT). Recognized packets are checksum-validated with
//! the message's CRC_EXTRA seed; anything else frames as `Unknown`.

use thiserror::Error;

use crate::crc;
use crate::framing::{Frame, MAGIC_V2};
use crate::types::DecodedMessage;

pub const MSG_ID_GPS_RAW_INT: u32 = 24;
pub const MSG_ID_ATTITUDE: u32 = 30;
pub const MSG_ID_GLOBAL_POSITION_INT: u32 = 33;
pub const MSG_ID_STATUSTEXT: u32 = 253;

/// Per-message CRC seed and expected payload length from the MAVLink
/// common dictionary. `None` for ids this crate does not decode.
fn dictionary_entry(msg_id: u32) -> Option<(u8, usize)> {
    match msg_id {
        MSG_ID_GPS_RAW_INT => Some((24, 30)),
        MSG_ID_ATTITUDE => Some((39, 28)),
        MSG_ID_GLOBAL_POSITION_INT => Some((104, 28)),
        MSG_ID_STATUSTEXT => Some((83, 51)),
        _ => None,
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("checksum mismatch on message id {msg_id} (wire {wire:#06x}, computed {computed:#06x})")]
    ChecksumMismatch { msg_id: u32, wire: u16, computed: u16 },
    #[error("packet too short for its header")]
    ShortPacket,
}

fn le_u16(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

fn le_u32(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn le_u64(b: &[u8], at: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&b[at..at + 8]);
    u64::from_le_bytes(raw)
}

fn le_i32(b: &[u8], at: usize) -> i32 {
    le_u32(b, at) as i32
}

fn le_f32(b: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

/// Decode one framed packet. Unrecognized message ids yield
/// `DecodedMessage::Unknown`; a failed checksum on a recognized id is an
/// error so the caller can skip the packet.
pub fn decode(frame: &Frame<'_>) -> Result<DecodedMessage, DecodeError> {
    let bytes = frame.bytes;
    let header_len = frame.envelope.header_len();
    let payload_len = usize::from(frame.envelope.payload_len);
    if bytes.len() < header_len + payload_len + 2 {
        return Err(DecodeError::ShortPacket);
    }

    let msg_id = if frame.envelope.magic == MAGIC_V2 {
        u32::from(bytes[7]) | u32::from(bytes[8]) << 8 | u32::from(bytes[9]) << 16
    } else {
        u32::from(bytes[5])
    };

    let Some((crc_extra, expected_len)) = dictionary_entry(msg_id) else {
        return Ok(DecodedMessage::Unknown);
    };

    // Checksum covers everything after the magic and before the trailer,
    // then the dictionary's CRC_EXTRA byte.
    let crc_at = header_len + payload_len;
    let mut computed = 0xffff;
    for &b in &bytes[1..crc_at] {
        crc::accumulate(b, &mut computed);
    }
    crc::accumulate(crc_extra, &mut computed);
    let wire = le_u16(bytes, crc_at);
    if wire != computed {
        return Err(DecodeError::ChecksumMismatch { msg_id, wire, computed });
    }

    // Protocol v2 strips trailing zero payload bytes on the wire;
    // restore the dictionary length before field extraction.
    let mut payload = vec![0u8; expected_len.max(payload_len)];
    payload[..payload_len].copy_from_slice(&bytes[header_len..crc_at]);

    Ok(decode_payload(msg_id, &payload))
}

fn decode_payload(msg_id: u32, p: &[u8]) -> DecodedMessage {
    match msg_id {
        MSG_ID_GPS_RAW_INT => {
            let time_usec = le_u64(p, 0);
            gps_position(le_i32(p, 8), le_i32(p, 12), le_i32(p, 16), (time_usec != 0).then_some(time_usec))
        }
        MSG_ID_GLOBAL_POSITION_INT => {
            let time_boot_ms = le_u32(p, 0);
            let ts = (time_boot_ms != 0).then(|| u64::from(time_boot_ms) * 1000);
            gps_position(le_i32(p, 4), le_i32(p, 8), le_i32(p, 12), ts)
        }
        MSG_ID_STATUSTEXT => {
            let raw = &p[1..51];
            let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
            DecodedMessage::StatusAlert {
                text: String::from_utf8_lossy(&raw[..end]).into_owned(),
                mav_severity: p[0],
                timestamp_usec: None,
            }
        }
        MSG_ID_ATTITUDE => DecodedMessage::Attitude {
            time_boot_ms: le_u32(p, 0),
            roll: le_f32(p, 4),
            pitch: le_f32(p, 8),
            yaw: le_f32(p, 12),
            rollspeed: le_f32(p, 16),
            pitchspeed: le_f32(p, 20),
            yawspeed: le_f32(p, 24),
        },
        _ => DecodedMessage::Unknown,
    }
}

/// Wire lat/lon are 1e-7 degree fixed point, altitude is millimeters.
fn gps_position(lat: i32, lon: i32, alt: i32, timestamp_usec: Option<u64>) -> DecodedMessage {
    DecodedMessage::GpsPosition {
        lat: f64::from(lat) / 1e7,
        lon: f64::from(lon) / 1e7,
        alt: (alt != 0).then(|| f64::from(alt) / 1000.0),
        timestamp_usec,
    }
}
