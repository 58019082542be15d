//! Builders for synthetic tlog records, shared across unit tests.

use crate::crc;
use crate::framing::{MAGIC_V1, MAGIC_V2};

/// One tlog record: big-endian external timestamp followed by the packet.
pub fn record(ts_usec: u64, packet: &[u8]) -> Vec<u8> {
    let mut rec = ts_usec.to_be_bytes().to_vec();
    rec.extend_from_slice(packet);
    rec
}

fn seal(mut pkt: Vec<u8>, crc_extra: u8) -> Vec<u8> {
    let mut sum = 0xffff;
    for &b in &pkt[1..] {
        crc::accumulate(b, &mut sum);
    }
    crc::accumulate(crc_extra, &mut sum);
    pkt.extend_from_slice(&sum.to_le_bytes());
    pkt
}

pub fn v1_packet(msg_id: u8, crc_extra: u8, payload: &[u8]) -> Vec<u8> {
    let mut pkt = vec![MAGIC_V1, payload.len() as u8, 0, 1, 1, msg_id];
    pkt.extend_from_slice(payload);
    seal(pkt, crc_extra)
}

pub fn v2_packet(msg_id: u32, crc_extra: u8, payload: &[u8]) -> Vec<u8> {
    let mut pkt = vec![
        MAGIC_V2,
        payload.len() as u8,
        0,
        0,
        0,
        1,
        1,
        (msg_id & 0xff) as u8,
        ((msg_id >> 8) & 0xff) as u8,
        ((msg_id >> 16) & 0xff) as u8,
    ];
    pkt.extend_from_slice(payload);
    seal(pkt, crc_extra)
}

pub fn gps_raw_payload(time_usec: u64, lat: i32, lon: i32, alt: i32) -> Vec<u8> {
    let mut p = vec![0u8; 30];
    p[0..8].copy_from_slice(&time_usec.to_le_bytes());
    p[8..12].copy_from_slice(&lat.to_le_bytes());
    p[12..16].copy_from_slice(&lon.to_le_bytes());
    p[16..20].copy_from_slice(&alt.to_le_bytes());
    p
}

pub fn global_position_payload(time_boot_ms: u32, lat: i32, lon: i32, alt: i32) -> Vec<u8> {
    let mut p = vec![0u8; 28];
    p[0..4].copy_from_slice(&time_boot_ms.to_le_bytes());
    p[4..8].copy_from_slice(&lat.to_le_bytes());
    p[8..12].copy_from_slice(&lon.to_le_bytes());
    p[12..16].copy_from_slice(&alt.to_le_bytes());
    p
}

pub fn statustext_payload(severity: u8, text: &str) -> Vec<u8> {
    let mut p = vec![0u8; 51];
    p[0] = severity;
    p[1..1 + text.len()].copy_from_slice(text.as_bytes());
    p
}

pub fn attitude_payload(time_boot_ms: u32, angles: [f32; 6]) -> Vec<u8> {
    let mut p = vec![0u8; 28];
    p[0..4].copy_from_slice(&time_boot_ms.to_le_bytes());
    for (i, v) in angles.iter().enumerate() {
        p[4 + i * 4..8 + i * 4].copy_from_slice(&v.to_le_bytes());
    }
    p
}
