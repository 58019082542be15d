use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::decode::decode;
use crate::error::ParseError;
use crate::framing::FrameIter;
use crate::types::{DecodedMessage, FlightSummary, GpsPoint, Incident, Severity};

/// How many decoded messages to keep as a diagnostic sample.
const SAMPLE_LIMIT: usize = 5;

const INCIDENT_TITLE: &str = "Status Alert";
const EMPTY_STATUS_FALLBACK: &str = "Unknown status message";

/// Walks a fully buffered tlog file and folds every decoded packet into a
/// [`FlightSummary`].
///
/// The reader borrows the buffer for the duration of one parse and owns
/// its accumulator exclusively; concurrent parses each get their own
/// reader.
pub struct TlogReader<'a> {
    buf: &'a [u8],
}

impl<'a> TlogReader<'a> {
    /// An empty buffer is the one hard failure; anything else, however
    /// garbled, yields a (possibly empty) summary.
    pub fn new(buf: &'a [u8]) -> Result<Self, ParseError> {
        if buf.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        Ok(TlogReader { buf })
    }

    /// Raw access to the framing layer, for callers that want the packet
    /// stream rather than the summary.
    pub fn frames(&self) -> FrameIter<'a> {
        FrameIter::new(self.buf)
    }

    /// Consume the whole buffer and produce the summary. Runs to
    /// completion in time proportional to the buffer length; packets that
    /// fail to decode are skipped, not fatal.
    pub fn summarize(&self) -> FlightSummary {
        let mut summary = FlightSummary::default();
        let mut min_ts: Option<u64> = None;
        let mut max_ts: Option<u64> = None;

        for frame in self.frames() {
            summary.message_count += 1;

            let msg = match decode(&frame) {
                Ok(msg) => msg,
                Err(err) => {
                    debug!(timestamp = frame.envelope.external_timestamp_usec, %err, "skipping packet");
                    continue;
                }
            };

            if let Some(ts) = msg.timestamp_usec() {
                min_ts = Some(min_ts.map_or(ts, |m| m.min(ts)));
                max_ts = Some(max_ts.map_or(ts, |m| m.max(ts)));
            }

            match &msg {
                DecodedMessage::GpsPosition { lat, lon, alt, timestamp_usec } => {
                    // Raw coordinates are trusted as-is; a zeroed lat or
                    // lon means the fix is missing.
                    if *lat != 0.0 && *lon != 0.0 {
                        summary.gps_track.push(GpsPoint {
                            lat: *lat,
                            lon: *lon,
                            alt: *alt,
                            ts: timestamp_usec.and_then(to_datetime),
                        });
                    }
                }
                DecodedMessage::StatusAlert { text, mav_severity, timestamp_usec } => {
                    summary.incidents.push(Incident {
                        title: INCIDENT_TITLE.to_string(),
                        description: if text.is_empty() {
                            EMPTY_STATUS_FALLBACK.to_string()
                        } else {
                            text.clone()
                        },
                        severity: Severity::from_mav(*mav_severity),
                        timestamp: timestamp_usec.and_then(to_datetime),
                    });
                }
                DecodedMessage::Attitude { .. } | DecodedMessage::Unknown => {}
            }

            if summary.sample_messages.len() < SAMPLE_LIMIT {
                summary.sample_messages.push(msg);
            }
        }

        summary.start_time = min_ts.and_then(to_datetime);
        summary.end_time = max_ts.and_then(to_datetime);
        if let (Some(first), Some(last)) = (min_ts, max_ts) {
            if last > first {
                summary.duration_seconds = Some((last - first) as f64 / 1e6);
            }
        }

        summary
    }
}

fn to_datetime(usec: u64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(i64::try_from(usec).ok()?)
}

/// Reduce one tlog buffer to a [`FlightSummary`].
pub fn parse(buf: &[u8]) -> Result<FlightSummary, ParseError> {
    Ok(TlogReader::new(buf)?.summarize())
}

/// Read a tlog file fully into memory and parse it.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<FlightSummary, ParseError> {
    let buf = fs::read(path)?;
    parse(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{
        global_position_payload, gps_raw_payload, record, statustext_payload, v1_packet,
    };

    #[test]
    fn empty_buffer_is_a_hard_error() {
        assert!(matches!(parse(&[]), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn non_tlog_bytes_degrade_to_an_empty_summary() {
        let summary = parse(b"definitely not telemetry").unwrap();
        assert_eq!(summary.message_count, 0);
        assert!(summary.gps_track.is_empty());
        assert!(summary.incidents.is_empty());
        assert_eq!(summary.duration_seconds, None);
    }

    #[test]
    fn duration_from_two_boot_timestamps() {
        let mut buf = Vec::new();
        buf.extend(record(
            10,
            &v1_packet(33, 104, &global_position_payload(1000, 10_000_000, 10_000_000, 0)),
        ));
        buf.extend(record(
            20,
            &v1_packet(33, 104, &global_position_payload(5500, 10_000_000, 10_000_000, 0)),
        ));
        let summary = parse(&buf).unwrap();
        assert_eq!(summary.duration_seconds, Some(4.5));
        assert!(summary.start_time.unwrap() <= summary.end_time.unwrap());
    }

    #[test]
    fn single_timestamp_leaves_duration_unset() {
        let buf = record(
            10,
            &v1_packet(33, 104, &global_position_payload(1000, 10_000_000, 10_000_000, 0)),
        );
        let summary = parse(&buf).unwrap();
        assert!(summary.start_time.is_some());
        assert_eq!(summary.start_time, summary.end_time);
        assert_eq!(summary.duration_seconds, None);
    }

    #[test]
    fn bad_checksum_counts_but_contributes_nothing() {
        let mut pkt = v1_packet(24, 24, &gps_raw_payload(1, 377_749_000, -1_224_194_200, 0));
        pkt[10] ^= 0x01; // corrupt a payload byte without touching the magic
        let buf = record(5, &pkt);
        let summary = parse(&buf).unwrap();
        assert_eq!(summary.message_count, 1);
        assert!(summary.gps_track.is_empty());
        assert!(summary.sample_messages.is_empty());
    }

    #[test]
    fn zero_coordinates_are_not_track_points() {
        let buf = record(5, &v1_packet(24, 24, &gps_raw_payload(1, 0, 200_000_000, 0)));
        let summary = parse(&buf).unwrap();
        assert_eq!(summary.message_count, 1);
        assert!(summary.gps_track.is_empty());
    }

    #[test]
    fn empty_status_text_gets_fallback_description() {
        let buf = record(5, &v1_packet(253, 83, &statustext_payload(1, "")));
        let summary = parse(&buf).unwrap();
        assert_eq!(summary.incidents.len(), 1);
        assert_eq!(summary.incidents[0].description, "Unknown status message");
        assert_eq!(summary.incidents[0].severity, Severity::Low);
    }

    #[test]
    fn sample_messages_are_capped() {
        let mut buf = Vec::new();
        for i in 0..8u32 {
            buf.extend(record(
                u64::from(i),
                &v1_packet(33, 104, &global_position_payload(i + 1, 10_000_000, 10_000_000, 0)),
            ));
        }
        let summary = parse(&buf).unwrap();
        assert_eq!(summary.message_count, 8);
        assert_eq!(summary.gps_track.len(), 8);
        assert_eq!(summary.sample_messages.len(), 5);
    }
}
