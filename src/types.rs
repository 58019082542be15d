use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Incident severity derived from the MAVLink STATUSTEXT severity scale
/// (0-7, higher = worse). The cut points are fixed:
/// `>= 4` is high, `2..=3` is medium, everything below is low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn from_mav(mav_severity: u8) -> Self {
        if mav_severity >= 4 {
            Severity::High
        } else if mav_severity >= 2 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// One point of the flight's GPS track, in degrees / meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub lat: f64,
    pub lon: f64,
    pub alt: Option<f64>,
    pub ts: Option<DateTime<Utc>>,
}

/// An operational alert recovered from a STATUSTEXT message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub timestamp: Option<DateTime<Utc>>,
}

/// A MAVLink message reduced to the fields this crate understands.
///
/// Packets that frame correctly but carry an unrecognized message id become
/// `Unknown`; they count toward the message total but contribute nothing
/// else to the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecodedMessage {
    Unknown,
    GpsPosition {
        /// Degrees (wire value is 1e-7 degree fixed point).
        lat: f64,
        /// Degrees.
        lon: f64,
        /// Meters (wire value is millimeters).
        alt: Option<f64>,
        timestamp_usec: Option<u64>,
    },
    StatusAlert {
        text: String,
        mav_severity: u8,
        timestamp_usec: Option<u64>,
    },
    Attitude {
        time_boot_ms: u32,
        /// Radians.
        roll: f32,
        pitch: f32,
        yaw: f32,
        /// Radians per second.
        rollspeed: f32,
        pitchspeed: f32,
        yawspeed: f32,
    },
}

impl DecodedMessage {
    /// Best timestamp this message carries, in microseconds. Explicit epoch
    /// microsecond fields win; boot-relative millisecond counters are
    /// converted; messages with neither yield `None`.
    pub fn timestamp_usec(&self) -> Option<u64> {
        match self {
            DecodedMessage::GpsPosition { timestamp_usec, .. } => *timestamp_usec,
            DecodedMessage::StatusAlert { timestamp_usec, .. } => *timestamp_usec,
            DecodedMessage::Attitude { time_boot_ms, .. } => {
                if *time_boot_ms == 0 {
                    None
                } else {
                    Some(u64::from(*time_boot_ms) * 1000)
                }
            }
            DecodedMessage::Unknown => None,
        }
    }
}

/// The structured result of reducing one tlog buffer.
///
/// `gps_track` and `incidents` each hold at most one entry per framed
/// packet, in packet order. `start_time <= end_time` whenever both are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightSummary {
    /// Every successfully framed packet, decoded or not.
    pub message_count: u64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<f64>,
    pub gps_track: Vec<GpsPoint>,
    pub incidents: Vec<Incident>,
    /// First few decoded messages, kept for diagnostics.
    pub sample_messages: Vec<DecodedMessage>,
}
