//! Reduce MAVLink `.tlog` flight recordings to structured flight summaries.
//!
//! A tlog interleaves an 8-byte timestamp with each raw MAVLink packet.
//! [`parse`] walks one fully buffered file packet-by-packet, resynchronizing
//! after corruption, decodes the handful of message types it understands
//! (GPS fixes, status alerts, attitude), and folds them into a
//! [`FlightSummary`]: time range, duration, GPS track, message count, and
//! detected incidents.
//!
//! ```no_run
//! let summary = tlogsum::parse_file("flight.tlog")?;
//! println!("{} messages, {} incidents", summary.message_count, summary.incidents.len());
//! # Ok::<(), tlogsum::ParseError>(())
//! ```

pub mod crc;
pub mod decode;
pub mod error;
pub mod framing;
mod tlog_reader;
mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::ParseError;
pub use framing::{Frame, FrameIter, PacketEnvelope};
pub use tlog_reader::{parse, parse_file, TlogReader};
pub use types::{DecodedMessage, FlightSummary, GpsPoint, Incident, Severity};
