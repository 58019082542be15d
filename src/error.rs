use thiserror::Error;

/// Hard failures surfaced to the caller. Malformed packet content never
/// lands here; garbled input degrades to a partial [`FlightSummary`]
/// instead.
///
/// [`FlightSummary`]: crate::FlightSummary
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty input buffer")]
    EmptyInput,

    #[error("failed to read tlog file")]
    Io(#[from] std::io::Error),
}
