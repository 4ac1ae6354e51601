use thiserror::Error;

/// Failures surfaced to characteristic getter callers. Background fetch
/// failures never reach here; the poller logs them and keeps the last reading.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReadingError {
    /// No poll has succeeded since construction.
    #[error("device data unavailable, no status has been fetched yet")]
    DataUnavailable,
    /// The device status matched neither known firmware generation for this
    /// quantity, and no earlier reading carried it.
    #[error("device status shape not recognized for {0}")]
    UnrecognizedShape(&'static str),
}
