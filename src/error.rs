use crate::{
    client::Outcome, command::device_lock::types::SimStatus, registration::Status,
};

/// Broad class of a failure, in the order the driver can detect them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// The expected reply never arrived, or the link itself failed.
    Transport,
    /// The module answered with an error result, or with something unparsable.
    Protocol,
    /// Well-formed reply carrying an unacceptable value.
    Semantic,
    /// A bounded retry loop ran out of attempts.
    Retry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    // Transport errors
    Timeout,
    Io,

    // Protocol errors
    Rejected,
    Malformed,
    Overflow,

    // Semantic errors
    Sim(SimStatus),
    WeakSignal(u8),
    NotRegistered(Status),
    NoAddress,
    HttpStatus(u16),

    RetriesExhausted,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout | Self::Io => ErrorKind::Transport,
            Self::Rejected | Self::Malformed | Self::Overflow => ErrorKind::Protocol,
            Self::Sim(_)
            | Self::WeakSignal(_)
            | Self::NotRegistered(_)
            | Self::NoAddress
            | Self::HttpStatus(_) => ErrorKind::Semantic,
            Self::RetriesExhausted => ErrorKind::Retry,
        }
    }
}

impl From<Outcome> for Error {
    /// Only meaningful for unsuccessful outcomes; `Matched` maps to
    /// `Malformed` since a caller asking for an error out of a match got a
    /// reply it could not use.
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::TimedOut => Self::Timeout,
            Outcome::Io => Self::Io,
            Outcome::Rejected => Self::Rejected,
            Outcome::Overflow => Self::Overflow,
            Outcome::Matched => Self::Malformed,
        }
    }
}

impl<'a> From<nom::Err<nom::error::Error<&'a str>>> for Error {
    fn from(_: nom::Err<nom::error::Error<&'a str>>) -> Self {
        Self::Malformed
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out waiting for reply"),
            Self::Io => write!(f, "transport error"),
            Self::Rejected => write!(f, "command rejected by module"),
            Self::Malformed => write!(f, "malformed reply"),
            Self::Overflow => write!(f, "buffer overflow"),
            Self::Sim(status) => write!(f, "SIM not ready: {:?}", status),
            Self::WeakSignal(rssi) => write!(f, "signal too weak (rssi {})", rssi),
            Self::NotRegistered(status) => write!(f, "not registered: {:?}", status),
            Self::NoAddress => write!(f, "no IP address assigned"),
            Self::HttpStatus(status) => write!(f, "HTTP status {}", status),
            Self::RetriesExhausted => write!(f, "retries exhausted"),
        }
    }
}
