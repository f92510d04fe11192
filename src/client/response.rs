use heapless::Vec;

use crate::error::Error;

/// Capacity of the reply accumulator
pub const RESPONSE_CAPACITY: usize = 1024;

/// How a wait for a reply ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// The expected terminator line arrived
    Matched,
    /// The module answered with a final error result (`ERROR`, `+CME ERROR`)
    Rejected,
    TimedOut,
    /// The accumulator filled up before the terminator arrived
    Overflow,
    /// The transport reported an error
    Io,
}

/// Raw reply to a single command, together with how the wait for it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    buf: Vec<u8, RESPONSE_CAPACITY>,
    outcome: Outcome,
}

impl Response {
    pub(crate) fn new(buf: Vec<u8, RESPONSE_CAPACITY>, outcome: Outcome) -> Self {
        Self { buf, outcome }
    }

    pub(crate) fn empty(outcome: Outcome) -> Self {
        Self::new(Vec::new(), outcome)
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_matched(&self) -> bool {
        self.outcome == Outcome::Matched
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// `Ok` if the terminator arrived, otherwise the error matching the
    /// outcome.
    pub fn check(&self) -> Result<(), Error> {
        match self.outcome {
            Outcome::Matched => Ok(()),
            outcome => Err(outcome.into()),
        }
    }

    /// Non-empty lines of the reply, split on CR and LF.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.buf
            .split(|b| *b == b'\r' || *b == b'\n')
            .filter(|line| !line.is_empty())
    }

    /// Whether any complete line equals `token`
    pub fn has_line(&self, token: &str) -> bool {
        self.lines().any(|line| line == token.as_bytes())
    }

    /// Information lines starting with `prefix`, e.g. `+CGACT:`
    pub fn info_lines<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.lines()
            .filter(move |line| line.starts_with(prefix.as_bytes()))
            .filter_map(|line| core::str::from_utf8(line).ok())
    }

    /// First information line starting with `prefix`
    pub fn info<'a>(&'a self, prefix: &'a str) -> Option<&'a str> {
        self.info_lines(prefix).next()
    }

    /// Whether the wait ended on the `\r` of a line, so the `\n` closing it
    /// is still pending in the transport.
    pub fn ends_mid_line(&self) -> bool {
        self.buf.last() == Some(&b'\r')
    }
}
