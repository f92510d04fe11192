//! Line framed reply matching.
//!
//! Bytes are accumulated one at a time and framed into lines on CR/LF. A
//! reply is complete once a whole line satisfies the [`Terminator`], or a
//! final error result shows up. Matching whole lines keeps echoed command
//! lines, which contain the command name, from ending a wait early.
//! Error results are only recognised on complete lines.

use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady};
use heapless::Vec;

use super::{
    response::{Outcome, Response},
    Terminator,
};

const ERROR: &[u8] = b"ERROR";
const CME_ERROR: &[u8] = b"+CME ERROR";
const CMS_ERROR: &[u8] = b"+CMS ERROR";

fn is_error_line(line: &[u8]) -> bool {
    line == ERROR || line.starts_with(CME_ERROR) || line.starts_with(CMS_ERROR)
}

/// Incremental classifier fed with the accumulator after every new byte.
struct LineFramer {
    terminator: Terminator,
    line_start: usize,
}

impl LineFramer {
    fn new(terminator: Terminator) -> Self {
        Self {
            terminator,
            line_start: 0,
        }
    }

    fn feed(&mut self, buf: &[u8]) -> Option<Outcome> {
        let (&last, head) = buf.split_last()?;

        if last == b'\r' || last == b'\n' {
            let line = &head[self.line_start.min(head.len())..];
            self.line_start = buf.len();

            if line.is_empty() {
                None
            } else if self.terminator.matches_line(line) {
                Some(Outcome::Matched)
            } else if is_error_line(line) {
                Some(Outcome::Rejected)
            } else {
                None
            }
        } else {
            let tail = &buf[self.line_start..];
            self.terminator
                .matches_tail(tail)
                .then_some(Outcome::Matched)
        }
    }
}

/// Poll `transport` until `terminator` arrives, an error result arrives, or
/// `timeout` elapses. Sleeps `poll_interval_ms` whenever no byte is pending.
pub(crate) fn wait_for<T, D>(
    transport: &mut T,
    delay: &mut D,
    poll_interval_ms: u32,
    terminator: Terminator,
    timeout: Duration,
) -> Response
where
    T: Read + ReadReady,
    D: DelayNs,
{
    let start = Instant::now();
    let mut buf = Vec::new();
    let mut framer = LineFramer::new(terminator);

    loop {
        if start.elapsed() > timeout {
            return Response::new(buf, Outcome::TimedOut);
        }

        let ready = match transport.read_ready() {
            Ok(ready) => ready,
            Err(_) => return Response::new(buf, Outcome::Io),
        };

        if ready {
            let mut byte = [0u8; 1];
            match transport.read(&mut byte) {
                Ok(1) => {
                    if buf.push(byte[0]).is_err() {
                        return Response::new(buf, Outcome::Overflow);
                    }
                    if let Some(outcome) = framer.feed(&buf) {
                        return Response::new(buf, outcome);
                    }
                    continue;
                }
                Ok(_) => {}
                Err(_) => return Response::new(buf, Outcome::Io),
            }
        }

        delay.delay_ms(poll_interval_ms);
    }
}

/// Read exactly `dst.len()` raw bytes, without any line framing.
///
/// With `skip_lf`, a single leading `\n` is dropped first. That is the rest
/// of a header line whose match ended on its `\r`.
pub(crate) fn read_exact<T, D>(
    transport: &mut T,
    delay: &mut D,
    poll_interval_ms: u32,
    dst: &mut [u8],
    mut skip_lf: bool,
    timeout: Duration,
) -> Outcome
where
    T: Read + ReadReady,
    D: DelayNs,
{
    let start = Instant::now();
    let mut filled = 0;

    while filled < dst.len() {
        if start.elapsed() > timeout {
            return Outcome::TimedOut;
        }

        let ready = match transport.read_ready() {
            Ok(ready) => ready,
            Err(_) => return Outcome::Io,
        };

        if ready {
            let mut byte = [0u8; 1];
            match transport.read(&mut byte) {
                Ok(1) => {
                    if core::mem::take(&mut skip_lf) && byte[0] == b'\n' {
                        continue;
                    }
                    dst[filled] = byte[0];
                    filled += 1;
                    continue;
                }
                Ok(_) => {}
                Err(_) => return Outcome::Io,
            }
        }

        delay.delay_ms(poll_interval_ms);
    }

    Outcome::Matched
}
