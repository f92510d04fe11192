mod matcher;
mod response;

pub use response::{Outcome, Response, RESPONSE_CAPACITY};

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};
use heapless::String;

use atat::AtatCmd;

use crate::{error::Error, fmt::lossy};

/// Longest command line that can be sent, excluding the line ending
pub const MAX_COMMAND_LEN: usize = 384;

/// Line that ends the wait for a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Terminator {
    /// A line equal to the token. Also matches when the token is the
    /// unterminated tail of the reply, as prompts like `DOWNLOAD` may arrive
    /// without a line ending.
    Line(&'static str),
    /// A complete line starting with the token, e.g. `+HTTPACTION:`
    Prefix(&'static str),
}

impl Terminator {
    pub const OK: Self = Self::Line("OK");

    fn matches_line(&self, line: &[u8]) -> bool {
        match self {
            Self::Line(token) => line == token.as_bytes(),
            Self::Prefix(token) => line.starts_with(token.as_bytes()),
        }
    }

    fn matches_tail(&self, tail: &[u8]) -> bool {
        matches!(self, Self::Line(token) if tail == token.as_bytes())
    }
}

/// A single command line, with the terminator and time bound of its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    line: String<MAX_COMMAND_LEN>,
    terminator: Terminator,
    timeout: Duration,
}

impl Command {
    pub fn new(line: &str, terminator: Terminator, timeout: Duration) -> Result<Self, Error> {
        Ok(Self {
            line: String::try_from(line).map_err(|_| Error::Overflow)?,
            terminator,
            timeout,
        })
    }

    /// Line of an `atat` command, waiting for `OK` within the command's own
    /// timeout.
    pub fn from_cmd<C: AtatCmd>(cmd: &C) -> Result<Self, Error> {
        let mut buf = [0u8; MAX_COMMAND_LEN + 2];
        if C::MAX_LEN > buf.len() {
            return Err(Error::Overflow);
        }

        let len = cmd.write(&mut buf);
        let bytes = buf[..len]
            .strip_suffix(b"\r\n")
            .or_else(|| buf[..len].strip_suffix(b"\r"))
            .unwrap_or(&buf[..len]);
        let line = core::str::from_utf8(bytes).map_err(|_| Error::Malformed)?;

        Self::new(
            line,
            Terminator::OK,
            Duration::from_millis(C::MAX_TIMEOUT_MS.into()),
        )
    }

    /// Wait for `terminator` instead
    #[must_use]
    pub fn until(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn line(&self) -> &str {
        self.line.as_str()
    }

    pub fn terminator(&self) -> Terminator {
        self.terminator
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Command executor owning the serial link to the module.
///
/// Exactly one command is in flight at a time: every method takes `&mut self`
/// and returns only once the reply wait has finished.
pub struct AtClient<T, D> {
    transport: T,
    delay: D,
    poll_interval_ms: u32,
}

impl<T, D> AtClient<T, D>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
{
    pub fn new(transport: T, delay: D, poll_interval_ms: u32) -> Self {
        Self {
            transport,
            delay,
            poll_interval_ms,
        }
    }

    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    #[cfg(test)]
    pub(crate) fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Discard bytes left unread in the transport, e.g. late replies to an
    /// earlier command. Returns the number of bytes dropped.
    pub fn flush_input(&mut self) -> Result<usize, Error> {
        let mut scratch = [0u8; 32];
        let mut discarded = 0;

        while self.transport.read_ready().map_err(|_| Error::Io)? {
            let n = self.transport.read(&mut scratch).map_err(|_| Error::Io)?;
            if n == 0 {
                break;
            }
            discarded += n;
        }

        Ok(discarded)
    }

    /// Send `cmd` and wait for its reply.
    ///
    /// Never fails by itself: the [`Outcome`] of the returned [`Response`]
    /// tells whether the terminator arrived.
    pub fn execute(&mut self, cmd: &Command) -> Response {
        match self.flush_input() {
            Ok(0) => {}
            Ok(n) => debug!("Discarded {} stale bytes", n),
            Err(_) => return Response::empty(Outcome::Io),
        }

        debug!("Sending: [{}]", cmd.line());

        if self.write_line(cmd.line()).is_err() {
            error!("Failed to write [{}]", cmd.line());
            return Response::empty(Outcome::Io);
        }

        let resp = self.wait_for(cmd.terminator, cmd.timeout);
        trace!("Received {:?}: [{}]", resp.outcome(), lossy(resp.as_bytes()));
        resp
    }

    /// Build the line for `cmd` and [`execute`](Self::execute) it.
    pub fn send<C: AtatCmd>(&mut self, cmd: &C) -> Result<Response, Error> {
        let cmd = Command::from_cmd(cmd)?;
        Ok(self.execute(&cmd))
    }

    /// As [`send`](Self::send), ending the wait on `terminator` instead of `OK`.
    pub fn send_until<C: AtatCmd>(
        &mut self,
        cmd: &C,
        terminator: Terminator,
    ) -> Result<Response, Error> {
        let cmd = Command::from_cmd(cmd)?.until(terminator);
        Ok(self.execute(&cmd))
    }

    /// Wait for a further reply without sending anything first.
    pub fn wait_for(&mut self, terminator: Terminator, timeout: Duration) -> Response {
        matcher::wait_for(
            &mut self.transport,
            &mut self.delay,
            self.poll_interval_ms,
            terminator,
            timeout,
        )
    }

    /// Read exactly `dst.len()` raw bytes, e.g. the data following a
    /// `+HTTPREAD` header. See [`Response::ends_mid_line`] for `skip_lf`.
    pub fn read_data(
        &mut self,
        dst: &mut [u8],
        skip_lf: bool,
        timeout: Duration,
    ) -> Result<(), Error> {
        match matcher::read_exact(
            &mut self.transport,
            &mut self.delay,
            self.poll_interval_ms,
            dst,
            skip_lf,
            timeout,
        ) {
            Outcome::Matched => Ok(()),
            outcome => Err(outcome.into()),
        }
    }

    /// Write raw bytes, e.g. a request body after a `DOWNLOAD` prompt.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.transport.write_all(bytes).map_err(|_| Error::Io)?;
        self.transport.flush().map_err(|_| Error::Io)
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms)
    }

    fn write_line(&mut self, line: &str) -> Result<(), Error> {
        self.transport
            .write_all(line.as_bytes())
            .map_err(|_| Error::Io)?;
        self.write_raw(b"\r\n")
    }
}
