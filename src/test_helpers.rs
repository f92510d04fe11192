//! Scripted module used by the unit tests.

use core::convert::Infallible;
use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::Rc,
    string::{String, ToString},
    vec::Vec,
};

use embedded_hal::delay::DelayNs;
use embedded_io::{ErrorType, Read, ReadReady, Write};

use crate::{config::CellularConfig, CellularClient};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Records every millisecond delay into a shared log
#[derive(Clone, Default)]
pub struct RecordingDelay(Rc<RefCell<Vec<u32>>>);

impl RecordingDelay {
    pub fn delays(&self) -> Vec<u32> {
        self.0.borrow().clone()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(ms);
    }
}

/// Small chunks, so chunking shows up with short payloads
pub struct TestConfig;

impl CellularConfig for TestConfig {
    const PARAM_ATTEMPTS: u8 = 3;
    const PARAM_RETRY_DELAY_MS: u32 = 0;
    const SETTLE_TIME_MS: u32 = 0;
    const UPLOAD_CHUNK_SIZE: usize = 16;
    const UPLOAD_PACING_MS: u32 = 0;
    const READ_CHUNK_SIZE: usize = 64;
    const POLL_INTERVAL_MS: u32 = 1;
}

pub fn client(modem: FakeModem) -> CellularClient<FakeModem, NoopDelay, TestConfig> {
    init_logger();
    CellularClient::new(modem, NoopDelay)
}

struct Rule {
    pattern: String,
    exact: bool,
    /// Replies in order. The last one is repeated.
    replies: VecDeque<Vec<u8>>,
}

impl Rule {
    fn matches(&self, line: &str) -> bool {
        if self.exact {
            line == self.pattern
        } else {
            line.starts_with(&self.pattern)
        }
    }

    fn next_reply(&mut self) -> Vec<u8> {
        if self.replies.len() > 1 {
            self.replies.pop_front().unwrap_or_default()
        } else {
            self.replies.front().cloned().unwrap_or_default()
        }
    }
}

enum Payload {
    None,
    Fixed(Vec<u8>),
    /// Serve the last uploaded body
    Echo,
}

/// Transport side of a simulated module.
///
/// Replies are scripted per command line. `+HTTPDATA`, `+HTTPACTION` and
/// `+HTTPREAD` are answered from the served payload unless a rule overrides
/// them. Commands without a reply stay unanswered.
pub struct FakeModem {
    rules: Vec<Rule>,
    rx: VecDeque<u8>,
    line: Vec<u8>,
    commands: Vec<String>,
    bodies: Vec<Vec<u8>>,
    upload: Option<(usize, Vec<u8>)>,
    upload_writes: Vec<usize>,
    echo: bool,
    status: u16,
    payload: Payload,
}

impl FakeModem {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            rx: VecDeque::new(),
            line: Vec::new(),
            commands: Vec::new(),
            bodies: Vec::new(),
            upload: None,
            upload_writes: Vec::new(),
            echo: false,
            status: 200,
            payload: Payload::None,
        }
    }

    /// A module that answers the bring-up and HTTP session commands
    pub fn bring_up() -> Self {
        Self::new()
            .on("AT", "\r\nOK\r\n")
            .on("AT+CPIN?", "\r\n+CPIN: READY\r\n\r\nOK\r\n")
            .on("AT+CSQ", "\r\n+CSQ: 20,99\r\n\r\nOK\r\n")
            .on("AT+CGREG?", "\r\n+CGREG: 0,1\r\n\r\nOK\r\n")
            .on("AT+CNMP=38", "\r\nOK\r\n")
            .on("AT+COPS=0", "\r\nOK\r\n")
            .on("AT+CGATT=1", "\r\nOK\r\n")
            .on_prefix("AT+CGDCONT=", "\r\nOK\r\n")
            .on("AT+CGACT?", "\r\n+CGACT: 1,0\r\n\r\nOK\r\n")
            .on("AT+CGACT=1,1", "\r\nOK\r\n")
            .on("AT+CGPADDR=1", "\r\n+CGPADDR: 1,10.0.0.5\r\n\r\nOK\r\n")
            .on("AT+HTTPTERM", "\r\nOK\r\n")
            .on("AT+HTTPINIT", "\r\nOK\r\n")
            .on_prefix("AT+HTTPPARA=", "\r\nOK\r\n")
    }

    /// Answer `line` with `reply`, replacing any earlier rule for it
    pub fn on(self, line: &str, reply: &str) -> Self {
        self.on_seq(line, &[reply])
    }

    /// Answer `line` with `replies` in order, repeating the last one
    pub fn on_seq(mut self, line: &str, replies: &[&str]) -> Self {
        self.rules.retain(|rule| !(rule.exact && rule.pattern == line));
        self.rules.insert(
            0,
            Rule {
                pattern: line.to_string(),
                exact: true,
                replies: replies.iter().map(|r| r.as_bytes().to_vec()).collect(),
            },
        );
        self
    }

    /// Answer every line starting with `prefix`. Exact rules win.
    pub fn on_prefix(mut self, prefix: &str, reply: &str) -> Self {
        self.rules.push(Rule {
            pattern: prefix.to_string(),
            exact: false,
            replies: VecDeque::from([reply.as_bytes().to_vec()]),
        });
        self
    }

    /// Echo command lines back, as with `ATE1`
    pub fn with_echo(mut self) -> Self {
        self.echo = true;
        self
    }

    /// Answer HTTP actions with `status` and serve `payload` as response body
    pub fn serve(mut self, status: u16, payload: &[u8]) -> Self {
        self.status = status;
        self.payload = Payload::Fixed(payload.to_vec());
        self
    }

    /// Answer HTTP actions with 200 and serve back the last uploaded body
    pub fn echo_body(mut self) -> Self {
        self.status = 200;
        self.payload = Payload::Echo;
        self
    }

    pub fn serve_status(&mut self, status: u16) {
        self.status = status;
    }

    /// Queue bytes as if the module had sent them unprompted
    pub fn inject(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    /// Every command line received, in order
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Number of command lines starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.commands
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .count()
    }

    /// Every request body uploaded with `+HTTPDATA`
    pub fn bodies(&self) -> &[Vec<u8>] {
        &self.bodies
    }

    /// Size of every write made while a body was being uploaded
    pub fn upload_writes(&self) -> &[usize] {
        &self.upload_writes
    }

    fn payload(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::None => None,
            Payload::Fixed(payload) => Some(payload),
            Payload::Echo => self.bodies.last().map(Vec::as_slice),
        }
    }

    fn receive(&mut self, byte: u8) {
        if let Some((len, body)) = self.upload.as_mut() {
            body.push(byte);
            if body.len() == *len {
                self.finish_upload();
            }
            return;
        }

        if byte == b'\n' {
            let line = String::from_utf8_lossy(&self.line)
                .trim_end_matches('\r')
                .to_string();
            self.line.clear();
            if !line.is_empty() {
                self.handle(line);
            }
        } else {
            self.line.push(byte);
        }
    }

    fn finish_upload(&mut self) {
        if let Some((_, body)) = self.upload.take() {
            self.bodies.push(body);
            self.rx.extend(b"\r\nOK\r\n");
        }
    }

    fn handle(&mut self, line: String) {
        if self.echo {
            self.rx.extend(line.as_bytes());
            self.rx.push_back(b'\r');
        }

        let rule = self
            .rules
            .iter_mut()
            .filter(|rule| rule.matches(&line))
            .min_by_key(|rule| !rule.exact);

        if let Some(rule) = rule {
            let reply = rule.next_reply();
            self.rx.extend(reply);
        } else if let Some(args) = line.strip_prefix("AT+HTTPDATA=") {
            self.start_upload(args);
        } else if let Some(args) = line.strip_prefix("AT+HTTPACTION=") {
            self.action(args);
        } else if let Some(args) = line.strip_prefix("AT+HTTPREAD=") {
            self.read(args);
        }

        self.commands.push(line);
    }

    fn start_upload(&mut self, args: &str) {
        let Some(len) = args.split(',').next().and_then(|len| len.parse().ok()) else {
            self.rx.extend(b"\r\nERROR\r\n");
            return;
        };

        self.rx.extend(b"\r\nDOWNLOAD\r\n");
        self.upload = Some((len, Vec::new()));
        if len == 0 {
            self.finish_upload();
        }
    }

    fn action(&mut self, method: &str) {
        let Some(len) = self.payload().map(<[u8]>::len) else {
            return;
        };
        let reply = std::format!(
            "\r\nOK\r\n\r\n+HTTPACTION: {},{},{}\r\n",
            method,
            self.status,
            len
        );
        self.rx.extend(reply.as_bytes());
    }

    fn read(&mut self, args: &str) {
        let mut args = args.split(',').map(|arg| arg.parse::<usize>().ok());
        let (Some(Some(offset)), Some(Some(size))) = (args.next(), args.next()) else {
            self.rx.extend(b"\r\nERROR\r\n");
            return;
        };
        let Some(payload) = self.payload() else {
            self.rx.extend(b"\r\nERROR\r\n");
            return;
        };

        let start = offset.min(payload.len());
        let end = (offset + size).min(payload.len());
        let data = payload[start..end].to_vec();

        let mut reply = Vec::new();
        reply.extend_from_slice(b"\r\nOK\r\n");
        if !data.is_empty() {
            reply.extend_from_slice(
                std::format!("\r\n+HTTPREAD: DATA,{}\r\n", data.len()).as_bytes(),
            );
            reply.extend_from_slice(&data);
        }
        reply.extend_from_slice(b"\r\n+HTTPREAD: 0\r\n");
        self.rx.extend(reply);
    }
}

impl ErrorType for FakeModem {
    type Error = Infallible;
}

impl Read for FakeModem {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.rx.len());
        for (dst, src) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }
}

impl ReadReady for FakeModem {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.rx.is_empty())
    }
}

impl Write for FakeModem {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.upload.is_some() {
            self.upload_writes.push(buf.len());
        }
        for byte in buf {
            self.receive(*byte);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn send(modem: &mut FakeModem, line: &str) -> Vec<u8> {
        modem.write_all(line.as_bytes()).unwrap();
        modem.write_all(b"\r\n").unwrap();
        modem.rx.drain(..).collect()
    }

    #[test]
    fn scripted_replies() {
        let mut modem = FakeModem::new()
            .on_seq("AT+X", &["\r\nERROR\r\n", "\r\nOK\r\n"])
            .on_prefix("AT+", "\r\n+PREFIX\r\n");

        assert_eq!(send(&mut modem, "AT+X"), b"\r\nERROR\r\n");
        assert_eq!(send(&mut modem, "AT+X"), b"\r\nOK\r\n");
        assert_eq!(send(&mut modem, "AT+X"), b"\r\nOK\r\n");
        assert_eq!(send(&mut modem, "AT+Y"), b"\r\n+PREFIX\r\n");
        assert_eq!(send(&mut modem, "ATI"), b"");
        assert_eq!(modem.count("AT+X"), 3);
    }

    #[test]
    fn served_read() {
        let mut modem = FakeModem::new().serve(200, b"hello world");

        assert_eq!(
            send(&mut modem, "AT+HTTPACTION=0"),
            b"\r\nOK\r\n\r\n+HTTPACTION: 0,200,11\r\n"
        );
        assert_eq!(
            send(&mut modem, "AT+HTTPREAD=6,64"),
            b"\r\nOK\r\n\r\n+HTTPREAD: DATA,5\r\nworld\r\n+HTTPREAD: 0\r\n"
        );
        assert_eq!(
            send(&mut modem, "AT+HTTPREAD=11,64"),
            b"\r\nOK\r\n\r\n+HTTPREAD: 0\r\n"
        );
    }

    #[test]
    fn upload_writes() {
        let mut modem = FakeModem::new();

        assert_eq!(send(&mut modem, "AT+HTTPDATA=6,1000"), b"\r\nDOWNLOAD\r\n");
        modem.write_all(b"abc").unwrap();
        modem.write_all(b"def").unwrap();

        assert_eq!(modem.upload_writes(), &[3, 3]);
        assert_eq!(modem.bodies(), &[b"abcdef".to_vec()]);
    }
}
