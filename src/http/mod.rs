//! HTTP requests through the module's own HTTP client.
//!
//! Every request starts a fresh session (`+HTTPTERM`, `+HTTPINIT`), as a
//! session left over from an earlier request can corrupt the next transfer.
//! Parameters set for a target are reused while the session state says they
//! are still valid.

mod session;

pub use session::{SessionState, Target, MAX_RESOURCE_LEN, MAX_SERVER_LEN};

use core::mem;

use atat::AtatCmd;
use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use crate::{
    client::{Command, Outcome},
    command::{
        http::{
            responses::{HttpActionResult, HttpReadHeader},
            types::HttpMethod,
            HttpAction, HttpData, HttpInit, HttpRead, HttpTerminate, SetHttpContentType,
            SetHttpContextId, SetHttpUrl,
        },
        AtResponse,
    },
    config::CellularConfig,
    error::Error,
    module_timing, CellularClient,
};

pub const NOT_FOUND: u16 = 404;

/// Outcome of a completed HTTP request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HttpResponse {
    pub status: u16,
    /// Body length announced by the module
    pub content_length: usize,
    /// Body bytes copied into the caller's buffer
    pub received: usize,
}

impl HttpResponse {
    /// Fewer bytes were read back than the module announced
    pub fn is_truncated(&self) -> bool {
        self.received < self.content_length
    }
}

pub trait Http {
    /// Restart the HTTP session and configure it for `server` + `resource`.
    fn http_init(&mut self, server: &str, resource: &str) -> Result<(), Error>;

    /// GET `server` + `resource`, reading the response body into `response`.
    fn http_get(
        &mut self,
        server: &str,
        resource: &str,
        response: &mut [u8],
    ) -> Result<HttpResponse, Error>;

    /// POST `body` to `server` + `resource`, reading the response body into
    /// `response`.
    fn http_post(
        &mut self,
        server: &str,
        resource: &str,
        body: &[u8],
        response: &mut [u8],
    ) -> Result<HttpResponse, Error>;

    /// Stop the HTTP session. No session running counts as success.
    fn http_term(&mut self) -> Result<(), Error>;
}

impl<T, D, C> Http for CellularClient<T, D, C>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
    C: CellularConfig,
{
    fn http_init(&mut self, server: &str, resource: &str) -> Result<(), Error> {
        let target = Target::new(server, resource)?;
        let res = self.init_session(target);
        self.track(res)
    }

    fn http_get(
        &mut self,
        server: &str,
        resource: &str,
        response: &mut [u8],
    ) -> Result<HttpResponse, Error> {
        self.http_init(server, resource)?;
        let res = self.request(HttpMethod::Get, &[], response);
        self.track(res)
    }

    fn http_post(
        &mut self,
        server: &str,
        resource: &str,
        body: &[u8],
        response: &mut [u8],
    ) -> Result<HttpResponse, Error> {
        self.http_init(server, resource)?;
        let res = self.request(HttpMethod::Post, body, response);
        self.track(res)
    }

    fn http_term(&mut self) -> Result<(), Error> {
        let res = self.terminate();
        if res.is_ok() {
            self.session = mem::take(&mut self.session).closed();
        }
        self.track(res)
    }
}

impl<T, D, C> CellularClient<T, D, C>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
    C: CellularConfig,
{
    /// Any failure leaves the session in need of a fresh start.
    fn track<R>(&mut self, res: Result<R, Error>) -> Result<R, Error> {
        if res.is_err() {
            self.session = mem::take(&mut self.session).failed();
        }
        res
    }

    fn terminate(&mut self) -> Result<(), Error> {
        let resp = self.at.send(&HttpTerminate)?;

        match resp.outcome() {
            // An error result means no session was running
            Outcome::Matched | Outcome::Rejected => Ok(()),
            outcome => {
                error!("HTTP terminate failed: {:?}", outcome);
                Err(outcome.into())
            }
        }
    }

    fn init_session(&mut self, target: Target) -> Result<(), Error> {
        self.terminate()?;

        if let Err(e) = self.expect_ok(&HttpInit) {
            error!("HTTP init failed: {:?}", e);
            return Err(e);
        }
        self.at.delay_ms(C::SETTLE_TIME_MS);

        self.session = mem::take(&mut self.session).opened(&target);
        if self.session.reusable_for(&target) {
            debug!("Reusing HTTP parameters");
            return Ok(());
        }

        self.set_parameter("CID", &SetHttpContextId::new(C::CONTEXT_ID))?;
        self.set_parameter(
            "URL",
            &SetHttpUrl::new(target.server(), target.resource())?,
        )?;
        if let Some(content_type) = C::CONTENT_TYPE {
            self.set_parameter("CONTENT", &SetHttpContentType::new(content_type)?)?;
        }

        self.session = mem::take(&mut self.session).configured(target);
        Ok(())
    }

    /// Set one HTTP parameter, retrying up to `PARAM_ATTEMPTS` times.
    fn set_parameter<P: AtatCmd>(&mut self, key: &str, param: &P) -> Result<(), Error> {
        let cmd = Command::from_cmd(param)?;

        for attempt in 1..=C::PARAM_ATTEMPTS {
            match self.at.execute(&cmd).check() {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(
                        "Setting HTTP parameter {} failed ({}/{}): {:?}",
                        key,
                        attempt,
                        C::PARAM_ATTEMPTS,
                        e
                    );
                    if attempt < C::PARAM_ATTEMPTS {
                        self.at.delay_ms(C::PARAM_RETRY_DELAY_MS);
                    }
                }
            }
        }

        error!("Giving up on HTTP parameter {}", key);
        Err(Error::RetriesExhausted)
    }

    fn request(
        &mut self,
        method: HttpMethod,
        body: &[u8],
        response: &mut [u8],
    ) -> Result<HttpResponse, Error> {
        if !body.is_empty() {
            self.upload(body)?;
        }

        let result = self.action(method)?;
        if result.status == NOT_FOUND {
            warn!("HTTP {:?} not found, session will be reinitialized", method);
            return Err(Error::HttpStatus(result.status));
        }

        let received = self.read_payload(result.length, response);
        Ok(HttpResponse {
            status: result.status,
            content_length: result.length,
            received,
        })
    }

    fn upload(&mut self, body: &[u8]) -> Result<(), Error> {
        let data = HttpData {
            length: u32::try_from(body.len()).map_err(|_| Error::Overflow)?,
            time_ms: module_timing::upload_window().as_millis() as u32,
        };
        let resp = self.at.send_until(&data, HttpData::PROMPT)?;
        if let Err(e) = resp.check() {
            error!("No download prompt: {:?}", e);
            return Err(e);
        }

        for (i, chunk) in body.chunks(C::UPLOAD_CHUNK_SIZE.max(1)).enumerate() {
            if i > 0 {
                self.at.delay_ms(C::UPLOAD_PACING_MS);
            }
            self.at.write_raw(chunk)?;
        }

        let ack = self
            .at
            .wait_for(HttpData::ACK, module_timing::upload_ack_timeout());
        if let Err(e) = ack.check() {
            error!("Body not acknowledged: {:?}", e);
            return Err(e);
        }

        debug!("Uploaded {} bytes", body.len());
        Ok(())
    }

    fn action(&mut self, method: HttpMethod) -> Result<HttpActionResult, Error> {
        let resp = self
            .at
            .send_until(&HttpAction { method }, HttpAction::RESULT)?;
        resp.check()?;

        let result = HttpActionResult::from_response(&resp)?;
        if result.method != method {
            error!("HTTP action answered for {:?}", result.method);
            return Err(Error::Malformed);
        }

        info!(
            "HTTP {:?}: status {}, {} bytes",
            method, result.status, result.length
        );
        Ok(result)
    }

    /// Read up to `length` body bytes into `buf`, chunk by chunk. Stops early
    /// on an error or an end of data marker, returning what was read so far.
    fn read_payload(&mut self, length: usize, buf: &mut [u8]) -> usize {
        let total = length.min(buf.len());
        if total < length {
            warn!("Response buffer holds {} of {} bytes", buf.len(), length);
        }

        let chunk = C::READ_CHUNK_SIZE.max(1);
        let mut offset = 0;

        while offset < total {
            let size = chunk.min(total - offset);
            match self.read_chunk(offset, &mut buf[offset..offset + size]) {
                Ok(0) => {
                    warn!("End of data at {} of {} bytes", offset, total);
                    break;
                }
                Ok(n) => offset += n,
                Err(e) => {
                    warn!("Read stopped at {} of {} bytes: {:?}", offset, total, e);
                    break;
                }
            }
        }

        offset
    }

    /// One `+HTTPREAD`: header line, exactly the announced data bytes, then
    /// the closing line. The data is copied as is, so it may hold anything,
    /// result codes included.
    fn read_chunk(&mut self, offset: usize, dst: &mut [u8]) -> Result<usize, Error> {
        let cmd = HttpRead {
            offset: u32::try_from(offset).map_err(|_| Error::Overflow)?,
            size: u32::try_from(dst.len()).map_err(|_| Error::Overflow)?,
        };
        let resp = self.at.send_until(&cmd, HttpRead::HEADER)?;
        resp.check()?;

        let length = match HttpReadHeader::from_response(&resp)? {
            HttpReadHeader::End => return Ok(0),
            HttpReadHeader::Data { length } => length,
        };
        if length > dst.len() {
            error!("HTTP read announced {} of {} bytes", length, dst.len());
            return Err(Error::Malformed);
        }

        self.at.read_data(
            &mut dst[..length],
            resp.ends_mid_line(),
            module_timing::read_data_timeout(),
        )?;

        // Anything but the closing line means the data was cut short
        let end = self
            .at
            .wait_for(HttpRead::HEADER, module_timing::read_end_timeout());
        match end.check().and_then(|_| HttpReadHeader::from_response(&end)) {
            Ok(HttpReadHeader::End) => Ok(length),
            _ => {
                error!("HTTP read of {} bytes not closed", length);
                Err(Error::Malformed)
            }
        }
    }
}
