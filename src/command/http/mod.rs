//! ### HTTP(S) Commands
//!
//! The module runs the HTTP client itself. A session is started with
//! `+HTTPINIT` and configured with `+HTTPPARA`. A request body is uploaded
//! with `+HTTPDATA`, and the request itself is triggered with `+HTTPACTION`.
//! The response body stays in the module, and is read back in chunks with
//! `+HTTPREAD`.

pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;
use heapless::String;
use responses::HttpActionResult;
use types::HttpMethod;

use super::{psn::types::ContextId, NoResponse};
use crate::{client::Terminator, error::Error};

/// Longest URL, server and resource together
pub const MAX_URL_LEN: usize = 256;

/// Start HTTP service +HTTPINIT
///
/// Fails with an error result if a session is already running.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+HTTPINIT", NoResponse, timeout_ms = 5000)]
pub struct HttpInit;

/// Stop HTTP service +HTTPTERM
///
/// Answers with an error result when no session is running.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+HTTPTERM", NoResponse, timeout_ms = 5000)]
pub struct HttpTerminate;

/// Set HTTP parameters value +HTTPPARA, `CID`
///
/// PDP context used for the connection. The only parameter sent unquoted.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+HTTPPARA", NoResponse, timeout_ms = 5000)]
pub struct SetHttpContextId {
    #[at_arg(position = 0, len = 7)]
    param: &'static str,
    #[at_arg(position = 1)]
    cid: ContextId,
}

impl SetHttpContextId {
    pub fn new(cid: ContextId) -> Self {
        Self { param: "CID", cid }
    }
}

/// Set HTTP parameters value +HTTPPARA, `URL`
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+HTTPPARA", NoResponse, timeout_ms = 5000)]
pub struct SetHttpUrl {
    #[at_arg(position = 0, len = 7)]
    param: &'static str,
    #[at_arg(position = 1, len = 256)]
    url: String<MAX_URL_LEN>,
}

impl SetHttpUrl {
    /// Target URL, `<server><resource>`
    pub fn new(server: &str, resource: &str) -> Result<Self, Error> {
        if server.contains('"') || resource.contains('"') {
            return Err(Error::Overflow);
        }
        let mut url = String::new();
        url.push_str(server).map_err(|_| Error::Overflow)?;
        url.push_str(resource).map_err(|_| Error::Overflow)?;
        Ok(Self { param: "URL", url })
    }
}

/// Set HTTP parameters value +HTTPPARA, `CONTENT`
///
/// `Content-Type` header of POST requests.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+HTTPPARA", NoResponse, timeout_ms = 5000)]
pub struct SetHttpContentType<'a> {
    #[at_arg(position = 0, len = 7)]
    param: &'static str,
    #[at_arg(position = 1, len = 64)]
    content_type: &'a str,
}

impl<'a> SetHttpContentType<'a> {
    pub fn new(content_type: &'a str) -> Result<Self, Error> {
        if content_type.len() > 64 || content_type.contains('"') {
            return Err(Error::Overflow);
        }
        Ok(Self {
            param: "CONTENT",
            content_type,
        })
    }
}

/// Input HTTP data +HTTPDATA
///
/// Announces a request body of `length` bytes. The module answers with a
/// `DOWNLOAD` prompt, then accepts body bytes for up to `time_ms`, and
/// acknowledges the complete body with `OK`.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+HTTPDATA", NoResponse, timeout_ms = 5000)]
pub struct HttpData {
    #[at_arg(position = 0)]
    pub length: u32,
    #[at_arg(position = 1)]
    pub time_ms: u32,
}

impl HttpData {
    /// Ends the wait right after the command
    pub const PROMPT: Terminator = Terminator::Line("DOWNLOAD");
    /// Final result following the body
    pub const ACK: Terminator = Terminator::OK;
}

/// HTTP method action +HTTPACTION
///
/// `OK` only acknowledges the request. The result arrives later as
/// `+HTTPACTION: <method>,<statuscode>,<datalen>`, once the module has
/// resolved, connected and transferred over the cellular link.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+HTTPACTION", HttpActionResult, timeout_ms = 60000)]
pub struct HttpAction {
    #[at_arg(position = 0)]
    pub method: HttpMethod,
}

impl HttpAction {
    pub const RESULT: Terminator = Terminator::Prefix("+HTTPACTION:");
}

/// Read the HTTP server response +HTTPREAD
///
/// Reads up to `size` bytes of the response body starting at `offset`. The
/// data follows a `+HTTPREAD: DATA,<len>` header as raw bytes, and is closed
/// by `+HTTPREAD: 0`. Past the end of the body only the closing line is sent.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+HTTPREAD", NoResponse, timeout_ms = 5000)]
pub struct HttpRead {
    #[at_arg(position = 0)]
    pub offset: u32,
    #[at_arg(position = 1)]
    pub size: u32,
}

impl HttpRead {
    /// The data header, or the closing line
    pub const HEADER: Terminator = Terminator::Prefix("+HTTPREAD:");
}
