//! AT Commands for SIMCom SIM7500/SIM7600 series modules
//!
//! Commands are `atat` structs carrying their own argument layout and timeout.
//! Information responses additionally implement [`AtResponse`], parsing the
//! fields following their `+XXX:` prefix out of a matched reply.

pub mod device_lock;
pub mod http;
pub mod network_service;
pub mod psn;

use atat::atat_derive::{AtatCmd, AtatResp};
use nom::{combinator::all_consuming, IResult};

use crate::{client::Response, error::Error};

/// An information response line, `<PREFIX> <fields>`
pub trait AtResponse: Sized {
    const PREFIX: &'static str;

    /// Parse everything following the prefix
    fn parse_fields(input: &str) -> IResult<&str, Self>;

    fn from_line(line: &str) -> Result<Self, Error> {
        let fields = line
            .strip_prefix(Self::PREFIX)
            .ok_or(Error::Malformed)?
            .trim();
        let (_, value) = all_consuming(Self::parse_fields)(fields)?;
        Ok(value)
    }

    /// Parse the first line of `resp` carrying [`Self::PREFIX`]
    fn from_response(resp: &Response) -> Result<Self, Error> {
        Self::from_line(resp.info(Self::PREFIX).ok_or(Error::Malformed)?)
    }
}

#[derive(Clone, AtatResp)]
pub struct NoResponse;

/// Attention: checks that the module answers at all
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("", NoResponse, timeout_ms = 5000)]
pub struct AT;

#[cfg(test)]
pub(crate) fn line<C: atat::AtatCmd>(cmd: &C) -> std::string::String {
    use std::string::ToString;

    crate::client::Command::from_cmd(cmd)
        .unwrap()
        .line()
        .to_string()
}
