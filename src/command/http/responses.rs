//! Responses for HTTP Commands
use atat::atat_derive::AtatResp;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, i64, u16, u8},
    combinator::{map, map_opt, map_res, value},
    sequence::{preceded, tuple},
    IResult,
};

use super::types::HttpMethod;
use crate::command::AtResponse;

/// Result of an HTTP request, reported by `+HTTPACTION` once the transfer
/// with the server is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HttpActionResult {
    #[at_arg(position = 0)]
    pub method: HttpMethod,
    /// HTTP status code, or a 6xx code for module side failures
    #[at_arg(position = 1)]
    pub status: u16,
    /// Length of the response body held by the module
    #[at_arg(position = 2)]
    pub length: usize,
}

impl AtResponse for HttpActionResult {
    const PREFIX: &'static str = "+HTTPACTION:";

    fn parse_fields(input: &str) -> IResult<&str, Self> {
        let (input, (method, status, length)) = tuple((
            map_opt(u8, HttpMethod::from_tag),
            preceded(char(','), u16),
            preceded(char(','), map_res(i64, usize::try_from)),
        ))(input)?;

        Ok((
            input,
            Self {
                method,
                status,
                length,
            },
        ))
    }
}

/// `+HTTPREAD` line: either the header of a data chunk, or the line closing
/// the read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HttpReadHeader {
    /// `DATA,<len>`: exactly `length` raw bytes follow the line
    Data { length: usize },
    /// `0`: no more data for this read
    End,
}

impl AtResponse for HttpReadHeader {
    const PREFIX: &'static str = "+HTTPREAD:";

    fn parse_fields(input: &str) -> IResult<&str, Self> {
        alt((
            map(
                preceded(tag("DATA,"), map_res(i64, usize::try_from)),
                |length| Self::Data { length },
            ),
            value(Self::End, char('0')),
        ))(input)
    }
}
