//! Responses for Packet Switched Data Services Commands
use core::str::FromStr;

use atat::atat_derive::AtatResp;
use no_std_net::Ipv4Addr;
use nom::{
    branch::alt,
    bytes::complete::is_not,
    character::complete::{char, u8},
    combinator::{map_res, opt, rest},
    sequence::{delimited, preceded, separated_pair, terminated},
    IResult,
};

use super::types::{ContextId, GPRSNetworkRegistrationStat, PDPContextStatus};
use crate::command::AtResponse;

/// GPRS network registration status +CGREG
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatResp)]
pub struct GPRSNetworkRegistrationStatus {
    /// Unsolicited result code mode
    #[at_arg(position = 0)]
    pub n: u8,
    #[at_arg(position = 1)]
    pub stat: GPRSNetworkRegistrationStat,
}

impl AtResponse for GPRSNetworkRegistrationStatus {
    const PREFIX: &'static str = "+CGREG:";

    fn parse_fields(input: &str) -> IResult<&str, Self> {
        // Location and access technology fields may follow, depending on <n>
        let (input, (n, stat)) =
            terminated(separated_pair(u8, char(','), u8), opt(preceded(char(','), rest)))(
                input,
            )?;
        Ok((
            input,
            Self {
                n,
                stat: GPRSNetworkRegistrationStat::from_code(stat),
            },
        ))
    }
}

/// PDP context activate or deactivate +CGACT
///
/// One line per defined context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatResp)]
pub struct PDPContextState {
    #[at_arg(position = 0)]
    pub cid: ContextId,
    #[at_arg(position = 1)]
    pub status: PDPContextStatus,
}

impl AtResponse for PDPContextState {
    const PREFIX: &'static str = "+CGACT:";

    fn parse_fields(input: &str) -> IResult<&str, Self> {
        let (input, (cid, status)) = separated_pair(u8, char(','), u8)(input)?;
        let status = if status == 1 {
            PDPContextStatus::Activated
        } else {
            PDPContextStatus::Deactivated
        };
        Ok((
            input,
            Self {
                cid: ContextId(cid),
                status,
            },
        ))
    }
}

/// Show PDP address +CGPADDR
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatResp)]
pub struct PDPAddress {
    #[at_arg(position = 0)]
    pub cid: ContextId,
    #[at_arg(position = 1)]
    pub ip: Ipv4Addr,
}

fn ipv4(input: &str) -> IResult<&str, Ipv4Addr> {
    map_res(
        alt((delimited(char('"'), is_not("\""), char('"')), is_not(","))),
        Ipv4Addr::from_str,
    )(input)
}

impl AtResponse for PDPAddress {
    const PREFIX: &'static str = "+CGPADDR:";

    fn parse_fields(input: &str) -> IResult<&str, Self> {
        // Dual stack contexts append the IPv6 address
        let (input, (cid, ip)) =
            terminated(separated_pair(u8, char(','), ipv4), opt(preceded(char(','), rest)))(
                input,
            )?;
        Ok((
            input,
            Self {
                cid: ContextId(cid),
                ip,
            },
        ))
    }
}
