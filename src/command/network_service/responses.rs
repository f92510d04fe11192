//! Responses for Network service Commands
use atat::atat_derive::AtatResp;
use nom::{
    character::complete::{char, u8},
    sequence::separated_pair,
    IResult,
};

use crate::command::AtResponse;

/// Signal quality +CSQ
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalQuality {
    /// Received signal strength indication, 0..=31, 99 if unknown
    #[at_arg(position = 0)]
    pub rssi: u8,
    /// Channel bit error rate, 0..=7, 99 if unknown
    #[at_arg(position = 1)]
    pub ber: u8,
}

impl SignalQuality {
    pub const UNKNOWN: u8 = 99;

    /// Signal strength in dBm, as defined in 3GPP TS 27.007
    pub fn dbm(&self) -> Option<i16> {
        match self.rssi {
            0..=31 => Some(-113 + 2 * i16::from(self.rssi)),
            _ => None,
        }
    }
}

impl AtResponse for SignalQuality {
    const PREFIX: &'static str = "+CSQ:";

    fn parse_fields(input: &str) -> IResult<&str, Self> {
        let (input, (rssi, ber)) = separated_pair(u8, char(','), u8)(input)?;
        Ok((input, Self { rssi, ber }))
    }
}
