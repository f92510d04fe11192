//! Responses for Device lock Commands
use atat::atat_derive::AtatResp;
use nom::{combinator::rest, IResult};

use super::types::SimStatus;
use crate::command::AtResponse;

/// Enter PIN +CPIN
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatResp)]
pub struct PinStatus {
    #[at_arg(position = 0)]
    pub code: SimStatus,
}

impl AtResponse for PinStatus {
    const PREFIX: &'static str = "+CPIN:";

    fn parse_fields(input: &str) -> IResult<&str, Self> {
        let (input, code) = rest(input)?;
        Ok((
            input,
            Self {
                code: SimStatus::from_code(code),
            },
        ))
    }
}
