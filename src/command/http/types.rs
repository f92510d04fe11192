//! Argument and parameter types used by HTTP Commands and Responses
use atat::atat_derive::AtatEnum;

/// HTTP method <method> of `+HTTPACTION`
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HttpMethod {
    Get = 0,
    Post = 1,
    Head = 2,
    Delete = 3,
    Put = 4,
}

impl HttpMethod {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Get),
            1 => Some(Self::Post),
            2 => Some(Self::Head),
            3 => Some(Self::Delete),
            4 => Some(Self::Put),
            _ => None,
        }
    }
}
