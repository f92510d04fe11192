//! Argument and parameter types used by Packet Switched Data Services Commands and Responses
use atat::atat_derive::{AtatEnum, AtatLen};
use serde::{Deserialize, Serialize};

/// PDP context identifier <cid>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AtatLen)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContextId(pub u8);

/// Packet data protocol type <PDP_type>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PdpType {
    Ip,
    Ipv6,
    Ipv4v6,
}

impl PdpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ip => "IP",
            Self::Ipv6 => "IPV6",
            Self::Ipv4v6 => "IPV4V6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GPRSAttachedState {
    Detached = 0,
    Attached = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PDPContextStatus {
    Deactivated = 0,
    Activated = 1,
}

/// Packet domain registration status <stat> of `+CGREG`
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GPRSNetworkRegistrationStat {
    /// Not registered, the MT is not searching
    NotRegistered = 0,
    /// Registered, home network
    Registered = 1,
    /// Not registered, but the MT is searching an operator
    NotRegisteredSearching = 2,
    RegistrationDenied = 3,
    Unknown = 4,
    RegisteredRoaming = 5,
}

impl GPRSNetworkRegistrationStat {
    /// Codes past roaming (SMS only, emergency, ...) count as unknown
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::NotRegistered,
            1 => Self::Registered,
            2 => Self::NotRegisteredSearching,
            3 => Self::RegistrationDenied,
            5 => Self::RegisteredRoaming,
            _ => Self::Unknown,
        }
    }
}
