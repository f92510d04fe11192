use crate::command::psn::types::GPRSNetworkRegistrationStat;

/// Packet domain registration status, <stat> of `+CGREG`
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    #[default]
    None,
    NotRegistering,
    Home,
    Searching,
    Denied,
    Unknown,
    Roaming,
}

impl Status {
    /// Registered on the home network or roaming
    pub fn registered(&self) -> bool {
        matches!(self, Self::Home | Self::Roaming)
    }
}

impl From<GPRSNetworkRegistrationStat> for Status {
    fn from(v: GPRSNetworkRegistrationStat) -> Self {
        match v {
            GPRSNetworkRegistrationStat::NotRegistered => Self::NotRegistering,
            GPRSNetworkRegistrationStat::Registered => Self::Home,
            GPRSNetworkRegistrationStat::NotRegisteredSearching => Self::Searching,
            GPRSNetworkRegistrationStat::RegistrationDenied => Self::Denied,
            GPRSNetworkRegistrationStat::Unknown => Self::Unknown,
            GPRSNetworkRegistrationStat::RegisteredRoaming => Self::Roaming,
        }
    }
}
