//! Argument and parameter types used by Network service Commands and Responses
use atat::atat_derive::AtatEnum;

/// Preferred radio access technology, `+CNMP` <mode>
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetworkMode {
    Automatic = 2,
    GsmOnly = 13,
    WcdmaOnly = 14,
    LteOnly = 38,
    /// Any but LTE
    GsmWcdma = 48,
    GsmWcdmaLte = 51,
    GsmLte = 54,
    WcdmaLte = 55,
}

/// Operator selection mode, `+COPS` <mode>
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatorSelectionMode {
    Automatic = 0,
    Manual = 1,
    Deregister = 2,
    ManualAutomatic = 4,
}
