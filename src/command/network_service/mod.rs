//! ### Network service

pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;
use responses::SignalQuality;
use types::{NetworkMode, OperatorSelectionMode};

use super::NoResponse;

/// Signal quality +CSQ
///
/// Returns the received signal strength indication <rssi> and the channel
/// bit error rate <ber>.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CSQ", SignalQuality, timeout_ms = 5000)]
pub struct GetSignalQuality;

/// Preferred mode selection +CNMP
///
/// Selects which radio access technologies the module may register on.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CNMP", NoResponse, timeout_ms = 5000)]
pub struct SetPreferredMode {
    #[at_arg(position = 0)]
    pub mode: NetworkMode,
}

/// Operator selection +COPS
///
/// Forces an attempt to select and register with the GSM/UMTS/LTE network
/// operator. Only the mode is sent, so manual selection is not supported here.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+COPS", NoResponse, timeout_ms = 5000)]
pub struct SetOperatorSelection {
    #[at_arg(position = 0)]
    pub mode: OperatorSelectionMode,
}
