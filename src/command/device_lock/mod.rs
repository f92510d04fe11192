//! ### Device lock

mod impl_;
pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;
use responses::PinStatus;

/// Enter PIN +CPIN
///
/// Read command: reports whether the SIM is ready, or which password the MT
/// is waiting for. Without a SIM the module answers with an error result.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CPIN?", PinStatus, timeout_ms = 1000)]
pub struct GetPinStatus;
