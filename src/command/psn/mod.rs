//! ### Packet Switched Data Services Commands
//!
//! A PDP context describes a packet data connection towards the network. It
//! is defined with `+CGDCONT`, the module attaches to the packet domain with
//! `+CGATT`, and the context is brought up with `+CGACT`. Once active, the
//! address assigned by the network is read back with `+CGPADDR`.

pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;
use responses::{GPRSNetworkRegistrationStatus, PDPAddress, PDPContextState};
use types::{ContextId, GPRSAttachedState, PDPContextStatus, PdpType};

use super::NoResponse;
use crate::error::Error;

/// Longest APN accepted by `+CGDCONT`
pub const MAX_APN_LEN: usize = 99;

/// GPRS network registration status +CGREG
///
/// Read command: returns the URC mode <n> and the registration status
/// <stat> of the packet domain.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CGREG?", GPRSNetworkRegistrationStatus, timeout_ms = 5000)]
pub struct GetGPRSNetworkRegistrationStatus;

/// Set GPRS attach or detach +CGATT
///
/// Registers (attach) the MT to, or deregisters (detach) the MT from the
/// packet domain service.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CGATT", NoResponse, timeout_ms = 5000)]
pub struct SetGPRSAttached {
    #[at_arg(position = 0)]
    pub state: GPRSAttachedState,
}

/// PDP context definition +CGDCONT
///
/// Defines the connection parameters for a PDP context, identified by the
/// local context identification parameter <cid>. The definition is stored in
/// the module and persists over power cycles.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CGDCONT", NoResponse, timeout_ms = 5000)]
pub struct SetPDPContextDefinition<'a> {
    #[at_arg(position = 0)]
    cid: ContextId,
    #[at_arg(position = 1, len = 6)]
    pdp_type: &'a str,
    #[at_arg(position = 2, len = 99)]
    apn: &'a str,
}

impl<'a> SetPDPContextDefinition<'a> {
    /// The APN is sent quoted, so it can neither carry a quote nor exceed
    /// [`MAX_APN_LEN`].
    pub fn new(cid: ContextId, pdp_type: PdpType, apn: &'a str) -> Result<Self, Error> {
        if apn.len() > MAX_APN_LEN || apn.contains('"') {
            return Err(Error::Overflow);
        }
        Ok(Self {
            cid,
            pdp_type: pdp_type.as_str(),
            apn,
        })
    }
}

/// PDP context activate or deactivate +CGACT
///
/// Read command: one `+CGACT: <cid>,<state>` line per defined context. Kept
/// short, as it is only used to skip an activation that is not needed.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CGACT?", PDPContextState, timeout_ms = 1000)]
pub struct GetPDPContextState;

/// PDP context activate or deactivate +CGACT
///
/// Activates or deactivates the specified PDP context.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CGACT", NoResponse, timeout_ms = 5000)]
pub struct SetPDPContextState {
    #[at_arg(position = 0)]
    pub status: PDPContextStatus,
    #[at_arg(position = 1)]
    pub cid: ContextId,
}

/// Show PDP address +CGPADDR
///
/// Returns the IP address assigned to the given context.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CGPADDR", PDPAddress, timeout_ms = 5000)]
pub struct GetPDPAddress {
    #[at_arg(position = 0)]
    pub cid: ContextId,
}
