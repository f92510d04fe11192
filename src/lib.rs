#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod client;
pub mod command;
pub mod config;
mod device;
pub mod error;
pub mod gprs;
pub mod gsm;
pub mod http;
mod module_timing;
pub mod prelude;
pub mod registration;
pub mod sequence;

#[cfg(test)]
mod test_helpers;

pub use device::CellularClient;
