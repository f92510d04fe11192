//! Argument and parameter types used by Device lock Commands and Responses

/// SIM status reported by `+CPIN?`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimStatus {
    /// MT is not pending for any password
    Ready,
    /// MT is waiting SIM PIN to be given
    PinLocked,
    /// MT is waiting SIM PUK to be given
    PukLocked,
    /// SIM is present but not ready yet
    NotReady,
    /// MT is waiting phone-to-SIM card password to be given
    PhoneLocked,
    /// No SIM inserted, reported as an error result
    NoSim,
    Unknown,
}

impl SimStatus {
    /// Classify the code following `+CPIN: `
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "READY" => Self::Ready,
            "SIM PIN" => Self::PinLocked,
            "SIM PUK" => Self::PukLocked,
            "NOT READY" => Self::NotReady,
            "PH-SIM PIN" => Self::PhoneLocked,
            "NOT INSERTED" | "ERROR" => Self::NoSim,
            _ => Self::Unknown,
        }
    }
}
