use crate::command::{network_service::types::NetworkMode, psn::types::ContextId};

/// Compile-time tunables for a [`CellularClient`](crate::CellularClient).
///
/// Every constant has a default, so an empty impl gives a working
/// configuration:
///
/// ```ignore
/// struct MyConfig;
///
/// impl CellularConfig for MyConfig {
///     const SELECT_OPERATOR: bool = false;
///     const CONTENT_TYPE: Option<&'static str> = Some("application/json");
/// }
/// ```
pub trait CellularConfig {
    /// Radio access technology requested with `+CNMP` during attach
    const PREFERRED_MODE: NetworkMode = NetworkMode::LteOnly;

    /// Issue `+COPS=0` (automatic operator selection) during attach
    const SELECT_OPERATOR: bool = true;

    /// PDP context used for packet data and HTTP
    const CONTEXT_ID: ContextId = ContextId(1);

    /// Lowest `+CSQ` rssi accepted during radio bring-up
    const MIN_RSSI: u8 = 10;

    /// Attempts per `+HTTPPARA` parameter before giving up
    const PARAM_ATTEMPTS: u8 = 3;
    const PARAM_RETRY_DELAY_MS: u32 = 200;

    /// Settling time after `+HTTPINIT`
    const SETTLE_TIME_MS: u32 = 500;

    const UPLOAD_CHUNK_SIZE: usize = 64;
    const UPLOAD_PACING_MS: u32 = 10;

    /// Bytes requested per `+HTTPREAD`
    const READ_CHUNK_SIZE: usize = 256;

    /// Sleep between polls of the transport while waiting for a reply
    const POLL_INTERVAL_MS: u32 = 10;

    /// Value for the `CONTENT` HTTP parameter, if any
    const CONTENT_TYPE: Option<&'static str> = None;
}

/// Configuration using every default of [`CellularConfig`]
pub struct DefaultConfig;

impl CellularConfig for DefaultConfig {}
