use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use crate::{
    client::Outcome,
    command::{
        device_lock::{responses::PinStatus, types::SimStatus, GetPinStatus},
        network_service::{responses::SignalQuality, GetSignalQuality},
        AtResponse, AT,
    },
    config::CellularConfig,
    error::Error,
    sequence::{Pipeline, Step},
    CellularClient,
};

pub trait Gsm {
    /// Check that the module answers, the SIM is ready and the signal is
    /// usable. Returns the signal quality.
    fn init(&mut self) -> Result<SignalQuality, Error>;
}

impl<T, D, C> Gsm for CellularClient<T, D, C>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
    C: CellularConfig,
{
    fn init(&mut self) -> Result<SignalQuality, Error> {
        self.start(Pipeline::Radio);

        self.step(Pipeline::Radio, Step::Probe, |c| c.expect_ok(&AT))?;
        self.step(Pipeline::Radio, Step::SimStatus, Self::check_sim)?;
        let signal = self.step(Pipeline::Radio, Step::SignalQuality, Self::check_signal)?;

        self.finish(Pipeline::Radio);
        info!("Radio ready, rssi {}", signal.rssi);
        Ok(signal)
    }
}

impl<T, D, C> CellularClient<T, D, C>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
    C: CellularConfig,
{
    fn check_sim(&mut self) -> Result<SimStatus, Error> {
        let resp = self.at.send(&GetPinStatus)?;

        let status = match resp.outcome() {
            Outcome::Matched => PinStatus::from_response(&resp)?.code,
            // No SIM is reported with an error result instead of a status
            Outcome::Rejected => SimStatus::NoSim,
            outcome => return Err(outcome.into()),
        };

        if status != SimStatus::Ready {
            warn!("SIM not ready: {:?}", status);
            return Err(Error::Sim(status));
        }

        Ok(status)
    }

    fn check_signal(&mut self) -> Result<SignalQuality, Error> {
        let resp = self.expect_ok(&GetSignalQuality)?;
        let signal = SignalQuality::from_response(&resp)?;

        if signal.rssi == SignalQuality::UNKNOWN || signal.rssi < C::MIN_RSSI {
            warn!("Signal too weak, rssi {}", signal.rssi);
            return Err(Error::WeakSignal(signal.rssi));
        }

        Ok(signal)
    }
}
