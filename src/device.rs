use core::marker::PhantomData;

use atat::AtatCmd;
use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use crate::{
    client::{AtClient, Response},
    config::CellularConfig,
    error::Error,
    http::SessionState,
    sequence::Progress,
};

/// Driver for a SIM7600 module behind a serial link.
///
/// Bring-up and HTTP operations are provided through the [`Gsm`],
/// [`Gprs`] and [`Http`] traits, see [`prelude`](crate::prelude).
///
/// [`Gsm`]: crate::gsm::Gsm
/// [`Gprs`]: crate::gprs::Gprs
/// [`Http`]: crate::http::Http
pub struct CellularClient<T, D, C> {
    pub(crate) at: AtClient<T, D>,
    pub(crate) radio: Progress,
    pub(crate) network: Progress,
    pub(crate) session: SessionState,
    _config: PhantomData<C>,
}

impl<T, D, C> CellularClient<T, D, C>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
    C: CellularConfig,
{
    pub fn new(transport: T, delay: D) -> Self {
        Self {
            at: AtClient::new(transport, delay, C::POLL_INTERVAL_MS),
            radio: Progress::Idle,
            network: Progress::Idle,
            session: SessionState::Closed,
            _config: PhantomData,
        }
    }

    /// Give back the transport and delay
    pub fn release(self) -> (T, D) {
        self.at.release()
    }

    /// Progress of the last radio/SIM bring-up
    pub fn radio_progress(&self) -> Progress {
        self.radio
    }

    /// Progress of the last network attach
    pub fn network_progress(&self) -> Progress {
        self.network
    }

    pub fn session_state(&self) -> &SessionState {
        &self.session
    }

    /// Direct access to the command executor, for commands outside of the
    /// bring-up and HTTP flows.
    pub fn at(&mut self) -> &mut AtClient<T, D> {
        &mut self.at
    }

    /// Send `cmd` and require its terminator to arrive.
    pub(crate) fn expect_ok<A: AtatCmd>(&mut self, cmd: &A) -> Result<Response, Error> {
        let resp = self.at.send(cmd)?;
        resp.check()?;
        Ok(resp)
    }
}
