use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use crate::{config::CellularConfig, error::Error, CellularClient};

/// A step of the bring-up pipelines, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    // Radio and SIM
    Probe,
    SimStatus,
    SignalQuality,

    // Network attach
    Registration,
    PreferredMode,
    OperatorSelection,
    Attach,
    ContextDefinition,
    ContextActivation,
    AddressRetrieval,
}

/// How far a pipeline got on its last run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    #[default]
    Idle,
    /// The given step was the last one to succeed so far
    Passed(Step),
    Done,
    /// The pipeline stopped at the given step. No later step ran.
    Failed(Step),
}

impl Progress {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn failed_at(&self) -> Option<Step> {
        match self {
            Self::Failed(step) => Some(*step),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pipeline {
    Radio,
    Network,
}

impl<T, D, C> CellularClient<T, D, C>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
    C: CellularConfig,
{
    fn progress_mut(&mut self, pipeline: Pipeline) -> &mut Progress {
        match pipeline {
            Pipeline::Radio => &mut self.radio,
            Pipeline::Network => &mut self.network,
        }
    }

    pub(crate) fn start(&mut self, pipeline: Pipeline) {
        *self.progress_mut(pipeline) = Progress::Idle;
    }

    pub(crate) fn finish(&mut self, pipeline: Pipeline) {
        *self.progress_mut(pipeline) = Progress::Done;
    }

    /// Run one step of `pipeline` and record its result.
    ///
    /// Steps are chained with `?`, so the first failing step ends the
    /// pipeline before any later step issues a command.
    pub(crate) fn step<R>(
        &mut self,
        pipeline: Pipeline,
        step: Step,
        f: impl FnOnce(&mut Self) -> Result<R, Error>,
    ) -> Result<R, Error> {
        let res = f(self);

        *self.progress_mut(pipeline) = match &res {
            Ok(_) => {
                info!("{:?} ok", step);
                Progress::Passed(step)
            }
            Err(e) => {
                error!("{:?} failed: {:?}", step, e);
                Progress::Failed(step)
            }
        };

        res
    }
}
