use heapless::String;

use crate::error::Error;

pub const MAX_SERVER_LEN: usize = 128;
pub const MAX_RESOURCE_LEN: usize = 128;

/// Server and resource an HTTP session is configured for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    server: String<MAX_SERVER_LEN>,
    resource: String<MAX_RESOURCE_LEN>,
}

impl Target {
    pub fn new(server: &str, resource: &str) -> Result<Self, Error> {
        Ok(Self {
            server: String::try_from(server).map_err(|_| Error::Overflow)?,
            resource: String::try_from(resource).map_err(|_| Error::Overflow)?,
        })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }
}

/// State of the module's HTTP service, as far as the driver knows it.
///
/// Transitions consume the current state and return the next one, so they
/// can be exercised without a module.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No session, or an explicitly terminated one
    #[default]
    Closed,
    /// Session initialized, parameters not (yet) valid
    Open,
    /// Session initialized with parameters set for the target
    Ready(Target),
    /// A step failed. The next call has to start from scratch.
    NeedsReinit,
}

impl SessionState {
    /// Whether the parameters currently set can be kept for `target`
    pub fn reusable_for(&self, target: &Target) -> bool {
        matches!(self, Self::Ready(current) if current == target)
    }

    pub fn needs_reinit(&self) -> bool {
        matches!(self, Self::NeedsReinit)
    }

    /// The session was (re)initialized for `target`. Parameters survive only
    /// if they were already set for that same target.
    #[must_use]
    pub fn opened(self, target: &Target) -> Self {
        match self {
            Self::Ready(current) if &current == target => Self::Ready(current),
            _ => Self::Open,
        }
    }

    /// All parameters for `target` were set.
    #[must_use]
    pub fn configured(self, target: Target) -> Self {
        Self::Ready(target)
    }

    /// A step of an HTTP operation failed, or the server answered not found.
    #[must_use]
    pub fn failed(self) -> Self {
        Self::NeedsReinit
    }

    /// The session was terminated on request.
    #[must_use]
    pub fn closed(self) -> Self {
        Self::Closed
    }
}
