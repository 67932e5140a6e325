//! Error taxonomy for connection establishment.

use thiserror::Error;

use crate::lifecycle::CancelReason;

/// Boxed error produced by an underlying connector.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Terminal outcome of a failed connect request.
#[derive(Debug, Error)]
pub enum Error {
    /// The registry was empty when an attempt started. Never retried.
    #[error("no available connectors")]
    NoConnectors,

    /// The caller's cancellation fired before a connection was produced.
    #[error(transparent)]
    Canceled(#[from] CancelReason),

    /// Error returned by a connector's own connect call, or a
    /// [`VacantConnector`] when the selected entry had no connector.
    #[error(transparent)]
    Connect(BoxError),
}

/// Failure of an attempt that selected an entry added without a connector.
///
/// Surfaces wrapped in [`Error::Connect`]; use `downcast_ref` to detect it.
#[derive(Debug, Error)]
#[error("connector {name:?} has no connector registered")]
pub struct VacantConnector {
    pub name: String,
}

impl Error {
    /// Wrap any connector-side error.
    pub fn connect<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Connect(err.into())
    }

    /// True for [`Error::NoConnectors`].
    pub fn is_no_connectors(&self) -> bool {
        matches!(self, Error::NoConnectors)
    }

    /// Return the cancellation reason when this error came from the caller withdrawing.
    pub fn cancel_reason(&self) -> Option<CancelReason> {
        match self {
            Error::Canceled(reason) => Some(*reason),
            _ => None,
        }
    }
}
