//! The fetcher capability consumed by the exporter.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::snapshot::{Service, SystemStatus, Trunk};

/// Errors a [`PbxSource`] fetch may return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Credentials were rejected. No further fetch on the same session can succeed.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The PBX could not be reached or answered with an error.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The PBX answered with a body that could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The fetch did not complete within its deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a malformed response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Create an authentication error.
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Whether this error, raised by the status fetch, aborts the whole scrape.
    pub fn is_fatal(&self) -> bool {
        match self {
            FetchError::Authentication(_) => true,
            FetchError::Unavailable(_) | FetchError::Malformed(_) | FetchError::Timeout(_) => {
                false
            }
        }
    }
}

/// The independent data sources of one scrape, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    SystemStatus,
    ServiceList,
    TrunkList,
}

impl Source {
    /// Name used in log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::SystemStatus => "SystemStatus",
            Source::ServiceList => "ServiceList",
            Source::TrunkList => "TrunkList",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access to the PBX state snapshots.
///
/// Each method is an independent fetch; a failure of one must not affect
/// the others. Implementations may block on network I/O.
pub trait PbxSource: Send + Sync + 'static {
    /// Fetch the system-wide status.
    fn system_status(&self) -> impl Future<Output = Result<SystemStatus, FetchError>> + Send;

    /// Fetch the service roster.
    fn services(&self) -> impl Future<Output = Result<Vec<Service>, FetchError>> + Send;

    /// Fetch the trunk roster.
    fn trunks(&self) -> impl Future<Output = Result<Vec<Trunk>, FetchError>> + Send;
}
