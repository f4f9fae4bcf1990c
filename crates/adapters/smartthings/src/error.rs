//! SmartThings adapter error types.

use acbridge_domain::error::BridgeError;

/// Errors specific to the SmartThings adapter.
#[derive(Debug, thiserror::Error)]
pub enum SmartThingsError {
    /// No access token was configured.
    #[error("SmartThings token is not configured")]
    MissingToken,

    /// The request could not be sent or the response body not read.
    #[error("SmartThings request failed")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success HTTP status.
    #[error("SmartThings API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("failed to decode SmartThings response")]
    Decode(#[source] serde_json::Error),

    /// A domain-level error (validation, not-found, etc.).
    #[error("domain error")]
    Domain(#[source] BridgeError),
}

impl SmartThingsError {
    /// Convert into a [`BridgeError::Transport`] for propagation across port
    /// boundaries.
    pub fn into_domain(self) -> BridgeError {
        match self {
            Self::Domain(err) => err,
            other => BridgeError::Transport(Box::new(other)),
        }
    }
}

impl From<SmartThingsError> for BridgeError {
    fn from(err: SmartThingsError) -> Self {
        err.into_domain()
    }
}
