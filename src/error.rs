use thiserror::Error;

use crate::signature::SignatureMismatch;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A route builder or router handle was used in a way that can never
    /// produce a valid registration, e.g. a route without a path.
    #[error("{0}")]
    Usage(String),

    /// Supplied arguments do not bind to the target registration signature.
    #[error(transparent)]
    Signature(#[from] SignatureMismatch),

    /// An endpoint declared an empty parameter list; a leading receiver
    /// parameter is required so the controller instance can be injected.
    #[error("endpoint `{endpoint}` declares no parameters")]
    EmptySignature { endpoint: String },

    #[error("dependency not found: {type_name}")]
    DependencyNotFound { type_name: &'static str },

    #[error("failed to downcast resolved service: {type_name}")]
    DowncastFailed { type_name: &'static str },
}

impl Error {
    pub(crate) fn usage(message: impl Into<String>) -> Self {
        Error::Usage(message.into())
    }
}
