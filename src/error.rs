use thiserror::Error;

/// Errors produced by correlation-function estimation and noise synthesis.
#[derive(Error, Debug)]
pub enum Error {
    /// Input buffer or parameter is unusable for the requested operation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A capability that is physically meaningless for a correlation
    /// function was invoked (shift, flux access, photon shooting).
    #[error("operation `{operation}` is not available for correlation functions")]
    UnsupportedOperation {
        /// Name of the disabled capability.
        operation: &'static str,
    },
}
