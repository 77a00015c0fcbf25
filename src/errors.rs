use thiserror::Error; // Import the `Error` derive macro from the `thiserror` crate

// Define an enum to represent everything that can go wrong while deciding
#[derive(Debug, Error)] // Automatically implement `Debug` and `Error` traits for the enum
pub enum DecisionError {
    // Caller broke an argument contract (empty variants, bad model name, ...)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // Raised by a predictor while scoring; passed through untouched
    #[error("model error: {0}")]
    Model(String),

    // A variant or givens value could not be turned into JSON
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("decision {0} is already tracked")]
    AlreadyTracked(String),

    #[error("decision has not been tracked")]
    NotTracked,

    #[error("tracking error: {0}")]
    Tracking(String),

    // Model file problems
    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for results that use `DecisionError` as the error type
pub type Result<T> = std::result::Result<T, DecisionError>;

impl DecisionError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        DecisionError::InvalidArgument(msg.into())
    }
}
