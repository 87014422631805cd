use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Input file missing, unreadable or malformed.
    DataLoad(String),
    /// Periodogram tool failed, timed out or left no usable output.
    ExternalTool(String),
    /// No periodogram or reference period available yet.
    NoData,
    /// Fold requested before a light curve was loaded.
    InsufficientData,
    /// Non-positive or non-finite period/frequency.
    InvalidPeriod(f64),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::DataLoad(msg) => write!(f, "data load error: {msg}"),
            EngineError::ExternalTool(msg) => write!(f, "periodogram tool error: {msg}"),
            EngineError::NoData => write!(f, "no data: load a light curve and pick a period first"),
            EngineError::InsufficientData => {
                write!(f, "insufficient data: probably no light curve is loaded")
            }
            EngineError::InvalidPeriod(v) => {
                write!(f, "invalid period/frequency {v}: must be positive and finite")
            }
        }
    }
}

impl std::error::Error for EngineError {}

pub type Result<T> = std::result::Result<T, EngineError>;
