//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for tascore.
#[derive(Debug, thiserror::Error)]
pub enum TascoreError {
    #[error("bad bar on {date}: {reason}")]
    BadBar { date: NaiveDate, reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("insufficient data: have {have} bars, need {need}")]
    InsufficientData { have: usize, need: usize },

    #[error("signal series has {signals} entries but price series has {bars} bars")]
    SignalMismatch { bars: usize, signals: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TascoreError> for std::process::ExitCode {
    fn from(err: &TascoreError) -> Self {
        let code: u8 = match err {
            TascoreError::Io(_) => 1,
            TascoreError::ConfigParse { .. } | TascoreError::ConfigInvalid { .. } => 2,
            TascoreError::Data { .. } | TascoreError::BadBar { .. } => 3,
            TascoreError::InsufficientData { .. } | TascoreError::SignalMismatch { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
