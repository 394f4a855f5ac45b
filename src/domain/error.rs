//! Domain error types.

/// Top-level error type for candlequiz.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("unknown pattern archetype: {name}")]
    UnknownArchetype { name: String },

    #[error("invalid series length {length}: need at least {minimum} candles")]
    InvalidLength { length: usize, minimum: usize },

    #[error("insufficient history: have {have} candles, need {need}")]
    InsufficientHistory { have: usize, need: usize },

    #[error("insufficient distractors: only {available} available, need 3")]
    InsufficientDistractors { available: usize },

    #[error("invalid candle: {reason}")]
    InvalidCandle { reason: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("invalid choice {choice:?}: expected 1-{available}")]
    InvalidChoice { choice: String, available: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("export error: {reason}")]
    Export { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&QuizError> for std::process::ExitCode {
    fn from(err: &QuizError) -> Self {
        let code: u8 = match err {
            QuizError::Io(_) | QuizError::Export { .. } => 1,
            QuizError::ConfigParse { .. } | QuizError::ConfigInvalid { .. } => 2,
            QuizError::UnknownArchetype { .. }
            | QuizError::InvalidLength { .. }
            | QuizError::InvalidParameter { .. }
            | QuizError::InvalidChoice { .. } => 3,
            QuizError::InsufficientHistory { .. }
            | QuizError::InsufficientDistractors { .. }
            | QuizError::InvalidCandle { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
