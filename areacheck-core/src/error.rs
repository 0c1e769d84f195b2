use crate::form::Field;

/// A user-correctable problem with the form; the message is shown verbatim.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("choose exactly one X value")]
    XSelection { selected: usize },

    #[error("Y must be a number from -3 to 3")]
    Y,

    #[error("R must be a number from 2 to 5")]
    R,
}

impl ValidationError {
    /// The text field to flag as invalid, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            ValidationError::XSelection { .. } => None,
            ValidationError::Y => Some(Field::Y),
            ValidationError::R => Some(Field::R),
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvaluatorError {
    #[error("network error: {0}")]
    Network(String),

    #[error("network error: {0}")]
    Status(u16),

    #[error("unreadable response body: {0}")]
    Body(String),
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid log level: {0}")]
    LogLevel(String),

    #[error("default R {0} is outside [2, 5]")]
    DefaultR(f64),

    #[error("at least one X value is required")]
    NoXValues,

    #[error("X value {0} is not a finite number")]
    XValue(f64),

    #[error("invalid config: {0}")]
    Parse(String),
}
