use std::fmt;

/// Rejected user input at the entry boundary.
///
/// None of these are fatal: the interactive session clears its buffer,
/// the console prompt asks again, and an empty label falls back to a default.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    /// The percentage text is not a number.
    InvalidPercentageFormat(String),
    /// The percentage parsed but lies outside `[0, 100]`.
    PercentageOutOfRange(f64),
    /// Every label line is empty.
    EmptyLabel,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::InvalidPercentageFormat(text) => write!(
                f,
                "please enter a valid percentage (e.g. 75.5), got {:?}",
                text
            ),
            InputError::PercentageOutOfRange(value) => {
                write!(f, "percentage must be between 0 and 100, got {}", value)
            }
            InputError::EmptyLabel => write!(f, "label has no non-empty lines"),
        }
    }
}

impl std::error::Error for InputError {}
