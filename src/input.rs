use crate::error::InputError;
use std::fmt;
use std::str::FromStr;

/// Maximum number of label lines.
pub const MAX_LABEL_LINES: usize = 3;

/// Label used when the user leaves every line empty.
pub const DEFAULT_LABEL: &str = "Default Label";

// ============================================================================
// PERCENTAGE
// ============================================================================

/// A validated value in `[0, 100]`.
///
/// The only way to build one is through [`Percentage::new`] or parsing, so
/// color and geometry code can assume the range holds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Percentage {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    pub fn new(value: f64) -> Result<Self, InputError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InputError::PercentageOutOfRange(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// The value as a fraction in `[0, 1]`.
    pub fn fraction(self) -> f64 {
        self.0 / Self::MAX
    }
}

impl FromStr for Percentage {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| InputError::InvalidPercentageFormat(trimmed.to_string()))?;
        if value.is_nan() {
            return Err(InputError::InvalidPercentageFormat(trimmed.to_string()));
        }
        Self::new(value)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// ============================================================================
// LABEL
// ============================================================================

/// Up to three non-empty lines of caption text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    lines: Vec<String>,
}

impl Label {
    /// Keep the non-empty lines, at most [`MAX_LABEL_LINES`] of them.
    pub fn try_from_lines<I, S>(lines: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .take(MAX_LABEL_LINES)
            .collect();
        if lines.is_empty() {
            Err(InputError::EmptyLabel)
        } else {
            Ok(Self { lines })
        }
    }

    /// Like [`Label::try_from_lines`], falling back to [`DEFAULT_LABEL`].
    pub fn from_lines_or_default<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::try_from_lines(lines).unwrap_or_else(|_| {
            tracing::debug!("empty label, using default");
            Self::default()
        })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Default for Label {
    fn default() -> Self {
        Self {
            lines: vec![DEFAULT_LABEL.to_string()],
        }
    }
}

// ============================================================================
// REQUEST / RESPONSE BOUNDARY
// ============================================================================

/// A label and percentage that passed validation together.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub label: Label,
    pub percentage: Percentage,
}

/// Validate a multi-line label and a percentage string in one call.
///
/// The label never fails; an all-blank label becomes [`DEFAULT_LABEL`].
/// The caller re-prompts on `Err`.
pub fn submit(label_text: &str, percentage_text: &str) -> Result<Submission, InputError> {
    let percentage = percentage_text.parse::<Percentage>().map_err(|err| {
        tracing::debug!(%err, "rejected percentage");
        err
    })?;
    let label = Label::from_lines_or_default(label_text.lines());
    tracing::info!(percentage = percentage.value(), lines = label.lines().len(), "submission accepted");
    Ok(Submission { label, percentage })
}
