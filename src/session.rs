use crate::input::{Label, Percentage, Submission, MAX_LABEL_LINES};

/// A discrete key event after the host has decoded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    Backspace,
    /// Confirm the current field.
    Enter,
    /// Dismiss an accepted gauge. Ignored while typing.
    Escape,
}

/// Where the session is in the entry flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    EnteringLabelLine(usize),
    EnteringPercentage,
    /// Terminal; holds the parsed value.
    Accepted(Percentage),
}

/// Keystroke-driven entry of a three line label and a percentage.
///
/// Invalid keystrokes are ignored. A percentage that fails to parse or
/// falls outside `[0, 100]` clears the buffer and stays in place.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSession {
    phase: Phase,
    lines: [String; MAX_LABEL_LINES],
    percentage_buffer: String,
    label_max_len: usize,
    percentage_max_len: usize,
}

impl Default for InputSession {
    fn default() -> Self {
        Self::new(20, 6)
    }
}

impl InputSession {
    pub fn new(label_max_len: usize, percentage_max_len: usize) -> Self {
        Self {
            phase: Phase::EnteringLabelLine(0),
            lines: Default::default(),
            percentage_buffer: String::new(),
            label_max_len,
            percentage_max_len,
        }
    }

    /// A session that is already accepted, for values that came through
    /// the request/response boundary instead of the keyboard.
    pub fn from_submission(
        submission: Submission,
        label_max_len: usize,
        percentage_max_len: usize,
    ) -> Self {
        let mut session = Self::new(label_max_len, percentage_max_len);
        for (slot, line) in session.lines.iter_mut().zip(submission.label.lines()) {
            slot.clone_from(line);
        }
        session.percentage_buffer = submission.percentage.value().to_string();
        session.phase = Phase::Accepted(submission.percentage);
        session
    }

    /// A fresh session with the same limits.
    pub fn restarted(&self) -> Self {
        Self::new(self.label_max_len, self.percentage_max_len)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the label line being typed, if any.
    pub fn current_line_index(&self) -> Option<usize> {
        match self.phase {
            Phase::EnteringLabelLine(k) => Some(k),
            _ => None,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn percentage_buffer(&self) -> &str {
        &self.percentage_buffer
    }

    pub fn accepted(&self) -> Option<Percentage> {
        match self.phase {
            Phase::Accepted(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted().is_some()
    }

    /// The entered label, or the default one when nothing was typed.
    pub fn label(&self) -> Label {
        Label::from_lines_or_default(&self.lines)
    }

    pub fn apply(&mut self, key: Key) {
        match self.phase {
            Phase::EnteringLabelLine(k) => self.apply_label_key(k, key),
            Phase::EnteringPercentage => self.apply_percentage_key(key),
            Phase::Accepted(_) => {}
        }
    }

    fn apply_label_key(&mut self, k: usize, key: Key) {
        let line = &mut self.lines[k];
        match key {
            Key::Char(ch) if !ch.is_control() => {
                if line.chars().count() < self.label_max_len {
                    line.push(ch);
                }
            }
            Key::Char(_) => {}
            Key::Backspace => {
                line.pop();
            }
            // Empty lines do not advance.
            Key::Enter if line.is_empty() => {}
            Key::Escape => {}
            Key::Enter => {
                self.phase = if k + 1 < MAX_LABEL_LINES {
                    Phase::EnteringLabelLine(k + 1)
                } else {
                    Phase::EnteringPercentage
                };
                tracing::debug!(phase = ?self.phase, "label line confirmed");
            }
        }
    }

    fn apply_percentage_key(&mut self, key: Key) {
        match key {
            Key::Char(ch) if ch.is_ascii_digit() || ch == '.' => {
                let duplicate_point = ch == '.' && self.percentage_buffer.contains('.');
                if !duplicate_point && self.percentage_buffer.len() < self.percentage_max_len {
                    self.percentage_buffer.push(ch);
                }
            }
            Key::Char(_) => {}
            Key::Backspace => {
                self.percentage_buffer.pop();
            }
            Key::Escape => {}
            Key::Enter => match self.percentage_buffer.parse::<Percentage>() {
                Ok(percentage) => {
                    tracing::info!(percentage = percentage.value(), "session accepted");
                    self.phase = Phase::Accepted(percentage);
                }
                Err(err) => {
                    tracing::debug!(%err, "percentage rejected, clearing buffer");
                    self.percentage_buffer.clear();
                }
            },
        }
    }
}
