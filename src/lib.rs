// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod session;
mod window;

pub use color::{color_for, Color};
pub use config::{GaugeConfig, Style};
pub use error::InputError;
pub use geometry::{primitives, GaugeSpec, Point, Primitive};
pub use input::{submit, Label, Percentage, Submission};
pub use session::{InputSession, Key, Phase};

use std::sync::mpsc::Receiver;

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Updates pushed into a running gauge window.
#[derive(Debug, Clone)]
pub enum GaugeCommand {
    /// Display a validated label and value, replacing any entry in progress.
    Show(Submission),
    SetStyle(Style),
    /// Drop the current session and start typing from scratch.
    Reset,
}

/// A gauge window plus the session it starts with.
#[derive(Debug, Clone)]
pub struct Gauge {
    config: GaugeConfig,
    session: InputSession,
}

impl Gauge {
    /// Start with interactive entry.
    pub fn new(config: GaugeConfig) -> Self {
        let session = InputSession::new(config.label_max_len, config.percentage_max_len);
        Self { config, session }
    }

    /// Start with a value that was already entered elsewhere.
    pub fn with_submission(config: GaugeConfig, submission: Submission) -> Self {
        let session = InputSession::from_submission(
            submission,
            config.label_max_len,
            config.percentage_max_len,
        );
        Self { config, session }
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn session(&self) -> &InputSession {
        &self.session
    }

    /// Open the window and block until it is closed.
    pub fn show(&self) -> anyhow::Result<()> {
        window::run(&self.config, self.session.clone(), None)
    }

    /// Like [`Gauge::show`], also draining `receiver` once per frame.
    pub fn show_with_commands(&self, receiver: Receiver<GaugeCommand>) -> anyhow::Result<()> {
        window::run(&self.config, self.session.clone(), Some(receiver))
    }
}
