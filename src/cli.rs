use anyhow::{anyhow, bail, Result};
use clap::{ArgAction, Parser};
use percent_gauge::{submit, GaugeConfig, Percentage, Style, Submission};
use std::path::PathBuf;
use tracing::Level;

const MIN_FPS: f64 = 1.0;
const MAX_FPS: f64 = 240.0;
const MIN_WINDOW: usize = 100;
const MAX_WINDOW: usize = 2000;

#[derive(Parser, Debug)]
#[command(author, version, about = "Show a percentage as a red to green gauge", long_about = None)]
pub struct Args {
    /// Gauge style.
    #[arg(long, value_enum, default_value_t = Style::Needle)]
    pub style: Style,

    /// Label line; repeat up to three times.
    #[arg(long = "label", value_name = "LINE", requires = "percentage")]
    pub labels: Vec<String>,

    /// Value to show right away instead of typing it in the window.
    #[arg(long)]
    pub percentage: Option<String>,

    /// Ask for the label and percentage on the terminal first.
    #[arg(long, conflicts_with = "percentage")]
    pub prompt: bool,

    /// TrueType/OpenType font used for text.
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    #[arg(long, default_value_t = 60.0)]
    pub fps: f64,

    #[arg(long, default_value_t = 400)]
    pub width: usize,

    #[arg(long, default_value_t = 500)]
    pub height: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let args = Self::parse();
        args.validate()?;
        Ok(args)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_FPS..=MAX_FPS).contains(&self.fps) {
            bail!("--fps must be between {MIN_FPS} and {MAX_FPS}, got {}", self.fps);
        }
        for (flag, value) in [("--width", self.width), ("--height", self.height)] {
            if !(MIN_WINDOW..=MAX_WINDOW).contains(&value) {
                bail!("{flag} must be between {MIN_WINDOW} and {MAX_WINDOW}, got {value}");
            }
        }
        if self.labels.len() > 3 {
            bail!("at most 3 --label lines are allowed, got {}", self.labels.len());
        }
        if let Some(text) = &self.percentage {
            text.parse::<Percentage>()
                .map_err(|err| anyhow!("--percentage: {err}"))?;
        }
        Ok(())
    }

    pub fn to_config(&self) -> GaugeConfig {
        GaugeConfig::builder()
            .style(self.style)
            .max_framerate(self.fps)
            .window_width(self.width)
            .window_height(self.height)
            .maybe_font_path(self.font.clone())
            .build()
    }

    /// The value given on the command line, if any.
    pub fn submission(&self) -> Result<Option<Submission>> {
        match &self.percentage {
            Some(text) => {
                let submission = submit(&self.labels.join("\n"), text)
                    .map_err(|err| anyhow!("--percentage: {err}"))?;
                Ok(Some(submission))
            }
            None => Ok(None),
        }
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(std::iter::once("percent-gauge").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_are_valid() {
        let args = parse(&[]);
        assert!(args.validate().is_ok());
        assert_eq!(args.style, Style::Needle);
        assert_eq!(args.log_level(), Level::WARN);
        assert!(args.submission().unwrap().is_none());
    }

    #[test]
    fn parses_style_names() {
        assert_eq!(parse(&["--style", "half-dial"]).style, Style::HalfDial);
        assert_eq!(parse(&["--style", "donut"]).style, Style::Donut);
    }

    #[test]
    fn rejects_out_of_range_settings() {
        assert!(parse(&["--fps", "0"]).validate().is_err());
        assert!(parse(&["--fps", "500"]).validate().is_err());
        assert!(parse(&["--width", "50"]).validate().is_err());
        assert!(parse(&["--height", "5000"]).validate().is_err());
    }

    #[test]
    fn validates_percentage_and_label_count() {
        assert!(parse(&["--percentage", "abc"]).validate().is_err());
        assert!(parse(&["--percentage", "101"]).validate().is_err());
        let args = parse(&[
            "--percentage", "5", "--label", "a", "--label", "b", "--label", "c", "--label", "d",
        ]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn label_requires_percentage() {
        let result = Args::try_parse_from(["percent-gauge", "--label", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn builds_submission_and_config() {
        let args = parse(&[
            "--percentage", "37", "--label", "Project X", "--style", "pie", "-vv",
        ]);
        let submission = args.submission().unwrap().unwrap();
        assert_eq!(submission.label.lines(), ["Project X"]);
        assert_eq!(submission.percentage.value(), 37.0);
        assert_eq!(args.to_config().style, Style::Pie);
        assert_eq!(args.log_level(), Level::DEBUG);
    }

    #[test]
    fn missing_label_defaults() {
        let args = parse(&["--percentage", "12"]);
        let submission = args.submission().unwrap().unwrap();
        assert_eq!(submission.label.lines(), [percent_gauge::input::DEFAULT_LABEL]);
    }
}
