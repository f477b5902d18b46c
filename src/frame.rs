//! One frame of the interactive loop: fold the tick's key events into the
//! session and describe the whole frame as a draw list.

use crate::config::{GaugeConfig, Style};
use crate::geometry::{primitives, Point, Primitive};
use crate::input::Percentage;
use crate::session::{InputSession, Key, Phase};
use crate::GaugeCommand;
use std::time::{Duration, Instant};

/// Advance `session` by `events` and build the frame for the result.
///
/// Escape on an accepted session starts a fresh one.
pub fn step<I>(
    mut session: InputSession,
    events: I,
    config: &GaugeConfig,
) -> (InputSession, Vec<Primitive>)
where
    I: IntoIterator<Item = Key>,
{
    for key in events {
        if key == Key::Escape && session.is_accepted() {
            tracing::info!("gauge dismissed, new session");
            session = session.restarted();
            continue;
        }
        session.apply(key);
    }
    let draw_list = draw_list(&session, config);
    (session, draw_list)
}

/// Apply a command from the host channel before the tick's key events.
pub fn apply_command(session: &mut InputSession, config: &mut GaugeConfig, command: GaugeCommand) {
    match command {
        GaugeCommand::Show(submission) => {
            *session = InputSession::from_submission(
                submission,
                config.label_max_len,
                config.percentage_max_len,
            );
        }
        GaugeCommand::SetStyle(style) => config.style = style,
        GaugeCommand::Reset => *session = session.restarted(),
    }
    tracing::debug!(phase = ?session.phase(), style = ?config.style, "command applied");
}

/// Full redraw of the current session state.
pub fn draw_list(session: &InputSession, config: &GaugeConfig) -> Vec<Primitive> {
    let spec = config.gauge_spec();
    let mut out = Vec::new();
    match session.accepted() {
        Some(percentage) => {
            out.extend(primitives(percentage, &spec));
            out.push(text(
                spec.value_anchor(),
                value_text(percentage, config.style),
                config,
            ));
            push_label(&mut out, session.label().lines(), config);
        }
        None => {
            push_label(&mut out, session.lines(), config);
            if !session.percentage_buffer().is_empty() {
                out.push(text(
                    spec.center,
                    format!("{}%", session.percentage_buffer()),
                    config,
                ));
            }
            let prompt = match session.phase() {
                Phase::EnteringLabelLine(k) => format!("Enter label line {}:", k + 1),
                _ => "Enter percentage:".to_string(),
            };
            let y = config.window_height as f64 - config.prompt_bottom_offset as f64;
            out.push(text(Point::new(center_x(config), y), prompt, config));
        }
    }
    out
}

fn value_text(percentage: Percentage, style: Style) -> String {
    match style {
        Style::Bar | Style::HalfDial => format!("{:.1}%", percentage.value()),
        _ => percentage.to_string(),
    }
}

fn push_label(out: &mut Vec<Primitive>, lines: &[String], config: &GaugeConfig) {
    let top = config.window_height as i32 - config.label_bottom_offset;
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let y = top + i as i32 * config.label_line_spacing;
        out.push(text(
            Point::new(center_x(config), y as f64),
            line.clone(),
            config,
        ));
    }
}

fn center_x(config: &GaugeConfig) -> f64 {
    config.window_width as f64 / 2.0
}

fn text(at: Point, text: String, config: &GaugeConfig) -> Primitive {
    Primitive::Text {
        at,
        text,
        size: config.text_size,
        color: config.text_color,
    }
}

const FALLBACK_FRAMERATE: f64 = 60.0;

/// Fixed-rate tick source.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_duration: Duration,
    last_frame: Option<Instant>,
}

impl FrameClock {
    /// Falls back to 60 fps when `max_framerate` is not a positive rate.
    pub fn new(max_framerate: f64) -> Self {
        let frame_duration = match Duration::try_from_secs_f64(1.0 / max_framerate) {
            Ok(duration) if max_framerate.is_finite() && max_framerate > 0.0 => duration,
            _ => {
                tracing::warn!(
                    max_framerate,
                    "invalid framerate, using {FALLBACK_FRAMERATE} fps"
                );
                Duration::from_secs_f64(1.0 / FALLBACK_FRAMERATE)
            }
        };
        Self {
            frame_duration,
            last_frame: None,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// True when a frame is due at `now`; marks it as started.
    pub fn tick(&mut self, now: Instant) -> bool {
        let due = match self.last_frame {
            Some(last) => now.saturating_duration_since(last) >= self.frame_duration,
            None => true,
        };
        if due {
            self.last_frame = Some(now);
        }
        due
    }

    /// When the next frame becomes due.
    pub fn next_deadline(&self, now: Instant) -> Instant {
        self.last_frame
            .map(|last| last + self.frame_duration)
            .unwrap_or(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(text: &str) -> Vec<Key> {
        text.chars()
            .map(|ch| match ch {
                '\n' => Key::Enter,
                '\u{8}' => Key::Backspace,
                '\u{1b}' => Key::Escape,
                ch => Key::Char(ch),
            })
            .collect()
    }

    fn texts(list: &[Primitive]) -> Vec<&str> {
        list.iter()
            .filter_map(|p| match p {
                Primitive::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn typing_frame_shows_progress_and_prompt() {
        let config = GaugeConfig::default();
        let (session, list) = step(InputSession::default(), keys("Proj"), &config);
        assert_eq!(session.lines()[0], "Proj");
        assert_eq!(texts(&list), ["Proj", "Enter label line 1:"]);
        assert!(list.iter().all(|p| matches!(p, Primitive::Text { .. })));

        let (_, list) = step(session, keys("\na\nb\n4"), &config);
        assert_eq!(texts(&list), ["Proj", "a", "b", "4%", "Enter percentage:"]);
    }

    #[test]
    fn accepted_frame_draws_gauge_and_label() {
        let config = GaugeConfig::builder().style(Style::Needle).build();
        let (session, list) = step(
            InputSession::default(),
            keys("Project X\nb\nc\n37\n"),
            &config,
        );
        assert_eq!(session.accepted().map(Percentage::value), Some(37.0));
        assert!(matches!(list[0], Primitive::Arc { .. }));
        assert_eq!(texts(&list), ["37%", "Project X", "b", "c"]);
    }

    #[test]
    fn bar_and_half_dial_values_have_one_decimal() {
        for style in [Style::Bar, Style::HalfDial] {
            let config = GaugeConfig::builder().style(style).build();
            let (_, list) = step(InputSession::default(), keys("a\nb\nc\n37\n"), &config);
            assert!(texts(&list).contains(&"37.0%"), "{style:?}");
        }
        let config = GaugeConfig::builder().style(Style::Bar).build();
        let (_, list) = step(InputSession::default(), keys("a\nb\nc\n12.34\n"), &config);
        assert_eq!(texts(&list)[0], "12.3%");
    }

    #[test]
    fn escape_dismisses_only_accepted_sessions() {
        let config = GaugeConfig::default();
        let (session, _) = step(InputSession::default(), keys("ab\u{1b}"), &config);
        assert_eq!(session.lines()[0], "ab");

        let (session, _) = step(session, keys("\nc\nd\n50\n"), &config);
        assert!(session.is_accepted());
        let (session, list) = step(session, keys("\u{1b}"), &config);
        assert_eq!(session.phase(), Phase::EnteringLabelLine(0));
        assert_eq!(texts(&list), ["Enter label line 1:"]);
    }

    #[test]
    fn commands_replace_session_and_style() {
        let mut config = GaugeConfig::default();
        let mut session = InputSession::default();
        session.apply(Key::Char('x'));

        let submission = crate::input::submit("Deploy", "90").unwrap();
        apply_command(&mut session, &mut config, GaugeCommand::Show(submission));
        assert_eq!(session.accepted().map(Percentage::value), Some(90.0));

        apply_command(&mut session, &mut config, GaugeCommand::SetStyle(Style::Pie));
        assert_eq!(config.style, Style::Pie);
        let list = draw_list(&session, &config);
        assert!(matches!(list[0], Primitive::Circle { .. }));

        apply_command(&mut session, &mut config, GaugeCommand::Reset);
        assert_eq!(session.phase(), Phase::EnteringLabelLine(0));
    }

    #[test]
    fn clock_ticks_at_fixed_rate() {
        let mut clock = FrameClock::new(60.0);
        let start = Instant::now();
        assert!(clock.tick(start));
        assert!(!clock.tick(start + Duration::from_millis(5)));
        assert!(clock.tick(start + Duration::from_millis(17)));
        assert_eq!(
            clock.next_deadline(start),
            start + Duration::from_millis(17) + clock.frame_duration()
        );
    }

    #[test]
    fn clock_ignores_unusable_framerates() {
        let fallback = FrameClock::new(60.0).frame_duration();
        for fps in [0.0, -5.0, f64::NAN, f64::INFINITY, 1e-320] {
            assert_eq!(FrameClock::new(fps).frame_duration(), fallback, "{fps}");
        }
        let config = GaugeConfig::builder().max_framerate(0.0).build();
        let clock = FrameClock::new(config.max_framerate);
        assert_eq!(clock.frame_duration(), fallback);
    }
}
