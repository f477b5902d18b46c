use crate::color::Color;
use crate::geometry::{GaugeSpec, Point};
use bon::Builder;
use clap::ValueEnum;
use std::path::PathBuf;

/// Visualization style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Style {
    /// Horizontal filled bar.
    Bar,
    /// Full circle with a filled sector.
    Pie,
    /// 270 degree arc with a needle.
    #[default]
    Needle,
    /// Tessellated ring.
    Donut,
    /// 180 degree band with percent ticks.
    HalfDial,
}

#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    #[builder(default = "Percentage Gauge".to_string())]
    pub title: String,
    #[builder(default)]
    pub style: Style,

    // Window configuration
    #[builder(default = 400)]
    pub window_width: usize,
    #[builder(default = 500)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Gauge placement
    #[builder(default = 0.4)]
    pub gauge_center_y_factor: f64,
    #[builder(default = 100)]
    pub donut_segments: usize,

    // Input limits
    #[builder(default = 20)]
    pub label_max_len: usize,
    #[builder(default = 6)]
    pub percentage_max_len: usize,

    // Text configuration
    #[builder(default = 24.0)]
    pub text_size: f32,
    #[builder(default = 30)]
    pub label_line_spacing: i32,
    #[builder(default = 100)]
    pub label_bottom_offset: i32,
    #[builder(default = 160)]
    pub prompt_bottom_offset: i32,

    // Colors
    #[builder(default = Color::WHITE)]
    pub background_color: Color,
    #[builder(default = Color::BLACK)]
    pub text_color: Color,
    pub track_color: Option<Color>,

    // Font configuration
    pub font_path: Option<PathBuf>,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GaugeConfig {
    /// Layout for the configured style, centered horizontally in the window.
    pub fn gauge_spec(&self) -> GaugeSpec {
        self.gauge_spec_for(self.style)
    }

    pub fn gauge_spec_for(&self, style: Style) -> GaugeSpec {
        let center = Point::new(
            self.window_width as f64 / 2.0,
            self.window_height as f64 * self.gauge_center_y_factor,
        );
        let mut spec = GaugeSpec::for_style(style, center);
        spec.segments = self.donut_segments;
        spec.ink_color = self.text_color;
        if let Some(track) = self.track_color {
            spec.track_color = track;
        }
        spec
    }
}
