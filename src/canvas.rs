// ============================================================================
// SOFTWARE RASTERIZER
// ============================================================================
//
// Draws a list of primitives into an RGBA8 frame. Filled shapes are solid and
// sampled once at each pixel center, so a shape drawn over another with the
// same outline replaces it exactly. Lines and text are anti-aliased.

use crate::color::Color;
use crate::geometry::{ArcKind, Point, Primitive};
use anyhow::{Context, Result};
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::path::Path;

const FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load the font at `path`, or the first well-known system font.
///
/// An explicit path that cannot be loaded is an error. With no path, a
/// missing system font yields `Ok(None)` and text is not drawn.
pub fn load_font(path: Option<&Path>) -> Result<Option<Font<'static>>> {
    if let Some(path) = path {
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read font {}", path.display()))?;
        let font = Font::try_from_vec(data)
            .with_context(|| format!("{} is not a usable font", path.display()))?;
        return Ok(Some(font));
    }
    for candidate in FALLBACK_FONTS {
        if let Ok(data) = std::fs::read(candidate) {
            if let Some(font) = Font::try_from_vec(data) {
                tracing::debug!(font = candidate, "loaded system font");
                return Ok(Some(font));
            }
        }
    }
    tracing::warn!("no system font found, text will not be drawn (use --font)");
    Ok(None)
}

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        debug_assert!(frame.len() >= width * height * 4);
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    /// Draw `primitives` in order. Text is skipped without a font.
    pub fn render(&mut self, primitives: &[Primitive], font: Option<&Font>) {
        for primitive in primitives {
            match primitive {
                Primitive::Rect {
                    origin,
                    width,
                    height,
                    color,
                } => self.fill_rect(*origin, *width, *height, *color),
                Primitive::Circle {
                    center,
                    radius,
                    color,
                } => self.fill_circle(*center, *radius, *color),
                Primitive::Arc {
                    center,
                    radius,
                    start_deg,
                    extent_deg,
                    kind,
                    color,
                } => self.fill_arc(*center, *radius, *start_deg, *extent_deg, *kind, *color),
                Primitive::Polygon { points, color } => self.fill_polygon(points, *color),
                Primitive::Line {
                    from,
                    to,
                    width,
                    color,
                } => self.draw_thick_line_aa(*from, *to, *width as f32, *color),
                Primitive::Text {
                    at,
                    text,
                    size,
                    color,
                } => {
                    if let Some(font) = font {
                        self.draw_text(*at, text, font, Scale::uniform(*size), *color);
                    }
                }
            }
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some(Color::new(
            self.frame[idx],
            self.frame[idx + 1],
            self.frame[idx + 2],
        ))
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let blend = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        let out = [
            blend(color.r, self.frame[idx]),
            blend(color.g, self.frame[idx + 1]),
            blend(color.b, self.frame[idx + 2]),
            0xff,
        ];
        self.frame[idx..idx + 4].copy_from_slice(&out);
    }

    /// Pixel range covering `[lo, hi]`, clipped to the frame.
    fn span(&self, lo: f64, hi: f64, limit: usize) -> std::ops::Range<i32> {
        let start = lo.floor().max(0.0) as i32;
        let end = (hi.ceil() + 1.0).min(limit as f64).max(0.0) as i32;
        start..end
    }

    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Color) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        for y in self.span(origin.y, origin.y + height, self.height) {
            let py = y as f64 + 0.5;
            if py < origin.y || py >= origin.y + height {
                continue;
            }
            for x in self.span(origin.x, origin.x + width, self.width) {
                let px = x as f64 + 0.5;
                if px >= origin.x && px < origin.x + width {
                    self.set_pixel(x, y, color, 1.0);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.fill_arc(center, radius, 0.0, 360.0, ArcKind::Sector, color);
    }

    /// Solid fill of every pixel whose center lies inside the arc.
    fn fill_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_deg: f64,
        extent_deg: f64,
        kind: ArcKind,
        color: Color,
    ) {
        if extent_deg.abs() < 1e-9 || radius <= 0.0 {
            return;
        }
        let (inner, outer) = match kind {
            ArcKind::Sector => (0.0, radius),
            ArcKind::Band { width } => ((radius - width / 2.0).max(0.0), radius + width / 2.0),
        };
        for y in self.span(center.y - outer, center.y + outer, self.height) {
            let dy = y as f64 + 0.5 - center.y;
            for x in self.span(center.x - outer, center.x + outer, self.width) {
                let dx = x as f64 + 0.5 - center.x;
                let dist = dx.hypot(dy);
                if dist > outer || dist < inner {
                    continue;
                }
                if in_sweep((-dy).atan2(dx).to_degrees(), start_deg, extent_deg) {
                    self.set_pixel(x, y, color, 1.0);
                }
            }
        }
    }

    /// Even-odd fill sampled at pixel centers; shared edges belong to
    /// exactly one side so tiled polygons neither gap nor double up.
    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.len() < 3 || polygon_area(points).abs() < 1e-9 {
            return;
        }
        let (min_x, max_x, min_y, max_y) = points.iter().fold(
            (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
            |(min_x, max_x, min_y, max_y), p| {
                (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y))
            },
        );
        for y in self.span(min_y, max_y, self.height) {
            let py = y as f64 + 0.5;
            for x in self.span(min_x, max_x, self.width) {
                let px = x as f64 + 0.5;
                if contains(points, px, py) {
                    self.set_pixel(x, y, color, 1.0);
                }
            }
        }
    }

    fn draw_thick_line_aa(&mut self, from: Point, to: Point, thickness: f32, color: Color) {
        let (x0, y0) = (from.x.round() as i32, from.y.round() as i32);
        let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);
        let min_x = x0.min(x1) - thickness.ceil() as i32 - 1;
        let max_x = x0.max(x1) + thickness.ceil() as i32 + 1;
        let min_y = y0.min(y1) - thickness.ceil() as i32 - 1;
        let max_y = y0.max(y1) + thickness.ceil() as i32 + 1;
        let dx = (x1 - x0) as f32;
        let dy = (y1 - y0) as f32;
        let len_sq = dx * dx + dy * dy;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 - x0 as f32;
                let py = y as f32 - y0 as f32;
                let t = if len_sq > 0.0 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let lx = x0 as f32 + t * dx;
                let ly = y0 as f32 + t * dy;
                let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
                let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.set_pixel(x, y, color, aa);
                }
            }
        }
    }

    /// Draw `text` centered on `at`.
    fn draw_text(&mut self, at: Point, text: &str, font: &Font, scale: Scale, color: Color) {
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<PositionedGlyph> = font
            .layout(text, scale, point(0.0, v_metrics.ascent))
            .collect();
        let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
            (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
            |(min_x, max_x, min_y, max_y), bb| {
                (
                    min_x.min(bb.min.x),
                    max_x.max(bb.max.x),
                    min_y.min(bb.min.y),
                    max_y.max(bb.max.y),
                )
            },
        );
        if min_x >= max_x || min_y >= max_y {
            return;
        }
        let offset_x = at.x.round() as i32 - (max_x - min_x) / 2;
        let offset_y = at.y.round() as i32 - (max_y - min_y) / 2;
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = offset_x + gx as i32 + bb.min.x - min_x;
                    let py = offset_y + gy as i32 + bb.min.y - min_y;
                    self.set_pixel(px, py, color, v);
                });
            }
        }
    }
}

/// Whether `angle_deg` lies on the sweep from `start_deg` through the signed
/// `extent_deg`. Extents of a full turn or more cover every angle.
fn in_sweep(angle_deg: f64, start_deg: f64, extent_deg: f64) -> bool {
    if extent_deg.abs() >= 360.0 {
        return true;
    }
    let offset = if extent_deg >= 0.0 {
        angle_deg - start_deg
    } else {
        start_deg - angle_deg
    };
    offset.rem_euclid(360.0) <= extent_deg.abs()
}

fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        / 2.0
}

fn contains(points: &[Point], px: f64, py: f64) -> bool {
    let n = points.len();
    let mut inside = false;
    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        if (a.y > py) != (b.y > py) {
            let cross_x = a.x + (py - a.y) * (b.x - a.x) / (b.y - a.y);
            if px < cross_x {
                inside = !inside;
            }
        }
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Style;
    use crate::geometry::{primitives, GaugeSpec};
    use crate::input::Percentage;

    const SIZE: usize = 64;

    fn frame() -> Vec<u8> {
        vec![0; SIZE * SIZE * 4]
    }

    fn small_spec(style: Style) -> GaugeSpec {
        let mut spec = GaugeSpec::for_style(style, Point::new(32.0, 32.0));
        spec.outer_radius = 24.0;
        spec.inner_radius = 14.0;
        spec
    }

    #[test]
    fn sweep_membership_handles_wrap_and_direction() {
        assert!(in_sweep(100.0, 90.0, 20.0));
        assert!(!in_sweep(80.0, 90.0, 20.0));
        assert!(in_sweep(-170.0, 135.0, 270.0));
        assert!(!in_sweep(90.0, 135.0, 270.0));
        // Clockwise from the top.
        assert!(in_sweep(45.0, 90.0, -90.0));
        assert!(!in_sweep(135.0, 90.0, -90.0));
        assert!(in_sweep(12.3, 90.0, -360.0));
    }

    fn render(primitives: &[Primitive], width: usize, height: usize) -> Vec<u8> {
        let mut buf = vec![0; width * height * 4];
        let mut canvas = Canvas::new(&mut buf, width, height);
        canvas.clear(Color::WHITE);
        canvas.render(primitives, None);
        buf
    }

    fn color_of(primitive: &Primitive) -> Color {
        match primitive {
            Primitive::Rect { color, .. }
            | Primitive::Circle { color, .. }
            | Primitive::Arc { color, .. }
            | Primitive::Polygon { color, .. }
            | Primitive::Line { color, .. }
            | Primitive::Text { color, .. } => *color,
        }
    }

    #[test]
    fn full_value_hides_every_track_pixel() {
        let config = crate::config::GaugeConfig::default();
        let (width, height) = (config.window_width, config.window_height);
        let full = Percentage::new(100.0).unwrap();
        for style in [Style::Bar, Style::Pie, Style::Needle, Style::Donut, Style::HalfDial] {
            let spec = config.gauge_spec_for(style);
            let with_track = primitives(full, &spec);
            let without_track: Vec<_> = with_track
                .iter()
                .filter(|p| color_of(p) != spec.track_color)
                .cloned()
                .collect();
            assert!(without_track.len() < with_track.len(), "{style:?}");

            let a = render(&with_track, width, height);
            let b = render(&without_track, width, height);
            let differing = a
                .chunks_exact(4)
                .zip(b.chunks_exact(4))
                .filter(|(x, y)| x != y)
                .count();
            assert_eq!(differing, 0, "{style:?}");
        }
    }

    #[test]
    fn full_pie_is_only_fill_and_background() {
        let mut buf = frame();
        let mut canvas = Canvas::new(&mut buf, SIZE, SIZE);
        canvas.clear(Color::WHITE);
        let spec = small_spec(Style::Pie);
        canvas.render(&primitives(Percentage::new(100.0).unwrap(), &spec), None);
        for y in 0..SIZE {
            for x in 0..SIZE {
                let dist = (x as f64 + 0.5 - 32.0).hypot(y as f64 + 0.5 - 32.0);
                let expected = if dist <= 24.0 { Color::GREEN } else { Color::WHITE };
                assert_eq!(canvas.pixel(x, y), Some(expected), "({x}, {y})");
            }
        }
    }

    #[test]
    fn empty_pie_shows_only_background() {
        let mut buf = frame();
        let mut canvas = Canvas::new(&mut buf, SIZE, SIZE);
        canvas.clear(Color::WHITE);
        let spec = small_spec(Style::Pie);
        canvas.render(&primitives(Percentage::new(0.0).unwrap(), &spec), None);
        assert_eq!(canvas.pixel(32, 20), Some(Color::GREY));
        assert_eq!(canvas.pixel(32, 44), Some(Color::GREY));
    }

    #[test]
    fn half_pie_fills_left_side() {
        let mut buf = frame();
        let mut canvas = Canvas::new(&mut buf, SIZE, SIZE);
        canvas.clear(Color::WHITE);
        let spec = small_spec(Style::Pie);
        canvas.render(&primitives(Percentage::new(50.0).unwrap(), &spec), None);
        // Counter-clockwise from the top covers the left half.
        assert_eq!(canvas.pixel(20, 32), Some(Color::ORANGE));
        assert_eq!(canvas.pixel(44, 32), Some(Color::GREY));
    }

    #[test]
    fn full_donut_ring_has_no_gaps() {
        let mut buf = frame();
        let mut canvas = Canvas::new(&mut buf, SIZE, SIZE);
        canvas.clear(Color::WHITE);
        let spec = small_spec(Style::Donut);
        canvas.render(&primitives(Percentage::new(100.0).unwrap(), &spec), None);
        for y in 0..SIZE {
            for x in 0..SIZE {
                let pixel = canvas.pixel(x, y);
                assert!(
                    pixel == Some(Color::GREEN) || pixel == Some(Color::WHITE),
                    "({x}, {y}) is {pixel:?}"
                );
                let dist = (x as f64 + 0.5 - 32.0).hypot(y as f64 + 0.5 - 32.0);
                if dist > 14.5 && dist < 23.5 {
                    assert_eq!(pixel, Some(Color::GREEN), "({x}, {y})");
                }
            }
        }
        assert_eq!(canvas.pixel(32, 32), Some(Color::WHITE));
    }

    #[test]
    fn bar_fill_stops_at_value() {
        let mut buf = frame();
        let mut canvas = Canvas::new(&mut buf, SIZE, SIZE);
        canvas.clear(Color::WHITE);
        let mut spec = small_spec(Style::Bar);
        spec.outer_radius = 20.0;
        spec.bar_height = 10.0;
        canvas.render(&primitives(Percentage::new(25.0).unwrap(), &spec), None);
        let fill = crate::color::color_for(Percentage::new(25.0).unwrap());
        assert_eq!(canvas.pixel(12, 32), Some(fill));
        assert_eq!(canvas.pixel(21, 32), Some(fill));
        assert_eq!(canvas.pixel(22, 32), Some(Color::GREY));
        assert_eq!(canvas.pixel(51, 32), Some(Color::GREY));
        assert_eq!(canvas.pixel(52, 32), Some(Color::WHITE));
    }

    #[test]
    fn out_of_frame_drawing_is_clipped() {
        let mut buf = frame();
        let mut canvas = Canvas::new(&mut buf, SIZE, SIZE);
        canvas.clear(Color::WHITE);
        canvas.render(
            &[
                Primitive::Circle {
                    center: Point::new(-10.0, -10.0),
                    radius: 15.0,
                    color: Color::RED,
                },
                Primitive::Line {
                    from: Point::new(0.0, 0.0),
                    to: Point::new(200.0, 200.0),
                    width: 2.0,
                    color: Color::BLACK,
                },
            ],
            None,
        );
        assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(canvas.pixel(SIZE, 0), None);
    }

    #[test]
    fn text_without_font_is_skipped() {
        let mut buf = frame();
        let mut canvas = Canvas::new(&mut buf, SIZE, SIZE);
        canvas.clear(Color::WHITE);
        canvas.render(
            &[Primitive::Text {
                at: Point::new(32.0, 32.0),
                text: "42%".to_string(),
                size: 20.0,
                color: Color::BLACK,
            }],
            None,
        );
        assert!((0..SIZE).all(|x| canvas.pixel(x, 32) == Some(Color::WHITE)));
    }

    #[test]
    fn explicit_missing_font_is_an_error() {
        assert!(load_font(Some(Path::new("/nonexistent/font.ttf"))).is_err());
    }
}
