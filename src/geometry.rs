//! Gauge layouts and the draw primitives each style is built from.
//!
//! Angles are degrees, counter-clockwise from the positive x axis with y up.
//! [`point_at`] converts them to y-down pixel coordinates.

use crate::color::{color_for, Color};
use crate::config::Style;
use crate::input::Percentage;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel position of the point at `radius` and `angle_deg` around `center`.
pub fn point_at(center: Point, radius: f64, angle_deg: f64) -> Point {
    let angle = angle_deg.to_radians();
    Point::new(
        center.x + radius * angle.cos(),
        center.y - radius * angle.sin(),
    )
}

/// How an arc is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcKind {
    /// Pie slice from the center out to the radius.
    Sector,
    /// Band of the given width centered on the radius.
    Band { width: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        color: Color,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Color,
    },
    Arc {
        center: Point,
        radius: f64,
        start_deg: f64,
        extent_deg: f64,
        kind: ArcKind,
        color: Color,
    },
    Polygon {
        points: Vec<Point>,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Color,
    },
    /// Text centered on `at`.
    Text {
        at: Point,
        text: String,
        size: f32,
        color: Color,
    },
}

/// Fixed layout of one gauge style.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeSpec {
    pub style: Style,
    pub center: Point,
    /// Arc radius for pie and needle styles, outer ring edge for donut and
    /// half dial, half the maximum width for the bar.
    pub outer_radius: f64,
    /// Inner ring edge for donut and half dial.
    pub inner_radius: f64,
    pub start_deg: f64,
    /// Signed full-scale sweep; negative runs clockwise.
    pub sweep_deg: f64,
    /// Donut tessellation count.
    pub segments: usize,
    /// Stroke width of the needle gauge bands.
    pub band_width: f64,
    pub needle_margin: f64,
    pub needle_width: f64,
    pub dot_radius: f64,
    pub bar_height: f64,
    pub tick_text_size: f32,
    /// Neutral background of the unfilled part.
    pub track_color: Color,
    /// Needle, dot and tick label color.
    pub ink_color: Color,
}

impl GaugeSpec {
    pub fn for_style(style: Style, center: Point) -> Self {
        let base = Self {
            style,
            center,
            outer_radius: 100.0,
            inner_radius: 0.0,
            start_deg: 90.0,
            sweep_deg: 360.0,
            segments: 100,
            band_width: 10.0,
            needle_margin: 10.0,
            needle_width: 2.0,
            dot_radius: 5.0,
            bar_height: 30.0,
            tick_text_size: 16.0,
            track_color: Color::GREY,
            ink_color: Color::BLACK,
        };
        match style {
            Style::Bar => Self {
                outer_radius: 150.0,
                start_deg: 0.0,
                sweep_deg: 0.0,
                ..base
            },
            Style::Pie => base,
            Style::Needle => Self {
                start_deg: 135.0,
                sweep_deg: 270.0,
                ..base
            },
            Style::Donut => Self {
                inner_radius: 60.0,
                sweep_deg: -360.0,
                ..base
            },
            Style::HalfDial => Self {
                outer_radius: 110.0,
                inner_radius: 70.0,
                start_deg: 0.0,
                sweep_deg: 180.0,
                track_color: Color::LIGHT_GREY,
                ..base
            },
        }
    }

    /// Signed angular extent covered by `percentage`.
    pub fn extent(&self, percentage: Percentage) -> f64 {
        percentage.fraction() * self.sweep_deg
    }

    /// Where the value readout sits for this style.
    pub fn value_anchor(&self) -> Point {
        match self.style {
            Style::Donut | Style::HalfDial => self.center,
            Style::Bar => Point::new(self.center.x, self.center.y + self.bar_height + 10.0),
            Style::Pie | Style::Needle => {
                Point::new(self.center.x, self.center.y + self.outer_radius + 30.0)
            }
        }
    }

    fn ring_radius(&self) -> f64 {
        (self.outer_radius + self.inner_radius) / 2.0
    }

    fn ring_width(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }
}

/// Shapes for `percentage` drawn in `spec`'s style, back to front.
pub fn primitives(percentage: Percentage, spec: &GaugeSpec) -> Vec<Primitive> {
    let color = color_for(percentage);
    match spec.style {
        Style::Bar => bar(percentage, spec, color),
        Style::Pie => pie(percentage, spec, color),
        Style::Needle => needle_gauge(percentage, spec, color),
        Style::Donut => donut(percentage, spec, color),
        Style::HalfDial => half_dial(percentage, spec, color),
    }
}

fn bar(percentage: Percentage, spec: &GaugeSpec, color: Color) -> Vec<Primitive> {
    let max_width = spec.outer_radius * 2.0;
    let origin = Point::new(
        spec.center.x - spec.outer_radius,
        spec.center.y - spec.bar_height / 2.0,
    );
    vec![
        Primitive::Rect {
            origin,
            width: max_width,
            height: spec.bar_height,
            color: spec.track_color,
        },
        Primitive::Rect {
            origin,
            width: percentage.fraction() * max_width,
            height: spec.bar_height,
            color,
        },
    ]
}

fn pie(percentage: Percentage, spec: &GaugeSpec, color: Color) -> Vec<Primitive> {
    vec![
        Primitive::Circle {
            center: spec.center,
            radius: spec.outer_radius,
            color: spec.track_color,
        },
        Primitive::Arc {
            center: spec.center,
            radius: spec.outer_radius,
            start_deg: spec.start_deg,
            extent_deg: spec.extent(percentage),
            kind: ArcKind::Sector,
            color,
        },
    ]
}

/// Angle the needle points at.
pub fn needle_angle(percentage: Percentage, spec: &GaugeSpec) -> f64 {
    spec.start_deg + spec.extent(percentage)
}

fn needle_gauge(percentage: Percentage, spec: &GaugeSpec, color: Color) -> Vec<Primitive> {
    let band = ArcKind::Band {
        width: spec.band_width,
    };
    let tip = point_at(
        spec.center,
        spec.outer_radius - spec.needle_margin,
        needle_angle(percentage, spec),
    );
    vec![
        Primitive::Arc {
            center: spec.center,
            radius: spec.outer_radius,
            start_deg: spec.start_deg,
            extent_deg: spec.sweep_deg,
            kind: band,
            color: spec.track_color,
        },
        Primitive::Arc {
            center: spec.center,
            radius: spec.outer_radius,
            start_deg: spec.start_deg,
            extent_deg: spec.extent(percentage),
            kind: band,
            color,
        },
        Primitive::Line {
            from: spec.center,
            to: tip,
            width: spec.needle_width,
            color: spec.ink_color,
        },
        Primitive::Circle {
            center: spec.center,
            radius: spec.dot_radius,
            color: spec.ink_color,
        },
    ]
}

/// One quadrilateral of the donut sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct DonutSegment {
    pub start_deg: f64,
    pub end_deg: f64,
    /// Outer at start, outer at end, inner at end, inner at start.
    pub corners: [Point; 4],
}

/// Tessellate the donut sweep into exactly `spec.segments` quads.
///
/// Segment `i` spans the index ratios `i/N` to `(i+1)/N` of the swept
/// extent, so neighbours share an edge and the last one ends on the sweep.
pub fn donut_segments(percentage: Percentage, spec: &GaugeSpec) -> Vec<DonutSegment> {
    ring_segments(spec.extent(percentage), spec)
}

fn ring_segments(extent: f64, spec: &GaugeSpec) -> Vec<DonutSegment> {
    let n = spec.segments;
    (0..n)
        .map(|i| {
            let start_deg = spec.start_deg + extent * (i as f64 / n as f64);
            let end_deg = spec.start_deg + extent * ((i + 1) as f64 / n as f64);
            DonutSegment {
                start_deg,
                end_deg,
                corners: [
                    point_at(spec.center, spec.outer_radius, start_deg),
                    point_at(spec.center, spec.outer_radius, end_deg),
                    point_at(spec.center, spec.inner_radius, end_deg),
                    point_at(spec.center, spec.inner_radius, start_deg),
                ],
            }
        })
        .collect()
}

fn donut(percentage: Percentage, spec: &GaugeSpec, color: Color) -> Vec<Primitive> {
    // The track uses the same tessellation as a full sweep so a full value
    // covers it edge for edge.
    let quads = |segments: Vec<DonutSegment>, color: Color| {
        segments.into_iter().map(move |segment| Primitive::Polygon {
            points: segment.corners.to_vec(),
            color,
        })
    };
    let mut out = Vec::with_capacity(spec.segments * 2);
    out.extend(quads(ring_segments(spec.sweep_deg, spec), spec.track_color));
    out.extend(quads(donut_segments(percentage, spec), color));
    out
}

const HALF_DIAL_TICKS: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

fn half_dial(percentage: Percentage, spec: &GaugeSpec, color: Color) -> Vec<Primitive> {
    let band = ArcKind::Band {
        width: spec.ring_width(),
    };
    let mut out = vec![
        Primitive::Arc {
            center: spec.center,
            radius: spec.ring_radius(),
            start_deg: spec.start_deg,
            extent_deg: spec.sweep_deg,
            kind: band,
            color: spec.track_color,
        },
        Primitive::Arc {
            center: spec.center,
            radius: spec.ring_radius(),
            start_deg: spec.start_deg,
            extent_deg: spec.extent(percentage),
            kind: band,
            color,
        },
    ];
    let label_radius = spec.outer_radius + spec.tick_text_size as f64;
    for tick in HALF_DIAL_TICKS {
        let angle = spec.start_deg + spec.sweep_deg * tick / 100.0;
        out.push(Primitive::Text {
            at: point_at(spec.center, label_radius, angle),
            text: format!("{}%", tick),
            size: spec.tick_text_size,
            color: spec.ink_color,
        });
    }
    out
}
