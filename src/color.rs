use crate::input::Percentage;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::new(0xff, 0x00, 0x00);
    pub const ORANGE: Color = Color::new(0xff, 0xa5, 0x00);
    pub const GREEN: Color = Color::new(0x00, 0xff, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const GREY: Color = Color::new(0xc8, 0xc8, 0xc8);
    pub const LIGHT_GREY: Color = Color::new(0xd3, 0xd3, 0xd3);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Channels scaled to `[0, 1]`.
    pub fn to_normalized(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Map a percentage onto the red -> orange -> green scale.
///
/// `[0, 50]` runs red to orange, `(50, 100]` runs orange to green. The value
/// 50 belongs to the lower half, which yields orange exactly.
pub fn color_for(percentage: Percentage) -> Color {
    let p = percentage.value();
    if p <= 50.0 {
        let ratio = p / 50.0;
        Color::new(255, channel(165.0 * ratio), 0)
    } else {
        let ratio = (p - 50.0) / 50.0;
        Color::new(channel(255.0 * (1.0 - ratio)), 255, 0)
    }
}

fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
