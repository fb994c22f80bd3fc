use serde::{Deserialize, Serialize};

/// A colour, expressed in the RGB or grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0.0 to 1.0
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the Gray space, g ranges from 0.0 to 1.0
    pub fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }

    /// Parse a `#rrggbb` (or `rrggbb`) hex string
    pub fn from_hex(hex: &str) -> Option<Colour> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Colour::new_rgb_bytes(channel(0)?, channel(2)?, channel(4)?))
    }

    /// The colour as 0.0..=1.0 RGB components
    pub fn to_rgb(self) -> (f32, f32, f32) {
        match self {
            Colour::RGB { r, g, b } => (r, g, b),
            Colour::Grey { g } => (g, g, g),
        }
    }

    /// The colour as 0..=255 RGB components
    pub fn to_rgb_bytes(self) -> [u8; 3] {
        let (r, g, b) = self.to_rgb();
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [byte(r), byte(g), byte(b)]
    }

    /// Perceptual brightness in 0.0..=1.0, using the Rec. 601 luma weights
    /// `(0.299*R + 0.587*G + 0.114*B) / 255` over 8-bit channels
    pub fn brightness(self) -> f32 {
        let [r, g, b] = self.to_rgb_bytes();
        (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
    }

    /// Linear interpolation between two colours in RGB space
    pub fn lerp(self, other: Colour, t: f32) -> Colour {
        let (r0, g0, b0) = self.to_rgb();
        let (r1, g1, b1) = other.to_rgb();
        let t = t.clamp(0.0, 1.0);
        Colour::RGB {
            r: r0 + (r1 - r0) * t,
            g: g0 + (g1 - g0) * t,
            b: b0 + (b1 - b0) * t,
        }
    }
}

impl From<[u8; 3]> for Colour {
    fn from(c: [u8; 3]) -> Self {
        let [r, g, b] = c;
        Colour::new_rgb_bytes(r, g, b)
    }
}

impl<T: Into<f32>> From<(T, T, T)> for Colour {
    fn from(c: (T, T, T)) -> Self {
        Colour::RGB {
            r: c.0.into(),
            g: c.1.into(),
            b: c.2.into(),
        }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    /// `#333333`, the background used when no photo is supplied
    pub const DARK_GREY: Colour = Colour::Grey { g: 0.2 };
    /// `#f2f2f2`, letterbox fill around contained photos
    pub const LIGHT_GREY: Colour = Colour::Grey { g: 0.95 };
    /// Pale sky blue used behind card-back text when no sky image is supplied
    pub const SKY: Colour = Colour::RGB {
        r: 0.85,
        g: 0.91,
        b: 0.97,
    };
    /// Dark slate used for text on light backgrounds
    pub const INK: Colour = Colour::RGB {
        r: 0.16,
        g: 0.18,
        b: 0.22,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex() {
        assert_eq!(Colour::from_hex("#ff0000"), Some(Colour::new_rgb(1.0, 0.0, 0.0)));
        assert_eq!(Colour::from_hex("00ff00"), Some(Colour::new_rgb(0.0, 1.0, 0.0)));
        assert_eq!(Colour::from_hex("#fff"), None);
        assert_eq!(Colour::from_hex("#gg0000"), None);
    }

    #[test]
    fn brightness_uses_luma_weights() {
        assert_eq!(colours::BLACK.brightness(), 0.0);
        assert!((colours::WHITE.brightness() - 1.0).abs() < 1e-6);
        let red = Colour::new_rgb_bytes(255, 0, 0);
        assert!((red.brightness() - 0.299).abs() < 1e-6);
    }
}
