use std::fmt;
use std::str::FromStr;

use palette::{IntoColor, Oklch, Srgb};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected color input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid hex color {input:?}: expected #RRGGBB")]
    InvalidFormat { input: String },
}

impl ColorError {
    fn invalid(input: &str) -> Self {
        Self::InvalidFormat {
            input: input.to_string(),
        }
    }
}

/// A decoded sRGB triple. Only used as a computation intermediate; colors are
/// stored as [`Hex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a triple from unbounded channel values, rounding half away from
    /// zero and clamping each channel to `[0, 255]`.
    pub fn from_f64(r: f64, g: f64, b: f64) -> Self {
        fn channel(c: f64) -> u8 {
            c.round().clamp(0.0, 255.0) as u8
        }
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Serialize to lowercase `#rrggbb`.
    pub fn to_hex(self) -> Hex {
        Hex(self.to_string())
    }

    /// Convert to `palette::Srgb<u8>`.
    pub fn to_srgb_u8(self) -> Srgb<u8> {
        Srgb::new(self.r, self.g, self.b)
    }

    /// Convert to Oklch, used for the lightness/chroma/hue readout in the panel.
    pub fn to_oklch(self) -> Oklch {
        let srgb: Srgb<f32> = self.to_srgb_u8().into_format();
        srgb.into_color()
    }

    /// sRGB relative luminance in `[0, 1]`.
    ///
    /// Classification compares these values directly, so the arithmetic is kept
    /// in `f64` and never reordered.
    pub fn relative_luminance(self) -> f64 {
        fn linearize(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
    }

    /// WCAG contrast ratio between two colors, in `[1, 21]`.
    pub fn contrast_ratio(c1: Rgb, c2: Rgb) -> f64 {
        let l1 = c1.relative_luminance();
        let l2 = c2.relative_luminance();
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A color in canonical `#RRGGBB` form.
///
/// Always 7 bytes: `#` followed by six hex digits. Letter case is kept exactly
/// as it was given, and equality is plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hex(String);

impl Hex {
    /// Parse user input: exactly `#RGB` or `#RRGGBB`, with no surrounding
    /// whitespace. Three-digit input is expanded by doubling each digit.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let digits = input
            .strip_prefix('#')
            .ok_or_else(|| ColorError::invalid(input))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::invalid(input));
        }
        match digits.len() {
            6 => Ok(Self(input.to_string())),
            3 => Ok(Self::expand_short(digits)),
            _ => Err(ColorError::invalid(input)),
        }
    }

    /// Expand three hex digits (without `#`) to `#rrggbb`, keeping case.
    pub(crate) fn expand_short(digits: &str) -> Self {
        let mut out = String::with_capacity(7);
        out.push('#');
        for c in digits.chars() {
            out.push(c);
            out.push(c);
        }
        Self(out)
    }

    /// Wrap six already-validated hex digits (without `#`).
    pub(crate) fn from_digits(digits: &str) -> Self {
        Self(format!("#{digits}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the channels. Infallible because the digits were validated on
    /// construction.
    pub fn rgb(&self) -> Rgb {
        let b = self.0.as_bytes();
        let byte = |i: usize| (nibble(b[i]) << 4) | nibble(b[i + 1]);
        Rgb::new(byte(1), byte(3), byte(5))
    }

    pub fn relative_luminance(&self) -> f64 {
        self.rgb().relative_luminance()
    }
}

fn nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Hex {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Hex {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Hex {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        hex_to_rgb(&value)?;
        Ok(Self(value))
    }
}

impl From<Hex> for String {
    fn from(hex: Hex) -> Self {
        hex.0
    }
}

impl PartialEq<str> for Hex {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Hex {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Decode a strict `#RRGGBB` string (either case).
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ColorError> {
    let digits = hex
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| ColorError::invalid(hex))?;
    Ok(Hex::from_digits(digits).rgb())
}

/// Encode channel values as lowercase `#rrggbb`, rounding and clamping each.
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> Hex {
    Rgb::from_f64(r, g, b).to_hex()
}
