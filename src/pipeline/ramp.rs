use serde::Serialize;

use crate::color::{rgb_to_hex, Hex};

/// Number of tints and of shades derived from a base color.
pub const DEFAULT_VARIATIONS: usize = 15;

/// Tints and shades derived from one base color, each ordered from the step
/// nearest the base toward white or black.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ramp {
    pub base: Hex,
    pub tints: Vec<Hex>,
    pub shades: Vec<Hex>,
}

/// Sample the straight lines from `base` to white (tints) and to black
/// (shades) at `i / (variations + 1)` for `i` in `1..=variations`.
///
/// Channels are rounded independently at every step.
pub fn generate_ramp(base: &Hex, variations: usize) -> Ramp {
    let factor = 1.0 / (variations as f64 + 1.0);
    let rgb = base.rgb();
    let [r, g, b] = rgb.channels().map(f64::from);

    let mut tints = Vec::with_capacity(variations);
    let mut shades = Vec::with_capacity(variations);
    for i in 1..=variations {
        let i = i as f64;
        let tint = |c: f64| c + (255.0 - c) * factor * i;
        let shade = |c: f64| c * (1.0 - factor * i);
        tints.push(rgb_to_hex(tint(r), tint(g), tint(b)));
        shades.push(rgb_to_hex(shade(r), shade(g), shade(b)));
    }

    Ramp {
        base: base.clone(),
        tints,
        shades,
    }
}
