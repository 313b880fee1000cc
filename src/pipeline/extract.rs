use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::color::{Hex, Rgb};

/// `#` plus the whole run of hex digits that follows it. Only runs of exactly
/// 3 or 6 digits are colors, so `#FFAABBCC` yields nothing.
static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9A-Fa-f]+)").expect("hex color pattern"));

static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"rgba?\(\s*([0-9]{1,3})\s*,\s*([0-9]{1,3})\s*,\s*([0-9]{1,3})\s*(?:,\s*(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)%?\s*)?\)",
    )
    .expect("rgb color pattern")
});

/// Find every color literal in `text`.
///
/// Hex literals come first, then `rgb()`/`rgba()` literals, each group in
/// order of appearance. Repeated literals are returned repeatedly; pass the
/// result through [`unique`] to get the set.
///
/// `rgb()` channels above 255 are clamped.
pub fn extract_colors(text: &str) -> Vec<Hex> {
    let hex = HEX_RE.captures_iter(text).filter_map(|caps| {
        let digits = caps.get(1)?.as_str();
        match digits.len() {
            6 => Some(Hex::from_digits(digits)),
            3 => Some(Hex::expand_short(digits)),
            _ => None,
        }
    });

    let rgb = RGB_RE.captures_iter(text).filter_map(|caps| {
        let mut channels = [0u8; 3];
        for (slot, i) in channels.iter_mut().zip(1..=3) {
            let value: u16 = caps.get(i)?.as_str().parse().ok()?;
            *slot = value.min(255) as u8;
        }
        let [r, g, b] = channels;
        Some(Rgb::new(r, g, b).to_hex())
    });

    hex.chain(rgb).collect()
}

/// Drop repeated colors, keeping the first occurrence of each.
pub fn unique(colors: impl IntoIterator<Item = Hex>) -> Vec<Hex> {
    let mut seen = HashSet::new();
    colors
        .into_iter()
        .filter(|c| seen.insert(c.clone()))
        .collect()
}
