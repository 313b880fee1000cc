use serde::Serialize;

use crate::color::Hex;

/// Scanned colors split around a primary color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Whether the primary itself was among the inputs.
    pub primary_found: bool,
    /// Colors no brighter than the primary, brightest first.
    pub shades: Vec<Hex>,
    /// Colors brighter than the primary, dimmest first.
    pub tints: Vec<Hex>,
}

/// Split `found` into shades and tints of `primary` by relative luminance.
///
/// Exact matches of the primary are pulled out first. Of the rest, colors with
/// luminance `<=` the primary's are shades and the others tints; both lists run
/// from the color nearest the primary to the most extreme. Ties keep their
/// input order.
pub fn classify(primary: &Hex, found: &[Hex]) -> Classification {
    let primary_luminance = primary.relative_luminance();

    let mut out = Classification::default();
    let mut darker = Vec::new();
    let mut brighter = Vec::new();
    for color in found {
        if color == primary {
            out.primary_found = true;
            continue;
        }
        let luminance = color.relative_luminance();
        if luminance <= primary_luminance {
            darker.push((luminance, color.clone()));
        } else {
            brighter.push((luminance, color.clone()));
        }
    }

    darker.sort_by(|a, b| b.0.total_cmp(&a.0));
    brighter.sort_by(|a, b| a.0.total_cmp(&b.0));

    out.shades = darker.into_iter().map(|(_, c)| c).collect();
    out.tints = brighter.into_iter().map(|(_, c)| c).collect();
    out
}
