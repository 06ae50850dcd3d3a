//! Local extrema (swing high/low) detection on a closing-price sequence.

use crate::models::ExtremaSet;

/// Find local maxima and minima of `closes` under a strict comparison
/// against every neighbor within `order` samples on both sides.
///
/// `order` is the half-width of the comparison window and must be >= 1.
/// Indices closer than `order` to either end can never qualify, so a series
/// with `closes.len() <= 2 * order` yields no extrema. Ties never qualify:
/// a point equal to any neighbor in its window is not an extremum, which
/// makes a flat series return nothing.
///
/// Pure and deterministic; both returned index lists are strictly increasing.
pub fn detect_extrema(closes: &[f64], order: usize) -> ExtremaSet {
    let mut extrema = ExtremaSet::default();
    if order == 0 || closes.len() <= 2 * order {
        return extrema;
    }

    for i in order..closes.len() - order {
        let candidate = closes[i];
        let window = &closes[i - order..=i + order];

        let is_high = window
            .iter()
            .enumerate()
            .all(|(j, &v)| j == order || candidate > v);
        if is_high {
            extrema.highs.push(i);
            continue;
        }

        let is_low = window
            .iter()
            .enumerate()
            .all(|(j, &v)| j == order || candidate < v);
        if is_low {
            extrema.lows.push(i);
        }
    }

    extrema
}
