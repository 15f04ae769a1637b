use super::grade_result::Band;

/// Snap a raw mean to the nearest 0.5, ties resolved half-to-even on the
/// doubled value (7.25 snaps to 7.0, 7.75 snaps to 8.0).
pub fn snap_score(score: f64) -> f64 {
    (score * 2.0).round_ties_even() / 2.0
}

/// Ordered band thresholds, highest first, inclusive at the lower bound.
pub fn band_for(score: f64) -> Option<Band> {
    if score >= 8.5 {
        Some(Band::C1)
    } else if score >= 6.0 {
        Some(Band::B2)
    } else if score >= 4.0 {
        Some(Band::B1)
    } else {
        None
    }
}
