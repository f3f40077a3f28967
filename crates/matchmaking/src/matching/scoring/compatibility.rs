/// Age gap at which compatibility bottoms out.
pub const MAX_AGE_GAP: u32 = 50;

/// Score used whenever either age is unknown.
pub const NEUTRAL_COMPATIBILITY: f64 = 0.5;

/// `1 - min(|a - b|, 50) / 50`, or the neutral score when an age is missing.
pub fn compatibility(age_a: Option<u8>, age_b: Option<u8>) -> f64 {
    match (age_a, age_b) {
        (Some(a), Some(b)) => {
            let gap = u32::from(a.abs_diff(b)).min(MAX_AGE_GAP);
            1.0 - f64::from(gap) / f64::from(MAX_AGE_GAP)
        }
        _ => NEUTRAL_COMPATIBILITY,
    }
}
