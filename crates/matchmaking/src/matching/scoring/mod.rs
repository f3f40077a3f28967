//! Closed-form proximity and age scoring for recommendation candidates.

mod compatibility;
mod geo;

pub use compatibility::{compatibility, MAX_AGE_GAP, NEUTRAL_COMPATIBILITY};
pub use geo::{distance_km, EARTH_RADIUS_KM};

use serde::Serialize;

use super::domain::{Coordinates, Profile};

/// Per-candidate scores relative to a requester's origin and age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateScore {
    /// `None` when the candidate has no saved location; never defaulted to zero.
    pub distance_km: Option<f64>,
    pub compatibility: f64,
}

impl CandidateScore {
    pub fn for_candidate(origin: Coordinates, requester_age: Option<u8>, candidate: &Profile) -> Self {
        Self {
            distance_km: candidate
                .location
                .map(|location| distance_km(origin, location)),
            compatibility: compatibility(requester_age, Some(candidate.age)),
        }
    }
}
