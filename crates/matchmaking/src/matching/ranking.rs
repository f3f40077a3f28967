use std::cmp::Ordering;

use serde::Serialize;

use super::domain::{Coordinates, Profile, ProfileId};
use super::pagination::{Page, PageRequest};
use super::scoring::CandidateScore;

/// Inputs that stay fixed across one ranking pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingQuery {
    pub origin: Coordinates,
    pub requester_age: Option<u8>,
    /// The requester's own profile, which is never a candidate.
    pub exclude: Option<ProfileId>,
}

/// A candidate profile annotated with its scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub profile: Profile,
    pub distance_km: Option<f64>,
    pub compatibility_score: f64,
}

impl RankedCandidate {
    fn score(&self) -> CandidateScore {
        CandidateScore {
            distance_km: self.distance_km,
            compatibility: self.compatibility_score,
        }
    }
}

/// Orders candidates by distance ascending (unknown distances last), then
/// compatibility descending.
///
/// Ordering is computed here rather than by the backing store so that every
/// store yields the same sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateRanker;

impl CandidateRanker {
    pub fn rank(
        &self,
        candidates: Vec<Profile>,
        query: &RankingQuery,
        page: PageRequest,
    ) -> Page<RankedCandidate> {
        page.paginate(self.order(candidates, query))
    }

    /// Score and fully order the candidate set. Input order breaks any
    /// remaining ties, since the sort is stable.
    pub fn order(&self, candidates: Vec<Profile>, query: &RankingQuery) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .filter(|profile| Some(profile.id) != query.exclude)
            .map(|profile| {
                let score =
                    CandidateScore::for_candidate(query.origin, query.requester_age, &profile);
                RankedCandidate {
                    profile,
                    distance_km: score.distance_km,
                    compatibility_score: score.compatibility,
                }
            })
            .collect();

        ranked.sort_by(|a, b| compare_scores(&a.score(), &b.score()));
        ranked
    }
}

pub fn compare_scores(a: &CandidateScore, b: &CandidateScore) -> Ordering {
    let by_distance = match (a.distance_km, b.distance_km) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_distance.then_with(|| b.compatibility.total_cmp(&a.compatibility))
}
