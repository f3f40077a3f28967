use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{ActorId, InterestDirection, Profile};
use super::repository::{InterestRepository, RepositoryError};

/// A liked profile decorated with whether the like is returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikedProfile {
    pub profile: Profile,
    pub is_mutual: bool,
    pub liked_at: DateTime<Utc>,
}

/// Checks both directions of interest between a requester and a candidate.
pub struct MatchEvaluator<'a, I: ?Sized> {
    interests: &'a I,
}

impl<'a, I> MatchEvaluator<'a, I>
where
    I: InterestRepository + ?Sized,
{
    pub fn new(interests: &'a I) -> Self {
        Self { interests }
    }

    /// `true` when the requester is interested in `candidate` and the
    /// candidate's owner is interested in the requester's profile.
    ///
    /// A requester without a profile, or an unowned candidate, is never mutual.
    pub fn is_mutual(
        &self,
        requester: ActorId,
        requester_profile: Option<&Profile>,
        candidate: &Profile,
    ) -> Result<bool, RepositoryError> {
        let (Some(requester_profile), Some(candidate_owner)) = (requester_profile, candidate.owner)
        else {
            return Ok(false);
        };

        if !self
            .interests
            .exists(requester, candidate.id, InterestDirection::Interested)?
        {
            return Ok(false);
        }

        self.interests.exists(
            candidate_owner,
            requester_profile.id,
            InterestDirection::Interested,
        )
    }
}
