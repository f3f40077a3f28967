use std::sync::Arc;

use chrono::Utc;
use serde::{de, Deserialize, Deserializer};
use tracing::{debug, info};

use super::config::MatchingConfig;
use super::domain::{
    ActorId, InterestDirection, InterestRecord, Profile, ProfileDraft, ProfileId,
    ProfileSubmission,
};
use super::mutuality::{LikedProfile, MatchEvaluator};
use super::pagination::{Page, PageRequest};
use super::popularity::{PopularityOutcome, PopularityWatcher};
use super::ranking::{CandidateRanker, RankedCandidate, RankingQuery};
use super::repository::{
    InterestRepository, NotificationPublisher, ProfileRepository, RepositoryError,
};
use super::validation::{self, ValidationError};

/// Query accepted by the recommendations endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lng", alias = "lon")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default, alias = "limit")]
    pub page_size: Option<u32>,
}

/// Query accepted by the likes listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InterestListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default, alias = "limit")]
    pub page_size: Option<u32>,
    #[serde(default, deserialize_with = "flag")]
    pub mutual_only: bool,
}

/// Query-string boolean: `true`/`false` or `1`/`0`, case-insensitive.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(de::Error::custom(format!(
            "mutual_only must be true, false, 1, or 0 (got `{other}`)"
        ))),
    }
}

/// The stored record plus what the popularity watcher made of it.
#[derive(Debug, Clone, PartialEq)]
pub struct InterestOutcome {
    pub record: InterestRecord,
    pub popularity: PopularityOutcome,
}

/// Service composing the profile directory, ranker, interest store, and
/// popularity watcher.
pub struct MatchmakingService<P, I, N> {
    profiles: Arc<P>,
    interests: Arc<I>,
    watcher: PopularityWatcher<P, I, N>,
    ranker: CandidateRanker,
    config: MatchingConfig,
}

impl<P, I, N> MatchmakingService<P, I, N>
where
    P: ProfileRepository + 'static,
    I: InterestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(profiles: Arc<P>, interests: Arc<I>, notifier: Arc<N>, config: MatchingConfig) -> Self {
        let watcher = PopularityWatcher::new(
            profiles.clone(),
            interests.clone(),
            notifier,
            config.popularity_threshold,
        );

        Self {
            profiles,
            interests,
            watcher,
            ranker: CandidateRanker,
            config,
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Create the actor's profile on first submission, update it afterwards.
    pub fn upsert_profile(
        &self,
        actor: ActorId,
        submission: ProfileSubmission,
    ) -> Result<Profile, MatchingError> {
        let draft = validation::profile_draft(submission)?;
        let write = self.profiles.upsert_for_owner(actor, draft, Utc::now())?;
        info!(
            actor = %actor,
            profile_id = %write.profile.id,
            created = write.created,
            "profile saved"
        );
        Ok(write.profile)
    }

    /// Store an unowned profile, as produced by the seed importer.
    pub fn seed_profile(&self, draft: ProfileDraft) -> Result<Profile, MatchingError> {
        let profile = self.profiles.insert_unowned(draft, Utc::now())?;
        debug!(profile_id = %profile.id, "seed profile stored");
        Ok(profile)
    }

    pub fn profile_for(&self, actor: ActorId) -> Result<Profile, MatchingError> {
        self.profiles
            .find_by_owner(actor)?
            .ok_or(MatchingError::NoProfile(actor))
    }

    pub fn profile(&self, id: ProfileId) -> Result<Profile, MatchingError> {
        self.profiles
            .fetch(id)?
            .ok_or(MatchingError::ProfileNotFound(id))
    }

    /// Rank every other profile around the requester's origin.
    pub fn recommendations(
        &self,
        actor: ActorId,
        query: RecommendationQuery,
    ) -> Result<Page<RankedCandidate>, MatchingError> {
        let page = self.page_request(query.page, query.page_size)?;
        let explicit_origin = validation::coordinates(query.latitude, query.longitude)?;
        let explicit_age = query.age.map(validation::age).transpose()?;

        let own_profile = self.profiles.find_by_owner(actor)?;
        let origin = explicit_origin
            .or_else(|| own_profile.as_ref().and_then(|profile| profile.location))
            .ok_or(MatchingError::MissingOrigin)?;
        let requester_age = explicit_age.or_else(|| own_profile.as_ref().map(|profile| profile.age));

        let ranking = RankingQuery {
            origin,
            requester_age,
            exclude: own_profile.as_ref().map(|profile| profile.id),
        };
        let candidates = self.profiles.list()?;
        let ranked = self.ranker.rank(candidates, &ranking, page);
        debug!(
            actor = %actor,
            total = ranked.total,
            page = ranked.page,
            "recommendations ranked"
        );
        Ok(ranked)
    }

    /// Record (or overwrite) the actor's interest in a profile.
    pub fn record_interest(
        &self,
        actor: ActorId,
        target: ProfileId,
        direction: InterestDirection,
    ) -> Result<InterestOutcome, MatchingError> {
        let profile = self.profile(target)?;
        if profile.is_owned_by(actor) {
            return Err(ValidationError::SelfInterest.into());
        }

        let now = Utc::now();
        let record = self.interests.upsert(actor, target, direction, now)?;
        info!(
            actor = %actor,
            target = %target,
            direction = direction.label(),
            "interest recorded"
        );

        let popularity = self.watcher.observe(&record, &profile, now)?;
        Ok(InterestOutcome { record, popularity })
    }

    /// Profiles the actor liked, first liked first, each marked mutual or not.
    ///
    /// With `mutual_only`, the whole liked set is filtered before paginating
    /// so `total` counts mutual likes only.
    pub fn list_interests(
        &self,
        actor: ActorId,
        query: InterestListQuery,
    ) -> Result<Page<LikedProfile>, MatchingError> {
        let page = self.page_request(query.page, query.page_size)?;
        let own_profile = self.profiles.find_by_owner(actor)?;
        let likes = self.interests.list_interested(actor)?;

        if query.mutual_only {
            let decorated = self.decorate(actor, own_profile.as_ref(), likes)?;
            let mutual: Vec<LikedProfile> =
                decorated.into_iter().filter(|item| item.is_mutual).collect();
            return Ok(page.paginate(mutual));
        }

        let window = page.paginate(likes);
        let items = self.decorate(actor, own_profile.as_ref(), window.items)?;
        Ok(Page {
            items,
            total: window.total,
            page: window.page,
            page_size: window.page_size,
        })
    }

    fn decorate(
        &self,
        actor: ActorId,
        own_profile: Option<&Profile>,
        likes: Vec<InterestRecord>,
    ) -> Result<Vec<LikedProfile>, MatchingError> {
        let evaluator = MatchEvaluator::new(self.interests.as_ref());
        let mut items = Vec::with_capacity(likes.len());
        for like in likes {
            let Some(profile) = self.profiles.fetch(like.target)? else {
                continue;
            };
            let is_mutual = evaluator.is_mutual(actor, own_profile, &profile)?;
            items.push(LikedProfile {
                profile,
                is_mutual,
                liked_at: like.updated_at,
            });
        }
        Ok(items)
    }

    fn page_request(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<PageRequest, ValidationError> {
        PageRequest::new(
            page.unwrap_or(1),
            page_size.unwrap_or(self.config.default_page_size),
            self.config.max_page_size,
        )
    }
}

/// Error raised by the matchmaking service.
#[derive(Debug, thiserror::Error)]
pub enum MatchingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("latitude and longitude are required, either in the query or on the saved profile")]
    MissingOrigin,
    #[error("profile {0} not found")]
    ProfileNotFound(ProfileId),
    #[error("actor {0} has no profile")]
    NoProfile(ActorId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
