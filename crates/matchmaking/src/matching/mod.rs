//! Recommendation ranking and the swipe / mutual-interest model.
//!
//! Candidates are scored by haversine distance and age compatibility and
//! ordered in application code. Interest records are kept one per
//! `(actor, target)` pair; mutuality and the one-shot popularity alert are
//! derived from them.

pub mod config;
pub mod domain;
pub mod import;
pub mod memory;
pub mod mutuality;
pub mod pagination;
pub mod popularity;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use config::MatchingConfig;
pub use domain::{
    ActorId, Coordinates, InterestDirection, InterestId, InterestRecord, PopularityNotification,
    Profile, ProfileDraft, ProfileId, ProfileSubmission,
};
pub use import::{ProfileImportError, ProfileImporter};
pub use memory::{InMemoryInterestRepository, InMemoryProfileRepository};
pub use mutuality::{LikedProfile, MatchEvaluator};
pub use pagination::{Page, PageRequest};
pub use popularity::{PopularityOutcome, PopularityWatcher};
pub use ranking::{CandidateRanker, RankedCandidate, RankingQuery};
pub use repository::{
    InterestRepository, NotificationError, NotificationPublisher, ProfileRepository,
    ProfileWrite, RepositoryError,
};
pub use router::{matching_router, InterestRequest, ACTOR_HEADER};
pub use service::{
    InterestListQuery, InterestOutcome, MatchingError, MatchmakingService, RecommendationQuery,
};
pub use validation::ValidationError;
