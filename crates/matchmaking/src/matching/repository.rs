use chrono::{DateTime, Utc};

use super::domain::{
    ActorId, InterestDirection, InterestRecord, PopularityNotification, Profile, ProfileDraft,
    ProfileId,
};

/// Result of writing a profile for an owning actor.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileWrite {
    pub profile: Profile,
    pub created: bool,
}

/// Profile persistence collaborator.
pub trait ProfileRepository: Send + Sync {
    /// Create the owner's profile, or update the existing one in place.
    /// At most one profile may exist per owner.
    fn upsert_for_owner(
        &self,
        owner: ActorId,
        draft: ProfileDraft,
        at: DateTime<Utc>,
    ) -> Result<ProfileWrite, RepositoryError>;
    /// Store a profile with no owning actor (seed data).
    fn insert_unowned(
        &self,
        draft: ProfileDraft,
        at: DateTime<Utc>,
    ) -> Result<Profile, RepositoryError>;
    fn fetch(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError>;
    fn find_by_owner(&self, owner: ActorId) -> Result<Option<Profile>, RepositoryError>;
    /// Every stored profile in ascending id order.
    fn list(&self) -> Result<Vec<Profile>, RepositoryError>;
    /// Set the popularity marker if it is still unset. Returns `true` only for
    /// the call that performed the transition.
    fn mark_popularity_notified(
        &self,
        id: ProfileId,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;
}

/// Interest record persistence collaborator.
pub trait InterestRepository: Send + Sync {
    /// Atomically create or overwrite the record for `(actor, target)`.
    fn upsert(
        &self,
        actor: ActorId,
        target: ProfileId,
        direction: InterestDirection,
        at: DateTime<Utc>,
    ) -> Result<InterestRecord, RepositoryError>;
    fn find(
        &self,
        actor: ActorId,
        target: ProfileId,
    ) -> Result<Option<InterestRecord>, RepositoryError>;
    fn exists(
        &self,
        actor: ActorId,
        target: ProfileId,
        direction: InterestDirection,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .find(actor, target)?
            .is_some_and(|record| record.direction == direction))
    }
    fn count_interested(&self, target: ProfileId) -> Result<u64, RepositoryError>;
    /// The actor's `interested` records in creation order.
    fn list_interested(&self, actor: ActorId) -> Result<Vec<InterestRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook (e-mail, chat, queue adapters).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: PopularityNotification) -> Result<(), NotificationError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
