use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{InterestDirection, InterestRecord, PopularityNotification, Profile};
use super::repository::{
    InterestRepository, NotificationPublisher, ProfileRepository, RepositoryError,
};

/// What the watcher decided after an interest write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopularityOutcome {
    /// The write was not an `interested` swipe; nothing was counted.
    Skipped,
    BelowThreshold { like_count: u64 },
    AlreadyNotified { like_count: u64 },
    Notified { like_count: u64 },
}

/// Fires a single notification the first time a profile's like count
/// exceeds the configured threshold.
pub struct PopularityWatcher<P, I, N> {
    profiles: Arc<P>,
    interests: Arc<I>,
    notifier: Arc<N>,
    threshold: u64,
}

impl<P, I, N> PopularityWatcher<P, I, N>
where
    P: ProfileRepository + 'static,
    I: InterestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(profiles: Arc<P>, interests: Arc<I>, notifier: Arc<N>, threshold: u64) -> Self {
        Self {
            profiles,
            interests,
            notifier,
            threshold,
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Inspect a freshly written record targeting `target`.
    ///
    /// The marker is claimed through the profile store's compare-and-set, so
    /// concurrent writers racing past the threshold emit one notification in
    /// total. Publishing failures are logged and never undo the marker.
    pub fn observe(
        &self,
        record: &InterestRecord,
        target: &Profile,
        at: DateTime<Utc>,
    ) -> Result<PopularityOutcome, RepositoryError> {
        if record.direction != InterestDirection::Interested {
            return Ok(PopularityOutcome::Skipped);
        }

        let like_count = self.interests.count_interested(target.id)?;
        if like_count <= self.threshold {
            return Ok(PopularityOutcome::BelowThreshold { like_count });
        }
        if target.popularity_notified_at.is_some() {
            return Ok(PopularityOutcome::AlreadyNotified { like_count });
        }
        if !self.profiles.mark_popularity_notified(target.id, at)? {
            return Ok(PopularityOutcome::AlreadyNotified { like_count });
        }

        let mut profile = target.clone();
        profile.popularity_notified_at = Some(at);
        info!(
            profile_id = %profile.id,
            like_count,
            threshold = self.threshold,
            "profile crossed popularity threshold"
        );

        if let Err(err) = self.notifier.publish(PopularityNotification {
            profile,
            like_count,
            threshold: self.threshold,
        }) {
            warn!(profile_id = %target.id, error = %err, "popularity notification not dispatched");
        }

        Ok(PopularityOutcome::Notified { like_count })
    }
}
