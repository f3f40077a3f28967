use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::matching::domain::{
    ActorId, Coordinates, InterestDirection, InterestRecord, PopularityNotification, Profile,
    ProfileDraft, ProfileId, ProfileSubmission,
};
use crate::matching::repository::{
    InterestRepository, NotificationError, NotificationPublisher, ProfileRepository,
    ProfileWrite, RepositoryError,
};
use crate::matching::{
    InMemoryInterestRepository, InMemoryProfileRepository, MatchingConfig, MatchmakingService,
    ACTOR_HEADER,
};

pub(super) type MemoryService =
    MatchmakingService<InMemoryProfileRepository, InMemoryInterestRepository, RecordingNotifier>;

pub(super) struct Harness {
    pub(super) service: MemoryService,
    pub(super) profiles: Arc<InMemoryProfileRepository>,
    pub(super) interests: Arc<InMemoryInterestRepository>,
    pub(super) notifier: Arc<RecordingNotifier>,
}

pub(super) fn build_service() -> Harness {
    build_service_with(MatchingConfig::default())
}

pub(super) fn build_service_with(config: MatchingConfig) -> Harness {
    let profiles = Arc::new(InMemoryProfileRepository::default());
    let interests = Arc::new(InMemoryInterestRepository::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service =
        MatchmakingService::new(profiles.clone(), interests.clone(), notifier.clone(), config);
    Harness {
        service,
        profiles,
        interests,
        notifier,
    }
}

pub(super) fn threshold_config(popularity_threshold: u64) -> MatchingConfig {
    MatchingConfig {
        popularity_threshold,
        ..MatchingConfig::default()
    }
}

pub(super) fn submission(name: &str, age: u8, location: Option<(f64, f64)>) -> ProfileSubmission {
    ProfileSubmission {
        name: name.to_string(),
        age,
        pictures: vec![format!("https://img.example.com/{}.jpg", name.to_lowercase())],
        latitude: location.map(|(latitude, _)| latitude),
        longitude: location.map(|(_, longitude)| longitude),
        bio: None,
        city: None,
    }
}

pub(super) fn draft(name: &str, age: u8, location: Option<(f64, f64)>) -> ProfileDraft {
    ProfileDraft {
        name: name.to_string(),
        age,
        pictures: vec![format!("https://img.example.com/{}.jpg", name.to_lowercase())],
        location: location.map(|(latitude, longitude)| Coordinates::new(latitude, longitude)),
        bio: None,
        city: None,
    }
}

/// Saves a profile owned by `actor`.
pub(super) fn owned_profile(
    service: &MemoryService,
    actor: u64,
    name: &str,
    age: u8,
    location: Option<(f64, f64)>,
) -> Profile {
    service
        .upsert_profile(ActorId(actor), submission(name, age, location))
        .expect("profile saved")
}

pub(super) fn seeded_profile(
    service: &MemoryService,
    name: &str,
    age: u8,
    location: Option<(f64, f64)>,
) -> Profile {
    service
        .seed_profile(draft(name, age, location))
        .expect("seed profile saved")
}

pub(super) fn like(service: &MemoryService, actor: u64, target: ProfileId) {
    service
        .record_interest(ActorId(actor), target, InterestDirection::Interested)
        .expect("like recorded");
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    events: Mutex<Vec<PopularityNotification>>,
}

impl RecordingNotifier {
    pub(super) fn events(&self) -> Vec<PopularityNotification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationPublisher for RecordingNotifier {
    fn publish(&self, notification: PopularityNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl NotificationPublisher for FailingNotifier {
    fn publish(&self, _notification: PopularityNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("mail relay offline".to_string()))
    }
}

pub(super) struct UnavailableProfiles;

impl ProfileRepository for UnavailableProfiles {
    fn upsert_for_owner(
        &self,
        _owner: ActorId,
        _draft: ProfileDraft,
        _at: DateTime<Utc>,
    ) -> Result<ProfileWrite, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_unowned(
        &self,
        _draft: ProfileDraft,
        _at: DateTime<Utc>,
    ) -> Result<Profile, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: ProfileId) -> Result<Option<Profile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_owner(&self, _owner: ActorId) -> Result<Option<Profile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Profile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn mark_popularity_notified(
        &self,
        _id: ProfileId,
        _at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn interest_count(interests: &InMemoryInterestRepository, target: ProfileId) -> u64 {
    interests.count_interested(target).expect("count succeeds")
}

pub(super) fn stored_interest(
    interests: &InMemoryInterestRepository,
    actor: u64,
    target: ProfileId,
) -> Option<InterestRecord> {
    interests.find(ActorId(actor), target).expect("find succeeds")
}

pub(super) fn json_request(method: Method, uri: &str, actor: Option<u64>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(actor) = actor {
        builder = builder.header(ACTOR_HEADER, actor.to_string());
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).expect("serialise body")))
        .expect("request builds")
}

pub(super) fn get_request(uri: &str, actor: Option<u64>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(ACTOR_HEADER, actor.to_string());
    }
    builder.body(Body::empty()).expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn names(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| item["name"].as_str().unwrap_or_default().to_string())
        .collect()
}
