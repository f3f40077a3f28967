use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ActorId, InterestDirection, ProfileId, ProfileSubmission};
use super::repository::{InterestRepository, NotificationPublisher, ProfileRepository};
use super::service::{InterestListQuery, MatchingError, MatchmakingService, RecommendationQuery};

/// Header carrying the authenticated actor id, set by the identity layer.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Body of `POST /api/v1/interests`.
#[derive(Debug, Clone, Deserialize)]
pub struct InterestRequest {
    #[serde(alias = "person_id")]
    pub profile_id: ProfileId,
    #[serde(alias = "action")]
    pub direction: InterestDirection,
}

/// Router builder exposing profile, recommendation, and interest endpoints.
pub fn matching_router<P, I, N>(service: Arc<MatchmakingService<P, I, N>>) -> Router
where
    P: ProfileRepository + 'static,
    I: InterestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/profile",
            get(profile_handler::<P, I, N>).put(upsert_profile_handler::<P, I, N>),
        )
        .route(
            "/api/v1/recommendations",
            get(recommendations_handler::<P, I, N>),
        )
        .route(
            "/api/v1/interests",
            post(record_interest_handler::<P, I, N>).get(list_interests_handler::<P, I, N>),
        )
        .with_state(service)
}

pub(crate) fn actor_from_headers(headers: &HeaderMap) -> Result<ActorId, Response> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|id| *id > 0)
        .map(ActorId)
        .ok_or_else(|| {
            let payload = json!({
                "error": "missing or invalid actor identity",
            });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        })
}

pub(crate) fn error_response(error: MatchingError) -> Response {
    let status = match &error {
        MatchingError::Validation(_) | MatchingError::MissingOrigin => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        MatchingError::ProfileNotFound(_) | MatchingError::NoProfile(_) => StatusCode::NOT_FOUND,
        MatchingError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

pub(crate) fn query_rejection_response(rejection: QueryRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
    });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}

pub(crate) async fn upsert_profile_handler<P, I, N>(
    State(service): State<Arc<MatchmakingService<P, I, N>>>,
    headers: HeaderMap,
    Json(submission): Json<ProfileSubmission>,
) -> Response
where
    P: ProfileRepository + 'static,
    I: InterestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.upsert_profile(actor, submission) {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profile_handler<P, I, N>(
    State(service): State<Arc<MatchmakingService<P, I, N>>>,
    headers: HeaderMap,
) -> Response
where
    P: ProfileRepository + 'static,
    I: InterestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.profile_for(actor) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recommendations_handler<P, I, N>(
    State(service): State<Arc<MatchmakingService<P, I, N>>>,
    headers: HeaderMap,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> Response
where
    P: ProfileRepository + 'static,
    I: InterestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection_response(rejection),
    };

    match service.recommendations(actor, query) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_interest_handler<P, I, N>(
    State(service): State<Arc<MatchmakingService<P, I, N>>>,
    headers: HeaderMap,
    Json(request): Json<InterestRequest>,
) -> Response
where
    P: ProfileRepository + 'static,
    I: InterestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.record_interest(actor, request.profile_id, request.direction) {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome.record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_interests_handler<P, I, N>(
    State(service): State<Arc<MatchmakingService<P, I, N>>>,
    headers: HeaderMap,
    query: Result<Query<InterestListQuery>, QueryRejection>,
) -> Response
where
    P: ProfileRepository + 'static,
    I: InterestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection_response(rejection),
    };

    match service.list_interests(actor, query) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(error) => error_response(error),
    }
}
