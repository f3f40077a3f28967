//! End-to-end scenarios driven through the public service facade and HTTP router.

mod common {
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::response::Response;
    use serde_json::Value;

    use matchmaking::matching::{
        InMemoryInterestRepository, InMemoryProfileRepository, MatchingConfig,
        MatchmakingService, NotificationError, NotificationPublisher, PopularityNotification,
        ACTOR_HEADER,
    };

    #[derive(Default, Clone)]
    pub(super) struct Outbox {
        events: Arc<Mutex<Vec<PopularityNotification>>>,
    }

    impl Outbox {
        pub(super) fn events(&self) -> Vec<PopularityNotification> {
            self.events.lock().expect("lock").clone()
        }
    }

    impl NotificationPublisher for Outbox {
        fn publish(&self, notification: PopularityNotification) -> Result<(), NotificationError> {
            self.events.lock().expect("lock").push(notification);
            Ok(())
        }
    }

    pub(super) type Service =
        MatchmakingService<InMemoryProfileRepository, InMemoryInterestRepository, Outbox>;

    pub(super) fn build_service(popularity_threshold: u64) -> (Arc<Service>, Arc<Outbox>) {
        let outbox = Arc::new(Outbox::default());
        let service = MatchmakingService::new(
            Arc::new(InMemoryProfileRepository::default()),
            Arc::new(InMemoryInterestRepository::default()),
            outbox.clone(),
            MatchingConfig {
                popularity_threshold,
                ..MatchingConfig::default()
            },
        );
        (Arc::new(service), outbox)
    }

    pub(super) fn request(method: Method, uri: &str, actor: u64, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(ACTOR_HEADER, actor.to_string());
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).expect("encode")))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        }
    }

    pub(super) async fn read_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }
}

mod swiping {
    use super::common::*;
    use axum::http::{Method, StatusCode};
    use matchmaking::matching::matching_router;
    use serde_json::json;
    use tower::ServiceExt;

    async fn save_profile(router: &axum::Router, actor: u64, name: &str, lat: f64, lng: f64) -> u64 {
        let response = router
            .clone()
            .oneshot(request(
                Method::PUT,
                "/api/v1/profile",
                actor,
                Some(json!({
                    "name": name,
                    "age": 30,
                    "pictures": [format!("https://img.example.com/{actor}.jpg")],
                    "latitude": lat,
                    "longitude": lng
                })),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        read_json(response).await["id"].as_u64().expect("profile id")
    }

    async fn swipe(router: &axum::Router, actor: u64, profile_id: u64, direction: &str) {
        let response = router
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/v1/interests",
                actor,
                Some(json!({ "profile_id": profile_id, "direction": direction })),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn recommend_swipe_and_match() {
        let (service, _) = build_service(50);
        let router = matching_router(service);

        let ana = save_profile(&router, 1, "Ana", 52.52, 13.405).await;
        let ben = save_profile(&router, 2, "Ben", 52.53, 13.41).await;
        save_profile(&router, 3, "Cleo", 48.1351, 11.582).await;

        let response = router
            .clone()
            .oneshot(request(Method::GET, "/api/v1/recommendations", 1, None))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["items"][0]["name"], "Ben");
        assert_eq!(body["items"][1]["name"], "Cleo");

        swipe(&router, 1, ben, "like").await;
        swipe(&router, 2, ana, "interested").await;

        for actor in [1, 2] {
            let response = router
                .clone()
                .oneshot(request(
                    Method::GET,
                    "/api/v1/interests?mutual_only=true",
                    actor,
                    None,
                ))
                .await
                .expect("response");
            let body = read_json(response).await;
            assert_eq!(body["total"], 1, "actor {actor} should see one match");
            assert_eq!(body["items"][0]["is_mutual"], true);
        }

        swipe(&router, 2, ana, "dislike").await;
        let response = router
            .clone()
            .oneshot(request(
                Method::GET,
                "/api/v1/interests?mutual_only=true",
                1,
                None,
            ))
            .await
            .expect("response");
        assert_eq!(read_json(response).await["total"], 0);
    }

    #[tokio::test]
    async fn popularity_alert_fires_once_through_http() {
        let (service, outbox) = build_service(2);
        let router = matching_router(service);
        let star = save_profile(&router, 1, "Star", 0.0, 0.0).await;

        for actor in 10..15 {
            swipe(&router, actor, star, "like").await;
        }

        let events = outbox.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].like_count, 3);
        assert_eq!(events[0].threshold, 2);

        let response = router
            .oneshot(request(Method::GET, "/api/v1/profile", 1, None))
            .await
            .expect("response");
        let body = read_json(response).await;
        assert!(body["popularity_notified_at"].is_string());
    }
}
