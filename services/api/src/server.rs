use crate::cli::ServeArgs;
use crate::infra::{AppState, QueuedNotificationPublisher};
use crate::routes::with_matching_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use matchmaking::config::AppConfig;
use matchmaking::error::AppError;
use matchmaking::matching::{
    InMemoryInterestRepository, InMemoryProfileRepository, MatchmakingService, ProfileImporter,
};
use matchmaking::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let profiles = Arc::new(InMemoryProfileRepository::default());
    let interests = Arc::new(InMemoryInterestRepository::default());
    let notifier = Arc::new(QueuedNotificationPublisher::spawn(
        config.notifications.admin_email.clone(),
    ));
    let service = Arc::new(MatchmakingService::new(
        profiles,
        interests,
        notifier,
        config.matching,
    ));

    if let Some(path) = args.seed_csv.take() {
        let drafts = ProfileImporter::from_path(&path)?;
        let count = drafts.len();
        for draft in drafts {
            service.seed_profile(draft)?;
        }
        info!(count, path = %path.display(), "seed profiles imported");
    }

    let app = with_matching_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        popularity_threshold = config.matching.popularity_threshold,
        "matchmaking api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
