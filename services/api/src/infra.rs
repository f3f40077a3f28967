use matchmaking::matching::{NotificationError, NotificationPublisher, PopularityNotification};
use metrics_exporter_prometheus::PrometheusHandle;
use std::fmt::Write as _;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Admin e-mail produced for a profile that crossed the popularity threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PopularityAlert {
    pub(crate) recipient: String,
    pub(crate) subject: String,
    pub(crate) body: String,
}

impl PopularityAlert {
    pub(crate) fn render(notification: &PopularityNotification, recipient: &str) -> Self {
        let profile = &notification.profile;
        let mut body = String::new();
        let _ = writeln!(body, "Name: {}", profile.name);
        let _ = writeln!(body, "Age: {}", profile.age);
        let _ = writeln!(body, "Bio: {}", profile.bio.as_deref().unwrap_or("-"));
        let _ = writeln!(body, "Likes: {}", notification.like_count);
        match (profile.location, profile.city.as_deref()) {
            (Some(location), Some(city)) => {
                let _ = writeln!(
                    body,
                    "Location: {city} ({:.4}, {:.4})",
                    location.latitude, location.longitude
                );
            }
            (Some(location), None) => {
                let _ = writeln!(
                    body,
                    "Location: {:.4}, {:.4}",
                    location.latitude, location.longitude
                );
            }
            (None, Some(city)) => {
                let _ = writeln!(body, "Location: {city}");
            }
            (None, None) => {
                let _ = writeln!(body, "Location: unknown");
            }
        }
        let _ = writeln!(body, "Pictures:");
        for picture in &profile.pictures {
            let _ = writeln!(body, "- {picture}");
        }

        Self {
            recipient: recipient.to_string(),
            subject: format!("Person exceeded {} likes", notification.threshold),
            body,
        }
    }
}

/// Hands popularity notifications to a background worker so request
/// handling never waits on delivery.
#[derive(Clone)]
pub(crate) struct QueuedNotificationPublisher {
    sender: mpsc::UnboundedSender<PopularityNotification>,
}

impl QueuedNotificationPublisher {
    /// Spawn the worker on the current tokio runtime, delivering through the
    /// log-backed mail transport.
    pub(crate) fn spawn(admin_email: Option<String>) -> Self {
        Self::spawn_with(admin_email, log_transport)
    }

    pub(crate) fn spawn_with<T>(admin_email: Option<String>, transport: T) -> Self
    where
        T: Fn(PopularityAlert) + Send + 'static,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel::<PopularityNotification>();
        tokio::spawn(async move {
            while let Some(notification) = receiver.recv().await {
                match admin_email.as_deref() {
                    Some(recipient) => {
                        transport(PopularityAlert::render(&notification, recipient));
                    }
                    None => debug!(
                        profile_id = %notification.profile.id,
                        "ADMIN_EMAIL unset; popularity alert dropped"
                    ),
                }
            }
            debug!("notification worker stopped");
        });
        Self { sender }
    }
}

impl NotificationPublisher for QueuedNotificationPublisher {
    fn publish(&self, notification: PopularityNotification) -> Result<(), NotificationError> {
        self.sender
            .send(notification)
            .map_err(|_| NotificationError::Transport("notification worker stopped".to_string()))
    }
}

fn log_transport(alert: PopularityAlert) {
    info!(
        to = %alert.recipient,
        subject = %alert.subject,
        body = %alert.body,
        "popularity alert sent"
    );
}

/// Keeps every notification in memory; used by the demo.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationOutbox {
    events: Arc<Mutex<Vec<PopularityNotification>>>,
}

impl InMemoryNotificationOutbox {
    pub(crate) fn events(&self) -> Vec<PopularityNotification> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NotificationPublisher for InMemoryNotificationOutbox {
    fn publish(&self, notification: PopularityNotification) -> Result<(), NotificationError> {
        let mut guard = self
            .events
            .lock()
            .map_err(|_| NotificationError::Transport("outbox mutex poisoned".to_string()))?;
        guard.push(notification);
        Ok(())
    }
}
