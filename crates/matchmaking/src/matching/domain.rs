use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated actor supplied by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u64);

/// Identifier wrapper for stored profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub u64);

/// Creation sequence of an interest record. Listing order follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterestId(pub u64);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Dating card owned by at most one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub owner: Option<ActorId>,
    pub name: String,
    pub age: u8,
    #[serde(default)]
    pub pictures: Vec<String>,
    pub location: Option<Coordinates>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub popularity_notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn is_owned_by(&self, actor: ActorId) -> bool {
        self.owner == Some(actor)
    }
}

/// Inbound profile payload prior to validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSubmission {
    pub name: String,
    pub age: u8,
    pub pictures: Vec<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Validated profile fields ready to be written to the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDraft {
    pub name: String,
    pub age: u8,
    pub pictures: Vec<String>,
    pub location: Option<Coordinates>,
    pub bio: Option<String>,
    pub city: Option<String>,
}

/// Direction of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestDirection {
    #[serde(alias = "like")]
    Interested,
    #[serde(alias = "dislike")]
    NotInterested,
}

impl InterestDirection {
    pub fn label(&self) -> &'static str {
        match self {
            InterestDirection::Interested => "interested",
            InterestDirection::NotInterested => "not_interested",
        }
    }
}

/// The single directional interest an actor holds toward a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestRecord {
    pub id: InterestId,
    pub actor: ActorId,
    pub target: ProfileId,
    pub direction: InterestDirection,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Notification intent emitted once a profile first crosses the like threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularityNotification {
    pub profile: Profile,
    pub like_count: u64,
    pub threshold: u64,
}
