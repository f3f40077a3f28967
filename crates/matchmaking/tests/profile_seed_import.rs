use std::sync::Arc;

use matchmaking::matching::{
    ActorId, InMemoryInterestRepository, InMemoryProfileRepository, MatchingConfig,
    MatchmakingService, NotificationError, NotificationPublisher, PopularityNotification,
    ProfileImportError, ProfileImporter, RecommendationQuery, ValidationError,
};

struct DiscardNotifications;

impl NotificationPublisher for DiscardNotifications {
    fn publish(&self, _notification: PopularityNotification) -> Result<(), NotificationError> {
        Ok(())
    }
}

#[test]
fn fixture_seeds_rankable_profiles() {
    let data = include_bytes!("../fixtures/profiles.csv");
    let drafts = ProfileImporter::from_reader(&data[..]).expect("fixture imports");
    assert_eq!(drafts.len(), 6);

    let service = MatchmakingService::new(
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(InMemoryInterestRepository::default()),
        Arc::new(DiscardNotifications),
        MatchingConfig::default(),
    );
    for draft in drafts {
        service.seed_profile(draft).expect("seed stored");
    }

    // Paris.
    let page = service
        .recommendations(
            ActorId(1),
            RecommendationQuery {
                latitude: Some(48.8566),
                longitude: Some(2.3522),
                age: Some(30),
                page: Some(1),
                page_size: Some(10),
            },
        )
        .expect("ranking succeeds");

    let names: Vec<_> = page
        .items
        .iter()
        .map(|item| item.profile.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Priya", "Mateo", "Lars", "Amara", "Yumi", "Noor"]
    );
    assert!(page.items.iter().all(|item| item.profile.owner.is_none()));
    assert_eq!(page.items[5].distance_km, None);
}

#[test]
fn rejected_rows_name_their_line() {
    let csv = "name,age,pictures,latitude,longitude,bio,city\n\
Yumi,27,https://img.example.com/yumi.jpg,35.6762,139.6503,,Tokyo\n\
Ghost,30,https://img.example.com/ghost.jpg,95.0,0.0,,\n";

    match ProfileImporter::from_reader(csv.as_bytes()) {
        Err(ProfileImportError::Row { line, source }) => {
            assert_eq!(line, 3);
            assert_eq!(source, ValidationError::LatitudeOutOfRange(95.0));
        }
        other => panic!("expected row rejection, got {other:?}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        ProfileImporter::from_path("fixtures/does-not-exist.csv"),
        Err(ProfileImportError::Io(_))
    ));
}
