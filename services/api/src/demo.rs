use crate::infra::{InMemoryNotificationOutbox, PopularityAlert};
use clap::Args;
use matchmaking::error::AppError;
use matchmaking::matching::{
    ActorId, Coordinates, InMemoryInterestRepository, InMemoryProfileRepository,
    InterestDirection, InterestListQuery, MatchingConfig, MatchmakingService, PopularityOutcome,
    ProfileDraft, ProfileId, ProfileImporter, ProfileSubmission, RecommendationQuery,
};
use std::path::PathBuf;
use std::sync::Arc;

type DemoService =
    MatchmakingService<InMemoryProfileRepository, InMemoryInterestRepository, InMemoryNotificationOutbox>;

const ORIGIN: Coordinates = Coordinates::new(52.52, 13.405);
const DEMO_ACTOR: ActorId = ActorId(1);
const MATCH_ACTOR: ActorId = ActorId(2);
const FIRST_ADMIRER: u64 = 1_000;
const NAMES: [&str; 8] = [
    "Mila", "Jonas", "Aylin", "Tomasz", "Ines", "Kofi", "Sanna", "Ravi",
];

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of synthetic candidate profiles to seed around the demo origin
    #[arg(long, default_value_t = 8)]
    pub(crate) candidates: usize,
    /// Number of distinct admirers who like the demo profile
    #[arg(long, default_value_t = 51)]
    pub(crate) likes: u64,
    /// Seed candidates from a CSV instead of generating them
    #[arg(long)]
    pub(crate) seed_csv: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        candidates,
        likes,
        seed_csv,
    } = args;

    let outbox = Arc::new(InMemoryNotificationOutbox::default());
    let config = MatchingConfig::default();
    let service = MatchmakingService::new(
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(InMemoryInterestRepository::default()),
        outbox.clone(),
        config,
    );

    println!("Matchmaking demo");
    let seeded = match seed_csv {
        Some(path) => {
            let drafts = ProfileImporter::from_path(&path)?;
            println!("Seeding {} profiles from {}", drafts.len(), path.display());
            drafts
        }
        None => synthetic_candidates(candidates),
    };
    for draft in seeded {
        service.seed_profile(draft)?;
    }

    let own = service.upsert_profile(DEMO_ACTOR, demo_submission("Demo User", 29, ORIGIN))?;
    println!(
        "Profile #{} saved for actor {} at ({:.3}, {:.3})",
        own.id, DEMO_ACTOR, ORIGIN.latitude, ORIGIN.longitude
    );

    render_recommendations(&service)?;
    render_matching(&service)?;
    render_popularity(&service, &outbox, own.id, likes, config.popularity_threshold)?;

    Ok(())
}

fn synthetic_candidates(count: usize) -> Vec<ProfileDraft> {
    (0..count)
        .map(|index| {
            let name = NAMES[index % NAMES.len()];
            let spread = 0.04 * (index / 2 + 1) as f64;
            let sign = if index % 2 == 0 { 1.0 } else { -1.0 };
            // Every fourth candidate never shared a location.
            let location = (index % 4 != 3)
                .then(|| Coordinates::new(ORIGIN.latitude + sign * spread, ORIGIN.longitude));
            ProfileDraft {
                name: format!("{name} {}", index + 1),
                age: 21 + ((index * 7) % 30) as u8,
                pictures: vec![format!(
                    "https://img.example.com/demo/{}.jpg",
                    index + 1
                )],
                location,
                bio: None,
                city: Some("Berlin".to_string()),
            }
        })
        .collect()
}

fn demo_submission(name: &str, age: u8, at: Coordinates) -> ProfileSubmission {
    ProfileSubmission {
        name: name.to_string(),
        age,
        pictures: vec![format!(
            "https://img.example.com/demo/{}.jpg",
            name.to_lowercase().replace(' ', "-")
        )],
        latitude: Some(at.latitude),
        longitude: Some(at.longitude),
        bio: Some("Here for the demo".to_string()),
        city: Some("Berlin".to_string()),
    }
}

fn render_recommendations(service: &DemoService) -> Result<(), AppError> {
    let page = service.recommendations(
        DEMO_ACTOR,
        RecommendationQuery {
            page_size: Some(5),
            ..RecommendationQuery::default()
        },
    )?;

    println!(
        "\nTop recommendations ({} of {} candidates)",
        page.items.len(),
        page.total
    );
    for (rank, candidate) in page.items.iter().enumerate() {
        let distance = candidate
            .distance_km
            .map(|km| format!("{km:.1} km"))
            .unwrap_or_else(|| "distance unknown".to_string());
        println!(
            "  {}. {} ({}) | {} | compatibility {:.2}",
            rank + 1,
            candidate.profile.name,
            candidate.profile.age,
            distance,
            candidate.compatibility_score
        );
    }

    if let Some(first) = page.items.first() {
        service.record_interest(DEMO_ACTOR, first.profile.id, InterestDirection::Interested)?;
    }
    if let Some(second) = page.items.get(1) {
        service.record_interest(DEMO_ACTOR, second.profile.id, InterestDirection::NotInterested)?;
    }
    Ok(())
}

fn render_matching(service: &DemoService) -> Result<(), AppError> {
    let nearby = Coordinates::new(ORIGIN.latitude + 0.01, ORIGIN.longitude + 0.01);
    let partner = service.upsert_profile(MATCH_ACTOR, demo_submission("Lea", 31, nearby))?;
    let own = service.profile_for(DEMO_ACTOR)?;
    service.record_interest(DEMO_ACTOR, partner.id, InterestDirection::Interested)?;
    service.record_interest(MATCH_ACTOR, own.id, InterestDirection::Interested)?;

    let listing = service.list_interests(DEMO_ACTOR, InterestListQuery::default())?;
    println!("\nLiked profiles ({} total)", listing.total);
    for liked in &listing.items {
        let marker = if liked.is_mutual { "mutual" } else { "pending" };
        println!("  - {} [{}]", liked.profile.name, marker);
    }

    let matches = service.list_interests(
        DEMO_ACTOR,
        InterestListQuery {
            mutual_only: true,
            ..InterestListQuery::default()
        },
    )?;
    println!("Mutual matches: {}", matches.total);
    Ok(())
}

fn render_popularity(
    service: &DemoService,
    outbox: &InMemoryNotificationOutbox,
    target: ProfileId,
    likes: u64,
    threshold: u64,
) -> Result<(), AppError> {
    println!("\nPopularity watch (alert once likes exceed {threshold})");
    for offset in 0..likes {
        let outcome = service.record_interest(
            ActorId(FIRST_ADMIRER + offset),
            target,
            InterestDirection::Interested,
        )?;
        if let PopularityOutcome::Notified { like_count } = outcome.popularity {
            println!("  Alert raised at {like_count} likes");
        }
    }

    let events = outbox.events();
    if events.is_empty() {
        println!("  No alert dispatched");
    }
    for event in &events {
        let alert = PopularityAlert::render(event, "admin@example.com");
        println!("  To: {} | Subject: {}", alert.recipient, alert.subject);
        for line in alert.body.lines() {
            println!("    {line}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_candidates_are_valid_profiles() {
        let drafts = synthetic_candidates(8);

        assert_eq!(drafts.len(), 8);
        assert!(drafts.iter().all(|draft| (18..=120).contains(&draft.age)));
        assert_eq!(
            drafts.iter().filter(|draft| draft.location.is_none()).count(),
            2
        );
    }

    #[test]
    fn demo_runs_end_to_end() {
        run_demo(DemoArgs {
            candidates: 6,
            likes: 3,
            seed_csv: None,
        })
        .expect("demo completes");
    }
}
