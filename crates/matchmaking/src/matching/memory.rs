//! Mutex-backed stores used by the API process, the demo, and tests.
//!
//! Each store keeps all of its indexes behind a single lock so that the
//! per-pair interest upsert and the popularity marker flip are atomic.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::domain::{
    ActorId, InterestDirection, InterestId, InterestRecord, Profile, ProfileDraft, ProfileId,
};
use super::repository::{InterestRepository, ProfileRepository, ProfileWrite, RepositoryError};

fn lock<'a, T>(
    mutex: &'a Mutex<T>,
    store: &'static str,
) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{store} lock poisoned")))
}

#[derive(Default)]
struct ProfileTable {
    last_id: u64,
    rows: BTreeMap<ProfileId, Profile>,
    by_owner: HashMap<ActorId, ProfileId>,
}

impl ProfileTable {
    fn insert(&mut self, owner: Option<ActorId>, draft: ProfileDraft, at: DateTime<Utc>) -> Profile {
        self.last_id += 1;
        let id = ProfileId(self.last_id);
        let profile = Profile {
            id,
            owner,
            name: draft.name,
            age: draft.age,
            pictures: draft.pictures,
            location: draft.location,
            bio: draft.bio,
            city: draft.city,
            popularity_notified_at: None,
            created_at: at,
            updated_at: at,
        };
        if let Some(owner) = owner {
            self.by_owner.insert(owner, id);
        }
        self.rows.insert(id, profile.clone());
        profile
    }
}

#[derive(Default, Clone)]
pub struct InMemoryProfileRepository {
    table: Arc<Mutex<ProfileTable>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn upsert_for_owner(
        &self,
        owner: ActorId,
        draft: ProfileDraft,
        at: DateTime<Utc>,
    ) -> Result<ProfileWrite, RepositoryError> {
        let mut table = lock(&self.table, "profile store")?;
        let existing = table.by_owner.get(&owner).copied();
        match existing {
            Some(id) => {
                let profile = table.rows.get_mut(&id).ok_or(RepositoryError::NotFound)?;
                profile.name = draft.name;
                profile.age = draft.age;
                profile.pictures = draft.pictures;
                profile.location = draft.location;
                profile.bio = draft.bio;
                profile.city = draft.city;
                profile.updated_at = at;
                Ok(ProfileWrite {
                    profile: profile.clone(),
                    created: false,
                })
            }
            None => Ok(ProfileWrite {
                profile: table.insert(Some(owner), draft, at),
                created: true,
            }),
        }
    }

    fn insert_unowned(
        &self,
        draft: ProfileDraft,
        at: DateTime<Utc>,
    ) -> Result<Profile, RepositoryError> {
        let mut table = lock(&self.table, "profile store")?;
        Ok(table.insert(None, draft, at))
    }

    fn fetch(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError> {
        let table = lock(&self.table, "profile store")?;
        Ok(table.rows.get(&id).cloned())
    }

    fn find_by_owner(&self, owner: ActorId) -> Result<Option<Profile>, RepositoryError> {
        let table = lock(&self.table, "profile store")?;
        Ok(table
            .by_owner
            .get(&owner)
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    fn list(&self) -> Result<Vec<Profile>, RepositoryError> {
        let table = lock(&self.table, "profile store")?;
        Ok(table.rows.values().cloned().collect())
    }

    fn mark_popularity_notified(
        &self,
        id: ProfileId,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let mut table = lock(&self.table, "profile store")?;
        let profile = table.rows.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if profile.popularity_notified_at.is_some() {
            return Ok(false);
        }
        profile.popularity_notified_at = Some(at);
        Ok(true)
    }
}

#[derive(Default)]
struct InterestTable {
    last_id: u64,
    records: BTreeMap<InterestId, InterestRecord>,
    by_pair: HashMap<(ActorId, ProfileId), InterestId>,
    // Denormalised so the popularity check does not rescan every record.
    interested_by_target: HashMap<ProfileId, u64>,
}

impl InterestTable {
    fn adjust_count(&mut self, target: ProfileId, from: Option<InterestDirection>, to: InterestDirection) {
        let counter = self.interested_by_target.entry(target).or_insert(0);
        match (from, to) {
            (Some(InterestDirection::Interested), InterestDirection::NotInterested) => {
                *counter = counter.saturating_sub(1);
            }
            (None | Some(InterestDirection::NotInterested), InterestDirection::Interested) => {
                *counter += 1;
            }
            _ => {}
        }
    }
}

#[derive(Default, Clone)]
pub struct InMemoryInterestRepository {
    table: Arc<Mutex<InterestTable>>,
}

impl InterestRepository for InMemoryInterestRepository {
    fn upsert(
        &self,
        actor: ActorId,
        target: ProfileId,
        direction: InterestDirection,
        at: DateTime<Utc>,
    ) -> Result<InterestRecord, RepositoryError> {
        let mut table = lock(&self.table, "interest store")?;

        if let Some(id) = table.by_pair.get(&(actor, target)).copied() {
            let previous = {
                let record = table.records.get_mut(&id).ok_or(RepositoryError::NotFound)?;
                let previous = record.direction;
                record.direction = direction;
                record.updated_at = at;
                previous
            };
            table.adjust_count(target, Some(previous), direction);
            return table
                .records
                .get(&id)
                .cloned()
                .ok_or(RepositoryError::NotFound);
        }

        table.last_id += 1;
        let id = InterestId(table.last_id);
        let record = InterestRecord {
            id,
            actor,
            target,
            direction,
            created_at: at,
            updated_at: at,
        };
        table.by_pair.insert((actor, target), id);
        table.records.insert(id, record.clone());
        table.adjust_count(target, None, direction);
        Ok(record)
    }

    fn find(
        &self,
        actor: ActorId,
        target: ProfileId,
    ) -> Result<Option<InterestRecord>, RepositoryError> {
        let table = lock(&self.table, "interest store")?;
        Ok(table
            .by_pair
            .get(&(actor, target))
            .and_then(|id| table.records.get(id))
            .cloned())
    }

    fn count_interested(&self, target: ProfileId) -> Result<u64, RepositoryError> {
        let table = lock(&self.table, "interest store")?;
        Ok(table
            .interested_by_target
            .get(&target)
            .copied()
            .unwrap_or(0))
    }

    fn list_interested(&self, actor: ActorId) -> Result<Vec<InterestRecord>, RepositoryError> {
        let table = lock(&self.table, "interest store")?;
        Ok(table
            .records
            .values()
            .filter(|record| {
                record.actor == actor && record.direction == InterestDirection::Interested
            })
            .cloned()
            .collect())
    }
}
