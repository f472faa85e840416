//! Logging and metrics around any `ArchiveStore`.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use onthisday_archive::model::{
    Competition, EntityId, EventParticipant, Location, Person, PersonStatus, Sport, SportEvent,
    Team,
};
use onthisday_archive::{ArchiveError, ArchiveStore};
use tracing::debug;

pub const OPERATIONS_TOTAL: &str = "archive_store_operations_total";
pub const OPERATION_SECONDS: &str = "archive_store_operation_seconds";

/// Wraps a store, logging every call at debug level with its duration and
/// recording a counter (by outcome) and a latency histogram per operation.
#[derive(Clone)]
pub struct LoggingStore<S: ArchiveStore> {
    inner: Arc<S>,
}

impl<S: ArchiveStore> LoggingStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    async fn with_logging<F, Fut, T>(
        &self,
        name: &'static str,
        operation: F,
    ) -> Result<T, ArchiveError>
    where
        F: FnOnce(Arc<S>) -> Fut,
        Fut: Future<Output = Result<T, ArchiveError>>,
    {
        let start = Instant::now();
        debug!(operation = name, "store operation started");

        let result = operation(self.inner.clone()).await;

        let elapsed = start.elapsed();
        let outcome = match &result {
            Ok(_) => {
                debug!(operation = name, ?elapsed, "store operation completed");
                "ok"
            }
            Err(e) => {
                debug!(operation = name, ?elapsed, error = %e, "store operation failed");
                "error"
            }
        };
        counter!(OPERATIONS_TOTAL, "operation" => name, "outcome" => outcome).increment(1);
        histogram!(OPERATION_SECONDS, "operation" => name).record(elapsed.as_secs_f64());

        result
    }
}

#[async_trait]
impl<S: ArchiveStore> ArchiveStore for LoggingStore<S> {
    async fn list_sports(&self) -> Result<Vec<Sport>, ArchiveError> {
        self.with_logging("list_sports", |s| async move { s.list_sports().await })
            .await
    }

    async fn get_sport(&self, id: EntityId) -> Result<Option<Sport>, ArchiveError> {
        self.with_logging("get_sport", |s| async move { s.get_sport(id).await })
            .await
    }

    async fn find_sport_by_slug(&self, slug: &str) -> Result<Option<Sport>, ArchiveError> {
        self.with_logging("find_sport_by_slug", |s| async move {
            s.find_sport_by_slug(slug).await
        })
        .await
    }

    async fn create_sport(&self, sport: Sport) -> Result<Sport, ArchiveError> {
        self.with_logging("create_sport", |s| async move { s.create_sport(sport).await })
            .await
    }

    async fn update_sport(&self, sport: Sport) -> Result<Sport, ArchiveError> {
        self.with_logging("update_sport", |s| async move { s.update_sport(sport).await })
            .await
    }

    async fn delete_sport(&self, id: EntityId) -> Result<bool, ArchiveError> {
        self.with_logging("delete_sport", |s| async move { s.delete_sport(id).await })
            .await
    }

    async fn list_locations(&self) -> Result<Vec<Location>, ArchiveError> {
        self.with_logging("list_locations", |s| async move { s.list_locations().await })
            .await
    }

    async fn get_location(&self, id: EntityId) -> Result<Option<Location>, ArchiveError> {
        self.with_logging("get_location", |s| async move { s.get_location(id).await })
            .await
    }

    async fn create_location(&self, location: Location) -> Result<Location, ArchiveError> {
        self.with_logging("create_location", |s| async move {
            s.create_location(location).await
        })
        .await
    }

    async fn update_location(&self, location: Location) -> Result<Location, ArchiveError> {
        self.with_logging("update_location", |s| async move {
            s.update_location(location).await
        })
        .await
    }

    async fn delete_location(&self, id: EntityId) -> Result<bool, ArchiveError> {
        self.with_logging("delete_location", |s| async move { s.delete_location(id).await })
            .await
    }

    async fn list_competitions(&self) -> Result<Vec<Competition>, ArchiveError> {
        self.with_logging("list_competitions", |s| async move {
            s.list_competitions().await
        })
        .await
    }

    async fn get_competition(&self, id: EntityId) -> Result<Option<Competition>, ArchiveError> {
        self.with_logging("get_competition", |s| async move { s.get_competition(id).await })
            .await
    }

    async fn create_competition(
        &self,
        competition: Competition,
    ) -> Result<Competition, ArchiveError> {
        self.with_logging("create_competition", |s| async move {
            s.create_competition(competition).await
        })
        .await
    }

    async fn update_competition(
        &self,
        competition: Competition,
    ) -> Result<Competition, ArchiveError> {
        self.with_logging("update_competition", |s| async move {
            s.update_competition(competition).await
        })
        .await
    }

    async fn delete_competition(&self, id: EntityId) -> Result<bool, ArchiveError> {
        self.with_logging("delete_competition", |s| async move {
            s.delete_competition(id).await
        })
        .await
    }

    async fn list_teams(&self) -> Result<Vec<Team>, ArchiveError> {
        self.with_logging("list_teams", |s| async move { s.list_teams().await })
            .await
    }

    async fn create_team(
        &self,
        team: Team,
        member_ids: Vec<EntityId>,
    ) -> Result<Team, ArchiveError> {
        self.with_logging("create_team", |s| async move {
            s.create_team(team, member_ids).await
        })
        .await
    }

    async fn update_team(
        &self,
        team: Team,
        member_ids: Option<Vec<EntityId>>,
    ) -> Result<Team, ArchiveError> {
        self.with_logging("update_team", |s| async move {
            s.update_team(team, member_ids).await
        })
        .await
    }

    async fn delete_team(&self, id: EntityId) -> Result<bool, ArchiveError> {
        self.with_logging("delete_team", |s| async move { s.delete_team(id).await })
            .await
    }

    async fn team_members(&self, team_id: EntityId) -> Result<Vec<Person>, ArchiveError> {
        self.with_logging("team_members", |s| async move { s.team_members(team_id).await })
            .await
    }

    async fn list_persons(
        &self,
        status: Option<PersonStatus>,
    ) -> Result<Vec<Person>, ArchiveError> {
        self.with_logging("list_persons", |s| async move { s.list_persons(status).await })
            .await
    }

    async fn get_person(&self, id: EntityId) -> Result<Option<Person>, ArchiveError> {
        self.with_logging("get_person", |s| async move { s.get_person(id).await })
            .await
    }

    async fn find_person_by_slug(&self, slug: &str) -> Result<Option<Person>, ArchiveError> {
        self.with_logging("find_person_by_slug", |s| async move {
            s.find_person_by_slug(slug).await
        })
        .await
    }

    async fn persons_born_on(&self, day: u32, month: u32) -> Result<Vec<Person>, ArchiveError> {
        self.with_logging("persons_born_on", |s| async move {
            s.persons_born_on(day, month).await
        })
        .await
    }

    async fn persons_died_on(&self, day: u32, month: u32) -> Result<Vec<Person>, ArchiveError> {
        self.with_logging("persons_died_on", |s| async move {
            s.persons_died_on(day, month).await
        })
        .await
    }

    async fn create_person(&self, person: Person) -> Result<Person, ArchiveError> {
        self.with_logging("create_person", |s| async move { s.create_person(person).await })
            .await
    }

    async fn update_person(
        &self,
        person: Person,
        sport_ids: Option<Vec<EntityId>>,
        team_ids: Option<Vec<EntityId>>,
    ) -> Result<Person, ArchiveError> {
        self.with_logging("update_person", |s| async move {
            s.update_person(person, sport_ids, team_ids).await
        })
        .await
    }

    async fn delete_person(&self, id: EntityId) -> Result<bool, ArchiveError> {
        self.with_logging("delete_person", |s| async move { s.delete_person(id).await })
            .await
    }

    async fn list_events(&self) -> Result<Vec<SportEvent>, ArchiveError> {
        self.with_logging("list_events", |s| async move { s.list_events().await })
            .await
    }

    async fn get_event(&self, id: EntityId) -> Result<Option<SportEvent>, ArchiveError> {
        self.with_logging("get_event", |s| async move { s.get_event(id).await })
            .await
    }

    async fn events_on(
        &self,
        day: u32,
        month: u32,
        sport_id: Option<EntityId>,
    ) -> Result<Vec<SportEvent>, ArchiveError> {
        self.with_logging("events_on", |s| async move {
            s.events_on(day, month, sport_id).await
        })
        .await
    }

    async fn create_event(&self, event: SportEvent) -> Result<SportEvent, ArchiveError> {
        self.with_logging("create_event", |s| async move { s.create_event(event).await })
            .await
    }

    async fn update_event(&self, event: SportEvent) -> Result<SportEvent, ArchiveError> {
        self.with_logging("update_event", |s| async move { s.update_event(event).await })
            .await
    }

    async fn delete_event(&self, id: EntityId) -> Result<bool, ArchiveError> {
        self.with_logging("delete_event", |s| async move { s.delete_event(id).await })
            .await
    }

    async fn add_participant(
        &self,
        participant: EventParticipant,
    ) -> Result<EventParticipant, ArchiveError> {
        self.with_logging("add_participant", |s| async move {
            s.add_participant(participant).await
        })
        .await
    }

    async fn participants_of(
        &self,
        event_id: EntityId,
    ) -> Result<Vec<EventParticipant>, ArchiveError> {
        self.with_logging("participants_of", |s| async move {
            s.participants_of(event_id).await
        })
        .await
    }
}
