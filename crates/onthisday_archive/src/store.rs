//! The `ArchiveStore` persistence seam and its in-memory implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::ArchiveError;
use crate::model::{
    Competition, EntityId, EventParticipant, Location, Person, PersonStatus, Sport, SportEvent,
    Team,
};

/// Storage for the archive. Writes validate references and slug uniqueness
/// atomically with the mutation; deletes return `false` for unknown ids.
#[async_trait]
pub trait ArchiveStore: Send + Sync + 'static {
    async fn list_sports(&self) -> Result<Vec<Sport>, ArchiveError>;
    async fn get_sport(&self, id: EntityId) -> Result<Option<Sport>, ArchiveError>;
    async fn find_sport_by_slug(&self, slug: &str) -> Result<Option<Sport>, ArchiveError>;
    async fn create_sport(&self, sport: Sport) -> Result<Sport, ArchiveError>;
    async fn update_sport(&self, sport: Sport) -> Result<Sport, ArchiveError>;
    async fn delete_sport(&self, id: EntityId) -> Result<bool, ArchiveError>;

    async fn list_locations(&self) -> Result<Vec<Location>, ArchiveError>;
    async fn get_location(&self, id: EntityId) -> Result<Option<Location>, ArchiveError>;
    async fn create_location(&self, location: Location) -> Result<Location, ArchiveError>;
    async fn update_location(&self, location: Location) -> Result<Location, ArchiveError>;
    async fn delete_location(&self, id: EntityId) -> Result<bool, ArchiveError>;

    async fn list_competitions(&self) -> Result<Vec<Competition>, ArchiveError>;
    async fn get_competition(&self, id: EntityId) -> Result<Option<Competition>, ArchiveError>;
    async fn create_competition(
        &self,
        competition: Competition,
    ) -> Result<Competition, ArchiveError>;
    async fn update_competition(
        &self,
        competition: Competition,
    ) -> Result<Competition, ArchiveError>;
    async fn delete_competition(&self, id: EntityId) -> Result<bool, ArchiveError>;

    async fn list_teams(&self) -> Result<Vec<Team>, ArchiveError>;
    /// Every id in `member_ids` must exist; they become the initial roster.
    async fn create_team(
        &self,
        team: Team,
        member_ids: Vec<EntityId>,
    ) -> Result<Team, ArchiveError>;
    /// `member_ids: Some(..)` replaces the roster; every id must exist.
    async fn update_team(
        &self,
        team: Team,
        member_ids: Option<Vec<EntityId>>,
    ) -> Result<Team, ArchiveError>;
    async fn delete_team(&self, id: EntityId) -> Result<bool, ArchiveError>;
    async fn team_members(&self, team_id: EntityId) -> Result<Vec<Person>, ArchiveError>;

    async fn list_persons(
        &self,
        status: Option<PersonStatus>,
    ) -> Result<Vec<Person>, ArchiveError>;
    async fn get_person(&self, id: EntityId) -> Result<Option<Person>, ArchiveError>;
    async fn find_person_by_slug(&self, slug: &str) -> Result<Option<Person>, ArchiveError>;
    async fn persons_born_on(&self, day: u32, month: u32) -> Result<Vec<Person>, ArchiveError>;
    async fn persons_died_on(&self, day: u32, month: u32) -> Result<Vec<Person>, ArchiveError>;
    /// Unknown ids in `sport_ids`/`team_ids` are dropped.
    async fn create_person(&self, person: Person) -> Result<Person, ArchiveError>;
    /// `Some(..)` link lists replace the current ones and must all exist;
    /// `None` keeps what is stored.
    async fn update_person(
        &self,
        person: Person,
        sport_ids: Option<Vec<EntityId>>,
        team_ids: Option<Vec<EntityId>>,
    ) -> Result<Person, ArchiveError>;
    async fn delete_person(&self, id: EntityId) -> Result<bool, ArchiveError>;

    async fn list_events(&self) -> Result<Vec<SportEvent>, ArchiveError>;
    async fn get_event(&self, id: EntityId) -> Result<Option<SportEvent>, ArchiveError>;
    /// Events on a Gregorian day/month, oldest year first.
    async fn events_on(
        &self,
        day: u32,
        month: u32,
        sport_id: Option<EntityId>,
    ) -> Result<Vec<SportEvent>, ArchiveError>;
    async fn create_event(&self, event: SportEvent) -> Result<SportEvent, ArchiveError>;
    async fn update_event(&self, event: SportEvent) -> Result<SportEvent, ArchiveError>;
    async fn delete_event(&self, id: EntityId) -> Result<bool, ArchiveError>;

    async fn add_participant(
        &self,
        participant: EventParticipant,
    ) -> Result<EventParticipant, ArchiveError>;
    async fn participants_of(
        &self,
        event_id: EntityId,
    ) -> Result<Vec<EventParticipant>, ArchiveError>;
}

trait Record: Clone {
    const KIND: &'static str;
    fn id(&self) -> EntityId;
    fn set_id(&mut self, id: EntityId);
}

trait Slugged: Record {
    fn slug(&self) -> &str;
}

macro_rules! record {
    ($ty:ty, $kind:literal) => {
        impl Record for $ty {
            const KIND: &'static str = $kind;
            fn id(&self) -> EntityId {
                self.id
            }
            fn set_id(&mut self, id: EntityId) {
                self.id = id;
            }
        }
    };
    ($ty:ty, $kind:literal, slugged) => {
        record!($ty, $kind);
        impl Slugged for $ty {
            fn slug(&self) -> &str {
                &self.slug
            }
        }
    };
}

record!(Sport, "Sport", slugged);
record!(Location, "Location", slugged);
record!(Competition, "Competition", slugged);
record!(Team, "Team", slugged);
record!(Person, "Person", slugged);
record!(SportEvent, "SportEvent", slugged);
record!(EventParticipant, "EventParticipant");

struct Table<T> {
    rows: BTreeMap<EntityId, T>,
    last_id: EntityId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Record> Table<T> {
    fn get(&self, id: EntityId) -> Option<&T> {
        self.rows.get(&id)
    }

    fn contains(&self, id: EntityId) -> bool {
        self.rows.contains_key(&id)
    }

    fn require(&self, id: EntityId) -> Result<&T, ArchiveError> {
        self.rows
            .get(&id)
            .ok_or_else(|| ArchiveError::not_found(T::KIND, id))
    }

    fn require_optional(&self, id: Option<EntityId>) -> Result<(), ArchiveError> {
        match id {
            Some(id) => self.require(id).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Deduplicate `ids` and fail unless every one exists.
    fn require_all(&self, ids: &[EntityId], what: &str) -> Result<Vec<EntityId>, ArchiveError> {
        let mut distinct = ids.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.iter().all(|id| self.contains(*id)) {
            Ok(distinct)
        } else {
            Err(ArchiveError::NotFound(format!(
                "One or more {what} were not found."
            )))
        }
    }

    /// Deduplicate `ids` and drop the unknown ones.
    fn retain_known(&self, ids: &[EntityId]) -> Vec<EntityId> {
        let mut known: Vec<EntityId> = ids
            .iter()
            .copied()
            .filter(|id| self.contains(*id))
            .collect();
        known.sort_unstable();
        known.dedup();
        known
    }

    fn insert(&mut self, mut row: T) -> T {
        self.last_id += 1;
        row.set_id(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    fn replace(&mut self, row: T) -> Result<T, ArchiveError> {
        let slot = self
            .rows
            .get_mut(&row.id())
            .ok_or_else(|| ArchiveError::not_found(T::KIND, row.id()))?;
        *slot = row.clone();
        Ok(row)
    }

    fn remove(&mut self, id: EntityId) -> Option<T> {
        self.rows.remove(&id)
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.values_mut()
    }
}

impl<T: Slugged> Table<T> {
    fn find_by_slug(&self, slug: &str) -> Option<&T> {
        self.rows.values().find(|row| row.slug() == slug)
    }

    fn ensure_slug_free(&self, slug: &str, except: Option<EntityId>) -> Result<(), ArchiveError> {
        let taken = self
            .rows
            .values()
            .any(|row| row.slug() == slug && Some(row.id()) != except);
        if taken {
            Err(ArchiveError::duplicate_slug(T::KIND, slug))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
struct Tables {
    sports: Table<Sport>,
    locations: Table<Location>,
    competitions: Table<Competition>,
    teams: Table<Team>,
    persons: Table<Person>,
    events: Table<SportEvent>,
    participants: Table<EventParticipant>,
}

impl Tables {
    /// Make `members` exactly the persons linked to `team_id`.
    fn assign_roster(&mut self, team_id: EntityId, members: &[EntityId]) {
        for person in self.persons.values_mut() {
            let listed = members.contains(&person.id);
            let linked = person.team_ids.contains(&team_id);
            if listed && !linked {
                person.team_ids.push(team_id);
            } else if !listed && linked {
                person.team_ids.retain(|tid| *tid != team_id);
            }
        }
    }

    fn check_event_refs(&self, event: &SportEvent) -> Result<(), ArchiveError> {
        self.sports.require(event.sport_id)?;
        self.competitions.require_optional(event.competition_id)?;
        self.locations.require_optional(event.location_id)
    }

    fn remove_event_cascade(&mut self, id: EntityId) -> bool {
        if self.events.remove(id).is_none() {
            return false;
        }
        self.participants
            .rows
            .retain(|_, p| p.sport_event_id != id);
        true
    }
}

/// Process-local store guarded by a tokio `RwLock`. Ids are sequential per table.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by<T: Clone, K: Ord>(rows: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut out: Vec<T> = rows.collect();
    out.sort_by_key(|row| key(row));
    out
}

fn person_order(p: &Person) -> (String, String, EntityId) {
    (
        p.firstname.to_lowercase(),
        p.lastname.clone().unwrap_or_default().to_lowercase(),
        p.id,
    )
}

#[async_trait]
impl ArchiveStore for InMemoryStore {
    async fn list_sports(&self) -> Result<Vec<Sport>, ArchiveError> {
        let t = self.tables.read().await;
        Ok(sorted_by(t.sports.values().cloned(), |s| {
            (s.name.to_lowercase(), s.id)
        }))
    }

    async fn get_sport(&self, id: EntityId) -> Result<Option<Sport>, ArchiveError> {
        Ok(self.tables.read().await.sports.get(id).cloned())
    }

    async fn find_sport_by_slug(&self, slug: &str) -> Result<Option<Sport>, ArchiveError> {
        Ok(self.tables.read().await.sports.find_by_slug(slug).cloned())
    }

    async fn create_sport(&self, sport: Sport) -> Result<Sport, ArchiveError> {
        let mut t = self.tables.write().await;
        t.sports.ensure_slug_free(&sport.slug, None)?;
        Ok(t.sports.insert(sport))
    }

    async fn update_sport(&self, sport: Sport) -> Result<Sport, ArchiveError> {
        let mut t = self.tables.write().await;
        t.sports.require(sport.id)?;
        t.sports.ensure_slug_free(&sport.slug, Some(sport.id))?;
        t.sports.replace(sport)
    }

    async fn delete_sport(&self, id: EntityId) -> Result<bool, ArchiveError> {
        let mut t = self.tables.write().await;
        if t.sports.remove(id).is_none() {
            return Ok(false);
        }

        for team in t.teams.values_mut().filter(|team| team.sport_id == Some(id)) {
            team.sport_id = None;
        }
        for person in t.persons.values_mut() {
            person.sport_ids.retain(|sid| *sid != id);
        }

        let competitions: Vec<EntityId> = t
            .competitions
            .values()
            .filter(|c| c.sport_id == id)
            .map(|c| c.id)
            .collect();
        for cid in &competitions {
            t.competitions.remove(*cid);
        }
        for event in t.events.values_mut() {
            if event.competition_id.is_some_and(|cid| competitions.contains(&cid)) {
                event.competition_id = None;
            }
        }

        let events: Vec<EntityId> = t
            .events
            .values()
            .filter(|e| e.sport_id == id)
            .map(|e| e.id)
            .collect();
        for eid in &events {
            t.remove_event_cascade(*eid);
        }

        debug!(
            sport_id = id,
            competitions = competitions.len(),
            events = events.len(),
            "sport deleted with dependents"
        );
        Ok(true)
    }

    async fn list_locations(&self) -> Result<Vec<Location>, ArchiveError> {
        let t = self.tables.read().await;
        Ok(sorted_by(t.locations.values().cloned(), |l| {
            (l.label().to_lowercase(), l.id)
        }))
    }

    async fn get_location(&self, id: EntityId) -> Result<Option<Location>, ArchiveError> {
        Ok(self.tables.read().await.locations.get(id).cloned())
    }

    async fn create_location(&self, location: Location) -> Result<Location, ArchiveError> {
        let mut t = self.tables.write().await;
        t.locations.ensure_slug_free(&location.slug, None)?;
        Ok(t.locations.insert(location))
    }

    async fn update_location(&self, location: Location) -> Result<Location, ArchiveError> {
        let mut t = self.tables.write().await;
        t.locations.require(location.id)?;
        t.locations
            .ensure_slug_free(&location.slug, Some(location.id))?;
        t.locations.replace(location)
    }

    async fn delete_location(&self, id: EntityId) -> Result<bool, ArchiveError> {
        let mut t = self.tables.write().await;
        if t.locations.remove(id).is_none() {
            return Ok(false);
        }
        for team in t.teams.values_mut().filter(|team| team.location_id == Some(id)) {
            team.location_id = None;
        }
        for event in t.events.values_mut().filter(|e| e.location_id == Some(id)) {
            event.location_id = None;
        }
        Ok(true)
    }

    async fn list_competitions(&self) -> Result<Vec<Competition>, ArchiveError> {
        let t = self.tables.read().await;
        Ok(sorted_by(t.competitions.values().cloned(), |c| {
            (c.name.to_lowercase(), c.id)
        }))
    }

    async fn get_competition(&self, id: EntityId) -> Result<Option<Competition>, ArchiveError> {
        Ok(self.tables.read().await.competitions.get(id).cloned())
    }

    async fn create_competition(
        &self,
        competition: Competition,
    ) -> Result<Competition, ArchiveError> {
        let mut t = self.tables.write().await;
        t.sports.require(competition.sport_id)?;
        t.competitions.ensure_slug_free(&competition.slug, None)?;
        Ok(t.competitions.insert(competition))
    }

    async fn update_competition(
        &self,
        competition: Competition,
    ) -> Result<Competition, ArchiveError> {
        let mut t = self.tables.write().await;
        t.competitions.require(competition.id)?;
        t.sports.require(competition.sport_id)?;
        t.competitions
            .ensure_slug_free(&competition.slug, Some(competition.id))?;
        t.competitions.replace(competition)
    }

    async fn delete_competition(&self, id: EntityId) -> Result<bool, ArchiveError> {
        let mut t = self.tables.write().await;
        if t.competitions.remove(id).is_none() {
            return Ok(false);
        }
        for event in t.events.values_mut().filter(|e| e.competition_id == Some(id)) {
            event.competition_id = None;
        }
        Ok(true)
    }

    async fn list_teams(&self) -> Result<Vec<Team>, ArchiveError> {
        let t = self.tables.read().await;
        Ok(sorted_by(t.teams.values().cloned(), |team| {
            (team.name.to_lowercase(), team.id)
        }))
    }

    async fn create_team(
        &self,
        team: Team,
        member_ids: Vec<EntityId>,
    ) -> Result<Team, ArchiveError> {
        let mut t = self.tables.write().await;
        t.sports.require_optional(team.sport_id)?;
        t.locations.require_optional(team.location_id)?;
        t.teams.ensure_slug_free(&team.slug, None)?;
        let members = t.persons.require_all(&member_ids, "members")?;

        let created = t.teams.insert(team);
        t.assign_roster(created.id, &members);
        Ok(created)
    }

    async fn update_team(
        &self,
        team: Team,
        member_ids: Option<Vec<EntityId>>,
    ) -> Result<Team, ArchiveError> {
        let mut t = self.tables.write().await;
        t.teams.require(team.id)?;
        t.sports.require_optional(team.sport_id)?;
        t.locations.require_optional(team.location_id)?;
        t.teams.ensure_slug_free(&team.slug, Some(team.id))?;

        let members = match member_ids {
            Some(ids) => Some(t.persons.require_all(&ids, "members")?),
            None => None,
        };

        let team_id = team.id;
        let updated = t.teams.replace(team)?;
        if let Some(members) = members {
            t.assign_roster(team_id, &members);
        }
        Ok(updated)
    }

    async fn delete_team(&self, id: EntityId) -> Result<bool, ArchiveError> {
        let mut t = self.tables.write().await;
        if t.teams.remove(id).is_none() {
            return Ok(false);
        }
        for participant in t.participants.values_mut().filter(|p| p.team_id == Some(id)) {
            participant.team_id = None;
        }
        for person in t.persons.values_mut() {
            person.team_ids.retain(|tid| *tid != id);
        }
        Ok(true)
    }

    async fn team_members(&self, team_id: EntityId) -> Result<Vec<Person>, ArchiveError> {
        let t = self.tables.read().await;
        t.teams.require(team_id)?;
        Ok(sorted_by(
            t.persons
                .values()
                .filter(|p| p.team_ids.contains(&team_id))
                .cloned(),
            person_order,
        ))
    }

    async fn list_persons(
        &self,
        status: Option<PersonStatus>,
    ) -> Result<Vec<Person>, ArchiveError> {
        let t = self.tables.read().await;
        Ok(sorted_by(
            t.persons
                .values()
                .filter(|p| status.is_none_or(|s| p.status == s))
                .cloned(),
            person_order,
        ))
    }

    async fn get_person(&self, id: EntityId) -> Result<Option<Person>, ArchiveError> {
        Ok(self.tables.read().await.persons.get(id).cloned())
    }

    async fn find_person_by_slug(&self, slug: &str) -> Result<Option<Person>, ArchiveError> {
        Ok(self.tables.read().await.persons.find_by_slug(slug).cloned())
    }

    async fn persons_born_on(&self, day: u32, month: u32) -> Result<Vec<Person>, ArchiveError> {
        let t = self.tables.read().await;
        Ok(sorted_by(
            t.persons.values().filter(|p| p.born_on(day, month)).cloned(),
            |p| (p.birth_date, p.id),
        ))
    }

    async fn persons_died_on(&self, day: u32, month: u32) -> Result<Vec<Person>, ArchiveError> {
        let t = self.tables.read().await;
        Ok(sorted_by(
            t.persons.values().filter(|p| p.died_on(day, month)).cloned(),
            |p| (p.death_date, p.id),
        ))
    }

    async fn create_person(&self, mut person: Person) -> Result<Person, ArchiveError> {
        let mut t = self.tables.write().await;
        t.persons.ensure_slug_free(&person.slug, None)?;
        person.sport_ids = t.sports.retain_known(&person.sport_ids);
        person.team_ids = t.teams.retain_known(&person.team_ids);
        Ok(t.persons.insert(person))
    }

    async fn update_person(
        &self,
        mut person: Person,
        sport_ids: Option<Vec<EntityId>>,
        team_ids: Option<Vec<EntityId>>,
    ) -> Result<Person, ArchiveError> {
        let mut t = self.tables.write().await;
        let current = t.persons.require(person.id)?;
        let (current_sports, current_teams) = (current.sport_ids.clone(), current.team_ids.clone());
        t.persons.ensure_slug_free(&person.slug, Some(person.id))?;

        person.sport_ids = match sport_ids {
            Some(ids) => t.sports.require_all(&ids, "sports")?,
            None => current_sports,
        };
        person.team_ids = match team_ids {
            Some(ids) => t.teams.require_all(&ids, "teams")?,
            None => current_teams,
        };
        t.persons.replace(person)
    }

    async fn delete_person(&self, id: EntityId) -> Result<bool, ArchiveError> {
        let mut t = self.tables.write().await;
        if t.persons.remove(id).is_none() {
            return Ok(false);
        }
        for participant in t
            .participants
            .values_mut()
            .filter(|p| p.person_id == Some(id))
        {
            participant.person_id = None;
        }
        Ok(true)
    }

    async fn list_events(&self) -> Result<Vec<SportEvent>, ArchiveError> {
        let t = self.tables.read().await;
        let mut events: Vec<SportEvent> = t.events.values().cloned().collect();
        events.sort_by(|a, b| {
            (b.year, b.month, b.day, b.id).cmp(&(a.year, a.month, a.day, a.id))
        });
        Ok(events)
    }

    async fn get_event(&self, id: EntityId) -> Result<Option<SportEvent>, ArchiveError> {
        Ok(self.tables.read().await.events.get(id).cloned())
    }

    async fn events_on(
        &self,
        day: u32,
        month: u32,
        sport_id: Option<EntityId>,
    ) -> Result<Vec<SportEvent>, ArchiveError> {
        let t = self.tables.read().await;
        Ok(sorted_by(
            t.events
                .values()
                .filter(|e| e.day == day && e.month == month)
                .filter(|e| sport_id.is_none_or(|sid| e.sport_id == sid))
                .cloned(),
            |e| (e.year.is_none(), e.year, e.id),
        ))
    }

    async fn create_event(&self, event: SportEvent) -> Result<SportEvent, ArchiveError> {
        let mut t = self.tables.write().await;
        t.check_event_refs(&event)?;
        t.events.ensure_slug_free(&event.slug, None)?;
        Ok(t.events.insert(event))
    }

    async fn update_event(&self, event: SportEvent) -> Result<SportEvent, ArchiveError> {
        let mut t = self.tables.write().await;
        t.events.require(event.id)?;
        t.check_event_refs(&event)?;
        t.events.ensure_slug_free(&event.slug, Some(event.id))?;
        t.events.replace(event)
    }

    async fn delete_event(&self, id: EntityId) -> Result<bool, ArchiveError> {
        Ok(self.tables.write().await.remove_event_cascade(id))
    }

    async fn add_participant(
        &self,
        participant: EventParticipant,
    ) -> Result<EventParticipant, ArchiveError> {
        if participant.person_id.is_none() && participant.team_id.is_none() {
            return Err(ArchiveError::Validation(
                "At least one of personId or teamId must be provided.".into(),
            ));
        }
        let mut t = self.tables.write().await;
        t.events.require(participant.sport_event_id)?;
        t.persons.require_optional(participant.person_id)?;
        t.teams.require_optional(participant.team_id)?;
        Ok(t.participants.insert(participant))
    }

    async fn participants_of(
        &self,
        event_id: EntityId,
    ) -> Result<Vec<EventParticipant>, ArchiveError> {
        let t = self.tables.read().await;
        Ok(sorted_by(
            t.participants
                .values()
                .filter(|p| p.sport_event_id == event_id)
                .cloned(),
            |p| (!p.is_primary, p.id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SportType;

    fn sport(slug: &str) -> Sport {
        Sport {
            id: 0,
            name: slug.to_uppercase(),
            slug: slug.into(),
            description: None,
            icon_url: None,
            sport_type: SportType::Team,
        }
    }

    #[test]
    fn table_assigns_sequential_ids() {
        let mut table = Table::<Sport>::default();
        assert_eq!(table.insert(sport("a")).id, 1);
        assert_eq!(table.insert(sport("b")).id, 2);
        table.remove(2);
        assert_eq!(table.insert(sport("c")).id, 3);
    }

    #[test]
    fn slug_check_excludes_the_row_being_updated() {
        let mut table = Table::<Sport>::default();
        let a = table.insert(sport("a"));
        assert!(table.ensure_slug_free("a", Some(a.id)).is_ok());
        let err = table.ensure_slug_free("a", None).unwrap_err();
        assert_eq!(err.to_string(), "Sport slug 'a' already exists.");
    }

    #[test]
    fn require_all_dedups_and_reports_missing() {
        let mut table = Table::<Sport>::default();
        table.insert(sport("a"));
        table.insert(sport("b"));
        assert_eq!(table.require_all(&[2, 1, 2], "sports").unwrap(), vec![1, 2]);
        let err = table.require_all(&[1, 9], "sports").unwrap_err();
        assert_eq!(err.to_string(), "One or more sports were not found.");
        assert_eq!(table.retain_known(&[9, 1, 1]), vec![1]);
    }

    #[tokio::test]
    async fn participant_needs_person_or_team() {
        let store = InMemoryStore::new();
        let err = store
            .add_participant(EventParticipant {
                id: 0,
                sport_event_id: 1,
                person_id: None,
                team_id: None,
                role: crate::model::ParticipantRole::Winner,
                performance_note: None,
                is_primary: true,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Validation(_)));
    }
}
