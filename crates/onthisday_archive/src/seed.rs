//! Startup content for an empty archive.
//!
//! Seed files reference other records by slug instead of id, so they stay
//! valid regardless of the ids a store hands out.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ArchiveError;
use crate::model::{
    Competition, CompetitionLevel, EntityId, EventParticipant, EventType, Gender, Location,
    ParticipantRole, Person, PersonStatus, Sport, SportEvent, Team,
};
use crate::store::ArchiveStore;

const BUILTIN_SEED: &str = include_str!("../seed/default.json");

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub sports: Vec<Sport>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub competitions: Vec<SeedCompetition>,
    #[serde(default)]
    pub teams: Vec<SeedTeam>,
    #[serde(default)]
    pub persons: Vec<SeedPerson>,
    #[serde(default)]
    pub events: Vec<SeedEvent>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedCompetition {
    pub name: String,
    pub short_name: Option<String>,
    pub slug: String,
    pub level: CompetitionLevel,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub sport: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedTeam {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub website_url: Option<String>,
    pub founded_year: i32,
    pub sport: Option<String>,
    pub location: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedPerson {
    pub firstname: String,
    pub lastname: Option<String>,
    pub slug: String,
    pub title: Option<String>,
    pub nationality: Option<String>,
    pub birth_date: NaiveDate,
    pub death_date: Option<NaiveDate>,
    pub biography: Option<String>,
    pub profile_image_url: Option<String>,
    pub gender: Gender,
    pub status: PersonStatus,
    #[serde(default)]
    pub sports: Vec<String>,
    #[serde(default)]
    pub teams: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedEvent {
    pub headline: String,
    pub full_description: Option<String>,
    pub slug: String,
    pub day: u32,
    pub month: u32,
    pub year: Option<i32>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub sport: String,
    pub competition: Option<String>,
    pub location: Option<String>,
    pub media_url: Option<String>,
    #[serde(default)]
    pub participants: Vec<SeedParticipant>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedParticipant {
    pub person: Option<String>,
    pub team: Option<String>,
    pub role: ParticipantRole,
    pub performance_note: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Counts of records written by [`apply`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub sports: usize,
    pub locations: usize,
    pub competitions: usize,
    pub teams: usize,
    pub persons: usize,
    pub events: usize,
    pub participants: usize,
}

impl SeedData {
    pub fn builtin() -> Result<Self, ArchiveError> {
        Self::from_json(BUILTIN_SEED)
    }

    pub fn from_json(raw: &str) -> Result<Self, ArchiveError> {
        serde_json::from_str(raw)
            .map_err(|e| ArchiveError::Config(format!("invalid seed data: {e}")))
    }

    /// Read a seed file, or the built-in seed when `path` is `None`.
    pub async fn load(path: Option<&Path>) -> Result<Self, ArchiveError> {
        let Some(path) = path else {
            return Self::builtin();
        };
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            ArchiveError::Config(format!("cannot read seed file {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }
}

#[derive(Default)]
struct SlugIndex(HashMap<(&'static str, String), EntityId>);

impl SlugIndex {
    fn put(&mut self, kind: &'static str, slug: &str, id: EntityId) {
        self.0.insert((kind, slug.to_string()), id);
    }

    fn resolve(&self, kind: &'static str, slug: &str) -> Result<EntityId, ArchiveError> {
        self.0
            .get(&(kind, slug.to_string()))
            .copied()
            .ok_or_else(|| {
                ArchiveError::Validation(format!("seed references unknown {kind} '{slug}'"))
            })
    }

    fn resolve_opt(
        &self,
        kind: &'static str,
        slug: Option<&str>,
    ) -> Result<Option<EntityId>, ArchiveError> {
        slug.map(|s| self.resolve(kind, s)).transpose()
    }
}

/// Write `data` into `store` unless it already holds sports.
///
/// Returns `None` when the store was not empty and nothing was written.
pub async fn apply(
    store: &dyn ArchiveStore,
    data: &SeedData,
) -> Result<Option<SeedReport>, ArchiveError> {
    if !store.list_sports().await?.is_empty() {
        info!("archive already populated, skipping seed");
        return Ok(None);
    }

    let mut index = SlugIndex::default();
    let mut report = SeedReport::default();

    for sport in &data.sports {
        let created = store.create_sport(sport.clone()).await?;
        index.put("sport", &created.slug, created.id);
        report.sports += 1;
    }

    for location in &data.locations {
        let created = store.create_location(location.clone()).await?;
        index.put("location", &created.slug, created.id);
        report.locations += 1;
    }

    for c in &data.competitions {
        let created = store
            .create_competition(Competition {
                id: 0,
                name: c.name.clone(),
                short_name: c.short_name.clone(),
                slug: c.slug.clone(),
                level: c.level,
                description: c.description.clone(),
                logo_url: c.logo_url.clone(),
                sport_id: index.resolve("sport", &c.sport)?,
            })
            .await?;
        index.put("competition", &created.slug, created.id);
        report.competitions += 1;
    }

    for t in &data.teams {
        let team = Team {
            id: 0,
            name: t.name.clone(),
            slug: t.slug.clone(),
            description: t.description.clone(),
            icon_url: t.icon_url.clone(),
            website_url: t.website_url.clone(),
            founded_year: t.founded_year,
            sport_id: index.resolve_opt("sport", t.sport.as_deref())?,
            location_id: index.resolve_opt("location", t.location.as_deref())?,
        };
        // Rosters come from each person's `teams` list.
        let created = store.create_team(team, Vec::new()).await?;
        index.put("team", &created.slug, created.id);
        report.teams += 1;
    }

    for p in &data.persons {
        let sport_ids = p
            .sports
            .iter()
            .map(|s| index.resolve("sport", s))
            .collect::<Result<Vec<_>, _>>()?;
        let team_ids = p
            .teams
            .iter()
            .map(|s| index.resolve("team", s))
            .collect::<Result<Vec<_>, _>>()?;
        let created = store
            .create_person(Person {
                id: 0,
                firstname: p.firstname.clone(),
                lastname: p.lastname.clone(),
                slug: p.slug.clone(),
                title: p.title.clone(),
                nationality: p.nationality.clone(),
                birth_date: p.birth_date,
                death_date: p.death_date,
                biography: p.biography.clone(),
                profile_image_url: p.profile_image_url.clone(),
                gender: p.gender,
                status: p.status,
                sport_ids,
                team_ids,
            })
            .await?;
        index.put("person", &created.slug, created.id);
        report.persons += 1;
    }

    for e in &data.events {
        let created = store
            .create_event(SportEvent {
                id: 0,
                headline: e.headline.clone(),
                full_description: e.full_description.clone(),
                slug: e.slug.clone(),
                day: e.day,
                month: e.month,
                year: e.year,
                event_type: e.event_type,
                sport_id: index.resolve("sport", &e.sport)?,
                competition_id: index.resolve_opt("competition", e.competition.as_deref())?,
                location_id: index.resolve_opt("location", e.location.as_deref())?,
                media_url: e.media_url.clone(),
            })
            .await?;
        report.events += 1;

        for p in &e.participants {
            store
                .add_participant(EventParticipant {
                    id: 0,
                    sport_event_id: created.id,
                    person_id: index.resolve_opt("person", p.person.as_deref())?,
                    team_id: index.resolve_opt("team", p.team.as_deref())?,
                    role: p.role,
                    performance_note: p.performance_note.clone(),
                    is_primary: p.is_primary,
                })
                .await?;
            report.participants += 1;
        }
    }

    info!(
        sports = report.sports,
        persons = report.persons,
        events = report.events,
        "seeded archive"
    );
    Ok(Some(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    #[test]
    fn builtin_seed_parses() {
        let data = SeedData::builtin().expect("builtin seed");
        assert!(data.sports.iter().any(|s| s.slug == "ice-hockey"));
        assert_eq!(data.events.len(), 4);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = SeedData::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ArchiveError::Config(_)));
    }

    #[tokio::test]
    async fn apply_builtin_seed_populates_store() {
        let store = InMemoryStore::new();
        let report = apply(&store, &SeedData::builtin().unwrap())
            .await
            .unwrap()
            .expect("seeded");
        assert_eq!(report.events, 4);
        assert_eq!(report.participants, 4);

        let events = store.events_on(19, 2, None).await.unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events.last().unwrap().year, Some(1942));

        let trottier = store
            .find_person_by_slug("dave-trottier")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(trottier.team_ids.len(), 1);
    }

    #[tokio::test]
    async fn apply_skips_populated_store() {
        let store = InMemoryStore::new();
        let data = SeedData::builtin().unwrap();
        apply(&store, &data).await.unwrap();
        assert!(apply(&store, &data).await.unwrap().is_none());
        assert_eq!(store.list_events().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn unknown_slug_reference_fails() {
        let store = InMemoryStore::new();
        let data = SeedData::from_json(
            r#"{
                "sports": [{ "name": "Chess", "slug": "chess", "type": "INDIVIDUAL" }],
                "competitions": [{ "name": "Candidates", "slug": "candidates", "level": "INTERNATIONAL", "sport": "go" }]
            }"#,
        )
        .unwrap();
        let err = apply(&store, &data).await.unwrap_err();
        assert_eq!(err.to_string(), "seed references unknown sport 'go'");
    }
}
