//! Application services between the HTTP handlers and the store.
//!
//! `CatalogService` answers public reads and assembles response DTOs;
//! `AdminService` applies slug derivation, date normalization and field
//! validation before handing writes to the store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use onthisday_archive::model::{
    Competition, EntityId, EventParticipant, Location, MAX_FOUNDED_YEAR, MIN_FOUNDED_YEAR, Person,
    PersonStatus, Sport, SportEvent, Team,
};
use onthisday_archive::{
    ArchiveError, ArchiveStore, DateQuery, NormalizedDate, build_slug, normalize,
    to_display_projection,
};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, Clock};
use crate::types::{
    CompetitionInput, DateParams, EventDetailDto, EventDto, EventInput, LocationInput,
    ParticipantDto, ParticipantInput, PersonDto, PersonInput, SportInput, TeamInput,
};

fn require_text(value: &str, field: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!("{field} is required.")));
    }
    Ok(trimmed.to_string())
}

fn normalize_params(params: &DateParams, now: DateTime<Utc>) -> ApiResult<NormalizedDate> {
    let query = DateQuery::new(
        params.day,
        params.month,
        params.year,
        params.calendar.as_deref(),
    );
    Ok(normalize(&query, now)?)
}

pub fn event_dto(event: &SportEvent, sport: Option<&Sport>, now: DateTime<Utc>) -> EventDto {
    let projection = to_display_projection(event.day, event.month, event.year, now);
    let persian = projection.persian;
    EventDto {
        id: event.id,
        slug: event.slug.clone(),
        headline: event.headline.clone(),
        full_description: event.full_description.clone(),
        day: event.day,
        month: event.month,
        year: event.year,
        event_type: event.event_type,
        sport_name: sport.map(|s| s.name.clone()),
        sport_slug: sport.map(|s| s.slug.clone()),
        competition_id: event.competition_id,
        location_id: event.location_id,
        media_url: event.media_url.clone(),
        gregorian_day: projection.gregorian.day,
        gregorian_month: projection.gregorian.month,
        gregorian_year: projection.gregorian.year,
        persian_day: persian.map(|p| p.day),
        persian_month: persian.map(|p| p.month),
        persian_year: persian.and_then(|p| p.year),
    }
}

pub fn person_dto(person: &Person, now: DateTime<Utc>) -> PersonDto {
    let project = |date: NaiveDate| {
        to_display_projection(date.day(), date.month(), Some(date.year()), now)
    };
    PersonDto {
        id: person.id,
        firstname: person.firstname.clone(),
        lastname: person.lastname.clone(),
        full_name: person.full_name(),
        slug: person.slug.clone(),
        title: person.title.clone(),
        nationality: person.nationality.clone(),
        birth_date: person.birth_date,
        death_date: person.death_date,
        biography: person.biography.clone(),
        profile_image_url: person.profile_image_url.clone(),
        gender: person.gender,
        status: person.status,
        sport_ids: person.sport_ids.clone(),
        team_ids: person.team_ids.clone(),
        birth: project(person.birth_date),
        death: person.death_date.map(project),
    }
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn ArchiveStore>,
    clock: Clock,
}

impl CatalogService {
    pub fn new(store: Arc<dyn ArchiveStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.clock.clone())
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    async fn sports_by_id(&self) -> ApiResult<HashMap<EntityId, Sport>> {
        Ok(self
            .store
            .list_sports()
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect())
    }

    pub async fn event_dtos(&self, events: &[SportEvent]) -> ApiResult<Vec<EventDto>> {
        let sports = self.sports_by_id().await?;
        let now = self.now();
        Ok(events
            .iter()
            .map(|e| event_dto(e, sports.get(&e.sport_id), now))
            .collect())
    }

    pub async fn sport_by_slug(&self, slug: &str) -> ApiResult<Sport> {
        self.store
            .find_sport_by_slug(slug)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Sport with slug '{slug}' not found.")))
    }

    /// Events on the (possibly Persian) date in `params`, optionally for one sport.
    ///
    /// Only the normalized day and month select events; the year does not filter.
    pub async fn events_on(
        &self,
        params: &DateParams,
        sport_slug: Option<&str>,
    ) -> ApiResult<Vec<EventDto>> {
        let date = normalize_params(params, self.now())?;
        let sport_id = match sport_slug {
            Some(slug) => Some(self.sport_by_slug(slug).await?.id),
            None => None,
        };
        let events = self.store.events_on(date.day, date.month, sport_id).await?;
        self.event_dtos(&events).await
    }

    pub async fn event_detail(&self, id: EntityId) -> ApiResult<EventDetailDto> {
        let event = self
            .store
            .get_event(id)
            .await?
            .ok_or_else(|| ArchiveError::not_found("SportEvent", id))?;
        let sport = self.store.get_sport(event.sport_id).await?;

        let competition_name = match event.competition_id {
            Some(cid) => self.store.get_competition(cid).await?.map(|c| c.name),
            None => None,
        };
        let location_name = match event.location_id {
            Some(lid) => self
                .store
                .get_location(lid)
                .await?
                .map(|l| l.label().to_string()),
            None => None,
        };

        let teams: HashMap<EntityId, Team> = self
            .store
            .list_teams()
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        let mut participants = Vec::new();
        for p in self.store.participants_of(id).await? {
            let person = match p.person_id {
                Some(pid) => self.store.get_person(pid).await?,
                None => None,
            };
            let team = p.team_id.and_then(|tid| teams.get(&tid));
            participants.push(ParticipantDto {
                id: p.id,
                person_id: p.person_id,
                person_name: person.as_ref().map(Person::full_name),
                person_slug: person.as_ref().map(|x| x.slug.clone()),
                team_id: p.team_id,
                team_name: team.map(|t| t.name.clone()),
                team_slug: team.map(|t| t.slug.clone()),
                role: p.role,
                performance_note: p.performance_note,
                is_primary: p.is_primary,
            });
        }

        Ok(EventDetailDto {
            event: event_dto(&event, sport.as_ref(), self.now()),
            competition_name,
            location_name,
            participants,
        })
    }

    pub async fn persons(&self, status: Option<PersonStatus>) -> ApiResult<Vec<PersonDto>> {
        let now = self.now();
        Ok(self
            .store
            .list_persons(status)
            .await?
            .iter()
            .map(|p| person_dto(p, now))
            .collect())
    }

    pub async fn person_by_slug(&self, slug: &str) -> ApiResult<PersonDto> {
        let person = self
            .store
            .find_person_by_slug(slug)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Person with slug '{slug}' not found.")))?;
        Ok(person_dto(&person, self.now()))
    }

    pub async fn birthdays(&self, params: &DateParams) -> ApiResult<Vec<PersonDto>> {
        let now = self.now();
        let date = normalize_params(params, now)?;
        let persons = self.store.persons_born_on(date.day, date.month).await?;
        Ok(persons.iter().map(|p| person_dto(p, now)).collect())
    }

    pub async fn deaths(&self, params: &DateParams) -> ApiResult<Vec<PersonDto>> {
        let now = self.now();
        let date = normalize_params(params, now)?;
        let persons = self.store.persons_died_on(date.day, date.month).await?;
        Ok(persons.iter().map(|p| person_dto(p, now)).collect())
    }
}

#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn ArchiveStore>,
    clock: Clock,
}

impl AdminService {
    pub fn new(store: Arc<dyn ArchiveStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.clock.clone())
    }

    fn sport_from(id: EntityId, input: SportInput) -> ApiResult<Sport> {
        let name = require_text(&input.name, "Name")?;
        Ok(Sport {
            id,
            slug: build_slug(input.slug.as_deref(), &name, None)?,
            name,
            description: input.description,
            icon_url: input.icon_url,
            sport_type: input.sport_type,
        })
    }

    pub async fn create_sport(&self, input: SportInput) -> ApiResult<Sport> {
        Ok(self.store.create_sport(Self::sport_from(0, input)?).await?)
    }

    pub async fn update_sport(&self, id: EntityId, input: SportInput) -> ApiResult<Sport> {
        Ok(self.store.update_sport(Self::sport_from(id, input)?).await?)
    }

    fn location_from(id: EntityId, input: LocationInput) -> ApiResult<Location> {
        let name = require_text(&input.name, "Name")?;
        Ok(Location {
            id,
            slug: build_slug(input.slug.as_deref(), &name, None)?,
            name: Some(name),
            city: input.city,
            country: input.country,
            description: input.description,
        })
    }

    pub async fn create_location(&self, input: LocationInput) -> ApiResult<Location> {
        Ok(self
            .store
            .create_location(Self::location_from(0, input)?)
            .await?)
    }

    pub async fn update_location(&self, id: EntityId, input: LocationInput) -> ApiResult<Location> {
        Ok(self
            .store
            .update_location(Self::location_from(id, input)?)
            .await?)
    }

    fn competition_from(id: EntityId, input: CompetitionInput) -> ApiResult<Competition> {
        let name = require_text(&input.name, "Name")?;
        Ok(Competition {
            id,
            slug: build_slug(input.slug.as_deref(), &name, None)?,
            name,
            short_name: input.short_name,
            level: input.level,
            description: input.description,
            logo_url: input.logo_url,
            sport_id: input.sport_id,
        })
    }

    pub async fn create_competition(&self, input: CompetitionInput) -> ApiResult<Competition> {
        Ok(self
            .store
            .create_competition(Self::competition_from(0, input)?)
            .await?)
    }

    pub async fn update_competition(
        &self,
        id: EntityId,
        input: CompetitionInput,
    ) -> ApiResult<Competition> {
        Ok(self
            .store
            .update_competition(Self::competition_from(id, input)?)
            .await?)
    }

    fn team_from(id: EntityId, input: &TeamInput) -> ApiResult<Team> {
        if !(MIN_FOUNDED_YEAR..=MAX_FOUNDED_YEAR).contains(&input.founded_year) {
            return Err(ApiError::Validation(format!(
                "Founded year must be between {MIN_FOUNDED_YEAR} and {MAX_FOUNDED_YEAR}."
            )));
        }
        let name = require_text(&input.name, "Name")?;
        Ok(Team {
            id,
            slug: build_slug(input.slug.as_deref(), &name, None)?,
            name,
            description: input.description.clone(),
            icon_url: input.icon_url.clone(),
            website_url: input.website_url.clone(),
            founded_year: input.founded_year,
            sport_id: input.sport_id,
            location_id: input.location_id,
        })
    }

    pub async fn create_team(&self, input: TeamInput) -> ApiResult<Team> {
        let team = Self::team_from(0, &input)?;
        let members = input.member_ids.unwrap_or_default();
        Ok(self.store.create_team(team, members).await?)
    }

    pub async fn update_team(&self, id: EntityId, input: TeamInput) -> ApiResult<Team> {
        let team = Self::team_from(id, &input)?;
        Ok(self.store.update_team(team, input.member_ids).await?)
    }

    pub async fn team_members(&self, id: EntityId) -> ApiResult<Vec<PersonDto>> {
        let now = (self.clock)();
        Ok(self
            .store
            .team_members(id)
            .await?
            .iter()
            .map(|p| person_dto(p, now))
            .collect())
    }

    fn person_from(id: EntityId, input: &PersonInput) -> ApiResult<Person> {
        let firstname = require_text(&input.firstname, "Firstname")?;
        let lastname = input.lastname.as_deref().map(str::trim).unwrap_or_default();
        let fallback = format!("{firstname}-{lastname}");
        Ok(Person {
            id,
            slug: build_slug(input.slug.as_deref(), fallback.trim_matches('-'), None)?,
            firstname,
            lastname: input.lastname.clone(),
            title: input.title.clone(),
            nationality: input.nationality.clone(),
            birth_date: input.birth_date,
            death_date: input.death_date,
            biography: input.biography.clone(),
            profile_image_url: input.profile_image_url.clone(),
            gender: input.gender,
            status: input.status,
            sport_ids: input.sport_ids.clone().unwrap_or_default(),
            team_ids: input.team_ids.clone().unwrap_or_default(),
        })
    }

    pub async fn create_person(&self, input: PersonInput) -> ApiResult<PersonDto> {
        let person = self
            .store
            .create_person(Self::person_from(0, &input)?)
            .await?;
        Ok(person_dto(&person, (self.clock)()))
    }

    pub async fn update_person(&self, id: EntityId, input: PersonInput) -> ApiResult<PersonDto> {
        let person = Self::person_from(id, &input)?;
        let person = self
            .store
            .update_person(person, input.sport_ids, input.team_ids)
            .await?;
        Ok(person_dto(&person, (self.clock)()))
    }

    /// Normalize the submitted date and derive the slug. With a known year the
    /// slug carries the full Gregorian date, otherwise only `MM-DD`.
    fn event_from(&self, id: EntityId, input: EventInput) -> ApiResult<SportEvent> {
        let headline = require_text(&input.headline, "Headline")?;
        let query = DateQuery::new(input.day, input.month, input.year, input.calendar.as_deref());
        let date = normalize(&query, (self.clock)())?;

        let mut event = SportEvent {
            id,
            headline,
            full_description: input.full_description,
            slug: String::new(),
            day: date.day,
            month: date.month,
            year: date.year,
            event_type: input.event_type,
            sport_id: input.sport_id,
            competition_id: input.competition_id,
            location_id: input.location_id,
            media_url: input.media_url,
        };
        event.slug = match event.date() {
            Some(d) => build_slug(input.slug.as_deref(), &event.headline, Some(d))?,
            None => build_slug(
                input.slug.as_deref(),
                &format!("{} {:02}-{:02}", event.headline, event.month, event.day),
                None,
            )?,
        };
        Ok(event)
    }

    pub async fn create_event(&self, input: EventInput) -> ApiResult<SportEvent> {
        let event = self.event_from(0, input)?;
        Ok(self.store.create_event(event).await?)
    }

    pub async fn update_event(&self, id: EntityId, input: EventInput) -> ApiResult<SportEvent> {
        let event = self.event_from(id, input)?;
        Ok(self.store.update_event(event).await?)
    }

    pub async fn add_participant(
        &self,
        event_id: EntityId,
        input: ParticipantInput,
    ) -> ApiResult<EventParticipant> {
        Ok(self
            .store
            .add_participant(EventParticipant {
                id: 0,
                sport_event_id: event_id,
                person_id: input.person_id,
                team_id: input.team_id,
                role: input.role,
                performance_note: input.performance_note,
                is_primary: input.is_primary,
            })
            .await?)
    }
}
