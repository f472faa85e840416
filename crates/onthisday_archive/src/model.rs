//! Domain entities stored in the archive.
//!
//! Enumerations serialize in `SCREAMING_SNAKE_CASE` to match the API.
//! Create operations ignore the incoming `id` and assign a fresh one.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub type EntityId = i64;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SportType {
    Team,
    Individual,
    Combat,
    Motorsport,
    Olympic,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetitionLevel {
    International,
    Continental,
    National,
    Club,
    Amateur,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonStatus {
    Active,
    Retired,
    Deceased,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    MatchResult,
    WorldRecord,
    Achievement,
    Scandal,
    Transfer,
    Retirement,
    Other,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantRole {
    Winner,
    Loser,
    Draw,
    Scorer,
    Coach,
    Referee,
    Participant,
    RecordBreaker,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Sport {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    #[serde(rename = "type")]
    pub sport_type: SportType,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Location {
    #[serde(default)]
    pub id: EntityId,
    pub slug: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
}

impl Location {
    /// Display label: the name, else the city, else the slug.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.city.as_deref())
            .unwrap_or(&self.slug)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Competition {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    pub short_name: Option<String>,
    pub slug: String,
    pub level: CompetitionLevel,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub sport_id: EntityId,
}

pub const MIN_FOUNDED_YEAR: i32 = 1800;
pub const MAX_FOUNDED_YEAR: i32 = 2100;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Team {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub website_url: Option<String>,
    pub founded_year: i32,
    pub sport_id: Option<EntityId>,
    pub location_id: Option<EntityId>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Person {
    #[serde(default)]
    pub id: EntityId,
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
    pub sport_ids: Vec<EntityId>,
    #[serde(default)]
    pub team_ids: Vec<EntityId>,
}

impl Person {
    pub fn full_name(&self) -> String {
        match self.lastname.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {last}", self.firstname),
            _ => self.firstname.clone(),
        }
    }

    pub fn born_on(&self, day: u32, month: u32) -> bool {
        self.birth_date.day() == day && self.birth_date.month() == month
    }

    pub fn died_on(&self, day: u32, month: u32) -> bool {
        self.death_date
            .is_some_and(|d| d.day() == day && d.month() == month)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SportEvent {
    #[serde(default)]
    pub id: EntityId,
    pub headline: String,
    pub full_description: Option<String>,
    pub slug: String,
    pub day: u32,
    pub month: u32,
    pub year: Option<i32>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub sport_id: EntityId,
    pub competition_id: Option<EntityId>,
    pub location_id: Option<EntityId>,
    pub media_url: Option<String>,
}

impl SportEvent {
    /// Full Gregorian date when the year is known and the parts form a real day.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month, self.day)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EventParticipant {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub sport_event_id: EntityId,
    pub person_id: Option<EntityId>,
    pub team_id: Option<EntityId>,
    pub role: ParticipantRole,
    pub performance_note: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(lastname: Option<&str>) -> Person {
        Person {
            id: 1,
            firstname: "Gillis".into(),
            lastname: lastname.map(Into::into),
            slug: "gillis-grafstrom".into(),
            title: None,
            nationality: Some("Sweden".into()),
            birth_date: NaiveDate::from_ymd_opt(1893, 6, 7).unwrap(),
            death_date: NaiveDate::from_ymd_opt(1938, 4, 14),
            biography: None,
            profile_image_url: None,
            gender: Gender::Male,
            status: PersonStatus::Deceased,
            sport_ids: vec![],
            team_ids: vec![],
        }
    }

    #[test]
    fn enums_use_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&EventType::MatchResult).unwrap(),
            "\"MATCH_RESULT\""
        );
        assert_eq!(
            serde_json::from_str::<ParticipantRole>("\"RECORD_BREAKER\"").unwrap(),
            ParticipantRole::RecordBreaker
        );
    }

    #[test]
    fn full_name_skips_blank_lastname() {
        assert_eq!(person(Some("Grafström")).full_name(), "Gillis Grafström");
        assert_eq!(person(Some("  ")).full_name(), "Gillis");
        assert_eq!(person(None).full_name(), "Gillis");
    }

    #[test]
    fn birth_and_death_matching_ignores_year() {
        let p = person(None);
        assert!(p.born_on(7, 6));
        assert!(!p.born_on(6, 7));
        assert!(p.died_on(14, 4));
    }

    #[test]
    fn event_date_requires_year() {
        let mut event = SportEvent {
            id: 1,
            headline: "h".into(),
            full_description: None,
            slug: "h".into(),
            day: 19,
            month: 2,
            year: None,
            event_type: EventType::MatchResult,
            sport_id: 1,
            competition_id: None,
            location_id: None,
            media_url: None,
        };
        assert_eq!(event.date(), None);
        event.year = Some(1928);
        assert_eq!(event.date(), NaiveDate::from_ymd_opt(1928, 2, 19));
    }

    #[test]
    fn location_label_falls_back() {
        let loc = Location {
            id: 1,
            slug: "yankee-stadium".into(),
            name: None,
            city: Some("New York".into()),
            country: None,
            description: None,
        };
        assert_eq!(loc.label(), "New York");
    }
}
