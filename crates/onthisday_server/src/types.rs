//! Request and response payloads of the HTTP API.

use chrono::{DateTime, NaiveDate, Utc};
use onthisday_archive::DisplayProjection;
use onthisday_archive::model::{
    CompetitionLevel, EntityId, EventType, Gender, ParticipantRole, PersonStatus, SportType,
};
use serde::{Deserialize, Serialize};

/// `?day=&month=&year=&calendar=` on the date routes. Missing parts become
/// zero so they fail date validation with the usual message.
#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
    #[serde(default)]
    pub day: i32,
    #[serde(default)]
    pub month: i32,
    pub year: Option<i32>,
    pub calendar: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PersonFilter {
    pub status: Option<PersonStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDto {
    pub id: EntityId,
    pub slug: String,
    pub headline: String,
    pub full_description: Option<String>,
    pub day: u32,
    pub month: u32,
    pub year: Option<i32>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub sport_name: Option<String>,
    pub sport_slug: Option<String>,
    pub competition_id: Option<EntityId>,
    pub location_id: Option<EntityId>,
    pub media_url: Option<String>,
    pub gregorian_day: u32,
    pub gregorian_month: u32,
    pub gregorian_year: Option<i32>,
    pub persian_day: Option<u32>,
    pub persian_month: Option<u32>,
    pub persian_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub id: EntityId,
    pub person_id: Option<EntityId>,
    pub person_name: Option<String>,
    pub person_slug: Option<String>,
    pub team_id: Option<EntityId>,
    pub team_name: Option<String>,
    pub team_slug: Option<String>,
    pub role: ParticipantRole,
    pub performance_note: Option<String>,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetailDto {
    #[serde(flatten)]
    pub event: EventDto,
    pub competition_name: Option<String>,
    pub location_name: Option<String>,
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonDto {
    pub id: EntityId,
    pub firstname: String,
    pub lastname: Option<String>,
    pub full_name: String,
    pub slug: String,
    pub title: Option<String>,
    pub nationality: Option<String>,
    pub birth_date: NaiveDate,
    pub death_date: Option<NaiveDate>,
    pub biography: Option<String>,
    pub profile_image_url: Option<String>,
    pub gender: Gender,
    pub status: PersonStatus,
    pub sport_ids: Vec<EntityId>,
    pub team_ids: Vec<EntityId>,
    pub birth: DisplayProjection,
    pub death: Option<DisplayProjection>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_at_utc: DateTime<Utc>,
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct SportInput {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    #[serde(rename = "type")]
    pub sport_type: SportType,
}

#[derive(Debug, Deserialize)]
pub struct LocationInput {
    pub name: String,
    pub slug: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompetitionInput {
    pub name: String,
    pub short_name: Option<String>,
    pub slug: Option<String>,
    pub level: CompetitionLevel,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub sport_id: EntityId,
}

#[derive(Debug, Deserialize)]
pub struct TeamInput {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub website_url: Option<String>,
    pub founded_year: i32,
    pub sport_id: Option<EntityId>,
    pub location_id: Option<EntityId>,
    /// Replaces the roster on update when present.
    pub member_ids: Option<Vec<EntityId>>,
}

#[derive(Debug, Deserialize)]
pub struct PersonInput {
    pub firstname: String,
    pub lastname: Option<String>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub nationality: Option<String>,
    pub birth_date: NaiveDate,
    pub death_date: Option<NaiveDate>,
    pub biography: Option<String>,
    pub profile_image_url: Option<String>,
    pub gender: Gender,
    pub status: PersonStatus,
    pub sport_ids: Option<Vec<EntityId>>,
    pub team_ids: Option<Vec<EntityId>>,
}

/// Event write payload. The date may be Persian; it is normalized before storage.
#[derive(Debug, Deserialize)]
pub struct EventInput {
    pub headline: String,
    pub full_description: Option<String>,
    pub slug: Option<String>,
    pub day: i32,
    pub month: i32,
    pub year: Option<i32>,
    pub calendar: Option<String>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub sport_id: EntityId,
    pub competition_id: Option<EntityId>,
    pub location_id: Option<EntityId>,
    pub media_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParticipantInput {
    pub person_id: Option<EntityId>,
    pub team_id: Option<EntityId>,
    pub role: ParticipantRole,
    pub performance_note: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}
