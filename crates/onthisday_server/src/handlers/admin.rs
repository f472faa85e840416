//! Admin console endpoints. Everything except `login` requires an [`AdminUser`].

use axum::Json;
use axum::debug_handler;
use axum::extract::State;
use axum::http::StatusCode;
use onthisday_archive::model::{
    Competition, EntityId, EventParticipant, Location, Sport, Team,
};
use tracing::info;

use super::{AppJson, AppPath};
use crate::auth::{self, AdminUser};
use crate::error::ApiResult;
use crate::services::{AdminService, CatalogService};
use crate::state::AppState;
use crate::types::{
    CompetitionInput, DeleteResponse, EventDto, EventInput, LocationInput, LoginRequest,
    LoginResponse, ParticipantInput, PersonDto, PersonInput, SportInput, TeamInput,
};

#[debug_handler]
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let admin = state.admin.as_ref();
    auth::authenticate(admin, &request.username_or_email, &request.password)?;
    let issued = state.tokens.issue(admin)?;
    info!(username = %admin.username, "admin logged in");
    Ok(Json(LoginResponse {
        access_token: issued.token,
        expires_at_utc: issued.expires_at,
        user_id: admin.id,
        username: admin.username.clone(),
        email: admin.email.clone(),
    }))
}

fn deleted(deleted: bool) -> Json<DeleteResponse> {
    Json(DeleteResponse { deleted })
}

#[debug_handler]
pub async fn list_sports(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<Sport>>> {
    Ok(Json(state.store.list_sports().await?))
}

#[debug_handler]
pub async fn create_sport(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(input): AppJson<SportInput>,
) -> ApiResult<(StatusCode, Json<Sport>)> {
    let sport = AdminService::from_state(&state).create_sport(input).await?;
    Ok((StatusCode::CREATED, Json(sport)))
}

#[debug_handler]
pub async fn update_sport(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<EntityId>,
    AppJson(input): AppJson<SportInput>,
) -> ApiResult<Json<Sport>> {
    Ok(Json(
        AdminService::from_state(&state)
            .update_sport(id, input)
            .await?,
    ))
}

#[debug_handler]
pub async fn delete_sport(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<Json<DeleteResponse>> {
    let removed = state.store.delete_sport(id).await?;
    info!(sport_id = id, removed, by = %admin.username, "delete sport");
    Ok(deleted(removed))
}

#[debug_handler]
pub async fn list_locations(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<Location>>> {
    Ok(Json(state.store.list_locations().await?))
}

#[debug_handler]
pub async fn create_location(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(input): AppJson<LocationInput>,
) -> ApiResult<(StatusCode, Json<Location>)> {
    let location = AdminService::from_state(&state)
        .create_location(input)
        .await?;
    Ok((StatusCode::CREATED, Json(location)))
}

#[debug_handler]
pub async fn update_location(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<EntityId>,
    AppJson(input): AppJson<LocationInput>,
) -> ApiResult<Json<Location>> {
    Ok(Json(
        AdminService::from_state(&state)
            .update_location(id, input)
            .await?,
    ))
}

#[debug_handler]
pub async fn delete_location(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<Json<DeleteResponse>> {
    Ok(deleted(state.store.delete_location(id).await?))
}

#[debug_handler]
pub async fn list_competitions(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<Competition>>> {
    Ok(Json(state.store.list_competitions().await?))
}

#[debug_handler]
pub async fn create_competition(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(input): AppJson<CompetitionInput>,
) -> ApiResult<(StatusCode, Json<Competition>)> {
    let competition = AdminService::from_state(&state)
        .create_competition(input)
        .await?;
    Ok((StatusCode::CREATED, Json(competition)))
}

#[debug_handler]
pub async fn update_competition(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<EntityId>,
    AppJson(input): AppJson<CompetitionInput>,
) -> ApiResult<Json<Competition>> {
    Ok(Json(
        AdminService::from_state(&state)
            .update_competition(id, input)
            .await?,
    ))
}

#[debug_handler]
pub async fn delete_competition(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<Json<DeleteResponse>> {
    Ok(deleted(state.store.delete_competition(id).await?))
}

#[debug_handler]
pub async fn list_teams(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<Team>>> {
    Ok(Json(state.store.list_teams().await?))
}

#[debug_handler]
pub async fn create_team(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(input): AppJson<TeamInput>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    let team = AdminService::from_state(&state).create_team(input).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

#[debug_handler]
pub async fn update_team(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<EntityId>,
    AppJson(input): AppJson<TeamInput>,
) -> ApiResult<Json<Team>> {
    Ok(Json(
        AdminService::from_state(&state)
            .update_team(id, input)
            .await?,
    ))
}

#[debug_handler]
pub async fn delete_team(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<Json<DeleteResponse>> {
    Ok(deleted(state.store.delete_team(id).await?))
}

#[debug_handler]
pub async fn team_members(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<Json<Vec<PersonDto>>> {
    Ok(Json(AdminService::from_state(&state).team_members(id).await?))
}

#[debug_handler]
pub async fn list_persons(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<PersonDto>>> {
    Ok(Json(CatalogService::from_state(&state).persons(None).await?))
}

#[debug_handler]
pub async fn create_person(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(input): AppJson<PersonInput>,
) -> ApiResult<(StatusCode, Json<PersonDto>)> {
    let person = AdminService::from_state(&state).create_person(input).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

#[debug_handler]
pub async fn update_person(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<EntityId>,
    AppJson(input): AppJson<PersonInput>,
) -> ApiResult<Json<PersonDto>> {
    Ok(Json(
        AdminService::from_state(&state)
            .update_person(id, input)
            .await?,
    ))
}

#[debug_handler]
pub async fn delete_person(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<Json<DeleteResponse>> {
    Ok(deleted(state.store.delete_person(id).await?))
}

#[debug_handler]
pub async fn list_events(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<EventDto>>> {
    let events = state.store.list_events().await?;
    Ok(Json(
        CatalogService::from_state(&state)
            .event_dtos(&events)
            .await?,
    ))
}

#[debug_handler]
pub async fn create_event(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(input): AppJson<EventInput>,
) -> ApiResult<(StatusCode, Json<EventDto>)> {
    let event = AdminService::from_state(&state).create_event(input).await?;
    let mut dto = CatalogService::from_state(&state)
        .event_dtos(std::slice::from_ref(&event))
        .await?;
    let dto = dto.pop().ok_or_else(|| {
        crate::error::ApiError::Internal("event projection missing".into())
    })?;
    Ok((StatusCode::CREATED, Json(dto)))
}

#[debug_handler]
pub async fn update_event(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<EntityId>,
    AppJson(input): AppJson<EventInput>,
) -> ApiResult<Json<EventDto>> {
    let event = AdminService::from_state(&state)
        .update_event(id, input)
        .await?;
    let mut dto = CatalogService::from_state(&state)
        .event_dtos(std::slice::from_ref(&event))
        .await?;
    let dto = dto.pop().ok_or_else(|| {
        crate::error::ApiError::Internal("event projection missing".into())
    })?;
    Ok(Json(dto))
}

#[debug_handler]
pub async fn delete_event(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<Json<DeleteResponse>> {
    Ok(deleted(state.store.delete_event(id).await?))
}

#[debug_handler]
pub async fn add_participant(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(event_id): AppPath<EntityId>,
    AppJson(input): AppJson<ParticipantInput>,
) -> ApiResult<(StatusCode, Json<EventParticipant>)> {
    let participant = AdminService::from_state(&state)
        .add_participant(event_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(participant)))
}
