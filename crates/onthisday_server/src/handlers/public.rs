use axum::Json;
use axum::debug_handler;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use onthisday_archive::model::{EntityId, Sport};
use onthisday_archive::observability::Health;

use super::{AppPath, AppQuery};
use crate::error::ApiResult;
use crate::services::CatalogService;
use crate::state::AppState;
use crate::types::{DateParams, EventDetailDto, EventDto, PersonDto, PersonFilter};

#[debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let health = Health::probe(state.store.as_ref()).await;
    let status = if health.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health))
}

#[debug_handler]
pub async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();
    ([(CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

#[debug_handler]
pub async fn list_sports(State(state): State<AppState>) -> ApiResult<Json<Vec<Sport>>> {
    Ok(Json(state.store.list_sports().await?))
}

#[debug_handler]
pub async fn get_sport(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> ApiResult<Json<Sport>> {
    let sport = CatalogService::from_state(&state).sport_by_slug(&slug).await?;
    Ok(Json(sport))
}

#[debug_handler]
pub async fn events_on_date(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<DateParams>,
) -> ApiResult<Json<Vec<EventDto>>> {
    let events = CatalogService::from_state(&state)
        .events_on(&params, None)
        .await?;
    Ok(Json(events))
}

#[debug_handler]
pub async fn sport_events_on_date(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
    AppQuery(params): AppQuery<DateParams>,
) -> ApiResult<Json<Vec<EventDto>>> {
    let events = CatalogService::from_state(&state)
        .events_on(&params, Some(&slug))
        .await?;
    Ok(Json(events))
}

#[debug_handler]
pub async fn event_detail(
    State(state): State<AppState>,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<Json<EventDetailDto>> {
    Ok(Json(CatalogService::from_state(&state).event_detail(id).await?))
}

#[debug_handler]
pub async fn list_persons(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<PersonFilter>,
) -> ApiResult<Json<Vec<PersonDto>>> {
    Ok(Json(
        CatalogService::from_state(&state)
            .persons(filter.status)
            .await?,
    ))
}

#[debug_handler]
pub async fn person_by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> ApiResult<Json<PersonDto>> {
    Ok(Json(
        CatalogService::from_state(&state)
            .person_by_slug(&slug)
            .await?,
    ))
}

#[debug_handler]
pub async fn birthdays(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<DateParams>,
) -> ApiResult<Json<Vec<PersonDto>>> {
    Ok(Json(CatalogService::from_state(&state).birthdays(&params).await?))
}

#[debug_handler]
pub async fn deaths(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<DateParams>,
) -> ApiResult<Json<Vec<PersonDto>>> {
    Ok(Json(CatalogService::from_state(&state).deaths(&params).await?))
}
