//! HTTP surface of the "On This Day" sports archive: public read routes,
//! the JWT-protected admin console, health and Prometheus metrics.

use axum::Router;
use axum::routing::{get, post, put};

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use state::{AppState, Clock};

use handlers::{admin, public};

/// All routes, without transport layers (body limit, timeout). Those are
/// added by the binary so tests can drive the bare router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(public::health))
        .route("/metrics", get(public::metrics_endpoint))
        .merge(public_routes())
        .merge(admin_routes())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sports", get(public::list_sports))
        .route("/api/sports/events", get(public::events_on_date))
        .route("/api/sports/{slug}", get(public::get_sport))
        .route("/api/sports/{slug}/events", get(public::sport_events_on_date))
        .route("/api/events/{id}", get(public::event_detail))
        .route("/api/persons", get(public::list_persons))
        .route("/api/persons/birthdays", get(public::birthdays))
        .route("/api/persons/deaths", get(public::deaths))
        .route("/api/persons/{slug}", get(public::person_by_slug))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/login", post(admin::login))
        .route(
            "/api/admin/sports",
            get(admin::list_sports).post(admin::create_sport),
        )
        .route(
            "/api/admin/sports/{id}",
            put(admin::update_sport).delete(admin::delete_sport),
        )
        .route(
            "/api/admin/locations",
            get(admin::list_locations).post(admin::create_location),
        )
        .route(
            "/api/admin/locations/{id}",
            put(admin::update_location).delete(admin::delete_location),
        )
        .route(
            "/api/admin/competitions",
            get(admin::list_competitions).post(admin::create_competition),
        )
        .route(
            "/api/admin/competitions/{id}",
            put(admin::update_competition).delete(admin::delete_competition),
        )
        .route(
            "/api/admin/teams",
            get(admin::list_teams).post(admin::create_team),
        )
        .route(
            "/api/admin/teams/{id}",
            put(admin::update_team).delete(admin::delete_team),
        )
        .route("/api/admin/teams/{id}/members", get(admin::team_members))
        .route(
            "/api/admin/persons",
            get(admin::list_persons).post(admin::create_person),
        )
        .route(
            "/api/admin/persons/{id}",
            put(admin::update_person).delete(admin::delete_person),
        )
        .route(
            "/api/admin/events",
            get(admin::list_events).post(admin::create_event),
        )
        .route(
            "/api/admin/events/{id}",
            put(admin::update_event).delete(admin::delete_event),
        )
        .route(
            "/api/admin/events/{id}/participants",
            post(admin::add_participant),
        )
}
