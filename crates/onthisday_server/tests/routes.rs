use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use onthisday_archive::config::Config;
use onthisday_archive::seed::{self, SeedData};
use onthisday_archive::{ArchiveStore, InMemoryStore};
use onthisday_server::{AppState, Clock, auth, router};

const PASSWORD: &str = "Admin@12345";

async fn app() -> Router {
    let hash = auth::hash_password("route-salt", PASSWORD).unwrap();
    let config = Config::from_env_with(|k| match k {
        "ONTHISDAY_ADMIN_PASSWORD_SALT" => Some("route-salt".into()),
        "ONTHISDAY_ADMIN_PASSWORD_HASH" => Some(hash.clone()),
        "ONTHISDAY_JWT_KEY" => Some("route-test-key".into()),
        _ => None,
    })
    .unwrap();

    let store: Arc<dyn ArchiveStore> = Arc::new(InMemoryStore::new());
    seed::apply(store.as_ref(), &SeedData::builtin().unwrap())
        .await
        .unwrap();

    let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    let clock: Clock = Arc::new(move || now);
    router(AppState::new(store, &config).with_clock(clock))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/admin/login",
            None,
            json!({ "username_or_email": "admin", "password": PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_seeded_archive() {
    let app = app().await;
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["sports"], 5);
    assert_eq!(body["events"], 4);
}

#[tokio::test]
async fn metrics_without_recorder_is_empty_text() {
    let app = app().await;
    let response = app
        .clone()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; version=0.0.4"
    );
}

#[tokio::test]
async fn events_on_gregorian_date_are_ordered_by_year() {
    let app = app().await;
    let (status, body) = get(&app, "/api/sports/events?day=19&month=2&calendar=gregorian").await;
    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 4);
    let years: Vec<i64> = events.iter().map(|e| e["year"].as_i64().unwrap()).collect();
    assert_eq!(years, vec![1928, 1928, 1928, 1942]);
    assert_eq!(events[0]["sport_slug"], "ice-hockey");
    assert_eq!(events[0]["type"], "MATCH_RESULT");
    assert_eq!(events[0]["gregorian_day"], 19);
    assert!(events[0]["persian_day"].is_number());
}

#[tokio::test]
async fn persian_is_the_default_calendar() {
    let app = app().await;
    // 30 Bahman 1405 is 19 February 2027.
    let (status, body) = get(&app, "/api/sports/events?day=30&month=11").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn sport_scoped_events_filter_by_slug() {
    let app = app().await;
    let (status, body) = get(
        &app,
        "/api/sports/baseball/events?day=19&month=2&calendar=utc",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["slug"], "yankees-admit-soldiers-free-1942");

    let (status, body) = get(&app, "/api/sports/curling/events?day=19&month=2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Sport with slug 'curling' not found.");
}

#[tokio::test]
async fn invalid_dates_are_rejected() {
    let app = app().await;
    for uri in [
        "/api/sports/events?day=31&month=2&calendar=gregorian",
        "/api/sports/events?month=2",
        "/api/sports/events?day=30&month=12&year=1404",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Day and month are required and must be valid.");
    }
}

#[tokio::test]
async fn event_detail_lists_primary_participant_first() {
    let app = app().await;
    let (status, body) = get(&app, "/api/events/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["competition_name"], "Winter Olympic Games");
    assert_eq!(body["location_name"], "St. Moritz Olympic Arena");
    let participants = body["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 3);
    assert_eq!(participants[0]["is_primary"], true);
    assert_eq!(participants[0]["team_slug"], "canada-olympic-team");

    let (status, _) = get(&app, "/api/events/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn persons_by_slug_and_anniversaries() {
    let app = app().await;
    let (status, body) = get(&app, "/api/persons/dave-trottier").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Dave Trottier");
    assert_eq!(body["birth"]["gregorian"]["year"], 1906);

    let (status, body) = get(&app, "/api/persons/deaths?day=13&month=11&calendar=gregorian").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = get(&app, "/api/persons/birthdays?day=7&month=6&calendar=gregorian").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["slug"], "gillis-grafstrom");

    let (status, _) = get(&app, "/api/persons/nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_routes_require_a_bearer_token() {
    let app = app().await;
    let (status, body) = get(&app, "/api/admin/sports").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Admin authentication is required.");

    let request = Request::get("/api/admin/sports")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = app().await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/admin/login",
            None,
            json!({ "username_or_email": "admin", "password": "nope" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username/email or password.");
}

#[tokio::test]
async fn admin_sport_lifecycle() {
    let app = app().await;
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/admin/sports",
            Some(&token),
            json!({ "name": "Curling", "type": "OLYMPIC" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["slug"], "curling");
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/admin/sports",
            Some(&token),
            json!({ "name": "Football", "type": "TEAM" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/admin/sports/{id}"),
            Some(&token),
            json!({ "name": "Curling", "slug": "stone-curling", "type": "OLYMPIC" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "stone-curling");

    let delete = |id: i64| {
        Request::delete(format!("/api/admin/sports/{id}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    };
    let (status, body) = send(&app, delete(id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "deleted": true }));
    let (_, body) = send(&app, delete(id)).await;
    assert_eq!(body, json!({ "deleted": false }));
}

#[tokio::test]
async fn admin_event_write_normalizes_persian_dates() {
    let app = app().await;
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/admin/events",
            Some(&token),
            json!({
                "headline": "Iran vs USA",
                "day": 31, "month": 3, "year": 1377,
                "type": "MATCH_RESULT",
                "sport_id": 1
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["slug"], "iran-vs-usa-1998-06-21");
    assert_eq!(body["day"], 21);
    assert_eq!(body["month"], 6);
    assert_eq!(body["year"], 1998);
    assert_eq!(body["persian_year"], 1377);
    let event_id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/admin/events/{event_id}/participants"),
            Some(&token),
            json!({ "role": "WINNER" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "At least one of personId or teamId must be provided."
    );

    let (status, body) = get(&app, "/api/sports/events?day=21&month=6&calendar=gregorian").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["headline"], "Iran vs USA");
}

#[tokio::test]
async fn rejected_team_create_leaves_no_row_behind() {
    let app = app().await;
    let token = login(&app).await;
    let create = || {
        json_request(
            "POST",
            "/api/admin/teams",
            Some(&token),
            json!({ "name": "Club", "founded_year": 1950, "member_ids": [999] }),
        )
    };

    let (status, body) = send(&app, create()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "One or more members were not found.");

    let request = Request::get("/api/admin/teams")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (_, teams) = send(&app, request).await;
    assert!(teams.as_array().unwrap().iter().all(|t| t["slug"] != "club"));

    // Retrying still fails on the member, not on a leftover slug.
    let (status, _) = send(&app, create()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_maps_to_validation_error() {
    let app = app().await;
    let token = login(&app).await;
    let request = Request::post("/api/admin/sports")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
