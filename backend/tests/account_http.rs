//! End-to-end HTTP behaviour of the account API over the in-memory store.
//!
//! Builds the same middleware stack as the server binary so tracing, path
//! normalisation and error rendering are exercised together.

use std::sync::Arc;

use accounts::Trace;
use accounts::domain::AccountService;
use accounts::inbound::http::configure_api;
use accounts::inbound::http::health::{HealthState, configure_health};
use accounts::inbound::http::state::HttpState;
use accounts::outbound::memory::InMemoryUserRepository;
use accounts::outbound::security::{DEFAULT_TOKEN_TTL_SECONDS, JwtTokenIssuer};
use accounts::test_support::{MutableClock, PlainPasswordHasher, TEST_TOKEN_SECRET};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::middleware::NormalizePath;
use actix_web::{App, test, web};
use chrono::{Duration, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

struct World {
    clock: Arc<MutableClock>,
    http_state: web::Data<HttpState>,
    health: web::Data<HealthState>,
}

#[fixture]
fn world() -> World {
    let start = Utc
        .with_ymd_and_hms(2026, 3, 14, 12, 0, 0)
        .single()
        .expect("fixture instant");
    let clock = Arc::new(MutableClock::new(start));
    let service = AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(PlainPasswordHasher::new()),
        Arc::new(JwtTokenIssuer::new(
            TEST_TOKEN_SECRET,
            Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS),
        )),
        clock.clone(),
    );
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    World {
        clock,
        http_state: web::Data::new(HttpState::new(Arc::new(service))),
        health,
    }
}

macro_rules! init_app {
    ($world:expr) => {{
        let http_state = $world.http_state.clone();
        let health = $world.health.clone();
        test::init_service(
            App::new()
                .app_data(http_state)
                .wrap(NormalizePath::trim())
                .wrap(Trace)
                .configure(move |cfg| configure_health(cfg, health))
                .configure(configure_api),
        )
        .await
    }};
}

fn fredy() -> Value {
    json!({
        "name": "Fredy",
        "email": "mercury.freddy@mail.com",
        "password": "somePassword"
    })
}

fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

#[rstest]
#[actix_web::test]
async fn full_account_lifecycle(world: World) {
    let app = init_app!(world);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(fredy())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let registered: Value = test::read_body_json(res).await;
    let first_token = registered["jwtToken"].as_str().expect("token").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(json!({ "email": "MERCURY.freddy@mail.com", "password": "somePassword" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let logged_in: Value = test::read_body_json(res).await;
    assert_eq!(logged_in["id"], registered["id"]);
    let token = logged_in["jwtToken"].as_str().expect("token").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/users/me")
            .insert_header(bearer(&first_token))
            .set_json(json!({ "name": "Freddie" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    let me: Value = test::read_body_json(res).await;
    assert_eq!(me["name"], "Freddie");
    assert_eq!(me["email"], "mercury.freddy@mail.com");

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/v1/users/me")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    for stale in [&first_token, &token] {
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users/me")
                .insert_header(bearer(stale))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

#[rstest]
#[actix_web::test]
async fn token_stops_working_after_its_lifetime(world: World) {
    let app = init_app!(world);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(fredy())
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    let token = body["jwtToken"].as_str().expect("token").to_owned();

    world.clock.advance_seconds(DEFAULT_TOKEN_TTL_SECONDS + 1);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn error_bodies_carry_the_response_trace_id(world: World) {
    let app = init_app!(world);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users/login/")
            .set_json(json!({ "email": "nobody@mail.com", "password": "x" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let header = res
        .headers()
        .get("trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["traceId"].as_str(), Some(header.as_str()));
}

#[rstest]
#[actix_web::test]
async fn probes_and_greeting_are_public(world: World) {
    let app = init_app!(world);
    for uri in ["/health/ready", "/health/live", "/"] {
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
    }
}
