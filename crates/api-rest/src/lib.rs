//! # API REST
//!
//! REST API for HMS access control.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - Bearer-token sessions and server-side capability checks
//!
//! Uses `api-shared` for wire types and `hms-core` for every access decision.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use routes::*;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(health, sign_in, sign_out, me, check, list_roles, get_role),
    components(schemas(
        api_shared::HealthRes,
        api_shared::SignInReq,
        api_shared::SignInRes,
        api_shared::SignOutRes,
        api_shared::SubjectRes,
        api_shared::CheckCapabilitiesReq,
        api_shared::CheckCapabilitiesRes,
        api_shared::CapabilityDecision,
        api_shared::RoleRes,
        api_shared::ListRolesRes,
        api_shared::ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/sign-out", post(sign_out))
        .route("/auth/me", get(me))
        .route("/auth/check", post(check))
        .route("/roles", get(list_roles))
        .route("/roles/:role", get(get_role))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::Duration;
    use http_body_util::BodyExt;
    use hms_core::{AccessControl, SessionTable};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<SessionTable>) {
        app_with_ttl(Duration::try_hours(8).unwrap())
    }

    fn app_with_ttl(ttl: Duration) -> (Router, Arc<SessionTable>) {
        let access = Arc::new(AccessControl::demo().expect("demo access control"));
        let sessions = Arc::new(SessionTable::new(access, ttl));
        (router(AppState::new(sessions.clone())), sessions)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_with(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn sign_in_as(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            post_json(
                "/auth/sign-in",
                None,
                json!({ "email": email, "secret": "password" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_reports_alive() {
        let (app, _) = app();
        let (status, body) = send(&app, get_with("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn sign_in_returns_token_and_subject() {
        let (app, sessions) = app();
        let (status, body) = send(
            &app,
            post_json(
                "/auth/sign-in",
                None,
                json!({ "email": "admin@hospital.com", "secret": "password" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["subject"]["role"], "admin");
        assert_eq!(body["subject"]["email"], "admin@hospital.com");
        let timestamp = |field: &str| {
            chrono::DateTime::parse_from_rfc3339(body[field].as_str().unwrap()).unwrap()
        };
        assert_eq!(
            timestamp("expires_at") - timestamp("opened_at"),
            Duration::try_hours(8).unwrap()
        );
        assert!(body["subject"]["capabilities"]
            .as_array()
            .unwrap()
            .contains(&json!("*")));
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test]
    async fn wrong_secret_and_unknown_email_look_the_same() {
        let (app, sessions) = app();
        let (wrong_status, wrong_body) = send(
            &app,
            post_json(
                "/auth/sign-in",
                None,
                json!({ "email": "admin@hospital.com", "secret": "wrong" }),
            ),
        )
        .await;
        let (unknown_status, unknown_body) = send(
            &app,
            post_json(
                "/auth/sign-in",
                None,
                json!({ "email": "nobody@hospital.com", "secret": "password" }),
            ),
        )
        .await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_body, unknown_body);
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn sign_in_email_must_match_exactly() {
        let (app, sessions) = app();
        for email in ["Admin@Hospital.com", "  ADMIN@Hospital.COM ", "admin@hospital.com "] {
            let (status, _) = send(
                &app,
                post_json(
                    "/auth/sign-in",
                    None,
                    json!({ "email": email, "secret": "password" }),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{email:?}");
        }
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn me_requires_an_open_session() {
        let (app, _) = app();
        let (status, _) = send(&app, get_with("/auth/me", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, get_with("/auth/me", Some("not-a-token"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let token = sign_in_as(&app, "nurse@hospital.com").await;
        let (status, body) = send(&app, get_with("/auth/me", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "nurse");
    }

    #[tokio::test]
    async fn expired_session_is_rejected() {
        let (app, sessions) = app_with_ttl(Duration::zero());
        let token = sign_in_as(&app, "admin@hospital.com").await;

        let (status, body) = send(&app, get_with("/auth/me", Some(&token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unknown or expired session");
        assert!(sessions.is_empty());

        let (status, _) = send(&app, get_with("/roles", Some(&token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn check_reports_per_capability_decisions() {
        let (app, _) = app();
        let token = sign_in_as(&app, "reception@hospital.com").await;

        let (status, body) = send(
            &app,
            post_json(
                "/auth/check",
                Some(&token),
                json!({ "capabilities": ["billing:create", "laboratory:create"] }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["granted"], true);
        assert_eq!(body["decisions"][0]["granted"], true);
        assert_eq!(body["decisions"][1]["granted"], false);
    }

    #[tokio::test]
    async fn check_without_session_denies_everything() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            post_json(
                "/auth/check",
                None,
                json!({ "capabilities": ["dashboard:view", "*"] }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["granted"], false);
        assert!(body["decisions"]
            .as_array()
            .unwrap()
            .iter()
            .all(|decision| decision["granted"] == false));
    }

    #[tokio::test]
    async fn check_with_empty_list_is_not_granted_even_for_admin() {
        let (app, _) = app();
        let token = sign_in_as(&app, "admin@hospital.com").await;
        let (_, body) = send(
            &app,
            post_json("/auth/check", Some(&token), json!({ "capabilities": [] })),
        )
        .await;
        assert_eq!(body["granted"], false);
    }

    #[tokio::test]
    async fn roles_are_guarded_by_users_read() {
        let (app, _) = app();
        let (status, _) = send(&app, get_with("/roles", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let nurse = sign_in_as(&app, "nurse@hospital.com").await;
        let (status, body) = send(&app, get_with("/roles", Some(&nurse))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Missing capability: users:read");

        let admin = sign_in_as(&app, "admin@hospital.com").await;
        let (status, body) = send(&app, get_with("/roles", Some(&admin))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], 1);
        assert_eq!(body["roles"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn unknown_role_has_no_grants() {
        let (app, _) = app();
        let admin = sign_in_as(&app, "admin@hospital.com").await;

        let (status, body) = send(&app, get_with("/roles/janitor", Some(&admin))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["capabilities"], json!([]));

        let (_, body) = send(&app, get_with("/roles/pharmacist", Some(&admin))).await;
        assert!(body["capabilities"]
            .as_array()
            .unwrap()
            .contains(&json!("pharmacy:update")));
    }

    #[tokio::test]
    async fn sign_out_is_idempotent() {
        let (app, sessions) = app();
        let token = sign_in_as(&app, "doctor@hospital.com").await;

        for _ in 0..2 {
            let (status, body) =
                send(&app, post_json("/auth/sign-out", Some(&token), json!({}))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
        }
        assert!(sessions.is_empty());

        let (status, _) = send(&app, get_with("/auth/me", Some(&token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
