//! REST handlers.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use api_shared::{
    CapabilityDecision, CheckCapabilitiesReq, CheckCapabilitiesRes, HealthRes, HealthService,
    ListRolesRes, RoleRes, SignInReq, SignInRes, SignOutRes, SubjectRes,
};
use axum::{
    extract::{Path as AxumPath, State},
    http::HeaderMap,
    response::Json,
};
use hms_core::{vocabulary, AccessError, CapabilitySet, Subject};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the HMS REST API service.
/// This endpoint is used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/auth/sign-in",
    request_body = SignInReq,
    responses(
        (status = 200, description = "Session opened", body = SignInRes),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "Internal server error")
    )
)]
/// Open a session for a staff member
///
/// Checks the credentials against the staff directory and returns a bearer token whose session
/// carries the account's effective capabilities.
///
/// # Errors
/// Returns `401 Unauthorized` for an unknown email or a wrong secret. The response does not say
/// which.
#[axum::debug_handler]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInReq>,
) -> ApiResult<Json<SignInRes>> {
    match state.sessions.open(&req.email, &req.secret) {
        Ok(opened) => Ok(Json(SignInRes {
            token: opened.token,
            opened_at: opened.opened_at.to_rfc3339(),
            expires_at: opened.expires_at.to_rfc3339(),
            subject: subject_res(&opened.subject),
        })),
        Err(AccessError::AuthenticationFailed) => {
            Err(ApiError::Unauthorized("Invalid email or password"))
        }
        Err(e) => {
            tracing::error!("Sign-in error: {:?}", e);
            Err(ApiError::Internal)
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/sign-out",
    responses(
        (status = 200, description = "Session closed (or there was none)", body = SignOutRes)
    )
)]
/// Close the caller's session
///
/// Idempotent: a missing or already-closed token still succeeds.
#[axum::debug_handler]
pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> Json<SignOutRes> {
    if let Some(token) = state.token(&headers) {
        state.sessions.close(token);
    }
    Json(SignOutRes { success: true })
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current subject", body = SubjectRes),
        (status = 401, description = "No session")
    )
)]
/// Return the subject behind the bearer token
#[axum::debug_handler]
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<SubjectRes>> {
    let subject = state.subject(&headers)?;
    Ok(Json(subject_res(&subject)))
}

#[utoipa::path(
    post,
    path = "/auth/check",
    request_body = CheckCapabilitiesReq,
    responses(
        (status = 200, description = "Per-capability decisions", body = CheckCapabilitiesRes)
    )
)]
/// Evaluate capabilities for the caller
///
/// Never fails: without a session, or for an unknown token, every capability is denied.
/// `granted` is `true` if at least one requested capability is granted, and `false` for an empty
/// request.
pub async fn check(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CheckCapabilitiesReq>,
) -> Json<CheckCapabilitiesRes> {
    let subject = state
        .token(&headers)
        .and_then(|token| state.sessions.subject(token));
    let subject = subject.as_ref();

    let decisions = req
        .capabilities
        .iter()
        .map(|capability| CapabilityDecision {
            capability: capability.clone(),
            granted: hms_core::has_capability(subject, capability),
        })
        .collect();

    Json(CheckCapabilitiesRes {
        granted: hms_core::has_any_capability(subject, &req.capabilities),
        decisions,
    })
}

#[utoipa::path(
    get,
    path = "/roles",
    responses(
        (status = 200, description = "Every role and its grants", body = ListRolesRes),
        (status = 401, description = "No session"),
        (status = 403, description = "Missing users:read")
    )
)]
/// List the role registry
///
/// Requires `users:read`.
#[axum::debug_handler]
pub async fn list_roles(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ListRolesRes>> {
    state.authorise(&headers, vocabulary::USERS_READ)?;

    let registry = state.sessions.access().registry();
    let roles = registry
        .iter()
        .map(|(role, grants)| role_res(role.as_str(), grants))
        .collect();

    Ok(Json(ListRolesRes {
        version: registry.version(),
        roles,
    }))
}

#[utoipa::path(
    get,
    path = "/roles/{role}",
    params(("role" = String, Path, description = "Role identifier")),
    responses(
        (status = 200, description = "Grants of one role; empty for unknown roles", body = RoleRes),
        (status = 401, description = "No session"),
        (status = 403, description = "Missing users:read")
    )
)]
/// Show the grants of a single role
///
/// Requires `users:read`. Unknown roles return an empty list rather than `404`.
#[axum::debug_handler]
pub async fn get_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(role): AxumPath<String>,
) -> ApiResult<Json<RoleRes>> {
    state.authorise(&headers, vocabulary::USERS_READ)?;

    let grants = state
        .sessions
        .access()
        .registry()
        .capabilities_for_role(&role);
    Ok(Json(role_res(&role, &grants)))
}

fn subject_res(subject: &Subject) -> SubjectRes {
    SubjectRes {
        id: subject.id.to_string(),
        display_name: subject.display_name.to_string(),
        email: subject.email.to_string(),
        role: subject.role.to_string(),
        department: subject.department.clone(),
        avatar: subject.avatar.clone(),
        capabilities: subject.effective_capabilities.to_strings(),
    }
}

fn role_res(role: &str, grants: &CapabilitySet) -> RoleRes {
    RoleRes {
        role: role.to_string(),
        capabilities: grants.to_strings(),
    }
}
