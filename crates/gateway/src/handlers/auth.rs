//! Session login handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{MessageResponse, STATUS_SUCCESS};
use crate::AppState;
use blogforge_common::{
    auth::{hash_password, verify_password, CurrentUser},
    db::Repository,
    errors::{AppError, Result},
};

/// Username and password
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: CurrentUser,
}

fn with_session(
    state: &AppState,
    status: StatusCode,
    user: CurrentUser,
    message: &str,
) -> Result<Response> {
    let token = state.sessions.issue_token(&user)?;
    let cookie = state.sessions.session_cookie(&token);

    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse {
            status: STATUS_SUCCESS,
            message: Some(message.to_string()),
            user,
        }),
    )
        .into_response())
}

/// Create an account and log it in
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let password_hash = hash_password(&request.password)?;
    let repo = Repository::new(state.db.clone());
    let user = repo.create_user(request.username, password_hash).await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    with_session(&state, StatusCode::CREATED, CurrentUser::from(&user), "Account created")
}

/// Start a session for valid credentials
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;
    let repo = Repository::new(state.db.clone());

    let user = repo
        .find_user_by_username(&request.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&request.password, &user.password_hash)? {
        tracing::warn!(username = %request.username, "Failed login");
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(user_id = user.id, "User logged in");

    with_session(&state, StatusCode::OK, CurrentUser::from(&user), "Logged in")
}

/// End the session
pub async fn logout(State(state): State<AppState>) -> Response {
    (
        [(header::SET_COOKIE, state.sessions.clear_cookie())],
        Json(MessageResponse::success("Logged out")),
    )
        .into_response()
}

/// The user behind the current session
pub async fn me(user: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse {
        status: STATUS_SUCCESS,
        message: None,
        user,
    })
}
