/// Authentication handlers
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AuthError, Result},
    models::{Session, SignInRequest, SignOutRequest, SignUpRequest},
    AppState,
};

/// Unwrap and validate a JSON body before anything else happens
fn validated<T: Validate>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    let Json(body) = payload.map_err(|e| AuthError::Validation(e.body_text()))?;
    body.validate()?;
    Ok(body)
}

/// POST /auth/signUp
pub async fn sign_up(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<Json<Session>> {
    let request = validated(payload)?;

    let session = state
        .auth
        .sign_up(&request.credentials(), &request.name)
        .await?;

    Ok(Json(session))
}

/// POST /auth/signIn
pub async fn sign_in(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<Session>> {
    let request = validated(payload)?;

    let session = state.auth.sign_in(&request.credentials()).await?;

    Ok(Json(session))
}

/// POST /auth/signOut
pub async fn sign_out(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignOutRequest>, JsonRejection>,
) -> Result<StatusCode> {
    let request = validated(payload)?;

    state.auth.sign_out(&request.jwt).await?;

    Ok(StatusCode::NO_CONTENT)
}
