// SPDX-License-Identifier: Apache-2.0

use super::{current_user, Failure};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::{encode_session, verification_code, SessionPayload};
use crate::{unix_now, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use gigboard_api::{ApiError, ProfileDto, SessionDto, TagDto};
use gigboard_model::{
    check_text, normalize_website_link, DaysWeek, TagId, BIO_MAX_LEN, EMAIL_MAX_LEN,
    USER_NAME_MAX_LEN,
};
use gigboard_store::{
    create_user, find_user_by_email, set_availability, set_password_hash, touch_last_active,
    update_profile, user_tags, verify_user, NewUser, ProfileUpdate, TagRecord, UserRecord,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

const PASSWORD_MIN_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    user_name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyRequest {
    code: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateProfileRequest {
    is_artist: Option<bool>,
    show_unpaid: Option<bool>,
    bio: Option<String>,
    phone: Option<String>,
    link_to_website: Option<String>,
    hourly_rate: Option<i64>,
    tags: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChangePasswordRequest {
    old_password: String,
    new_password: String,
    confirm: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AvailabilityRequest {
    daysweek: String,
}

fn check_password(password: &str) -> Result<(), Failure> {
    if password.len() < PASSWORD_MIN_LEN {
        return Err(Failure(ApiError::validation_failed(
            "password",
            "too short",
        )));
    }
    Ok(())
}

fn session_for(user_id: i64, secret: &[u8]) -> Result<SessionDto, Failure> {
    let token = encode_session(&SessionPayload::new(user_id, unix_now()), secret).map_err(|e| {
        error!(error = %e, "session encoding failed");
        Failure(ApiError::internal())
    })?;
    Ok(SessionDto { token, user_id })
}

fn invalid_credentials() -> Failure {
    Failure(ApiError::new(
        gigboard_api::ApiErrorCode::Unauthorized,
        "invalid credentials",
        serde_json::Value::Null,
    ))
}

pub(crate) async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, Failure> {
    check_text("user_name", &body.user_name, USER_NAME_MAX_LEN)?;
    check_text("email", &body.email, EMAIL_MAX_LEN)?;
    if !body.email.contains('@') {
        return Err(Failure(ApiError::validation_failed("email", "not an email address")));
    }
    check_password(&body.password)?;

    let password_hash = hash_password(&body.password).map_err(|e| {
        error!(error = %e, "password hashing failed");
        Failure(ApiError::internal())
    })?;
    let user = NewUser {
        user_name: body.user_name.trim().to_owned(),
        email: body.email.trim().to_owned(),
        display_email: body.email.trim().to_owned(),
        password_hash,
        veri_code: verification_code(),
        last_active: unix_now(),
    };

    let conn = state.db.lock().await;
    let id = create_user(&conn, &user)?;
    drop(conn);
    info!(user_id = id.get(), "account registered");
    session_for(id.get(), &state.config.session_secret).map(Json)
}

pub(crate) async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, Failure> {
    let conn = state.db.lock().await;
    let user = find_user_by_email(&conn, &body.email)?.ok_or_else(invalid_credentials)?;
    if !verify_password(&body.password, &user.password_hash) {
        return Err(invalid_credentials());
    }
    touch_last_active(&conn, user.id, unix_now())?;
    drop(conn);
    session_for(user.id.get(), &state.config.session_secret).map(Json)
}

/// Sessions are stateless; the client discards its token. The endpoint
/// exists so clients have a single logout call to make.
pub(crate) async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Failure> {
    let _ = current_user(&state, &headers).await?;
    Ok(Json(json!({"status": "logged_out"})))
}

pub(crate) async fn verify_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<VerifyRequest>,
) -> Result<impl IntoResponse, Failure> {
    let user = current_user(&state, &headers).await?;
    let conn = state.db.lock().await;
    if !verify_user(&conn, user.id, body.code.trim())? {
        return Err(Failure(ApiError::validation_failed("code", "mismatch")));
    }
    info!(user_id = user.id.get(), "account verified");
    Ok(Json(json!({"verified": true})))
}

fn profile_dto(user: UserRecord, tags: Vec<TagRecord>) -> ProfileDto {
    ProfileDto {
        id: user.id.get(),
        user_name: user.user_name,
        display_email: user.display_email,
        is_artist: user.is_artist,
        verified: user.verified,
        show_unpaid: user.show_unpaid,
        last_active: user.last_active,
        hourly_rate: user.hourly_rate,
        link_to_website: user.link_to_website,
        bio: user.bio,
        phone: user.phone,
        daysweek: user.daysweek,
        tags: tags
            .into_iter()
            .map(|t| TagDto {
                id: t.id.get(),
                tag_name: t.tag_name,
            })
            .collect(),
    }
}

pub(crate) async fn profile_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Failure> {
    let user = current_user(&state, &headers).await?;
    let conn = state.db.lock().await;
    let tags = user_tags(&conn, user.id)?;
    Ok(Json(profile_dto(user, tags)))
}

pub(crate) async fn update_profile_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, Failure> {
    let user = current_user(&state, &headers).await?;
    if let Some(bio) = &body.bio {
        if bio.len() > BIO_MAX_LEN {
            return Err(Failure(ApiError::validation_failed("bio", "too long")));
        }
    }
    let update = ProfileUpdate {
        is_artist: body.is_artist,
        show_unpaid: body.show_unpaid,
        bio: body.bio,
        phone: body.phone,
        link_to_website: body
            .link_to_website
            .as_deref()
            .map(normalize_website_link),
        hourly_rate: body.hourly_rate,
        tags: body
            .tags
            .map(|tags| tags.into_iter().map(TagId::new).collect()),
    };

    let mut conn = state.db.lock().await;
    update_profile(&mut conn, user.id, &update)?;
    let refreshed = gigboard_store::get_user(&conn, user.id)?
        .ok_or_else(|| Failure(ApiError::not_found("user")))?;
    let tags = user_tags(&conn, user.id)?;
    Ok(Json(profile_dto(refreshed, tags)))
}

pub(crate) async fn change_password_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, Failure> {
    let user = current_user(&state, &headers).await?;
    if !verify_password(&body.old_password, &user.password_hash) {
        return Err(Failure(ApiError::validation_failed(
            "old_password",
            "mismatch",
        )));
    }
    if body.new_password != body.confirm {
        return Err(Failure(ApiError::validation_failed(
            "confirm",
            "passwords do not match",
        )));
    }
    check_password(&body.new_password)?;
    let hash = hash_password(&body.new_password).map_err(|e| {
        error!(error = %e, "password hashing failed");
        Failure(ApiError::internal())
    })?;
    let conn = state.db.lock().await;
    set_password_hash(&conn, user.id, &hash)?;
    Ok(Json(json!({"status": "password_changed"})))
}

pub(crate) async fn availability_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Failure> {
    let user = current_user(&state, &headers).await?;
    Ok(Json(json!({"daysweek": user.daysweek})))
}

pub(crate) async fn set_availability_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AvailabilityRequest>,
) -> Result<impl IntoResponse, Failure> {
    let user = current_user(&state, &headers).await?;
    let days = DaysWeek::parse(&body.daysweek)?;
    let conn = state.db.lock().await;
    set_availability(&conn, user.id, &days)?;
    Ok(Json(json!({"daysweek": days.as_str()})))
}
