// SPDX-License-Identifier: Apache-2.0

mod accounts;
mod artists;
mod gigs;
mod tags;

use crate::auth::{decode_session, SessionErrorCode};
use crate::{unix_now, AppState};
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use gigboard_api::{http_status, ApiError};
use gigboard_query::Viewer;
use gigboard_store::{get_user, StoreError, StoreErrorCode, UserRecord};
use serde_json::json;
use tracing::{error, warn};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/v1/accounts/register", post(accounts::register_handler))
        .route("/v1/accounts/login", post(accounts::login_handler))
        .route("/v1/accounts/logout", post(accounts::logout_handler))
        .route("/v1/accounts/verify", post(accounts::verify_handler))
        .route(
            "/v1/profile",
            get(accounts::profile_handler).put(accounts::update_profile_handler),
        )
        .route("/v1/profile/password", post(accounts::change_password_handler))
        .route(
            "/v1/profile/availability",
            get(accounts::availability_handler).put(accounts::set_availability_handler),
        )
        .route("/v1/gigs", get(gigs::list_gigs_handler).post(gigs::create_gig_handler))
        .route("/v1/gigs/search", get(gigs::search_gigs_handler))
        .route("/v1/gigs/advanced", get(gigs::advanced_search_gigs_handler))
        .route("/v1/gigs/mine", get(gigs::own_gigs_handler))
        .route(
            "/v1/gigs/:id",
            get(gigs::gig_detail_handler).put(gigs::edit_gig_handler),
        )
        .route("/v1/artists", get(artists::list_artists_handler))
        .route("/v1/artists/search", get(artists::search_artists_handler))
        .route(
            "/v1/artists/advanced",
            get(artists::advanced_search_artists_handler),
        )
        .route("/v1/tags", get(tags::list_tags_handler).post(tags::add_tag_handler))
        .route("/v1/tags/:id", delete(tags::remove_tag_handler))
        .route("/v1/locations", get(gigs::locations_handler))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}

async fn healthz_handler() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Error half of every handler: an API envelope plus its HTTP status.
#[derive(Debug)]
pub(crate) struct Failure(pub ApiError);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(http_status(self.0.code))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0)).into_response()
    }
}

impl From<ApiError> for Failure {
    fn from(value: ApiError) -> Self {
        Self(value)
    }
}

impl From<StoreError> for Failure {
    fn from(value: StoreError) -> Self {
        match value.code {
            StoreErrorCode::NotFound => Self(ApiError::not_found("resource")),
            StoreErrorCode::Conflict => Self(ApiError::conflict(value.message)),
            _ => {
                error!(error = %value, "store failure");
                Self(ApiError::internal())
            }
        }
    }
}

impl From<gigboard_query::QueryError> for Failure {
    fn from(value: gigboard_query::QueryError) -> Self {
        match value.code {
            gigboard_query::QueryErrorCode::Validation => {
                Self(ApiError::validation_failed("filter", &value.message))
            }
            _ => {
                error!(error = %value, "search failure");
                Self(ApiError::internal())
            }
        }
    }
}

impl From<gigboard_model::ParseError> for Failure {
    fn from(value: gigboard_model::ParseError) -> Self {
        Self(ApiError::validation_failed("input", &value.to_string()))
    }
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// The authenticated account, or an unauthorized failure.
pub(crate) async fn current_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<UserRecord, Failure> {
    let token = bearer_token(headers).ok_or_else(|| Failure(ApiError::unauthorized()))?;
    let session = decode_session(
        token,
        &state.config.session_secret,
        unix_now(),
        state.config.session_max_age_secs,
    )
    .map_err(|e| {
        if e.code != SessionErrorCode::Expired {
            warn!(error = %e, "rejected session token");
        }
        Failure(ApiError::unauthorized())
    })?;
    let conn = state.db.lock().await;
    get_user(&conn, gigboard_model::UserId::new(session.user_id))?
        .ok_or_else(|| Failure(ApiError::unauthorized()))
}

/// Viewer context for search endpoints: logged-in when a valid token is
/// presented, anonymous otherwise. A bad token downgrades rather than
/// failing, matching the degrade rule for malformed filter input.
pub(crate) async fn viewer_for(state: &AppState, headers: &HeaderMap) -> Viewer {
    match current_user(state, headers).await {
        Ok(user) => Viewer::logged_in(user.id, user.show_unpaid),
        Err(_) => Viewer::anonymous(),
    }
}
