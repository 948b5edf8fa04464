// SPDX-License-Identifier: Apache-2.0

use super::{current_user, Failure};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use gigboard_api::{ApiError, TagDto};
use gigboard_model::{check_text, TagId, TAG_NAME_MAX_LEN};
use gigboard_store::{add_tag, list_tags, remove_tag};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct AddTagRequest {
    tag_name: String,
}

async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), Failure> {
    let user = current_user(state, headers).await?;
    if !user.id.is_admin() {
        return Err(Failure(ApiError::forbidden("tag administration is admin-only")));
    }
    Ok(())
}

/// The whole skill vocabulary, sorted by name. Feeds the search and profile
/// forms.
pub(crate) async fn list_tags_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, Failure> {
    let conn = state.db.lock().await;
    let tags: Vec<TagDto> = list_tags(&conn)?
        .into_iter()
        .map(|t| TagDto {
            id: t.id.get(),
            tag_name: t.tag_name,
        })
        .collect();
    Ok(Json(json!({"count": tags.len(), "tags": tags})))
}

pub(crate) async fn add_tag_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AddTagRequest>,
) -> Result<impl IntoResponse, Failure> {
    require_admin(&state, &headers).await?;
    check_text("tag_name", &body.tag_name, TAG_NAME_MAX_LEN)?;
    let conn = state.db.lock().await;
    let id = add_tag(&conn, &body.tag_name)?;
    info!(tag_id = id.get(), "tag added");
    Ok(Json(TagDto {
        id: id.get(),
        tag_name: body.tag_name.trim().to_owned(),
    }))
}

pub(crate) async fn remove_tag_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, Failure> {
    require_admin(&state, &headers).await?;
    let mut conn = state.db.lock().await;
    remove_tag(&mut conn, TagId::new(id))?;
    info!(tag_id = id, "tag removed");
    Ok(Json(json!({"removed": id})))
}
