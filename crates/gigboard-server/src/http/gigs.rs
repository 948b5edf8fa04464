// SPDX-License-Identifier: Apache-2.0

use super::{current_user, viewer_for, Failure};
use crate::{unix_now, AppState};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use gigboard_api::{
    parse_gig_search, ApiError, GigDetailDto, GigListDto, GigSummaryDto, OwnerDto, TagDto,
};
use gigboard_geo::MapView;
use gigboard_model::{check_text, PostId, TagId, DESCRIPTION_MAX_LEN, POST_TITLE_MAX_LEN};
use gigboard_query::{search_gigs, GigFilter, SearchLimits};
use gigboard_store::{
    create_post, deactivate_expired, get_post, get_user, locations, post_tags,
    posts_for_user, resolve_location_zipcode, update_post, zip_info, zipcodes_for_location,
    zipcodes_for_region, NewPost, PostRecord, PostUpdate,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Gig location exposed on the form as "Remote" resolves to the sentinel
/// zipcode row.
const REMOTE_ZIPCODE: &str = "00000";

#[derive(Debug, Deserialize)]
pub(crate) struct CreateGigRequest {
    post_title: String,
    description: String,
    location: Option<String>,
    unpaid: Option<bool>,
    pay: Option<i64>,
    ishourly: Option<bool>,
    gig_date_start: Option<i64>,
    gig_date_end: Option<i64>,
    tags: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EditGigRequest {
    post_title: Option<String>,
    description: Option<String>,
    location: Option<String>,
    unpaid: Option<bool>,
    pay: Option<i64>,
    ishourly: Option<bool>,
    active: Option<bool>,
    tags: Option<Vec<i64>>,
}

fn summary(post: PostRecord) -> GigSummaryDto {
    GigSummaryDto {
        id: post.id.get(),
        user_id: post.user_id.get(),
        post_title: post.post_title,
        description: post.description,
        creation_date: post.creation_date,
        unpaid: post.unpaid,
        pay: post.pay,
        ishourly: post.ishourly,
        zipcode: post.zipcode,
    }
}

fn resolve_zipcode(
    conn: &rusqlite::Connection,
    location: Option<&str>,
) -> Result<String, Failure> {
    let Some(location) = location.map(str::trim).filter(|l| !l.is_empty()) else {
        return Ok(REMOTE_ZIPCODE.to_owned());
    };
    if location.eq_ignore_ascii_case("remote") {
        return Ok(REMOTE_ZIPCODE.to_owned());
    }
    resolve_location_zipcode(conn, location)?
        .ok_or_else(|| Failure(ApiError::validation_failed("location", "unknown place")))
}

/// Active gigs the viewer may see, newest first. Runs the lazy expiry sweep
/// before reading so day-old listings never show gigs past their grace
/// period.
pub(crate) async fn list_gigs_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Failure> {
    let viewer = viewer_for(&state, &headers).await;
    let conn = state.db.lock().await;
    let swept = deactivate_expired(&conn, unix_now())?;
    if swept > 0 {
        debug!(swept, "expired gigs deactivated");
    }
    let rows = search_gigs(&conn, &viewer, &GigFilter::default(), &SearchLimits::default())?;
    Ok(Json(GigListDto::from_rows(rows)))
}

/// Basic search: text criterion only.
pub(crate) async fn search_gigs_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<impl IntoResponse, Failure> {
    let viewer = viewer_for(&state, &headers).await;
    let filter = GigFilter {
        text: parse_gig_search(&params).text,
        ..GigFilter::default()
    };
    let conn = state.db.lock().await;
    let rows = search_gigs(&conn, &viewer, &filter, &SearchLimits::default())?;
    Ok(Json(GigListDto::from_rows(rows)))
}

/// Advanced search: text, tags, and region criteria conjoined.
pub(crate) async fn advanced_search_gigs_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<impl IntoResponse, Failure> {
    let viewer = viewer_for(&state, &headers).await;
    let filter = parse_gig_search(&params);
    let conn = state.db.lock().await;
    let rows = search_gigs(&conn, &viewer, &filter, &SearchLimits::default())?;
    Ok(Json(GigListDto::from_rows(rows)))
}

pub(crate) async fn create_gig_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateGigRequest>,
) -> Result<impl IntoResponse, Failure> {
    let user = current_user(&state, &headers).await?;
    check_text("post_title", &body.post_title, POST_TITLE_MAX_LEN)?;
    check_text("description", &body.description, DESCRIPTION_MAX_LEN)?;
    let unpaid = body.unpaid.unwrap_or(false);

    let mut conn = state.db.lock().await;
    let zipcode = resolve_zipcode(&conn, body.location.as_deref())?;
    let post = NewPost {
        user_id: user.id,
        post_title: body.post_title.trim().to_owned(),
        description: body.description.trim().to_owned(),
        creation_date: unix_now(),
        gig_date_start: body.gig_date_start,
        gig_date_end: body.gig_date_end,
        unpaid,
        pay: if unpaid { None } else { body.pay },
        ishourly: body.ishourly.unwrap_or(false),
        zipcode,
        tags: body
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(TagId::new)
            .collect(),
    };
    let id = create_post(&mut conn, &post)?;
    let created = get_post(&conn, id)?.ok_or_else(|| Failure(ApiError::not_found("gig")))?;
    info!(gig_id = id.get(), user_id = user.id.get(), "gig created");
    Ok(Json(summary(created)))
}

pub(crate) async fn own_gigs_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Failure> {
    let user = current_user(&state, &headers).await?;
    let conn = state.db.lock().await;
    let posts = posts_for_user(&conn, user.id)?;
    let gigs: Vec<GigSummaryDto> = posts.into_iter().map(summary).collect();
    Ok(Json(json!({"count": gigs.len(), "gigs": gigs})))
}

pub(crate) async fn gig_detail_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, Failure> {
    let viewer = viewer_for(&state, &headers).await;
    let conn = state.db.lock().await;
    let post = get_post(&conn, PostId::new(id))?
        .ok_or_else(|| Failure(ApiError::not_found("gig")))?;
    // Deactivated gigs stay visible to their owner only.
    if !post.active && viewer.user_id != Some(post.user_id) {
        return Err(Failure(ApiError::not_found("gig")));
    }
    let owner = get_user(&conn, post.user_id)?
        .ok_or_else(|| Failure(ApiError::not_found("gig owner")))?;
    let tags = post_tags(&conn, post.id)?;

    let map = if post.zipcode == REMOTE_ZIPCODE {
        MapView::remote()
    } else {
        let (location_zips, region_zips) = match zip_info(&conn, &post.zipcode)? {
            Some((location_name, region)) => (
                zipcodes_for_location(&conn, &location_name)?,
                zipcodes_for_region(&conn, region)?,
            ),
            None => (Vec::new(), Vec::new()),
        };
        state.atlas.map_view(&post.zipcode, &location_zips, &region_zips)
    };

    let detail = GigDetailDto {
        gig: summary(post),
        owner: OwnerDto {
            id: owner.id.get(),
            user_name: owner.user_name,
            display_email: owner.display_email,
            phone: owner.phone,
            link_to_website: owner.link_to_website,
        },
        tags: tags
            .into_iter()
            .map(|t| TagDto {
                id: t.id.get(),
                tag_name: t.tag_name,
            })
            .collect(),
        map: serde_json::to_value(&map).unwrap_or(serde_json::Value::Null),
    };
    Ok(Json(detail))
}

pub(crate) async fn edit_gig_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<EditGigRequest>,
) -> Result<impl IntoResponse, Failure> {
    let user = current_user(&state, &headers).await?;
    if let Some(title) = &body.post_title {
        check_text("post_title", title, POST_TITLE_MAX_LEN)?;
    }
    if let Some(description) = &body.description {
        check_text("description", description, DESCRIPTION_MAX_LEN)?;
    }

    let mut conn = state.db.lock().await;
    let post = get_post(&conn, PostId::new(id))?
        .ok_or_else(|| Failure(ApiError::not_found("gig")))?;
    if post.user_id != user.id {
        return Err(Failure(ApiError::forbidden("not the gig owner")));
    }

    let zipcode = match body.location.as_deref() {
        Some(location) => Some(resolve_zipcode(&conn, Some(location))?),
        None => None,
    };
    let becomes_unpaid = body.unpaid == Some(true);
    let update = PostUpdate {
        post_title: body.post_title.map(|t| t.trim().to_owned()),
        description: body.description.map(|d| d.trim().to_owned()),
        zipcode,
        unpaid: body.unpaid,
        pay: if becomes_unpaid {
            Some(None)
        } else {
            body.pay.map(Some)
        },
        ishourly: body.ishourly,
        active: body.active,
        tags: body
            .tags
            .map(|tags| tags.into_iter().map(TagId::new).collect()),
    };
    update_post(&mut conn, post.id, &update)?;
    let edited = get_post(&conn, post.id)?
        .ok_or_else(|| Failure(ApiError::not_found("gig")))?;
    Ok(Json(summary(edited)))
}

/// Place names for the gig form.
pub(crate) async fn locations_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, Failure> {
    let conn = state.db.lock().await;
    let places = locations(&conn)?;
    Ok(Json(json!({"locations": places})))
}
