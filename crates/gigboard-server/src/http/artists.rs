// SPDX-License-Identifier: Apache-2.0

use super::Failure;
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use gigboard_api::{parse_artist_search, ArtistListDto};
use gigboard_query::{search_artists, ArtistFilter, SearchLimits};
use std::collections::BTreeMap;

/// Verified artists, most recently active first.
pub(crate) async fn list_artists_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, Failure> {
    let conn = state.db.lock().await;
    let rows = search_artists(&conn, &ArtistFilter::default(), &SearchLimits::default())?;
    Ok(Json(ArtistListDto::from_rows(rows)))
}

/// Basic search: text criterion only.
pub(crate) async fn search_artists_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<impl IntoResponse, Failure> {
    let filter = ArtistFilter {
        text: parse_artist_search(&params).text,
        ..ArtistFilter::default()
    };
    let conn = state.db.lock().await;
    let rows = search_artists(&conn, &filter, &SearchLimits::default())?;
    Ok(Json(ArtistListDto::from_rows(rows)))
}

/// Advanced search: text, tags, and availability-day criteria conjoined.
pub(crate) async fn advanced_search_artists_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<impl IntoResponse, Failure> {
    let filter = parse_artist_search(&params);
    let conn = state.db.lock().await;
    let rows = search_artists(&conn, &filter, &SearchLimits::default())?;
    Ok(Json(ArtistListDto::from_rows(rows)))
}
