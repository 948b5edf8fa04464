// SPDX-License-Identifier: Apache-2.0

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use gigboard_geo::{FeatureCollection, SuburbAtlas};
use gigboard_server::{build_router, AppState, ServerConfig};
use gigboard_store::{create_schema, open_memory, seed_reference_data};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn suburb_fixture() -> FeatureCollection {
    serde_json::from_value(json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"zip": "94110"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [-122.42, 37.74],
                    [-122.40, 37.74],
                    [-122.40, 37.76],
                    [-122.42, 37.76],
                    [-122.42, 37.74]
                ]]
            }
        }]
    }))
    .expect("fixture geojson")
}

fn test_state() -> AppState {
    let mut conn = open_memory().expect("open");
    create_schema(&conn).expect("schema");
    seed_reference_data(&mut conn).expect("seed");
    let mut atlas = SuburbAtlas::empty();
    atlas.add_collection("zip", suburb_fixture());
    let config = ServerConfig {
        session_secret: b"router-test-secret".to_vec(),
        ..ServerConfig::default()
    };
    AppState::new(conn, atlas, config)
}

async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn get_request(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

fn json_request(
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn register(router: &Router, name: &str, email: &str) -> (i64, String) {
    let (status, body) = call(
        router,
        json_request(
            "POST",
            "/v1/accounts/register",
            None,
            json!({"user_name": name, "email": email, "password": "hunter2hunter2"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    (
        body["user_id"].as_i64().expect("user_id"),
        body["token"].as_str().expect("token").to_owned(),
    )
}

async fn veri_code_of(state: &AppState, user_id: i64) -> String {
    let conn = state.db.lock().await;
    conn.query_row(
        "SELECT veri_code FROM users WHERE id = ?1",
        [user_id],
        |r| r.get(0),
    )
    .expect("veri_code")
}

#[tokio::test]
async fn healthz_is_open() {
    let router = build_router(test_state());
    let (status, body) = call(&router, get_request("/healthz", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_login_and_duplicate_conflict() {
    let router = build_router(test_state());
    let (user_id, _token) = register(&router, "ana", "ana@example.com").await;
    assert_eq!(user_id, 1);

    let (status, _) = call(
        &router,
        json_request(
            "POST",
            "/v1/accounts/register",
            None,
            json!({"user_name": "ana", "email": "other@example.com", "password": "hunter2hunter2"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(
        &router,
        json_request(
            "POST",
            "/v1/accounts/login",
            None,
            json!({"email": "ana@example.com", "password": "wrong-password"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Email matching is case-insensitive.
    let (status, body) = call(
        &router,
        json_request(
            "POST",
            "/v1/accounts/login",
            None,
            json!({"email": "ANA@example.com", "password": "hunter2hunter2"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 1);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let router = build_router(test_state());
    for request in [
        get_request("/v1/profile", None),
        get_request("/v1/gigs/mine", None),
        json_request("POST", "/v1/gigs", None, json!({"post_title": "x", "description": "y"})),
    ] {
        let (status, _) = call(&router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, _) = call(&router, get_request("/v1/profile", Some("v1.garbage.token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verification_flow() {
    let state = test_state();
    let router = build_router(state.clone());
    let (user_id, token) = register(&router, "ana", "ana@example.com").await;

    let (status, _) = call(
        &router,
        json_request("POST", "/v1/accounts/verify", Some(&token), json!({"code": "X000000"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let code = veri_code_of(&state, user_id).await;
    let (status, body) = call(
        &router,
        json_request("POST", "/v1/accounts/verify", Some(&token), json!({"code": code})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verified"], true);
}

#[tokio::test]
async fn profile_and_availability_round_trip() {
    let router = build_router(test_state());
    let (_, token) = register(&router, "ana", "ana@example.com").await;

    let (status, body) = call(&router, get_request("/v1/profile", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["daysweek"], "fffffff");
    assert_eq!(body["is_artist"], false);

    let (status, body) = call(
        &router,
        json_request(
            "PUT",
            "/v1/profile",
            Some(&token),
            json!({
                "is_artist": true,
                "bio": "Mural painter",
                "link_to_website": "www.ana.example",
                "tags": [1, 2]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_artist"], true);
    assert_eq!(body["bio"], "Mural painter");
    assert_eq!(body["link_to_website"], "https://www.ana.example");
    assert_eq!(body["tags"].as_array().expect("tags").len(), 2);

    let (status, _) = call(
        &router,
        json_request(
            "PUT",
            "/v1/profile/availability",
            Some(&token),
            json!({"daysweek": "ttx"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = call(
        &router,
        json_request(
            "PUT",
            "/v1/profile/availability",
            Some(&token),
            json!({"daysweek": "tftftff"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["daysweek"], "tftftff");
}

#[tokio::test]
async fn password_change_requires_old_password() {
    let router = build_router(test_state());
    let (_, token) = register(&router, "ana", "ana@example.com").await;

    let (status, _) = call(
        &router,
        json_request(
            "POST",
            "/v1/profile/password",
            Some(&token),
            json!({"old_password": "nope", "new_password": "p4ssw0rdp4ss", "confirm": "p4ssw0rdp4ss"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = call(
        &router,
        json_request(
            "POST",
            "/v1/profile/password",
            Some(&token),
            json!({"old_password": "hunter2hunter2", "new_password": "p4ssw0rdp4ss", "confirm": "p4ssw0rdp4ss"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(
        &router,
        json_request(
            "POST",
            "/v1/accounts/login",
            None,
            json!({"email": "ana@example.com", "password": "p4ssw0rdp4ss"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn gig_lifecycle_and_ownership() {
    let router = build_router(test_state());
    let (_, owner_token) = register(&router, "ana", "ana@example.com").await;
    let (_, other_token) = register(&router, "ben", "ben@example.com").await;

    let (status, created) = call(
        &router,
        json_request(
            "POST",
            "/v1/gigs",
            Some(&owner_token),
            json!({
                "post_title": "Wedding photographer",
                "description": "Full day, candid style",
                "location": "San Francisco",
                "pay": 500,
                "tags": [1]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {created}");
    assert_eq!(created["zipcode"], "94102");
    let gig_id = created["id"].as_i64().expect("gig id");

    let (status, list) = call(&router, get_request("/v1/gigs", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 1);

    let (status, _) = call(
        &router,
        json_request(
            "PUT",
            &format!("/v1/gigs/{gig_id}"),
            Some(&other_token),
            json!({"post_title": "Hijacked"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, edited) = call(
        &router,
        json_request(
            "PUT",
            &format!("/v1/gigs/{gig_id}"),
            Some(&owner_token),
            json!({"post_title": "Event photographer", "unpaid": true}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["post_title"], "Event photographer");
    assert_eq!(edited["unpaid"], true);
    assert_eq!(edited["pay"], Value::Null);

    let (status, mine) = call(&router, get_request("/v1/gigs/mine", Some(&owner_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["count"], 1);

    let (status, _) = call(&router, get_request("/v1/gigs/999", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, created) = call(
        &router,
        json_request(
            "POST",
            "/v1/gigs",
            Some(&owner_token),
            json!({"post_title": "Remote mixing", "description": "Stems provided"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["zipcode"], "00000");
}

#[tokio::test]
async fn unpaid_gigs_honor_viewer_preference() {
    let router = build_router(test_state());
    let (_, owner_token) = register(&router, "ana", "ana@example.com").await;
    let (_, viewer_token) = register(&router, "ben", "ben@example.com").await;

    let (status, _) = call(
        &router,
        json_request(
            "POST",
            "/v1/gigs",
            Some(&owner_token),
            json!({"post_title": "Unpaid collab", "description": "Portfolio builder", "unpaid": true}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = call(&router, get_request("/v1/gigs", None)).await;
    assert_eq!(list["count"], 0);

    let (status, _) = call(
        &router,
        json_request("PUT", "/v1/profile", Some(&viewer_token), json!({"show_unpaid": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = call(&router, get_request("/v1/gigs", Some(&viewer_token))).await;
    assert_eq!(list["count"], 1);
}

#[tokio::test]
async fn gig_detail_carries_owner_tags_and_map() {
    let router = build_router(test_state());
    let (_, token) = register(&router, "ana", "ana@example.com").await;

    // 94110 has a suburb boundary in the fixture atlas; route the gig there
    // by picking the zipcode directly through a location with one zipcode.
    let (status, created) = call(
        &router,
        json_request(
            "POST",
            "/v1/gigs",
            Some(&token),
            json!({
                "post_title": "Gallery install",
                "description": "Two evenings",
                "location": "Daly City",
                "tags": [2, 3]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let gig_id = created["id"].as_i64().expect("gig id");

    let (status, detail) = call(&router, get_request(&format!("/v1/gigs/{gig_id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["owner"]["user_name"], "ana");
    assert_eq!(detail["tags"].as_array().expect("tags").len(), 2);
    // Daly City has no boundary in the fixture, so the map falls back with
    // no features at the wide default zoom.
    assert_eq!(detail["map"]["zoom"], 8);
    assert_eq!(detail["map"]["features"].as_array().expect("features").len(), 0);
}

#[tokio::test]
async fn map_uses_exact_suburb_when_present() {
    let state = test_state();
    let router = build_router(state.clone());
    let (_, token) = register(&router, "ana", "ana@example.com").await;
    let (status, created) = call(
        &router,
        json_request(
            "POST",
            "/v1/gigs",
            Some(&token),
            json!({
                "post_title": "Mission mural",
                "description": "Exterior wall",
                "location": "San Francisco"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let gig_id = created["id"].as_i64().expect("gig id");

    // Force the gig onto the zipcode the fixture atlas knows.
    {
        let conn = state.db.lock().await;
        conn.execute(
            "UPDATE posts SET zipcode = '94110' WHERE id = ?1",
            [gig_id],
        )
        .expect("update zipcode");
    }

    let (status, detail) = call(&router, get_request(&format!("/v1/gigs/{gig_id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["map"]["features"].as_array().expect("features").len(), 1);
    assert_eq!(detail["map"]["center"][0], -122.42);
    // A 0.02 by 0.02 degree suburb sits in the 1.5-10 km^2 bucket.
    assert_eq!(detail["map"]["zoom"], 10);
}

#[tokio::test]
async fn artist_directory_lists_verified_artists_only() {
    let state = test_state();
    let router = build_router(state.clone());
    let (user_id, token) = register(&router, "ana", "ana@example.com").await;

    let (_, list) = call(&router, get_request("/v1/artists", None)).await;
    assert_eq!(list["count"], 0);

    let (status, _) = call(
        &router,
        json_request("PUT", "/v1/profile", Some(&token), json!({"is_artist": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = call(&router, get_request("/v1/artists", None)).await;
    assert_eq!(list["count"], 0, "unverified artists stay hidden");

    let code = veri_code_of(&state, user_id).await;
    let (status, _) = call(
        &router,
        json_request("POST", "/v1/accounts/verify", Some(&token), json!({"code": code})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = call(&router, get_request("/v1/artists", None)).await;
    assert_eq!(list["count"], 1);
    assert_eq!(list["artists"][0]["user_name"], "ana");
}

#[tokio::test]
async fn advanced_search_degrades_malformed_filters() {
    let router = build_router(test_state());
    let (_, token) = register(&router, "ana", "ana@example.com").await;
    let (status, _) = call(
        &router,
        json_request(
            "POST",
            "/v1/gigs",
            Some(&token),
            json!({"post_title": "Oakland shoot", "description": "Street portraits", "location": "Oakland"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Unknown region and junk tags are ignored, not fatal.
    let (status, list) = call(
        &router,
        get_request("/v1/gigs/advanced?region=Atlantis&tags=x,y", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 1);

    let (status, list) = call(
        &router,
        get_request("/v1/gigs/advanced?region=EastBay", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 1);

    let (status, list) = call(
        &router,
        get_request("/v1/gigs/advanced?region=SouthBay", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn tag_admin_is_restricted_to_the_first_account() {
    let router = build_router(test_state());
    let (admin_id, admin_token) = register(&router, "ana", "ana@example.com").await;
    assert_eq!(admin_id, 1);
    let (_, other_token) = register(&router, "ben", "ben@example.com").await;

    let (status, _) = call(
        &router,
        json_request("POST", "/v1/tags", Some(&other_token), json!({"tag_name": "Ceramics"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, tag) = call(
        &router,
        json_request("POST", "/v1/tags", Some(&admin_token), json!({"tag_name": "Ceramics"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let tag_id = tag["id"].as_i64().expect("tag id");

    let (_, tags) = call(&router, get_request("/v1/tags", None)).await;
    assert_eq!(tags["count"], 9);

    let (status, _) = call(
        &router,
        Request::builder()
            .method("DELETE")
            .uri(format!("/v1/tags/{tag_id}"))
            .header(header::AUTHORIZATION, format!("Bearer {admin_token}"))
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, tags) = call(&router, get_request("/v1/tags", None)).await;
    assert_eq!(tags["count"], 8);
}

#[tokio::test]
async fn locations_list_is_public() {
    let router = build_router(test_state());
    let (status, body) = call(&router, get_request("/v1/locations", None)).await;
    assert_eq!(status, StatusCode::OK);
    let places = body["locations"].as_array().expect("locations");
    assert_eq!(places[0], "Remote");
    assert!(places.iter().any(|p| p == "Oakland"));
}
