/// Integration tests for playlists, tracks and the activity feed

mod common;

use axum::http::StatusCode;
use common::{TestContext, TestUser};
use serde_json::json;

async fn create_playlist(ctx: &TestContext, user: &TestUser, name: &str, public: bool) -> String {
    let response = ctx
        .post(
            "/api/music/playlists",
            user,
            json!({ "name": name, "isPublic": public }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    response.body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_track(ctx: &TestContext, user: &TestUser, title: &str) -> String {
    let response = ctx
        .post(
            "/api/music/tracks",
            user,
            json!({ "title": title, "artist": "The Band", "duration": 215 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    response.body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_playlist_without_name_rejected() {
    let ctx = TestContext::new();
    let user = ctx.register("listener").await;

    let response = ctx
        .post("/api/music/playlists", &user, json!({ "description": "no name" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Playlist name is required");

    let listed = ctx.get("/api/music/playlists", &user).await;
    assert!(listed.body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_playlist_defaults_and_listing() {
    let ctx = TestContext::new();
    let user = ctx.register("listener").await;
    let other = ctx.register("other").await;

    let created = ctx
        .post("/api/music/playlists", &user, json!({ "name": "Focus" }))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["description"], "");
    assert_eq!(created.body["data"]["is_public"], false);
    assert_eq!(created.body["data"]["user_id"], user.id.to_string());

    create_playlist(&ctx, &other, "Not yours", true).await;

    let mine = ctx.get("/api/music/playlists", &user).await;
    let mine = mine.body["data"].as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["name"], "Focus");
}

#[tokio::test]
async fn test_other_users_playlist_is_not_found() {
    let ctx = TestContext::new();
    let owner = ctx.register("owner").await;
    let intruder = ctx.register("intruder").await;

    let id = create_playlist(&ctx, &owner, "Private mix", false).await;
    let uri = format!("/api/music/playlists/{}", id);

    let update = ctx.put(&uri, &intruder, json!({ "name": "Hijacked" })).await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);
    assert!(update.body.get("data").is_none());

    let delete = ctx.delete(&uri, &intruder).await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);

    let read = ctx.get(&uri, &intruder).await;
    assert_eq!(read.status, StatusCode::NOT_FOUND);

    let still_there = ctx.get(&uri, &owner).await;
    assert_eq!(still_there.status, StatusCode::OK);
    assert_eq!(still_there.body["data"]["name"], "Private mix");
}

#[tokio::test]
async fn test_owner_updates_and_deletes_playlist() {
    let ctx = TestContext::new();
    let owner = ctx.register("owner").await;

    let id = create_playlist(&ctx, &owner, "Draft", false).await;
    let uri = format!("/api/music/playlists/{}", id);

    let empty_name = ctx.put(&uri, &owner, json!({ "name": "" })).await;
    assert_eq!(empty_name.status, StatusCode::BAD_REQUEST);

    let updated = ctx
        .put(&uri, &owner, json!({ "isPublic": true, "description": "Ready" }))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["name"], "Draft");
    assert_eq!(updated.body["data"]["is_public"], true);
    assert_eq!(updated.body["data"]["description"], "Ready");

    let deleted = ctx.delete(&uri, &owner).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["success"], true);
    assert!(deleted.body["message"].is_string());

    let gone = ctx.delete(&uri, &owner).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_playlist_with_tracks() {
    let ctx = TestContext::new();
    let owner = ctx.register("owner").await;
    let guest = ctx.register("guest").await;

    let playlist = create_playlist(&ctx, &owner, "Shared", true).await;
    let first = create_track(&ctx, &owner, "Opening").await;
    let second = create_track(&ctx, &guest, "Closing").await;
    let tracks_uri = format!("/api/music/playlists/{}/tracks", playlist);

    let added = ctx
        .post(&tracks_uri, &owner, json!({ "trackId": first }))
        .await;
    assert_eq!(added.status, StatusCode::CREATED);
    assert_eq!(added.body["data"]["position"], 0);

    let added = ctx
        .post(&tracks_uri, &owner, json!({ "trackId": second }))
        .await;
    assert_eq!(added.body["data"]["position"], 1);

    let duplicate = ctx
        .post(&tracks_uri, &owner, json!({ "trackId": first }))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let not_owner = ctx
        .post(&tracks_uri, &guest, json!({ "trackId": first }))
        .await;
    assert_eq!(not_owner.status, StatusCode::NOT_FOUND);

    let view = ctx
        .get(&format!("/api/music/playlists/{}", playlist), &guest)
        .await;
    assert_eq!(view.status, StatusCode::OK);

    let titles: Vec<&str> = view.body["data"]["tracks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["track"]["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Opening", "Closing"]);
}

#[tokio::test]
async fn test_track_validation_and_limit() {
    let ctx = TestContext::new();
    let user = ctx.register("uploader").await;

    let no_duration = ctx
        .post(
            "/api/music/tracks",
            &user,
            json!({ "title": "Song", "artist": "Singer" }),
        )
        .await;
    assert_eq!(no_duration.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_duration.body["error"], "Duration is required");

    let zero = ctx
        .post(
            "/api/music/tracks",
            &user,
            json!({ "title": "Song", "artist": "Singer", "duration": 0 }),
        )
        .await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);

    for i in 0..3 {
        create_track(&ctx, &user, &format!("Track {}", i)).await;
    }

    let limited = ctx.get("/api/music/tracks?limit=2", &user).await;
    let limited = limited.body["data"].as_array().unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0]["title"], "Track 2");

    let clamped = ctx.get("/api/music/tracks?limit=0", &user).await;
    assert_eq!(clamped.body["data"].as_array().unwrap().len(), 1);

    let bad = ctx.get("/api/music/tracks?limit=lots", &user).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_activity_feed() {
    let ctx = TestContext::new();
    let user = ctx.register("poster").await;

    let invalid = ctx
        .post("/api/activities", &user, json!({ "activityType": "post" }))
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.body["error"], "Message is required");

    for i in 0..12 {
        let created = ctx
            .post(
                "/api/activities",
                &user,
                json!({ "activityType": "post", "message": format!("update {}", i) }),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED);
    }

    let all = ctx.get("/api/activities", &user).await;
    let all = all.body["data"].as_array().unwrap();
    assert_eq!(all.len(), 12);
    assert_eq!(all[0]["message"], "update 11");
    assert_eq!(all[0]["user"]["username"], "poster");

    let recent = ctx.get("/api/activities/recent", &user).await;
    assert_eq!(recent.body["data"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_create_track_rejects_overlong_fields() {
    let ctx = TestContext::new();
    let user = ctx.register("listener").await;

    let response = ctx
        .post(
            "/api/music/tracks",
            &user,
            json!({
                "title": "t".repeat(201),
                "artist": "Artist",
                "duration": 240,
                "coverUrl": format!("https://cdn.example.com/{}", "a".repeat(512)),
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let fields: Vec<&str> = response.body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["coverUrl", "title"]);
}
