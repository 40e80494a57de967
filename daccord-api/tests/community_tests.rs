/// Integration tests for communities and memberships

mod common;

use axum::http::StatusCode;
use common::TestContext;
use daccord_shared::models::{CommunityRole, CreateCommunityMember};
use daccord_shared::store::Store;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_create_and_fetch_community() {
    let ctx = TestContext::new();
    let user = ctx.register("founder").await;

    let id = ctx.create_community(&user, "Synthwave", "music").await;

    let fetched = ctx.get(&format!("/api/communities/{}", id), &user).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["name"], "Synthwave");
    assert_eq!(fetched.body["data"]["member_count"], 0);
    assert_eq!(fetched.body["data"]["is_featured"], false);

    let missing = ctx
        .get(&format!("/api/communities/{}", Uuid::new_v4()), &user)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let bad_id = ctx.get("/api/communities/not-a-uuid", &user).await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.body["success"], false);
}

#[tokio::test]
async fn test_create_community_requires_fields() {
    let ctx = TestContext::new();
    let user = ctx.register("founder").await;

    let response = ctx
        .post(
            "/api/communities",
            &user,
            json!({ "name": "   ", "category": "music" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"].as_array().unwrap().len(), 2);
    assert_eq!(response.body["error"], "Description is required");
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let ctx = TestContext::new();
    let user = ctx.register("founder").await;

    ctx.create_community(&user, "First", "games").await;
    ctx.create_community(&user, "Second", "games").await;

    let response = ctx.get("/api/communities", &user).await;
    assert_eq!(response.status, StatusCode::OK);

    let names: Vec<&str> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
}

#[tokio::test]
async fn test_join_increments_member_count_once() {
    let ctx = TestContext::new();
    let founder = ctx.register("founder").await;
    let joiner = ctx.register("joiner").await;

    let id = ctx.create_community(&founder, "Chess", "games").await;

    let joined = ctx
        .post("/api/members", &joiner, json!({ "communityId": id }))
        .await;
    assert_eq!(joined.status, StatusCode::CREATED);
    assert_eq!(joined.body["data"]["user_id"], joiner.id.to_string());
    assert_eq!(joined.body["data"]["role"], "member");

    let again = ctx
        .post("/api/members", &joiner, json!({ "communityId": id }))
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let community = ctx.get(&format!("/api/communities/{}", id), &joiner).await;
    assert_eq!(community.body["data"]["member_count"], 1);
}

#[tokio::test]
async fn test_join_validation_and_missing_community() {
    let ctx = TestContext::new();
    let user = ctx.register("joiner").await;

    let missing_field = ctx.post("/api/members", &user, json!({})).await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_field.body["details"][0]["field"], "communityId");

    let unknown = ctx
        .post(
            "/api/members",
            &user,
            json!({ "communityId": Uuid::new_v4() }),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_popular_returns_twelve_largest() {
    let ctx = TestContext::new();
    let founder = ctx.register("founder").await;

    let mut members = Vec::new();
    for i in 0..5 {
        members.push(ctx.register(&format!("member_{}", i)).await);
    }

    for i in 0..14 {
        let id: Uuid = ctx
            .create_community(&founder, &format!("Community {}", i), "misc")
            .await
            .parse()
            .unwrap();

        for member in members.iter().take(i % 6) {
            ctx.store
                .join_community(CreateCommunityMember {
                    community_id: id,
                    user_id: member.id,
                    role: CommunityRole::Member,
                })
                .await
                .unwrap();
        }
    }

    let response = ctx.get("/api/communities/popular", &founder).await;
    assert_eq!(response.status, StatusCode::OK);

    let counts: Vec<i64> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["member_count"].as_i64().unwrap())
        .collect();

    assert_eq!(counts.len(), 12);
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(counts[0], 5);
}

#[tokio::test]
async fn test_category_listing() {
    let ctx = TestContext::new();
    let founder = ctx.register("founder").await;
    let fan = ctx.register("fan").await;

    ctx.create_community(&founder, "Chess", "games").await;
    let jazz = ctx.create_community(&founder, "Jazz", "music").await;
    ctx.create_community(&founder, "Techno", "music").await;

    ctx.post("/api/members", &fan, json!({ "communityId": jazz }))
        .await;

    let response = ctx.get("/api/communities/category/music", &fan).await;
    assert_eq!(response.status, StatusCode::OK);

    let names: Vec<&str> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Jazz", "Techno"]);

    let empty = ctx.get("/api/communities/category/cooking", &fan).await;
    assert!(empty.body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_member_listings() {
    let ctx = TestContext::new();
    let mut last = None;
    for i in 0..12 {
        last = Some(ctx.register(&format!("user_{:02}", i)).await);
    }
    let viewer = last.unwrap();

    let all = ctx.get("/api/members", &viewer).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["data"].as_array().unwrap().len(), 12);
    assert!(all.body["data"][0].get("email").is_none());

    let newest = ctx.get("/api/members/new", &viewer).await;
    let newest = newest.body["data"].as_array().unwrap();
    assert_eq!(newest.len(), 10);
    assert_eq!(newest[0]["username"], "user_11");
    assert_eq!(newest[0]["handle"], "@user_11");
    assert_eq!(newest[0]["joined_at"], newest[0]["created_at"]);
}

#[tokio::test]
async fn test_create_community_enforces_length_limits() {
    let ctx = TestContext::new();
    let user = ctx.register("founder").await;

    let response = ctx
        .post(
            "/api/communities",
            &user,
            json!({
                "name": "n".repeat(101),
                "description": "Long names are not allowed",
                "category": "c".repeat(51),
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
    assert_eq!(fields, vec!["category", "name"]);
    assert!(ctx.store.list_communities().await.unwrap().is_empty());

    let at_limit = ctx
        .post(
            "/api/communities",
            &user,
            json!({
                "name": "n".repeat(100),
                "description": "Exactly at the limit",
                "category": "c".repeat(50),
            }),
        )
        .await;
    assert_eq!(at_limit.status, StatusCode::CREATED);
}
