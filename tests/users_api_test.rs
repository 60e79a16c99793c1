mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{app, register, send};

#[tokio::test]
async fn fresh_account_has_empty_stats() {
    let app = app();
    let token = register(&app, "stats@example.com").await;

    let (status, body) = send(&app, "GET", "/api/users/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["aiInteractions"], 0);
    assert_eq!(body["stats"]["studySessions"], 0);
    assert_eq!(body["stats"]["topicsLearned"], json!([]));
    assert_eq!(body["stats"]["recentActivities"], json!([]));
}

#[tokio::test]
async fn partial_stats_update_keeps_other_fields() {
    let app = app();
    let token = register(&app, "partial@example.com").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/users/stats",
        Some(&token),
        Some(json!({"studySessions": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Stats updated successfully");
    assert_eq!(body["stats"]["studySessions"], 4);
    assert_eq!(body["stats"]["aiInteractions"], 0);

    let (_, body) = send(
        &app,
        "PUT",
        "/api/users/stats",
        Some(&token),
        Some(json!({"topicsLearned": ["Algebra"]})),
    )
    .await;
    assert_eq!(body["stats"]["studySessions"], 4);
    assert_eq!(body["stats"]["topicsLearned"], json!(["Algebra"]));
}

#[tokio::test]
async fn topics_are_added_once() {
    let app = app();
    let token = register(&app, "topics@example.com").await;

    for _ in 0..2 {
        let (status, body) = send(
            &app,
            "POST",
            "/api/users/topics-learned",
            Some(&token),
            Some(json!({"topic": " Photosynthesis "})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Topic added to learned topics");
        assert_eq!(body["topicsLearned"], json!(["Photosynthesis"]));
    }

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/topics-learned",
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Topic is required");
}

#[tokio::test]
async fn profile_read_and_update() {
    let app = app();
    let token = register(&app, "profile@example.com").await;

    let (status, body) = send(&app, "GET", "/api/users/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "profile@example.com");
    assert!(body["user"]["createdAt"].is_string());
    assert!(body["user"]["lastLogin"].is_string());
    assert!(body["user"]["stats"].is_object());

    let (status, body) = send(
        &app,
        "PUT",
        "/api/users/profile",
        Some(&token),
        Some(json!({"firstName": "  Augusta ", "name": "Augusta Ada King"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["user"]["firstName"], "Augusta");
    assert_eq!(body["user"]["lastName"], "Lovelace");
    assert_eq!(body["user"]["name"], "Augusta Ada King");
}

#[tokio::test]
async fn deleted_account_is_gone() {
    let app = app();
    let token = register(&app, "delete@example.com").await;

    let (status, body) = send(&app, "DELETE", "/api/users/account", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account deleted successfully");

    let (status, body) = send(&app, "GET", "/api/users/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "delete@example.com", "password": "analytical"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    register(&app, "delete@example.com").await;
}
