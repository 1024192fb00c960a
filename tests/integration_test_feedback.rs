mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

async fn approve_all(app: &TestApp) {
    sqlx::query("UPDATE reviews SET approved = 1")
        .execute(&app.pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_contact_message_is_stored_as_new() {
    let app = TestApp::new().await;

    let (status, body) = app.post_json("/api/v1/contact", json!({
        "name": "Nagy Eszter",
        "email": "eszter@example.hu",
        "message": "Do you also visit on weekends?"
    })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);

    let stored: String = sqlx::query_scalar("SELECT status FROM contact_messages WHERE id = ?")
        .bind(body["reference_id"].as_str().unwrap())
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(stored, "new");
}

#[tokio::test]
async fn test_contact_message_validation() {
    let app = TestApp::new().await;

    let (status, _) = app.post_json("/api/v1/contact", json!({
        "name": "Nagy Eszter",
        "email": "eszter@example.hu",
        "message": "   "
    })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post_json("/api/v1/contact", json!({"message": "Hello"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.count_rows("contact_messages").await, 0);
}

#[tokio::test]
async fn test_feedback_requires_write_token() {
    let app = TestApp::with_write_token(None).await;

    let (status, _) = app.post_json("/api/v1/contact", json!({
        "name": "Nagy Eszter",
        "email": "eszter@example.hu",
        "message": "Hello there"
    })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = app.post_json("/api/v1/reviews", json!({
        "name": "Eszter",
        "rating": 5,
        "content": "Wonderful, patient help."
    })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    assert_eq!(app.count_rows("contact_messages").await, 0);
    assert_eq!(app.count_rows("reviews").await, 0);
}

#[tokio::test]
async fn test_reviews_need_approval_before_listing() {
    let app = TestApp::new().await;

    let (status, body) = app.post_json("/api/v1/reviews", json!({
        "name": "Eszter",
        "rating": 5,
        "content": "Wonderful, patient help."
    })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);

    let (_, listed) = app.get("/api/v1/reviews").await;
    assert!(listed.as_array().unwrap().is_empty());

    let (_, summary) = app.get("/api/v1/reviews/summary").await;
    assert_eq!(summary, json!({"average": 0.0, "count": 0}));

    app.post_json("/api/v1/reviews", json!({
        "name": "Judit",
        "rating": 4,
        "content": "Helped us a lot in the first weeks."
    })).await;
    approve_all(&app).await;

    let (status, listed) = app.get("/api/v1/reviews").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 2);
    assert!(listed[0]["approved"].as_bool().unwrap());

    let (_, summary) = app.get("/api/v1/reviews/summary").await;
    assert_eq!(summary, json!({"average": 4.5, "count": 2}));
}

#[tokio::test]
async fn test_review_validation() {
    let app = TestApp::new().await;

    let invalid = vec![
        json!({"name": "E", "rating": 5, "content": "Wonderful, patient help."}),
        json!({"name": "Eszter", "rating": 0, "content": "Wonderful, patient help."}),
        json!({"name": "Eszter", "rating": 6, "content": "Wonderful, patient help."}),
        json!({"name": "Eszter", "rating": 5, "content": "  short   "}),
    ];

    for payload in invalid {
        let (status, _) = app.post_json("/api/v1/reviews", payload.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {} should be rejected", payload);
    }

    assert_eq!(app.count_rows("reviews").await, 0);
}
