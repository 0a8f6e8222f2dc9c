//! Integration tests for the `/api/feedback` endpoints and the order page
//! contact endpoint.

mod common;

use axum::body::Body;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use common::{
    body_json, body_text, delete_admin, get, get_admin, patch_admin, post_json, send, submit,
    ADMIN_PASSWORD,
};
use serde_json::json;
use tower::ServiceExt;

fn asha() -> serde_json::Value {
    json!({
        "userName": "Asha",
        "serviceType": "delivery",
        "qualityRating": 5,
        "speedRating": 4,
    })
}

// ---------------------------------------------------------------------------
// POST /api/feedback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_returns_201_with_stored_record() {
    let app = common::build_test_app().await;

    let response = post_json(app.app(), "/api/feedback", asha()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["totalFeedback"], 1);

    let data = &json["data"];
    assert!(data["id"].as_str().unwrap().starts_with("FB-"));
    assert_eq!(data["userName"], "Asha");
    assert_eq!(data["serviceType"], "delivery");
    assert_eq!(data["expectation"], "not-specified");
    assert_eq!(data["qualityRating"], 5);
    assert_eq!(data["speedRating"], 4);
    assert_eq!(data["status"], "active");
    assert_eq!(data["createdAt"], data["updatedAt"]);

    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn submit_persists_to_disk() {
    let app = common::build_test_app().await;
    let id = submit(app.app(), asha()).await;

    let raw = tokio::fs::read_to_string(app.store.path()).await.unwrap();
    let on_disk: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(on_disk.as_array().unwrap().len(), 1);
    assert_eq!(on_disk[0]["id"], id.as_str());
}

#[tokio::test]
async fn submitted_ids_are_unique() {
    let app = common::build_test_app().await;

    let mut ids = Vec::new();
    for _ in 0..5 {
        ids.push(submit(app.app(), asha()).await);
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[tokio::test]
async fn out_of_range_quality_is_rejected_without_append() {
    let app = common::build_test_app().await;

    for bad in [0, 6] {
        let mut body = asha();
        body["qualityRating"] = json!(bad);
        let response = post_json(app.app(), "/api/feedback", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    assert_eq!(app.store.len().await, 0);
}

#[tokio::test]
async fn missing_name_or_service_is_rejected() {
    let app = common::build_test_app().await;

    let response = post_json(
        app.app(),
        "/api/feedback",
        json!({ "userName": "  ", "serviceType": "pickup", "qualityRating": 3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app.app(),
        "/api/feedback",
        json!({ "userName": "Asha", "qualityRating": 3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.store.len().await, 0);
}

#[tokio::test]
async fn overlong_comment_is_rejected() {
    let app = common::build_test_app().await;

    let mut body = asha();
    body["comment"] = json!("a".repeat(501));
    let response = post_json(app.app(), "/api/feedback", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.store.len().await, 0);
}

#[tokio::test]
async fn catering_submission_drops_speed_rating() {
    let app = common::build_test_app().await;

    let response = post_json(
        app.app(),
        "/api/feedback",
        json!({
            "userName": "Ravi",
            "serviceType": "catering",
            "expectation": "yes",
            "qualityRating": 4,
            "speedRating": 2,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["data"].get("speedRating").is_none());
    assert_eq!(json["data"]["expectation"], "yes");
}

#[tokio::test]
async fn malformed_json_returns_400_envelope() {
    let app = common::build_test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/feedback")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_service_type_returns_400() {
    let app = common::build_test_app().await;

    let mut body = asha();
    body["serviceType"] = json!("drive-through");
    let response = post_json(app.app(), "/api/feedback", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Admin authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_without_token_returns_401_and_no_data() {
    let app = common::build_test_app().await;
    submit(app.app(), asha()).await;

    let response = get(app.app(), "/api/feedback").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn list_with_wrong_token_returns_401() {
    let app = common::build_test_app().await;

    let response = send(
        app.app(),
        Method::GET,
        "/api/feedback",
        Some("not-the-password"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid credentials");
}

#[tokio::test]
async fn non_bearer_authorization_returns_401() {
    let app = common::build_test_app().await;

    let request = Request::builder()
        .uri("/api/feedback")
        .header("Authorization", format!("Basic {ADMIN_PASSWORD}"))
        .body(Body::empty())
        .unwrap();
    let response = app.app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_verbs_fail_closed_when_secret_is_unset() {
    let app = common::build_test_app_with_secret(None).await;
    submit(app.app(), asha()).await;

    let response = get_admin(app.app(), "/api/feedback").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = delete_admin(app.app(), "/api/feedback", json!({ "id": "FB-1-x" })).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.store.len().await, 1);
}

// ---------------------------------------------------------------------------
// GET /api/feedback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_newest_first_with_stats() {
    let app = common::build_test_app().await;

    let first = submit(
        app.app(),
        json!({
            "userName": "Ravi",
            "serviceType": "pickup",
            "expectation": "no",
            "qualityRating": 2,
        }),
    )
    .await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = submit(app.app(), asha()).await;

    let response = get_admin(app.app(), "/api/feedback").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["lastUpdated"].is_string());

    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["id"], second.as_str());
    assert_eq!(data[1]["id"], first.as_str());

    let stats = &json["stats"];
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["avgQuality"], 3.5);
    assert_eq!(stats["avgSpeed"], 4.0);
    assert_eq!(stats["negative"], 1);
    assert_eq!(stats["thisMonth"], 2);
}

// ---------------------------------------------------------------------------
// PATCH /api/feedback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn patch_changes_only_status_and_updated_at() {
    let app = common::build_test_app().await;
    let created = body_json(post_json(app.app(), "/api/feedback", asha()).await).await["data"]
        .clone();
    let id = created["id"].as_str().unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let response = patch_admin(
        app.app(),
        "/api/feedback",
        json!({ "id": id, "status": "resolved" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["status"], "resolved");
    assert_ne!(updated["updatedAt"], created["updatedAt"]);

    for field in ["id", "userName", "serviceType", "qualityRating", "speedRating", "createdAt", "timestamp"] {
        assert_eq!(updated[field], created[field], "{field} must not change");
    }
}

#[tokio::test]
async fn patch_unknown_status_returns_400() {
    let app = common::build_test_app().await;
    let id = submit(app.app(), asha()).await;

    let response = patch_admin(
        app.app(),
        "/api/feedback",
        json!({ "id": id, "status": "deleted" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_missing_fields_returns_400() {
    let app = common::build_test_app().await;

    let response = patch_admin(app.app(), "/api/feedback", json!({ "status": "reviewed" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "ID and status are required"
    );
}

#[tokio::test]
async fn patch_unknown_id_returns_404() {
    let app = common::build_test_app().await;

    let response = patch_admin(
        app.app(),
        "/api/feedback",
        json!({ "id": "FB-0-missing", "status": "reviewed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// DELETE /api/feedback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_record() {
    let app = common::build_test_app().await;
    let id = submit(app.app(), asha()).await;
    submit(app.app(), asha()).await;

    let response = delete_admin(app.app(), "/api/feedback", json!({ "id": id })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["remaining"], 1);

    let list = body_json(get_admin(app.app(), "/api/feedback").await).await;
    let ids: Vec<&str> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert!(!ids.contains(&id.as_str()));
}

#[tokio::test]
async fn delete_unknown_id_returns_404_and_keeps_store() {
    let app = common::build_test_app().await;
    submit(app.app(), asha()).await;

    let response = delete_admin(app.app(), "/api/feedback", json!({ "id": "FB-0-missing" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn delete_without_id_returns_400() {
    let app = common::build_test_app().await;

    let response = delete_admin(app.app(), "/api/feedback", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Feedback ID is required");
}

// ---------------------------------------------------------------------------
// GET /api/feedback/export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn export_requires_admin() {
    let app = common::build_test_app().await;
    let response = get(app.app(), "/api/feedback/export").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn export_rows_follow_filter_and_escape_quotes() {
    let app = common::build_test_app().await;
    submit(
        app.app(),
        json!({
            "userName": "Meera",
            "serviceType": "pickup",
            "qualityRating": 5,
            "comment": "The \"special\" thali, wow",
        }),
    )
    .await;
    submit(app.app(), asha()).await;
    submit(app.app(), asha()).await;

    let response = get_admin(app.app(), "/api/feedback/export?service=pickup").await;
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert!(headers[CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
    let disposition = headers[CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"feedback-"));
    assert!(disposition.ends_with(".csv\""));

    let csv = body_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2, "header plus one pickup row");
    assert!(lines[0].starts_with("ID,Name,Email"));
    assert!(lines[1].contains(r#""The ""special"" thali, wow""#));
}

#[tokio::test]
async fn export_unknown_service_filter_returns_400_envelope() {
    let app = common::build_test_app().await;

    let response = get_admin(app.app(), "/api/feedback/export?service=dinein").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid query string"));
}

#[tokio::test]
async fn export_search_matches_name() {
    let app = common::build_test_app().await;
    submit(app.app(), asha()).await;
    submit(
        app.app(),
        json!({ "userName": "Ravi", "serviceType": "pickup", "qualityRating": 3 }),
    )
    .await;

    let csv = body_text(get_admin(app.app(), "/api/feedback/export?search=ASHA&sort=oldest").await).await;
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains(",Asha,"));
}

// ---------------------------------------------------------------------------
// GET /api/order/contact
// ---------------------------------------------------------------------------

#[tokio::test]
async fn order_contact_returns_phone_and_whatsapp_links() {
    let app = common::build_test_app().await;

    let response = get(app.app(), "/api/order/contact").await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["onlineOrdering"], "coming-soon");
    assert_eq!(data["primaryPhone"], "7259322466");
    assert_eq!(data["primaryTelLink"], "tel:7259322466");
    assert_eq!(data["alternateTelLink"], "tel:8951603763");
    assert_eq!(data["whatsappLink"], "https://wa.me/917259322466");
}
