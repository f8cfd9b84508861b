//! Integration tests for the training API
//!
//! Exercises the full router over an in-memory database:
//! - Syllabus, Class and Student create/read/update/delete
//! - Field validation codes and multi-error reporting
//! - Soft delete and the Syllabus → Class cascade
//! - Request body handling

mod helpers;

use axum::http::StatusCode;
use helpers::{error_code, field_error, setup, ALPHA_ADMIN, ALPHA_VIEWER, UNREACHABLE_USER};
use serde_json::json;

// ========================================
// Health
// ========================================

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = setup().await;

    let (status, body) = app.send("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "training-api");
}

// ========================================
// Syllabus
// ========================================

#[tokio::test]
async fn test_syllabus_create_and_read() {
    let app = setup().await;

    let (status, body) = app
        .post(
            "/syllabus/",
            ALPHA_ADMIN,
            json!({"name": "  Forklift Safety ", "description": "Warehouse basics"}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["content"]["id"].as_i64().unwrap();
    assert_eq!(body["content"]["name"], "Forklift Safety");
    assert_eq!(body["content"]["member_id"], 1);
    assert_eq!(body["content"]["uri"], format!("/syllabus/{}/", id));

    let (status, body) = app.get(&format!("/syllabus/{}/", id), ALPHA_ADMIN).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["description"], "Warehouse basics");
}

#[tokio::test]
async fn test_syllabus_name_rules() {
    let app = setup().await;
    app.syllabus(ALPHA_ADMIN, "First Aid").await;

    let (status, body) = app.post("/syllabus/", ALPHA_ADMIN, json!({"name": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_error(&body, "name"), "training_syllabus_create_101");

    let (_, body) = app
        .post("/syllabus/", ALPHA_ADMIN, json!({"name": "x".repeat(51)}))
        .await;
    assert_eq!(field_error(&body, "name"), "training_syllabus_create_102");

    let (status, body) = app
        .post("/syllabus/", ALPHA_ADMIN, json!({"name": "First Aid"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_error(&body, "name"), "training_syllabus_create_103");
    assert!(!body["errors"]["name"]["detail"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_syllabus_name_reusable_after_delete() {
    let app = setup().await;
    let id = app.syllabus(ALPHA_ADMIN, "Manual Handling").await;

    let (status, body) = app.delete(&format!("/syllabus/{}/", id), ALPHA_ADMIN).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.get(&format!("/syllabus/{}/", id), ALPHA_ADMIN).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.syllabus(ALPHA_ADMIN, "Manual Handling").await;
}

#[tokio::test]
async fn test_syllabus_put_requires_every_field() {
    let app = setup().await;
    let id = app.syllabus(ALPHA_ADMIN, "Ladders").await;

    let (status, body) = app
        .put(&format!("/syllabus/{}/", id), ALPHA_ADMIN, json!({"description": "new"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_error(&body, "name"), "training_syllabus_update_101");

    let (_, body) = app.get(&format!("/syllabus/{}/", id), ALPHA_ADMIN).await;
    assert_eq!(body["content"]["description"], "");

    let (status, body) = app
        .put(
            &format!("/syllabus/{}/", id),
            ALPHA_ADMIN,
            json!({"name": "Ladders", "description": "Keeping its own name is fine"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["description"], "Keeping its own name is fine");
}

#[tokio::test]
async fn test_syllabus_patch_changes_only_sent_fields() {
    let app = setup().await;
    let id = app.syllabus(ALPHA_ADMIN, "Scaffolding").await;
    let uri = format!("/syllabus/{}/", id);

    let (status, body) = app
        .patch(&uri, ALPHA_ADMIN, json!({"description": "Tower scaffolds"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["name"], "Scaffolding");
    assert_eq!(body["content"]["description"], "Tower scaffolds");

    let (status, body) = app.patch(&uri, ALPHA_ADMIN, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["description"], "Tower scaffolds");
}

#[tokio::test]
async fn test_syllabus_delete_blocked_by_live_students() {
    let app = setup().await;
    let syllabus_id = app.syllabus(ALPHA_ADMIN, "Confined Spaces").await;
    let cls_id = app.class(ALPHA_ADMIN, syllabus_id, "Pat", "2024-05-01").await;
    let student_id = app.student(ALPHA_ADMIN, cls_id, 30).await;

    let (status, body) = app
        .delete(&format!("/syllabus/{}/", syllabus_id), ALPHA_ADMIN)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "training_syllabus_delete_202");

    let (status, _) = app.delete(&format!("/student/{}/", student_id), ALPHA_ADMIN).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .delete(&format!("/syllabus/{}/", syllabus_id), ALPHA_ADMIN)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Classes go with their syllabus
    let (status, body) = app.get(&format!("/class/{}/", cls_id), ALPHA_ADMIN).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "training_cls_read_001");
}

// ========================================
// Class
// ========================================

#[tokio::test]
async fn test_class_create_without_finish_date() {
    let app = setup().await;
    let syllabus_id = app.syllabus(ALPHA_ADMIN, "Working at Height").await;

    let (status, body) = app
        .post(
            "/class/",
            ALPHA_ADMIN,
            json!({
                "syllabus_id": syllabus_id.to_string(),
                "trainer": " Robin ",
                "start_date": "2024-06-03T08:00:00Z"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let content = &body["content"];
    assert_eq!(content["start_date"], "2024-06-03");
    assert!(content["finish_date"].is_null());
    assert_eq!(content["trainer"], "Robin");
    assert_eq!(content["syllabus"]["name"], "Working at Height");
    assert_eq!(content["uri"], format!("/class/{}/", content["id"]));
}

#[tokio::test]
async fn test_class_create_reports_every_error() {
    let app = setup().await;
    let syllabus_id = app.syllabus(ALPHA_ADMIN, "Asbestos Awareness").await;

    let (status, body) = app
        .post(
            "/class/",
            ALPHA_ADMIN,
            json!({
                "syllabus_id": syllabus_id,
                "start_date": "2024-06-10",
                "finish_date": "2024-06-01",
                "trainer": ""
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_error(&body, "finish_date"), "training_cls_create_103");
    assert_eq!(field_error(&body, "trainer"), "training_cls_create_106");
    assert!(body["errors"].get("start_date").is_none());

    let (_, body) = app.get("/class/", ALPHA_ADMIN).await;
    assert_eq!(body["_metadata"]["total_records"], 0);

    let (_, body) = app
        .post(
            "/class/",
            ALPHA_ADMIN,
            json!({"syllabus_id": 0, "start_date": "June", "trainer": "Sam"}),
        )
        .await;
    assert_eq!(field_error(&body, "syllabus_id"), "training_cls_create_104");
    assert_eq!(field_error(&body, "start_date"), "training_cls_create_101");

    let (_, body) = app
        .post(
            "/class/",
            ALPHA_ADMIN,
            json!({"syllabus_id": 9999, "start_date": "2024-06-10", "trainer": "Sam"}),
        )
        .await;
    assert_eq!(field_error(&body, "syllabus_id"), "training_cls_create_105");

    // None of the rejected requests wrote a row
    let (_, body) = app.get("/class/", ALPHA_ADMIN).await;
    assert_eq!(body["_metadata"]["total_records"], 0);
}

#[tokio::test]
async fn test_class_patch_checks_dates_against_stored_values() {
    let app = setup().await;
    let syllabus_id = app.syllabus(ALPHA_ADMIN, "Hot Works").await;
    let cls_id = app.class(ALPHA_ADMIN, syllabus_id, "Lee", "2024-07-10").await;
    let uri = format!("/class/{}/", cls_id);

    let (status, body) = app
        .patch(&uri, ALPHA_ADMIN, json!({"finish_date": "2024-07-01"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_error(&body, "finish_date"), "training_cls_update_103");

    let (_, body) = app.get(&uri, ALPHA_ADMIN).await;
    assert!(body["content"]["finish_date"].is_null());

    let (status, body) = app
        .patch(&uri, ALPHA_ADMIN, json!({"finish_date": "2024-07-12"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["finish_date"], "2024-07-12");

    // Moving the start past the stored finish is caught too
    let (status, body) = app
        .patch(&uri, ALPHA_ADMIN, json!({"start_date": "2024-07-20"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_error(&body, "finish_date"), "training_cls_update_103");

    let (_, body) = app.get(&uri, ALPHA_ADMIN).await;
    assert_eq!(body["content"]["start_date"], "2024-07-10");
    assert_eq!(body["content"]["finish_date"], "2024-07-12");

    let (status, body) = app
        .patch(&uri, ALPHA_ADMIN, json!({"finish_date": null}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["content"]["finish_date"].is_null());
    assert_eq!(body["content"]["start_date"], "2024-07-10");
}

#[tokio::test]
async fn test_class_delete_blocked_by_live_students() {
    let app = setup().await;
    let syllabus_id = app.syllabus(ALPHA_ADMIN, "Chainsaw").await;
    let cls_id = app.class(ALPHA_ADMIN, syllabus_id, "Jo", "2024-08-01").await;
    let student_id = app.student(ALPHA_ADMIN, cls_id, 11).await;
    let uri = format!("/class/{}/", cls_id);

    let (status, body) = app.delete(&uri, ALPHA_ADMIN).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "training_cls_delete_202");

    app.delete(&format!("/student/{}/", student_id), ALPHA_ADMIN).await;

    let (status, _) = app.delete(&uri, ALPHA_ADMIN).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.delete(&uri, ALPHA_ADMIN).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "training_cls_delete_001");
}

// ========================================
// Student
// ========================================

#[tokio::test]
async fn test_student_create_nests_class_and_syllabus() {
    let app = setup().await;
    let syllabus_id = app.syllabus(ALPHA_ADMIN, "Food Hygiene").await;
    let cls_id = app.class(ALPHA_ADMIN, syllabus_id, "Kim", "2024-09-02").await;

    let (status, body) = app
        .post(
            "/student/",
            ALPHA_ADMIN,
            json!({"cls_id": cls_id, "user_id": "30", "notes": " vegetarian "}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let content = &body["content"];
    assert_eq!(content["user_id"], 30);
    assert_eq!(content["notes"], "vegetarian");
    assert_eq!(content["cls"]["id"], cls_id);
    assert_eq!(content["cls"]["syllabus"]["name"], "Food Hygiene");
}

#[tokio::test]
async fn test_student_user_must_exist_in_directory() {
    let app = setup().await;
    let syllabus_id = app.syllabus(ALPHA_ADMIN, "Fire Warden").await;
    let cls_id = app.class(ALPHA_ADMIN, syllabus_id, "Max", "2024-10-01").await;

    let (_, body) = app
        .post("/student/", ALPHA_ADMIN, json!({"cls_id": cls_id, "user_id": 404}))
        .await;
    assert_eq!(field_error(&body, "user_id"), "training_student_create_104");

    let (status, body) = app
        .post(
            "/student/",
            ALPHA_ADMIN,
            json!({"cls_id": cls_id, "user_id": UNREACHABLE_USER}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_error(&body, "user_id"), "training_student_create_104");

    let (_, body) = app
        .post("/student/", ALPHA_ADMIN, json!({"cls_id": "abc", "user_id": "abc"}))
        .await;
    assert_eq!(field_error(&body, "cls_id"), "training_student_create_101");
    assert_eq!(field_error(&body, "user_id"), "training_student_create_103");

    let (_, body) = app
        .post("/student/", ALPHA_ADMIN, json!({"cls_id": 9999, "user_id": 30}))
        .await;
    assert_eq!(field_error(&body, "cls_id"), "training_student_create_102");
}

#[tokio::test]
async fn test_student_update_moves_between_classes() {
    let app = setup().await;
    let syllabus_id = app.syllabus(ALPHA_ADMIN, "Defibrillators").await;
    let first = app.class(ALPHA_ADMIN, syllabus_id, "Ash", "2024-11-04").await;
    let second = app.class(ALPHA_ADMIN, syllabus_id, "Ash", "2024-11-11").await;
    let student_id = app.student(ALPHA_ADMIN, first, 30).await;

    let (status, body) = app
        .put(
            &format!("/student/{}/", student_id),
            ALPHA_ADMIN,
            json!({"cls_id": second, "user_id": 30, "notes": "rescheduled"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["content"]["cls"]["id"], second);
    assert_eq!(body["content"]["notes"], "rescheduled");

    // The first class is free to go now
    let (status, _) = app.delete(&format!("/class/{}/", first), ALPHA_ADMIN).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// ========================================
// Request handling
// ========================================

#[tokio::test]
async fn test_non_object_body_is_rejected() {
    let app = setup().await;

    let (status, body) = app.post("/syllabus/", ALPHA_ADMIN, json!(["name"])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "training_request_001");
}

#[tokio::test]
async fn test_non_integer_pk_is_not_found() {
    let app = setup().await;

    let (status, body) = app.get("/syllabus/abc/", ALPHA_ADMIN).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "training_syllabus_read_001");

    let (status, body) = app.delete("/student/1.5/", ALPHA_ADMIN).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "training_student_delete_001");
}

#[tokio::test]
async fn test_viewer_may_read_but_not_create() {
    let app = setup().await;
    let id = app.syllabus(ALPHA_ADMIN, "Noise at Work").await;

    let (status, _) = app.get(&format!("/syllabus/{}/", id), ALPHA_VIEWER).await;
    assert_eq!(status, StatusCode::OK);

    // Permission is checked before the body is even looked at
    let (status, body) = app.post("/syllabus/", ALPHA_VIEWER, json!({"name": ""})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "training_syllabus_create_201");
}
