//! HTTP-level tests for the `/projects` resource.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_project, delete_auth, get_auth, post_json_auth,
    put_json_auth, user_with_token,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_project_defaults(pool: PgPool) {
    let (pmo_id, pmo) = user_with_token(&pool, "pmo@pmo.test", "portfolio_director").await;

    let body = json!({ "name": "Network refresh", "code": "NET-01" });
    let response = post_json_auth(build_test_app(pool), "/api/v1/projects", body, &pmo).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Project created");
    assert_eq!(json["data"]["lead_id"], pmo_id);
    assert_eq!(json["data"]["status_code"], "planning");
    assert_eq!(json["data"]["priority"], "normal");
    assert_eq!(json["data"]["health"], "green");
    assert_eq!(json["data"]["completion_pct"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_project_rejects_bad_input(pool: PgPool) {
    let (_, pmo) = user_with_token(&pool, "pmo@pmo.test", "portfolio_director").await;

    let body = json!({ "name": "X", "code": "X-1", "priority": "urgent" });
    let response =
        post_json_auth(build_test_app(pool.clone()), "/api/v1/projects", body, &pmo).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let body = json!({
        "name": "X",
        "code": "X-2",
        "start_date": "2026-06-01",
        "target_end_date": "2026-01-01"
    });
    let response =
        post_json_auth(build_test_app(pool.clone()), "/api/v1/projects", body, &pmo).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "name": "X", "code": "X-3", "budget": -5.0 });
    let response = post_json_auth(build_test_app(pool), "/api/v1/projects", body, &pmo).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_code_conflicts(pool: PgPool) {
    let (_, pmo) = user_with_token(&pool, "pmo@pmo.test", "portfolio_director").await;
    create_project(&pool, &pmo, "DUP-1", None).await;

    let body = json!({ "name": "Again", "code": "DUP-1" });
    let response = post_json_auth(build_test_app(pool), "/api/v1/projects", body, &pmo).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_get_and_search(pool: PgPool) {
    let (_, pmo) = user_with_token(&pool, "pmo@pmo.test", "portfolio_director").await;
    let first = create_project(&pool, &pmo, "ERP-1", None).await;
    create_project(&pool, &pmo, "CRM-1", None).await;

    let response = get_auth(build_test_app(pool.clone()), "/api/v1/projects", &pmo).await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 2);

    let response =
        get_auth(build_test_app(pool.clone()), "/api/v1/projects?search=ERP", &pmo).await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["id"], first);

    let uri = format!("/api/v1/projects/{first}");
    let response = get_auth(build_test_app(pool.clone()), &uri, &pmo).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["code"], "ERP-1");

    let response = get_auth(build_test_app(pool), "/api/v1/projects/999999", &pmo).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["message"],
        "Project with id 999999 not found"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_project(pool: PgPool) {
    let (_, pmo) = user_with_token(&pool, "pmo@pmo.test", "portfolio_director").await;
    let id = create_project(&pool, &pmo, "UPD-1", None).await;
    let uri = format!("/api/v1/projects/{id}");

    let body = json!({ "health": "amber", "status_id": 2 });
    let response = put_json_auth(build_test_app(pool.clone()), &uri, body, &pmo).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Project updated");
    assert_eq!(json["data"]["health"], "amber");
    assert_eq!(json["data"]["status_code"], "in_progress");

    let response = put_json_auth(build_test_app(pool.clone()), &uri, json!({}), &pmo).await;
    let json = body_json(response).await;
    assert_eq!(json["message"], "Nothing to update");
    assert!(json["data"].is_null());

    let body = json!({ "completion_pct": 140 });
    let response = put_json_auth(build_test_app(pool), &uri, body, &pmo).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_blocked_by_deliverables(pool: PgPool) {
    let (_, pmo) = user_with_token(&pool, "pmo@pmo.test", "portfolio_director").await;
    let id = create_project(&pool, &pmo, "DEL-1", None).await;

    let uri = format!("/api/v1/projects/{id}/deliverables");
    let body = json!({ "name": "Blueprint" });
    let response = post_json_auth(build_test_app(pool.clone()), &uri, body, &pmo).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let deliverable_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/projects/{id}");
    let response = delete_auth(build_test_app(pool.clone()), &uri, &pmo).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DEPENDENCY_ERROR");
    assert_eq!(json["message"], "Cannot delete project: 1 deliverable(s) attached");

    let response = delete_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/deliverables/{deliverable_id}"),
        &pmo,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(build_test_app(pool.clone()), &uri, &pmo).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Project deleted");

    let response = get_auth(build_test_app(pool), &uri, &pmo).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_project_details_bundle(pool: PgPool) {
    let (_, pmo) = user_with_token(&pool, "pmo@pmo.test", "portfolio_director").await;
    let id = create_project(&pool, &pmo, "DET-1", None).await;

    let uri = format!("/api/v1/projects/{id}/phases");
    let response =
        post_json_auth(build_test_app(pool.clone()), &uri, json!({ "name": "Design" }), &pmo).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let uri = format!("/api/v1/projects/{id}/details");
    let response = get_auth(build_test_app(pool), &uri, &pmo).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["project"]["id"], id);
    assert_eq!(json["data"]["phases"].as_array().unwrap().len(), 1);
    assert!(json["data"]["deliverables"].as_array().unwrap().is_empty());
    assert!(json["data"]["contracts"].is_array());
    assert!(json["data"]["documents"].is_array());
    assert!(json["data"]["providers"].is_array());
    assert!(json["data"]["budget_lines"].is_array());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_stats_recent_and_dashboard(pool: PgPool) {
    let (_, pmo) = user_with_token(&pool, "pmo@pmo.test", "portfolio_director").await;
    let (lead_id, lead) = user_with_token(&pool, "lead@pmo.test", "project_lead").await;
    for code in ["S-1", "S-2", "S-3"] {
        create_project(&pool, &pmo, code, None).await;
    }
    create_project(&pool, &pmo, "S-4", Some(lead_id)).await;

    let response = get_auth(build_test_app(pool.clone()), "/api/v1/projects/stats", &pmo).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 4);
    assert_eq!(json["data"]["planning"], 4);
    assert_eq!(json["data"]["total_budget"], 4000.0);

    let response =
        get_auth(build_test_app(pool.clone()), "/api/v1/projects/recent?limit=2", &pmo).await;
    assert_eq!(body_json(response).await["count"], 2);

    let response =
        get_auth(build_test_app(pool.clone()), "/api/v1/projects/dashboard", &lead).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user_role"], "project_lead");
    assert_eq!(json["data"]["stats"]["total"], 1);
    assert_eq!(json["data"]["my_projects"].as_array().unwrap().len(), 1);

    let response = get_auth(build_test_app(pool), "/api/v1/projects/dashboard", &pmo).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["stats"]["total"], 4);
    assert!(json["data"]["my_projects"].as_array().unwrap().is_empty());
}
