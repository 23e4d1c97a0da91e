//! Contracts, providers and project budget lines over HTTP.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_project, delete_auth, get_auth, post_json_auth,
    put_json_auth, user_with_token,
};
use serde_json::json;
use sqlx::PgPool;

async fn create_provider(pool: &PgPool, token: &str, name: &str) -> i64 {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/providers",
        json!({ "name": name }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_contract_lifecycle_and_provider_guard(pool: PgPool) {
    let (_, pmo) = user_with_token(&pool, "pmo@pmo.test", "portfolio_director").await;
    let project = create_project(&pool, &pmo, "CT-1", None).await;
    let provider = create_provider(&pool, &pmo, "Globex").await;

    let uri = format!("/api/v1/projects/{project}/contracts");
    let body = json!({
        "contract_number": "C-2026-001",
        "title": "Integration services",
        "provider_id": provider,
        "amount": 400.0,
        "start_date": "2026-01-01",
        "end_date": "2026-12-31"
    });
    let response = post_json_auth(build_test_app(pool.clone()), &uri, body, &pmo).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let contract = body_json(response).await["data"]["id"].as_i64().unwrap();

    // End date may not move before the stored start date.
    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/contracts/{contract}"),
        json!({ "end_date": "2025-06-01" }),
        &pmo,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/providers/{provider}/contracts"),
        &pmo,
    )
    .await;
    assert_eq!(body_json(response).await["count"], 1);

    let provider_uri = format!("/api/v1/providers/{provider}");
    let response = delete_auth(build_test_app(pool.clone()), &provider_uri, &pmo).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Cannot delete provider: 1 contract(s) attached"
    );

    let response = delete_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/contracts/{contract}"),
        &pmo,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(build_test_app(pool), &provider_uri, &pmo).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_provider_status_and_stats(pool: PgPool) {
    let (_, pmo) = user_with_token(&pool, "pmo@pmo.test", "portfolio_director").await;
    let provider = create_provider(&pool, &pmo, "Initech").await;
    let uri = format!("/api/v1/providers/{provider}/status");

    let response =
        put_json_auth(build_test_app(pool.clone()), &uri, json!({ "status": "retired" }), &pmo)
            .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        put_json_auth(build_test_app(pool.clone()), &uri, json!({ "status": "suspended" }), &pmo)
            .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "suspended");

    let response = put_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/providers/999999/status",
        json!({ "status": "active" }),
        &pmo,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(build_test_app(pool), "/api/v1/providers/stats", &pmo).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["total"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_budget_replace_and_summary(pool: PgPool) {
    let (_, pmo) = user_with_token(&pool, "pmo@pmo.test", "portfolio_director").await;
    let project = create_project(&pool, &pmo, "BUD-1", None).await;
    let uri = format!("/api/v1/projects/{project}/budget");

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "category": "other", "label": "Old line", "planned_amount": 10.0 }),
        &pmo,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let lines = json!({ "lines": [
        { "category": "personnel", "label": "Consultants",
          "planned_amount": 600.0, "consumed_amount": 200.0 },
        { "category": "software", "label": "Licences",
          "planned_amount": 300.0, "consumed_amount": 50.0 }
    ]});
    let response = put_json_auth(build_test_app(pool.clone()), &uri, lines, &pmo).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Budget replaced");
    assert_eq!(json["count"], 2);

    let response = get_auth(build_test_app(pool.clone()), &format!("{uri}/summary"), &pmo).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["approved_budget"], 1000.0);
    assert_eq!(json["data"]["total_planned"], 900.0);
    assert_eq!(json["data"]["total_consumed"], 250.0);
    assert_eq!(json["data"]["remaining"], 750.0);
    assert_eq!(json["data"]["consumption_pct"], 25.0);

    // One bad line rejects the whole set and keeps the current lines.
    let bad = json!({ "lines": [
        { "category": "personnel", "label": "Fine" },
        { "category": "snacks", "label": "Not a category" }
    ]});
    let response = put_json_auth(build_test_app(pool.clone()), &uri, bad, &pmo).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(build_test_app(pool), &uri, &pmo).await;
    assert_eq!(body_json(response).await["count"], 2);
}
