use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify seeded reference data.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    pmo_db::health_check(&pool).await.unwrap();

    let tables = [("roles", 4), ("project_statuses", 5), ("org_units", 6)];
    for (table, expected) in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, expected, "{table} seed rows");
    }
}

/// Role names match the closed role vocabulary.
#[sqlx::test(migrations = "./migrations")]
async fn test_seeded_roles_parse(pool: PgPool) {
    let roles = pmo_db::repositories::RoleRepo::list(&pool).await.unwrap();
    for role in &roles {
        assert!(
            pmo_core::roles::VALID_ROLES.contains(&role.name.as_str()),
            "unexpected role {}",
            role.name
        );
    }
    let admin = roles.iter().find(|r| r.name == "functional_admin").unwrap();
    assert_eq!(admin.capabilities.0.get("users"), Some(&true));
}

/// Status codes match the project status vocabulary, in workflow order.
#[sqlx::test(migrations = "./migrations")]
async fn test_statuses_in_order(pool: PgPool) {
    let statuses = pmo_db::repositories::ReferenceRepo::statuses(&pool)
        .await
        .unwrap();
    let codes: Vec<&str> = statuses.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, pmo_core::vocab::VALID_PROJECT_STATUSES);
}

/// `updated_at` moves forward on a patch.
#[sqlx::test(migrations = "./migrations")]
async fn test_patch_refreshes_updated_at(pool: PgPool) {
    let before: chrono::DateTime<chrono::Utc> =
        sqlx::query_scalar("SELECT updated_at FROM org_units WHERE code = 'DSI'")
            .fetch_one(&pool)
            .await
            .unwrap();
    let id: i64 = sqlx::query_scalar("SELECT id FROM org_units WHERE code = 'DSI'")
        .fetch_one(&pool)
        .await
        .unwrap();

    let mut patch = pmo_db::patch::UpdateAssembler::new("org_units");
    patch.set("description", Some("Information systems"));
    let rows = patch.execute(&pool, id).await.unwrap();
    assert_eq!(rows, 1);

    let after: chrono::DateTime<chrono::Utc> =
        sqlx::query_scalar("SELECT updated_at FROM org_units WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(after >= before);
}
