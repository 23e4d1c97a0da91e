//! Integration tests for entity CRUD, progress roll-up and scoped listing.
//!
//! Exercises the repository layer against a real database:
//! - Project hierarchy creation and cascade delete
//! - Weighted progress recomputation for phases and projects
//! - Row-level visibility for leads and contributors
//! - Unique constraint violations
//! - Budget replacement and summaries

use assert_matches::assert_matches;
use pmo_core::access::ProjectVisibility;
use pmo_db::models::budget::CreateBudgetLine;
use pmo_db::models::contract::CreateContract;
use pmo_db::models::deliverable::{CreateDeliverable, UpdateDeliverable};
use pmo_db::models::document::CreateDocument;
use pmo_db::models::phase::CreatePhase;
use pmo_db::models::project::{CreateProject, ProjectFilter, UpdateProject};
use pmo_db::models::provider::{AssociateProvider, CreateProvider, ProviderFilter};
use pmo_db::models::user::CreateUser;
use pmo_db::repositories::{
    BudgetRepo, ContractRepo, DashboardRepo, DeliverableRepo, DocumentRepo, PhaseRepo,
    ProjectRepo, ProviderRepo, RoleRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str, role: &str) -> i64 {
    let role = RoleRepo::find_by_name(pool, role).await.unwrap().unwrap();
    UserRepo::create(
        pool,
        &CreateUser {
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role_id: role.id,
            org_unit_id: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_project(code: &str) -> CreateProject {
    CreateProject {
        name: format!("Project {code}"),
        code: code.to_string(),
        description: None,
        lead_id: None,
        org_unit_id: None,
        status_id: None,
        budget: Some(10_000.0),
        start_date: None,
        target_end_date: None,
        priority: None,
        health: None,
    }
}

fn new_phase(name: &str) -> CreatePhase {
    CreatePhase {
        name: name.to_string(),
        description: None,
        sort_order: None,
        start_date: None,
        target_end_date: None,
        status: None,
        budget_allocated: None,
        responsible_id: None,
    }
}

fn new_deliverable(name: &str, phase_id: Option<i64>, weight: f64) -> CreateDeliverable {
    CreateDeliverable {
        name: name.to_string(),
        description: None,
        phase_id,
        contract_id: None,
        kind: None,
        due_date: None,
        status: None,
        responsible_id: None,
        weight: Some(weight),
        comments: None,
    }
}

fn new_contract(number: &str, provider_id: Option<i64>, amount: f64) -> CreateContract {
    CreateContract {
        contract_number: number.to_string(),
        title: format!("Contract {number}"),
        provider_id,
        amount: Some(amount),
        signed_on: None,
        start_date: None,
        end_date: None,
        status: None,
        special_terms: None,
    }
}

fn new_provider(name: &str) -> CreateProvider {
    CreateProvider {
        name: name.to_string(),
        registration_number: None,
        address: None,
        contact_name: None,
        contact_email: None,
        contact_phone: None,
        expertise: Some("ERP integration".to_string()),
        provider_type: Some("integrator".to_string()),
        status: None,
    }
}

fn budget_line(category: &str, planned: f64, consumed: f64) -> CreateBudgetLine {
    CreateBudgetLine {
        phase_id: None,
        contract_id: None,
        category: category.to_string(),
        label: format!("{category} line"),
        planned_amount: Some(planned),
        consumed_amount: Some(consumed),
        status: None,
        comments: None,
    }
}

async fn validate(pool: &PgPool, deliverable_id: i64) {
    let input = UpdateDeliverable {
        status: Some("validated".to_string()),
        ..Default::default()
    };
    DeliverableRepo::update(pool, deliverable_id, &input)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_project_applies_defaults(pool: PgPool) {
    let lead = new_user(&pool, "lead@example.com", "project_lead").await;
    let project = ProjectRepo::create(&pool, &new_project("P-001"), lead)
        .await
        .unwrap();

    assert_eq!(project.lead_id, lead);
    assert_eq!(project.priority, "normal");
    assert_eq!(project.health, "green");
    assert_eq!(project.completion_pct, 0);

    let view = ProjectRepo::find_view(&pool, project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.status_code, "planning");
    assert_eq!(view.lead_email, "lead@example.com");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_project_code_is_unique_violation(pool: PgPool) {
    let lead = new_user(&pool, "lead@example.com", "project_lead").await;
    ProjectRepo::create(&pool, &new_project("DUP"), lead)
        .await
        .unwrap();

    let err = ProjectRepo::create(&pool, &new_project("DUP"), lead)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23505")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_empty_update_writes_nothing(pool: PgPool) {
    let lead = new_user(&pool, "lead@example.com", "project_lead").await;
    let project = ProjectRepo::create(&pool, &new_project("P-EMPTY"), lead)
        .await
        .unwrap();

    let rows = ProjectRepo::update(&pool, project.id, &UpdateProject::default())
        .await
        .unwrap();
    assert_eq!(rows, 0);

    let after = ProjectRepo::find_by_id(&pool, project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.updated_at, project.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_partial_update_touches_only_given_fields(pool: PgPool) {
    let lead = new_user(&pool, "lead@example.com", "project_lead").await;
    let project = ProjectRepo::create(&pool, &new_project("P-PATCH"), lead)
        .await
        .unwrap();

    let input = UpdateProject {
        health: Some("amber".to_string()),
        ..Default::default()
    };
    let rows = ProjectRepo::update(&pool, project.id, &input).await.unwrap();
    assert_eq!(rows, 1);

    let after = ProjectRepo::find_by_id(&pool, project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.health, "amber");
    assert_eq!(after.name, project.name);
    assert_eq!(after.budget, project.budget);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_project_delete_cascades_children(pool: PgPool) {
    let lead = new_user(&pool, "lead@example.com", "project_lead").await;
    let project = ProjectRepo::create(&pool, &new_project("P-DEL"), lead)
        .await
        .unwrap();
    let phase = PhaseRepo::create(&pool, project.id, &new_phase("Build"))
        .await
        .unwrap();
    ContractRepo::create(&pool, project.id, lead, &new_contract("C-1", None, 100.0))
        .await
        .unwrap();

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());
    assert!(PhaseRepo::find_by_id(&pool, phase.id).await.unwrap().is_none());
    assert!(!ProjectRepo::delete(&pool, project.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_phase_and_project_progress_follow_weights(pool: PgPool) {
    let lead = new_user(&pool, "lead@example.com", "project_lead").await;
    let project = ProjectRepo::create(&pool, &new_project("P-PROG"), lead)
        .await
        .unwrap();
    let design = PhaseRepo::create(&pool, project.id, &new_phase("Design"))
        .await
        .unwrap();
    let build = PhaseRepo::create(&pool, project.id, &new_phase("Build"))
        .await
        .unwrap();
    assert_eq!(build.sort_order, design.sort_order + 1);

    let blueprint = new_deliverable("Blueprint", Some(design.id), 30.0);
    let blueprint = DeliverableRepo::create(&pool, project.id, &blueprint).await.unwrap();
    let mockups = new_deliverable("Mockups", Some(design.id), 10.0);
    DeliverableRepo::create(&pool, project.id, &mockups)
        .await
        .unwrap();
    let code = new_deliverable("Code", Some(build.id), 60.0);
    DeliverableRepo::create(&pool, project.id, &code).await.unwrap();

    validate(&pool, blueprint.id).await;

    let phase_pct = PhaseRepo::recompute_progress(&pool, design.id).await.unwrap();
    assert_eq!(phase_pct, 75);
    let project_pct = ProjectRepo::recompute_progress(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(project_pct, 30);

    let stored = ProjectRepo::find_by_id(&pool, project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.completion_pct, 30);
    assert_eq!(PhaseRepo::count_deliverables(&pool, design.id).await.unwrap(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_empty_phase_progress_is_zero(pool: PgPool) {
    let lead = new_user(&pool, "lead@example.com", "project_lead").await;
    let project = ProjectRepo::create(&pool, &new_project("P-ZERO"), lead)
        .await
        .unwrap();
    let phase = PhaseRepo::create(&pool, project.id, &new_phase("Empty"))
        .await
        .unwrap();

    assert_eq!(PhaseRepo::recompute_progress(&pool, phase.id).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_visibility_scopes_project_lists(pool: PgPool) {
    let lead_a = new_user(&pool, "a@example.com", "project_lead").await;
    let lead_b = new_user(&pool, "b@example.com", "project_lead").await;
    let contributor = new_user(&pool, "c@example.com", "contributor").await;

    let pa = ProjectRepo::create(&pool, &new_project("PA"), lead_a)
        .await
        .unwrap();
    ProjectRepo::create(&pool, &new_project("PB"), lead_b)
        .await
        .unwrap();

    let mut deliverable = new_deliverable("Report", None, 10.0);
    deliverable.responsible_id = Some(contributor);
    DeliverableRepo::create(&pool, pa.id, &deliverable)
        .await
        .unwrap();

    let filter = ProjectFilter::default();
    let all = ProjectRepo::list(&pool, ProjectVisibility::All, &filter)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let led = ProjectRepo::list(&pool, ProjectVisibility::LedBy(lead_b), &filter)
        .await
        .unwrap();
    assert_eq!(led.len(), 1);
    assert_eq!(led[0].code, "PB");

    let participated =
        ProjectRepo::list(&pool, ProjectVisibility::ParticipatedBy(contributor), &filter)
            .await
            .unwrap();
    assert_eq!(participated.len(), 1);
    assert_eq!(participated[0].id, pa.id);

    let stats = ProjectRepo::portfolio_stats(&pool, ProjectVisibility::LedBy(lead_a))
        .await
        .unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.planning, 1);

    let scope = ProjectRepo::scope_of(&pool, pa.id).await.unwrap().unwrap();
    assert!(scope.is_lead(lead_a));
    assert!(scope.is_participant(contributor));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_project_search_filter(pool: PgPool) {
    let lead = new_user(&pool, "lead@example.com", "project_lead").await;
    ProjectRepo::create(&pool, &new_project("ERP-1"), lead)
        .await
        .unwrap();
    ProjectRepo::create(&pool, &new_project("WEB-1"), lead)
        .await
        .unwrap();

    let filter = ProjectFilter {
        search: Some("erp".to_string()),
        status: Some("planning".to_string()),
    };
    let found = ProjectRepo::list(&pool, ProjectVisibility::All, &filter)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].code, "ERP-1");
}

// ---------------------------------------------------------------------------
// Providers, contracts, documents, budget
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_provider_association_is_upsert(pool: PgPool) {
    let lead = new_user(&pool, "lead@example.com", "project_lead").await;
    let project = ProjectRepo::create(&pool, &new_project("P-PROV"), lead)
        .await
        .unwrap();
    let provider = ProviderRepo::create(&pool, &new_provider("Acme"))
        .await
        .unwrap();
    assert_eq!(provider.status, "active");

    let mut link = AssociateProvider {
        provider_id: provider.id,
        role_in_project: Some("Integrator".to_string()),
        start_date: None,
        end_date: None,
        status: None,
    };
    let first = ProviderRepo::associate(&pool, project.id, &link)
        .await
        .unwrap();
    link.role_in_project = Some("Support".to_string());
    let second = ProviderRepo::associate(&pool, project.id, &link)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.role_in_project.as_deref(), Some("Support"));
    assert_eq!(ProviderRepo::list_for_project(&pool, project.id).await.unwrap().len(), 1);
    assert_eq!(ProviderRepo::projects_of(&pool, provider.id).await.unwrap().len(), 1);

    assert!(ProviderRepo::dissociate(&pool, project.id, provider.id).await.unwrap());
    assert!(!ProviderRepo::dissociate(&pool, project.id, provider.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_provider_contract_counts_and_filters(pool: PgPool) {
    let lead = new_user(&pool, "lead@example.com", "project_lead").await;
    let project = ProjectRepo::create(&pool, &new_project("P-C"), lead)
        .await
        .unwrap();
    let acme = ProviderRepo::create(&pool, &new_provider("Acme"))
        .await
        .unwrap();
    ProviderRepo::create(&pool, &new_provider("Globex"))
        .await
        .unwrap();
    ContractRepo::create(&pool, project.id, lead, &new_contract("C-10", Some(acme.id), 1_500.0))
        .await
        .unwrap();

    assert_eq!(ProviderRepo::count_contracts(&pool, acme.id).await.unwrap(), 1);

    let view = ProviderRepo::find_view(&pool, acme.id).await.unwrap().unwrap();
    assert_eq!(view.contract_count, 1);
    assert_eq!(view.contracted_amount, 1_500.0);

    let filter = ProviderFilter {
        search: Some("glob".to_string()),
        ..Default::default()
    };
    let found = ProviderRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].provider.name, "Globex");

    let stats = ProviderRepo::stats(&pool).await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.with_contracts, 1);
    assert_eq!(stats.total_contracted, 1_500.0);

    assert!(ProviderRepo::update_status(&pool, acme.id, "suspended").await.unwrap());
    assert_eq!(ContractRepo::list_by_provider(&pool, acme.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_document_metadata_roundtrip(pool: PgPool) {
    let lead = new_user(&pool, "lead@example.com", "project_lead").await;
    let project = ProjectRepo::create(&pool, &new_project("P-DOC"), lead)
        .await
        .unwrap();

    let input = CreateDocument {
        phase_id: None,
        deliverable_id: None,
        contract_id: None,
        file_name: "a1b2.pdf".to_string(),
        original_name: "charter.pdf".to_string(),
        storage_path: "projects/1/a1b2.pdf".to_string(),
        size_bytes: 2048,
        mime_type: Some("application/pdf".to_string()),
        category: None,
        description: None,
        version: None,
    };
    let doc = DocumentRepo::create(&pool, project.id, lead, &input)
        .await
        .unwrap();
    assert_eq!(doc.category, "other");
    assert_eq!(doc.version, "1.0");

    let listed = DocumentRepo::list_by_project(&pool, project.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].uploaded_by_name.as_deref(), Some("lead"));

    // The uploader now participates in the project.
    let ids = ProjectRepo::participant_ids(&pool, project.id).await.unwrap();
    assert_eq!(ids, vec![lead]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_budget_replace_and_summary(pool: PgPool) {
    let lead = new_user(&pool, "lead@example.com", "project_lead").await;
    let project = ProjectRepo::create(&pool, &new_project("P-BUD"), lead)
        .await
        .unwrap();
    BudgetRepo::create(&pool, project.id, lead, &budget_line("other", 99.0, 0.0))
        .await
        .unwrap();

    let lines = vec![
        budget_line("personnel", 6_000.0, 2_000.0),
        budget_line("software", 1_000.0, 500.0),
    ];
    let written = BudgetRepo::replace_for_project(&pool, project.id, lead, &lines)
        .await
        .unwrap();
    assert_eq!(written, 2);
    assert_eq!(BudgetRepo::list_by_project(&pool, project.id).await.unwrap().len(), 2);

    let summary = BudgetRepo::summary(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(summary.total_planned, 7_000.0);
    assert_eq!(summary.total_consumed, 2_500.0);
    assert_eq!(summary.remaining, Some(7_500.0));
    assert_eq!(summary.consumption_pct, Some(25.0));

    assert!(BudgetRepo::summary(&pool, 999_999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_budget_replace_is_atomic(pool: PgPool) {
    let lead = new_user(&pool, "lead@example.com", "project_lead").await;
    let project = ProjectRepo::create(&pool, &new_project("P-ATOM"), lead)
        .await
        .unwrap();
    BudgetRepo::create(&pool, project.id, lead, &budget_line("other", 10.0, 0.0))
        .await
        .unwrap();

    // The second line violates the category check, so nothing is replaced.
    let lines = vec![budget_line("personnel", 1.0, 0.0), budget_line("travel", 1.0, 0.0)];
    let result = BudgetRepo::replace_for_project(&pool, project.id, lead, &lines).await;
    assert!(result.is_err());

    let remaining = BudgetRepo::list_by_project(&pool, project.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].line.category, "other");
}

// ---------------------------------------------------------------------------
// Users and dashboards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_user_soft_delete(pool: PgPool) {
    let id = new_user(&pool, "gone@example.com", "contributor").await;

    assert!(UserRepo::is_active(&pool, id).await.unwrap());
    assert!(UserRepo::deactivate(&pool, id).await.unwrap());
    assert!(!UserRepo::deactivate(&pool, id).await.unwrap());

    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(user.status, "inactive");
    assert!(!UserRepo::is_active(&pool, id).await.unwrap());

    let stats = UserRepo::stats(&pool).await.unwrap();
    assert_eq!(stats.inactive, 1);
    assert_eq!(stats.contributors, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_by_email_ignores_case(pool: PgPool) {
    let id = new_user(&pool, "Mixed@Example.com", "contributor").await;
    let user = UserRepo::find_by_email(&pool, "mixed@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.id, id);

    let response = UserRepo::find_response(&pool, id).await.unwrap().unwrap();
    assert_eq!(response.role_name, "contributor");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_dashboard_queries_on_seeded_portfolio(pool: PgPool) {
    let lead = new_user(&pool, "lead@example.com", "project_lead").await;
    let mut late = new_project("LATE");
    late.target_end_date = Some(chrono::Utc::now().date_naive() - chrono::Duration::days(3));
    let late = ProjectRepo::create(&pool, &late, lead).await.unwrap();

    let mut deliverable = new_deliverable("Overdue report", None, 10.0);
    deliverable.due_date = Some(chrono::Utc::now().date_naive() - chrono::Duration::days(2));
    DeliverableRepo::create(&pool, late.id, &deliverable)
        .await
        .unwrap();

    let kpis = DashboardRepo::kpis(&pool).await.unwrap();
    assert_eq!(kpis.total, 1);
    assert_eq!(kpis.overdue, 1);

    let overdue = DashboardRepo::overdue_deliverables(&pool).await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].days_late, 2);

    let candidates = DashboardRepo::alert_candidates(&pool).await.unwrap();
    assert_eq!(candidates.len(), 1);

    let by_unit = DashboardRepo::by_org_unit(&pool).await.unwrap();
    assert_eq!(by_unit.len(), 6);
    let by_status = DashboardRepo::by_status(&pool).await.unwrap();
    assert_eq!(by_status[0].status_code, "planning");
    assert_eq!(by_status[0].project_count, 1);

    let monthly = DashboardRepo::monthly(&pool, 12).await.unwrap();
    assert_eq!(monthly.iter().map(|m| m.created).sum::<i64>(), 1);

    // Planning projects are not on the attention list.
    assert!(DashboardRepo::attention_list(&pool).await.unwrap().is_empty());

    let export = DashboardRepo::export_rows(&pool).await.unwrap();
    assert_eq!(export[0].deliverable_count, 1);
    assert_eq!(DashboardRepo::lead_workload(&pool).await.unwrap().len(), 1);
}
