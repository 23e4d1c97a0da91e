//! Repository for the `contracts` table.

use pmo_core::types::DbId;
use sqlx::PgPool;

use crate::models::contract::{Contract, ContractView, CreateContract, UpdateContract};
use crate::patch::UpdateAssembler;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, contract_number, title, provider_id, amount, signed_on, \
                       start_date, end_date, status, special_terms, created_by, created_at, \
                       updated_at";

const VIEW_SELECT: &str = "SELECT c.id, c.project_id, c.contract_number, c.title, c.provider_id,
        c.amount, c.signed_on, c.start_date, c.end_date, c.status, c.special_terms,
        c.created_by, c.created_at, c.updated_at,
        pr.name AS provider_name,
        u.name AS created_by_name,
        p.name AS project_name
     FROM contracts c
     JOIN projects p ON p.id = c.project_id
     LEFT JOIN providers pr ON pr.id = c.provider_id
     LEFT JOIN users u ON u.id = c.created_by";

/// Provides CRUD operations for contracts.
pub struct ContractRepo;

impl ContractRepo {
    /// Insert a contract authored by `created_by`. Status defaults to
    /// `negotiation`.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        created_by: DbId,
        input: &CreateContract,
    ) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts
                (project_id, contract_number, title, provider_id, amount, signed_on,
                 start_date, end_date, status, special_terms, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 'negotiation'), $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(project_id)
            .bind(&input.contract_number)
            .bind(&input.title)
            .bind(input.provider_id)
            .bind(input.amount)
            .bind(input.signed_on)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.status)
            .bind(&input.special_terms)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE id = $1");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_view(pool: &PgPool, id: DbId) -> Result<Option<ContractView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE c.id = $1");
        sqlx::query_as::<_, ContractView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Contracts of a project in creation order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ContractView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE c.project_id = $1 ORDER BY c.created_at, c.id");
        sqlx::query_as::<_, ContractView>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Contracts held by a provider, newest first.
    pub async fn list_by_provider(
        pool: &PgPool,
        provider_id: DbId,
    ) -> Result<Vec<ContractView>, sqlx::Error> {
        let query =
            format!("{VIEW_SELECT} WHERE c.provider_id = $1 ORDER BY c.created_at DESC, c.id");
        sqlx::query_as::<_, ContractView>(&query)
            .bind(provider_id)
            .fetch_all(pool)
            .await
    }

    /// Apply the `Some` fields of `input`. Returns the number of rows written.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContract,
    ) -> Result<u64, sqlx::Error> {
        let mut patch = UpdateAssembler::new("contracts");
        patch
            .set("contract_number", input.contract_number.as_deref())
            .set("title", input.title.as_deref())
            .set("provider_id", input.provider_id)
            .set("amount", input.amount)
            .set("signed_on", input.signed_on)
            .set("start_date", input.start_date)
            .set("end_date", input.end_date)
            .set("status", input.status.as_deref())
            .set("special_terms", input.special_terms.as_deref());
        patch.execute(pool, id).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Sum of contract amounts for a project.
    pub async fn total_for_project(pool: &PgPool, project_id: DbId) -> Result<f64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0)::DOUBLE PRECISION FROM contracts WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }
}
