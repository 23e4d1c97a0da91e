//! Repository for the `budget_lines` table and project budget roll-ups.

use pmo_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::budget::{
    BudgetLine, BudgetLineView, BudgetSummary, CategoryTotal, CreateBudgetLine, UpdateBudgetLine,
};
use crate::patch::UpdateAssembler;
use crate::repositories::contract_repo::ContractRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, phase_id, contract_id, category, label, planned_amount, \
                       consumed_amount, status, comments, created_by, created_at, updated_at";

const INSERT: &str = "INSERT INTO budget_lines
        (project_id, phase_id, contract_id, category, label, planned_amount, consumed_amount,
         status, comments, created_by)
     VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0::DOUBLE PRECISION),
             COALESCE($7, 0::DOUBLE PRECISION), COALESCE($8, 'planned'), $9, $10)";

/// Provides CRUD and roll-up operations for budget lines.
pub struct BudgetRepo;

impl BudgetRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        created_by: DbId,
        input: &CreateBudgetLine,
    ) -> Result<BudgetLine, sqlx::Error> {
        let query = format!("{INSERT} RETURNING {COLUMNS}");
        sqlx::query_as::<_, BudgetLine>(&query)
            .bind(project_id)
            .bind(input.phase_id)
            .bind(input.contract_id)
            .bind(&input.category)
            .bind(&input.label)
            .bind(input.planned_amount)
            .bind(input.consumed_amount)
            .bind(&input.status)
            .bind(&input.comments)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BudgetLine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM budget_lines WHERE id = $1");
        sqlx::query_as::<_, BudgetLine>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Budget lines of a project grouped by category.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<BudgetLineView>, sqlx::Error> {
        sqlx::query_as::<_, BudgetLineView>(
            "SELECT b.id, b.project_id, b.phase_id, b.contract_id, b.category, b.label,
                    b.planned_amount, b.consumed_amount, b.status, b.comments, b.created_by,
                    b.created_at, b.updated_at,
                    ph.name AS phase_name,
                    c.title AS contract_title
             FROM budget_lines b
             LEFT JOIN phases ph ON ph.id = b.phase_id
             LEFT JOIN contracts c ON c.id = b.contract_id
             WHERE b.project_id = $1
             ORDER BY b.category, b.id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Apply the `Some` fields of `input`. Returns the number of rows written.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBudgetLine,
    ) -> Result<u64, sqlx::Error> {
        let mut patch = UpdateAssembler::new("budget_lines");
        patch
            .set("phase_id", input.phase_id)
            .set("contract_id", input.contract_id)
            .set("category", input.category.as_deref())
            .set("label", input.label.as_deref())
            .set("planned_amount", input.planned_amount)
            .set("consumed_amount", input.consumed_amount)
            .set("status", input.status.as_deref())
            .set("comments", input.comments.as_deref());
        patch.execute(pool, id).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM budget_lines WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace every line of a project with `lines` in one transaction.
    /// Returns the number of lines written.
    pub async fn replace_for_project(
        pool: &PgPool,
        project_id: DbId,
        created_by: DbId,
        lines: &[CreateBudgetLine],
    ) -> Result<usize, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM budget_lines WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        for line in lines {
            Self::insert_in(&mut tx, project_id, created_by, line).await?;
        }

        tx.commit().await?;
        Ok(lines.len())
    }

    async fn insert_in(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
        created_by: DbId,
        input: &CreateBudgetLine,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(INSERT)
            .bind(project_id)
            .bind(input.phase_id)
            .bind(input.contract_id)
            .bind(&input.category)
            .bind(&input.label)
            .bind(input.planned_amount)
            .bind(input.consumed_amount)
            .bind(&input.status)
            .bind(&input.comments)
            .bind(created_by)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Planned and consumed totals per category.
    pub async fn category_totals(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<CategoryTotal>, sqlx::Error> {
        sqlx::query_as::<_, CategoryTotal>(
            "SELECT category,
                    COALESCE(SUM(planned_amount), 0)::DOUBLE PRECISION AS planned,
                    COALESCE(SUM(consumed_amount), 0)::DOUBLE PRECISION AS consumed,
                    COUNT(*) AS line_count
             FROM budget_lines
             WHERE project_id = $1
             GROUP BY category
             ORDER BY category",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Roll the project's lines and contracts up against its approved
    /// budget. `None` if the project does not exist.
    pub async fn summary(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<BudgetSummary>, sqlx::Error> {
        let approved: Option<Option<f64>> =
            sqlx::query_scalar("SELECT budget FROM projects WHERE id = $1")
                .bind(project_id)
                .fetch_optional(pool)
                .await?;
        let Some(approved_budget) = approved else {
            return Ok(None);
        };

        let by_category = Self::category_totals(pool, project_id).await?;
        let contracted_amount = ContractRepo::total_for_project(pool, project_id).await?;
        Ok(Some(summarize(
            project_id,
            approved_budget,
            contracted_amount,
            by_category,
        )))
    }
}

/// Fold per-category totals into a [`BudgetSummary`].
fn summarize(
    project_id: DbId,
    approved_budget: Option<f64>,
    contracted_amount: f64,
    by_category: Vec<CategoryTotal>,
) -> BudgetSummary {
    let total_planned = by_category.iter().map(|c| c.planned).sum();
    let total_consumed: f64 = by_category.iter().map(|c| c.consumed).sum();
    let remaining = approved_budget.map(|b| b - total_consumed);
    let consumption_pct = approved_budget
        .filter(|b| *b > 0.0)
        .map(|b| (total_consumed / b * 1000.0).round() / 10.0);

    BudgetSummary {
        project_id,
        approved_budget,
        total_planned,
        total_consumed,
        remaining,
        consumption_pct,
        contracted_amount,
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(category: &str, planned: f64, consumed: f64) -> CategoryTotal {
        CategoryTotal {
            category: category.to_string(),
            planned,
            consumed,
            line_count: 1,
        }
    }

    #[test]
    fn summary_against_approved_budget() {
        let s = summarize(
            7,
            Some(10_000.0),
            2_500.0,
            vec![total("personnel", 6_000.0, 3_000.0), total("software", 2_000.0, 333.0)],
        );
        assert_eq!(s.total_planned, 8_000.0);
        assert_eq!(s.total_consumed, 3_333.0);
        assert_eq!(s.remaining, Some(6_667.0));
        assert_eq!(s.consumption_pct, Some(33.3));
        assert_eq!(s.contracted_amount, 2_500.0);
    }

    #[test]
    fn summary_without_budget_has_no_ratio() {
        let s = summarize(7, None, 0.0, vec![total("other", 100.0, 50.0)]);
        assert_eq!(s.remaining, None);
        assert_eq!(s.consumption_pct, None);
    }

    #[test]
    fn zero_budget_has_remaining_but_no_ratio() {
        let s = summarize(7, Some(0.0), 0.0, vec![]);
        assert_eq!(s.remaining, Some(0.0));
        assert_eq!(s.consumption_pct, None);
    }
}
