//! Repository for the `providers` and `project_providers` tables.

use pmo_core::types::DbId;
use pmo_core::vocab::PROVIDER_STATUS_ACTIVE;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::provider::{
    AssociateProvider, CreateProvider, ProjectProviderView, Provider, ProviderFilter,
    ProviderProject, ProviderStats, ProviderTypeCount, ProviderView, UpdateProvider,
};
use crate::patch::UpdateAssembler;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, registration_number, address, contact_name, contact_email, \
                       contact_phone, expertise, provider_type, status, created_at, updated_at";

const VIEW_SELECT: &str = "SELECT pr.id, pr.name, pr.registration_number, pr.address,
        pr.contact_name, pr.contact_email, pr.contact_phone, pr.expertise, pr.provider_type,
        pr.status, pr.created_at, pr.updated_at,
        (SELECT COUNT(*) FROM contracts c WHERE c.provider_id = pr.id) AS contract_count,
        (SELECT COUNT(*) FROM project_providers pp WHERE pp.provider_id = pr.id) AS project_count,
        (SELECT COALESCE(SUM(c.amount), 0)::DOUBLE PRECISION
            FROM contracts c WHERE c.provider_id = pr.id) AS contracted_amount
     FROM providers pr";

const ASSOCIATION_SELECT: &str = "SELECT pp.id, pp.project_id, pp.provider_id,
        pp.role_in_project, pp.start_date, pp.end_date, pp.status,
        pr.name AS provider_name, pr.contact_email, pr.contact_phone,
        pp.created_at, pp.updated_at
     FROM project_providers pp
     JOIN providers pr ON pr.id = pp.provider_id";

/// Provides CRUD operations for providers and their project assignments.
pub struct ProviderRepo;

impl ProviderRepo {
    pub async fn create(pool: &PgPool, input: &CreateProvider) -> Result<Provider, sqlx::Error> {
        let query = format!(
            "INSERT INTO providers
                (name, registration_number, address, contact_name, contact_email,
                 contact_phone, expertise, provider_type, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, $10))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Provider>(&query)
            .bind(&input.name)
            .bind(&input.registration_number)
            .bind(&input.address)
            .bind(&input.contact_name)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(&input.expertise)
            .bind(&input.provider_type)
            .bind(&input.status)
            .bind(PROVIDER_STATUS_ACTIVE)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Provider>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM providers WHERE id = $1");
        sqlx::query_as::<_, Provider>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_view(pool: &PgPool, id: DbId) -> Result<Option<ProviderView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE pr.id = $1");
        sqlx::query_as::<_, ProviderView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List providers by name. `search` matches name, expertise or contact
    /// name case-insensitively.
    pub async fn list(
        pool: &PgPool,
        filter: &ProviderFilter,
    ) -> Result<Vec<ProviderView>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("{VIEW_SELECT} WHERE TRUE"));

        if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
            builder.push(" AND pr.status = ").push_bind(status.to_string());
        }
        if let Some(kind) = filter.provider_type.as_deref().filter(|s| !s.is_empty()) {
            builder.push(" AND pr.provider_type = ").push_bind(kind.to_string());
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            builder
                .push(" AND (pr.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR pr.expertise ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR pr.contact_name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        builder.push(" ORDER BY pr.name, pr.id");

        builder.build_query_as::<ProviderView>().fetch_all(pool).await
    }

    /// Apply the `Some` fields of `input`. Returns the number of rows written.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProvider,
    ) -> Result<u64, sqlx::Error> {
        let mut patch = UpdateAssembler::new("providers");
        patch
            .set("name", input.name.as_deref())
            .set("registration_number", input.registration_number.as_deref())
            .set("address", input.address.as_deref())
            .set("contact_name", input.contact_name.as_deref())
            .set("contact_email", input.contact_email.as_deref())
            .set("contact_phone", input.contact_phone.as_deref())
            .set("expertise", input.expertise.as_deref())
            .set("provider_type", input.provider_type.as_deref())
            .set("status", input.status.as_deref());
        patch.execute(pool, id).await
    }

    /// Set only the provider status. Returns `true` if the row exists.
    pub async fn update_status(pool: &PgPool, id: DbId, status: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE providers SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM providers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of contracts held by the provider.
    pub async fn count_contracts(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM contracts WHERE provider_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn stats(pool: &PgPool) -> Result<ProviderStats, sqlx::Error> {
        sqlx::query_as::<_, ProviderStats>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE pr.status = 'active') AS active,
                COUNT(*) FILTER (WHERE pr.status = 'inactive') AS inactive,
                COUNT(*) FILTER (WHERE pr.status = 'suspended') AS suspended,
                COUNT(*) FILTER (WHERE EXISTS
                    (SELECT 1 FROM contracts c WHERE c.provider_id = pr.id)) AS with_contracts,
                (SELECT COALESCE(SUM(amount), 0)::DOUBLE PRECISION
                    FROM contracts WHERE provider_id IS NOT NULL) AS total_contracted
             FROM providers pr",
        )
        .fetch_one(pool)
        .await
    }

    /// Provider counts per non-empty type, most common first.
    pub async fn type_counts(pool: &PgPool) -> Result<Vec<ProviderTypeCount>, sqlx::Error> {
        sqlx::query_as::<_, ProviderTypeCount>(
            "SELECT provider_type, COUNT(*) AS count
             FROM providers
             WHERE provider_type IS NOT NULL AND provider_type <> ''
             GROUP BY provider_type
             ORDER BY count DESC, provider_type",
        )
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Project association
    // -----------------------------------------------------------------------

    /// Attach a provider to a project. An existing pair is updated in place.
    pub async fn associate(
        pool: &PgPool,
        project_id: DbId,
        input: &AssociateProvider,
    ) -> Result<ProjectProviderView, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO project_providers
                (project_id, provider_id, role_in_project, start_date, end_date, status)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'active'))
             ON CONFLICT (project_id, provider_id) DO UPDATE SET
                role_in_project = EXCLUDED.role_in_project,
                start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date,
                status = EXCLUDED.status,
                updated_at = NOW()
             RETURNING id",
        )
        .bind(project_id)
        .bind(input.provider_id)
        .bind(&input.role_in_project)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.status)
        .fetch_one(pool)
        .await?;

        let query = format!("{ASSOCIATION_SELECT} WHERE pp.id = $1");
        sqlx::query_as::<_, ProjectProviderView>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Remove a provider from a project. Returns `true` if a link existed.
    pub async fn dissociate(
        pool: &PgPool,
        project_id: DbId,
        provider_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_providers WHERE project_id = $1 AND provider_id = $2")
                .bind(project_id)
                .bind(provider_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Providers attached to a project, by provider name.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectProviderView>, sqlx::Error> {
        let query = format!("{ASSOCIATION_SELECT} WHERE pp.project_id = $1 ORDER BY pr.name");
        sqlx::query_as::<_, ProjectProviderView>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Projects the provider is attached to, newest assignment first.
    pub async fn projects_of(
        pool: &PgPool,
        provider_id: DbId,
    ) -> Result<Vec<ProviderProject>, sqlx::Error> {
        sqlx::query_as::<_, ProviderProject>(
            "SELECT p.id AS project_id, p.name AS project_name, p.code AS project_code,
                    pp.role_in_project, pp.start_date, pp.end_date, pp.status
             FROM project_providers pp
             JOIN projects p ON p.id = pp.project_id
             WHERE pp.provider_id = $1
             ORDER BY pp.created_at DESC, pp.id DESC",
        )
        .bind(provider_id)
        .fetch_all(pool)
        .await
    }
}
