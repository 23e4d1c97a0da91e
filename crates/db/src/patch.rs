//! Partial-update assembly shared by every repository.
//!
//! Each repository maps the fields of its `UpdateX` DTO onto columns with
//! [`UpdateAssembler::set`]; only `Some` values become assignments. The
//! statement always refreshes `updated_at` and is keyed on `id`, which can
//! never be assigned.

use sqlx::{Encode, PgPool, Postgres, QueryBuilder, Type};

use pmo_core::types::DbId;

/// Builds `UPDATE <table> SET col = $n, ..., updated_at = NOW() WHERE id = $m`.
pub struct UpdateAssembler<'a> {
    builder: QueryBuilder<'a, Postgres>,
    applied: usize,
}

impl<'a> UpdateAssembler<'a> {
    pub fn new(table: &str) -> Self {
        Self {
            builder: QueryBuilder::new(format!("UPDATE {table} SET ")),
            applied: 0,
        }
    }

    /// Add `column = value` when `value` is `Some`. `None` leaves the column
    /// untouched. The `id` column is ignored.
    pub fn set<T>(&mut self, column: &'static str, value: Option<T>) -> &mut Self
    where
        T: 'a + Encode<'a, Postgres> + Type<Postgres> + Send,
    {
        let Some(value) = value else {
            return self;
        };
        if column == "id" {
            return self;
        }
        if self.applied > 0 {
            self.builder.push(", ");
        }
        self.builder.push(column).push(" = ").push_bind(value);
        self.applied += 1;
        self
    }

    /// Number of columns that will be written.
    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn is_empty(&self) -> bool {
        self.applied == 0
    }

    /// The `UPDATE ... SET` text assembled so far. The timestamp refresh and
    /// the `WHERE id` clause are appended by [`execute`](Self::execute).
    pub fn sql(&self) -> &str {
        self.builder.sql()
    }

    /// Run the update against row `id`, returning the number of rows
    /// affected.
    ///
    /// With no fields set nothing is sent to the database and `0` is
    /// returned; callers that already checked existence read that as
    /// "nothing to update".
    pub async fn execute(mut self, pool: &PgPool, id: DbId) -> Result<u64, sqlx::Error> {
        if self.applied == 0 {
            return Ok(0);
        }
        self.builder
            .push(", updated_at = NOW() WHERE id = ")
            .push_bind(id);
        let result = self.builder.build().execute(pool).await?;
        tracing::debug!(fields = self.applied, id, "Applied partial update");
        Ok(result.rows_affected())
    }
}
