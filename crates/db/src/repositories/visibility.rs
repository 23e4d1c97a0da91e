//! Row-level project visibility as SQL predicates.

use pmo_core::access::ProjectVisibility;
use sqlx::{Postgres, QueryBuilder};

/// Append `AND <predicate>` restricting the `projects` row aliased `alias`
/// to what `visibility` allows. [`ProjectVisibility::All`] appends nothing.
pub(crate) fn push_visibility(
    builder: &mut QueryBuilder<'_, Postgres>,
    visibility: ProjectVisibility,
    alias: &str,
) {
    match visibility {
        ProjectVisibility::All => {}
        ProjectVisibility::LedBy(user_id) => {
            builder
                .push(format!(" AND {alias}.lead_id = "))
                .push_bind(user_id);
        }
        ProjectVisibility::ParticipatedBy(user_id) => {
            builder
                .push(format!(
                    " AND (EXISTS (SELECT 1 FROM phases v WHERE v.project_id = {alias}.id \
                     AND v.responsible_id = "
                ))
                .push_bind(user_id)
                .push(format!(
                    ") OR EXISTS (SELECT 1 FROM deliverables v WHERE v.project_id = {alias}.id \
                     AND (v.responsible_id = "
                ))
                .push_bind(user_id)
                .push(" OR v.validator_id = ")
                .push_bind(user_id)
                .push(format!(
                    ")) OR EXISTS (SELECT 1 FROM documents v WHERE v.project_id = {alias}.id \
                     AND v.uploaded_by = "
                ))
                .push_bind(user_id)
                .push("))");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_adds_no_predicate() {
        let mut b = QueryBuilder::<Postgres>::new("SELECT 1 FROM projects p WHERE TRUE");
        push_visibility(&mut b, ProjectVisibility::All, "p");
        assert_eq!(b.sql(), "SELECT 1 FROM projects p WHERE TRUE");
    }

    #[test]
    fn lead_filters_on_lead_id() {
        let mut b = QueryBuilder::<Postgres>::new("SELECT 1 FROM projects p WHERE TRUE");
        push_visibility(&mut b, ProjectVisibility::LedBy(7), "p");
        assert_eq!(b.sql(), "SELECT 1 FROM projects p WHERE TRUE AND p.lead_id = $1");
    }

    #[test]
    fn participant_checks_every_child_table() {
        let mut b = QueryBuilder::<Postgres>::new("WHERE TRUE");
        push_visibility(&mut b, ProjectVisibility::ParticipatedBy(7), "p");
        let sql = b.sql();
        assert!(sql.contains("FROM phases v WHERE v.project_id = p.id"));
        assert!(sql.contains("v.validator_id = $3"));
        assert!(sql.contains("v.uploaded_by = $4"));
    }
}
