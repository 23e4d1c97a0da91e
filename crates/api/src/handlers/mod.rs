pub mod auth;
pub mod budget;
pub mod contract;
pub mod dashboard;
pub mod deliverable;
pub mod document;
pub mod phase;
pub mod project;
pub mod provider;
pub mod reference;
pub mod report;
pub mod user;

use pmo_core::access::{ProjectScope, ResourceKind};
use pmo_core::error::CoreError;
use pmo_core::types::DbId;
use pmo_db::repositories::{ContractRepo, DeliverableRepo, PhaseRepo, ProjectRepo};
use pmo_events::DomainEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Ownership scope of a project, or 404 when it does not exist.
pub(crate) async fn project_scope(state: &AppState, project_id: DbId) -> AppResult<ProjectScope> {
    ProjectRepo::scope_of(&state.pool, project_id)
        .await?
        .ok_or(AppError::not_found("Project", project_id))
}

/// Publish `<kind>.<action>` for entity `id`, attributed to `user`.
pub(crate) fn publish(
    state: &AppState,
    user: &AuthUser,
    kind: ResourceKind,
    id: DbId,
    action: &str,
    payload: serde_json::Value,
) {
    state.event_bus.publish(
        DomainEvent::on(kind, id, action)
            .by(user.user_id)
            .with_payload(payload),
    );
}

/// Optional references from a project child to its siblings.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ProjectLinks {
    pub phase_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub deliverable_id: Option<DbId>,
}

impl ProjectLinks {
    /// Reject any referenced phase, contract or deliverable that belongs to
    /// a project other than `project_id`.
    pub(crate) async fn check(&self, state: &AppState, project_id: DbId) -> AppResult<()> {
        if let Some(phase_id) = self.phase_id {
            let phase = PhaseRepo::find_by_id(&state.pool, phase_id)
                .await?
                .ok_or(AppError::not_found("Phase", phase_id))?;
            ensure_same_project("Phase", phase_id, phase.project_id, project_id)?;
        }
        if let Some(contract_id) = self.contract_id {
            let contract = ContractRepo::find_by_id(&state.pool, contract_id)
                .await?
                .ok_or(AppError::not_found("Contract", contract_id))?;
            ensure_same_project("Contract", contract_id, contract.project_id, project_id)?;
        }
        if let Some(deliverable_id) = self.deliverable_id {
            let deliverable = DeliverableRepo::find_by_id(&state.pool, deliverable_id)
                .await?
                .ok_or(AppError::not_found("Deliverable", deliverable_id))?;
            ensure_same_project(
                "Deliverable",
                deliverable_id,
                deliverable.project_id,
                project_id,
            )?;
        }
        Ok(())
    }
}

fn ensure_same_project(entity: &str, id: DbId, owner: DbId, project_id: DbId) -> AppResult<()> {
    if owner == project_id {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Validation(format!(
        "{entity} {id} does not belong to project {project_id}"
    ))))
}
