//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod audit_repo;
pub mod budget_repo;
pub mod contract_repo;
pub mod dashboard_repo;
pub mod deliverable_repo;
pub mod document_repo;
pub mod phase_repo;
pub mod project_repo;
pub mod provider_repo;
pub mod reference_repo;
pub mod user_repo;
mod visibility;

pub use audit_repo::AuditRepo;
pub use budget_repo::BudgetRepo;
pub use contract_repo::ContractRepo;
pub use dashboard_repo::DashboardRepo;
pub use deliverable_repo::DeliverableRepo;
pub use document_repo::DocumentRepo;
pub use phase_repo::PhaseRepo;
pub use project_repo::ProjectRepo;
pub use provider_repo::ProviderRepo;
pub use reference_repo::ReferenceRepo;
pub use user_repo::{RoleRepo, UserRepo};
