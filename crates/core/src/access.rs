//! Role-based access control over the project portfolio.
//!
//! Every decision is a pure function of the caller ([`Principal`]), the kind
//! of resource, and the ownership of the project that resource belongs to
//! ([`ProjectScope`]). Handlers load the scope, then call one of the
//! `require_*` functions before touching the store.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::roles::{Role, ROLE_FUNCTIONAL_ADMIN, ROLE_PORTFOLIO_DIRECTOR};
use crate::types::DbId;

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: DbId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// What is being accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Project,
    Phase,
    Deliverable,
    Contract,
    Document,
    BudgetLine,
    Provider,
    User,
    Report,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Phase => "phase",
            Self::Deliverable => "deliverable",
            Self::Contract => "contract",
            Self::Document => "document",
            Self::BudgetLine => "budget_line",
            Self::Provider => "provider",
            Self::User => "user",
            Self::Report => "report",
        }
    }

    /// Human-readable name for messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BudgetLine => "budget line",
            other => other.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Create,
    Modify,
    Delete,
}

impl Action {
    fn verb(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Delete => "delete",
        }
    }
}

/// Ownership of the project a resource belongs to.
///
/// `participant_ids` are users named responsible, validator or uploader on
/// any of the project's children; they bound contributor visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectScope {
    pub lead_id: Option<DbId>,
    pub participant_ids: Vec<DbId>,
}

impl ProjectScope {
    /// Scope for resources that are not tied to a project (providers, users).
    pub fn unscoped() -> Self {
        Self::default()
    }

    pub fn led_by(lead_id: DbId) -> Self {
        Self {
            lead_id: Some(lead_id),
            participant_ids: Vec::new(),
        }
    }

    pub fn with_participants(mut self, participant_ids: Vec<DbId>) -> Self {
        self.participant_ids = participant_ids;
        self
    }

    pub fn is_lead(&self, user_id: DbId) -> bool {
        self.lead_id == Some(user_id)
    }

    pub fn is_participant(&self, user_id: DbId) -> bool {
        self.participant_ids.contains(&user_id)
    }
}

/// Which projects a principal may see in list and aggregate queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectVisibility {
    All,
    LedBy(DbId),
    ParticipatedBy(DbId),
}

pub fn project_visibility(principal: &Principal) -> ProjectVisibility {
    match principal.role {
        Role::FunctionalAdmin | Role::PortfolioDirector => ProjectVisibility::All,
        Role::ProjectLead => ProjectVisibility::LedBy(principal.user_id),
        Role::Contributor => ProjectVisibility::ParticipatedBy(principal.user_id),
    }
}

/// The single decision table behind every predicate.
pub fn is_allowed(
    action: Action,
    kind: ResourceKind,
    principal: &Principal,
    scope: &ProjectScope,
) -> bool {
    match principal.role {
        Role::FunctionalAdmin => true,
        Role::PortfolioDirector => !matches!(kind, ResourceKind::User),
        Role::ProjectLead => match kind {
            ResourceKind::Project => {
                matches!(action, Action::View | Action::Modify) && scope.is_lead(principal.user_id)
            }
            ResourceKind::Provider => action == Action::View,
            ResourceKind::User | ResourceKind::Report => false,
            _ => scope.is_lead(principal.user_id),
        },
        Role::Contributor => match kind {
            ResourceKind::Provider | ResourceKind::User | ResourceKind::Report => false,
            _ => action == Action::View && scope.is_participant(principal.user_id),
        },
    }
}

pub fn can_view(kind: ResourceKind, principal: &Principal, scope: &ProjectScope) -> bool {
    is_allowed(Action::View, kind, principal, scope)
}

pub fn can_modify(kind: ResourceKind, principal: &Principal, scope: &ProjectScope) -> bool {
    is_allowed(Action::Modify, kind, principal, scope)
}

pub fn can_create(kind: ResourceKind, principal: &Principal, scope: &ProjectScope) -> bool {
    is_allowed(Action::Create, kind, principal, scope)
}

pub fn can_delete(kind: ResourceKind, principal: &Principal, scope: &ProjectScope) -> bool {
    is_allowed(Action::Delete, kind, principal, scope)
}

/// The role (or ownership) an action requires, for 403 bodies.
pub fn required_for(action: Action, kind: ResourceKind) -> String {
    let portfolio = format!("{ROLE_FUNCTIONAL_ADMIN} or {ROLE_PORTFOLIO_DIRECTOR}");
    match (action, kind) {
        (_, ResourceKind::User) => ROLE_FUNCTIONAL_ADMIN.to_string(),
        (Action::View, ResourceKind::Report) => portfolio,
        (Action::Create | Action::Delete, ResourceKind::Project) => portfolio,
        (Action::View, ResourceKind::Provider) => {
            format!("{portfolio} or project_lead")
        }
        (_, ResourceKind::Provider) => portfolio,
        (Action::View, _) => format!("{portfolio}, the project lead or a project participant"),
        _ => format!("{portfolio} or the lead of this project"),
    }
}

/// Authorize or build the matching [`CoreError::Forbidden`].
pub fn authorize(
    action: Action,
    kind: ResourceKind,
    principal: &Principal,
    scope: &ProjectScope,
) -> Result<(), CoreError> {
    if is_allowed(action, kind, principal, scope) {
        return Ok(());
    }
    let required = required_for(action, kind);
    Err(CoreError::forbidden(
        format!(
            "Insufficient permission to {} this {}: requires {required}",
            action.verb(),
            kind.label()
        ),
        required,
        principal.role.as_str(),
    ))
}

pub fn require_view(
    kind: ResourceKind,
    principal: &Principal,
    scope: &ProjectScope,
) -> Result<(), CoreError> {
    authorize(Action::View, kind, principal, scope)
}

pub fn require_create(
    kind: ResourceKind,
    principal: &Principal,
    scope: &ProjectScope,
) -> Result<(), CoreError> {
    authorize(Action::Create, kind, principal, scope)
}

pub fn require_modify(
    kind: ResourceKind,
    principal: &Principal,
    scope: &ProjectScope,
) -> Result<(), CoreError> {
    authorize(Action::Modify, kind, principal, scope)
}

pub fn require_delete(
    kind: ResourceKind,
    principal: &Principal,
    scope: &ProjectScope,
) -> Result<(), CoreError> {
    authorize(Action::Delete, kind, principal, scope)
}

/// Look up a named capability in a role's capability map.
///
/// Functional admins hold every capability; for other roles a missing key
/// means `false`.
pub fn has_capability(role: Role, capabilities: &HashMap<String, bool>, name: &str) -> bool {
    role == Role::FunctionalAdmin || capabilities.get(name).copied().unwrap_or(false)
}
