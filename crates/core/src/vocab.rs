//! Closed vocabularies stored as text columns, with their validators.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

pub const PROJECT_STATUS_PLANNING: &str = "planning";
pub const PROJECT_STATUS_IN_PROGRESS: &str = "in_progress";
pub const PROJECT_STATUS_ON_HOLD: &str = "on_hold";
pub const PROJECT_STATUS_COMPLETED: &str = "completed";
pub const PROJECT_STATUS_CANCELLED: &str = "cancelled";

/// Codes seeded into `project_statuses`.
pub const VALID_PROJECT_STATUSES: &[&str] = &[
    PROJECT_STATUS_PLANNING,
    PROJECT_STATUS_IN_PROGRESS,
    PROJECT_STATUS_ON_HOLD,
    PROJECT_STATUS_COMPLETED,
    PROJECT_STATUS_CANCELLED,
];

pub const PRIORITY_HIGH: &str = "high";
pub const PRIORITY_NORMAL: &str = "normal";
pub const PRIORITY_LOW: &str = "low";

pub const VALID_PRIORITIES: &[&str] = &[PRIORITY_HIGH, PRIORITY_NORMAL, PRIORITY_LOW];

pub const HEALTH_GREEN: &str = "green";
pub const HEALTH_AMBER: &str = "amber";
pub const HEALTH_RED: &str = "red";

pub const VALID_HEALTH: &[&str] = &[HEALTH_GREEN, HEALTH_AMBER, HEALTH_RED];

/// Display colour for a priority, used by the reference endpoint.
pub fn priority_color(priority: &str) -> &'static str {
    match priority {
        PRIORITY_HIGH => "#dc3545",
        PRIORITY_LOW => "#28a745",
        _ => "#ffc107",
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

pub const PHASE_STATUS_PLANNED: &str = "planned";
pub const PHASE_STATUS_IN_PROGRESS: &str = "in_progress";
pub const PHASE_STATUS_COMPLETED: &str = "completed";
pub const PHASE_STATUS_ON_HOLD: &str = "on_hold";
pub const PHASE_STATUS_CANCELLED: &str = "cancelled";

pub const VALID_PHASE_STATUSES: &[&str] = &[
    PHASE_STATUS_PLANNED,
    PHASE_STATUS_IN_PROGRESS,
    PHASE_STATUS_COMPLETED,
    PHASE_STATUS_ON_HOLD,
    PHASE_STATUS_CANCELLED,
];

// ---------------------------------------------------------------------------
// Deliverable
// ---------------------------------------------------------------------------

pub const DELIVERABLE_KIND_DOCUMENT: &str = "document";
pub const DELIVERABLE_KIND_CODE: &str = "code";
pub const DELIVERABLE_KIND_TRAINING: &str = "training";
pub const DELIVERABLE_KIND_HARDWARE: &str = "hardware";
pub const DELIVERABLE_KIND_SERVICE: &str = "service";

pub const VALID_DELIVERABLE_KINDS: &[&str] = &[
    DELIVERABLE_KIND_DOCUMENT,
    DELIVERABLE_KIND_CODE,
    DELIVERABLE_KIND_TRAINING,
    DELIVERABLE_KIND_HARDWARE,
    DELIVERABLE_KIND_SERVICE,
];

pub const DELIVERABLE_STATUS_PLANNED: &str = "planned";
pub const DELIVERABLE_STATUS_IN_PROGRESS: &str = "in_progress";
pub const DELIVERABLE_STATUS_DELIVERED: &str = "delivered";
pub const DELIVERABLE_STATUS_VALIDATED: &str = "validated";
pub const DELIVERABLE_STATUS_REJECTED: &str = "rejected";

pub const VALID_DELIVERABLE_STATUSES: &[&str] = &[
    DELIVERABLE_STATUS_PLANNED,
    DELIVERABLE_STATUS_IN_PROGRESS,
    DELIVERABLE_STATUS_DELIVERED,
    DELIVERABLE_STATUS_VALIDATED,
    DELIVERABLE_STATUS_REJECTED,
];

/// Statuses that record a validation decision and therefore a validator.
pub fn is_review_outcome(status: &str) -> bool {
    status == DELIVERABLE_STATUS_VALIDATED || status == DELIVERABLE_STATUS_REJECTED
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

pub const VALID_CONTRACT_STATUSES: &[&str] =
    &["negotiation", "signed", "in_progress", "completed", "terminated"];

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

pub const PROVIDER_STATUS_ACTIVE: &str = "active";

pub const VALID_PROVIDER_STATUSES: &[&str] = &[PROVIDER_STATUS_ACTIVE, "inactive", "suspended"];

pub const VALID_ASSOCIATION_STATUSES: &[&str] = &["active", "completed", "suspended"];

/// Suggested provider types. `provider_type` stays free text; this list
/// feeds the reference endpoint.
pub const PROVIDER_TYPES: &[&str] = &[
    "it_services",
    "freelance",
    "consulting",
    "integrator",
    "hardware_supplier",
    "software_supplier",
    "training",
    "other",
];

// ---------------------------------------------------------------------------
// Document & budget
// ---------------------------------------------------------------------------

pub const VALID_DOCUMENT_CATEGORIES: &[&str] = &[
    "specification",
    "contract",
    "deliverable",
    "minutes",
    "schedule",
    "budget",
    "other",
];

pub const VALID_BUDGET_CATEGORIES: &[&str] = &[
    "personnel",
    "hardware",
    "software",
    "training",
    "services",
    "other",
];

pub const VALID_BUDGET_STATUSES: &[&str] = &["planned", "committed", "invoiced", "paid"];

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

pub const USER_STATUS_ACTIVE: &str = "active";
pub const USER_STATUS_INACTIVE: &str = "inactive";

pub const VALID_USER_STATUSES: &[&str] = &[USER_STATUS_ACTIVE, USER_STATUS_INACTIVE];

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check that `value` belongs to `allowed`; `field` names the input in the
/// error message.
pub fn validate_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {field}: '{value}'. Valid values: {}",
            allowed.join(", ")
        )))
    }
}

/// [`validate_one_of`] for optional patch fields.
pub fn validate_opt_one_of(
    field: &str,
    value: Option<&str>,
    allowed: &[&str],
) -> Result<(), CoreError> {
    match value {
        Some(v) => validate_one_of(field, v, allowed),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_known_value() {
        assert!(validate_one_of("priority", "high", VALID_PRIORITIES).is_ok());
    }

    #[test]
    fn rejects_unknown_value_listing_choices() {
        let err = validate_one_of("priority", "urgent", VALID_PRIORITIES).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("high, normal, low"));
    }

    #[test]
    fn optional_none_is_accepted() {
        assert!(validate_opt_one_of("status", None, VALID_PHASE_STATUSES).is_ok());
        assert!(validate_opt_one_of("status", Some("done"), VALID_PHASE_STATUSES).is_err());
    }

    #[test]
    fn review_outcomes() {
        assert!(is_review_outcome("validated"));
        assert!(is_review_outcome("rejected"));
        assert!(!is_review_outcome("delivered"));
    }
}
