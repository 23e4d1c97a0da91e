//! The closed set of roles a user can hold.
//!
//! Role names must match the seed rows in `20260101000001_reference_data.sql`.

use serde::{Deserialize, Serialize};

pub const ROLE_FUNCTIONAL_ADMIN: &str = "functional_admin";
pub const ROLE_PORTFOLIO_DIRECTOR: &str = "portfolio_director";
pub const ROLE_PROJECT_LEAD: &str = "project_lead";
pub const ROLE_CONTRIBUTOR: &str = "contributor";

/// All role names, in decreasing order of privilege.
pub const VALID_ROLES: &[&str] = &[
    ROLE_FUNCTIONAL_ADMIN,
    ROLE_PORTFOLIO_DIRECTOR,
    ROLE_PROJECT_LEAD,
    ROLE_CONTRIBUTOR,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    FunctionalAdmin,
    PortfolioDirector,
    ProjectLead,
    Contributor,
}

impl Role {
    /// Resolve a stored role name.
    ///
    /// Unknown names fall back to [`Role::Contributor`], the least
    /// privileged role, so a misconfigured row can never widen access.
    pub fn from_name(name: &str) -> Self {
        match name {
            ROLE_FUNCTIONAL_ADMIN => Self::FunctionalAdmin,
            ROLE_PORTFOLIO_DIRECTOR => Self::PortfolioDirector,
            ROLE_PROJECT_LEAD => Self::ProjectLead,
            _ => Self::Contributor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FunctionalAdmin => ROLE_FUNCTIONAL_ADMIN,
            Self::PortfolioDirector => ROLE_PORTFOLIO_DIRECTOR,
            Self::ProjectLead => ROLE_PROJECT_LEAD,
            Self::Contributor => ROLE_CONTRIBUTOR,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FunctionalAdmin => "Functional administrator",
            Self::PortfolioDirector => "PMO / Portfolio director",
            Self::ProjectLead => "Project lead",
            Self::Contributor => "Contributor",
        }
    }

    /// Admin and PMO see and manage the whole portfolio.
    pub fn manages_portfolio(&self) -> bool {
        matches!(self, Self::FunctionalAdmin | Self::PortfolioDirector)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        for name in VALID_ROLES {
            assert_eq!(Role::from_name(name).as_str(), *name);
        }
    }

    #[test]
    fn unknown_name_is_least_privileged() {
        assert_eq!(Role::from_name("Administrateur"), Role::Contributor);
        assert_eq!(Role::from_name(""), Role::Contributor);
    }

    #[test]
    fn only_admin_and_pmo_manage_portfolio() {
        assert!(Role::FunctionalAdmin.manages_portfolio());
        assert!(Role::PortfolioDirector.manages_portfolio());
        assert!(!Role::ProjectLead.manages_portfolio());
        assert!(!Role::Contributor.manages_portfolio());
    }
}
