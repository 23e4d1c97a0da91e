//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the caller from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `functional_admin` role.
//! - [`rbac::RequirePortfolioManager`] -- Requires admin or PMO.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.

pub mod auth;
pub mod rbac;
