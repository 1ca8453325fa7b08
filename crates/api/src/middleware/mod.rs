//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthMember`] -- Extracts the authenticated member from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.

pub mod auth;
pub mod rbac;
