//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireCoach`] -- Requires an approved `coach` or `admin`.

pub mod auth;
pub mod rbac;
