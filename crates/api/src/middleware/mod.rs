//! Request extractors and middleware.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- Same, but tolerates anonymous requests.
//! - [`rate_limit::enforce`] -- Per-client request limit for `/api`.

pub mod auth;
pub mod rate_limit;
