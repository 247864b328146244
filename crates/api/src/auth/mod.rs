//! Authentication primitives.
//!
//! - [`jwt`] -- HS256 bearer-token validation (and issuing, for tooling and tests).

pub mod jwt;
