//! Domain types and pure logic for the Waypoint roadmap service.
//!
//! Nothing in this crate performs I/O. The store, the model client and the
//! HTTP layer all build on the types defined here.

pub mod error;
pub mod generation;
pub mod roadmap;
pub mod types;
