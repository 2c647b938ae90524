//! ConectaHC client core: session, consultations and navigation.
//!
//! The crate follows a hexagonal layout. `domain` owns the entities, the
//! session and consultation stores and the ports they depend on; `outbound`
//! implements those ports; `inbound` turns user intent into store calls.

pub mod cli;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
