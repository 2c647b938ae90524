//! Inbound adapters: how a front end drives the stores.
//!
//! - **routes**: typed navigation targets parsed from paths
//! - **guard**: the authentication gate in front of protected routes
//! - **screens**: login, dashboard and consultation form flows
//! - **state**: the dependency bundle screens receive
//!
//! Screens hold no state of their own; they translate user intent into store
//! calls and store results into view models and navigation.

pub mod guard;
pub mod routes;
pub mod screens;
pub mod state;
