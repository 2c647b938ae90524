//! Outbound adapters implementing domain ports for the client's surroundings.
//!
//! - **storage**: key-value and cookie stores, in memory or backed by a JSON
//!   file in a capability-scoped directory
//! - **remote**: simulated consultation backend with configurable latency
//!
//! Adapters are thin translators between domain types and their storage
//! representation. They contain no business logic.

pub mod remote;
pub mod storage;
