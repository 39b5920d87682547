//! arbiter-core — shared types for the Arbiter batch-queue scheduler.
//!
//! Holds the cluster model the allocation policies work on:
//!
//! - **`types`** — `Node`, `Queue` and `ResourceList`
//! - **`quantity`** — Kubernetes-style resource quantities (`"4"`, `"500m"`, `"8Gi"`)
//! - **`config`** — `arbiter.toml` parsing
//! - **`snapshot`** — cluster snapshots loaded from JSON or TOML files

pub mod config;
pub mod error;
pub mod quantity;
pub mod snapshot;
pub mod types;

pub use config::{ArbiterConfig, DEFAULT_POLICY, LogFormat, LoggingConfig, SchedulerConfig};
pub use error::{CoreError, CoreResult};
pub use quantity::{Quantity, QuantityError, QuantityFormat};
pub use snapshot::ClusterSnapshot;
pub use types::*;
