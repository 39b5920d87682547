//! arbiter-policy — resource allocation policies for batch queues.
//!
//! A policy turns a node snapshot and a set of weighted queues into the
//! share of cluster resources each queue deserves for one scheduling cycle.
//! The host selects a policy by name from the [`PolicyRegistry`] and drives
//! it through the [`Policy`] lifecycle:
//!
//! ```text
//! initialize()
//! loop per cycle:
//!     groups = group(queues)
//!     shares = allocate(groups, nodes)   // None → skip this cycle
//! uninitialize()
//! ```
//!
//! # Proportion policy
//!
//! ```text
//! base(q)   = weight(q) * total / total_weight      (floor, per resource)
//! leftover  = total - Σ base                        (0 <= leftover < #queues)
//! leftover units go one at a time to queues ordered by
//! weight descending, then name ascending
//! ```

pub mod error;
pub mod policy;
pub mod proportion;
pub mod registry;

pub use error::{PolicyError, PolicyResult};
pub use policy::{Allocation, Policy, QueueGroups};
pub use proportion::{PROPORTION_POLICY_NAME, ProportionAllocator};
pub use registry::{PolicyFactory, PolicyRegistry};
