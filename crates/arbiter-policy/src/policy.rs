//! The policy capability set and its result types.

use std::collections::BTreeMap;

use serde::Serialize;

use arbiter_core::{Node, Queue, ResourceList};

use crate::error::PolicyResult;

/// Queues keyed by namespace, borrowed from the caller's snapshot.
///
/// Order within each bucket follows the input order.
pub type QueueGroups<'a> = BTreeMap<String, Vec<&'a Queue>>;

/// An allocation policy driven by the host scheduler.
///
/// Policies hold no per-cycle state: `group` and `allocate` only read the
/// snapshot they are given, so one instance may serve concurrent callers.
pub trait Policy: Send + Sync {
    /// Identifier the host uses to select this policy.
    fn name(&self) -> &'static str;

    /// Called once before the first cycle.
    fn initialize(&self);

    /// Partition queues by namespace.
    fn group<'a>(&self, queues: &'a [Queue]) -> QueueGroups<'a>;

    /// Compute each queue's deserved resources for this cycle.
    ///
    /// Returns `None` when there is nothing to allocate (no capacity or no
    /// queue weight); the host should skip the cycle.
    fn allocate(&self, groups: &QueueGroups<'_>, nodes: &[Node]) -> Option<Allocation>;

    /// Pick concrete resources out of a queue's share for `target`.
    fn assign(&self, queues: &[Queue], target: &Queue) -> PolicyResult<ResourceList>;

    /// Refine an allocation for a single queue.
    fn polish(&self, queue: &Queue, resources: &ResourceList) -> PolicyResult<Vec<Queue>>;

    /// Called once at shutdown.
    fn uninitialize(&self);
}

/// Queue name → queue clone carrying its deserved resources.
///
/// The queues are owned copies; editing them never touches the snapshot
/// they were cloned from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Allocation {
    queues: BTreeMap<String, Queue>,
}

impl Allocation {
    pub fn get(&self, name: &str) -> Option<&Queue> {
        self.queues.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Queue> {
        self.queues.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Queue)> {
        self.queues.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Sum of the integer deserved amounts of one resource kind.
    pub fn total_deserved(&self, resource: &str) -> i64 {
        self.queues
            .values()
            .filter_map(|q| q.status.deserved.value_of(resource))
            .sum()
    }

    pub fn into_queues(self) -> BTreeMap<String, Queue> {
        self.queues
    }
}

impl FromIterator<Queue> for Allocation {
    fn from_iter<I: IntoIterator<Item = Queue>>(iter: I) -> Self {
        Self {
            queues: iter.into_iter().map(|q| (q.name.clone(), q)).collect(),
        }
    }
}

impl IntoIterator for Allocation {
    type Item = (String, Queue);
    type IntoIter = std::collections::btree_map::IntoIter<String, Queue>;

    fn into_iter(self) -> Self::IntoIter {
        self.queues.into_iter()
    }
}
