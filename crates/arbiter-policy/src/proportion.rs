//! Proportional fair-share policy.
//!
//! Every queue receives `weight / total_weight` of the cluster's CPU and
//! memory. Shares are floored to whole units and the remainder is handed
//! out one unit at a time, so the shares always add up to the cluster
//! total. Namespaces group queues for presentation only; all queues draw on
//! one global pool.

use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use arbiter_core::{CPU, MEMORY, Node, Quantity, QuantityFormat, Queue, ResourceList};

use crate::error::{PolicyError, PolicyResult};
use crate::policy::{Allocation, Policy, QueueGroups};

/// Name of the proportion policy; also the default policy.
pub const PROPORTION_POLICY_NAME: &str = "proportion";

const KINDS: usize = 2;

/// Resource kinds divided by this policy, with their rendering format.
const RESOURCES: [(&str, QuantityFormat); KINDS] = [
    (CPU, QuantityFormat::DecimalSI),
    (MEMORY, QuantityFormat::BinarySI),
];

/// Stateless proportional allocator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionAllocator;

impl ProportionAllocator {
    pub fn new() -> Self {
        Self
    }
}

/// A queue clone with its in-progress amounts, indexed like `RESOURCES`.
struct Share {
    queue: Queue,
    amounts: [i64; KINDS],
}

impl Policy for ProportionAllocator {
    fn name(&self) -> &'static str {
        PROPORTION_POLICY_NAME
    }

    fn initialize(&self) {
        debug!(policy = PROPORTION_POLICY_NAME, "policy initialized");
    }

    fn group<'a>(&self, queues: &'a [Queue]) -> QueueGroups<'a> {
        let mut groups = QueueGroups::new();
        for queue in queues {
            groups.entry(queue.namespace.clone()).or_default().push(queue);
        }
        groups
    }

    fn allocate(&self, groups: &QueueGroups<'_>, nodes: &[Node]) -> Option<Allocation> {
        let totals = RESOURCES.map(|(resource, _)| total_capacity(nodes, resource));
        let total_weight: u64 = groups
            .values()
            .flatten()
            .map(|q| u64::from(q.weight()))
            .sum();

        debug!(
            total_cpu = totals[0],
            total_memory = totals[1],
            total_weight,
            "proportion policy totals"
        );

        if totals.contains(&0) || total_weight == 0 {
            debug!("there are no resources or no weighted queues in the cluster");
            return None;
        }

        let mut by_name: BTreeMap<&str, Share> = BTreeMap::new();
        for queue in groups.values().flatten() {
            let weight = u64::from(queue.weight());
            let share = Share {
                queue: (*queue).clone(),
                amounts: totals.map(|total| base_share(weight, total, total_weight)),
            };
            if by_name.insert(queue.name.as_str(), share).is_some() {
                warn!(
                    queue = %queue.name,
                    namespace = %queue.namespace,
                    "duplicate queue name, later queue replaces earlier share"
                );
            }
        }

        let mut shares: Vec<Share> = by_name.into_values().collect();
        shares.sort_by(|a, b| {
            b.queue
                .weight()
                .cmp(&a.queue.weight())
                .then_with(|| a.queue.name.cmp(&b.queue.name))
        });

        for (i, (resource, _)) in RESOURCES.iter().enumerate() {
            let allocated: i64 = shares.iter().map(|s| s.amounts[i]).sum();
            let leftover = totals[i] - allocated;
            debug!(resource, allocated, leftover, "distributing leftover");
            distribute_leftover(&mut shares, i, leftover);
        }

        Some(shares.into_iter().map(finalize).collect())
    }

    fn assign(&self, _queues: &[Queue], _target: &Queue) -> PolicyResult<ResourceList> {
        Err(PolicyError::Unsupported {
            policy: PROPORTION_POLICY_NAME,
            operation: "assign",
        })
    }

    fn polish(&self, _queue: &Queue, _resources: &ResourceList) -> PolicyResult<Vec<Queue>> {
        Err(PolicyError::Unsupported {
            policy: PROPORTION_POLICY_NAME,
            operation: "polish",
        })
    }

    fn uninitialize(&self) {
        debug!(policy = PROPORTION_POLICY_NAME, "policy uninitialized");
    }
}

/// Sum of one resource kind over all nodes.
///
/// A capacity that is missing, unparsable, fractional or negative counts
/// as zero.
fn total_capacity(nodes: &[Node], resource: &str) -> i64 {
    nodes
        .iter()
        .map(|node| match node.capacity_of(resource) {
            None => 0,
            Some(Ok(quantity)) => match quantity.as_i64() {
                Some(v) if v >= 0 => v,
                _ => {
                    trace!(node = %node.name, resource, %quantity, "capacity is not a whole amount, counting zero");
                    0
                }
            },
            Some(Err(e)) => {
                trace!(node = %node.name, resource, error = %e, "unparsable capacity, counting zero");
                0
            }
        })
        .fold(0i64, i64::saturating_add)
}

/// `floor(weight * total / total_weight)` in exact integer arithmetic.
fn base_share(weight: u64, total: i64, total_weight: u64) -> i64 {
    let share = i128::from(weight) * i128::from(total) / i128::from(total_weight);
    // weight <= total_weight, so the share never exceeds `total`.
    i64::try_from(share).unwrap_or(total)
}

/// Hand out `leftover` units of resource `index` across the shares.
///
/// Every share first gets `leftover / len` units, then the remaining
/// `leftover % len` go one each to the leading shares. The even part is
/// only nonzero when duplicate names dropped some shares.
fn distribute_leftover(shares: &mut [Share], index: usize, leftover: i64) {
    if shares.is_empty() || leftover <= 0 {
        return;
    }
    let count = i64::try_from(shares.len()).unwrap_or(i64::MAX);
    let even = leftover / count;
    let rest = usize::try_from(leftover % count).unwrap_or(0);
    for (i, share) in shares.iter_mut().enumerate() {
        share.amounts[index] += even + i64::from(i < rest);
    }
}

/// Write the computed amounts into the clone and clear its usage.
fn finalize(share: Share) -> Queue {
    let Share { mut queue, amounts } = share;
    queue.status.deserved = RESOURCES
        .iter()
        .zip(amounts)
        .map(|((resource, format), amount)| (*resource, Quantity::new(amount, *format)))
        .collect();
    queue.status.used = ResourceList::new();
    queue
}
