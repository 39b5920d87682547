//! Human-readable allocation tables.

use arbiter_core::{CPU, MEMORY, Queue};
use arbiter_policy::{Allocation, QueueGroups};

pub fn format_allocation(policy: &str, groups: &QueueGroups<'_>, alloc: &Allocation) -> String {
    let mut out = String::new();

    out.push_str(&format!("Policy: {policy}\n\n"));
    out.push_str(&format!(
        "{:<16} {:<24} {:>8} {:>12} {:>14}\n",
        "NAMESPACE", "QUEUE", "WEIGHT", "CPU", "MEMORY"
    ));

    for (namespace, queues) in groups {
        for queue in queues {
            // Duplicate names keep one share; print it under its own namespace only.
            let Some(granted) = alloc
                .get(&queue.name)
                .filter(|granted| granted.namespace == *namespace)
            else {
                continue;
            };
            out.push_str(&format!(
                "{:<16} {:<24} {:>8} {:>12} {:>14}\n",
                namespace,
                queue.name,
                queue.weight(),
                deserved(granted, CPU),
                deserved(granted, MEMORY),
            ));
        }
    }

    out.push_str(&format!(
        "{:<16} {:<24} {:>8} {:>12} {:>14}\n",
        "TOTAL",
        "",
        "",
        alloc.total_deserved(CPU),
        alloc.total_deserved(MEMORY),
    ));

    out
}

pub fn format_skipped(policy: &str) -> String {
    format!("Policy: {policy}\n\nCycle skipped: the cluster has no capacity or no weighted queues.\n")
}

fn deserved(queue: &Queue, resource: &str) -> String {
    queue
        .status
        .deserved
        .get(resource)
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string())
}
