use std::path::Path;

use anyhow::bail;
use tracing::info;

use arbiter_core::ClusterSnapshot;
use arbiter_policy::{Policy, PolicyRegistry};

use crate::report;

pub fn allocate(snapshot_path: &Path, policy_name: &str, format: &str) -> anyhow::Result<()> {
    let snapshot = ClusterSnapshot::from_file(snapshot_path)?;
    let registry = PolicyRegistry::with_defaults();
    let policy = registry.get(policy_name)?;

    println!("{}", run_cycle(&snapshot, policy.as_ref(), format)?);
    Ok(())
}

/// One full policy lifecycle over a snapshot, rendered as `format`.
pub fn run_cycle(snapshot: &ClusterSnapshot, policy: &dyn Policy, format: &str) -> anyhow::Result<String> {
    if !matches!(format, "text" | "json") {
        bail!("Unsupported format: {format}. Supported: text, json");
    }

    info!(
        policy = policy.name(),
        nodes = snapshot.nodes.len(),
        queues = snapshot.queues.len(),
        "running allocation cycle"
    );

    policy.initialize();
    let groups = policy.group(&snapshot.queues);
    let allocation = policy.allocate(&groups, &snapshot.nodes);
    policy.uninitialize();

    let out = match (format, &allocation) {
        ("json", Some(alloc)) => serde_json::to_string_pretty(alloc)?,
        ("json", None) => "{}".to_string(),
        (_, Some(alloc)) => report::format_allocation(policy.name(), &groups, alloc),
        (_, None) => report::format_skipped(policy.name()),
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::{CPU, MEMORY, Node, Queue};
    use arbiter_policy::ProportionAllocator;

    fn snapshot() -> ClusterSnapshot {
        ClusterSnapshot {
            nodes: vec![
                Node::new("n1").with_capacity(CPU, "10").with_capacity(MEMORY, "100"),
                Node::new("n2").with_capacity(CPU, "10").with_capacity(MEMORY, "100"),
            ],
            queues: vec![Queue::new("q1", "team-a", 1), Queue::new("q2", "team-b", 3)],
        }
    }

    #[test]
    fn json_output_lists_every_queue() {
        let out = run_cycle(&snapshot(), &ProportionAllocator::new(), "json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["q1"]["status"]["deserved"]["cpu"], "5");
        assert_eq!(value["q2"]["status"]["deserved"]["memory"], "150");
    }

    #[test]
    fn text_output_has_table() {
        let out = run_cycle(&snapshot(), &ProportionAllocator::new(), "text").unwrap();
        assert!(out.contains("team-a"));
        assert!(out.contains("q2"));
        assert!(out.contains("TOTAL"));
    }

    #[test]
    fn empty_cluster_is_skipped() {
        let snapshot = ClusterSnapshot {
            nodes: Vec::new(),
            queues: vec![Queue::new("q1", "default", 1)],
        };
        let policy = ProportionAllocator::new();

        assert_eq!(run_cycle(&snapshot, &policy, "json").unwrap(), "{}");
        assert!(run_cycle(&snapshot, &policy, "text").unwrap().contains("skipped"));
    }

    #[test]
    fn rejects_unknown_format() {
        let err = run_cycle(&snapshot(), &ProportionAllocator::new(), "yaml").unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn allocate_reads_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cluster.json");
        std::fs::write(&path, serde_json::to_string(&snapshot()).unwrap()).unwrap();

        allocate(&path, "proportion", "json").unwrap();
        assert!(allocate(&path, "drf", "json").is_err());
    }
}
