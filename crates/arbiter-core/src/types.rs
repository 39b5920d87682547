//! Cluster model shared by the scheduler and its policies.
//!
//! Nodes and queues arrive as snapshots owned by the caller. All types are
//! serializable so snapshots can be loaded from JSON or TOML files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::quantity::{Quantity, QuantityError};

/// Resource name for CPU, in whole cores.
pub const CPU: &str = "cpu";

/// Resource name for memory, in bytes.
pub const MEMORY: &str = "memory";

/// Name of a resource kind (`"cpu"`, `"memory"`, ...).
pub type ResourceName = String;

// ── Resources ──────────────────────────────────────────────────────

/// Resource kind → amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceList(BTreeMap<ResourceName, Quantity>);

impl ResourceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, resource: &str) -> Option<&Quantity> {
        self.0.get(resource)
    }

    pub fn insert(&mut self, resource: impl Into<ResourceName>, quantity: Quantity) {
        self.0.insert(resource.into(), quantity);
    }

    /// Integer amount of a resource, if present and whole.
    pub fn value_of(&self, resource: &str) -> Option<i64> {
        self.0.get(resource).and_then(Quantity::as_i64)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Quantity)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<K: Into<ResourceName>> FromIterator<(K, Quantity)> for ResourceList {
    fn from_iter<I: IntoIterator<Item = (K, Quantity)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ── Node ───────────────────────────────────────────────────────────

/// A capacity value as written in a snapshot.
///
/// Snapshots may carry bare numbers or quantity strings, so the raw value
/// is kept and only interpreted when a policy asks for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapacityValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CapacityValue {
    /// Interpret the raw value as a quantity.
    pub fn to_quantity(&self) -> Result<Quantity, QuantityError> {
        match self {
            CapacityValue::Integer(v) => Ok(Quantity::new(*v, Default::default())),
            CapacityValue::Float(v) => Quantity::parse(&v.to_string()),
            CapacityValue::Text(s) => Quantity::parse(s),
        }
    }
}

impl From<&str> for CapacityValue {
    fn from(s: &str) -> Self {
        CapacityValue::Text(s.to_string())
    }
}

impl From<i64> for CapacityValue {
    fn from(v: i64) -> Self {
        CapacityValue::Integer(v)
    }
}

/// A cluster node as seen for one scheduling cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    /// Total capacity per resource kind.
    #[serde(default)]
    pub capacity: BTreeMap<ResourceName, CapacityValue>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity: BTreeMap::new(),
        }
    }

    /// Builder method: set the capacity of one resource kind.
    pub fn with_capacity(
        mut self,
        resource: impl Into<ResourceName>,
        value: impl Into<CapacityValue>,
    ) -> Self {
        self.capacity.insert(resource.into(), value.into());
        self
    }

    /// Parsed capacity of a resource kind.
    ///
    /// `None` when the node does not report the resource at all.
    pub fn capacity_of(&self, resource: &str) -> Option<Result<Quantity, QuantityError>> {
        self.capacity.get(resource).map(CapacityValue::to_quantity)
    }
}

// ── Queue ──────────────────────────────────────────────────────────

/// Desired configuration of a queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSpec {
    /// Relative claim on cluster resources.
    #[serde(default)]
    pub weight: u32,
}

/// Observed and granted resources of a queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    /// Resources the active policy granted this cycle.
    #[serde(default)]
    pub deserved: ResourceList,
    /// Resources consumed by the queue's workloads.
    #[serde(default)]
    pub used: ResourceList,
}

/// A named, weighted claim on cluster resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub name: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub spec: QueueSpec,
    #[serde(default)]
    pub status: QueueStatus,
}

fn default_namespace() -> String {
    "default".to_string()
}

impl Queue {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            spec: QueueSpec { weight },
            status: QueueStatus::default(),
        }
    }

    pub fn weight(&self) -> u32 {
        self.spec.weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::QuantityFormat;

    #[test]
    fn capacity_of_reports_absent_resources() {
        let node = Node::new("n1").with_capacity(CPU, "4");
        assert!(node.capacity_of(MEMORY).is_none());
        assert_eq!(node.capacity_of(CPU).unwrap().unwrap().as_i64(), Some(4));
    }

    #[test]
    fn capacity_of_surfaces_parse_errors() {
        let node = Node::new("n1").with_capacity(CPU, "four");
        assert!(node.capacity_of(CPU).unwrap().is_err());
    }

    #[test]
    fn capacity_accepts_numbers_and_strings() {
        let json = r#"{"name":"n1","capacity":{"cpu":8,"memory":"16Gi","gpu":0.5}}"#;
        let node: Node = serde_json::from_str(json).unwrap();

        assert_eq!(node.capacity[CPU], CapacityValue::Integer(8));
        assert_eq!(
            node.capacity_of(MEMORY).unwrap().unwrap().as_i64(),
            Some(16 * 1024 * 1024 * 1024)
        );
        let gpu = node.capacity_of("gpu").unwrap().unwrap();
        assert_eq!(gpu.milli_value(), 500);
        assert_eq!(gpu.as_i64(), None);
    }

    #[test]
    fn queue_defaults_when_fields_missing() {
        let queue: Queue = serde_json::from_str(r#"{"name":"q1"}"#).unwrap();
        assert_eq!(queue.namespace, "default");
        assert_eq!(queue.weight(), 0);
        assert!(queue.status.deserved.is_empty());
        assert!(queue.status.used.is_empty());
    }

    #[test]
    fn resource_list_values() {
        let list: ResourceList = [
            (CPU, Quantity::new(5, QuantityFormat::DecimalSI)),
            (MEMORY, Quantity::parse("250m").unwrap()),
        ]
        .into_iter()
        .collect();

        assert_eq!(list.len(), 2);
        assert_eq!(list.value_of(CPU), Some(5));
        assert_eq!(list.value_of(MEMORY), None);
        assert_eq!(list.value_of("gpu"), None);
    }

    #[test]
    fn resource_list_serializes_as_map() {
        let mut list = ResourceList::new();
        list.insert(MEMORY, Quantity::new(2 * 1024 * 1024, QuantityFormat::BinarySI));
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"{"memory":"2Mi"}"#);
    }
}
