//! Policy registry — maps policy names to constructors.
//!
//! The host picks a policy by the name in its config; the registry builds a
//! fresh instance for it.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{PolicyError, PolicyResult};
use crate::policy::Policy;
use crate::proportion::{PROPORTION_POLICY_NAME, ProportionAllocator};

/// Constructor for a registered policy.
pub type PolicyFactory = fn() -> Box<dyn Policy>;

pub struct PolicyRegistry {
    factories: BTreeMap<&'static str, PolicyFactory>,
    default_policy: &'static str,
}

impl PolicyRegistry {
    /// An empty registry whose default is the proportion policy.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
            default_policy: PROPORTION_POLICY_NAME,
        }
    }

    /// A registry with every built-in policy registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .factories
            .insert(PROPORTION_POLICY_NAME, proportion_policy as PolicyFactory);
        registry
    }

    /// Register a policy under the name its instances report.
    pub fn register(&mut self, factory: PolicyFactory) -> PolicyResult<()> {
        let name = factory().name();
        if self.factories.contains_key(name) {
            return Err(PolicyError::AlreadyRegistered(name.to_string()));
        }
        self.factories.insert(name, factory);
        debug!(policy = name, "policy registered");
        Ok(())
    }

    /// Build the policy registered under `name`.
    pub fn get(&self, name: &str) -> PolicyResult<Box<dyn Policy>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| PolicyError::UnknownPolicy(name.to_string()))
    }

    pub fn default_policy(&self) -> PolicyResult<Box<dyn Policy>> {
        self.get(self.default_policy)
    }

    pub fn default_name(&self) -> &'static str {
        self.default_policy
    }

    /// Registered policy names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }
}

fn proportion_policy() -> Box<dyn Policy> {
    Box::new(ProportionAllocator::new())
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
