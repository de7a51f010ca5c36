//! Connector registry keyed by connector name.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::connectors::Connector;

/// Connectors available to a front end, selected at runtime by name.
#[derive(Default)]
pub struct ConnectorRegistry {
    connectors: BTreeMap<&'static str, Arc<dyn Connector>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under `connector.name()`, returning any connector it replaced.
    pub fn register(&mut self, connector: Arc<dyn Connector>) -> Option<Arc<dyn Connector>> {
        let name = connector.name();
        debug!(connector = name, "registering connector");
        self.connectors.insert(name, connector)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Connector>> {
        self.connectors.get(name).cloned()
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Connector>> {
        self.connectors.remove(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.connectors.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}
