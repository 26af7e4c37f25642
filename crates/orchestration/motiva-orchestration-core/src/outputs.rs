//! Output contracts from the core engine.
//!
//! Outputs carry the channel writes for this tick, keyed by node and value
//! name, and a separate list of semantic events. Adapters apply changes to
//! the host and route events to user callbacks.

use serde::{Deserialize, Serialize};

use crate::ids::NodeId;
use motiva_api_core::{Value, ValueMap};

/// One changed channel value for a given node this tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Change {
    pub node: NodeId,
    pub key: String,
    pub value: Value,
}

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Event {
    /// The node's tracked value set changed since the last report; carries
    /// the full mapping, not just the changed keys. At most once per node
    /// per tick; nodes updating in the same tick report in document order.
    Updated { node: NodeId, values: ValueMap },
    /// Every value animation issued by the node's current resolution has
    /// settled. Superseded resolutions never emit this.
    Completed { node: NodeId },
    /// Non-fatal configuration report (e.g. an unresolvable variant label).
    Error { message: String },
}

/// Outputs returned by Engine::update().
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Push an event unless the per-tick cap is already reached.
    #[inline]
    pub fn push_event(&mut self, event: Event, cap: usize) {
        if self.events.len() < cap {
            self.events.push(event);
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Nodes that completed this tick, in emission order.
    pub fn completed_nodes(&self) -> Vec<NodeId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Completed { node } => Some(*node),
                _ => None,
            })
            .collect()
    }

    /// Nodes that reported an update this tick, in emission order.
    pub fn updated_nodes(&self) -> Vec<NodeId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Updated { node, .. } => Some(*node),
                _ => None,
            })
            .collect()
    }
}
