//! Core configuration for motiva-orchestration-core.

use serde::{Deserialize, Serialize};

use crate::transition::TransitionSpec;

/// Engine-wide defaults. Keep this minimal; expand without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Transition used when neither the resolved target nor the node's
    /// props supply one.
    pub default_transition: TransitionSpec,

    /// Maximum events retained per tick before further ones are dropped.
    pub max_events_per_tick: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_transition: TransitionSpec::default(),
            max_events_per_tick: 1024,
        }
    }
}
