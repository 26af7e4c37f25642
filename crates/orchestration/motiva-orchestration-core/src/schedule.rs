//! Stagger scheduling: per-leaf start delays over a flattened sibling
//! sequence, derived from the resolving ancestor's transition spec.

use crate::transition::{StaggerDirection, TransitionSpec};

/// Orchestration keys extracted from a parent's transition spec. These
/// apply to the parent's orchestrated descendants, never to its own values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Orchestration {
    pub delay_children: f32,
    pub stagger_children: f32,
    pub stagger_direction: StaggerDirection,
}

impl From<&TransitionSpec> for Orchestration {
    fn from(spec: &TransitionSpec) -> Self {
        Self {
            delay_children: spec.delay_children,
            stagger_children: spec.stagger_children,
            stagger_direction: spec.stagger_direction,
        }
    }
}

/// Delay for flattened index `i` (0-based) out of `n` leaves. Reversal
/// flips the position, not the sequence, so completion bookkeeping keeps
/// document order.
pub fn stagger_delay(orch: &Orchestration, i: usize, n: usize) -> f32 {
    let pos = match orch.stagger_direction {
        StaggerDirection::Forward => i,
        StaggerDirection::Reverse => n.saturating_sub(1).saturating_sub(i),
    };
    orch.delay_children + orch.stagger_children * pos as f32
}
