//! Transition specs: how a value travels to its target, and the
//! orchestration keys a parent's transition applies to its descendants.

use serde::{Deserialize, Serialize};

/// Easing curve tags for tweened transitions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

/// How a single value reaches its target.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Disabled sentinel: the value snaps to its target with no
    /// intermediate frames (after any delay has elapsed).
    Instant,
    /// Time-based tween with an easing curve.
    Tween { duration: f32, ease: Ease },
}

impl Default for TransitionKind {
    fn default() -> Self {
        TransitionKind::Tween {
            duration: 0.3,
            ease: Ease::default(),
        }
    }
}

/// Which end of the flattened sibling sequence a stagger cascades from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaggerDirection {
    #[default]
    Forward,
    Reverse,
}

/// Full transition spec as attached to a variant definition, an explicit
/// target, or a node's `transition` prop. The `*_children` keys apply to
/// orchestrated descendants, never to the owning node's own values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    #[serde(default)]
    pub kind: TransitionKind,
    /// Extra delay for this node's own values, added on top of any
    /// orchestration-computed delay.
    #[serde(default)]
    pub delay: f32,
    #[serde(default)]
    pub delay_children: f32,
    #[serde(default)]
    pub stagger_children: f32,
    #[serde(default)]
    pub stagger_direction: StaggerDirection,
}

impl TransitionSpec {
    /// A disabled transition with no delays.
    pub fn instant() -> Self {
        Self {
            kind: TransitionKind::Instant,
            ..Self::default()
        }
    }

    /// A tween with the given duration and the default ease.
    pub fn tween(duration: f32) -> Self {
        Self {
            kind: TransitionKind::Tween {
                duration,
                ease: Ease::default(),
            },
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_delay_children(mut self, delay: f32) -> Self {
        self.delay_children = delay;
        self
    }

    pub fn with_stagger(mut self, step: f32, direction: StaggerDirection) -> Self {
        self.stagger_children = step;
        self.stagger_direction = direction;
        self
    }
}
