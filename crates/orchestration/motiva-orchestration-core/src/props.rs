//! Per-node prop snapshot and variant data model.
//!
//! A render layer rebuilds these on every render cycle and hands them to
//! Engine::set_props; the core recomputes the node's animation intent from
//! the snapshot, never from retained state.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::transition::TransitionSpec;
use motiva_api_core::{Value, ValueMap};

/// One named target state: the value mapping, an optional transition
/// override and an optional mapping applied the instant the animation
/// finishes (or immediately when the transition is disabled).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetDef {
    #[serde(default)]
    pub values: ValueMap,
    #[serde(default)]
    pub transition: Option<TransitionSpec>,
    #[serde(default)]
    pub transition_end: Option<ValueMap>,
}

impl TargetDef {
    pub fn new(values: ValueMap) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    pub fn with_transition(mut self, transition: TransitionSpec) -> Self {
        self.transition = Some(transition);
        self
    }

    pub fn with_transition_end(mut self, end: ValueMap) -> Self {
        self.transition_end = Some(end);
        self
    }
}

/// Variant-label to definition table. Keys are unique; order irrelevant.
pub type VariantTable = HashMap<String, TargetDef>;

/// What a node asks for: an explicit literal target, or one/more variant
/// labels resolved against the nearest table. `Option<AnimationIntent>`
/// models nodes that declare no intent of their own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AnimationIntent {
    Target(TargetDef),
    Label(String),
    Labels(Vec<String>),
}

impl AnimationIntent {
    pub fn label(label: impl Into<String>) -> Self {
        AnimationIntent::Label(label.into())
    }

    /// The label set of this intent in declaration order; explicit targets
    /// carry no labels.
    pub fn labels(&self) -> &[String] {
        match self {
            AnimationIntent::Target(_) => &[],
            AnimationIntent::Label(l) => std::slice::from_ref(l),
            AnimationIntent::Labels(ls) => ls,
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, AnimationIntent::Target(_))
    }
}

/// Per-node prop snapshot supplied by the render layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeProps {
    /// Channels this node owns, with their mount values.
    #[serde(default)]
    pub values: ValueMap,
    /// Intent applied once, instantly, at mount.
    #[serde(default)]
    pub initial: Option<AnimationIntent>,
    /// Intent re-resolved on every prop update.
    #[serde(default)]
    pub animate: Option<AnimationIntent>,
    #[serde(default)]
    pub variants: Option<VariantTable>,
    /// Fallback transition when the resolved target carries none.
    #[serde(default)]
    pub transition: Option<TransitionSpec>,
}

impl NodeProps {
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn with_initial(mut self, intent: AnimationIntent) -> Self {
        self.initial = Some(intent);
        self
    }

    pub fn with_animate(mut self, intent: AnimationIntent) -> Self {
        self.animate = Some(intent);
        self
    }

    pub fn with_variants(mut self, variants: VariantTable) -> Self {
        self.variants = Some(variants);
        self
    }

    pub fn with_transition(mut self, transition: TransitionSpec) -> Self {
        self.transition = Some(transition);
        self
    }
}
