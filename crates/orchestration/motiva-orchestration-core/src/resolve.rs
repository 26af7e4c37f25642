//! Variant resolution: turn a node's intent plus the table in scope into
//! the merged target state handed to the animation step.
//!
//! Label lookups prefer the node's own table over the nearest ancestor's;
//! a label absent from the table in scope contributes nothing, which lets
//! a child reference a label its table only partially overlaps.

use crate::props::{AnimationIntent, TargetDef, VariantTable};
use crate::transition::TransitionSpec;
use motiva_api_core::ValueMap;

/// The merged value mapping actually handed to the animation step, plus
/// the transition override and end-state that rode in with it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedTarget {
    pub values: ValueMap,
    pub transition: Option<TransitionSpec>,
    pub transition_end: Option<ValueMap>,
}

impl ResolvedTarget {
    fn merge_def(&mut self, def: &TargetDef) {
        for (key, value) in &def.values {
            self.values.insert(key.clone(), value.clone());
        }
        // Later labels win wholesale when they carry these; earlier ones
        // otherwise stick.
        if def.transition.is_some() {
            self.transition = def.transition.clone();
        }
        if def.transition_end.is_some() {
            self.transition_end = def.transition_end.clone();
        }
    }
}

/// Resolve an intent against the table in scope (the node's own table when
/// it has one, else the nearest ancestor's). Explicit targets ignore the
/// table entirely; that precedence is by definition, not an error.
pub fn resolve_intent(intent: &AnimationIntent, table: Option<&VariantTable>) -> ResolvedTarget {
    match intent {
        AnimationIntent::Target(def) => ResolvedTarget {
            values: def.values.clone(),
            transition: def.transition.clone(),
            transition_end: def.transition_end.clone(),
        },
        _ => resolve_labels(intent.labels(), table),
    }
}

/// Shallow-merge the definitions of an ordered label list, last wins per
/// key. Missing labels contribute nothing.
pub fn resolve_labels(labels: &[String], table: Option<&VariantTable>) -> ResolvedTarget {
    let mut resolved = ResolvedTarget::default();
    let Some(table) = table else {
        return resolved;
    };
    for label in labels {
        if let Some(def) = table.get(label) {
            resolved.merge_def(def);
        }
    }
    resolved
}
