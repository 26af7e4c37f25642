//! Engine: node tree ownership and the per-frame update pass
//! (resolution → propagation → scheduling → channel advance → change gate).
//!
//! All resolution work is synchronous and runs to completion inside one
//! update pass; animation progression is driven by the external per-frame
//! tick. Delay assignment happens before any channel animation starts, so
//! sibling starts are offset from a single logical clock origin.

use hashbrown::HashMap;

use crate::channel::{StepOutcome, ValueChannel};
use crate::config::Config;
use crate::error::EngineError;
use crate::gate::ChangeGate;
use crate::ids::{IdAllocator, NodeId};
use crate::outputs::{Change, Event, Outputs};
use crate::propagate::{flatten_leaves, is_transparent, TreeView};
use crate::props::{NodeProps, VariantTable};
use crate::resolve::{resolve_intent, resolve_labels, ResolvedTarget};
use crate::schedule::{stagger_delay, Orchestration};
use crate::transition::TransitionKind;
use motiva_api_core::{Value, ValueMap};

/// Completion accounting for a node's current resolution. A new resolution
/// bumps the generation; completions and `transition_end` applications
/// tagged with a stale generation are dropped.
#[derive(Debug, Default)]
struct Controller {
    generation: u64,
    /// In-flight value animations issued by the current resolution.
    pending: usize,
    /// End-state mapping applied once the current resolution settles.
    pending_end: Option<ValueMap>,
    /// Completion already emitted for the current generation.
    completed: bool,
    /// Target of the previous resolution; equal re-resolutions are no-ops.
    last_resolved: Option<ResolvedTarget>,
}

/// One node in the animatable tree.
#[derive(Debug)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub props: NodeProps,
    channels: HashMap<String, ValueChannel>,
    controller: Controller,
    gate: ChangeGate,
}

impl Node {
    fn tracked_values(&self) -> ValueMap {
        self.channels
            .iter()
            .map(|(k, ch)| (k.clone(), ch.get().clone()))
            .collect()
    }
}

/// The orchestration engine. Owns the tree in document order and produces
/// per-tick outputs for the host to apply.
#[derive(Debug)]
pub struct Engine {
    cfg: Config,
    ids: IdAllocator,
    nodes: Vec<Node>,
    /// Nodes whose intent must be re-resolved on the next update pass.
    dirty: Vec<NodeId>,
    outputs: Outputs,
}

impl TreeView for Engine {
    fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn has_own_intent(&self, node: NodeId) -> bool {
        self.node(node)
            .map(|n| n.props.animate.is_some())
            .unwrap_or(false)
    }

    fn owns_state(&self, node: NodeId) -> bool {
        self.node(node)
            .map(|n| n.props.variants.is_some() || !n.channels.is_empty())
            .unwrap_or(false)
    }
}

impl Engine {
    /// Create a new engine with the given config.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            ids: IdAllocator::new(),
            nodes: Vec::new(),
            dirty: Vec::new(),
            outputs: Outputs::default(),
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    /// Peek a channel's current value.
    pub fn value(&self, node: NodeId, key: &str) -> Option<&Value> {
        self.node(node)?.channels.get(key).map(|ch| ch.get())
    }

    /// Full tracked mapping for a node.
    pub fn values(&self, node: NodeId) -> Option<ValueMap> {
        self.node(node).map(|n| n.tracked_values())
    }

    /// Write a channel directly, creating it if the node does not own it
    /// yet. Cancels any in-flight animation on that channel.
    pub fn set_value(
        &mut self,
        node: NodeId,
        key: impl Into<String>,
        value: Value,
    ) -> Result<(), EngineError> {
        let idx = self.index_of(node).ok_or(EngineError::UnknownNode(node))?;
        let key = key.into();
        match self.nodes[idx].channels.get_mut(&key) {
            Some(ch) => ch.set(value),
            None => {
                self.nodes[idx].channels.insert(key, ValueChannel::new(value));
            }
        }
        Ok(())
    }

    /// Mount a node under `parent` (None for a root), in document order.
    ///
    /// The effective `initial` intent (own, or inherited labels from the
    /// nearest propagating ancestor) applies synchronously, including any
    /// `transition_end`; the `animate` intent is deferred to the next
    /// update pass so the full sibling set exists before stagger slots are
    /// assigned.
    pub fn create_node(
        &mut self,
        parent: Option<NodeId>,
        props: NodeProps,
    ) -> Result<NodeId, EngineError> {
        if let Some(pid) = parent {
            if self.node(pid).is_none() {
                return Err(EngineError::UnknownParent(pid));
            }
        }
        let id = self.ids.alloc_node();
        let channels = props
            .values
            .iter()
            .map(|(k, v)| (k.clone(), ValueChannel::new(v.clone())))
            .collect();
        self.nodes.push(Node {
            id,
            parent,
            children: Vec::new(),
            props,
            channels,
            controller: Controller::default(),
            gate: ChangeGate::default(),
        });
        if let Some(pid) = parent {
            if let Some(pidx) = self.index_of(pid) {
                self.nodes[pidx].children.push(id);
            }
        }

        self.apply_initial(id);

        let has_animate = self.node(id).is_some_and(|n| n.props.animate.is_some());
        if has_animate || self.propagation_source(id).is_some() {
            self.dirty.push(id);
        }
        Ok(id)
    }

    /// Replace a node's prop snapshot (a render event). Channels named by
    /// the new `values` are added with their mount values; existing
    /// channels keep their current values.
    pub fn set_props(&mut self, node: NodeId, props: NodeProps) -> Result<(), EngineError> {
        let idx = self.index_of(node).ok_or(EngineError::UnknownNode(node))?;
        for (key, value) in &props.values {
            if !self.nodes[idx].channels.contains_key(key) {
                self.nodes[idx]
                    .channels
                    .insert(key.clone(), ValueChannel::new(value.clone()));
            }
        }
        self.nodes[idx].props = props;
        self.dirty.push(node);
        Ok(())
    }

    /// Unmount a node and its subtree. In-flight animations and pending
    /// `transition_end` applications are dropped without completing.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), EngineError> {
        let idx = self.index_of(node).ok_or(EngineError::UnknownNode(node))?;
        if let Some(pid) = self.nodes[idx].parent {
            if let Some(pidx) = self.index_of(pid) {
                self.nodes[pidx].children.retain(|c| *c != node);
            }
        }
        let mut doomed = vec![node];
        let mut i = 0;
        while i < doomed.len() {
            if let Some(n) = self.node(doomed[i]) {
                doomed.extend(n.children.iter().copied());
            }
            i += 1;
        }
        self.nodes.retain(|n| !doomed.contains(&n.id));
        self.dirty.retain(|d| !doomed.contains(d));
        Ok(())
    }

    /// Step the tree by dt seconds, producing this tick's outputs:
    /// resolve dirty intents, advance channels, settle completions, then
    /// run the change gate.
    ///
    /// Updates landing in the same tick are reported in document order;
    /// ordering across ticks follows completion time.
    pub fn update(&mut self, dt: f32) -> &Outputs {
        self.outputs.clear();

        // 1) Resolution pass, in document order.
        let mut dirty = std::mem::take(&mut self.dirty);
        dirty.sort_by_key(|id| self.index_of(*id).unwrap_or(usize::MAX));
        dirty.dedup();
        for id in dirty {
            self.resolve_dirty(id);
        }

        // 2) Advance channels; route completions to their controllers.
        let cap = self.cfg.max_events_per_tick;
        let mut settled: Vec<usize> = Vec::new();
        {
            let Self { nodes, outputs, .. } = self;
            for (idx, node) in nodes.iter_mut().enumerate() {
                for (key, ch) in node.channels.iter_mut() {
                    match ch.step(dt) {
                        StepOutcome::Idle => {}
                        StepOutcome::Moved => outputs.push_change(Change {
                            node: node.id,
                            key: key.clone(),
                            value: ch.get().clone(),
                        }),
                        StepOutcome::Completed(generation) => {
                            outputs.push_change(Change {
                                node: node.id,
                                key: key.clone(),
                                value: ch.get().clone(),
                            });
                            let ctl = &mut node.controller;
                            if generation == ctl.generation && ctl.pending > 0 {
                                ctl.pending -= 1;
                                if ctl.pending == 0 && !ctl.completed {
                                    settled.push(idx);
                                }
                            }
                        }
                    }
                }
            }
        }

        // 3) Settle nodes whose current resolution just finished.
        for idx in settled {
            self.settle_node(idx);
        }

        // 4) Change gate: at most one Updated per node per tick, carrying
        // the full tracked mapping.
        {
            let Self { nodes, outputs, .. } = self;
            for node in nodes.iter_mut() {
                let current = node.tracked_values();
                if node.gate.observe(&current) {
                    outputs.push_event(
                        Event::Updated {
                            node: node.id,
                            values: current,
                        },
                        cap,
                    );
                }
            }
        }

        &self.outputs
    }

    /// Nearest variant table walking strictly upward from `id` (own table
    /// takes precedence over any ancestor's).
    fn nearest_table(&self, id: NodeId) -> Option<VariantTable> {
        let mut cur = Some(id);
        while let Some(nid) = cur {
            let node = self.node(nid)?;
            if let Some(table) = &node.props.variants {
                return Some(table.clone());
            }
            cur = node.parent;
        }
        None
    }

    /// Nearest ancestor whose `animate` labels propagate to `id`: the walk
    /// stops at the first ancestor with an own intent; explicit targets are
    /// opaque boundaries and propagate nothing.
    fn propagation_source(&self, id: NodeId) -> Option<(NodeId, Vec<String>)> {
        let mut cur = self.node(id)?.parent;
        while let Some(pid) = cur {
            let p = self.node(pid)?;
            if let Some(intent) = &p.props.animate {
                if intent.is_explicit() {
                    return None;
                }
                return Some((pid, intent.labels().to_vec()));
            }
            cur = p.parent;
        }
        None
    }

    /// Initial labels inherited at mount, through ancestors that declare no
    /// intent of their own.
    fn inherited_initial_labels(&self, id: NodeId) -> Option<Vec<String>> {
        let mut cur = self.node(id)?.parent;
        while let Some(pid) = cur {
            let p = self.node(pid)?;
            if let Some(intent) = &p.props.initial {
                if intent.is_explicit() {
                    return None;
                }
                return Some(intent.labels().to_vec());
            }
            if p.props.animate.is_some() {
                return None;
            }
            cur = p.parent;
        }
        None
    }

    /// Apply the node's mount state synchronously: resolved initial values
    /// and any `transition_end`, then seed the change-gate snapshot so the
    /// mount itself never reports an update.
    fn apply_initial(&mut self, id: NodeId) {
        let resolved = {
            let Some(node) = self.node(id) else { return };
            match &node.props.initial {
                Some(intent) => {
                    let table = self.nearest_table(id);
                    Some(resolve_intent(intent, table.as_ref()))
                }
                None if node.props.animate.is_none() => self
                    .inherited_initial_labels(id)
                    .map(|labels| resolve_labels(&labels, self.nearest_table(id).as_ref())),
                None => None,
            }
        };
        let Some(idx) = self.index_of(id) else { return };
        if let Some(resolved) = resolved {
            let node = &mut self.nodes[idx];
            for (key, value) in &resolved.values {
                if let Some(ch) = node.channels.get_mut(key) {
                    ch.set(value.clone());
                }
            }
            if let Some(end) = &resolved.transition_end {
                for (key, value) in end {
                    if let Some(ch) = node.channels.get_mut(key) {
                        ch.set(value.clone());
                    }
                }
            }
        }
        let snapshot = self.nodes[idx].tracked_values();
        self.nodes[idx].gate.seed(snapshot);
    }

    /// Re-resolve one dirty node: its own intent when it has one, else the
    /// labels propagated from its nearest resolving ancestor (late mounts
    /// recompute their flattened slot at this point).
    fn resolve_dirty(&mut self, id: NodeId) {
        let Some(idx) = self.index_of(id) else { return };

        if let Some(intent) = self.nodes[idx].props.animate.clone() {
            let table = self.nearest_table(id);
            if !intent.is_explicit() && table.is_none() {
                // Only worth reporting when the resolution had channels to
                // drive; a propagating wrapper resolves at its leaves.
                if !self.nodes[idx].channels.is_empty() {
                    let message = format!(
                        "no variant table found for labels {:?} on {:?}",
                        intent.labels(),
                        id
                    );
                    log::warn!("{message}");
                    self.outputs
                        .push_event(Event::Error { message }, self.cfg.max_events_per_tick);
                }
            }
            let resolved = resolve_intent(&intent, table.as_ref());
            let labels = (!intent.is_explicit()).then(|| intent.labels().to_vec());
            self.apply_resolution(id, resolved, labels.as_deref(), 0.0);
            return;
        }

        // Transparent wrappers resolve nothing themselves; propagation
        // lands on the state-owning leaves below them.
        if is_transparent(self, id) {
            return;
        }
        let Some((source, labels)) = self.propagation_source(id) else {
            return;
        };
        let delay = self.cascade_delay(source, &labels, id);
        let resolved = resolve_labels(&labels, self.nearest_table(id).as_ref());
        self.apply_resolution(id, resolved, Some(&labels), delay);
    }

    /// Orchestration keys a node applies to its flattened children: its own
    /// intent's resolution when it has one, else the propagated labels
    /// resolved against its table in scope.
    fn node_orchestration(&self, id: NodeId, labels: &[String]) -> Orchestration {
        let Some(node) = self.node(id) else {
            return Orchestration::default();
        };
        let resolved = match &node.props.animate {
            Some(intent) => resolve_intent(intent, self.nearest_table(id).as_ref()),
            None => resolve_labels(labels, self.nearest_table(id).as_ref()),
        };
        let spec = resolved
            .transition
            .or_else(|| node.props.transition.clone())
            .unwrap_or_else(|| self.cfg.default_transition.clone());
        Orchestration::from(&spec)
    }

    /// Accumulated start delay for `id` in the cascade rooted at `source`.
    /// Every state-owning level between them contributes its slot in its
    /// parent's flattened sequence, mirroring the scheduling recursion, so
    /// a node re-resolved on its own keeps the delay the full cascade would
    /// have assigned it.
    fn cascade_delay(&self, source: NodeId, labels: &[String], id: NodeId) -> f32 {
        let mut delay = 0.0;
        let mut cur = source;
        loop {
            let orch = self.node_orchestration(cur, labels);
            let leaves = flatten_leaves(self, cur);
            let n = leaves.len();
            let Some((i, next)) = leaves
                .into_iter()
                .enumerate()
                .find(|(_, l)| *l == id || self.is_ancestor(*l, id))
            else {
                return delay;
            };
            delay += stagger_delay(&orch, i, n);
            if next == id {
                return delay;
            }
            cur = next;
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = self.node(node).and_then(|n| n.parent);
        while let Some(pid) = cur {
            if pid == ancestor {
                return true;
            }
            cur = self.node(pid).and_then(|n| n.parent);
        }
        false
    }

    /// Issue one node's resolution: start per-value animations, settle
    /// vacuous resolutions, then orchestrate the flattened descendants when
    /// the resolution came from labels. `base_delay` carries the delay
    /// contributed by this node's own slot in its parent's cascade.
    fn apply_resolution(
        &mut self,
        id: NodeId,
        resolved: ResolvedTarget,
        labels: Option<&[String]>,
        base_delay: f32,
    ) {
        let Some(idx) = self.index_of(id) else { return };

        // Idempotence gate: an unchanged target issues nothing, completes
        // nothing, and does not restart the cascade below it.
        if self.nodes[idx].controller.last_resolved.as_ref() == Some(&resolved) {
            return;
        }

        let effective = resolved
            .transition
            .clone()
            .or_else(|| self.nodes[idx].props.transition.clone())
            .unwrap_or_else(|| self.cfg.default_transition.clone());
        let delay = base_delay + effective.delay;

        {
            let node = &mut self.nodes[idx];
            node.controller.generation += 1;
            node.controller.pending = 0;
            node.controller.completed = false;
            node.controller.pending_end = resolved.transition_end.clone();
            let generation = node.controller.generation;

            for (key, target) in &resolved.values {
                // Keys without a channel on this node are ignored; the
                // remaining keys still apply.
                let Some(ch) = node.channels.get_mut(key) else {
                    continue;
                };
                if ch.get() == target {
                    // A superseded flight must not carry the value past a
                    // target it already satisfies.
                    ch.stop();
                    continue;
                }
                if matches!(effective.kind, TransitionKind::Instant) && delay <= 0.0 {
                    ch.set(target.clone());
                    self.outputs.push_change(Change {
                        node: id,
                        key: key.clone(),
                        value: target.clone(),
                    });
                } else {
                    ch.animate_to(target.clone(), effective.kind, delay, generation);
                    node.controller.pending += 1;
                }
            }
            node.controller.last_resolved = Some(resolved);
        }

        if self.nodes[idx].controller.pending == 0 {
            self.settle_node(idx);
        }

        if let Some(labels) = labels {
            let orch = Orchestration::from(&effective);
            let leaves = flatten_leaves(self, id);
            let n = leaves.len();
            for (i, leaf) in leaves.into_iter().enumerate() {
                let child_delay = base_delay + stagger_delay(&orch, i, n);
                let child_resolved = resolve_labels(labels, self.nearest_table(leaf).as_ref());
                self.apply_resolution(leaf, child_resolved, Some(labels), child_delay);
            }
        }
    }

    /// The current resolution finished: apply its `transition_end` and emit
    /// the node-level completion, once.
    fn settle_node(&mut self, idx: usize) {
        let node = &mut self.nodes[idx];
        if node.controller.completed {
            return;
        }
        node.controller.completed = true;
        let id = node.id;
        if let Some(end) = node.controller.pending_end.take() {
            for (key, value) in end {
                if let Some(ch) = node.channels.get_mut(&key) {
                    ch.set(value.clone());
                    self.outputs.push_change(Change {
                        node: id,
                        key,
                        value,
                    });
                }
            }
        }
        self.outputs.push_event(
            Event::Completed { node: id },
            self.cfg.max_events_per_tick,
        );
    }
}
