use motiva_orchestration::{
    AnimationIntent, Config, Engine, NodeId, NodeProps, StaggerDirection, TargetDef,
    TransitionSpec, Value, ValueMap, VariantTable,
};

fn vmap(entries: &[(&str, Value)]) -> ValueMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn leaf_variants(duration: f32) -> VariantTable {
    let mut t = VariantTable::new();
    t.insert(
        "hidden".into(),
        TargetDef::new(vmap(&[("opacity", Value::f(0.0))])),
    );
    t.insert(
        "visible".into(),
        TargetDef::new(vmap(&[("opacity", Value::f(1.0))]))
            .with_transition(TransitionSpec::tween(duration)),
    );
    t
}

fn leaf_props(duration: f32) -> NodeProps {
    NodeProps::default()
        .with_value("opacity", Value::f(0.0))
        .with_variants(leaf_variants(duration))
}

/// Build the stagger fixture: a resolving root over two intent-less
/// wrappers, each holding two value-owning leaves.
fn stagger_tree(engine: &mut Engine, root_transition: TransitionSpec) -> Vec<NodeId> {
    let mut parent_variants = VariantTable::new();
    parent_variants.insert(
        "visible".into(),
        TargetDef::default().with_transition(root_transition),
    );

    let root = engine
        .create_node(
            None,
            NodeProps::default()
                .with_variants(parent_variants)
                .with_initial(AnimationIntent::label("hidden"))
                .with_animate(AnimationIntent::label("visible")),
        )
        .unwrap();
    let w1 = engine.create_node(Some(root), NodeProps::default()).unwrap();
    let w2 = engine.create_node(Some(root), NodeProps::default()).unwrap();
    vec![
        engine.create_node(Some(w1), leaf_props(0.01)).unwrap(),
        engine.create_node(Some(w1), leaf_props(0.01)).unwrap(),
        engine.create_node(Some(w2), leaf_props(0.01)).unwrap(),
        engine.create_node(Some(w2), leaf_props(0.01)).unwrap(),
    ]
}

fn drive_update_order(engine: &mut Engine, ticks: usize, dt: f32) -> Vec<NodeId> {
    let mut order = Vec::new();
    for _ in 0..ticks {
        order.extend(engine.update(dt).updated_nodes());
    }
    order
}

/// it should treat nodes without variants as transparent to stagger order:
/// reverse stagger over four flattened grandchildren updates [4, 3, 2, 1]
#[test]
fn wrappers_are_transparent_to_reverse_stagger() {
    let mut engine = Engine::new(Config::default());
    let leaves = stagger_tree(
        &mut engine,
        TransitionSpec::default().with_stagger(0.125, StaggerDirection::Reverse),
    );

    let order = drive_update_order(&mut engine, 12, 0.0625);
    let expected: Vec<NodeId> = leaves.iter().rev().copied().collect();
    assert_eq!(order, expected);
}

/// it should cascade forward stagger in document order
#[test]
fn forward_stagger_follows_document_order() {
    let mut engine = Engine::new(Config::default());
    let leaves = stagger_tree(
        &mut engine,
        TransitionSpec::default().with_stagger(0.125, StaggerDirection::Forward),
    );

    let order = drive_update_order(&mut engine, 12, 0.0625);
    assert_eq!(order, leaves);
}

/// it should add delay_children on top of the stagger cascade
#[test]
fn delay_children_offsets_the_cascade() {
    let mut engine = Engine::new(Config::default());
    let leaves = stagger_tree(
        &mut engine,
        TransitionSpec::default()
            .with_delay_children(0.5)
            .with_stagger(0.125, StaggerDirection::Forward),
    );

    // Inside the delay window nothing has moved.
    let early = drive_update_order(&mut engine, 7, 0.0625);
    assert!(early.is_empty());
    for leaf in &leaves {
        assert_eq!(engine.value(*leaf, "opacity"), Some(&Value::f(0.0)));
    }

    let late = drive_update_order(&mut engine, 9, 0.0625);
    assert_eq!(late, leaves);
}

/// it should report updates landing in the same tick in document order
#[test]
fn same_tick_updates_follow_document_order() {
    let mut engine = Engine::new(Config::default());
    let leaves = stagger_tree(
        &mut engine,
        TransitionSpec::default().with_stagger(0.125, StaggerDirection::Reverse),
    );

    // One large tick crosses every delay boundary at once.
    let order = drive_update_order(&mut engine, 1, 1.0);
    assert_eq!(order, leaves);
}

/// it should recurse orchestration: a resolving child schedules its own
/// subtree from its own delay as the base offset
#[test]
fn nested_orchestration_uses_child_delay_as_base() {
    let mut engine = Engine::new(Config::default());

    let mut mid_variants = VariantTable::new();
    mid_variants.insert(
        "visible".into(),
        TargetDef::new(vmap(&[("opacity", Value::f(1.0))])).with_transition(
            TransitionSpec::instant().with_delay_children(0.2),
        ),
    );

    let mut root_variants = VariantTable::new();
    root_variants.insert("visible".into(), TargetDef::default());
    let root = engine
        .create_node(
            None,
            NodeProps::default()
                .with_variants(root_variants)
                .with_animate(AnimationIntent::label("visible"))
                .with_transition(TransitionSpec::instant().with_delay_children(0.3)),
        )
        .unwrap();
    let mid = engine
        .create_node(
            Some(root),
            NodeProps::default()
                .with_value("opacity", Value::f(0.0))
                .with_variants(mid_variants)
                .with_transition(TransitionSpec::instant()),
        )
        .unwrap();
    let leaf = engine
        .create_node(
            Some(mid),
            NodeProps::default()
                .with_value("opacity", Value::f(0.0))
                .with_transition(TransitionSpec::instant()),
        )
        .unwrap();

    // mid starts after 0.3s; leaf after 0.3 + 0.2.
    engine.update(0.05);
    assert_eq!(engine.value(mid, "opacity"), Some(&Value::f(0.0)));
    assert_eq!(engine.value(leaf, "opacity"), Some(&Value::f(0.0)));

    engine.update(0.3);
    assert_eq!(engine.value(mid, "opacity"), Some(&Value::f(1.0)));
    assert_eq!(engine.value(leaf, "opacity"), Some(&Value::f(0.0)));

    engine.update(0.2);
    assert_eq!(engine.value(leaf, "opacity"), Some(&Value::f(1.0)));
}

/// it should keep the cascade delay when only a deep leaf re-renders: the
/// slot is recomputed through every state-owning level above it
#[test]
fn rerendered_leaf_keeps_cascade_delay() {
    let mut engine = Engine::new(Config::default());

    let mut root_variants = VariantTable::new();
    root_variants.insert("visible".into(), TargetDef::default());
    let mut mid_variants = VariantTable::new();
    mid_variants.insert(
        "visible".into(),
        TargetDef::new(vmap(&[("opacity", Value::f(1.0))]))
            .with_transition(TransitionSpec::instant().with_delay_children(0.2)),
    );
    let leaf_snapshot = |target: f32| {
        let mut table = VariantTable::new();
        table.insert(
            "visible".into(),
            TargetDef::new(vmap(&[("opacity", Value::f(target))]))
                .with_transition(TransitionSpec::instant()),
        );
        NodeProps::default()
            .with_value("opacity", Value::f(0.0))
            .with_variants(table)
    };

    let root = engine
        .create_node(
            None,
            NodeProps::default()
                .with_variants(root_variants)
                .with_animate(AnimationIntent::label("visible"))
                .with_transition(TransitionSpec::instant().with_delay_children(0.3)),
        )
        .unwrap();
    let mid = engine
        .create_node(
            Some(root),
            NodeProps::default()
                .with_value("opacity", Value::f(0.0))
                .with_variants(mid_variants),
        )
        .unwrap();
    let leaf = engine.create_node(Some(mid), leaf_snapshot(1.0)).unwrap();

    engine.update(0.0);
    engine.set_props(leaf, leaf_snapshot(2.0)).unwrap();
    engine.update(0.0);
    assert_eq!(engine.value(leaf, "opacity"), Some(&Value::f(0.0)));

    // 0.3 through the root's gate, then another 0.2 through mid's.
    engine.update(0.3);
    assert_eq!(engine.value(mid, "opacity"), Some(&Value::f(1.0)));
    assert_eq!(engine.value(leaf, "opacity"), Some(&Value::f(0.0)));
    engine.update(0.2);
    assert_eq!(engine.value(leaf, "opacity"), Some(&Value::f(2.0)));
}
