mod support;

use funnelboard_core::model::{BlockKind, BlockNode, EdgeId, ModelError, NodeId, Position};
use funnelboard_core::store::{GraphError, GraphStore, NodeAdmission};
use funnelboard_core::{Plan, QuotaGate, QuotaLimits};
use serde_json::{json, Map, Value};
use support::task;

fn pro_store() -> GraphStore {
    GraphStore::new(QuotaGate::new(QuotaLimits::default()), Plan::Pro, 50)
}

fn patch(value: Value) -> Map<String, Value> {
    value.as_object().unwrap().clone()
}

fn add(store: &mut GraphStore, node: BlockNode) -> NodeId {
    match store.add_node(node).unwrap() {
        NodeAdmission::Added(id) => id,
        NodeAdmission::Rejected(rejection) => panic!("unexpected rejection: {rejection}"),
    }
}

#[test]
fn delete_node_cascades_to_touching_edges() {
    let mut store = pro_store();
    let a = add(&mut store, task("a", "A", None));
    let b = add(&mut store, task("b", "B", None));
    let c = add(&mut store, task("c", "C", None));
    store.connect(&a, &b, "custom").unwrap();
    store.connect(&b, &c, "custom").unwrap();
    let kept = store.connect(&a, &c, "custom").unwrap();

    store.delete_node(&b).unwrap();

    assert_eq!(store.nodes().len(), 2);
    assert_eq!(store.edges().len(), 1);
    assert_eq!(store.edges()[0].id, kept);
}

#[test]
fn undo_after_update_restores_exact_graph() {
    let mut store = pro_store();
    let a = add(&mut store, task("a", "Draft", Some("A Fazer")));
    let b = add(&mut store, task("b", "Other", None));
    store.connect(&a, &b, "custom").unwrap();
    let before = store.snapshot();

    store
        .update_node_data(&a, &patch(json!({"label": "Final", "status": "Feito"})))
        .unwrap();
    assert_eq!(store.node(&a).unwrap().label(), Some("Final"));

    assert!(store.undo());
    assert_eq!(store.snapshot(), before);
}

#[test]
fn undo_after_delete_restores_node_and_edges() {
    let mut store = pro_store();
    let a = add(&mut store, task("a", "A", None));
    let b = add(&mut store, task("b", "B", None));
    store.connect(&a, &b, "custom").unwrap();
    let before = store.snapshot();

    store.delete_node(&a).unwrap();
    assert!(store.undo());
    assert_eq!(store.snapshot(), before);
}

#[test]
fn creation_and_edge_operations_are_not_recorded() {
    let mut store = pro_store();
    let a = add(&mut store, task("a", "A", None));
    let b = add(&mut store, task("b", "B", None));
    let edge = store.connect(&a, &b, "custom").unwrap();
    store.delete_edge(&edge).unwrap();
    store.move_node(&a, 40.0, 80.0).unwrap();

    assert!(store.history().is_empty());
    assert!(!store.undo());
    assert_eq!(store.nodes().len(), 2);
}

#[test]
fn failed_update_leaves_graph_and_history_untouched() {
    let mut store = pro_store();
    let a = add(&mut store, task("a", "A", None));
    let before = store.snapshot();

    let err = store
        .update_node_data(&a, &patch(json!({"type": "website"})))
        .unwrap_err();
    assert!(matches!(err, GraphError::Model(ModelError::KindChange { .. })));

    let err = store
        .update_node_data(&a, &patch(json!({"deadline": "not a date"})))
        .unwrap_err();
    assert!(matches!(err, GraphError::Model(ModelError::InvalidAttributes(_))));

    let err = store
        .update_node_data(&NodeId::from("ghost"), &patch(json!({"label": "x"})))
        .unwrap_err();
    assert_eq!(err, GraphError::NodeNotFound(NodeId::from("ghost")));

    assert_eq!(store.snapshot(), before);
    assert!(store.history().is_empty());
}

#[test]
fn edges_require_existing_endpoints_and_unique_ids() {
    let mut store = pro_store();
    let a = add(&mut store, task("a", "A", None));

    let err = store
        .connect(&a, &NodeId::from("ghost"), "custom")
        .unwrap_err();
    assert_eq!(err, GraphError::MissingEndpoint(NodeId::from("ghost")));

    let err = store.delete_edge(&EdgeId::from("nope")).unwrap_err();
    assert_eq!(err, GraphError::EdgeNotFound(EdgeId::from("nope")));
    assert!(store.edges().is_empty());
}

#[test]
fn duplicate_node_id_is_rejected() {
    let mut store = pro_store();
    add(&mut store, task("a", "A", None));
    let err = store.add_node(task("a", "again", None)).unwrap_err();
    assert_eq!(err, GraphError::DuplicateNode(NodeId::from("a")));
}

#[test]
fn selection_tracks_a_single_live_node() {
    let mut store = pro_store();
    let a = add(&mut store, task("a", "A", None));
    let b = add(&mut store, task("b", "B", None));

    store.select_node(Some(&a));
    store.select_node(Some(&b));
    let flagged: Vec<_> = store.nodes().iter().filter(|n| n.selected).collect();
    assert_eq!(flagged.len(), 1);
    assert_eq!(store.selected_node().unwrap().id, b);

    store.select_node(Some(&NodeId::from("ghost")));
    assert_eq!(store.selected_node().unwrap().id, b);

    store
        .update_node_data(&b, &patch(json!({"label": "Renamed"})))
        .unwrap();
    assert_eq!(store.selected_node().unwrap().label(), Some("Renamed"));

    store.delete_node(&b).unwrap();
    assert!(store.selected_node().is_none());

    store.select_node(Some(&a));
    store.select_node(None);
    assert!(store.selected_node().is_none());
    assert!(store.nodes().iter().all(|n| !n.selected));
}

#[test]
fn load_rejects_dangling_edges_and_keeps_previous_graph() {
    let mut store = pro_store();
    add(&mut store, task("a", "A", None));
    let before = store.snapshot();

    let node = BlockNode::of_kind(BlockKind::Note, Position::new(0.0, 0.0));
    let dangling = funnelboard_core::model::Edge::new(
        EdgeId::from("e1"),
        node.id.clone(),
        NodeId::from("missing"),
        "custom",
    );
    let err = store.load(vec![node], vec![dangling]).unwrap_err();
    assert!(matches!(err, GraphError::Model(ModelError::DanglingEdge { .. })));
    assert_eq!(store.snapshot(), before);
}
