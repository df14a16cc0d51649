use funnelboard_core::model::{BlockNode, NodeId};
use funnelboard_core::store::{GraphStore, NodeAdmission};
use funnelboard_core::{Plan, QuotaGate, QuotaLimits};
use serde_json::{json, Map, Value};

fn label_patch(label: &str) -> Map<String, Value> {
    json!({ "label": label }).as_object().unwrap().clone()
}

fn store_with_task(capacity: usize) -> (GraphStore, NodeId) {
    let mut store = GraphStore::new(QuotaGate::new(QuotaLimits::default()), Plan::Free, capacity);
    let admission = store.add_node(BlockNode::task("v0")).unwrap();
    let NodeAdmission::Added(id) = admission else {
        panic!("first node must be admitted");
    };
    (store, id)
}

#[test]
fn sixty_mutations_keep_only_the_latest_fifty_snapshots() {
    let (mut store, id) = store_with_task(50);
    for version in 1..=60 {
        store
            .update_node_data(&id, &label_patch(&format!("v{version}")))
            .unwrap();
    }
    assert_eq!(store.history().len(), 50);

    for _ in 0..50 {
        assert!(store.undo());
    }
    assert_eq!(store.node(&id).unwrap().label(), Some("v10"));

    // v0..v9 were evicted.
    assert!(!store.undo());
    assert_eq!(store.node(&id).unwrap().label(), Some("v10"));
}

#[test]
fn undo_walks_back_in_reverse_order() {
    let (mut store, id) = store_with_task(50);
    for label in ["one", "two", "three"] {
        store.update_node_data(&id, &label_patch(label)).unwrap();
    }

    let mut seen = Vec::new();
    while store.undo() {
        seen.push(store.node(&id).unwrap().label().unwrap().to_string());
    }
    assert_eq!(seen, vec!["two", "one", "v0"]);
}

#[test]
fn capacity_comes_from_configuration() {
    let (mut store, id) = store_with_task(3);
    for version in 1..=5 {
        store
            .update_node_data(&id, &label_patch(&format!("v{version}")))
            .unwrap();
    }
    assert_eq!(store.history().len(), 3);
    assert_eq!(store.history().capacity(), 3);
}
