mod support;

use funnelboard_core::model::{BlockKind, BlockNode, Position};
use funnelboard_core::store::{GraphStore, NodeAdmission};
use funnelboard_core::{
    check_quota, EditorSession, EngineConfig, Plan, Project, QuotaGate, QuotaLimits,
    QuotaRejection,
};
use support::MemoryRepository;

fn node(kind: BlockKind) -> BlockNode {
    BlockNode::of_kind(kind, Position::default())
}

fn store(plan: Plan) -> GraphStore {
    GraphStore::new(QuotaGate::new(QuotaLimits::default()), plan, 50)
}

#[test]
fn sixth_node_is_rejected_on_free_plan() {
    let mut store = store(Plan::Free);
    for _ in 0..5 {
        assert!(store.add_node(node(BlockKind::Task)).unwrap().is_added());
    }

    let admission = store.add_node(node(BlockKind::Note)).unwrap();
    assert_eq!(
        admission,
        NodeAdmission::Rejected(QuotaRejection::NodeLimit { limit: 5 })
    );
    assert_eq!(store.nodes().len(), 5);
}

#[test]
fn fourth_media_node_is_rejected_below_total_limit() {
    let mut store = store(Plan::Free);
    for kind in [
        BlockKind::ImageMedia,
        BlockKind::VideoMedia,
        BlockKind::PdfMedia,
        BlockKind::Task,
    ] {
        assert!(store.add_node(node(kind)).unwrap().is_added());
    }

    let admission = store.add_node(node(BlockKind::AudioMedia)).unwrap();
    assert_eq!(
        admission,
        NodeAdmission::Rejected(QuotaRejection::MediaLimit { limit: 3 })
    );
    assert!(store.add_node(node(BlockKind::WebLink)).unwrap().is_added());
    assert_eq!(store.nodes().len(), 5);
}

#[test]
fn paid_plan_is_unrestricted() {
    let mut store = store(Plan::Pro);
    for _ in 0..10 {
        assert!(store.add_node(node(BlockKind::ImageMedia)).unwrap().is_added());
    }
    assert_eq!(store.media_count(), 10);
}

#[test]
fn total_limit_is_checked_before_media_limit() {
    let limits = QuotaLimits::default();
    assert_eq!(
        check_quota(&limits, 5, 3, BlockKind::ImageMedia, Plan::Free),
        Err(QuotaRejection::NodeLimit { limit: 5 })
    );
    assert_eq!(
        check_quota(&limits, 4, 3, BlockKind::ImageMedia, Plan::Free),
        Err(QuotaRejection::MediaLimit { limit: 3 })
    );
    assert_eq!(check_quota(&limits, 4, 3, BlockKind::Task, Plan::Free), Ok(()));
}

#[test]
fn session_turns_rejections_into_notices() {
    let project = Project::new("Quota");
    let id = project.id;
    let mut session = EditorSession::new(
        EngineConfig::default(),
        MemoryRepository::with_project(project),
        Plan::Free,
    );
    session.open_project(id).unwrap();

    for _ in 0..5 {
        assert!(session.add_node(node(BlockKind::Task)).unwrap().is_added());
    }
    session.drain_notices();

    assert!(!session.add_node(node(BlockKind::Task)).unwrap().is_added());
    let notices = session.drain_notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].is_error());
    assert_eq!(notices[0].title, "Block limit reached");
}
