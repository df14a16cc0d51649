mod support;

use funnelboard_core::model::ViewId;
use funnelboard_core::store::{PresentationError, PresentationSequencer};
use funnelboard_core::{EditorSession, EngineConfig, Plan, Project, SessionError};
use serde_json::json;
use support::{task, MemoryRepository};

fn sequencer(order: &[ViewId]) -> PresentationSequencer {
    let mut sequencer = PresentationSequencer::default();
    sequencer.set_order(order.to_vec());
    sequencer
}

fn open_session() -> EditorSession<MemoryRepository> {
    let project = Project::new("Pitch");
    let id = project.id;
    let mut session = EditorSession::new(
        EngineConfig::default(),
        MemoryRepository::with_project(project),
        Plan::Pro,
    );
    session.open_project(id).unwrap();
    session
}

#[test]
fn navigation_clamps_at_both_ends() {
    let mut sequencer = sequencer(&[ViewId::Hub, ViewId::Canvas, ViewId::Board]);
    assert_eq!(sequencer.begin(), Ok(ViewId::Hub));

    assert_eq!(sequencer.previous(), Some(ViewId::Hub));
    assert_eq!(sequencer.next(), Some(ViewId::Canvas));
    assert_eq!(sequencer.next(), Some(ViewId::Board));
    assert_eq!(sequencer.next(), Some(ViewId::Board));
    assert_eq!(sequencer.previous(), Some(ViewId::Canvas));
}

#[test]
fn begin_keeps_a_valid_cursor_and_requires_slides() {
    let mut sequencer = sequencer(&[ViewId::Hub, ViewId::Timeline]);
    sequencer.jump_to(ViewId::Timeline).unwrap();
    assert_eq!(sequencer.begin(), Ok(ViewId::Timeline));
    assert!(sequencer.is_active());
    sequencer.end();
    assert!(!sequencer.is_active());

    let mut empty = PresentationSequencer::default();
    assert_eq!(empty.begin(), Err(PresentationError::EmptyOrder));
    assert!(!empty.is_active());
}

#[test]
fn jump_rejects_views_outside_the_order() {
    let mut sequencer = sequencer(&[ViewId::Hub]);
    assert_eq!(
        sequencer.jump_to(ViewId::Calendar),
        Err(PresentationError::NotInOrder(ViewId::Calendar))
    );
}

#[test]
fn reordering_drops_a_removed_cursor() {
    let mut sequencer = sequencer(&[ViewId::Hub, ViewId::Canvas]);
    sequencer.jump_to(ViewId::Canvas).unwrap();
    sequencer.set_order(vec![ViewId::Hub, ViewId::Notebook]);
    assert_eq!(sequencer.current(), None);
    assert_eq!(sequencer.begin(), Ok(ViewId::Hub));
}

#[test]
fn playback_saves_first_and_clears_selection() {
    let mut session = open_session();
    let node = task("t1", "Slide", None);
    let id = node.id.clone();
    session.add_node(node).unwrap();
    session.select_node(Some(&id));

    assert_eq!(session.begin_playback().unwrap(), ViewId::Hub);

    assert_eq!(session.repository().saves().len(), 1);
    assert!(session.graph().selected_node().is_none());
    assert!(session.presentation().is_active());
}

#[test]
fn playback_does_not_start_after_failed_save() {
    let mut session = open_session();
    session.repository().set_failing(true);

    let err = session.begin_playback().unwrap_err();

    assert!(matches!(err, SessionError::Sync(_)));
    assert!(!session.presentation().is_active());
    assert_eq!(session.drain_notices()[0].title, "Save failed");
}

#[test]
fn undo_is_locked_during_playback() {
    let mut session = open_session();
    let node = task("t1", "Before", None);
    let id = node.id.clone();
    session.add_node(node).unwrap();
    session
        .update_node_data(&id, json!({"label": "After"}).as_object().unwrap())
        .unwrap();

    session.begin_playback().unwrap();
    assert!(!session.undo());
    assert_eq!(session.graph().node(&id).unwrap().label(), Some("After"));

    session.end_playback();
    assert!(session.undo());
    assert_eq!(session.graph().node(&id).unwrap().label(), Some("Before"));
}
