mod support;

use funnelboard_core::store::{NotebookError, NotebookStore};
use funnelboard_core::{EditorSession, EngineConfig, Plan, Project, SessionError};
use support::MemoryRepository;

fn open_session() -> EditorSession<MemoryRepository> {
    let project = Project::new("Notes");
    let id = project.id;
    let mut session = EditorSession::new(
        EngineConfig::default(),
        MemoryRepository::with_project(project),
        Plan::Free,
    );
    session.open_project(id).unwrap();
    session
}

#[test]
fn switching_documents_resets_dirty_flag() {
    let mut store = NotebookStore::default();
    store.add_document("Second");
    store.mark_dirty();
    assert!(store.is_dirty());

    store.set_current_index(0).unwrap();
    assert!(!store.is_dirty());
    assert_eq!(store.current_index(), 0);

    assert_eq!(
        store.set_current_index(5),
        Err(NotebookError::IndexOutOfRange { index: 5, len: 2 })
    );
    assert_eq!(store.current_index(), 0);
}

#[test]
fn last_document_cannot_be_deleted() {
    let mut store = NotebookStore::default();
    assert_eq!(store.delete_current(), Err(NotebookError::LastDocument));
    assert_eq!(store.documents().len(), 1);

    store.add_document("Extra");
    let removed = store.delete_current().unwrap();
    assert_eq!(removed.title, "Extra");
    assert_eq!(store.current_index(), 0);
    assert_eq!(store.documents().len(), 1);
}

#[test]
fn empty_load_seeds_primary_document() {
    let mut store = NotebookStore::default();
    store.load(Vec::new());
    assert_eq!(store.documents().len(), 1);
    assert_eq!(store.current().title, "Main note");
}

#[test]
fn blur_saves_only_with_autosave_enabled() {
    let mut store = NotebookStore::default();
    assert!(store.autosave_enabled());
    assert!(store.on_editor_blur("Title", "<p>body</p>"));
    assert_eq!(store.current().content, "<p>body</p>");

    assert!(!store.toggle_autosave());
    store.mark_dirty();
    assert!(!store.on_editor_blur("Ignored", "<p>ignored</p>"));
    assert_eq!(store.current().title, "Title");
    assert!(store.is_dirty());
}

#[test]
fn session_save_persists_documents_and_notifies() {
    let mut session = open_session();
    let id = session.project_id().unwrap();
    session.mark_notebook_dirty();

    session.save_notebook("Plan", "<p>Hello</p>").unwrap();

    assert!(!session.notebook().is_dirty());
    let stored = session.repository().stored(id);
    assert_eq!(stored.notebook_documents[0].title, "Plan");
    assert_eq!(stored.notebook_documents[0].content, "<p>Hello</p>");
    let titles: Vec<_> = session.drain_notices().into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["Note saved"]);
}

#[test]
fn failed_session_save_keeps_notebook_dirty() {
    let mut session = open_session();
    session.repository().set_failing(true);

    let err = session.save_notebook("Plan", "<p>Hello</p>").unwrap_err();

    assert!(matches!(err, SessionError::Sync(_)));
    assert!(session.notebook().is_dirty());
    assert_eq!(session.notebook().current().title, "Plan");
    let notices = session.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Save failed");
}
