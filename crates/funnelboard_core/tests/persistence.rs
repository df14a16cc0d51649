mod support;

use funnelboard_core::db::open_db;
use funnelboard_core::model::{Analysis, BlockNode, CalendarEvent, Edge, EdgeId, ViewId};
use funnelboard_core::repo::{ProjectSummary, RepoError, RepoResult};
use funnelboard_core::service::{PersistenceSynchronizer, SaveOutcome, SyncError};
use funnelboard_core::{
    EditorSession, EngineConfig, Plan, Project, ProjectId, ProjectRepository, ProjectUpdate,
    SessionError, SqliteProjectRepository,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Barrier, Mutex};
use std::thread;
use std::time::Duration;
use support::{day, task, MemoryRepository};

fn update_marked(leads: u64) -> ProjectUpdate {
    let project = Project::new("Marker");
    ProjectUpdate {
        nodes: project.nodes,
        edges: project.edges,
        presentation_order: project.presentation_order,
        analysis: Analysis { leads, buyers: 0 },
        notebook_documents: project.notebook_documents,
        calendar_events: project.calendar_events,
    }
}

#[test]
fn sqlite_repository_round_trips_projects() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("projects.db")).unwrap();
    let repo = SqliteProjectRepository::new(&conn);

    let first = Project::new("Launch");
    let second = Project::new("Webinar");
    repo.create_project(&first).unwrap();
    repo.create_project(&second).unwrap();

    let a = task("a", "Write copy", Some("Fazendo"));
    let b = task("b", "Publish", None);
    let edge = Edge::new(EdgeId::from("e1"), a.id.clone(), b.id.clone(), "custom");
    let mut update = update_marked(250);
    update.nodes = vec![a, b];
    update.edges = vec![edge];
    update.presentation_order = vec![ViewId::Hub, ViewId::Board];
    thread::sleep(Duration::from_millis(5));
    repo.save_project(first.id, &update).unwrap();

    let loaded = repo.load_project(first.id).unwrap();
    assert_eq!(loaded.name, "Launch");
    assert_eq!(loaded.nodes, update.nodes);
    assert_eq!(loaded.edges, update.edges);
    assert_eq!(loaded.presentation_order, update.presentation_order);
    assert_eq!(loaded.analysis.leads, 250);
    assert!(loaded.updated_at >= loaded.created_at);

    let listed: Vec<ProjectId> = repo.list_projects().unwrap().iter().map(|p| p.id).collect();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0], first.id);

    repo.delete_project(second.id).unwrap();
    assert!(matches!(
        repo.load_project(second.id),
        Err(RepoError::NotFound(id)) if id == second.id
    ));
    assert!(matches!(
        repo.delete_project(second.id),
        Err(RepoError::NotFound(_))
    ));
}

#[test]
fn sqlite_repository_refuses_dangling_edges_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("projects.db")).unwrap();
    let repo = SqliteProjectRepository::new(&conn);
    let project = Project::new("Launch");
    repo.create_project(&project).unwrap();

    let node = BlockNode::task("only");
    let mut update = update_marked(1);
    update.edges = vec![Edge::new(
        EdgeId::from("e1"),
        node.id.clone(),
        "ghost".into(),
        "custom",
    )];
    update.nodes = vec![node];

    assert!(matches!(
        repo.save_project(project.id, &update),
        Err(RepoError::Validation(_))
    ));
    assert!(repo.load_project(project.id).unwrap().nodes.is_empty());
}

/// Repository whose first write parks until the test releases it.
struct BlockingRepository {
    entered: Barrier,
    release: Barrier,
    blocked_once: AtomicBool,
    rejected_leads: Option<u64>,
    records: Mutex<Vec<u64>>,
}

impl BlockingRepository {
    fn new() -> Self {
        Self {
            entered: Barrier::new(2),
            release: Barrier::new(2),
            blocked_once: AtomicBool::new(false),
            rejected_leads: None,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Fails every write whose update carries `leads`.
    fn rejecting(leads: u64) -> Self {
        Self {
            rejected_leads: Some(leads),
            ..Self::new()
        }
    }
}

impl ProjectRepository for BlockingRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        Ok(project.id)
    }

    fn load_project(&self, id: ProjectId) -> RepoResult<Project> {
        Err(RepoError::NotFound(id))
    }

    fn save_project(&self, _id: ProjectId, update: &ProjectUpdate) -> RepoResult<()> {
        if !self.blocked_once.swap(true, Ordering::SeqCst) {
            self.entered.wait();
            self.release.wait();
        }
        if self.rejected_leads == Some(update.analysis.leads) {
            return Err(RepoError::InvalidData("storage offline".to_string()));
        }
        self.records.lock().unwrap().push(update.analysis.leads);
        Ok(())
    }

    fn list_projects(&self) -> RepoResult<Vec<ProjectSummary>> {
        Ok(Vec::new())
    }

    fn delete_project(&self, _id: ProjectId) -> RepoResult<()> {
        Ok(())
    }
}

fn wait_for_queued<R: ProjectRepository>(sync: &PersistenceSynchronizer<R>, count: usize) {
    while sync.queued_saves() < count {
        thread::yield_now();
    }
}

#[test]
fn saves_during_a_write_coalesce_to_the_latest() {
    let sync = PersistenceSynchronizer::new(BlockingRepository::new());
    let project_id = ProjectId::new_v4();

    thread::scope(|scope| {
        let writer = scope.spawn(|| sync.save(project_id, update_marked(1)));
        sync.repository().entered.wait();
        assert!(sync.is_saving());

        let superseded = scope.spawn(|| sync.save(project_id, update_marked(2)));
        wait_for_queued(&sync, 1);
        let latest = scope.spawn(|| sync.save(project_id, update_marked(3)));
        wait_for_queued(&sync, 2);
        sync.repository().release.wait();

        assert_eq!(writer.join().unwrap().unwrap(), SaveOutcome::Saved);
        assert_eq!(superseded.join().unwrap().unwrap(), SaveOutcome::Coalesced);
        assert_eq!(latest.join().unwrap().unwrap(), SaveOutcome::Coalesced);
    });

    assert_eq!(*sync.repository().records.lock().unwrap(), vec![1, 3]);
    assert!(!sync.is_saving());
    assert_eq!(sync.queued_saves(), 0);
}

#[test]
fn queued_save_sees_its_drained_write_fail() {
    let sync = PersistenceSynchronizer::new(BlockingRepository::rejecting(2));
    let project_id = ProjectId::new_v4();

    thread::scope(|scope| {
        let writer = scope.spawn(|| sync.save(project_id, update_marked(1)));
        sync.repository().entered.wait();

        let queued = scope.spawn(|| sync.save(project_id, update_marked(2)));
        wait_for_queued(&sync, 1);
        sync.repository().release.wait();

        assert_eq!(writer.join().unwrap().unwrap(), SaveOutcome::Saved);
        let err = queued.join().unwrap().unwrap_err();
        assert!(matches!(
            &err,
            SyncError::Repo { project_id: failed, source }
                if *failed == project_id && matches!(source.as_ref(), RepoError::InvalidData(_))
        ));
    });

    assert_eq!(*sync.repository().records.lock().unwrap(), vec![1]);
    assert!(!sync.is_saving());
}

#[test]
fn failed_write_is_reported_and_releases_the_slot() {
    let project = Project::new("Offline");
    let id = project.id;
    let repo = MemoryRepository::with_project(project);
    repo.set_failing(true);
    let sync = PersistenceSynchronizer::new(repo);

    let err = sync.save(id, update_marked(1)).unwrap_err();
    assert!(matches!(err, SyncError::Repo { project_id, .. } if project_id == id));
    assert!(!sync.is_saving());

    sync.repository().set_failing(false);
    assert_eq!(sync.save(id, update_marked(2)).unwrap(), SaveOutcome::Saved);
    assert_eq!(sync.repository().stored(id).analysis.leads, 2);
}

#[test]
fn session_save_failure_queues_notice() {
    let project = Project::new("Offline");
    let id = project.id;
    let mut session = EditorSession::new(
        EngineConfig::default(),
        MemoryRepository::with_project(project),
        Plan::Free,
    );
    session.open_project(id).unwrap();
    session.repository().set_failing(true);

    let err = session.save().unwrap_err();

    assert!(matches!(err, SessionError::Sync(_)));
    let notices = session.drain_notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].is_error());
    assert_eq!(notices[0].title, "Save failed");
}

#[test]
fn session_without_project_refuses_to_save() {
    let mut session =
        EditorSession::new(EngineConfig::default(), MemoryRepository::default(), Plan::Free);
    assert!(matches!(session.save(), Err(SessionError::NoProject)));
}

#[test]
fn reopening_current_project_is_a_no_op() {
    let project = Project::new("Same");
    let id = project.id;
    let mut session = EditorSession::new(
        EngineConfig::default(),
        MemoryRepository::with_project(project),
        Plan::Pro,
    );

    assert!(session.open_project(id).unwrap());
    session.add_node(task("t1", "Unsaved", None)).unwrap();
    assert!(!session.open_project(id).unwrap());
    assert_eq!(session.graph().nodes().len(), 1);
}

#[test]
fn opening_unknown_project_keeps_state_and_notifies() {
    let mut session =
        EditorSession::new(EngineConfig::default(), MemoryRepository::default(), Plan::Free);
    let err = session.open_project(ProjectId::new_v4()).unwrap_err();
    assert!(matches!(err, SessionError::Load(RepoError::NotFound(_))));
    assert!(session.project_id().is_none());
    assert_eq!(session.drain_notices()[0].title, "Could not open project");
}

#[test]
fn calendar_changes_persist_best_effort() {
    let project = Project::new("Agenda");
    let id = project.id;
    let mut session = EditorSession::new(
        EngineConfig::default(),
        MemoryRepository::with_project(project),
        Plan::Free,
    );
    session.open_project(id).unwrap();

    let event = CalendarEvent::new("ev-1", "Kickoff", day(2026, 3, 1));
    session.add_calendar_event(event).unwrap();
    assert_eq!(session.repository().stored(id).calendar_events.len(), 1);

    session.repository().set_failing(true);
    session.delete_calendar_event("ev-1").unwrap();
    assert!(session.calendar().events().is_empty());
    assert_eq!(session.repository().stored(id).calendar_events.len(), 1);
    assert_eq!(session.drain_notices().last().unwrap().title, "Save failed");
}
