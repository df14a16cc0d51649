//! Editing session facade.
//!
//! # Responsibility
//! - Own every store of the one open project and wire them to the quota gate,
//!   the persistence synchronizer, the projector and the notice queue.
//! - Translate collaborator failures into user-facing notices.
//!
//! # Invariants
//! - The cached calendar read model is rebuilt after every graph or calendar
//!   mutation; it is never patched in place.
//! - Opening a different project replaces all session state at once (plan
//!   kept); re-opening the current project is a no-op.
//! - Undo is a no-op while playback is active.
//! - Playback never starts on top of a failed save.

use crate::config::EngineConfig;
use crate::export::{JsonArtifact, ProjectFileRef, RenderCollaborator};
use crate::model::{
    Analysis, BlockNode, CalendarEvent, CalendarEventPatch, EdgeId, NodeId, Project, ProjectId,
    ProjectUpdate, UploadedFile, ViewId,
};
use crate::notice::{Notice, NoticeQueue};
use crate::projection::{
    project_board, project_calendar, project_panel_preview, project_timeline, BoardColumns,
    CalendarEntry, PanelColumn, Timeline,
};
use crate::quota::{Plan, QuotaGate};
use crate::repo::{ProjectRepository, RepoError};
use crate::service::{
    export_json, ExportError, ExportPipeline, ExportSource, PdfArtifact,
    PersistenceSynchronizer, SaveOutcome, SyncError,
};
use crate::store::{
    CalendarError, CalendarStore, GraphError, GraphStore, NodeAdmission, NotebookError,
    NotebookStore, PresentationError, PresentationSequencer,
};
use chrono::{NaiveDate, Utc};
use log::{error, info, warn};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug)]
pub enum SessionError {
    /// The operation needs an open project.
    NoProject,
    Load(RepoError),
    Graph(GraphError),
    Notebook(NotebookError),
    Calendar(CalendarError),
    Presentation(PresentationError),
    Sync(SyncError),
    Export(ExportError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoProject => write!(f, "no project is open"),
            Self::Load(err) => write!(f, "failed to open project: {err}"),
            Self::Graph(err) => write!(f, "{err}"),
            Self::Notebook(err) => write!(f, "{err}"),
            Self::Calendar(err) => write!(f, "{err}"),
            Self::Presentation(err) => write!(f, "{err}"),
            Self::Sync(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoProject => None,
            Self::Load(err) => Some(err),
            Self::Graph(err) => Some(err),
            Self::Notebook(err) => Some(err),
            Self::Calendar(err) => Some(err),
            Self::Presentation(err) => Some(err),
            Self::Sync(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<GraphError> for SessionError {
    fn from(value: GraphError) -> Self {
        Self::Graph(value)
    }
}

impl From<NotebookError> for SessionError {
    fn from(value: NotebookError) -> Self {
        Self::Notebook(value)
    }
}

impl From<CalendarError> for SessionError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

impl From<PresentationError> for SessionError {
    fn from(value: PresentationError) -> Self {
        Self::Presentation(value)
    }
}

impl From<SyncError> for SessionError {
    fn from(value: SyncError) -> Self {
        Self::Sync(value)
    }
}

impl From<ExportError> for SessionError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

/// One open editing session over a storage collaborator `R`.
pub struct EditorSession<R> {
    config: EngineConfig,
    project_id: Option<ProjectId>,
    name: String,
    graph: GraphStore,
    notebook: NotebookStore,
    calendar: CalendarStore,
    presentation: PresentationSequencer,
    analysis: Analysis,
    current_view: ViewId,
    calendar_entries: Vec<CalendarEntry>,
    notices: NoticeQueue,
    synchronizer: PersistenceSynchronizer<R>,
}

impl<R: ProjectRepository> EditorSession<R> {
    pub fn new(config: EngineConfig, repository: R, plan: Plan) -> Self {
        let graph = Self::empty_graph(&config, plan);
        Self {
            config,
            project_id: None,
            name: String::new(),
            graph,
            notebook: NotebookStore::default(),
            calendar: CalendarStore::default(),
            presentation: PresentationSequencer::default(),
            analysis: Analysis::default(),
            current_view: ViewId::Hub,
            calendar_entries: Vec::new(),
            notices: NoticeQueue::default(),
            synchronizer: PersistenceSynchronizer::new(repository),
        }
    }

    fn empty_graph(config: &EngineConfig, plan: Plan) -> GraphStore {
        GraphStore::new(QuotaGate::new(config.quota), plan, config.history_capacity)
    }

    /// Loads project `id` from storage and makes it the session's project.
    ///
    /// Returns `false` when `id` is already open.
    ///
    /// # Errors
    /// - `SessionError::Load` when storage fails or the document is invalid;
    ///   the session keeps its previous state.
    pub fn open_project(&mut self, id: ProjectId) -> SessionResult<bool> {
        if self.project_id == Some(id) {
            return Ok(false);
        }
        let project = match self.synchronizer.repository().load_project(id) {
            Ok(project) => project,
            Err(err) => {
                error!("event=project_open module=session status=error project_id={id} error={err}");
                self.notices.push(Notice::error("Could not open project", err.to_string()));
                return Err(SessionError::Load(err));
            }
        };
        self.install(project)?;
        Ok(true)
    }

    /// Replaces all session state with `project`, keeping the plan.
    ///
    /// # Errors
    /// - Graph or calendar validation failures; nothing is replaced then.
    pub fn install(&mut self, project: Project) -> SessionResult<()> {
        let mut graph = Self::empty_graph(&self.config, self.graph.plan());
        graph.load(project.nodes, project.edges)?;
        let mut calendar = CalendarStore::default();
        calendar.set_events(project.calendar_events)?;
        let mut notebook = NotebookStore::default();
        notebook.load(project.notebook_documents);
        let mut presentation = PresentationSequencer::default();
        presentation.set_order(project.presentation_order);

        self.project_id = Some(project.id);
        self.name = project.name;
        self.graph = graph;
        self.calendar = calendar;
        self.notebook = notebook;
        self.presentation = presentation;
        self.analysis = project.analysis;
        self.current_view = ViewId::Hub;
        self.refresh_calendar();

        info!(
            "event=project_open module=session status=ok project_id={} nodes={} edges={}",
            project.id,
            self.graph.nodes().len(),
            self.graph.edges().len()
        );
        Ok(())
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage collaborator the session persists through.
    pub fn repository(&self) -> &R {
        self.synchronizer.repository()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn plan(&self) -> Plan {
        self.graph.plan()
    }

    pub fn set_plan(&mut self, plan: Plan) {
        self.graph.set_plan(plan);
    }

    pub fn analysis(&self) -> Analysis {
        self.analysis
    }

    pub fn set_analysis(&mut self, analysis: Analysis) {
        self.analysis = analysis;
    }

    pub fn current_view(&self) -> ViewId {
        self.current_view
    }

    /// Switches the visible view; always clears the node selection.
    pub fn set_current_view(&mut self, view: ViewId) {
        self.graph.select_node(None);
        self.current_view = view;
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    /// Adds `node` through the quota gate; a rejection is queued as a notice.
    pub fn add_node(&mut self, node: BlockNode) -> SessionResult<NodeAdmission> {
        let admission = self.graph.add_node(node)?;
        match &admission {
            NodeAdmission::Added(_) => self.refresh_calendar(),
            NodeAdmission::Rejected(rejection) => self.notices.push(rejection.to_notice()),
        }
        Ok(admission)
    }

    pub fn update_node_data(&mut self, id: &NodeId, patch: &Map<String, Value>) -> SessionResult<()> {
        self.graph.update_node_data(id, patch)?;
        self.refresh_calendar();
        Ok(())
    }

    /// Records an upload collaborator result onto media node `id`.
    pub fn record_upload(&mut self, id: &NodeId, file: UploadedFile) -> SessionResult<()> {
        self.update_node_data(id, &file.into_patch())
    }

    pub fn move_node(&mut self, id: &NodeId, x: f64, y: f64) -> SessionResult<()> {
        self.graph.move_node(id, x, y)?;
        Ok(())
    }

    pub fn delete_node(&mut self, id: &NodeId) -> SessionResult<()> {
        self.graph.delete_node(id)?;
        self.refresh_calendar();
        Ok(())
    }

    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> SessionResult<EdgeId> {
        Ok(self.graph.connect(source, target, "custom")?)
    }

    pub fn delete_edge(&mut self, id: &EdgeId) -> SessionResult<()> {
        self.graph.delete_edge(id)?;
        Ok(())
    }

    pub fn select_node(&mut self, id: Option<&NodeId>) {
        self.graph.select_node(id);
    }

    pub fn unselect_node(&mut self) {
        self.graph.select_node(None);
    }

    /// Reverts the last node update or deletion.
    ///
    /// Returns `false` when history is empty or playback is active.
    pub fn undo(&mut self) -> bool {
        if self.presentation.is_active() {
            return false;
        }
        let restored = self.graph.undo();
        if restored {
            self.refresh_calendar();
        }
        restored
    }

    pub fn board(&self) -> BoardColumns<'_> {
        project_board(self.graph.nodes())
    }

    pub fn calendar_entries(&self) -> &[CalendarEntry] {
        &self.calendar_entries
    }

    pub fn timeline(&self, today: NaiveDate) -> Timeline<'_> {
        project_timeline(self.graph.nodes(), today, self.config.timeline_fallback_days)
    }

    pub fn timeline_today(&self) -> Timeline<'_> {
        self.timeline(Utc::now().date_naive())
    }

    pub fn panel_preview(&self) -> Vec<PanelColumn<'_>> {
        project_panel_preview(self.graph.nodes())
    }

    fn refresh_calendar(&mut self) {
        self.calendar_entries = project_calendar(self.graph.nodes(), self.calendar.events());
    }

    pub fn notebook(&self) -> &NotebookStore {
        &self.notebook
    }

    pub fn mark_notebook_dirty(&mut self) {
        self.notebook.mark_dirty();
    }

    /// Overwrites the active document and persists the project.
    ///
    /// # Errors
    /// - `SessionError::Sync` when persistence fails; the notebook is marked
    ///   dirty again.
    pub fn save_notebook(&mut self, title: &str, content: &str) -> SessionResult<()> {
        self.notebook.save(title, content);
        match self.save() {
            Ok(_) => {
                self.notices.push(Notice::info("Note saved"));
                Ok(())
            }
            Err(err) => {
                self.notebook.mark_dirty();
                Err(err)
            }
        }
    }

    /// Editor blur hook: saves only while autosave is on.
    pub fn notebook_blur(&mut self, title: &str, content: &str) -> SessionResult<bool> {
        if !self.notebook.autosave_enabled() {
            return Ok(false);
        }
        self.save_notebook(title, content)?;
        Ok(true)
    }

    pub fn toggle_notebook_autosave(&mut self) -> bool {
        self.notebook.toggle_autosave()
    }

    pub fn set_current_document(&mut self, index: usize) -> SessionResult<()> {
        self.notebook.set_current_index(index)?;
        Ok(())
    }

    pub fn add_document(&mut self, title: &str) -> usize {
        self.notebook.add_document(title)
    }

    pub fn delete_current_document(&mut self) -> SessionResult<()> {
        self.notebook.delete_current()?;
        Ok(())
    }

    pub fn calendar(&self) -> &CalendarStore {
        &self.calendar
    }

    pub fn set_calendar_events(&mut self, events: Vec<CalendarEvent>) -> SessionResult<()> {
        self.calendar.set_events(events)?;
        self.refresh_calendar();
        Ok(())
    }

    /// Stores `event`, then persists in the background of the call: a failed
    /// save is reported as a notice and does not undo the event.
    pub fn add_calendar_event(&mut self, event: CalendarEvent) -> SessionResult<()> {
        self.calendar.add_event(event)?;
        self.refresh_calendar();
        self.save_best_effort();
        Ok(())
    }

    pub fn update_calendar_event(
        &mut self,
        id: &str,
        patch: &CalendarEventPatch,
    ) -> SessionResult<()> {
        self.calendar.update_event(id, patch)?;
        self.refresh_calendar();
        self.save_best_effort();
        Ok(())
    }

    pub fn delete_calendar_event(&mut self, id: &str) -> SessionResult<()> {
        self.calendar.delete_event(id)?;
        self.refresh_calendar();
        self.save_best_effort();
        Ok(())
    }

    pub fn presentation(&self) -> &PresentationSequencer {
        &self.presentation
    }

    pub fn set_presentation_order(&mut self, order: Vec<ViewId>) {
        self.presentation.set_order(order);
    }

    /// Saves, then enters playback on the current (or first) slide.
    ///
    /// # Errors
    /// - `SessionError::Sync` / `NoProject` when the pre-playback save fails;
    ///   playback is not entered.
    /// - `SessionError::Presentation` when the order is empty.
    pub fn begin_playback(&mut self) -> SessionResult<ViewId> {
        if let Err(err) = self.save() {
            warn!("event=playback_begin module=session status=rejected error={err}");
            return Err(err);
        }
        let view = self.presentation.begin()?;
        self.graph.select_node(None);
        info!("event=playback_begin module=session status=ok view={view}");
        Ok(view)
    }

    pub fn end_playback(&mut self) {
        self.presentation.end();
        info!("event=playback_end module=session status=ok");
    }

    pub fn next_slide(&mut self) -> Option<ViewId> {
        self.presentation.next()
    }

    pub fn previous_slide(&mut self) -> Option<ViewId> {
        self.presentation.previous()
    }

    pub fn jump_to_slide(&mut self, view: ViewId) -> SessionResult<()> {
        self.presentation.jump_to(view)?;
        Ok(())
    }

    /// Live in-session projection pushed on every save.
    pub fn save_payload(&self) -> ProjectUpdate {
        ProjectUpdate {
            nodes: self.graph.nodes().to_vec(),
            edges: self.graph.edges().to_vec(),
            presentation_order: self.presentation.order().to_vec(),
            analysis: self.analysis,
            notebook_documents: self.notebook.documents().to_vec(),
            calendar_events: self.calendar.events().to_vec(),
        }
    }

    /// Persists the session state.
    ///
    /// # Errors
    /// - `SessionError::NoProject` when nothing is open.
    /// - `SessionError::Sync` on storage failure, after queueing an error
    ///   notice.
    pub fn save(&mut self) -> SessionResult<SaveOutcome> {
        let project_id = self.project_id.ok_or(SessionError::NoProject)?;
        match self.synchronizer.save(project_id, self.save_payload()) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.notices.push(Notice::error(
                    "Save failed",
                    format!("Your changes could not be saved: {err}"),
                ));
                Err(err.into())
            }
        }
    }

    fn save_best_effort(&mut self) {
        if self.project_id.is_none() {
            return;
        }
        if let Err(err) = self.save() {
            warn!("event=calendar_persist module=session status=error error={err}");
        }
    }

    pub fn export_json(&mut self) -> SessionResult<JsonArtifact> {
        let file = ProjectFileRef {
            name: &self.name,
            nodes: self.graph.nodes(),
            edges: self.graph.edges(),
            presentation_order: self.presentation.order(),
            analysis: self.analysis,
        };
        match export_json(&file) {
            Ok(artifact) => Ok(artifact),
            Err(err) => {
                self.notices
                    .push(Notice::error("JSON export failed", err.to_string()));
                Err(err.into())
            }
        }
    }

    /// Exports `view` as a PDF through `pipeline`, queueing progress and
    /// failure notices.
    pub fn export_pdf<C: RenderCollaborator>(
        &mut self,
        pipeline: &ExportPipeline<C>,
        view: ViewId,
    ) -> SessionResult<PdfArtifact> {
        self.notices.push(
            Notice::info(format!("Exporting {} to PDF...", view.label()))
                .with_description("This may take a few seconds."),
        );
        let source = ExportSource {
            name: &self.name,
            nodes: self.graph.nodes(),
            current_document: self.notebook.current(),
        };
        let result = pipeline.export_pdf(view, &source);
        if let Err(err) = &result {
            self.notices.push(export_notice(err));
        }
        result.map_err(SessionError::from)
    }

    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }
}

fn export_notice(err: &ExportError) -> Notice {
    match err {
        ExportError::EmptyCanvas => Notice::info("Canvas is empty")
            .with_description("Add some blocks before exporting."),
        ExportError::Unsupported(_) => Notice::error(
            "Export not available",
            "PDF export is not available for this view.",
        ),
        ExportError::RegionNotFound(region) => Notice::error(
            "PDF export failed",
            format!("Could not find the element ({region}) to export."),
        ),
        ExportError::Render(_) | ExportError::Encode(_) | ExportError::Serialize(_) => Notice::error(
            "PDF export failed",
            "An unexpected error occurred. Please try again.",
        ),
    }
}
