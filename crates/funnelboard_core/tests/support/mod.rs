#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use funnelboard_core::export::{
    RasterImage, RasterRequest, RenderCollaborator, RenderError, RenderRegion,
};
use image::{ImageFormat, Rgb, RgbImage};
use funnelboard_core::model::{BlockData, BlockNode, NodeId, Position, TaskAttributes, TaskStatus};
use funnelboard_core::repo::{ProjectSummary, RepoError, RepoResult};
use funnelboard_core::{Project, ProjectId, ProjectRepository, ProjectUpdate};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn task(id: &str, label: &str, status: Option<&str>) -> BlockNode {
    BlockNode::new(
        NodeId::from(id),
        Position::default(),
        BlockData::Task(TaskAttributes {
            label: Some(label.to_string()),
            status: status.map(|value| TaskStatus::from(value.to_string())),
            ..TaskAttributes::default()
        }),
    )
}

/// In-memory storage collaborator with a switchable failure mode.
#[derive(Default)]
pub struct MemoryRepository {
    projects: Mutex<HashMap<ProjectId, Project>>,
    failing: AtomicBool,
    saves: Mutex<Vec<ProjectUpdate>>,
}

impl MemoryRepository {
    pub fn with_project(project: Project) -> Self {
        let repo = Self::default();
        repo.create_project(&project).unwrap();
        repo
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn saves(&self) -> Vec<ProjectUpdate> {
        self.saves.lock().unwrap().clone()
    }

    pub fn stored(&self, id: ProjectId) -> Project {
        self.projects.lock().unwrap()[&id].clone()
    }
}

impl ProjectRepository for MemoryRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        project.validate()?;
        self.projects
            .lock()
            .unwrap()
            .insert(project.id, project.clone());
        Ok(project.id)
    }

    fn load_project(&self, id: ProjectId) -> RepoResult<Project> {
        self.projects
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(RepoError::NotFound(id))
    }

    fn save_project(&self, id: ProjectId, update: &ProjectUpdate) -> RepoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepoError::InvalidData("storage offline".to_string()));
        }
        let mut projects = self.projects.lock().unwrap();
        let project = projects.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        project.apply_update(update.clone(), Utc::now());
        self.saves.lock().unwrap().push(update.clone());
        Ok(())
    }

    fn list_projects(&self) -> RepoResult<Vec<ProjectSummary>> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .values()
            .map(|project| ProjectSummary {
                id: project.id,
                name: project.name.clone(),
                created_at: project.created_at,
                updated_at: project.updated_at,
            })
            .collect())
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        self.projects
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound(id))
    }
}

/// Rendering collaborator that records every call.
pub struct FakeRenderer {
    regions: HashSet<RenderRegion>,
    pub requests: RefCell<Vec<RasterRequest>>,
}

impl FakeRenderer {
    pub fn with_regions(regions: &[RenderRegion]) -> Self {
        Self {
            regions: regions.iter().copied().collect(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn all_regions() -> Self {
        Self::with_regions(&[
            RenderRegion::CanvasViewport,
            RenderRegion::CalendarGrid,
            RenderRegion::TimelineArea,
        ])
    }
}

impl RenderCollaborator for FakeRenderer {
    fn has_region(&self, region: RenderRegion) -> bool {
        self.regions.contains(&region)
    }

    fn rasterize(&self, request: &RasterRequest) -> Result<RasterImage, RenderError> {
        self.requests.borrow_mut().push(request.clone());
        let (width, height) = request.size_px.unwrap_or((800, 600));
        Ok(RasterImage::new(width, height, solid_png(width, height)))
    }
}

/// Small single-color PNG; the encoder scales it onto the page.
pub fn solid_png(width: u32, height: u32) -> Vec<u8> {
    let pixels = RgbImage::from_pixel(width.min(64), height.min(64), Rgb([15, 17, 21]));
    let mut bytes = Vec::new();
    pixels
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}
