//! Export pipeline.
//!
//! # Responsibility
//! - Produce the portable JSON project file.
//! - Pick the per-view PDF strategy, drive the rendering collaborator and
//!   name the resulting artifact.
//!
//! # Invariants
//! - A missing render region is reported before anything is rasterized.
//! - Views without an export strategy yield `ExportError::Unsupported`.
//! - Exports read session state only.

use crate::config::ExportConfig;
use crate::export::{
    artifact_slug, build_board_pdf, build_canvas_pdf, build_notebook_pdf, build_raster_pdf,
    encode_pdf, node_bounds, viewport_for_bounds, JsonArtifact, PdfDocument, PdfEncodeError,
    ProjectFileRef, RasterRequest, RenderCollaborator, RenderError, RenderRegion,
};
use crate::model::{BlockNode, NotebookDocument, ViewId};
use crate::projection::project_board;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

#[derive(Debug)]
pub enum ExportError {
    RegionNotFound(RenderRegion),
    /// Canvas export requested with no blocks on the canvas.
    EmptyCanvas,
    Render(RenderError),
    Encode(PdfEncodeError),
    Serialize(String),
    Unsupported(ViewId),
}

impl ExportError {
    /// Whether this is an expected, informational outcome rather than a fault.
    pub fn is_notice_only(&self) -> bool {
        matches!(self, Self::EmptyCanvas | Self::Unsupported(_))
    }
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RegionNotFound(region) => write!(f, "could not find `{region}` to export"),
            Self::EmptyCanvas => write!(f, "canvas is empty; add some blocks before exporting"),
            Self::Render(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "{err}"),
            Self::Serialize(details) => write!(f, "failed to serialize project: {details}"),
            Self::Unsupported(view) => write!(f, "export is not available for the {view} view"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Render(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RenderError> for ExportError {
    fn from(value: RenderError) -> Self {
        match value {
            RenderError::RegionNotFound(region) => Self::RegionNotFound(region),
            other => Self::Render(other),
        }
    }
}

impl From<PdfEncodeError> for ExportError {
    fn from(value: PdfEncodeError) -> Self {
        Self::Encode(value)
    }
}

/// Session state a PDF export reads.
#[derive(Debug, Clone, Copy)]
pub struct ExportSource<'a> {
    pub name: &'a str,
    pub nodes: &'a [BlockNode],
    pub current_document: &'a NotebookDocument,
}

/// Encoded PDF ready to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

pub struct ExportPipeline<C> {
    renderer: C,
    config: ExportConfig,
}

impl<C: RenderCollaborator> ExportPipeline<C> {
    pub fn new(renderer: C, config: ExportConfig) -> Self {
        Self { renderer, config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Serializes the portable project file.
    pub fn export_json(&self, file: &ProjectFileRef<'_>) -> Result<JsonArtifact, ExportError> {
        export_json(file)
    }

    /// Builds and encodes the PDF for `view`.
    pub fn export_pdf(
        &self,
        view: ViewId,
        source: &ExportSource<'_>,
    ) -> Result<PdfArtifact, ExportError> {
        let started_at = Instant::now();
        let result = self
            .layout_for(view, source)
            .and_then(|document| encode_artifact(source.name, &document));

        match &result {
            Ok(artifact) => info!(
                "event=export_pdf module=export status=ok view={view} pages={} bytes={} duration_ms={}",
                artifact.page_count,
                artifact.bytes.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) if err.is_notice_only() => {
                warn!("event=export_pdf module=export status=rejected view={view} error={err}")
            }
            Err(err) => error!(
                "event=export_pdf module=export status=error view={view} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    fn layout_for(
        &self,
        view: ViewId,
        source: &ExportSource<'_>,
    ) -> Result<PdfDocument, ExportError> {
        match view {
            ViewId::Canvas => self.canvas_layout(source.nodes),
            ViewId::Board => Ok(build_board_pdf(&project_board(source.nodes), &self.config)),
            ViewId::Notebook => Ok(build_notebook_pdf(source.current_document, &self.config)),
            ViewId::Calendar => self.region_layout(RenderRegion::CalendarGrid),
            ViewId::Timeline => self.region_layout(RenderRegion::TimelineArea),
            ViewId::Hub => Err(ExportError::Unsupported(view)),
        }
    }

    fn canvas_layout(&self, nodes: &[BlockNode]) -> Result<PdfDocument, ExportError> {
        let region = RenderRegion::CanvasViewport;
        if !self.renderer.has_region(region) {
            return Err(ExportError::RegionNotFound(region));
        }
        let config = &self.config;
        let bounds = node_bounds(
            nodes,
            (config.default_node_width, config.default_node_height),
        )
        .ok_or(ExportError::EmptyCanvas)?;

        let width = f64::from(config.canvas_width_px);
        let height = f64::from(config.canvas_height_px);
        let transform = viewport_for_bounds(
            bounds,
            width,
            height,
            config.min_zoom,
            config.max_zoom,
            config.bounds_padding,
        );
        let snapshot = self.renderer.rasterize(&RasterRequest {
            region,
            background: config.background.clone(),
            size_px: Some((config.canvas_width_px, config.canvas_height_px)),
            transform: Some(transform),
        })?;
        Ok(build_canvas_pdf(nodes, snapshot))
    }

    fn region_layout(&self, region: RenderRegion) -> Result<PdfDocument, ExportError> {
        if !self.renderer.has_region(region) {
            return Err(ExportError::RegionNotFound(region));
        }
        let image = self.renderer.rasterize(&RasterRequest {
            region,
            background: self.config.background.clone(),
            size_px: None,
            transform: None,
        })?;
        Ok(build_raster_pdf(image))
    }

}

fn encode_artifact(name: &str, document: &PdfDocument) -> Result<PdfArtifact, ExportError> {
    let encoded = encode_pdf(document)?;
    Ok(PdfArtifact {
        file_name: format!("{}.pdf", artifact_slug(name)),
        bytes: encoded.bytes,
        page_count: encoded.page_count,
    })
}

/// Serializes the portable project file, pretty-printed.
pub fn export_json(file: &ProjectFileRef<'_>) -> Result<JsonArtifact, ExportError> {
    let contents = serde_json::to_string_pretty(file)
        .map_err(|err| ExportError::Serialize(err.to_string()))?;
    info!(
        "event=export_json module=export status=ok nodes={} edges={} bytes={}",
        file.nodes.len(),
        file.edges.len(),
        contents.len()
    );
    Ok(JsonArtifact {
        file_name: format!("{}.json", artifact_slug(file.name)),
        contents,
    })
}
