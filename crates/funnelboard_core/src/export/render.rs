//! Rendering collaborator contract.
//!
//! The engine never touches pixels of the live UI itself: it asks the host
//! renderer whether a region is mounted and to rasterize it.

use crate::export::layout::ViewportTransform;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rendered regions the export pipeline can rasterize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderRegion {
    CanvasViewport,
    CalendarGrid,
    TimelineArea,
}

impl RenderRegion {
    /// Host selector locating the region.
    pub fn selector(self) -> &'static str {
        match self {
            Self::CanvasViewport => ".react-flow__viewport",
            Self::CalendarGrid => "#calendar-export-area .fc-view-harness",
            Self::TimelineArea => "#timeline-export-area",
        }
    }
}

impl Display for RenderRegion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.selector())
    }
}

/// One rasterization call.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterRequest {
    pub region: RenderRegion,
    /// CSS color painted behind transparent pixels.
    pub background: String,
    /// Forced output size in pixels; the region's own size when `None`.
    pub size_px: Option<(u32, u32)>,
    /// Pan/zoom applied to the region before capture.
    pub transform: Option<ViewportTransform>,
}

/// PNG-encoded raster returned by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width_px: u32,
    pub height_px: u32,
    pub png: Vec<u8>,
}

impl RasterImage {
    pub fn new(width_px: u32, height_px: u32, png: Vec<u8>) -> Self {
        Self {
            width_px,
            height_px,
            png,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    RegionNotFound(RenderRegion),
    Rasterize(String),
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RegionNotFound(region) => write!(f, "render region not found: {region}"),
            Self::Rasterize(details) => write!(f, "rasterization failed: {details}"),
        }
    }
}

impl Error for RenderError {}

pub trait RenderCollaborator {
    fn has_region(&self, region: RenderRegion) -> bool;
    fn rasterize(&self, request: &RasterRequest) -> Result<RasterImage, RenderError>;
}

impl<T: RenderCollaborator + ?Sized> RenderCollaborator for &T {
    fn has_region(&self, region: RenderRegion) -> bool {
        (**self).has_region(region)
    }

    fn rasterize(&self, request: &RasterRequest) -> Result<RasterImage, RenderError> {
        (**self).rasterize(request)
    }
}
