//! Export artifacts: portable JSON project files and per-view PDF layouts.
//!
//! # Responsibility
//! - Build export artifacts from read-only views of session state.
//! - Define the rendering collaborator seam used for rasterization.
//! - Encode PDF layouts into bytes.
//!
//! # Invariants
//! - Artifact names derive from the project name via `artifact_slug`.
//! - Nothing here mutates session state.

pub mod encode;
pub mod json;
pub mod layout;
pub mod pdf;
pub mod render;

pub use encode::{encode_pdf, EncodedPdf, PdfEncodeError};
pub use json::{JsonArtifact, ProjectFileRef};
pub use layout::{
    node_bounds, split_rich_text, viewport_for_bounds, wrap_text, Bounds, RichBlock,
    ViewportTransform,
};
pub use pdf::{
    build_board_pdf, build_canvas_pdf, build_notebook_pdf, build_raster_pdf, PageOrientation,
    PdfDocument, PdfElement, PdfPage, PdfTable, Rgb, TableStyle,
};
pub use render::{RasterImage, RasterRequest, RenderCollaborator, RenderError, RenderRegion};

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// File stem for exports: whitespace runs become `_`, then lowercase.
pub fn artifact_slug(name: &str) -> String {
    WHITESPACE_RE.replace_all(name, "_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::artifact_slug;

    #[test]
    fn slug_collapses_whitespace_and_lowercases() {
        assert_eq!(artifact_slug("My  Launch\tPlan"), "my_launch_plan");
        assert_eq!(artifact_slug("Solo"), "solo");
    }
}
