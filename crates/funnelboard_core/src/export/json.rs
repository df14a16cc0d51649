//! Portable project file (`.json` export).
//!
//! Carries `{name, nodes, edges, presentationOrder, analysis}` only; notebook
//! documents and calendar events stay out of the portable file.

use crate::model::{Analysis, BlockNode, Edge, ViewId};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFileRef<'a> {
    pub name: &'a str,
    pub nodes: &'a [BlockNode],
    pub edges: &'a [Edge],
    pub presentation_order: &'a [ViewId],
    pub analysis: Analysis,
}

/// Pretty-printed project file ready to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonArtifact {
    pub file_name: String,
    pub contents: String,
}
