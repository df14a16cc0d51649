//! Project file import.
//!
//! # Responsibility
//! - Parse and validate an exported project file into a fresh `Project`.
//!
//! # Invariants
//! - Validation completes before a `Project` value exists; nothing is
//!   partially applied on failure.
//! - Node and edge identities and attribute bags are carried over unchanged;
//!   only the project id and timestamps are new.
//! - An unknown block kind is reported explicitly, never coerced.

use crate::model::{Analysis, BlockKind, BlockNode, Edge, ModelError, Project, ViewId};
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ImportError {
    /// Input is not JSON or does not have the project file shape.
    Malformed(String),
    Invalid(ModelError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(details) => write!(f, "malformed project file: {details}"),
            Self::Invalid(err) => write!(f, "invalid project file: {err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(_) => None,
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<ModelError> for ImportError {
    fn from(value: ModelError) -> Self {
        Self::Invalid(value)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectFile {
    name: Option<String>,
    nodes: Vec<Value>,
    edges: Vec<Edge>,
    #[serde(default, alias = "presentation_order")]
    presentation_order: Option<Vec<ViewId>>,
    #[serde(default)]
    analysis: Option<Analysis>,
}

/// Imports a project file.
///
/// `default_name` is used only when the file carries no `name` key; a blank
/// name present in the file is rejected.
pub fn import_project(raw: &str, default_name: &str) -> Result<Project, ImportError> {
    let file: ProjectFile =
        serde_json::from_str(raw).map_err(|err| ImportError::Malformed(err.to_string()))?;

    let name = file.name.unwrap_or_else(|| default_name.to_string());
    if name.trim().is_empty() {
        return Err(ModelError::EmptyName.into());
    }

    let nodes = file
        .nodes
        .into_iter()
        .map(decode_node)
        .collect::<Result<Vec<_>, _>>()?;

    let mut project = Project::new(name);
    project.nodes = nodes;
    project.edges = file.edges;
    project.presentation_order = file.presentation_order.unwrap_or_default();
    project.analysis = file.analysis.unwrap_or_default();

    if let Err(err) = project.validate() {
        warn!("event=project_import module=import status=rejected error={err}");
        return Err(err.into());
    }

    info!(
        "event=project_import module=import status=ok project_id={} nodes={} edges={}",
        project.id,
        project.nodes.len(),
        project.edges.len()
    );
    Ok(project)
}

fn decode_node(mut value: Value) -> Result<BlockNode, ImportError> {
    let node_id = value
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    tag_untyped_task(&mut value, &node_id);
    let kind = value
        .get("data")
        .and_then(|data| data.get("type"))
        .and_then(Value::as_str);

    match kind {
        Some(kind) if BlockKind::parse(kind).is_some() => {}
        Some(kind) => {
            warn!("event=project_import module=import status=rejected error_code=unknown_block_kind node_id={node_id}");
            return Err(ModelError::UnknownBlockKind {
                node_id,
                kind: kind.to_string(),
            }
            .into());
        }
        None => {
            return Err(ImportError::Malformed(format!(
                "node `{node_id}` has no block kind"
            )))
        }
    }

    serde_json::from_value(value)
        .map_err(|err| ImportError::Malformed(format!("node `{node_id}`: {err}")))
}

/// Task blocks saved by older editors carry only `isTask: true`; they are
/// tagged as tasks so they decode like any other task block.
fn tag_untyped_task(value: &mut Value, node_id: &str) {
    let Some(data) = value.get_mut("data").and_then(Value::as_object_mut) else {
        return;
    };
    let is_task = data.get("isTask").and_then(Value::as_bool) == Some(true);
    if is_task && !data.contains_key("type") {
        data.insert(
            "type".to_string(),
            Value::String(BlockKind::Task.as_str().to_string()),
        );
        info!("event=project_import module=import status=tagged_task node_id={node_id}");
    }
}
