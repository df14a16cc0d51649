//! Block node domain model.
//!
//! # Responsibility
//! - Define the canvas node shape shared by every view projection.
//! - Map each block kind to one static descriptor (label/icon/capabilities).
//! - Merge partial attribute patches without ever changing a node's kind.
//!
//! # Invariants
//! - Every node carries exactly one known `BlockKind`; unknown wire tags are
//!   rejected at decode time and never coerced.
//! - `BlockData` variant and `BlockNode::kind()` always agree.
//! - Unknown attribute keys survive decode/encode through `extra`.

use super::ModelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one block node inside a project.
///
/// Imported ids are kept verbatim, so this wraps the raw wire string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh node id for locally created blocks.
    pub fn generate() -> Self {
        Self(format!("node_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Fixed enumeration of block kinds a canvas node can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    Task,
    Note,
    WebLink,
    ImageMedia,
    VideoMedia,
    AudioMedia,
    PdfMedia,
    BoardPanel,
}

impl BlockKind {
    pub const ALL: [BlockKind; 8] = [
        BlockKind::Task,
        BlockKind::Note,
        BlockKind::WebLink,
        BlockKind::ImageMedia,
        BlockKind::VideoMedia,
        BlockKind::AudioMedia,
        BlockKind::PdfMedia,
        BlockKind::BoardPanel,
    ];

    /// Stable wire tag stored in `data.type`.
    pub fn as_str(self) -> &'static str {
        self.descriptor().tag
    }

    /// Parses a wire tag. Returns `None` for unknown tags.
    pub fn parse(value: &str) -> Option<Self> {
        BLOCK_DESCRIPTORS
            .iter()
            .find(|descriptor| descriptor.tag == value)
            .map(|descriptor| descriptor.kind)
    }

    pub fn descriptor(self) -> &'static BlockDescriptor {
        let index = match self {
            Self::Task => 0,
            Self::Note => 1,
            Self::WebLink => 2,
            Self::ImageMedia => 3,
            Self::VideoMedia => 4,
            Self::AudioMedia => 5,
            Self::PdfMedia => 6,
            Self::BoardPanel => 7,
        };
        &BLOCK_DESCRIPTORS[index]
    }

    /// Whether this kind counts against the media upload sub-limit.
    pub fn is_media(self) -> bool {
        self.descriptor().is_media
    }
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static presentation and capability metadata for one block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDescriptor {
    pub kind: BlockKind,
    /// Wire tag stored in `data.type`.
    pub tag: &'static str,
    /// Human-readable label used by exports and libraries.
    pub label: &'static str,
    /// Icon name understood by the rendering layer.
    pub icon: &'static str,
    /// Accent color as `#RRGGBB`.
    pub color: &'static str,
    pub is_media: bool,
    pub has_url: bool,
    pub has_file: bool,
    pub is_task: bool,
    pub embeds_board: bool,
}

const BLOCK_DESCRIPTORS: [BlockDescriptor; 8] = [
    BlockDescriptor {
        kind: BlockKind::Task,
        tag: "task",
        label: "Task",
        icon: "check-square",
        color: "#3B82F6",
        is_media: false,
        has_url: false,
        has_file: false,
        is_task: true,
        embeds_board: false,
    },
    BlockDescriptor {
        kind: BlockKind::Note,
        tag: "notes",
        label: "Note",
        icon: "file-text",
        color: "#F59E0B",
        is_media: false,
        has_url: false,
        has_file: false,
        is_task: false,
        embeds_board: false,
    },
    BlockDescriptor {
        kind: BlockKind::WebLink,
        tag: "website",
        label: "Website",
        icon: "globe",
        color: "#10B981",
        is_media: false,
        has_url: true,
        has_file: false,
        is_task: false,
        embeds_board: false,
    },
    BlockDescriptor {
        kind: BlockKind::ImageMedia,
        tag: "image-upload",
        label: "Image",
        icon: "image",
        color: "#EC4899",
        is_media: true,
        has_url: false,
        has_file: true,
        is_task: false,
        embeds_board: false,
    },
    BlockDescriptor {
        kind: BlockKind::VideoMedia,
        tag: "video-upload",
        label: "Video",
        icon: "video",
        color: "#EF4444",
        is_media: true,
        has_url: false,
        has_file: true,
        is_task: false,
        embeds_board: false,
    },
    BlockDescriptor {
        kind: BlockKind::AudioMedia,
        tag: "audio-upload",
        label: "Audio",
        icon: "audio-lines",
        color: "#8B5CF6",
        is_media: true,
        has_url: false,
        has_file: true,
        is_task: false,
        embeds_board: false,
    },
    BlockDescriptor {
        kind: BlockKind::PdfMedia,
        tag: "pdf-upload",
        label: "PDF",
        icon: "file",
        color: "#F97316",
        is_media: true,
        has_url: false,
        has_file: true,
        is_task: false,
        embeds_board: false,
    },
    BlockDescriptor {
        kind: BlockKind::BoardPanel,
        tag: "kanban-panel",
        label: "Board panel",
        icon: "kanban-square",
        color: "#6366F1",
        is_media: false,
        has_url: false,
        has_file: false,
        is_task: false,
        embeds_board: true,
    },
];

/// Task status as stored on the wire.
///
/// Unrecognized values are preserved verbatim so a board projection can
/// still place the task (see `projection::board`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Todo,
    Doing,
    Done,
    Unrecognized(String),
}

impl TaskStatus {
    pub const TODO: &'static str = "A Fazer";
    pub const DOING: &'static str = "Fazendo";
    pub const DONE: &'static str = "Feito";

    pub fn as_str(&self) -> &str {
        match self {
            Self::Todo => Self::TODO,
            Self::Doing => Self::DOING,
            Self::Done => Self::DONE,
            Self::Unrecognized(value) => value.as_str(),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            Self::TODO => Self::Todo,
            Self::DOING => Self::Doing,
            Self::DONE => Self::Done,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        match value {
            TaskStatus::Unrecognized(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    #[serde(rename = "baixa")]
    Low,
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "alta")]
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "baixa",
            Self::Medium => "media",
            Self::High => "alta",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Attributes shared by every uploaded-media kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Kind-specific attribute bag, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlockData {
    #[serde(rename = "task")]
    Task(TaskAttributes),
    #[serde(rename = "notes")]
    Note(NoteAttributes),
    #[serde(rename = "website")]
    WebLink(LinkAttributes),
    #[serde(rename = "image-upload")]
    Image(MediaAttributes),
    #[serde(rename = "video-upload")]
    Video(MediaAttributes),
    #[serde(rename = "audio-upload")]
    Audio(MediaAttributes),
    #[serde(rename = "pdf-upload")]
    Pdf(MediaAttributes),
    #[serde(rename = "kanban-panel")]
    BoardPanel(PanelAttributes),
}

impl BlockData {
    /// Creates an empty attribute bag for `kind`.
    pub fn empty(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Task => Self::Task(TaskAttributes::default()),
            BlockKind::Note => Self::Note(NoteAttributes::default()),
            BlockKind::WebLink => Self::WebLink(LinkAttributes::default()),
            BlockKind::ImageMedia => Self::Image(MediaAttributes::default()),
            BlockKind::VideoMedia => Self::Video(MediaAttributes::default()),
            BlockKind::AudioMedia => Self::Audio(MediaAttributes::default()),
            BlockKind::PdfMedia => Self::Pdf(MediaAttributes::default()),
            BlockKind::BoardPanel => Self::BoardPanel(PanelAttributes::default()),
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Task(_) => BlockKind::Task,
            Self::Note(_) => BlockKind::Note,
            Self::WebLink(_) => BlockKind::WebLink,
            Self::Image(_) => BlockKind::ImageMedia,
            Self::Video(_) => BlockKind::VideoMedia,
            Self::Audio(_) => BlockKind::AudioMedia,
            Self::Pdf(_) => BlockKind::PdfMedia,
            Self::BoardPanel(_) => BlockKind::BoardPanel,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Task(attrs) => attrs.label.as_deref(),
            Self::Note(attrs) => attrs.label.as_deref(),
            Self::WebLink(attrs) => attrs.label.as_deref(),
            Self::Image(attrs) | Self::Video(attrs) | Self::Audio(attrs) | Self::Pdf(attrs) => {
                attrs.label.as_deref()
            }
            Self::BoardPanel(attrs) => attrs.label.as_deref(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Task(attrs) => attrs.description.as_deref(),
            Self::Note(attrs) => attrs.description.as_deref(),
            Self::WebLink(attrs) => attrs.description.as_deref(),
            Self::Image(attrs) | Self::Video(attrs) | Self::Audio(attrs) | Self::Pdf(attrs) => {
                attrs.description.as_deref()
            }
            Self::BoardPanel(_) => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::WebLink(attrs) => attrs.url.as_deref(),
            _ => None,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.as_media().and_then(|attrs| attrs.file_name.as_deref())
    }

    pub fn as_task(&self) -> Option<&TaskAttributes> {
        match self {
            Self::Task(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn as_media(&self) -> Option<&MediaAttributes> {
        match self {
            Self::Image(attrs) | Self::Video(attrs) | Self::Audio(attrs) | Self::Pdf(attrs) => {
                Some(attrs)
            }
            _ => None,
        }
    }

    /// Returns a copy of this bag with `patch` merged in, key by key.
    ///
    /// A `null` patch value clears an optional attribute. The kind tag may be
    /// repeated in the patch but must not change.
    ///
    /// # Errors
    /// - `ModelError::KindChange` when `patch.type` names another kind.
    /// - `ModelError::InvalidAttributes` when a patched value has the wrong shape.
    pub fn merged(&self, patch: &Map<String, Value>) -> Result<Self, ModelError> {
        let kind = self.kind();
        if let Some(tag) = patch.get("type") {
            if tag.as_str() != Some(kind.as_str()) {
                return Err(ModelError::KindChange {
                    from: kind,
                    to: tag.to_string(),
                });
            }
        }

        let mut bag = match serde_json::to_value(self) {
            Ok(Value::Object(bag)) => bag,
            Ok(_) => {
                return Err(ModelError::InvalidAttributes(
                    "attribute bag is not an object".to_string(),
                ))
            }
            Err(err) => return Err(ModelError::InvalidAttributes(err.to_string())),
        };
        for (key, value) in patch {
            bag.insert(key.clone(), value.clone());
        }

        serde_json::from_value(Value::Object(bag))
            .map_err(|err| ModelError::InvalidAttributes(err.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

fn default_renderer() -> String {
    "custom".to_string()
}

/// One placeable unit on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockNode {
    pub id: NodeId,
    /// Canvas renderer key; every engine node uses the generic renderer.
    #[serde(rename = "type", default = "default_renderer")]
    pub renderer: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
    pub data: BlockData,
}

impl BlockNode {
    pub fn new(id: NodeId, position: Position, data: BlockData) -> Self {
        Self {
            id,
            renderer: default_renderer(),
            position,
            width: None,
            height: None,
            selected: false,
            data,
        }
    }

    /// Creates a node with a generated id and an empty bag of `kind`.
    pub fn of_kind(kind: BlockKind, position: Position) -> Self {
        Self::new(NodeId::generate(), position, BlockData::empty(kind))
    }

    /// Creates a task node with the board defaults (`A Fazer`, low priority).
    pub fn task(label: impl Into<String>) -> Self {
        Self::new(
            NodeId::generate(),
            Position::default(),
            BlockData::Task(TaskAttributes {
                label: Some(label.into()),
                status: Some(TaskStatus::Todo),
                priority: Some(TaskPriority::Low),
                ..TaskAttributes::default()
            }),
        )
    }

    pub fn kind(&self) -> BlockKind {
        self.data.kind()
    }

    pub fn label(&self) -> Option<&str> {
        self.data.label()
    }

    /// Measured size, when the renderer reported both dimensions.
    pub fn size(&self) -> Option<Size> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Some(Size { width, height }),
            _ => None,
        }
    }
}

/// Result of a successful upload through the upload collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub url: String,
    pub file_name: String,
}

impl UploadedFile {
    /// Attribute patch recording this upload onto a media node.
    pub fn into_patch(self) -> Map<String, Value> {
        let mut patch = Map::new();
        patch.insert("fileUrl".to_string(), Value::String(self.url));
        patch.insert("fileName".to_string(), Value::String(self.file_name));
        patch
    }
}
