//! View identifiers used for navigation, presentation order and export.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewId {
    #[serde(rename = "hub")]
    Hub,
    #[serde(rename = "fluxo")]
    Canvas,
    #[serde(rename = "kanban")]
    Board,
    #[serde(rename = "notes")]
    Notebook,
    #[serde(rename = "calendar")]
    Calendar,
    #[serde(rename = "timeline")]
    Timeline,
}

impl ViewId {
    pub const ALL: [ViewId; 6] = [
        ViewId::Hub,
        ViewId::Canvas,
        ViewId::Board,
        ViewId::Notebook,
        ViewId::Calendar,
        ViewId::Timeline,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hub => "hub",
            Self::Canvas => "fluxo",
            Self::Board => "kanban",
            Self::Notebook => "notes",
            Self::Calendar => "calendar",
            Self::Timeline => "timeline",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|view| view.as_str() == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hub => "Hub",
            Self::Canvas => "Canvas",
            Self::Board => "Board",
            Self::Notebook => "Notebook",
            Self::Calendar => "Calendar",
            Self::Timeline => "Timeline",
        }
    }
}

impl Display for ViewId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
