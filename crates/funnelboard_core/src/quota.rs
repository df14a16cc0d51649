//! Plan-based admission check run before node creation.
//!
//! # Invariants
//! - Restricted plans reject any node once the total count reaches
//!   `max_nodes`, and reject media nodes once the media count reaches
//!   `max_media_nodes`, independently of each other.
//! - Unrestricted plans are never rejected.
//! - A rejection is a value, never a panic or error.

use crate::config::QuotaLimits;
use crate::model::BlockKind;
use crate::notice::Notice;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Subscription tier of the session owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    /// Restricted tier with node and media quotas.
    #[default]
    Free,
    /// Unrestricted tier.
    Pro,
}

impl Plan {
    pub fn is_restricted(self) -> bool {
        matches!(self, Self::Free)
    }
}

/// Why a node addition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaRejection {
    NodeLimit { limit: usize },
    MediaLimit { limit: usize },
}

impl QuotaRejection {
    /// User-facing notice describing this rejection.
    pub fn to_notice(self) -> Notice {
        match self {
            Self::NodeLimit { limit } => Notice::error(
                "Block limit reached",
                format!("You reached the limit of {limit} blocks per project. Upgrade to add more."),
            ),
            Self::MediaLimit { limit } => Notice::error(
                "Media limit reached",
                format!("You reached the limit of {limit} media uploads. Upgrade to add more."),
            ),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::NodeLimit { .. } => "node_limit",
            Self::MediaLimit { .. } => "media_limit",
        }
    }
}

impl Display for QuotaRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeLimit { limit } => write!(f, "node limit of {limit} reached"),
            Self::MediaLimit { limit } => write!(f, "media node limit of {limit} reached"),
        }
    }
}

/// Quota gate holding the limits for restricted plans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuotaGate {
    limits: QuotaLimits,
}

impl QuotaGate {
    pub fn new(limits: QuotaLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> QuotaLimits {
        self.limits
    }

    /// Decides whether a node of `candidate` kind may be added.
    pub fn admit(
        &self,
        node_count: usize,
        media_count: usize,
        candidate: BlockKind,
        plan: Plan,
    ) -> Result<(), QuotaRejection> {
        check_quota(&self.limits, node_count, media_count, candidate, plan)
    }
}

/// Pure quota decision over current counts.
pub fn check_quota(
    limits: &QuotaLimits,
    node_count: usize,
    media_count: usize,
    candidate: BlockKind,
    plan: Plan,
) -> Result<(), QuotaRejection> {
    if !plan.is_restricted() {
        return Ok(());
    }
    if node_count >= limits.max_nodes {
        return Err(QuotaRejection::NodeLimit {
            limit: limits.max_nodes,
        });
    }
    if candidate.is_media() && media_count >= limits.max_media_nodes {
        return Err(QuotaRejection::MediaLimit {
            limit: limits.max_media_nodes,
        });
    }
    Ok(())
}
