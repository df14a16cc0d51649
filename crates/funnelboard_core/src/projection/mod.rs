//! Derived view projector.
//!
//! # Responsibility
//! - Turn the current graph (plus stored calendar events) into per-view read
//!   models: board columns, calendar entries, timeline bars, panel previews.
//!
//! # Invariants
//! - Every projection is a pure function recomputed by full re-scan; there is
//!   no incremental patch path.

pub mod board;
pub mod calendar;
pub mod panel;
pub mod timeline;

pub use board::{project_board, BoardColumn, BoardColumns};
pub use calendar::{project_calendar, synthesized_event_id, CalendarEntry, EntryOrigin};
pub use panel::{project_panel_preview, PanelColumn, PANEL_PREVIEW_LIMIT};
pub use timeline::{project_timeline, Timeline, TimelineBar, TimelineWindow};
