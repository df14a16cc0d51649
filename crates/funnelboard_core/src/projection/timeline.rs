//! Timeline bars for tasks with both a start and an end date.
//!
//! # Invariants
//! - Bars are sorted ascending by start date (stable for ties).
//! - The window spans `[min(start) .. max(end)]` inclusive, in whole UTC days,
//!   and is at least one day long.
//! - Without qualifying tasks the window is `fallback_days` long, starting today.
//! - Tasks with a negative offset or a non-positive duration get no bar.

use crate::model::BlockNode;
use chrono::{DateTime, Duration, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_days: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineBar<'a> {
    pub node: &'a BlockNode,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Whole days between the window start and the task start.
    pub offset_days: i64,
    /// Inclusive day count of the task.
    pub duration_days: i64,
}

impl TimelineBar<'_> {
    /// Left edge as a fraction of the window width.
    pub fn left_fraction(&self, window: &TimelineWindow) -> f64 {
        self.offset_days as f64 / window.total_days as f64
    }

    /// Width as a fraction of the window width.
    pub fn width_fraction(&self, window: &TimelineWindow) -> f64 {
        self.duration_days as f64 / window.total_days as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<'a> {
    pub window: TimelineWindow,
    pub bars: Vec<TimelineBar<'a>>,
}

impl Timeline<'_> {
    /// Dates of every day column in the window.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.window.total_days).map(move |offset| self.window.start + Duration::days(offset))
    }
}

/// Projects task nodes onto a day-granular timeline anchored at `today`
/// when nothing qualifies.
pub fn project_timeline(nodes: &[BlockNode], today: NaiveDate, fallback_days: i64) -> Timeline<'_> {
    let mut dated: Vec<(&BlockNode, DateTime<Utc>, DateTime<Utc>)> = nodes
        .iter()
        .filter_map(|node| {
            let task = node.data.as_task()?;
            Some((node, task.start_date?, task.end_date?))
        })
        .collect();
    dated.sort_by_key(|(_, start, _)| *start);

    let window = match (
        dated.iter().map(|(_, start, _)| *start).min(),
        dated.iter().map(|(_, _, end)| *end).max(),
    ) {
        (Some(first_start), Some(last_end)) => {
            let start = first_start.date_naive();
            let end = last_end.date_naive();
            let total_days = ((end - start).num_days() + 1).max(1);
            TimelineWindow {
                start,
                end,
                total_days,
            }
        }
        _ => TimelineWindow {
            start: today,
            end: today + Duration::days(fallback_days),
            total_days: fallback_days,
        },
    };

    let bars = dated
        .into_iter()
        .filter_map(|(node, start, end)| {
            let offset_days = (start.date_naive() - window.start).num_days();
            let duration_days = (end.date_naive() - start.date_naive()).num_days() + 1;
            if offset_days < 0 || duration_days <= 0 {
                return None;
            }
            Some(TimelineBar {
                node,
                start,
                end,
                offset_days,
                duration_days,
            })
        })
        .collect();

    Timeline { window, bars }
}
