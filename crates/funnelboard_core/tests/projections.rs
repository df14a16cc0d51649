mod support;

use chrono::{Duration, NaiveDate};
use funnelboard_core::model::{
    BlockData, BlockKind, BlockNode, CalendarEvent, NodeId, Position, TaskAttributes, TaskStatus,
};
use funnelboard_core::projection::{
    project_board, project_calendar, project_panel_preview, project_timeline,
    synthesized_event_id, BoardColumn, EntryOrigin, PANEL_PREVIEW_LIMIT,
};
use support::{day, task};

fn dated_task(id: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> BlockNode {
    BlockNode::new(
        NodeId::from(id),
        Position::default(),
        BlockData::Task(TaskAttributes {
            label: Some(id.to_string()),
            start_date: Some(day(start.0, start.1, start.2)),
            end_date: Some(day(end.0, end.1, end.2)),
            ..TaskAttributes::default()
        }),
    )
}

fn with_deadline(mut node: BlockNode, deadline: (i32, u32, u32)) -> BlockNode {
    if let BlockData::Task(attributes) = &mut node.data {
        attributes.deadline = Some(day(deadline.0, deadline.1, deadline.2));
    }
    node
}

fn ids<'a>(nodes: impl IntoIterator<Item = &'a &'a BlockNode>) -> Vec<&'a str> {
    nodes.into_iter().map(|node| node.id.as_str()).collect()
}

#[test]
fn board_partitions_tasks_and_defaults_unknown_status_to_first_column() {
    let nodes = vec![
        task("t1", "Plan", Some("A Fazer")),
        task("t2", "Build", Some("Fazendo")),
        task("t3", "Ship", Some("Feito")),
        task("t4", "Odd", Some("Blocked")),
        task("t5", "Bare", None),
        BlockNode::of_kind(BlockKind::Note, Position::default()),
    ];

    let board = project_board(&nodes);

    assert_eq!(ids(board.column(BoardColumn::Todo)), vec!["t1", "t4", "t5"]);
    assert_eq!(ids(board.column(BoardColumn::Doing)), vec!["t2"]);
    assert_eq!(ids(board.column(BoardColumn::Done)), vec!["t3"]);
    assert_eq!(board.total(), 5);
    assert_eq!(board.max_len(), 3);
}

#[test]
fn unrecognized_status_is_preserved_on_the_node() {
    let node = task("t1", "Odd", Some("Blocked"));
    let status = node.data.as_task().unwrap().status.clone().unwrap();
    assert_eq!(status, TaskStatus::Unrecognized("Blocked".to_string()));
    assert_eq!(status.as_str(), "Blocked");
}

#[test]
fn calendar_lists_stored_events_then_task_deadlines() {
    let nodes = vec![
        with_deadline(task("t1", "Launch", Some("Feito")), (2026, 3, 10)),
        with_deadline(task("t2", "Review", Some("Fazendo")), (2026, 3, 12)),
        task("t3", "No deadline", None),
    ];
    let stored = vec![CalendarEvent::new("ev-1", "Kickoff", day(2026, 3, 1))];

    let entries = project_calendar(&nodes, &stored);

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].event.id, "ev-1");
    assert_eq!(entries[0].origin, EntryOrigin::Stored);
    assert!(!entries[0].is_read_only());

    let launch = &entries[1];
    assert_eq!(launch.event.id, synthesized_event_id(&NodeId::from("t1")));
    assert_eq!(launch.event.id, "task-t1");
    assert_eq!(launch.event.start, day(2026, 3, 10));
    assert!(launch.event.all_day);
    assert!(launch.event.completed);
    assert!(launch.is_read_only());

    assert!(!entries[2].event.completed);
    assert_eq!(entries[2].origin, EntryOrigin::TaskDeadline(NodeId::from("t2")));
}

#[test]
fn calendar_titles_unlabeled_tasks() {
    let mut node = with_deadline(task("t1", "x", None), (2026, 1, 1));
    if let BlockData::Task(attributes) = &mut node.data {
        attributes.label = None;
    }
    let entries = project_calendar(&[node], &[]);
    assert_eq!(entries[0].event.title, "Untitled task");
}

#[test]
fn timeline_window_spans_all_dated_tasks() {
    let nodes = vec![
        dated_task("late", (2026, 5, 4), (2026, 5, 5)),
        dated_task("early", (2026, 5, 1), (2026, 5, 3)),
        task("undated", "Undated", None),
    ];

    let timeline = project_timeline(&nodes, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(), 30);

    assert_eq!(timeline.window.start, NaiveDate::from_ymd_opt(2026, 5, 1).unwrap());
    assert_eq!(timeline.window.total_days, 5);
    let bars: Vec<_> = timeline
        .bars
        .iter()
        .map(|bar| (bar.node.id.as_str(), bar.offset_days, bar.duration_days))
        .collect();
    assert_eq!(bars, vec![("early", 0, 3), ("late", 3, 2)]);
    assert!((timeline.bars[1].left_fraction(&timeline.window) - 0.6).abs() < 1e-9);
    assert!((timeline.bars[1].width_fraction(&timeline.window) - 0.4).abs() < 1e-9);
    assert_eq!(timeline.days().count(), 5);
}

#[test]
fn single_task_fills_the_whole_window() {
    let nodes = vec![dated_task("solo", (2026, 5, 1), (2026, 5, 5))];

    let timeline = project_timeline(&nodes, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(), 30);

    assert_eq!(timeline.window.start, NaiveDate::from_ymd_opt(2026, 5, 1).unwrap());
    assert_eq!(timeline.window.end, NaiveDate::from_ymd_opt(2026, 5, 5).unwrap());
    assert_eq!(timeline.window.total_days, 5);
    assert_eq!(timeline.bars.len(), 1);
    let bar = &timeline.bars[0];
    assert_eq!((bar.offset_days, bar.duration_days), (0, 5));
    assert_eq!(bar.left_fraction(&timeline.window), 0.0);
    assert!((bar.width_fraction(&timeline.window) - 1.0).abs() < 1e-9);
}

#[test]
fn timeline_skips_tasks_ending_before_they_start() {
    let nodes = vec![
        dated_task("ok", (2026, 5, 1), (2026, 5, 2)),
        dated_task("inverted", (2026, 5, 3), (2026, 5, 2)),
    ];
    let timeline = project_timeline(&nodes, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), 30);
    assert_eq!(timeline.bars.len(), 1);
    assert_eq!(timeline.bars[0].node.id.as_str(), "ok");
}

#[test]
fn timeline_falls_back_to_window_from_today() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let nodes = vec![task("t1", "Undated", None)];

    let timeline = project_timeline(&nodes, today, 30);

    assert!(timeline.bars.is_empty());
    assert_eq!(timeline.window.start, today);
    assert_eq!(timeline.window.end, today + Duration::days(30));
    assert_eq!(timeline.window.total_days, 30);
}

#[test]
fn panel_preview_caps_each_column() {
    let mut nodes: Vec<BlockNode> = (0..5)
        .map(|index| task(&format!("todo-{index}"), "Todo", Some("A Fazer")))
        .collect();
    nodes.push(task("done-0", "Done", Some("Feito")));

    let preview = project_panel_preview(&nodes);

    assert_eq!(preview.len(), 3);
    assert_eq!(preview[0].column, BoardColumn::Todo);
    assert_eq!(preview[0].count, 5);
    assert_eq!(preview[0].tasks.len(), PANEL_PREVIEW_LIMIT);
    assert_eq!(preview[0].tasks[0].id.as_str(), "todo-0");
    assert_eq!(preview[1].count, 0);
    assert_eq!(preview[2].count, 1);
}
