//! Layout helpers shared by the PDF builders: text wrapping, canvas bounds
//! fitting and rich-text block splitting.

use crate::model::BlockNode;
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)\b[^>]*?(/?)>").expect("valid tag regex")
});
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(amp|lt|gt|quot|#39|nbsp);").expect("valid entity regex"));

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Greedy word wrap at `width` characters.
///
/// Words longer than `width` occupy a line of their own and are never split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate_len = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if candidate_len > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Pan/zoom transform applied to the canvas before rasterizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

/// Union of all node rectangles; unmeasured nodes use `default_size`.
pub fn node_bounds(nodes: &[BlockNode], default_size: (f64, f64)) -> Option<Bounds> {
    let mut rects = nodes.iter().map(|node| {
        let (width, height) = node
            .size()
            .map(|size| (size.width, size.height))
            .unwrap_or(default_size);
        (
            node.position.x,
            node.position.y,
            node.position.x + width,
            node.position.y + height,
        )
    });

    let first = rects.next()?;
    let (min_x, min_y, max_x, max_y) = rects.fold(first, |acc, rect| {
        (
            acc.0.min(rect.0),
            acc.1.min(rect.1),
            acc.2.max(rect.2),
            acc.3.max(rect.3),
        )
    });
    Some(Bounds {
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    })
}

/// Transform that centers `bounds` in a `width` x `height` frame, zoomed to
/// fit with `padding` and clamped to `[min_zoom, max_zoom]`.
pub fn viewport_for_bounds(
    bounds: Bounds,
    width: f64,
    height: f64,
    min_zoom: f64,
    max_zoom: f64,
    padding: f64,
) -> ViewportTransform {
    let x_zoom = width / (bounds.width * (1.0 + padding));
    let y_zoom = height / (bounds.height * (1.0 + padding));
    let zoom = x_zoom.min(y_zoom).clamp(min_zoom, max_zoom);

    let center_x = bounds.x + bounds.width / 2.0;
    let center_y = bounds.y + bounds.height / 2.0;
    ViewportTransform {
        x: width / 2.0 - center_x * zoom,
        y: height / 2.0 - center_y * zoom,
        zoom,
    }
}

/// Top-level block of a rich-text document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichBlock {
    Text(String),
    Divider,
}

/// Splits rich-text markup into its top-level blocks.
///
/// Each top-level element (or stray text run) becomes one `Text` block with
/// nested markup stripped; `<hr>` becomes `Divider`. Whitespace-only runs
/// between elements are dropped.
pub fn split_rich_text(markup: &str) -> Vec<RichBlock> {
    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    let mut cursor = 0usize;

    for caps in TAG_RE.captures_iter(markup) {
        let Some(tag) = caps.get(0) else { continue };
        current.push_str(&markup[cursor..tag.start()]);
        cursor = tag.end();

        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
        let name = caps
            .get(2)
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_default();
        let is_void = self_closing || VOID_ELEMENTS.contains(&name.as_str());

        if depth == 0 {
            flush_text(&mut blocks, &mut current, false);
            if name == "hr" && !closing {
                blocks.push(RichBlock::Divider);
                continue;
            }
            if is_void {
                continue;
            }
        }

        if closing {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                flush_text(&mut blocks, &mut current, true);
            }
        } else if !is_void {
            depth += 1;
        }
    }
    current.push_str(&markup[cursor..]);
    flush_text(&mut blocks, &mut current, depth > 0);
    blocks
}

fn flush_text(blocks: &mut Vec<RichBlock>, current: &mut String, element: bool) {
    let text = decode_entities(current);
    current.clear();
    if element || !text.trim().is_empty() {
        blocks.push(RichBlock::Text(text));
    }
}

fn decode_entities(value: &str) -> String {
    ENTITY_RE
        .replace_all(value, |caps: &regex::Captures<'_>| {
            match caps.get(1).map(|m| m.as_str()) {
                Some("amp") => "&",
                Some("lt") => "<",
                Some("gt") => ">",
                Some("quot") => "\"",
                Some("#39") => "'",
                _ => " ",
            }
            .to_string()
        })
        .into_owned()
}
