//! PDF layout model and the per-view page builders.
//!
//! # Responsibility
//! - Describe export documents as pages of positioned elements in A4
//!   millimetres; `export::encode` turns them into bytes.
//!
//! # Invariants
//! - Builders are pure: the same inputs always produce the same document.
//! - Notebook text never starts below `page height - margin`; a block that
//!   would overflow starts a new page.

use crate::config::ExportConfig;
use crate::export::layout::{split_rich_text, wrap_text, RichBlock};
use crate::export::render::RasterImage;
use crate::model::{BlockNode, NotebookDocument};
use crate::projection::BoardColumns;

const A4_SHORT_MM: f64 = 210.0;
const A4_LONG_MM: f64 = 297.0;

pub const PAGE_MARGIN_MM: f64 = 15.0;
const NOTEBOOK_TITLE_FONT_PT: f64 = 22.0;
const NOTEBOOK_BODY_FONT_PT: f64 = 12.0;
const NOTEBOOK_LINE_HEIGHT_MM: f64 = 5.0;
const NOTEBOOK_BLOCK_GAP_MM: f64 = 5.0;
const DEFAULT_FONT_PT: f64 = 16.0;

const CANVAS_DETAILS_TITLE: &str = "Canvas block details";
const UNTITLED_BLOCK: &str = "Untitled";
const NO_DETAILS: &str = "No additional details.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrientation {
    Portrait,
    Landscape,
}

impl PageOrientation {
    /// `(width, height)` in millimetres.
    pub fn size_mm(self) -> (f64, f64) {
        match self {
            Self::Portrait => (A4_SHORT_MM, A4_LONG_MM),
            Self::Landscape => (A4_LONG_MM, A4_SHORT_MM),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Dark grid theme used by every exported table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStyle {
    pub fill: Rgb,
    pub text: Rgb,
    pub line: Rgb,
    pub head_fill: Rgb,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            fill: Rgb(21, 25, 34),
            text: Rgb(232, 236, 243),
            line: Rgb(35, 40, 55),
            head_fill: Rgb(35, 40, 55),
        }
    }
}

/// Grid table; the renderer flows rows onto continuation pages as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfTable {
    pub start_y: f64,
    pub head: Vec<String>,
    /// Cells may contain `\n` line breaks.
    pub rows: Vec<Vec<String>>,
    pub style: TableStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PdfElement {
    Image {
        image: RasterImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Lines stacked downwards from `y` (baseline of the first line).
    Text {
        x: f64,
        y: f64,
        font_size: f64,
        lines: Vec<String>,
    },
    Rule {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Table(PdfTable),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfPage {
    pub orientation: PageOrientation,
    pub elements: Vec<PdfElement>,
}

impl PdfPage {
    pub fn size_mm(&self) -> (f64, f64) {
        self.orientation.size_mm()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDocument {
    pages: Vec<PdfPage>,
}

impl PdfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self, orientation: PageOrientation) -> &mut PdfPage {
        self.pages.push(PdfPage {
            orientation,
            elements: Vec::new(),
        });
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn pages(&self) -> &[PdfPage] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Canvas export: the rasterized viewport on page one, a block details table
/// on page two.
pub fn build_canvas_pdf(nodes: &[BlockNode], snapshot: RasterImage) -> PdfDocument {
    let mut document = PdfDocument::new();

    let page = document.add_page(PageOrientation::Landscape);
    let (width, height) = page.size_mm();
    page.elements.push(PdfElement::Image {
        image: snapshot,
        x: 0.0,
        y: 0.0,
        width,
        height,
    });

    let page = document.add_page(PageOrientation::Landscape);
    page.elements.push(PdfElement::Text {
        x: PAGE_MARGIN_MM,
        y: PAGE_MARGIN_MM,
        font_size: DEFAULT_FONT_PT,
        lines: vec![CANVAS_DETAILS_TITLE.to_string()],
    });
    page.elements.push(PdfElement::Table(PdfTable {
        start_y: 20.0,
        head: vec![
            "Block name".to_string(),
            "Kind".to_string(),
            "Details".to_string(),
        ],
        rows: nodes.iter().map(canvas_detail_row).collect(),
        style: TableStyle::default(),
    }));

    document
}

fn canvas_detail_row(node: &BlockNode) -> Vec<String> {
    let mut details = Vec::new();
    if let Some(description) = node.data.description() {
        details.push(format!("Description: {description}"));
    }
    if let Some(url) = node.data.url() {
        details.push(format!("URL: {url}"));
    }
    if let Some(file_name) = node.data.file_name() {
        details.push(format!("File: {file_name}"));
    }
    let details = if details.is_empty() {
        NO_DETAILS.to_string()
    } else {
        details.join("\n")
    };

    vec![
        node.label().unwrap_or(UNTITLED_BLOCK).to_string(),
        node.kind().descriptor().label.to_string(),
        details,
    ]
}

/// Board export: one landscape table, column `i` of row `r` holding the
/// `r`-th task of board column `i`.
pub fn build_board_pdf(board: &BoardColumns<'_>, config: &ExportConfig) -> PdfDocument {
    let head = board
        .iter()
        .map(|(column, _)| column.title().to_string())
        .collect();
    let rows = (0..board.max_len())
        .map(|row| {
            board
                .iter()
                .map(|(_, tasks)| {
                    tasks
                        .get(row)
                        .map(|node| board_cell(node, config.board_wrap_chars))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let mut document = PdfDocument::new();
    document
        .add_page(PageOrientation::Landscape)
        .elements
        .push(PdfElement::Table(PdfTable {
            start_y: 10.0,
            head,
            rows,
            style: TableStyle::default(),
        }));
    document
}

fn board_cell(node: &BlockNode, wrap_chars: usize) -> String {
    let Some(task) = node.data.as_task() else {
        return String::new();
    };
    let mut lines = vec![format!(
        "Title: {}",
        task.label.as_deref().filter(|label| !label.is_empty()).unwrap_or("N/A")
    )];
    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!(
            "Description: {}",
            wrap_text(description, wrap_chars).join("\n")
        ));
    }
    if let Some(priority) = task.priority {
        lines.push(format!("Priority: {}", priority.as_str()));
    }
    if let Some(deadline) = task.deadline {
        lines.push(format!("Deadline: {}", deadline.format("%d/%m/%Y")));
    }
    lines.join("\n")
}

/// Notebook export: title, then each top-level block flowed downwards with
/// page breaks and horizontal rules for dividers.
pub fn build_notebook_pdf(note: &NotebookDocument, config: &ExportConfig) -> PdfDocument {
    let mut document = PdfDocument::new();
    let orientation = PageOrientation::Portrait;
    let (page_width, page_height) = orientation.size_mm();

    let mut page = PdfPage {
        orientation,
        elements: Vec::new(),
    };
    let mut cursor_y = 20.0;
    page.elements.push(PdfElement::Text {
        x: PAGE_MARGIN_MM,
        y: cursor_y,
        font_size: NOTEBOOK_TITLE_FONT_PT,
        lines: vec![note.title.clone()],
    });
    cursor_y += 15.0;

    for block in split_rich_text(&note.content) {
        match block {
            RichBlock::Divider => {
                cursor_y += 5.0;
                page.elements.push(PdfElement::Rule {
                    x1: PAGE_MARGIN_MM,
                    y1: cursor_y,
                    x2: page_width - PAGE_MARGIN_MM,
                    y2: cursor_y,
                });
                cursor_y += 10.0;
            }
            RichBlock::Text(text) => {
                let lines = wrap_text(&text, config.notebook_wrap_chars);
                let block_height = lines.len() as f64 * NOTEBOOK_LINE_HEIGHT_MM;
                if cursor_y + block_height > page_height - PAGE_MARGIN_MM {
                    document.pages.push(std::mem::replace(
                        &mut page,
                        PdfPage {
                            orientation,
                            elements: Vec::new(),
                        },
                    ));
                    cursor_y = PAGE_MARGIN_MM;
                }
                page.elements.push(PdfElement::Text {
                    x: PAGE_MARGIN_MM,
                    y: cursor_y,
                    font_size: NOTEBOOK_BODY_FONT_PT,
                    lines,
                });
                cursor_y += block_height + NOTEBOOK_BLOCK_GAP_MM;
            }
        }
    }

    document.pages.push(page);
    document
}

/// Calendar/timeline export: one landscape page with the rasterized region
/// scaled to fit and centered.
pub fn build_raster_pdf(image: RasterImage) -> PdfDocument {
    let mut document = PdfDocument::new();
    let page = document.add_page(PageOrientation::Landscape);
    let (page_width, page_height) = page.size_mm();

    let image_width = f64::from(image.width_px.max(1));
    let image_height = f64::from(image.height_px.max(1));
    let ratio = (page_width / image_width).min(page_height / image_height);
    let width = image_width * ratio;
    let height = image_height * ratio;

    page.elements.push(PdfElement::Image {
        image,
        x: (page_width - width) / 2.0,
        y: (page_height - height) / 2.0,
        width,
        height,
    });
    document
}

#[cfg(test)]
mod tests {
    use super::{build_notebook_pdf, build_raster_pdf, PdfElement};
    use crate::config::ExportConfig;
    use crate::export::render::RasterImage;
    use crate::model::NotebookDocument;

    #[test]
    fn raster_page_is_centered_and_fitted() {
        let document = build_raster_pdf(RasterImage::new(297, 105, Vec::new()));
        let page = &document.pages()[0];
        match &page.elements[0] {
            PdfElement::Image {
                x, y, width, height, ..
            } => {
                assert_eq!(*x, 0.0);
                assert_eq!(*width, 297.0);
                assert_eq!(*height, 105.0);
                assert_eq!(*y, 52.5);
            }
            other => panic!("unexpected element {other:?}"),
        }
    }

    #[test]
    fn notebook_divider_advances_cursor_around_rule() {
        let mut note = NotebookDocument::new("Plan");
        note.content = "<p>one</p><hr><p>two</p>".to_string();
        let document = build_notebook_pdf(&note, &ExportConfig::default());
        let elements = &document.pages()[0].elements;

        let ys: Vec<f64> = elements
            .iter()
            .map(|element| match element {
                PdfElement::Text { y, .. } => *y,
                PdfElement::Rule { y1, .. } => *y1,
                _ => f64::NAN,
            })
            .collect();
        assert_eq!(ys, vec![20.0, 35.0, 50.0, 60.0]);
    }

    #[test]
    fn notebook_overflow_starts_new_page_at_margin() {
        let mut note = NotebookDocument::new("Long");
        note.content = "<p>line</p>".repeat(40);
        let document = build_notebook_pdf(&note, &ExportConfig::default());
        assert!(document.page_count() > 1);
        match &document.pages()[1].elements[0] {
            PdfElement::Text { y, .. } => assert_eq!(*y, 15.0),
            other => panic!("unexpected element {other:?}"),
        }
    }
}
