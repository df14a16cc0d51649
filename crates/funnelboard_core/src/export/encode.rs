//! PDF byte encoding of export layouts.
//!
//! # Responsibility
//! - Turn a `PdfDocument` (A4 millimetres, top-left origin) into a complete
//!   PDF file.
//!
//! # Invariants
//! - One PDF page per layout page, plus continuation pages for tables whose
//!   rows run past the bottom margin. The table head repeats on every page.
//! - Text uses the built-in Helvetica with WinAnsi encoding; characters outside
//!   Latin-1 are written as `?`.
//! - Raster images are decoded from PNG and embedded as RGB XObjects.

use crate::export::layout::wrap_text;
use crate::export::pdf::{
    PageOrientation, PdfDocument, PdfElement, PdfTable, Rgb, PAGE_MARGIN_MM,
};
use crate::export::render::RasterImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PT_PER_MM: f64 = 72.0 / 25.4;
const LINE_HEIGHT_FACTOR: f64 = 1.15;
const TABLE_FONT_PT: f64 = 10.0;
const TABLE_CELL_PADDING_MM: f64 = 1.8;
/// Mean Helvetica glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH_EM: f64 = 0.5;
const FONT_RESOURCE: &str = "F1";

#[derive(Debug)]
pub enum PdfEncodeError {
    /// A raster snapshot could not be decoded.
    Image(String),
    Write(String),
}

impl Display for PdfEncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image(details) => write!(f, "invalid raster image: {details}"),
            Self::Write(details) => write!(f, "pdf write failed: {details}"),
        }
    }
}

impl Error for PdfEncodeError {}

/// Encoded file and its final page count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Encodes `document` into PDF bytes.
pub fn encode_pdf(document: &PdfDocument) -> Result<EncodedPdf, PdfEncodeError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut finished = Vec::new();
    for page in document.pages() {
        let mut canvas = PageCanvas::new(page.orientation);
        for element in &page.elements {
            match element {
                PdfElement::Image {
                    image,
                    x,
                    y,
                    width,
                    height,
                } => {
                    let image_id = doc.add_object(image_xobject(image)?);
                    canvas.image(image_id, *x, *y, *width, *height);
                }
                PdfElement::Text {
                    x,
                    y,
                    font_size,
                    lines,
                } => canvas.text(*x, *y, *font_size, Rgb(0, 0, 0), lines),
                PdfElement::Rule { x1, y1, x2, y2 } => canvas.rule(*x1, *y1, *x2, *y2),
                PdfElement::Table(table) => flow_table(table, &mut canvas, &mut finished),
            }
        }
        finished.push(canvas);
    }

    let mut kids = Vec::with_capacity(finished.len());
    for canvas in finished {
        kids.push(Object::Reference(canvas.write(&mut doc, pages_id, font_id)?));
    }
    let page_count = kids.len();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|err| PdfEncodeError::Write(err.to_string()))?;
    Ok(EncodedPdf { bytes, page_count })
}

/// Content stream under construction for one output page.
struct PageCanvas {
    orientation: PageOrientation,
    operations: Vec<Operation>,
    images: Vec<(String, ObjectId)>,
}

impl PageCanvas {
    fn new(orientation: PageOrientation) -> Self {
        Self {
            orientation,
            operations: Vec::new(),
            images: Vec::new(),
        }
    }

    fn height_pt(&self) -> f64 {
        self.orientation.size_mm().1 * PT_PER_MM
    }

    /// PDF y coordinate of a top-origin millimetre offset.
    fn flip(&self, y_mm: f64) -> f64 {
        self.height_pt() - y_mm * PT_PER_MM
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn image(&mut self, image_id: ObjectId, x: f64, y: f64, width: f64, height: f64) {
        let name = format!("Im{}", self.images.len() + 1);
        self.push("q", vec![]);
        self.push(
            "cm",
            vec![
                real(width * PT_PER_MM),
                real(0.0),
                real(0.0),
                real(height * PT_PER_MM),
                real(x * PT_PER_MM),
                real(self.flip(y + height)),
            ],
        );
        self.push("Do", vec![Object::Name(name.clone().into_bytes())]);
        self.push("Q", vec![]);
        self.images.push((name, image_id));
    }

    /// Lines stacked downwards from baseline `y`.
    fn text(&mut self, x: f64, y: f64, font_size: f64, color: Rgb, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        let leading = font_size * LINE_HEIGHT_FACTOR;
        self.push("BT", vec![]);
        self.push("rg", color_operands(color));
        self.push("Tf", vec![FONT_RESOURCE.into(), real(font_size)]);
        self.push("TL", vec![real(leading)]);
        self.push("Td", vec![real(x * PT_PER_MM), real(self.flip(y))]);
        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                self.push("T*", vec![]);
            }
            self.push("Tj", vec![win_ansi_string(line)]);
        }
        self.push("ET", vec![]);
    }

    fn rule(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.push("RG", color_operands(Rgb(0, 0, 0)));
        self.push("w", vec![real(0.5)]);
        self.push("m", vec![real(x1 * PT_PER_MM), real(self.flip(y1))]);
        self.push("l", vec![real(x2 * PT_PER_MM), real(self.flip(y2))]);
        self.push("S", vec![]);
    }

    fn cell(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Rgb, line: Rgb) {
        let rect = vec![
            real(x * PT_PER_MM),
            real(self.flip(y + height)),
            real(width * PT_PER_MM),
            real(height * PT_PER_MM),
        ];
        self.push("rg", color_operands(fill));
        self.push("RG", color_operands(line));
        self.push("w", vec![real(0.3)]);
        self.push("re", rect);
        self.push("B", vec![]);
    }

    fn write(
        self,
        doc: &mut Document,
        pages_id: ObjectId,
        font_id: ObjectId,
    ) -> Result<ObjectId, PdfEncodeError> {
        let (width_mm, height_mm) = self.orientation.size_mm();
        let content = Content {
            operations: self.operations,
        }
        .encode()
        .map_err(|err| PdfEncodeError::Write(err.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

        let mut xobjects = Dictionary::new();
        for (name, image_id) in self.images {
            xobjects.set(name.into_bytes(), image_id);
        }
        let resources = dictionary! {
            "Font" => dictionary! { FONT_RESOURCE => font_id },
            "XObject" => xobjects,
        };

        Ok(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                real(width_mm * PT_PER_MM),
                real(height_mm * PT_PER_MM),
            ],
            "Contents" => content_id,
            "Resources" => resources,
        }))
    }
}

/// Lays `table` out as an equal-width grid from `start_y`, moving to a fresh
/// page of the same orientation whenever a row would cross the bottom margin.
fn flow_table(table: &PdfTable, canvas: &mut PageCanvas, finished: &mut Vec<PageCanvas>) {
    let orientation = canvas.orientation;
    let (page_width, page_height) = orientation.size_mm();
    let columns = table
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.head.len()))
        .max()
        .unwrap_or(0)
        .max(1);
    let column_width = (page_width - 2.0 * PAGE_MARGIN_MM) / columns as f64;
    let glyph_mm = TABLE_FONT_PT * AVG_GLYPH_WIDTH_EM / PT_PER_MM;
    let chars_per_line =
        (((column_width - 2.0 * TABLE_CELL_PADDING_MM) / glyph_mm).floor() as usize).max(1);
    let line_height = TABLE_FONT_PT * LINE_HEIGHT_FACTOR / PT_PER_MM;

    let layout_row = |cells: &[String]| -> (Vec<Vec<String>>, f64) {
        let wrapped: Vec<Vec<String>> = (0..columns)
            .map(|index| {
                cells
                    .get(index)
                    .map(|cell| {
                        cell.split('\n')
                            .flat_map(|line| wrap_text(line, chars_per_line))
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .collect();
        let lines = wrapped.iter().map(Vec::len).max().unwrap_or(0).max(1);
        (wrapped, lines as f64 * line_height + 2.0 * TABLE_CELL_PADDING_MM)
    };

    let head = (!table.head.is_empty()).then(|| layout_row(table.head.as_slice()));
    let draw_row = |canvas: &mut PageCanvas, cells: &[Vec<String>], y: f64, height: f64, fill: Rgb| {
        for (index, lines) in cells.iter().enumerate() {
            let x = PAGE_MARGIN_MM + index as f64 * column_width;
            canvas.cell(x, y, column_width, height, fill, table.style.line);
            let baseline = y + TABLE_CELL_PADDING_MM + line_height * 0.8;
            canvas.text(
                x + TABLE_CELL_PADDING_MM,
                baseline,
                TABLE_FONT_PT,
                table.style.text,
                lines,
            );
        }
    };

    let mut y = table.start_y;
    if let Some((cells, height)) = &head {
        draw_row(canvas, cells.as_slice(), y, *height, table.style.head_fill);
        y += height;
    }

    for row in &table.rows {
        let (cells, height) = layout_row(row.as_slice());
        let fresh_page_top = head
            .as_ref()
            .map_or(PAGE_MARGIN_MM, |(_, head_height)| PAGE_MARGIN_MM + head_height);
        if y + height > page_height - PAGE_MARGIN_MM && y > fresh_page_top {
            finished.push(std::mem::replace(canvas, PageCanvas::new(orientation)));
            y = PAGE_MARGIN_MM;
            if let Some((head_cells, head_height)) = &head {
                draw_row(canvas, head_cells.as_slice(), y, *head_height, table.style.head_fill);
                y += head_height;
            }
        }
        draw_row(canvas, cells.as_slice(), y, height, table.style.fill);
        y += height;
    }
}

fn image_xobject(image: &RasterImage) -> Result<Stream, PdfEncodeError> {
    let decoded = image::load_from_memory_with_format(&image.png, image::ImageFormat::Png)
        .map_err(|err| PdfEncodeError::Image(err.to_string()))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        },
        rgb.into_raw(),
    ))
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

fn color_operands(Rgb(r, g, b): Rgb) -> Vec<Object> {
    [r, g, b]
        .into_iter()
        .map(|channel| real(f64::from(channel) / 255.0))
        .collect()
}

fn win_ansi_string(text: &str) -> Object {
    let bytes = text
        .chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
        .collect();
    Object::String(bytes, StringFormat::Literal)
}
