//! One-page PDF packaging with `lopdf`.

use fieldmap_core::ExportError;
use image::RgbImage;
use lopdf::{
    content::{Content, Operation},
    dictionary,
    xref::XrefType,
    Document, Object, Stream, StringFormat,
};

/// A4 portrait in points
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

const MARGIN: f32 = 36.0;
const TITLE_SIZE: f32 = 14.0;
const LEGEND_SIZE: f32 = 9.0;
const LEGEND_LEADING: f32 = 12.0;
/// Legend lines printed before the rest collapse into a `+N more` line
pub const MAX_LEGEND_LINES: usize = 24;

/// Text placed around the map image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportPage {
    pub title: String,
    /// One line per labelled shape, printed under the title
    pub legend: Vec<String>,
    pub creation_date: Option<chrono::DateTime<chrono::Utc>>,
}

impl ReportPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Encodes text for the standard Helvetica font with WinAnsi encoding.
///
/// Latin-1 letters map to themselves; anything else becomes `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            0x20..=0x7E | 0xA0..=0xFF => c as u8,
            _ => b'?',
        })
        .collect()
}

fn encoding_error(e: impl std::fmt::Display) -> ExportError {
    ExportError::Encoding {
        reason: e.to_string(),
    }
}

/// Legend as printed: at most [`MAX_LEGEND_LINES`] lines, the last one
/// counting the labels that did not fit.
fn legend_lines(legend: &[String]) -> Vec<String> {
    if legend.len() <= MAX_LEGEND_LINES {
        return legend.to_vec();
    }
    let shown = MAX_LEGEND_LINES - 1;
    let mut lines = legend[..shown].to_vec();
    lines.push(format!("+{} more", legend.len() - shown));
    lines
}

/// Where the map image goes, in page points
#[derive(Debug, Clone, Copy, PartialEq)]
struct ImageRect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

/// Fits the image below the title and `legend_len` legend lines, keeping
/// its aspect ratio and centering it horizontally.
fn image_rect(img_w: u32, img_h: u32, legend_len: usize) -> ImageRect {
    let top = PAGE_HEIGHT - MARGIN - 2.0 * TITLE_SIZE - (legend_len as f32 + 1.0) * LEGEND_LEADING;
    let box_w = PAGE_WIDTH - 2.0 * MARGIN;
    let box_h = (top - MARGIN).max(1.0);
    let scale = (box_w / img_w as f32).min(box_h / img_h as f32);
    let width = img_w as f32 * scale;
    let height = img_h as f32 * scale;
    ImageRect {
        x: MARGIN + (box_w - width) / 2.0,
        y: top - height,
        width,
        height,
    }
}

fn text_line(ops: &mut Vec<Operation>, size: f32, x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", Vec::new()));
    ops.push(Operation::new("Tf", vec!["F1".into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(win_ansi(text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", Vec::new()));
}

/// Builds a single A4 page holding the title, the legend and the map image
/// scaled to fit the remaining space.
///
/// Long legends are cut at [`MAX_LEGEND_LINES`] so the image always keeps
/// most of the page.
pub fn build_report_pdf(image: &RgbImage, page: &ReportPage) -> Result<Vec<u8>, ExportError> {
    let (img_w, img_h) = image.dimensions();
    if img_w == 0 || img_h == 0 {
        return Err(encoding_error("image has no pixels"));
    }

    let mut doc = Document::with_version("1.4");
    doc.reference_table.cross_reference_type = XrefType::CrossReferenceTable;

    let id_pages = doc.new_object_id();

    let id_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let id_image = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(img_w),
            "Height" => i64::from(img_h),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        image.as_raw().clone(),
    ));

    let legend = legend_lines(&page.legend);
    let mut ops = Vec::new();
    let mut cursor = PAGE_HEIGHT - MARGIN - TITLE_SIZE;
    text_line(&mut ops, TITLE_SIZE, MARGIN, cursor, &page.title);
    cursor -= TITLE_SIZE;
    for line in &legend {
        cursor -= LEGEND_LEADING;
        text_line(&mut ops, LEGEND_SIZE, MARGIN, cursor, line);
    }

    let rect = image_rect(img_w, img_h, legend.len());
    ops.push(Operation::new("q", Vec::new()));
    ops.push(Operation::new(
        "cm",
        vec![
            rect.width.into(),
            0.into(),
            0.into(),
            rect.height.into(),
            rect.x.into(),
            rect.y.into(),
        ],
    ));
    ops.push(Operation::new("Do", vec!["Im1".into()]));
    ops.push(Operation::new("Q", Vec::new()));

    let content = Content { operations: ops };
    let id_content = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().map_err(encoding_error)?,
    ));

    let id_resources = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => id_font,
        },
        "XObject" => dictionary! {
            "Im1" => id_image,
        },
    });

    let id_page = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => id_pages,
        "Contents" => id_content,
        "Resources" => id_resources,
    });

    doc.set_object(
        id_pages,
        dictionary! {
            "Type" => "Pages",
            "Count" => 1,
            "Kids" => vec![id_page.into()],
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        },
    );

    let id_catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => id_pages,
    });
    doc.trailer.set("Root", id_catalog);

    let date = page
        .creation_date
        .unwrap_or_else(chrono::Utc::now)
        .format("D:%Y%m%d%H%M%SZ")
        .to_string();
    let id_info = doc.add_object(dictionary! {
        "Title" => Object::String(win_ansi(&page.title), StringFormat::Literal),
        "Creator" => Object::string_literal(concat!("fieldmap ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(date.clone()),
        "ModDate" => Object::string_literal(date),
    });
    doc.trailer.set("Info", id_info);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(encoding_error)?;
    Ok(buffer)
}
