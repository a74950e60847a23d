use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::domain::{ReportDocument, SummaryResult};
use crate::error::ReportError;

pub const REPORT_TITLE: &str = "Chemical Equipment Report";
pub const AVERAGES_HEADER: &str = "Average Values";
pub const DISTRIBUTION_HEADER: &str = "Equipment Type Distribution";

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const LEFT_MARGIN: i64 = 100;
const TOP_Y: i64 = 800;
const BOTTOM_MARGIN: i64 = 50;
const ITEM_SPACING: i64 = 20;
const SECTION_SPACING: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    SectionHeader,
    Item,
}

impl LineStyle {
    fn font(&self) -> (&'static str, i64) {
        match self {
            LineStyle::Title => ("F2", 16),
            LineStyle::SectionHeader => ("F2", 13),
            LineStyle::Item => ("F1", 12),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub style: LineStyle,
    pub text: String,
}

impl ReportLine {
    fn new(style: LineStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub line: ReportLine,
    pub x: i64,
    pub y: i64,
}

/// The report content in reading order.
pub fn report_lines(summary: &SummaryResult) -> Vec<ReportLine> {
    let mut lines = vec![
        ReportLine::new(LineStyle::Title, REPORT_TITLE),
        ReportLine::new(
            LineStyle::Item,
            format!("Total Records: {}", summary.total_count),
        ),
        ReportLine::new(LineStyle::SectionHeader, AVERAGES_HEADER),
        ReportLine::new(
            LineStyle::Item,
            format!("Flowrate: {:.2}", summary.averages.flowrate),
        ),
        ReportLine::new(
            LineStyle::Item,
            format!("Pressure: {:.2}", summary.averages.pressure),
        ),
        ReportLine::new(
            LineStyle::Item,
            format!("Temperature: {:.2}", summary.averages.temperature),
        ),
        ReportLine::new(LineStyle::SectionHeader, DISTRIBUTION_HEADER),
    ];

    lines.extend(
        summary
            .type_distribution
            .iter()
            .map(|(equipment_type, count)| {
                ReportLine::new(LineStyle::Item, format!("{}: {}", equipment_type, count))
            }),
    );

    lines
}

/// Assign page and vertical position to each line, starting a new page
/// whenever the next line would cross the bottom margin.
pub fn paginate(lines: Vec<ReportLine>) -> Vec<Vec<PlacedLine>> {
    let mut pages: Vec<Vec<PlacedLine>> = Vec::new();
    let mut current: Vec<PlacedLine> = Vec::new();
    let mut y = TOP_Y;
    let mut previous: Option<LineStyle> = None;

    for line in lines {
        if let Some(prev) = previous {
            let gap = if line.style == LineStyle::SectionHeader || prev == LineStyle::Title {
                SECTION_SPACING
            } else {
                ITEM_SPACING
            };
            y -= gap;
        }

        if y < BOTTOM_MARGIN {
            pages.push(std::mem::take(&mut current));
            y = TOP_Y;
        }

        previous = Some(line.style);
        current.push(PlacedLine {
            line,
            x: LEFT_MARGIN,
            y,
        });
    }

    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }

    pages
}

fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}

fn page_operations(lines: &[PlacedLine]) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    for placed in lines {
        let (font, size) = placed.line.style.font();
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(size)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Integer(placed.x), Object::Integer(placed.y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_text(&placed.line.text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

fn font_object(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Render an already computed summary into a PDF document.
pub fn render_report(summary: &SummaryResult) -> Result<ReportDocument, ReportError> {
    let pages = paginate(report_lines(summary));

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = font_object(&mut doc, "Helvetica");
    let bold = font_object(&mut doc, "Helvetica-Bold");
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in &pages {
        let content = Content {
            operations: page_operations(page),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len();
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(|e| ReportError::PdfError {
        message: e.to_string(),
    })?;

    debug!(
        "Rendered report with {} lines on {} page(s), {} bytes",
        pages.iter().map(Vec::len).sum::<usize>(),
        page_count,
        bytes.len()
    );

    Ok(ReportDocument::pdf(bytes, page_count))
}
