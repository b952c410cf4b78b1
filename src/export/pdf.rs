//! PDF generation (printpdf)
//!
//! Paints a [`ReportDocument`] onto A4 pages: header block, project table,
//! summary, team table, approval block, signature line and a footer on
//! every page. Tables break across pages with their header repeated.

use crate::error::{ReportError, Result};
use crate::logo::LogoImage;
use monitoring_report_common::export::pdf_core::{
    layout_row_scaled, paginate_rows, row_height_pt, table_widths_pt, text_width_pt, wrap_text,
    InfoBox, PdfLayoutCore, ReportDocument, TableBlock, TableRowLayout, EMBEDDED_FONT_WIDTH_SCALE,
};
use monitoring_report_common::format::CURRENCY_SYMBOL;
use monitoring_report_common::layout::{
    rgb_components, CellAlign, PdfLayout, BODY_FONT_PT, BORDER_COLOR, CELL_PADDING_X_PT,
    CELL_PADDING_Y_PT, FOOTER_COLOR, FOOTER_FONT_PT, HEADER_TEXT_COLOR, INFO_BG_COLOR,
    INFO_BORDER_COLOR, LINE_HEIGHT, LOGO_HEIGHT_PT, PRIMARY_COLOR, SECTION_FONT_PT,
    SUBTITLE_FONT_PT, TABLE_FONT_PT, TEXT_COLOR, TITLE_FONT_PT,
};
use printpdf::*;
use std::path::Path;

const DOCUMENT_TITLE: &str = "TETFUND Monitoring Report";
const INFO_BOX_PADDING_PT: f32 = 10.0;
const BLOCK_GAP_PT: f32 = 12.0;

/// Optional resources for the painter
#[derive(Debug, Clone, Default)]
pub struct PdfAssets {
    pub logo: Option<LogoImage>,
    /// TrueType/OpenType bytes; without it the built-in Helvetica is used
    pub font: Option<Vec<u8>>,
}

impl PdfAssets {
    pub fn load_font(path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Err(ReportError::FileNotFound(path.display().to_string()));
        }
        Ok(std::fs::read(path)?)
    }
}

#[derive(Debug, Clone)]
enum PdfFont {
    Builtin,
    External(FontId),
}

impl PdfFont {
    /// Built-in fonts are WinAnsi only: spell the naira glyph out.
    fn prepare(&self, text: &str) -> String {
        match self {
            PdfFont::Builtin => text.replace(CURRENCY_SYMBOL, "NGN "),
            PdfFont::External(_) => text.to_string(),
        }
    }

    /// Allowance applied to Helvetica measurements
    fn width_scale(&self) -> f32 {
        match self {
            PdfFont::Builtin => 1.0,
            PdfFont::External(_) => EMBEDDED_FONT_WIDTH_SCALE,
        }
    }
}

fn color(hex: u32) -> Color {
    let (r, g, b) = rgb_components(hex);
    Color::Rgb(Rgb { r, g, b, icc_profile: None })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

/// Page-by-page op recorder with a top-down cursor (pt from the bottom edge)
struct Painter {
    core: PdfLayoutCore,
    font: PdfFont,
    pages: Vec<Vec<Op>>,
    ops: Vec<Op>,
    y: f32,
}

impl Painter {
    fn new(core: PdfLayoutCore, font: PdfFont) -> Self {
        Self {
            core,
            font,
            pages: Vec::new(),
            ops: Vec::new(),
            y: core.content_top_pt(),
        }
    }

    fn left(&self) -> f32 {
        self.core.margin_pt
    }

    fn new_page(&mut self) {
        let ops = std::mem::take(&mut self.ops);
        self.pages.push(ops);
        self.y = self.core.content_top_pt();
    }

    /// Break the page unless `height` still fits; true if a break happened.
    fn ensure(&mut self, height: f32) -> bool {
        let at_top = (self.y - self.core.content_top_pt()).abs() < f32::EPSILON;
        if self.y - height < self.core.content_bottom_pt() && !at_top {
            self.new_page();
            return true;
        }
        false
    }

    fn text(&mut self, text: &str, x: f32, baseline: f32, size: f32, bold: bool, fill: u32) {
        let text = self.font.prepare(text);
        if text.is_empty() {
            return;
        }
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetFillColor { col: color(fill) });
        self.ops.push(Op::SetTextCursor {
            pos: Point { x: Pt(x), y: Pt(baseline) },
        });
        match &self.font {
            PdfFont::Builtin => {
                let font = if bold { BuiltinFont::HelveticaBold } else { BuiltinFont::Helvetica };
                self.ops.push(Op::SetFontSizeBuiltinFont { size: Pt(size), font });
                self.ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(text)],
                    font,
                });
            }
            PdfFont::External(id) => {
                self.ops.push(Op::SetFontSize { size: Pt(size), font: id.clone() });
                self.ops.push(Op::WriteText {
                    items: vec![TextItem::Text(text)],
                    font: id.clone(),
                });
            }
        }
        self.ops.push(Op::EndTextSection);
    }

    fn text_aligned(&mut self, text: &str, x: f32, width: f32, baseline: f32, size: f32, bold: bool, fill: u32, align: CellAlign) {
        let text = self.font.prepare(text);
        let tw = text_width_pt(&text, size, bold) * self.font.width_scale();
        let tx = match align {
            CellAlign::Left => x,
            CellAlign::Center => x + (width - tw) / 2.0,
            CellAlign::Right => x + width - tw,
        };
        self.text(&text, tx, baseline, size, bold, fill);
    }

    /// Rectangle with its top-left corner at (x, top)
    fn rect(&mut self, x: f32, top: f32, width: f32, height: f32, fill: Option<u32>, stroke: Option<u32>) {
        let mode = match (fill, stroke) {
            (Some(_), Some(_)) => PaintMode::FillStroke,
            (Some(_), None) => PaintMode::Fill,
            (None, Some(_)) => PaintMode::Stroke,
            (None, None) => return,
        };
        if let Some(fill) = fill {
            self.ops.push(Op::SetFillColor { col: color(fill) });
        }
        if let Some(stroke) = stroke {
            self.ops.push(Op::SetOutlineColor { col: color(stroke) });
            self.ops.push(Op::SetOutlineThickness { pt: Pt(0.75) });
        }
        let bottom = top - height;
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing {
                    points: vec![
                        point(x, top),
                        point(x + width, top),
                        point(x + width, bottom),
                        point(x, bottom),
                    ],
                }],
                mode,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    fn hline(&mut self, x1: f32, x2: f32, y: f32, stroke: u32) {
        self.ops.push(Op::SetOutlineColor { col: color(stroke) });
        self.ops.push(Op::SetOutlineThickness { pt: Pt(0.75) });
        self.ops.push(Op::DrawLine {
            line: Line {
                points: vec![point(x1, y), point(x2, y)],
                is_closed: false,
            },
        });
    }

    fn centered_line(&mut self, text: &str, size: f32, bold: bool, fill: u32) {
        let height = size * 1.2;
        self.ensure(height);
        let baseline = self.y - size;
        let left = self.left();
        let width = self.core.usable_width_pt;
        self.text_aligned(text, left, width, baseline, size, bold, fill, CellAlign::Center);
        self.y -= height;
    }

    fn section_title(&mut self, title: &str, keep_with: f32) {
        self.ensure(SECTION_FONT_PT * 1.2 + BLOCK_GAP_PT + keep_with);
        self.y -= BLOCK_GAP_PT;
        self.centered_line(title, SECTION_FONT_PT, true, PRIMARY_COLOR);
        self.y -= 4.0;
    }

    fn logo(&mut self, id: XObjectId, width_px: usize, height_px: usize) {
        if width_px == 0 || height_px == 0 {
            return;
        }
        let scale = LOGO_HEIGHT_PT / height_px as f32;
        let width_pt = width_px as f32 * scale;
        let x = self.left() + (self.core.usable_width_pt - width_pt) / 2.0;
        let y = self.y - LOGO_HEIGHT_PT;
        self.ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x)),
                translate_y: Some(Pt(y)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(72.0),
                ..Default::default()
            },
        });
        self.y -= LOGO_HEIGHT_PT + 6.0;
    }

    fn info_box(&mut self, info: &InfoBox) {
        let inner_width = self.core.usable_width_pt - INFO_BOX_PADDING_PT * 2.0;
        let line_height = BODY_FONT_PT * LINE_HEIGHT;
        let lines: Vec<String> = info
            .line_texts()
            .iter()
            .flat_map(|line| {
                wrap_text(&self.font.prepare(line), inner_width / self.font.width_scale(), BODY_FONT_PT, false)
            })
            .collect();
        let height = lines.len() as f32 * line_height + INFO_BOX_PADDING_PT * 2.0;

        self.ensure(height + BLOCK_GAP_PT);
        self.y -= BLOCK_GAP_PT;
        let (left, top, width) = (self.left(), self.y, self.core.usable_width_pt);
        self.rect(left, top, width, height, Some(INFO_BG_COLOR), Some(INFO_BORDER_COLOR));

        let mut baseline = top - INFO_BOX_PADDING_PT - BODY_FONT_PT;
        for line in &lines {
            self.text(line, left + INFO_BOX_PADDING_PT, baseline, BODY_FONT_PT, false, TEXT_COLOR);
            baseline -= line_height;
        }
        self.y -= height;
    }

    fn table_row(&mut self, layout: &TableRowLayout, widths: &[f32], aligns: &[CellAlign], header: bool) {
        let top = self.y;
        let mut x = self.left();
        for ((cell, width), align) in layout.cells.iter().zip(widths).zip(aligns) {
            if header {
                self.rect(x, top, *width, layout.height_pt, Some(PRIMARY_COLOR), Some(PRIMARY_COLOR));
            } else {
                self.rect(x, top, *width, layout.height_pt, None, Some(BORDER_COLOR));
            }
            let fill = if header { HEADER_TEXT_COLOR } else { TEXT_COLOR };
            let align = if header { CellAlign::Center } else { *align };
            let mut baseline = top - CELL_PADDING_Y_PT - TABLE_FONT_PT * 0.9;
            for line in cell {
                self.text_aligned(
                    line,
                    x + CELL_PADDING_X_PT,
                    width - CELL_PADDING_X_PT * 2.0,
                    baseline,
                    TABLE_FONT_PT,
                    header,
                    fill,
                    align,
                );
                baseline -= TABLE_FONT_PT * LINE_HEIGHT;
            }
            x += width;
        }
        self.y -= layout.height_pt;
    }

    fn table(&mut self, table: &TableBlock) {
        let widths = table_widths_pt(table.columns, &self.core, TABLE_FONT_PT);
        let aligns: Vec<CellAlign> = table.columns.iter().map(|c| c.align).collect();
        let scale = self.font.width_scale();
        let header_cells: Vec<String> = table.columns.iter().map(|c| self.font.prepare(c.label)).collect();
        let header = layout_row_scaled(&header_cells, &widths, TABLE_FONT_PT, true, scale);
        let rows: Vec<TableRowLayout> = table
            .rows
            .iter()
            .map(|row| {
                let cells: Vec<String> = row.iter().map(|c| self.font.prepare(c)).collect();
                layout_row_scaled(&cells, &widths, TABLE_FONT_PT, false, scale)
            })
            .collect();

        // Keep the title with the header and at least one line of the first row
        let first_row = rows
            .first()
            .map(|r| r.height_pt.min(row_height_pt(1, TABLE_FONT_PT)))
            .unwrap_or(0.0);
        self.section_title(table.title, header.height_pt + first_row);
        self.table_row(&header, &widths, &aligns, true);

        let first_available = self.y - self.core.content_bottom_pt();
        let page_available = self.core.content_height_pt() - header.height_pt;
        let pages = paginate_rows(&rows, TABLE_FONT_PT, first_available, page_available);
        for (idx, page) in pages.iter().enumerate() {
            if idx > 0 {
                self.new_page();
                self.table_row(&header, &widths, &aligns, true);
            }
            for row in page {
                self.table_row(row, &widths, &aligns, false);
            }
        }
    }

    fn signature(&mut self, label: &str, line: &str) {
        let line_height = BODY_FONT_PT * LINE_HEIGHT;
        self.ensure(30.0 + line_height * 2.0);
        self.y -= 30.0;
        let left = self.left();
        self.text(label, left, self.y - BODY_FONT_PT, BODY_FONT_PT, true, TEXT_COLOR);
        self.y -= line_height;
        self.text(line, left, self.y - BODY_FONT_PT, BODY_FONT_PT, false, TEXT_COLOR);
        self.y -= line_height;
    }

    /// Close the last page and stamp footers (needs the final page count)
    fn finish(mut self, footer: &str) -> Vec<Vec<Op>> {
        self.new_page();
        let total = self.pages.len();
        let core = self.core;
        let mut pages = std::mem::take(&mut self.pages);
        for (idx, ops) in pages.iter_mut().enumerate() {
            self.ops = std::mem::take(ops);
            let rule_y = core.margin_pt + core.footer_height_pt - 6.0;
            self.hline(core.margin_pt, core.margin_pt + core.usable_width_pt, rule_y, INFO_BORDER_COLOR);
            let baseline = core.margin_pt + 4.0;
            let line = format!("{} | Page {} of {}", footer, idx + 1, total);
            self.text_aligned(&line, core.margin_pt, core.usable_width_pt, baseline, FOOTER_FONT_PT, false, FOOTER_COLOR, CellAlign::Center);
            *ops = std::mem::take(&mut self.ops);
        }
        pages
    }
}

/// Paint `document` and return the PDF bytes
pub fn render_pdf(document: &ReportDocument, layout: &PdfLayout, assets: &PdfAssets) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new(DOCUMENT_TITLE);
    let mut warnings = Vec::new();

    let font = match &assets.font {
        Some(bytes) => {
            let parsed = ParsedFont::from_bytes(bytes, 0, &mut warnings)
                .ok_or_else(|| ReportError::PdfGeneration("font file could not be parsed".into()))?;
            PdfFont::External(doc.add_font(&parsed))
        }
        None => PdfFont::Builtin,
    };

    let logo = match &assets.logo {
        Some(logo) => {
            let png = logo.png_bytes()?;
            match RawImage::decode_from_bytes(&png, &mut warnings) {
                Ok(image) => {
                    let (w, h) = (image.width, image.height);
                    Some((doc.add_image(&image), w, h))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "logo could not be decoded, using title text");
                    None
                }
            }
        }
        None => None,
    };

    let core = PdfLayoutCore::from_layout(layout);
    let mut painter = Painter::new(core, font);

    // Header block
    if let Some((id, w, h)) = logo {
        painter.logo(id, w, h);
    }
    painter.centered_line(document.title, TITLE_FONT_PT, true, PRIMARY_COLOR);
    painter.centered_line(document.department, SUBTITLE_FONT_PT, true, PRIMARY_COLOR);
    painter.centered_line(document.report_title, SECTION_FONT_PT, true, PRIMARY_COLOR);
    painter.info_box(&document.institution);

    painter.table(&document.projects);
    painter.info_box(&document.summary);
    painter.table(&document.team);

    painter.section_title(document.approval_title, BODY_FONT_PT * LINE_HEIGHT * 2.0);
    painter.info_box(&document.approval);
    painter.signature(document.signature_label, document.signature_line);

    let pages: Vec<PdfPage> = painter
        .finish(&document.footer)
        .into_iter()
        .map(|ops| PdfPage::new(Mm(layout.page_width_mm), Mm(layout.page_height_mm), ops))
        .collect();
    let page_count = pages.len();

    let bytes = doc
        .with_pages(pages)
        .save(&PdfSaveOptions::default(), &mut warnings);

    tracing::debug!(pages = page_count, warnings = warnings.len(), bytes = bytes.len(), "PDF painted");
    if bytes.is_empty() {
        return Err(ReportError::PdfGeneration("renderer produced no output".into()));
    }
    Ok(bytes)
}

/// `render_pdf` with renderer panics turned into errors
pub fn render_pdf_guarded(document: &ReportDocument, layout: &PdfLayout, assets: &PdfAssets) -> Result<Vec<u8>> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| render_pdf(document, layout, assets)))
        .unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<String>()
                .map(String::as_str)
                .or_else(|| payload.downcast_ref::<&str>().copied())
                .unwrap_or("unknown panic");
            Err(ReportError::PdfGeneration(format!("renderer panicked: {}", message)))
        })
}

/// Render and write to `output_path`
pub fn generate_pdf(document: &ReportDocument, layout: &PdfLayout, assets: &PdfAssets, output_path: &Path) -> Result<()> {
    let bytes = render_pdf_guarded(document, layout, assets)?;
    std::fs::write(output_path, bytes)?;
    Ok(())
}
