//! PDF export core: structured document model + text metrics.
//!
//! `build_document` turns typed inputs into cell strings using the named
//! formatting functions; the painter in the CLI crate only places them.

use crate::format::{
    format_currency, format_currency_whole, format_display_date, format_percent,
};
use crate::layout::{
    column_widths, mm_to_pt, ColumnSpec, PdfLayout, CELL_PADDING_X_PT, CELL_PADDING_Y_PT,
    LINE_HEIGHT, PROJECT_COLUMNS, TEAM_COLUMNS,
};
use crate::summary::Summary;
use crate::types::{ApprovalRecord, Institution, Project, TeamMember};

pub const ORGANISATION_TITLE: &str = "TERTIARY EDUCATION TRUST FUND";
pub const DEPARTMENT_TITLE: &str = "Monitoring & Evaluation Department";
pub const REPORT_TITLE: &str = "Second / Final Tranche Monitoring Report";
pub const PROJECTS_SECTION_TITLE: &str = "Projects Monitoring Details";
pub const TEAM_SECTION_TITLE: &str = "Monitoring Team";
pub const APPROVAL_SECTION_TITLE: &str = "DM&E Approval";
pub const OFFICER_SIGNATURE_LABEL: &str = "DM&E Officer Signature:";
pub const SIGNATURE_PLACEHOLDER: &str = "________________";
pub const OFFICER_SIGNATURE_LINE: &str = "_________________________________________";
pub const NO_COMMENTS_PLACEHOLDER: &str = "No comments provided";

/// Inputs of one document render (read-only views of the session)
#[derive(Debug, Clone, Copy)]
pub struct DocumentInput<'a> {
    /// Rows to print, rider row already appended
    pub projects: &'a [Project],
    pub institution: &'a Institution,
    pub team: &'a [TeamMember],
    pub approval: &'a ApprovalRecord,
    pub summary: &'a Summary,
    /// `YYYY-MM-DD HH:MM:SS`
    pub generated_at: &'a str,
}

/// `Label: value` pair inside an info box
#[derive(Debug, Clone, PartialEq)]
pub struct InfoItem {
    pub label: &'static str,
    pub value: String,
}

impl InfoItem {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self { label, value: value.into() }
    }
}

/// Shaded box of `|`-separated items; one Vec per printed line
#[derive(Debug, Clone, PartialEq)]
pub struct InfoBox {
    pub lines: Vec<Vec<InfoItem>>,
}

impl InfoBox {
    /// `Label: value | Label: value` per line
    pub fn line_texts(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|items| {
                items
                    .iter()
                    .map(|i| format!("{}: {}", i.label, i.value))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect()
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .flatten()
            .find(|i| i.label == label)
            .map(|i| i.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub title: &'static str,
    pub columns: &'static [ColumnSpec],
    pub rows: Vec<Vec<String>>,
}

/// Fully formatted report, independent of page geometry
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: &'static str,
    pub department: &'static str,
    pub report_title: &'static str,
    pub institution: InfoBox,
    pub projects: TableBlock,
    pub summary: InfoBox,
    pub team: TableBlock,
    pub approval_title: &'static str,
    pub approval: InfoBox,
    pub signature_label: &'static str,
    pub signature_line: &'static str,
    pub footer: String,
}

/// Project table row; `row_number` is the printed position, not `sequence`.
pub fn project_row(row_number: usize, project: &Project) -> Vec<String> {
    vec![
        row_number.to_string(),
        project.name.clone(),
        format_currency_whole(project.approved_cost),
        format_currency_whole(project.contract_sum),
        format_percent(project.disbursed),
        format_percent(project.balance()),
        project.quality.to_string(),
        project.compliance.to_string(),
        project.observations.clone(),
        format_percent(project.completion),
        project.documents.to_string(),
        project.recommendation.clone(),
    ]
}

pub fn team_row(row_number: usize, member: &TeamMember) -> Vec<String> {
    vec![
        row_number.to_string(),
        member.name.clone(),
        member.designation.clone(),
        SIGNATURE_PLACEHOLDER.to_string(),
    ]
}

pub fn summary_box(summary: &Summary) -> InfoBox {
    InfoBox {
        lines: vec![
            vec![
                InfoItem::new("Total Projects", summary.total_projects.to_string()),
                InfoItem::new("Completed", summary.completed.to_string()),
                InfoItem::new("In Progress", summary.in_progress.to_string()),
                InfoItem::new("Completion Rate", format_percent(summary.completion_rate)),
            ],
            vec![
                InfoItem::new("Total Approved", format_currency(summary.total_approved)),
                InfoItem::new("Total Contract", format_currency(summary.total_contract)),
                InfoItem::new("Total Disbursed", format_currency(summary.total_disbursed)),
                InfoItem::new("Balance", format_currency(summary.balance)),
            ],
        ],
    }
}

pub fn approval_box(approval: &ApprovalRecord) -> InfoBox {
    let comments = if approval.comments.trim().is_empty() {
        NO_COMMENTS_PLACEHOLDER.to_string()
    } else {
        approval.comments.clone()
    };
    InfoBox {
        lines: vec![
            vec![
                InfoItem::new("Status", approval.status.to_string()),
                InfoItem::new("Officer", approval.officer.clone()),
                InfoItem::new("Date", format_display_date(approval.date)),
            ],
            vec![InfoItem::new("Comments", comments)],
        ],
    }
}

pub fn institution_box(institution: &Institution) -> InfoBox {
    InfoBox {
        lines: vec![vec![
            InfoItem::new("Institution", institution.name.clone()),
            InfoItem::new("Location", institution.location.clone()),
            InfoItem::new("Inspection Date", format_display_date(institution.inspection_date)),
            InfoItem::new("Intervention Year", institution.intervention_year.clone()),
        ]],
    }
}

/// Assemble the report model
pub fn build_document(input: &DocumentInput<'_>) -> ReportDocument {
    ReportDocument {
        title: ORGANISATION_TITLE,
        department: DEPARTMENT_TITLE,
        report_title: REPORT_TITLE,
        institution: institution_box(input.institution),
        projects: TableBlock {
            title: PROJECTS_SECTION_TITLE,
            columns: PROJECT_COLUMNS,
            rows: input
                .projects
                .iter()
                .enumerate()
                .map(|(i, p)| project_row(i + 1, p))
                .collect(),
        },
        summary: summary_box(input.summary),
        team: TableBlock {
            title: TEAM_SECTION_TITLE,
            columns: TEAM_COLUMNS,
            rows: input
                .team
                .iter()
                .enumerate()
                .map(|(i, m)| team_row(i + 1, m))
                .collect(),
        },
        approval_title: APPROVAL_SECTION_TITLE,
        approval: approval_box(input.approval),
        signature_label: OFFICER_SIGNATURE_LABEL,
        signature_line: OFFICER_SIGNATURE_LINE,
        footer: format!("Generated on {}", input.generated_at),
    }
}

// ============================================
// Geometry (pt)
// ============================================

/// Page geometry resolved to points
#[derive(Debug, Clone, Copy)]
pub struct PdfLayoutCore {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub margin_pt: f32,
    pub usable_width_pt: f32,
    pub usable_height_pt: f32,
    /// Space reserved above the bottom margin for the footer
    pub footer_height_pt: f32,
}

impl PdfLayoutCore {
    pub fn from_layout(layout: &PdfLayout) -> Self {
        Self {
            page_width_pt: mm_to_pt(layout.page_width_mm),
            page_height_pt: mm_to_pt(layout.page_height_mm),
            margin_pt: mm_to_pt(layout.margin_mm),
            usable_width_pt: mm_to_pt(layout.usable_width_mm()),
            usable_height_pt: mm_to_pt(layout.usable_height_mm()),
            footer_height_pt: 24.0,
        }
    }

    /// Baseline of the first content line
    pub fn content_top_pt(&self) -> f32 {
        self.page_height_pt - self.margin_pt
    }

    /// Lowest y content may reach before a page break
    pub fn content_bottom_pt(&self) -> f32 {
        self.margin_pt + self.footer_height_pt
    }

    /// Height available to content on a fresh page
    pub fn content_height_pt(&self) -> f32 {
        self.usable_height_pt - self.footer_height_pt
    }
}

/// Cell text wrapped to its column, with the row height it needs
#[derive(Debug, Clone, PartialEq)]
pub struct TableRowLayout {
    pub cells: Vec<Vec<String>>,
    pub height_pt: f32,
}

/// Wrap every cell of `row` into the given column widths.
pub fn layout_row(row: &[String], widths_pt: &[f32], font_size: f32, bold: bool) -> TableRowLayout {
    layout_row_scaled(row, widths_pt, font_size, bold, 1.0)
}

/// [`layout_row`] for a face whose glyphs run `width_scale` times wider than Helvetica
pub fn layout_row_scaled(
    row: &[String],
    widths_pt: &[f32],
    font_size: f32,
    bold: bool,
    width_scale: f32,
) -> TableRowLayout {
    let cells: Vec<Vec<String>> = row
        .iter()
        .zip(widths_pt)
        .map(|(text, width)| {
            wrap_text(text, (width - CELL_PADDING_X_PT * 2.0) / width_scale, font_size, bold)
        })
        .collect();
    let max_lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    TableRowLayout {
        cells,
        height_pt: row_height_pt(max_lines, font_size),
    }
}

pub fn row_height_pt(lines: usize, font_size: f32) -> f32 {
    lines as f32 * font_size * LINE_HEIGHT + CELL_PADDING_Y_PT * 2.0
}

/// Narrowest width that keeps the label's longest word and a three-digit
/// row number on one line.
pub fn min_column_width_pt(column: &ColumnSpec, font_size: f32) -> f32 {
    let longest_word = column
        .label
        .split_whitespace()
        .map(|w| text_width_pt(w, font_size, true))
        .fold(0.0_f32, f32::max);
    longest_word.max(text_width_pt("000", font_size, false)) + CELL_PADDING_X_PT * 2.0 + 0.5
}

/// Column widths (pt) for a table spanning the usable width.
///
/// Proportional, except that columns below their minimum are widened,
/// narrowest minimum first, with the room taken from columns that have
/// width to spare.
pub fn table_widths_pt(columns: &[ColumnSpec], core: &PdfLayoutCore, font_size: f32) -> Vec<f32> {
    let mut widths = column_widths(columns, core.usable_width_pt);
    let mins: Vec<f32> = columns.iter().map(|c| min_column_width_pt(c, font_size)).collect();

    let spare: f32 = widths.iter().zip(&mins).map(|(w, m)| (w - m).max(0.0)).sum();
    if spare <= 0.0 {
        return widths;
    }

    let mut order: Vec<usize> = (0..columns.len()).filter(|&i| widths[i] < mins[i]).collect();
    order.sort_by(|&a, &b| mins[a].total_cmp(&mins[b]));

    let mut grants = vec![0.0_f32; columns.len()];
    let mut left = spare;
    for i in order {
        let grant = (mins[i] - widths[i]).min(left);
        grants[i] = grant;
        left -= grant;
        if left <= 0.0 {
            break;
        }
    }

    let taken = spare - left;
    for (i, w) in widths.iter_mut().enumerate() {
        if *w >= mins[i] {
            *w -= (*w - mins[i]) * taken / spare;
        } else {
            *w += grants[i];
        }
    }
    widths
}

// ============================================
// Table pagination
// ============================================

/// Whole lines of `font_size` text that fit a cell of `height_pt`
pub fn lines_fitting(height_pt: f32, font_size: f32) -> usize {
    let inner = height_pt - CELL_PADDING_Y_PT * 2.0;
    if inner <= 0.0 {
        return 0;
    }
    (inner / (font_size * LINE_HEIGHT)).floor() as usize
}

/// Split a row after its first `lines` lines; the tail keeps the rest of every cell.
pub fn split_row(row: &TableRowLayout, lines: usize, font_size: f32) -> (TableRowLayout, TableRowLayout) {
    let mut head = Vec::with_capacity(row.cells.len());
    let mut tail = Vec::with_capacity(row.cells.len());
    for cell in &row.cells {
        let at = lines.min(cell.len());
        head.push(cell[..at].to_vec());
        tail.push(cell[at..].to_vec());
    }
    let tail_lines = tail.iter().map(Vec::len).max().unwrap_or(0).max(1);
    (
        TableRowLayout {
            cells: head,
            height_pt: row_height_pt(lines.max(1), font_size),
        },
        TableRowLayout {
            cells: tail,
            height_pt: row_height_pt(tail_lines, font_size),
        },
    )
}

/// Distribute table rows over pages.
///
/// `first_available` is the room left under the header on the current page,
/// `page_available` the room under a repeated header on a fresh page. A row
/// that fits a fresh page moves there whole, unless the current page has no
/// rows yet; otherwise it is cut at line boundaries and continues on the
/// following pages.
pub fn paginate_rows(
    rows: &[TableRowLayout],
    font_size: f32,
    first_available: f32,
    page_available: f32,
) -> Vec<Vec<TableRowLayout>> {
    let mut pages: Vec<Vec<TableRowLayout>> = vec![Vec::new()];
    let mut remaining = first_available;

    for row in rows {
        let mut row = row.clone();
        loop {
            let current_empty = pages.last().map_or(true, Vec::is_empty);
            if row.height_pt <= remaining {
                remaining -= row.height_pt;
                if let Some(page) = pages.last_mut() {
                    page.push(row);
                }
                break;
            }
            if row.height_pt <= page_available && !current_empty {
                pages.push(Vec::new());
                remaining = page_available;
                continue;
            }

            let lines = lines_fitting(remaining, font_size);
            let row_lines = row.cells.iter().map(Vec::len).max().unwrap_or(0);
            if lines >= row_lines {
                remaining = 0.0;
                if let Some(page) = pages.last_mut() {
                    page.push(row);
                }
                break;
            }
            if lines == 0 {
                if current_empty && remaining >= page_available {
                    // Not even one line fits a fresh page
                    if let Some(page) = pages.last_mut() {
                        page.push(row);
                    }
                    break;
                }
                pages.push(Vec::new());
                remaining = page_available;
                continue;
            }

            let (head, tail) = split_row(&row, lines, font_size);
            if let Some(page) = pages.last_mut() {
                page.push(head);
            }
            pages.push(Vec::new());
            remaining = page_available;
            row = tail;
        }
    }
    pages
}

// ============================================
// Text metrics (Helvetica AFM widths, 1/1000 em)
// ============================================

/// Width allowance for embedded fonts, which typically run wider than Helvetica
pub const EMBEDDED_FONT_WIDTH_SCALE: f32 = 1.15;

const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Approximate rendered width of `text` (pt).
///
/// Helvetica metrics. An embedded TrueType face has its own widths, so the
/// painter wraps it with [`layout_row_scaled`] and [`EMBEDDED_FONT_WIDTH_SCALE`].
pub fn text_width_pt(text: &str, font_size: f32, bold: bool) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..127).contains(&code) {
                HELVETICA_WIDTHS[(code - 32) as usize] as u32
            } else {
                556
            }
        })
        .sum();
    let scale = if bold { 1.06 } else { 1.0 };
    units as f32 / 1000.0 * font_size * scale
}

/// Greedy word wrap; words wider than the line are split by character.
/// Explicit newlines are kept. Always returns at least one line.
pub fn wrap_text(text: &str, max_width_pt: f32, font_size: f32, bold: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if text_width_pt(&candidate, font_size, bold) <= max_width_pt {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            // Break an over-long word
            for ch in word.chars() {
                current.push(ch);
                if text_width_pt(&current, font_size, bold) > max_width_pt && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Orientation, TABLE_FONT_PT};
    use crate::types::{AdminCharges, ApprovalStatus, QualityRating};
    use crate::records::{document_projects, recalc_projects};
    use chrono::NaiveDate;

    fn institution() -> Institution {
        Institution {
            name: "Federal University of Technology".to_string(),
            location: "Minna".to_string(),
            intervention_year: "2022".to_string(),
            inspection_date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
        }
    }

    fn approval(comments: &str) -> ApprovalRecord {
        ApprovalRecord {
            status: ApprovalStatus::Approved,
            officer: "Mrs. F. Okoro".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
            comments: comments.to_string(),
        }
    }

    #[test]
    fn test_project_row_formatting() {
        let project = recalc_projects(vec![Project::new("ICT Centre")
            .with_approved_cost(1_234_567.0)
            .with_contract_sum(1_000_000.0)
            .with_disbursed(62.5)
            .with_completion(80.0)
            .with_quality(QualityRating::Average)
            .with_observations("Roofing done")
            .with_recommendation("Release final tranche")])
        .remove(0);
        let row = project_row(7, &project);
        assert_eq!(row.len(), PROJECT_COLUMNS.len());
        assert_eq!(row[0], "7");
        assert_eq!(row[1], "ICT Centre");
        assert_eq!(row[2], "₦1,234,567");
        assert_eq!(row[3], "₦1,000,000");
        assert_eq!(row[4], "62.5%");
        assert_eq!(row[5], "37.5%");
        assert_eq!(row[6], "Average");
        assert_eq!(row[7], "Compliant");
        assert_eq!(row[8], "Roofing done");
        assert_eq!(row[9], "80.0%");
        assert_eq!(row[10], "Pending");
        assert_eq!(row[11], "Release final tranche");
    }

    #[test]
    fn test_build_document_blocks() {
        let rider = AdminCharges::enabled(215_013.0);
        let stored = recalc_projects(vec![Project::new("Hostel").with_contract_sum(500.0)]);
        let projects = document_projects(&stored, &rider);
        let summary = Summary::compute(&stored, &rider);
        let team = vec![TeamMember::new("Arch. A.A.", "Team Lead")];
        let institution = institution();
        let approval = approval("");
        let doc = build_document(&DocumentInput {
            projects: &projects,
            institution: &institution,
            team: &team,
            approval: &approval,
            summary: &summary,
            generated_at: "2025-02-10 12:00:00",
        });

        assert_eq!(doc.title, "TERTIARY EDUCATION TRUST FUND");
        assert_eq!(doc.projects.rows.len(), 2);
        assert_eq!(doc.projects.rows[1][1], "Bank and Administrative Charges");
        assert_eq!(doc.projects.rows[1][6], "N/A");
        assert_eq!(doc.projects.rows[1][9], "100.0%");
        assert_eq!(doc.team.rows[0], vec!["1", "Arch. A.A.", "Team Lead", SIGNATURE_PLACEHOLDER]);
        assert_eq!(doc.institution.value("Inspection Date"), Some("03-Feb-2025"));
        assert_eq!(doc.institution.value("Intervention Year"), Some("2022"));
        assert_eq!(doc.summary.value("Total Contract"), Some("₦215,513.00"));
        assert_eq!(doc.summary.value("Total Projects"), Some("1"));
        assert_eq!(doc.approval.value("Comments"), Some(NO_COMMENTS_PLACEHOLDER));
        assert_eq!(doc.approval.value("Status"), Some("Approved"));
        assert_eq!(doc.footer, "Generated on 2025-02-10 12:00:00");
    }

    #[test]
    fn test_approval_comments_kept_verbatim() {
        let boxed = approval_box(&approval("Fence is incomplete; revisit in Q3"));
        assert_eq!(boxed.value("Comments"), Some("Fence is incomplete; revisit in Q3"));
        let lines = boxed.line_texts();
        assert_eq!(lines[0], "Status: Approved | Officer: Mrs. F. Okoro | Date: 10-Feb-2025");
    }

    #[test]
    fn test_layout_core_orientation() {
        let landscape = PdfLayoutCore::from_layout(&PdfLayout::for_orientation(Orientation::Landscape));
        let portrait = PdfLayoutCore::from_layout(&PdfLayout::for_orientation(Orientation::Portrait));
        assert!(landscape.usable_width_pt > portrait.usable_width_pt);
        assert!(landscape.content_top_pt() > landscape.content_bottom_pt());
        assert!((landscape.margin_pt - portrait.margin_pt).abs() < f32::EPSILON);
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("alpha beta gamma delta", 40.0, 10.0, false);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_pt(line, 10.0, false) <= 40.0 || !line.contains(' '));
        }
        assert_eq!(lines.join(" "), "alpha beta gamma delta");

        assert_eq!(wrap_text("", 50.0, 10.0, false), vec![String::new()]);
        assert_eq!(wrap_text("a\nb", 500.0, 10.0, false), vec!["a", "b"]);

        let long = wrap_text("Supercalifragilistic", 30.0, 10.0, false);
        assert!(long.len() > 1);
        assert_eq!(long.concat(), "Supercalifragilistic");
    }

    fn sample_document(comments: &str) -> ReportDocument {
        let rider = AdminCharges::enabled(1_000.0);
        let stored = recalc_projects(vec![Project::new("Library").with_contract_sum(2_000.0)]);
        let projects = document_projects(&stored, &rider);
        let summary = Summary::compute(&stored, &rider);
        let team = vec![TeamMember::new("Engr. B. Musa", "Member")];
        let institution = institution();
        let approval = approval(comments);
        build_document(&DocumentInput {
            projects: &projects,
            institution: &institution,
            team: &team,
            approval: &approval,
            summary: &summary,
            generated_at: "2025-02-10 12:00:00",
        })
    }

    #[test]
    fn test_documents_compare_by_content() {
        assert_eq!(sample_document("Satisfactory"), sample_document("Satisfactory"));
        assert_ne!(sample_document("Satisfactory"), sample_document("Revisit"));

        let doc = sample_document("");
        assert_eq!(doc.projects.columns, PROJECT_COLUMNS);
        assert_eq!(doc.team.columns, TEAM_COLUMNS);
    }

    #[test]
    fn test_content_height_per_orientation() {
        let landscape = PdfLayoutCore::from_layout(&PdfLayout::for_orientation(Orientation::Landscape));
        let portrait = PdfLayoutCore::from_layout(&PdfLayout::for_orientation(Orientation::Portrait));
        for core in [landscape, portrait] {
            let span = core.content_top_pt() - core.content_bottom_pt();
            assert!((core.content_height_pt() - span).abs() < 0.01);
        }
        assert!(portrait.content_height_pt() > landscape.content_height_pt());
    }

    #[test]
    fn test_oversized_observation_continues_on_next_page() {
        let core = PdfLayoutCore::from_layout(&PdfLayout::for_orientation(Orientation::Landscape));
        let widths = table_widths_pt(PROJECT_COLUMNS, &core, TABLE_FONT_PT);
        let labels: Vec<String> = PROJECT_COLUMNS.iter().map(|c| c.label.to_string()).collect();
        let header = layout_row(&labels, &widths, TABLE_FONT_PT, true);

        let observation: String = "Cracks along the east wall of block C need repair. "
            .repeat(40)
            .chars()
            .take(2000)
            .collect();
        let project = recalc_projects(vec![Project::new("Lecture Theatre").with_observations(&observation)])
            .remove(0);
        let big = layout_row(&project_row(1, &project), &widths, TABLE_FONT_PT, false);
        let small = layout_row(&project_row(2, &Project::new("Gate House")), &widths, TABLE_FONT_PT, false);

        let page_available = core.content_height_pt() - header.height_pt;
        assert!(big.height_pt > page_available);

        let first_available = page_available - 80.0;
        let pages = paginate_rows(&[small.clone(), big.clone(), small.clone()], TABLE_FONT_PT, first_available, page_available);
        assert!(pages.len() > 1);

        for (idx, page) in pages.iter().enumerate() {
            let capacity = if idx == 0 { first_available } else { page_available };
            let used: f32 = page.iter().map(|r| r.height_pt).sum();
            assert!(used <= capacity + 0.01, "page {} holds {} of {}", idx + 1, used, capacity);
        }

        // The observation text survives the split line for line
        let fragments: Vec<&TableRowLayout> = pages.iter().flatten().filter(|r| r != &&small).collect();
        assert!(fragments.len() > 1);
        let rejoined: Vec<String> = fragments.iter().flat_map(|r| r.cells[8].clone()).collect();
        assert_eq!(rejoined, big.cells[8]);
        assert_eq!(fragments[0].cells[0], vec!["1".to_string()]);
        assert!(fragments[1].cells[0].is_empty());

        let last_page = pages.last().unwrap();
        assert_eq!(last_page.last(), Some(&small));
    }

    #[test]
    fn test_row_taller_than_remaining_space_moves_whole() {
        let row = layout_row(&["a".to_string()], &[100.0], 9.0, false);
        let pages = paginate_rows(&[row.clone(), row.clone()], 9.0, row.height_pt * 1.5, 500.0);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], vec![row.clone()]);
        assert_eq!(pages[1], vec![row]);
    }

    #[test]
    fn test_split_row_keeps_remaining_lines() {
        let row = TableRowLayout {
            cells: vec![vec!["7".into()], vec!["a".into(), "b".into(), "c".into()]],
            height_pt: row_height_pt(3, 9.0),
        };
        let (head, tail) = split_row(&row, 2, 9.0);
        assert_eq!(head.cells[1], vec!["a", "b"]);
        assert_eq!(head.height_pt, row_height_pt(2, 9.0));
        assert_eq!(tail.cells[0], Vec::<String>::new());
        assert_eq!(tail.cells[1], vec!["c"]);
        assert_eq!(tail.height_pt, row_height_pt(1, 9.0));
        assert_eq!(lines_fitting(row_height_pt(2, 9.0) + 1.0, 9.0), 2);
        assert_eq!(lines_fitting(CELL_PADDING_Y_PT, 9.0), 0);
    }

    #[test]
    fn test_serial_column_fits_in_portrait() {
        let core = PdfLayoutCore::from_layout(&PdfLayout::for_orientation(Orientation::Portrait));
        let widths = table_widths_pt(PROJECT_COLUMNS, &core, TABLE_FONT_PT);
        let total: f32 = widths.iter().sum();
        assert!((total - core.usable_width_pt).abs() < 0.01);

        let header = layout_row(&["S/N".to_string()], &widths[..1], TABLE_FONT_PT, true);
        assert_eq!(header.cells[0], vec!["S/N"]);
        for sequence in ["9", "42", "100"] {
            let cell = layout_row(&[sequence.to_string()], &widths[..1], TABLE_FONT_PT, false);
            assert_eq!(cell.cells[0], vec![sequence]);
        }

        // Wide columns give way but stay at least as wide as their minimum
        let observations = PROJECT_COLUMNS.iter().position(|c| c.label == "Observations").unwrap();
        assert!(widths[observations] >= min_column_width_pt(&PROJECT_COLUMNS[observations], TABLE_FONT_PT) - 0.01);
    }

    #[test]
    fn test_landscape_widths_already_fit_serial_column() {
        let core = PdfLayoutCore::from_layout(&PdfLayout::for_orientation(Orientation::Landscape));
        let widths = table_widths_pt(TEAM_COLUMNS, &core, TABLE_FONT_PT);
        assert_eq!(widths, column_widths(TEAM_COLUMNS, core.usable_width_pt));
    }

    #[test]
    fn test_embedded_font_wraps_earlier() {
        let text = vec!["Roof leaks repaired and ceiling boards replaced".to_string()];
        let helvetica = layout_row(&text, &[120.0], 9.0, false);
        let embedded = layout_row_scaled(&text, &[120.0], 9.0, false, EMBEDDED_FONT_WIDTH_SCALE);
        assert!(embedded.cells[0].len() >= helvetica.cells[0].len());
        for line in &embedded.cells[0] {
            let measured = text_width_pt(line, 9.0, false) * EMBEDDED_FONT_WIDTH_SCALE;
            assert!(measured <= 120.0 - CELL_PADDING_X_PT * 2.0 + 0.01);
        }
        assert_eq!(embedded.cells[0].join(" "), text[0]);
    }

    #[test]
    fn test_layout_row_height_follows_tallest_cell() {
        let row = vec!["1".to_string(), "a long observation that must wrap over lines".to_string()];
        let single = layout_row(&row[..1], &[100.0], 9.0, false);
        let wrapped = layout_row(&row, &[100.0, 60.0], 9.0, false);
        assert_eq!(single.height_pt, row_height_pt(1, 9.0));
        assert!(wrapped.height_pt > single.height_pt);
        assert_eq!(wrapped.cells.len(), 2);
    }
}
