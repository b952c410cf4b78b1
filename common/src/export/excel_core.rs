//! Excel export core
//!
//! Three sheets (Projects / Institution / Summary), header row of field keys,
//! raw values written through: numbers stay numbers, no currency formatting.

use crate::error::{Error, Result};
use crate::format::format_display_date;
use crate::summary::Summary;
use crate::types::{Institution, Project};
use rust_xlsxwriter::*;

pub const PROJECTS_SHEET: &str = "Projects";
pub const INSTITUTION_SHEET: &str = "Institution";
pub const SUMMARY_SHEET: &str = "Summary";

/// Column order of the Projects sheet
pub const PROJECT_FIELDS: &[&str] = &[
    "s_no",
    "project",
    "approved_cost",
    "contract_sum",
    "disbursed",
    "balance",
    "quality",
    "compliance",
    "other_obs",
    "completion",
    "docs",
    "recommendation",
];

/// Column order of the Institution sheet
pub const INSTITUTION_FIELDS: &[&str] = &["name", "location", "year", "date"];

/// Column order of the Summary sheet
pub const SUMMARY_FIELDS: &[&str] = &[
    "total_projects",
    "completed",
    "in_progress",
    "completion_rate",
    "total_approved",
    "total_contract",
    "total_disbursed",
    "balance",
];

/// One literal cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<usize> for CellValue {
    fn from(n: usize) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// Projects sheet row, in `PROJECT_FIELDS` order
pub fn project_cells(project: &Project) -> Vec<CellValue> {
    vec![
        project.sequence().into(),
        project.name.as_str().into(),
        project.approved_cost.into(),
        project.contract_sum.into(),
        project.disbursed.into(),
        project.balance().into(),
        project.quality.as_str().into(),
        project.compliance.as_str().into(),
        project.observations.as_str().into(),
        project.completion.into(),
        project.documents.as_str().into(),
        project.recommendation.as_str().into(),
    ]
}

/// Institution sheet row, in `INSTITUTION_FIELDS` order
pub fn institution_cells(institution: &Institution) -> Vec<CellValue> {
    vec![
        institution.name.as_str().into(),
        institution.location.as_str().into(),
        institution.intervention_year.as_str().into(),
        format_display_date(institution.inspection_date).into(),
    ]
}

/// Summary sheet row, in `SUMMARY_FIELDS` order
pub fn summary_cells(summary: &Summary) -> Vec<CellValue> {
    vec![
        summary.total_projects.into(),
        summary.completed.into(),
        summary.in_progress.into(),
        summary.completion_rate.into(),
        summary.total_approved.into(),
        summary.total_contract.into(),
        summary.total_disbursed.into(),
        summary.balance.into(),
    ]
}

fn write_sheet(
    workbook: &mut Workbook,
    name: &str,
    headers: &[&str],
    rows: &[Vec<CellValue>],
    header_format: &Format,
) -> Result<()> {
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(name)
        .map_err(|e| Error::Excel(format!("sheet name error ({}): {}", name, e)))?;

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, header_format)
            .map_err(|e| Error::Excel(format!("header write error ({}): {}", name, e)))?;
        worksheet
            .set_column_width(col as u16, (header.len() as f64 + 4.0).max(12.0))
            .map_err(|e| Error::Excel(format!("column width error ({}): {}", name, e)))?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let row_num = idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let written = match cell {
                CellValue::Number(n) => worksheet.write_number(row_num, col as u16, *n),
                CellValue::Text(s) => worksheet.write_string(row_num, col as u16, s),
            };
            written.map_err(|e| {
                Error::Excel(format!("cell write error ({} r{} c{}): {}", name, row_num, col, e))
            })?;
        }
    }

    Ok(())
}

/// Build the workbook in memory
pub fn generate_excel_buffer(
    projects: &[Project],
    institution: &Institution,
    summary: &Summary,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let project_rows: Vec<Vec<CellValue>> = projects.iter().map(project_cells).collect();
    write_sheet(&mut workbook, PROJECTS_SHEET, PROJECT_FIELDS, &project_rows, &header_format)?;
    write_sheet(
        &mut workbook,
        INSTITUTION_SHEET,
        INSTITUTION_FIELDS,
        &[institution_cells(institution)],
        &header_format,
    )?;
    write_sheet(
        &mut workbook,
        SUMMARY_SHEET,
        SUMMARY_FIELDS,
        &[summary_cells(summary)],
        &header_format,
    )?;

    workbook
        .save_to_buffer()
        .map_err(|e| Error::Excel(format!("save error: {}", e)))
}
