//! Project list import
//!
//! Accepts the workbook this tool exports (sheet "Projects", header row of
//! field keys), a JSON array of projects, or a saved draft.

use crate::error::{ReportError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use monitoring_report_common::export::excel_core::PROJECTS_SHEET;
use monitoring_report_common::types::Project;
use serde_json::{Map, Value};
use std::path::Path;

/// Read projects from `path` (format chosen by extension)
pub fn import_projects(path: &Path) -> Result<Vec<Project>> {
    if !path.exists() {
        return Err(ReportError::FileNotFound(path.display().to_string()));
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let projects = match extension.as_str() {
        "json" => import_json(&std::fs::read_to_string(path)?)?,
        "xlsx" | "xlsm" | "xls" | "ods" => import_workbook(path)?,
        other => {
            return Err(ReportError::Import(format!(
                "unsupported file type '{}' (use .xlsx or .json)",
                other
            )))
        }
    };
    tracing::debug!(path = %path.display(), count = projects.len(), "projects imported");
    Ok(projects)
}

/// Projects from a JSON array, or from the `projects` key of a draft
pub fn import_json(text: &str) -> Result<Vec<Project>> {
    let value: Value = serde_json::from_str(text)?;
    let rows = match value {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("projects") {
            Some(Value::Array(rows)) => rows,
            _ => return Err(ReportError::Import("no 'projects' array in JSON object".into())),
        },
        _ => return Err(ReportError::Import("expected a JSON array of projects".into())),
    };
    rows_to_projects(rows)
}

fn import_workbook(path: &Path) -> Result<Vec<Project>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ReportError::Import(format!("{}: {}", path.display(), e)))?;
    let range = workbook
        .worksheet_range(PROJECTS_SHEET)
        .map_err(|e| ReportError::Import(format!("sheet '{}': {}", PROJECTS_SHEET, e)))?;

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    let objects = rows
        .filter(|cells| cells.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|cells| {
            let map: Map<String, Value> = header
                .iter()
                .zip(cells)
                .filter(|(key, cell)| !key.is_empty() && !matches!(cell, Data::Empty))
                .map(|(key, cell)| (key.clone(), cell_to_json(cell)))
                .collect();
            Value::Object(map)
        })
        .collect();
    rows_to_projects(objects)
}

fn cell_to_json(cell: &Data) -> Value {
    match cell {
        Data::Int(n) => Value::from(*n),
        Data::Float(n) => Value::from(*n),
        Data::Bool(b) => Value::Bool(*b),
        other => Value::String(other.to_string()),
    }
}

fn rows_to_projects(rows: Vec<Value>) -> Result<Vec<Project>> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            serde_json::from_value::<Project>(row)
                .map_err(|e| ReportError::Import(format!("row {}: {}", idx + 1, e)))
        })
        .collect()
}
