pub mod pdf;
pub mod excel;

use crate::cli::ExportFormat;
use crate::error::{ReportError, Result};
use chrono::NaiveDateTime;
use indicatif::{ProgressBar, ProgressStyle};
use monitoring_report_common::export::pdf_core::{build_document, DocumentInput};
use monitoring_report_common::{document_projects, validate_for_document, ApplicationState, PdfLayout};
use pdf::PdfAssets;
use std::path::{Path, PathBuf};
use std::time::Duration;

const REPORT_FILE_PREFIX: &str = "TETFUND_Report";
const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const FOOTER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `TETFUND_Report_{timestamp}` (spreadsheet)
pub fn excel_file_stem(now: NaiveDateTime) -> String {
    format!("{}_{}", REPORT_FILE_PREFIX, now.format(FILE_TIMESTAMP_FORMAT))
}

/// `TETFUND_Report_{institution}_{timestamp}` (document)
pub fn pdf_file_stem(institution_name: &str, now: NaiveDateTime) -> String {
    format!(
        "{}_{}_{}",
        REPORT_FILE_PREFIX,
        institution_name.trim().replace(' ', "_"),
        now.format(FILE_TIMESTAMP_FORMAT)
    )
}

fn output_path_for_format(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_both(output: &Path, pdf_stem: &str, excel_stem: &str) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        let pdf_path = output.join(format!("{}.pdf", pdf_stem));
        let excel_path = output.join(format!("{}.xlsx", excel_stem));
        (pdf_path, excel_path)
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(pdf_stem);
        let pdf_path = parent.join(format!("{}.pdf", stem));
        let excel_path = parent.join(format!("{}.xlsx", stem));
        (pdf_path, excel_path)
    }
}

/// Document bytes for the session in its preferred orientation.
///
/// The rider row is appended here so the table and the summary agree.
pub fn render_document(state: &ApplicationState, assets: &PdfAssets, now: NaiveDateTime) -> Result<Vec<u8>> {
    let projects = document_projects(state.projects.as_slice(), &state.context.admin_charges);
    let summary = state.summary();
    let generated_at = now.format(FOOTER_TIMESTAMP_FORMAT).to_string();
    let input = DocumentInput {
        projects: &projects,
        institution: &state.context.institution,
        team: state.team.as_slice(),
        approval: &state.context.approval,
        summary: &summary,
        generated_at: &generated_at,
    };
    let document = build_document(&input);
    let layout = PdfLayout::for_orientation(state.orientation);
    pdf::render_pdf_guarded(&document, &layout, assets)
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Validate, render and write the document, tracking `render_status`.
pub fn export_pdf(state: &mut ApplicationState, output_path: &Path, assets: &PdfAssets, now: NaiveDateTime) -> Result<()> {
    let problems = validate_for_document(state);
    if !problems.is_empty() {
        return Err(ReportError::Validation(problems));
    }
    if !state.begin_render() {
        return Err(ReportError::RenderBusy);
    }

    let bar = spinner("Generating official PDF...");
    let outcome = render_document(state, assets, now)
        .and_then(|bytes| std::fs::write(output_path, bytes).map_err(ReportError::from));
    bar.finish_and_clear();

    state.finish_render(&outcome);
    if let Err(e) = &outcome {
        tracing::error!(error = %e, "PDF generation failed");
        tracing::debug!(backtrace = %std::backtrace::Backtrace::force_capture(), "PDF failure trace");
    }
    outcome
}

/// Run the requested exports; returns the written paths.
///
/// The spreadsheet is never gated on validation.
pub fn export_report(
    state: &mut ApplicationState,
    format: &ExportFormat,
    output: &Path,
    assets: &PdfAssets,
    now: NaiveDateTime,
) -> Result<Vec<PathBuf>> {
    let pdf_stem = pdf_file_stem(&state.context.institution.name, now);
    let excel_stem = excel_file_stem(now);
    let mut written = Vec::new();

    match format {
        ExportFormat::Pdf => {
            let output_path = output_path_for_format(output, &pdf_stem, "pdf");
            println!("- Generating PDF ({})...", state.orientation);
            export_pdf(state, &output_path, assets, now)?;
            println!("✔ PDF: {}", output_path.display());
            written.push(output_path);
        }
        ExportFormat::Excel => {
            let output_path = output_path_for_format(output, &excel_stem, "xlsx");
            println!("- Generating Excel...");
            excel::generate_excel(state, &output_path)?;
            println!("✔ Excel: {}", output_path.display());
            written.push(output_path);
        }
        ExportFormat::Both => {
            let (pdf_path, excel_path) = output_paths_for_both(output, &pdf_stem, &excel_stem);

            println!("- Generating Excel...");
            excel::generate_excel(state, &excel_path)?;
            println!("✔ Excel: {}", excel_path.display());
            written.push(excel_path);

            println!("- Generating PDF ({})...", state.orientation);
            export_pdf(state, &pdf_path, assets, now)?;
            println!("✔ PDF: {}", pdf_path.display());
            written.push(pdf_path);
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, 1)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    #[test]
    fn test_file_stems() {
        assert_eq!(excel_file_stem(now()), "TETFUND_Report_20240901_140509");
        assert_eq!(
            pdf_file_stem("Federal Polytechnic Bida", now()),
            "TETFUND_Report_Federal_Polytechnic_Bida_20240901_140509"
        );
    }

    #[test]
    fn test_output_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path_for_format(dir.path(), "report", "pdf");
        assert_eq!(path, dir.path().join("report.pdf"));

        let explicit = dir.path().join("custom.pdf");
        assert_eq!(output_path_for_format(&explicit, "report", "pdf"), explicit);

        let (pdf, xlsx) = output_paths_for_both(&explicit, "a", "b");
        assert_eq!(pdf, dir.path().join("custom.pdf"));
        assert_eq!(xlsx, dir.path().join("custom.xlsx"));

        let (pdf, xlsx) = output_paths_for_both(dir.path(), "a", "b");
        assert_eq!(pdf, dir.path().join("a.pdf"));
        assert_eq!(xlsx, dir.path().join("b.xlsx"));
    }

    #[test]
    fn test_export_pdf_refuses_invalid_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = ApplicationState::default();
        let path = dir.path().join("out.pdf");
        let err = export_pdf(&mut state, &path, &PdfAssets::default(), now()).unwrap_err();
        match err {
            ReportError::Validation(problems) => {
                assert_eq!(problems, vec!["Institution name is required", "Location is required"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!path.exists());
        assert!(!state.render_status.is_busy());
    }

    #[test]
    fn test_export_pdf_refuses_while_busy() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = ApplicationState::default();
        state.context.institution.name = "FCE Zaria".into();
        state.context.institution.location = "Zaria".into();
        assert!(state.begin_render());
        let err = export_pdf(&mut state, &dir.path().join("out.pdf"), &PdfAssets::default(), now()).unwrap_err();
        assert!(matches!(err, ReportError::RenderBusy));
    }
}
