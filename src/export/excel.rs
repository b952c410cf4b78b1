//! Excel generation (CLI)
//!
//! Workbook layout lives in `monitoring_report_common::export::excel_core`.

use crate::error::Result;
use monitoring_report_common::export::excel_core::generate_excel_buffer;
use monitoring_report_common::ApplicationState;
use std::path::Path;

/// Workbook bytes for the session: raw project rows plus the rider-aware summary
pub fn render_excel(state: &ApplicationState) -> Result<Vec<u8>> {
    let summary = state.summary();
    let bytes = generate_excel_buffer(state.projects.as_slice(), &state.context.institution, &summary)?;
    Ok(bytes)
}

pub fn generate_excel(state: &ApplicationState, output_path: &Path) -> Result<()> {
    let bytes = render_excel(state)?;
    std::fs::write(output_path, bytes)?;
    tracing::debug!(path = %output_path.display(), "workbook written");
    Ok(())
}
