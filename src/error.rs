use thiserror::Error;

fn bullet_list(reasons: &[String]) -> String {
    reasons
        .iter()
        .map(|r| format!("\n  - {}", r))
        .collect::<String>()
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Required fields missing; export refused until resolved
    #[error("Fix validation errors before generating the PDF:{}", bullet_list(.0))]
    Validation(Vec<String>),

    #[error("A PDF render is already in progress")]
    RenderBusy,

    #[error("Logo load error: {0}")]
    LogoLoad(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF generation error: {0}")]
    PdfGeneration(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error(transparent)]
    Common(#[from] monitoring_report_common::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workbook_error_keeps_message() {
        let error: ReportError = monitoring_report_common::Error::Excel("save error: disk full".into()).into();
        assert!(matches!(error, ReportError::Common(monitoring_report_common::Error::Excel(_))));
        assert_eq!(error.to_string(), "Excel error: save error: disk full");
    }

    #[test]
    fn test_validation_lists_every_reason() {
        let error = ReportError::Validation(vec!["Institution name is required".into(), "Location is required".into()]);
        assert_eq!(
            error.to_string(),
            "Fix validation errors before generating the PDF:\n  - Institution name is required\n  - Location is required"
        );
    }
}
