//! Required-field checks gating the document export

use crate::state::ApplicationState;

/// Blocking reasons, in display order. Empty means the export may proceed.
pub fn validate_for_document(state: &ApplicationState) -> Vec<String> {
    let mut reasons = Vec::new();
    let institution = &state.context.institution;

    if institution.name.trim().is_empty() {
        reasons.push("Institution name is required".to_string());
    }
    if institution.location.trim().is_empty() {
        reasons.push("Location is required".to_string());
    }
    if state.projects.is_empty() {
        reasons.push("At least one project is required".to_string());
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ProjectTable;

    #[test]
    fn test_default_state_missing_institution() {
        let state = ApplicationState::default();
        assert_eq!(
            validate_for_document(&state),
            vec!["Institution name is required", "Location is required"]
        );
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let mut state = ApplicationState::default();
        state.context.institution.name = "   ".to_string();
        state.context.institution.location = "Kano".to_string();
        state.projects = ProjectTable::empty();
        assert_eq!(
            validate_for_document(&state),
            vec!["Institution name is required", "At least one project is required"]
        );
    }

    #[test]
    fn test_valid_state() {
        let mut state = ApplicationState::default();
        state.context.institution.name = "Federal University".to_string();
        state.context.institution.location = "Lokoja".to_string();
        assert!(validate_for_document(&state).is_empty());
    }
}
