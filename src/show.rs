//! Plain-text session overview for the `show` command

use monitoring_report_common::format::{
    format_currency, format_currency_whole, format_display_date, format_percent,
};
use monitoring_report_common::{validate_for_document, ApplicationState};
use std::fmt::Write;

pub fn render_session(state: &ApplicationState) -> String {
    let mut out = String::new();
    let context = &state.context;
    let institution = &context.institution;

    let _ = writeln!(out, "🏛  Institution");
    let _ = writeln!(out, "  Name: {}", institution.name);
    let _ = writeln!(out, "  Location: {}", institution.location);
    let _ = writeln!(out, "  Intervention year: {}", institution.intervention_year);
    let _ = writeln!(out, "  Inspection date: {}", format_display_date(institution.inspection_date));
    let _ = writeln!(out, "  PDF orientation: {}", state.orientation);

    let rider = &context.admin_charges;
    let _ = writeln!(
        out,
        "  Bank & admin charges: {}",
        if rider.enabled {
            format_currency(rider.amount)
        } else {
            "not added".to_string()
        }
    );

    let _ = writeln!(out, "\n📋 Projects ({})", state.projects.len());
    for p in state.projects.as_slice() {
        let _ = writeln!(
            out,
            "  {:>2}. {} | approved {} | contract {} | disb {} | bal {} | comp {} | {} / {} / docs {}",
            p.sequence(),
            p.name,
            format_currency_whole(p.approved_cost),
            format_currency_whole(p.contract_sum),
            format_percent(p.disbursed),
            format_percent(p.balance()),
            format_percent(p.completion),
            p.quality,
            p.compliance,
            p.documents,
        );
        if !p.observations.is_empty() {
            let _ = writeln!(out, "      obs: {}", p.observations);
        }
        let _ = writeln!(out, "      rec: {}", p.recommendation);
    }

    let _ = writeln!(out, "\n👥 Monitoring team ({})", state.team.len());
    for (idx, m) in state.team.as_slice().iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {} ({})", idx + 1, m.name, m.designation);
    }

    let approval = &context.approval;
    let _ = writeln!(out, "\n✍  Approval");
    let _ = writeln!(out, "  Status: {}", approval.status);
    let _ = writeln!(out, "  Officer: {}", approval.officer);
    let _ = writeln!(out, "  Date: {}", format_display_date(approval.date));
    let _ = writeln!(out, "  Comments: {}", approval.comments);

    let s = state.summary();
    let _ = writeln!(out, "\n📊 Summary");
    let _ = writeln!(out, "  Projects: {} (completed {}, in progress {})", s.total_projects, s.completed, s.in_progress);
    let _ = writeln!(out, "  Completion rate: {}", format_percent(s.completion_rate));
    let _ = writeln!(out, "  Total approved: {}", format_currency(s.total_approved));
    let _ = writeln!(out, "  Total contract: {}", format_currency(s.total_contract));
    let _ = writeln!(out, "  Total disbursed: {}", format_currency(s.total_disbursed));
    let _ = writeln!(out, "  Balance: {}", format_currency(s.balance));

    let problems = validate_for_document(state);
    if !problems.is_empty() {
        let _ = writeln!(out);
        for problem in problems {
            let _ = writeln!(out, "❌ {}", problem);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitoring_report_common::ProjectEdit;

    #[test]
    fn test_render_lists_validation_problems() {
        let state = ApplicationState::default();
        let text = render_session(&state);
        assert!(text.contains("❌ Institution name is required"));
        assert!(text.contains("❌ Location is required"));
        assert!(text.contains("Arch. A.A."));
    }

    #[test]
    fn test_render_formats_currency() {
        let mut state = ApplicationState::default();
        state.context.institution.name = "FCE Zaria".into();
        state.context.institution.location = "Zaria".into();
        state
            .projects
            .edit(1, &ProjectEdit::parse("approved_cost", "1234567").unwrap())
            .unwrap();
        let text = render_session(&state);
        assert!(text.contains("approved ₦1,234,567"));
        assert!(text.contains("Total approved: ₦1,234,567.00"));
        assert!(!text.contains('❌'));
    }
}
