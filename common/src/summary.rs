//! Cross-project totals and rates

use serde::{Deserialize, Serialize};

use crate::types::{AdminCharges, Project};

/// Derived statistics; rebuilt from the project list on every render.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total_projects: usize,
    pub completed: usize,
    pub in_progress: usize,
    /// Percentage of projects at 100% completion (0 for an empty list)
    pub completion_rate: f64,
    pub total_approved: f64,
    pub total_contract: f64,
    pub total_disbursed: f64,
    /// `total_contract - total_disbursed`
    pub balance: f64,
}

impl Summary {
    /// Aggregate `projects`, adding the rider amount to approved, contract
    /// and disbursed totals when it is enabled.
    pub fn compute(projects: &[Project], admin_charges: &AdminCharges) -> Self {
        let total_projects = projects.len();
        let completed = projects.iter().filter(|p| p.is_completed()).count();
        let in_progress = total_projects - completed;
        let completion_rate = if total_projects > 0 {
            completed as f64 / total_projects as f64 * 100.0
        } else {
            0.0
        };

        let rider = admin_charges.effective_amount();
        let total_approved = projects.iter().map(|p| p.approved_cost).sum::<f64>() + rider;
        let total_contract = projects.iter().map(|p| p.contract_sum).sum::<f64>() + rider;
        let total_disbursed = projects.iter().map(Project::disbursed_amount).sum::<f64>() + rider;

        Self {
            total_projects,
            completed,
            in_progress,
            completion_rate,
            total_approved,
            total_contract,
            total_disbursed,
            balance: total_contract - total_disbursed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_projects() -> Vec<Project> {
        vec![
            Project::new("A")
                .with_approved_cost(1000.0)
                .with_contract_sum(1000.0)
                .with_disbursed(50.0)
                .with_completion(60.0),
            Project::new("B")
                .with_approved_cost(2000.0)
                .with_contract_sum(2000.0)
                .with_disbursed(100.0)
                .with_completion(100.0),
        ]
    }

    #[test]
    fn test_empty_list() {
        let summary = Summary::compute(&[], &AdminCharges::default());
        assert_eq!(summary.total_projects, 0);
        assert_eq!(summary.completion_rate, 0.0);
        assert_eq!(summary.balance, 0.0);
    }

    #[test]
    fn test_totals_without_rider() {
        let summary = Summary::compute(&two_projects(), &AdminCharges::default());
        assert_eq!(summary.total_projects, 2);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.completion_rate, 50.0);
        assert_eq!(summary.total_approved, 3000.0);
        assert_eq!(summary.total_contract, 3000.0);
        assert_eq!(summary.total_disbursed, 2500.0);
        assert_eq!(summary.balance, 500.0);
    }

    #[test]
    fn test_rider_adds_to_all_totals() {
        let projects = two_projects();
        let base = Summary::compute(&projects, &AdminCharges::default());
        let with = Summary::compute(&projects, &AdminCharges::enabled(215_013.00));
        assert_eq!(with.total_approved - base.total_approved, 215_013.00);
        assert_eq!(with.total_contract - base.total_contract, 215_013.00);
        assert_eq!(with.total_disbursed - base.total_disbursed, 215_013.00);
        assert!((with.balance - base.balance).abs() < 1e-6);
        assert_eq!(with.total_projects, base.total_projects);
        assert_eq!(with.completed, base.completed);
    }

    #[test]
    fn test_disbursed_is_per_project_contract() {
        let projects = vec![
            Project::new("A").with_contract_sum(400.0).with_disbursed(25.0),
            Project::new("B").with_contract_sum(100.0).with_disbursed(75.0),
        ];
        let summary = Summary::compute(&projects, &AdminCharges::default());
        // 100 + 75, not 50% of the 500 aggregate
        assert_eq!(summary.total_disbursed, 175.0);
        assert_eq!(summary.balance, 325.0);
    }
}
