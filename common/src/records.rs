//! Project list / team roster operations
//!
//! Every structural or field edit of the project list ends with
//! [`recalc_projects`], which owns the derived fields (`sequence`, `balance`).

use crate::error::{Error, Result};
use crate::types::{
    parse_number, AdminCharges, ComplianceRating, DocumentStatus, Project, QualityRating,
    TeamMember,
};

/// Normalize derived fields: non-finite percentages become 0,
/// `balance = 100 - disbursed`, `sequence = 1..N` by position.
///
/// Idempotent.
pub fn recalc_projects(mut projects: Vec<Project>) -> Vec<Project> {
    for (idx, project) in projects.iter_mut().enumerate() {
        if !project.disbursed.is_finite() {
            project.disbursed = 0.0;
        }
        if !project.completion.is_finite() {
            project.completion = 0.0;
        }
        project.balance = 100.0 - project.disbursed;
        project.sequence = idx + 1;
    }
    projects
}

/// Append a default project numbered `len + 1`.
pub fn add_project(mut projects: Vec<Project>) -> Vec<Project> {
    let project = Project {
        sequence: projects.len() + 1,
        ..Default::default()
    };
    projects.push(project);
    projects
}

/// Drop the final project; no-op on an empty list.
pub fn remove_last_project(mut projects: Vec<Project>) -> Vec<Project> {
    projects.pop();
    projects
}

/// Append a blank team member.
pub fn add_member(mut team: Vec<TeamMember>) -> Vec<TeamMember> {
    team.push(TeamMember::default());
    team
}

/// Drop the final team member; no-op on an empty roster.
pub fn remove_last_member(mut team: Vec<TeamMember>) -> Vec<TeamMember> {
    team.pop();
    team
}

/// Project list as handed to the document renderer: the stored list plus,
/// when the rider is enabled, one synthetic admin-charges row.
pub fn document_projects(projects: &[Project], admin_charges: &AdminCharges) -> Vec<Project> {
    let mut rows = projects.to_vec();
    if admin_charges.enabled {
        rows.push(admin_charges.document_row());
    }
    recalc_projects(rows)
}

// ============================================
// Field edits
// ============================================

/// Edit of one non-derived project field.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectEdit {
    Name(String),
    ApprovedCost(f64),
    ContractSum(f64),
    Disbursed(f64),
    Quality(QualityRating),
    Compliance(ComplianceRating),
    Observations(String),
    Completion(f64),
    Documents(DocumentStatus),
    Recommendation(String),
}

/// Field keys accepted by [`ProjectEdit::parse`]
pub const EDITABLE_FIELDS: &[&str] = &[
    "project",
    "approved_cost",
    "contract_sum",
    "disbursed",
    "quality",
    "compliance",
    "other_obs",
    "completion",
    "docs",
    "recommendation",
];

impl ProjectEdit {
    /// Build an edit from a field key and user text.
    ///
    /// Numbers that fail to parse become 0. Enum values must match an option.
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        let edit = match field.trim().to_lowercase().replace('-', "_").as_str() {
            "project" | "name" => ProjectEdit::Name(value.to_string()),
            "approved_cost" | "approved" => ProjectEdit::ApprovedCost(parse_number(value)),
            "contract_sum" | "contract" => ProjectEdit::ContractSum(parse_number(value)),
            "disbursed" | "disb" => ProjectEdit::Disbursed(parse_number(value)),
            "quality" => ProjectEdit::Quality(value.parse()?),
            "compliance" | "compl" => ProjectEdit::Compliance(value.parse()?),
            "other_obs" | "observations" => ProjectEdit::Observations(value.to_string()),
            "completion" | "comp" => ProjectEdit::Completion(parse_number(value)),
            "docs" | "documents" => ProjectEdit::Documents(value.parse()?),
            "recommendation" => ProjectEdit::Recommendation(value.to_string()),
            "s_no" | "balance" => {
                return Err(Error::InvalidValue(format!(
                    "'{}' is derived and cannot be edited",
                    field
                )))
            }
            other => {
                return Err(Error::InvalidValue(format!(
                    "unknown field '{}' (editable: {})",
                    other,
                    EDITABLE_FIELDS.join(", ")
                )))
            }
        };
        Ok(edit)
    }

    /// Apply with the editor's column limits: percentages 0..=100, currency >= 0.
    pub fn apply(&self, project: &mut Project) {
        match self {
            ProjectEdit::Name(v) => project.name = v.clone(),
            ProjectEdit::ApprovedCost(v) => project.approved_cost = v.max(0.0),
            ProjectEdit::ContractSum(v) => project.contract_sum = v.max(0.0),
            ProjectEdit::Disbursed(v) => project.disbursed = v.clamp(0.0, 100.0),
            ProjectEdit::Quality(v) => project.quality = *v,
            ProjectEdit::Compliance(v) => project.compliance = *v,
            ProjectEdit::Observations(v) => project.observations = v.clone(),
            ProjectEdit::Completion(v) => project.completion = v.clamp(0.0, 100.0),
            ProjectEdit::Documents(v) => project.documents = *v,
            ProjectEdit::Recommendation(v) => project.recommendation = v.clone(),
        }
    }
}

// ============================================
// Owned tables
// ============================================

/// Project list whose derived fields can only change through recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTable {
    projects: Vec<Project>,
}

impl Default for ProjectTable {
    fn default() -> Self {
        Self::new(vec![Project::default()])
    }
}

impl ProjectTable {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects: recalc_projects(projects),
        }
    }

    pub fn empty() -> Self {
        Self { projects: Vec::new() }
    }

    pub fn as_slice(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn add(&mut self) {
        let projects = add_project(std::mem::take(&mut self.projects));
        self.projects = recalc_projects(projects);
        tracing::debug!(count = self.projects.len(), "project added");
    }

    pub fn remove_last(&mut self) {
        let projects = remove_last_project(std::mem::take(&mut self.projects));
        self.projects = recalc_projects(projects);
    }

    /// Edit the project at 1-based `sequence`.
    pub fn edit(&mut self, sequence: usize, edit: &ProjectEdit) -> Result<()> {
        let len = self.projects.len();
        let project = sequence
            .checked_sub(1)
            .and_then(|idx| self.projects.get_mut(idx))
            .ok_or_else(|| {
                Error::InvalidValue(format!("no project with S/N {} (have {})", sequence, len))
            })?;
        edit.apply(project);
        self.projects = recalc_projects(std::mem::take(&mut self.projects));
        Ok(())
    }

    /// Bulk replacement (e.g. an imported sheet).
    pub fn replace(&mut self, projects: Vec<Project>) {
        self.projects = recalc_projects(projects);
        tracing::debug!(count = self.projects.len(), "project list replaced");
    }
}

/// Team roster (no derived fields).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRoster {
    members: Vec<TeamMember>,
}

impl Default for TeamRoster {
    fn default() -> Self {
        Self::new(crate::types::default_team())
    }
}

impl TeamRoster {
    pub fn new(members: Vec<TeamMember>) -> Self {
        Self { members }
    }

    pub fn as_slice(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn add(&mut self) {
        self.members = add_member(std::mem::take(&mut self.members));
    }

    pub fn remove_last(&mut self) {
        self.members = remove_last_member(std::mem::take(&mut self.members));
    }

    /// Update the member at 1-based `sequence`; `None` leaves a field unchanged.
    pub fn edit(&mut self, sequence: usize, name: Option<&str>, designation: Option<&str>) -> Result<()> {
        let len = self.members.len();
        let member = sequence
            .checked_sub(1)
            .and_then(|idx| self.members.get_mut(idx))
            .ok_or_else(|| {
                Error::InvalidValue(format!("no team member with S/N {} (have {})", sequence, len))
            })?;
        if let Some(name) = name {
            member.name = name.to_string();
        }
        if let Some(designation) = designation {
            member.designation = designation.to_string();
        }
        Ok(())
    }
}
