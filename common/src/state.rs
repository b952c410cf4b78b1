//! Session aggregate
//!
//! Single mutable source of truth for one editing session. Renderers and the
//! snapshot codec only ever see `&ApplicationState`.

use crate::layout::Orientation;
use crate::records::{ProjectTable, TeamRoster};
use crate::summary::Summary;
use crate::types::ReportContext;

/// Progress of the (expensive) document render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RenderStatus {
    #[default]
    Idle,
    InProgress,
    Done,
    Failed(String),
}

impl RenderStatus {
    pub fn is_busy(&self) -> bool {
        matches!(self, RenderStatus::InProgress)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationState {
    pub projects: ProjectTable,
    pub team: TeamRoster,
    pub context: ReportContext,
    /// Preferred orientation of the document export
    pub orientation: Orientation,
    /// Timestamp of the draft this state was restored from
    pub draft_saved_at: Option<String>,
    /// Not persisted
    pub render_status: RenderStatus,
}

impl ApplicationState {
    /// Summary of the current projects and rider
    pub fn summary(&self) -> Summary {
        Summary::compute(self.projects.as_slice(), &self.context.admin_charges)
    }

    /// Back to session defaults
    pub fn reset(&mut self) {
        *self = Self::default();
        tracing::info!("session reset to defaults");
    }

    /// Enter the in-progress state; false if a render is already running.
    pub fn begin_render(&mut self) -> bool {
        if self.render_status.is_busy() {
            return false;
        }
        self.render_status = RenderStatus::InProgress;
        true
    }

    pub fn finish_render<T, E: std::fmt::Display>(&mut self, outcome: &Result<T, E>) {
        self.render_status = match outcome {
            Ok(_) => RenderStatus::Done,
            Err(e) => RenderStatus::Failed(e.to_string()),
        };
    }
}
