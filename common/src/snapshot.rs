//! Draft snapshot codec
//!
//! Flat, serializable copy of the whole session. Keys match the persisted
//! `autosave.json` format; every key is optional on decode so older drafts
//! still load.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::layout::Orientation;
use crate::records::{ProjectTable, TeamRoster};
use crate::state::ApplicationState;
use crate::types::{
    coerce_number, AdminCharges, ApprovalRecord, ApprovalStatus, Institution, Project,
    ReportContext, TeamMember, DEFAULT_ADMIN_CHARGES_AMOUNT,
};

/// Persisted date format (ISO)
pub const SNAPSHOT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Persisted timestamp format (ISO, microseconds)
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub institution_name: String,
    pub location: String,
    #[serde(deserialize_with = "text_or_number")]
    pub intervention_year: String,
    pub inspection_date: String,
    pub bank_charges_added: bool,
    #[serde(deserialize_with = "amount_or_default")]
    pub bank_charges_amount: f64,
    pub monitoring_team: Vec<TeamMember>,
    pub approval_status: ApprovalStatus,
    pub dme_officer: String,
    pub approval_comments: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_date: Option<String>,
    pub pdf_orientation: Orientation,
    pub saved_at: Option<String>,
}

impl Default for Snapshot {
    fn default() -> Self {
        let mut snapshot = encode_fields(&ApplicationState::default());
        snapshot.approval_date = None;
        snapshot
    }
}

fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("expected text, found {}", other))),
    }
}

fn amount_or_default<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(DEFAULT_ADMIN_CHARGES_AMOUNT);
    }
    Ok(coerce_number(&value).max(0.0))
}

fn encode_fields(state: &ApplicationState) -> Snapshot {
    let ctx = &state.context;
    Snapshot {
        projects: state.projects.as_slice().to_vec(),
        institution_name: ctx.institution.name.clone(),
        location: ctx.institution.location.clone(),
        intervention_year: ctx.institution.intervention_year.clone(),
        inspection_date: ctx.institution.inspection_date.format(SNAPSHOT_DATE_FORMAT).to_string(),
        bank_charges_added: ctx.admin_charges.enabled,
        bank_charges_amount: ctx.admin_charges.amount,
        monitoring_team: state.team.as_slice().to_vec(),
        approval_status: ctx.approval.status,
        dme_officer: ctx.approval.officer.clone(),
        approval_comments: ctx.approval.comments.clone(),
        approval_date: Some(ctx.approval.date.format(SNAPSHOT_DATE_FORMAT).to_string()),
        pdf_orientation: state.orientation,
        saved_at: None,
    }
}

/// Accepts `YYYY-MM-DD` or an ISO datetime starting with it.
fn parse_snapshot_date(field: &str, text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    let date_part = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(date_part, SNAPSHOT_DATE_FORMAT)
        .map_err(|e| Error::Snapshot(format!("{}: '{}' ({})", field, text, e)))
}

impl Snapshot {
    /// Copy `state`, stamped with the current local time.
    pub fn encode(state: &ApplicationState) -> Self {
        Self::encode_at(state, chrono::Local::now().naive_local())
    }

    pub fn encode_at(state: &ApplicationState, saved_at: NaiveDateTime) -> Self {
        let mut snapshot = encode_fields(state);
        snapshot.saved_at = Some(saved_at.format(SNAPSHOT_TIMESTAMP_FORMAT).to_string());
        snapshot
    }

    /// Rebuild a session. Derived project fields are recomputed.
    pub fn decode(self) -> Result<ApplicationState> {
        let inspection_date = parse_snapshot_date("inspection_date", &self.inspection_date)?;
        let approval_date = match self.approval_date.as_deref() {
            Some(text) if !text.trim().is_empty() => parse_snapshot_date("approval_date", text)?,
            _ => ApprovalRecord::default().date,
        };

        let context = ReportContext {
            institution: Institution {
                name: self.institution_name,
                location: self.location,
                intervention_year: self.intervention_year,
                inspection_date,
            },
            admin_charges: AdminCharges {
                enabled: self.bank_charges_added,
                amount: self.bank_charges_amount,
            },
            approval: ApprovalRecord {
                status: self.approval_status,
                officer: self.dme_officer,
                date: approval_date,
                comments: self.approval_comments,
            },
        };

        Ok(ApplicationState {
            projects: ProjectTable::new(self.projects),
            team: TeamRoster::new(self.monitoring_team),
            context,
            orientation: self.pdf_orientation,
            draft_saved_at: self.saved_at,
            render_status: Default::default(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse persisted text; anything that is not a snapshot object is an error.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Snapshot(e.to_string()))
    }
}

/// `from_json` + `decode`
pub fn decode_json(text: &str) -> Result<ApplicationState> {
    Snapshot::from_json(text)?.decode()
}
