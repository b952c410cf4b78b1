//! Record model
//!
//! Shapes shared by the renderers and the draft snapshot:
//! - Project: one funded sub-project (derived `sequence`/`balance` are read-only)
//! - TeamMember: monitoring team participant
//! - ReportContext: institution metadata, admin-charges rider, approval record

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Default bank & administrative charges amount (₦)
pub const DEFAULT_ADMIN_CHARGES_AMOUNT: f64 = 215_013.00;

/// Name given to freshly added projects
pub const DEFAULT_PROJECT_NAME: &str = "New Project";

/// Recommendation given to freshly added projects
pub const DEFAULT_RECOMMENDATION: &str = "Pending Review";

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// ============================================
// Numeric coercion
// ============================================

/// Coerce an arbitrary JSON value to a finite number; anything else becomes 0.
pub fn coerce_number(value: &serde_json::Value) -> f64 {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => parse_number(s),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// Parse user text as a number; invalid input becomes 0.
pub fn parse_number(text: &str) -> f64 {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '₦' && *c != '%')
        .collect();
    match cleaned.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_number(&value))
}

fn lenient_sequence<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let n = coerce_number(&value);
    Ok(if n >= 1.0 { n as usize } else { 0 })
}

// ============================================
// Enumerations
// ============================================

/// Workmanship quality rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QualityRating {
    Excellent,
    #[default]
    Good,
    Average,
    Poor,
    /// Only used by the synthetic admin-charges row
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl QualityRating {
    pub const OPTIONS: &'static [QualityRating] = &[
        QualityRating::Excellent,
        QualityRating::Good,
        QualityRating::Average,
        QualityRating::Poor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityRating::Excellent => "Excellent",
            QualityRating::Good => "Good",
            QualityRating::Average => "Average",
            QualityRating::Poor => "Poor",
            QualityRating::NotApplicable => "N/A",
        }
    }
}

/// Compliance with the approved scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComplianceRating {
    #[default]
    Compliant,
    Partial,
    #[serde(rename = "Non-compliant")]
    NonCompliant,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl ComplianceRating {
    pub const OPTIONS: &'static [ComplianceRating] = &[
        ComplianceRating::Compliant,
        ComplianceRating::Partial,
        ComplianceRating::NonCompliant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceRating::Compliant => "Compliant",
            ComplianceRating::Partial => "Partial",
            ComplianceRating::NonCompliant => "Non-compliant",
            ComplianceRating::NotApplicable => "N/A",
        }
    }
}

/// Supporting document status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentStatus {
    Submitted,
    #[default]
    Pending,
    Incomplete,
}

impl DocumentStatus {
    pub const OPTIONS: &'static [DocumentStatus] = &[
        DocumentStatus::Submitted,
        DocumentStatus::Pending,
        DocumentStatus::Incomplete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Submitted => "Submitted",
            DocumentStatus::Pending => "Pending",
            DocumentStatus::Incomplete => "Incomplete",
        }
    }
}

/// DM&E approval decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    #[serde(rename = "Returned for Correction")]
    ReturnedForCorrection,
    Rejected,
}

impl ApprovalStatus {
    pub const OPTIONS: &'static [ApprovalStatus] = &[
        ApprovalStatus::Pending,
        ApprovalStatus::Approved,
        ApprovalStatus::ReturnedForCorrection,
        ApprovalStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "Pending",
            ApprovalStatus::Approved => "Approved",
            ApprovalStatus::ReturnedForCorrection => "Returned for Correction",
            ApprovalStatus::Rejected => "Rejected",
        }
    }
}

/// Case-insensitive lookup over an option list; separators ('-', '_', ' ') are ignored.
fn parse_option<T: Copy>(input: &str, options: &[T], label: fn(&T) -> &'static str, kind: &str) -> Result<T, Error> {
    let normalize = |s: &str| {
        s.chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase()
    };
    let wanted = normalize(input);
    options
        .iter()
        .find(|o| normalize(label(*o)) == wanted)
        .copied()
        .ok_or_else(|| {
            let allowed: Vec<&str> = options.iter().map(label).collect();
            Error::InvalidValue(format!("{} '{}' (allowed: {})", kind, input, allowed.join(", ")))
        })
}

impl FromStr for QualityRating {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option(s, Self::OPTIONS, Self::as_str, "quality")
    }
}

impl FromStr for ComplianceRating {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option(s, Self::OPTIONS, Self::as_str, "compliance")
    }
}

impl FromStr for DocumentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option(s, Self::OPTIONS, Self::as_str, "document status")
    }
}

impl FromStr for ApprovalStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option(s, Self::OPTIONS, Self::as_str, "approval status")
    }
}

impl fmt::Display for QualityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ComplianceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Project
// ============================================

/// One funded sub-project.
///
/// `sequence` and `balance` are derived and only written by
/// [`crate::records::recalc_projects`]. Serialized keys follow the persisted
/// draft format (`s_no`, `project`, `other_obs`, `docs`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(rename = "s_no", deserialize_with = "lenient_sequence")]
    pub(crate) sequence: usize,

    #[serde(rename = "project")]
    pub name: String,

    #[serde(deserialize_with = "lenient_f64")]
    pub approved_cost: f64,

    #[serde(deserialize_with = "lenient_f64")]
    pub contract_sum: f64,

    /// Percentage of the project's own contract sum paid out (0-100)
    #[serde(deserialize_with = "lenient_f64")]
    pub disbursed: f64,

    #[serde(deserialize_with = "lenient_f64")]
    pub(crate) balance: f64,

    pub quality: QualityRating,

    pub compliance: ComplianceRating,

    #[serde(rename = "other_obs")]
    pub observations: String,

    /// Physical completion (0-100)
    #[serde(deserialize_with = "lenient_f64")]
    pub completion: f64,

    #[serde(rename = "docs")]
    pub documents: DocumentStatus,

    pub recommendation: String,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            sequence: 1,
            name: DEFAULT_PROJECT_NAME.to_string(),
            approved_cost: 0.0,
            contract_sum: 0.0,
            disbursed: 0.0,
            balance: 100.0,
            quality: QualityRating::Good,
            compliance: ComplianceRating::Compliant,
            observations: String::new(),
            completion: 0.0,
            documents: DocumentStatus::Pending,
            recommendation: DEFAULT_RECOMMENDATION.to_string(),
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 1-based position in its list
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// `100 - disbursed`
    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn with_approved_cost(mut self, amount: f64) -> Self {
        self.approved_cost = amount;
        self
    }

    pub fn with_contract_sum(mut self, amount: f64) -> Self {
        self.contract_sum = amount;
        self
    }

    pub fn with_disbursed(mut self, percent: f64) -> Self {
        self.disbursed = percent;
        self.balance = 100.0 - percent;
        self
    }

    pub fn with_completion(mut self, percent: f64) -> Self {
        self.completion = percent;
        self
    }

    pub fn with_quality(mut self, quality: QualityRating) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_compliance(mut self, compliance: ComplianceRating) -> Self {
        self.compliance = compliance;
        self
    }

    pub fn with_documents(mut self, documents: DocumentStatus) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_observations(mut self, text: impl Into<String>) -> Self {
        self.observations = text.into();
        self
    }

    pub fn with_recommendation(mut self, text: impl Into<String>) -> Self {
        self.recommendation = text.into();
        self
    }

    /// Disbursed amount in currency (`disbursed`% of this project's contract sum)
    pub fn disbursed_amount(&self) -> f64 {
        self.disbursed / 100.0 * self.contract_sum
    }

    pub fn is_completed(&self) -> bool {
        self.completion >= 100.0
    }
}

// ============================================
// Team / context
// ============================================

/// Monitoring team participant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    pub name: String,
    pub designation: String,
}

impl TeamMember {
    pub fn new(name: impl Into<String>, designation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            designation: designation.into(),
        }
    }
}

/// Placeholder roster for a new session
pub fn default_team() -> Vec<TeamMember> {
    vec![
        TeamMember::new("Arch. A.A.", "Team Lead"),
        TeamMember::new("Engr. A.B.", "Monitor"),
        TeamMember::new("Mr. A.C.", "Engineer"),
    ]
}

/// Institution under inspection
#[derive(Debug, Clone, PartialEq)]
pub struct Institution {
    pub name: String,
    pub location: String,
    /// Free-form (e.g. "2019", "2020/2021")
    pub intervention_year: String,
    pub inspection_date: NaiveDate,
}

impl Default for Institution {
    fn default() -> Self {
        let today = today();
        Self {
            name: String::new(),
            location: String::new(),
            intervention_year: chrono::Datelike::year(&today).to_string(),
            inspection_date: today,
        }
    }
}

/// Bank & administrative charges rider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdminCharges {
    pub enabled: bool,
    pub amount: f64,
}

impl Default for AdminCharges {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: DEFAULT_ADMIN_CHARGES_AMOUNT,
        }
    }
}

impl AdminCharges {
    pub fn enabled(amount: f64) -> Self {
        Self { enabled: true, amount }
    }

    /// Amount contributed to the totals (0 when disabled)
    pub fn effective_amount(&self) -> f64 {
        if self.enabled { self.amount } else { 0.0 }
    }

    /// Synthetic, fully disbursed and complete row for the document export
    pub fn document_row(&self) -> Project {
        Project {
            sequence: 0,
            name: "Bank and Administrative Charges".to_string(),
            approved_cost: self.amount,
            contract_sum: self.amount,
            disbursed: 100.0,
            balance: 0.0,
            quality: QualityRating::NotApplicable,
            compliance: ComplianceRating::NotApplicable,
            observations: "Administrative charges".to_string(),
            completion: 100.0,
            documents: DocumentStatus::Submitted,
            recommendation: "Processed".to_string(),
        }
    }
}

/// DM&E approval record
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalRecord {
    pub status: ApprovalStatus,
    pub officer: String,
    pub date: NaiveDate,
    pub comments: String,
}

impl Default for ApprovalRecord {
    fn default() -> Self {
        Self {
            status: ApprovalStatus::Pending,
            officer: String::new(),
            date: today(),
            comments: String::new(),
        }
    }
}

/// Institution metadata + rider + approval
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportContext {
    pub institution: Institution,
    pub admin_charges: AdminCharges,
    pub approval: ApprovalRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_default() {
        let project = Project::default();
        assert_eq!(project.sequence(), 1);
        assert_eq!(project.name, "New Project");
        assert_eq!(project.balance(), 100.0);
        assert_eq!(project.quality, QualityRating::Good);
        assert_eq!(project.compliance, ComplianceRating::Compliant);
        assert_eq!(project.documents, DocumentStatus::Pending);
        assert_eq!(project.recommendation, "Pending Review");
    }

    #[test]
    fn test_project_serialize_keys() {
        let project = Project::new("Library").with_disbursed(40.0);
        let json = serde_json::to_string(&project).expect("serialize failed");
        assert!(json.contains("\"s_no\":1"));
        assert!(json.contains("\"project\":\"Library\""));
        assert!(json.contains("\"balance\":60.0"));
        assert!(json.contains("\"other_obs\":\"\""));
        assert!(json.contains("\"docs\":\"Pending\""));
    }

    #[test]
    fn test_project_deserialize_lenient_numbers() {
        let json = r#"{
            "s_no": 4,
            "project": "Hostel",
            "approved_cost": "1,500",
            "contract_sum": null,
            "disbursed": "abc",
            "completion": "75",
            "compliance": "Non-compliant"
        }"#;
        let project: Project = serde_json::from_str(json).expect("deserialize failed");
        assert_eq!(project.name, "Hostel");
        assert_eq!(project.approved_cost, 1500.0);
        assert_eq!(project.contract_sum, 0.0);
        assert_eq!(project.disbursed, 0.0);
        assert_eq!(project.completion, 75.0);
        assert_eq!(project.compliance, ComplianceRating::NonCompliant);
        assert_eq!(project.recommendation, "Pending Review");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42.5"), 42.5);
        assert_eq!(parse_number(" ₦1,234,567 "), 1_234_567.0);
        assert_eq!(parse_number("50%"), 50.0);
        assert_eq!(parse_number("n/a"), 0.0);
        assert_eq!(parse_number("NaN"), 0.0);
        assert_eq!(parse_number(""), 0.0);
    }

    #[test]
    fn test_enum_from_str() {
        assert_eq!("excellent".parse::<QualityRating>().unwrap(), QualityRating::Excellent);
        assert_eq!("non_compliant".parse::<ComplianceRating>().unwrap(), ComplianceRating::NonCompliant);
        assert_eq!(
            "returned for correction".parse::<ApprovalStatus>().unwrap(),
            ApprovalStatus::ReturnedForCorrection
        );
        let err = "great".parse::<QualityRating>().unwrap_err();
        assert!(format!("{}", err).contains("Excellent, Good, Average, Poor"));
        assert!("N/A".parse::<QualityRating>().is_err());
    }

    #[test]
    fn test_admin_charges_row() {
        let rider = AdminCharges::enabled(215_013.0);
        let row = rider.document_row();
        assert_eq!(row.approved_cost, 215_013.0);
        assert_eq!(row.contract_sum, 215_013.0);
        assert_eq!(row.disbursed, 100.0);
        assert_eq!(row.balance(), 0.0);
        assert_eq!(row.completion, 100.0);
        assert_eq!(row.quality.as_str(), "N/A");
        assert_eq!(row.compliance.as_str(), "N/A");
        assert_eq!(row.documents, DocumentStatus::Submitted);
        assert_eq!(row.recommendation, "Processed");
    }

    #[test]
    fn test_admin_charges_effective_amount() {
        let rider = AdminCharges::default();
        assert_eq!(rider.amount, DEFAULT_ADMIN_CHARGES_AMOUNT);
        assert_eq!(rider.effective_amount(), 0.0);
        assert_eq!(AdminCharges::enabled(10.0).effective_amount(), 10.0);
    }
}
