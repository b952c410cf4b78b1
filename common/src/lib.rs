//! Monitoring Report Common Library
//!
//! Record model, aggregation, formatting and export cores shared by every
//! front end. No file or terminal I/O happens here.

pub mod types;
pub mod records;
pub mod summary;
pub mod format;
pub mod layout;
pub mod validation;
pub mod state;
pub mod snapshot;
pub mod error;
pub mod export;

pub use types::{
    AdminCharges, ApprovalRecord, ApprovalStatus, ComplianceRating, DocumentStatus, Institution,
    Project, QualityRating, ReportContext, TeamMember, DEFAULT_ADMIN_CHARGES_AMOUNT,
};
pub use records::{
    add_member, add_project, document_projects, recalc_projects, remove_last_member,
    remove_last_project, ProjectEdit, ProjectTable, TeamRoster,
};
pub use summary::Summary;
pub use layout::{Orientation, PdfLayout};
pub use state::{ApplicationState, RenderStatus};
pub use snapshot::Snapshot;
pub use validation::validate_for_document;
pub use error::{Error, Result};
