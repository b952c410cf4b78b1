//! monitoring-report
//!
//! Command-line front end for TETFund monitoring reports: draft persistence,
//! PDF/Excel export and project import on top of `monitoring_report_common`.

pub mod cli;
pub mod config;
pub mod draft;
pub mod error;
pub mod export;
pub mod import;
pub mod logo;
pub mod show;
