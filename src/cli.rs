use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use monitoring_report_common::{ApprovalStatus, Orientation};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "monitoring-report")]
#[command(about = "TETFund second/final tranche monitoring report builder", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Drafts directory (overrides the config file)
    #[arg(long, global = true)]
    pub drafts_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the current session: metadata, projects, team and summary
    Show,

    /// Edit institution details
    Institution {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        location: Option<String>,

        /// Intervention year (free text, e.g. 2020/2021)
        #[arg(long)]
        year: Option<String>,

        /// Inspection date (YYYY-MM-DD or DD-Mon-YYYY)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Bank & administrative charges rider
    Rider {
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        #[arg(long)]
        disable: bool,

        /// Rider amount (₦)
        #[arg(long)]
        amount: Option<String>,
    },

    /// DM&E approval record
    Approval {
        /// Pending / Approved / Returned for Correction / Rejected
        #[arg(long)]
        status: Option<ApprovalStatus>,

        #[arg(long)]
        officer: Option<String>,

        /// Approval date (YYYY-MM-DD or DD-Mon-YYYY)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        #[arg(long)]
        comments: Option<String>,
    },

    /// Edit the project list
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Edit the monitoring team
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },

    /// Generate the PDF and/or Excel report
    Export {
        /// Output format (pdf/excel/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page orientation (saved as the preference)
        #[arg(long)]
        orientation: Option<Orientation>,
    },

    /// Discard the draft and start over
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show or edit settings
    Config {
        #[arg(long)]
        show: bool,

        /// Logo image for the PDF header
        #[arg(long)]
        logo: Option<PathBuf>,

        /// TrueType font for the PDF
        #[arg(long)]
        font: Option<PathBuf>,

        /// Default drafts directory
        #[arg(long)]
        set_drafts_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Append a default project
    Add,

    /// Remove the last project
    RemoveLast,

    /// Set one field of a project
    Set {
        /// Project S/N (1-based)
        sequence: usize,

        /// Field key (project, approved_cost, disbursed, quality, ...)
        field: String,

        value: String,
    },

    /// Replace the project list from an .xlsx or .json file
    Import {
        #[arg(required = true)]
        input: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum TeamAction {
    /// Append a blank member
    Add,

    /// Remove the last member
    RemoveLast,

    /// Edit a member
    Set {
        /// Member S/N (1-based)
        sequence: usize,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        designation: Option<String>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Excel,
    #[default]
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use pdf, excel, or both", s)),
        }
    }
}

/// `YYYY-MM-DD` or `DD-Mon-YYYY`
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d-%b-%Y"))
        .map_err(|_| format!("Invalid date: {}. Use YYYY-MM-DD or DD-Mon-YYYY", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        assert_eq!(parse_date("2024-09-01").unwrap(), expected);
        assert_eq!(parse_date("01-Sep-2024").unwrap(), expected);
        assert!(parse_date("September").is_err());
    }

    #[test]
    fn test_parse_project_set() {
        let cli = Cli::parse_from(["monitoring-report", "project", "set", "2", "disbursed", "45"]);
        match cli.command {
            Commands::Project { action: ProjectAction::Set { sequence, field, value } } => {
                assert_eq!(sequence, 2);
                assert_eq!(field, "disbursed");
                assert_eq!(value, "45");
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_parse_export_options() {
        let cli = Cli::parse_from([
            "monitoring-report", "--verbose", "export", "--format", "pdf", "--orientation", "portrait",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Export { format, orientation, output } => {
                assert_eq!(format, ExportFormat::Pdf);
                assert_eq!(orientation, Some(Orientation::Portrait));
                assert!(output.is_none());
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_parse_approval_status() {
        let cli = Cli::parse_from(["monitoring-report", "approval", "--status", "returned for correction"]);
        match cli.command {
            Commands::Approval { status, .. } => {
                assert_eq!(status, Some(ApprovalStatus::ReturnedForCorrection));
            }
            _ => panic!("wrong command"),
        }
    }
}
