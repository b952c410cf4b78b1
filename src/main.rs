use anyhow::Context;
use clap::Parser;
use dialoguer::{Confirm, Input};
use monitoring_report::{cli, config, draft, error, export, import, logo, show};
use monitoring_report_common::types::parse_number;
use monitoring_report_common::ProjectEdit;
use cli::{Cli, Commands, ProjectAction, TeamAction};
use config::Config;
use draft::DraftStore;
use error::ReportError;
use export::pdf::PdfAssets;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn pdf_assets(config: &Config) -> PdfAssets {
    let logo = logo::load_optional_logo(&config.logo_path());
    let font = config.font_path.as_deref().and_then(|path| {
        PdfAssets::load_font(path)
            .map_err(|e| tracing::warn!(error = %e, "font not loaded, using built-in Helvetica"))
            .ok()
    });
    PdfAssets { logo, font }
}

fn prompt_text(prompt: &str, current: &str) -> error::Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| ReportError::Config(e.to_string()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    let drafts_dir = cli.drafts_dir.clone().unwrap_or_else(|| config.drafts_dir());
    let store = DraftStore::new(drafts_dir);
    let mut state = store.load_or_default();

    let mutated = match cli.command {
        Commands::Show => {
            println!("📄 monitoring-report\n");
            print!("{}", show::render_session(&state));
            if let Some(saved_at) = &state.draft_saved_at {
                println!("\n💾 Draft saved at {}", saved_at);
            }
            false
        }

        Commands::Institution { name, location, year, date } => {
            let institution = &mut state.context.institution;
            if let Some(name) = name {
                institution.name = name;
            }
            if let Some(location) = location {
                institution.location = location;
            }
            if let Some(year) = year {
                institution.intervention_year = year;
            }
            if let Some(date) = date {
                institution.inspection_date = date;
            }
            println!("✔ Institution updated");
            true
        }

        Commands::Rider { enable, disable, amount } => {
            let rider = &mut state.context.admin_charges;
            if enable {
                rider.enabled = true;
            }
            if disable {
                rider.enabled = false;
            }
            if let Some(amount) = amount {
                rider.amount = parse_number(&amount).max(0.0);
            }
            println!(
                "✔ Bank & admin charges: {} ({})",
                if rider.enabled { "added" } else { "not added" },
                monitoring_report_common::format::format_currency(rider.amount)
            );
            true
        }

        Commands::Approval { status, officer, date, comments } => {
            let approval = &mut state.context.approval;
            if let Some(status) = status {
                approval.status = status;
            }
            if let Some(officer) = officer {
                approval.officer = officer;
            }
            if let Some(date) = date {
                approval.date = date;
            }
            if let Some(comments) = comments {
                approval.comments = comments;
            }
            println!("✔ Approval: {}", approval.status);
            true
        }

        Commands::Project { action } => {
            match action {
                ProjectAction::Add => {
                    state.projects.add();
                    println!("✔ Project {} added", state.projects.len());
                }
                ProjectAction::RemoveLast => {
                    state.projects.remove_last();
                    println!("✔ {} project(s) remaining", state.projects.len());
                }
                ProjectAction::Set { sequence, field, value } => {
                    let edit = ProjectEdit::parse(&field, &value)?;
                    state.projects.edit(sequence, &edit)?;
                    println!("✔ Project {} updated ({})", sequence, field);
                }
                ProjectAction::Import { input } => {
                    let projects = import::import_projects(&input)
                        .with_context(|| format!("❌ Import failed: {}", input.display()))?;
                    state.projects.replace(projects);
                    println!("✔ {} project(s) imported from {}", state.projects.len(), input.display());
                }
            }
            true
        }

        Commands::Team { action } => {
            match action {
                TeamAction::Add => {
                    state.team.add();
                    println!("✔ Team member {} added", state.team.len());
                }
                TeamAction::RemoveLast => {
                    state.team.remove_last();
                    println!("✔ {} team member(s) remaining", state.team.len());
                }
                TeamAction::Set { sequence, name, designation } => {
                    let (name, designation) = if name.is_none() && designation.is_none() {
                        let current = state
                            .team
                            .as_slice()
                            .get(sequence.saturating_sub(1))
                            .cloned()
                            .unwrap_or_default();
                        (
                            Some(prompt_text("Name", &current.name)?),
                            Some(prompt_text("Designation", &current.designation)?),
                        )
                    } else {
                        (name, designation)
                    };
                    state
                        .team
                        .edit(sequence, name.as_deref(), designation.as_deref())?;
                    println!("✔ Team member {} updated", sequence);
                }
            }
            true
        }

        Commands::Export { format, output, orientation } => {
            println!("📄 monitoring-report - export\n");
            if let Some(orientation) = orientation {
                state.orientation = orientation;
            }
            let output_dir = output.unwrap_or_else(|| config.output_dir());
            let assets = pdf_assets(&config);
            let now = chrono::Local::now().naive_local();

            let outcome = export::export_report(&mut state, &format, &output_dir, &assets, now);
            // Orientation preference is kept even when the render fails
            store.save(&state)?;
            outcome.context("❌ Export failed")?;

            println!("\n✅ Export complete");
            false
        }

        Commands::Reset { yes } => {
            let confirmed = yes
                || Confirm::new()
                    .with_prompt("Discard the current draft and start over?")
                    .default(false)
                    .interact()
                    .map_err(|e| ReportError::Config(e.to_string()))?;
            if confirmed {
                state.reset();
                let removed = store.clear()?;
                println!(
                    "✔ Session reset{}",
                    if removed { " (draft deleted)" } else { "" }
                );
            } else {
                println!("Reset cancelled");
            }
            false
        }

        Commands::Config { show, logo, font, set_drafts_dir } => {
            let mut changed = false;
            if let Some(logo) = logo {
                config.logo_path = Some(logo);
                changed = true;
            }
            if let Some(font) = font {
                config.font_path = Some(font);
                changed = true;
            }
            if let Some(dir) = set_drafts_dir {
                config.drafts_dir = Some(dir);
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ Settings saved: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("Settings:");
                println!("  Drafts directory: {}", config.drafts_dir().display());
                println!("  Logo: {}", config.logo_path().display());
                println!(
                    "  Font: {}",
                    config
                        .font_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "built-in Helvetica (₦ printed as NGN)".to_string())
                );
                println!("  Output directory: {}", config.output_dir().display());
            }
            false
        }
    };

    if mutated {
        let path = store.save(&state)?;
        tracing::debug!(path = %path.display(), "draft autosaved");
    }

    Ok(())
}
