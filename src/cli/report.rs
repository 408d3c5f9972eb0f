//! CLI commands for reports
//!
//! Monthly and yearly spending reports, printed to the terminal or exported
//! to CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{KakeiboError, KakeiboResult};
use crate::reports::{MonthlyReport, ReportFilter, YearlyReport};
use crate::services::CardService;
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Spending for one month, by category and by card
    Monthly {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        /// Restrict to one card (name or ID)
        #[arg(short, long)]
        card: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Spending for a whole year, with a month-by-month breakdown
    Yearly {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Restrict to one card (name or ID)
        #[arg(short, long)]
        card: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> KakeiboResult<()> {
    let today = Local::now().date_naive();

    match cmd {
        ReportCommands::Monthly {
            year,
            month,
            card,
            output,
        } => {
            let filter = build_filter(
                storage,
                year.unwrap_or(today.year()),
                Some(month.unwrap_or(today.month())),
                card,
            )?;
            let report = MonthlyReport::generate(storage, &filter)?;

            match output {
                Some(path) => {
                    report.export_csv(&mut create_output(&path)?)?;
                    println!("Monthly report exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal(&settings.currency_symbol)),
            }
        }

        ReportCommands::Yearly { year, card, output } => {
            let filter = build_filter(storage, year.unwrap_or(today.year()), None, card)?;
            let report = YearlyReport::generate(storage, &filter)?;

            match output {
                Some(path) => {
                    report.export_csv(&mut create_output(&path)?)?;
                    println!("Yearly report exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal(&settings.currency_symbol)),
            }
        }
    }

    Ok(())
}

fn build_filter(
    storage: &Storage,
    year: i32,
    month: Option<u32>,
    card: Option<String>,
) -> KakeiboResult<ReportFilter> {
    if !(2000..=2100).contains(&year) {
        return Err(KakeiboError::Validation(format!(
            "Year must be between 2000 and 2100, got {}",
            year
        )));
    }
    if let Some(month) = month.filter(|m| !(1..=12).contains(m)) {
        return Err(KakeiboError::Validation(format!(
            "Month must be between 1 and 12, got {}",
            month
        )));
    }

    let mut filter = match month {
        Some(month) => ReportFilter::month(year, month),
        None => ReportFilter::year(year),
    };
    if let Some(card) = card {
        let card = CardService::new(storage)
            .find(&card)?
            .ok_or_else(|| KakeiboError::card_not_found(&card))?;
        filter = filter.for_card(card.id);
    }
    Ok(filter)
}

fn create_output(path: &Path) -> KakeiboResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        KakeiboError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
