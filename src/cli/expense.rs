//! Expense CLI commands

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_expense_details, format_expense_page};
use crate::error::{KakeiboError, KakeiboResult};
use crate::export::export_expenses_csv;
use crate::models::{parse_expense_date, Card, Category, Expense, Money};
use crate::services::{CardService, CategoryService, ExpenseFilter, ExpenseInput, ExpenseService};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// List expenses, newest first
    List {
        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only expenses paid with this card (name or ID)
        #[arg(long)]
        card: Option<String>,
        /// Only expenses in this category (name or ID)
        #[arg(long)]
        category: Option<String>,
        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Expenses per page (defaults to the configured page size)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Record an expense
    Add {
        /// Amount (e.g., "1500" or "1,234.50")
        amount: String,
        /// Card name or ID
        #[arg(long)]
        card: String,
        /// Category name or ID
        #[arg(long)]
        category: String,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Show expense details
    Show {
        /// Expense ID (full or short form)
        expense: String,
    },

    /// Edit an expense
    Edit {
        /// Expense ID (full or short form)
        expense: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New card name or ID
        #[arg(long)]
        card: Option<String>,
        /// New category name or ID
        #[arg(long)]
        category: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID (full or short form)
        expense: String,
    },

    /// Export expenses to CSV
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> KakeiboResult<()> {
    let service = ExpenseService::new(storage).with_page_size(settings.page_size);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::List {
            from,
            to,
            card,
            category,
            page,
            limit,
        } => {
            let mut filter = ExpenseFilter::new();
            filter.start_date = parse_optional_date(from.as_deref(), "from")?;
            filter.end_date = parse_optional_date(to.as_deref(), "to")?;
            if let Some(card) = card {
                filter = filter.card(find_card(storage, &card)?.id);
            }
            if let Some(category) = category {
                filter = filter.category(find_category(storage, &category)?.id);
            }
            filter.page = Some(page);
            filter.limit = limit;

            let page = service.list(&filter)?;
            print!("{}", format_expense_page(&page, symbol));
        }

        ExpenseCommands::Add {
            amount,
            card,
            category,
            date,
            description,
        } => {
            let date = match date {
                Some(d) => parse_expense_date(&d)?,
                None => Local::now().date_naive(),
            };
            let input = ExpenseInput {
                amount: parse_amount(&amount)?,
                date,
                description: description.unwrap_or_default(),
                card_id: find_card(storage, &card)?.id,
                category_id: find_category(storage, &category)?.id,
            };

            let view = service.create(input)?;
            println!(
                "Recorded {} on {} ({}, {})",
                view.expense.amount.format_with_symbol(symbol),
                view.expense.date,
                view.card.name,
                view.category.name
            );
            println!("  ID: {}", view.expense.id);
        }

        ExpenseCommands::Show { expense } => {
            let expense = find_expense(&service, &expense)?;
            let view = service.get_view(expense.id)?;
            print!("{}", format_expense_details(&view, symbol));
        }

        ExpenseCommands::Edit {
            expense,
            amount,
            card,
            category,
            date,
            description,
        } => {
            let existing = find_expense(&service, &expense)?;

            if amount.is_none()
                && card.is_none()
                && category.is_none()
                && date.is_none()
                && description.is_none()
            {
                println!(
                    "No changes specified. Use --amount, --card, --category, --date, or --description."
                );
                return Ok(());
            }

            let input = ExpenseInput {
                amount: match amount {
                    Some(a) => parse_amount(&a)?,
                    None => existing.amount,
                },
                date: match date {
                    Some(d) => parse_expense_date(&d)?,
                    None => existing.date,
                },
                description: description.unwrap_or(existing.description),
                card_id: match card {
                    Some(c) => find_card(storage, &c)?.id,
                    None => existing.card_id,
                },
                category_id: match category {
                    Some(c) => find_category(storage, &c)?.id,
                    None => existing.category_id,
                },
            };

            let view = service.update(existing.id, input)?;
            println!("Updated expense: {}", view.expense);
        }

        ExpenseCommands::Delete { expense } => {
            let existing = find_expense(&service, &expense)?;
            let deleted = service.delete(existing.id)?;
            println!("Deleted expense: {}", deleted);
        }

        ExpenseCommands::Export { output, from, to } => {
            let from = parse_optional_date(from.as_deref(), "from")?;
            let to = parse_optional_date(to.as_deref(), "to")?;

            let file = File::create(&output).map_err(|e| {
                KakeiboError::Export(format!("Failed to create file {}: {}", output.display(), e))
            })?;
            let count = export_expenses_csv(storage, from, to, BufWriter::new(file))?;
            println!("Exported {} expenses to: {}", count, output.display());
        }
    }

    Ok(())
}

fn parse_amount(raw: &str) -> KakeiboResult<Money> {
    Money::parse(raw).map_err(|e| KakeiboError::Validation(format!("Invalid amount: {}", e)))
}

fn parse_optional_date(raw: Option<&str>, flag: &str) -> KakeiboResult<Option<NaiveDate>> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            KakeiboError::Validation(format!("Invalid --{} date: {}. Use YYYY-MM-DD", flag, s))
        })
    })
    .transpose()
}

fn find_card(storage: &Storage, identifier: &str) -> KakeiboResult<Card> {
    CardService::new(storage)
        .find(identifier)?
        .ok_or_else(|| KakeiboError::card_not_found(identifier))
}

fn find_category(storage: &Storage, identifier: &str) -> KakeiboResult<Category> {
    CategoryService::new(storage)
        .find(identifier)?
        .ok_or_else(|| KakeiboError::category_not_found(identifier))
}

fn find_expense(service: &ExpenseService<'_>, identifier: &str) -> KakeiboResult<Expense> {
    service
        .find(identifier)?
        .ok_or_else(|| KakeiboError::expense_not_found(identifier))
}
