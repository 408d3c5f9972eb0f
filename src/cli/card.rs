//! Card CLI commands

use clap::Subcommand;

use crate::display::{format_card_details, format_card_list};
use crate::error::{KakeiboError, KakeiboResult};
use crate::services::{CardService, CardUpdate};
use crate::storage::Storage;

/// Card subcommands
#[derive(Subcommand, Debug)]
pub enum CardCommands {
    /// List all cards
    List,

    /// Add a new card
    Add {
        /// Card name
        name: String,
        /// Display color (#RGB or #RRGGBB)
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Show card details
    Show {
        /// Card name or ID
        card: String,
    },

    /// Edit a card
    Edit {
        /// Card name or ID
        card: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New display color
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Delete a card with no expenses
    Delete {
        /// Card name or ID
        card: String,
    },
}

/// Handle a card command
pub fn handle_card_command(storage: &Storage, cmd: CardCommands) -> KakeiboResult<()> {
    let service = CardService::new(storage);

    match cmd {
        CardCommands::List => {
            let cards = service.list()?;
            print!("{}", format_card_list(&cards));
        }

        CardCommands::Add { name, color } => {
            let card = service.create(&name, color.as_deref())?;
            println!("Created card: {}", card.name);
            println!("  Color: {}", card.color);
            println!("  ID: {}", card.id);
        }

        CardCommands::Show { card } => {
            let card = service
                .find(&card)?
                .ok_or_else(|| KakeiboError::card_not_found(&card))?;
            let expense_count = storage.expenses.count_by_card(card.id)?;
            print!("{}", format_card_details(&card, expense_count));
        }

        CardCommands::Edit { card, name, color } => {
            let existing = service
                .find(&card)?
                .ok_or_else(|| KakeiboError::card_not_found(&card))?;

            if name.is_none() && color.is_none() {
                println!("No changes specified. Use --name or --color.");
                return Ok(());
            }

            let updated = service.update(existing.id, CardUpdate { name, color })?;
            println!("Updated card: {}", updated.name);
        }

        CardCommands::Delete { card } => {
            let existing = service
                .find(&card)?
                .ok_or_else(|| KakeiboError::card_not_found(&card))?;

            service.delete(existing.id)?;
            println!("Deleted card: {}", existing.name);
        }
    }

    Ok(())
}
