//! Category CLI commands
//!
//! Categories flagged as shared are split between the two household members
//! in the monthly and yearly reports.

use clap::Subcommand;

use crate::display::{format_category_details, format_category_list};
use crate::error::{KakeiboError, KakeiboResult};
use crate::services::{CategoryService, CategoryUpdate};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Add a new category
    Add {
        /// Category name
        name: String,
        /// Display color (#RGB or #RRGGBB)
        #[arg(short, long)]
        color: Option<String>,
        /// Split this category's expenses between both members
        #[arg(short, long)]
        shared: bool,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New display color
        #[arg(short, long)]
        color: Option<String>,
        /// Mark the category shared (true) or personal (false)
        #[arg(short, long)]
        shared: Option<bool>,
    },

    /// Delete a category with no expenses
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> KakeiboResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list()?;
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Add {
            name,
            color,
            shared,
        } => {
            let category = service.create(&name, color.as_deref(), shared)?;
            println!("Created category: {}", category.name);
            if category.is_shared {
                println!("  Shared: yes");
            }
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let cat = service
                .find(&category)?
                .ok_or_else(|| KakeiboError::category_not_found(&category))?;
            let expense_count = storage.expenses.count_by_category(cat.id)?;
            print!("{}", format_category_details(&cat, expense_count));
        }

        CategoryCommands::Edit {
            category,
            name,
            color,
            shared,
        } => {
            let cat = service
                .find(&category)?
                .ok_or_else(|| KakeiboError::category_not_found(&category))?;

            if name.is_none() && color.is_none() && shared.is_none() {
                println!("No changes specified. Use --name, --color, or --shared.");
                return Ok(());
            }

            let updated = service.update(
                cat.id,
                CategoryUpdate {
                    name,
                    color,
                    is_shared: shared,
                },
            )?;
            println!("Updated category: {}", updated);
        }

        CategoryCommands::Delete { category } => {
            let cat = service
                .find(&category)?
                .ok_or_else(|| KakeiboError::category_not_found(&category))?;

            service.delete(cat.id)?;
            println!("Deleted category: {}", cat.name);
        }
    }

    Ok(())
}
