use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kakeibo::api::{self, AppState};
use kakeibo::cli::{
    handle_card_command, handle_category_command, handle_expense_command, handle_report_command,
};
use kakeibo::config::{paths::KakeiboPaths, settings::Settings};
use kakeibo::storage::Storage;

#[derive(Parser)]
#[command(
    name = "kakeibo",
    version,
    about = "Household expense tracker with shared-expense reports",
    long_about = "Kakeibo records household expenses against payment cards and \
                  categories. Categories marked as shared are split evenly between \
                  two members in the monthly and yearly reports. Run it as a JSON \
                  API server or use it directly from the command line."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Interface to bind (overrides settings and KAKEIBO_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides settings and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Card management commands
    #[command(subcommand)]
    Card(kakeibo::cli::CardCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(kakeibo::cli::CategoryCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(kakeibo::cli::ExpenseCommands),

    /// Monthly and yearly reports
    #[command(subcommand)]
    Report(kakeibo::cli::ReportCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kakeibo=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    // Initialize paths and settings
    let paths = KakeiboPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    settings.apply_env_overrides()?;

    // Initialize storage
    let storage = Storage::open(paths.clone())?;

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            let address = settings.bind_address();
            let state = AppState::new(storage, &settings);
            api::serve(state, &settings, &address).await?;
        }
        Some(Commands::Card(cmd)) => {
            handle_card_command(&storage, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Audit { count }) => {
            let entries = storage.audit().read_recent(count)?;
            if entries.is_empty() {
                println!("No audit entries yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Config) => {
            println!("Kakeibo Configuration");
            println!("=====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Server address:  {}", settings.bind_address());
            if settings.server.allowed_origins.is_empty() {
                println!("  Allowed origins: any");
            } else {
                println!(
                    "  Allowed origins: {}",
                    settings.server.allowed_origins.join(", ")
                );
            }
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Page size:       {}", settings.page_size);
        }
        None => {
            println!("Kakeibo - household expense tracker");
            println!();
            println!("Run 'kakeibo --help' for usage information.");
            println!("Run 'kakeibo serve' to start the API server.");
        }
    }

    Ok(())
}
