//! Polla operator CLI
//!
//! Each invocation loads the session from the data directory, applies one command and
//! flushes pending writes before exiting.

use chrono::Local;
use clap::{Parser, Subcommand};
use polla::{
    config::generate_sample_config,
    lottery::pot::{coerce_amount, parse_day, today},
    lottery::TicketId,
    report::{csv_file_name, render_csv, render_pot, render_summary, render_table},
    storage::KvStorage,
    ConfigLoader, GameVariant, LotterySession, Notice, RocksStore, SessionOptions, Stores,
};
use std::{path::PathBuf, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Polla and Micro ticket manager
#[derive(Parser)]
#[command(name = "polla")]
#[command(about = "Ticket matching and prize allocation for Polla and Micro draws")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory, overrides the configuration
    #[arg(short, long, global = true)]
    data_dir: Option<String>,

    /// Game variant to operate on
    #[arg(short, long, global = true, default_value = "polla")]
    game: GameVariant,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a ticket
    Add {
        name: String,

        /// Numbers, up to 6 for polla or 3 for micro
        #[arg(required = true)]
        numbers: Vec<String>,

        /// Free ticket: wins normally but pays no fee
        #[arg(long)]
        free: bool,
    },

    /// Edit an existing ticket
    Edit {
        id: TicketId,

        #[arg(long)]
        name: Option<String>,

        /// Replacement numbers, comma separated
        #[arg(long, value_delimiter = ',')]
        numbers: Option<Vec<String>>,

        #[arg(long)]
        free: Option<bool>,
    },

    /// Clear a ticket row
    Delete { id: TicketId },

    /// Clear the last ticket row holding data
    DeleteLast,

    /// Remove every ticket of the game
    ResetPlays,

    /// Import tickets from pasted spreadsheet rows
    Import { file: PathBuf },

    /// Set the winning numbers, replacing any previous draw
    Draw {
        #[arg(required = true)]
        numbers: Vec<String>,
    },

    /// Remove the winning numbers
    ClearDraw,

    /// Pot values
    #[command(subcommand)]
    Pot(PotCommand),

    /// Show ranked results
    Results {
        /// Filter by player name
        #[arg(short, long)]
        search: Option<String>,

        /// Export the shown rows as CSV to a file or directory
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Write a sample configuration file
    InitConfig { path: PathBuf },
}

#[derive(Subcommand)]
enum PotCommand {
    /// Set the contribution of one weekday (lunes..domingo or mon..sun)
    SetDay {
        day: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    SetAccumulated {
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    SetGuaranteed {
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    SetPrice {
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Zero the seven daily contributions
    ClearWeek,
    Show,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::InitConfig { path } => {
            generate_sample_config(&path.to_string_lossy())?;
            println!("✅ Sample configuration written to {}", path.display());
            return Ok(());
        }
        command => command,
    };

    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_path(path),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load()?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .init();

    std::fs::create_dir_all(&config.storage.data_dir)?;
    let storage = KvStorage::open_with(&config.storage.data_dir, config.storage.clear_on_start)?;
    info!("📦 Opened data directory {}", config.storage.data_dir);

    let stores = Stores::shared(Arc::new(RocksStore::new(storage)));
    let loaded = LotterySession::load(stores, SessionOptions::from_config(&config)).await;
    print_notices(&loaded.notices);
    let mut session = loaded.value;

    let notices = run(&mut session, cli.game, command).await?;
    print_notices(&notices);
    print_notices(&session.flush().await.notices);

    Ok(())
}

async fn run(
    session: &mut LotterySession,
    variant: GameVariant,
    command: Commands,
) -> Result<Vec<Notice>, Box<dyn std::error::Error>> {
    let notices = match command {
        Commands::Add { name, numbers, free } => {
            let outcome = session.add_ticket(variant, &name, &numbers, free).await?;
            println!("✅ {} ticket #{} added for {}", variant.title(), outcome.value, name);
            outcome.notices
        }
        Commands::Edit { id, name, numbers, free } => {
            let outcome = session
                .edit_ticket(variant, id, name.as_deref(), numbers.as_deref(), free)
                .await?;
            println!("✅ {} ticket #{} updated", variant.title(), id);
            outcome.notices
        }
        Commands::Delete { id } => {
            let outcome = session.delete_ticket(variant, id).await?;
            println!("🗑️  {} ticket #{} cleared", variant.title(), id);
            outcome.notices
        }
        Commands::DeleteLast => {
            let outcome = session.delete_last(variant).await;
            match outcome.value {
                Some(id) => println!("🗑️  {} ticket #{} cleared", variant.title(), id),
                None => println!("Nothing to delete"),
            }
            outcome.notices
        }
        Commands::ResetPlays => {
            let outcome = session.reset_plays(variant).await;
            println!("🗑️  {} {} tickets removed", outcome.value, variant.title());
            outcome.notices
        }
        Commands::Import { file } => {
            let text = std::fs::read_to_string(&file)?;
            let outcome = session.import_paste(variant, &text).await;
            println!("✅ {} tickets imported", outcome.value.added.len());
            for (line, error) in &outcome.value.rejected {
                println!("❌ line {}: {}", line, error);
            }
            outcome.notices
        }
        Commands::Draw { numbers } => {
            let outcome = session.replace_winning(variant, &numbers).await?;
            let drawn: Vec<&str> = session.winning(variant).numbers().map(|n| n.as_str()).collect();
            println!("🎯 {} winning numbers: {}", variant.title(), drawn.join(" "));
            outcome.notices
        }
        Commands::ClearDraw => {
            let outcome = session.clear_winning(variant).await;
            println!("🎯 {} winning numbers cleared", variant.title());
            outcome.notices
        }
        Commands::Pot(pot_command) => run_pot(session, variant, pot_command)?,
        Commands::Results { search, csv } => {
            let set = session.results(variant);
            let rows = set.search(search.as_deref().unwrap_or(""));
            print!("{}", render_summary(&set.summary));
            println!();
            print!("{}", render_table(&rows));

            if let Some(path) = csv {
                let path = if path.is_dir() {
                    path.join(csv_file_name(variant, Local::now().date_naive()))
                } else {
                    path
                };
                std::fs::write(&path, render_csv(&rows, &set.summary))?;
                println!("📄 Exported {} rows to {}", rows.len(), path.display());
            }
            Vec::new()
        }
        // handled before the session is opened
        Commands::InitConfig { .. } => Vec::new(),
    };
    Ok(notices)
}

fn run_pot(
    session: &mut LotterySession,
    variant: GameVariant,
    command: PotCommand,
) -> Result<Vec<Notice>, Box<dyn std::error::Error>> {
    let outcome = match command {
        PotCommand::SetDay { day, amount } => {
            session.set_daily(variant, parse_day(&day)?, coerce_amount(&amount))
        }
        PotCommand::SetAccumulated { amount } => session.set_accumulated(variant, coerce_amount(&amount)),
        PotCommand::SetGuaranteed { amount } => session.set_guaranteed(variant, coerce_amount(&amount)),
        PotCommand::SetPrice { amount } => session.set_ticket_price(variant, coerce_amount(&amount)),
        PotCommand::ClearWeek => session.clear_weekly_pot(variant),
        PotCommand::Show => {
            print!("{}", render_pot(variant, session.pot(variant), today()));
            return Ok(Vec::new());
        }
    };
    print!("{}", render_pot(variant, session.pot(variant), today()));
    Ok(outcome.notices)
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        println!("⚠️  {}", notice);
    }
}
