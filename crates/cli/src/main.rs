//! Customer Desk CLI - Database migrations and demo data.
//!
//! # Usage
//!
//! ```bash
//! # Apply the schema
//! desk-cli migrate
//!
//! # Insert demo customers, products, an account and an order
//! desk-cli seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Insert demo records

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "desk-cli")]
#[command(author, version, about = "Customer Desk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert demo records into a migrated database
    Seed {
        /// Number of demo customers to create
        #[arg(short, long, default_value_t = 3)]
        customers: u32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { customers } => commands::seed::run(customers).await?,
    }
    Ok(())
}
