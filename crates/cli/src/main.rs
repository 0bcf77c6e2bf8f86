//! Salesbook CLI - Database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sb-cli migrate
//!
//! # Create an account (password read from SALES_ACCOUNT_PASSWORD or stdin)
//! sb-cli account create -u alice
//!
//! # Delete an account and its profile (its customers are kept, unowned)
//! sb-cli account delete -u alice
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `account create` - Create a sales account
//! - `account delete` - Delete a sales account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sb-cli")]
#[command(author, version, about = "Salesbook CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage sales accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create a new account with an empty profile
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,
    },
    /// Delete an account and its profile; customers are kept without an owner
    Delete {
        /// Login name
        #[arg(short, long)]
        username: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Account { action } => match action {
            AccountAction::Create { username } => {
                commands::account::create(&username).await?;
            }
            AccountAction::Delete { username } => {
                commands::account::delete(&username).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_account_delete_help_keeps_customers() {
        let mut cli = Cli::command();
        let account = cli.find_subcommand_mut("account").unwrap();
        let delete = account.find_subcommand_mut("delete").unwrap();
        let about = delete.get_about().unwrap().to_string();
        assert!(about.contains("customers are kept"), "{about}");
    }

    #[test]
    fn test_account_delete_parses_username() {
        let cli = Cli::try_parse_from(["sb-cli", "account", "delete", "-u", "alice"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Account {
                action: AccountAction::Delete { username }
            } if username == "alice"
        ));
    }
}
