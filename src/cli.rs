//! CLI module for the PetCare service
//!
//! Provides command-line interface for running migrations and one-off
//! reminder passes without starting the HTTP server.

use chrono::Local;
use clap::{Parser, Subcommand};

use crate::{
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    handler::reminder,
    migration,
    provider::{DatabasePool, HTTP},
};

/// PetCare push notification service
#[derive(Parser)]
#[command(name = "petcare")]
#[command(about = "PetCare API, web push and reminder service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server and reminder task (default if no command specified)
    Serve,

    /// Run database migrations
    Migrate,

    /// Run one vaccination reminder pass and exit
    SendReminders {
        /// Log what would be sent without pushing or recording anything
        #[arg(long)]
        dry_run: bool,
    },
}

/// Initialize configuration and return Config
pub fn init_config() -> Result<Config, Error> {
    set_configuration()?;
    get_configuration()
}

pub async fn run_migrate() -> Result<(), Error> {
    let config = init_config()?;

    tracing::info!("Running database migrations...");
    migration::run_migrations(&config.database_url).await?;
    tracing::info!("Migrations complete");

    Ok(())
}

/// Waits for every delivery so the process does not exit mid-send.
pub async fn run_send_reminders(dry_run: bool) -> Result<(), Error> {
    let config = init_config()?;
    migration::run_migrations(&config.database_url).await?;

    let database = DatabasePool::new(&config).await?;
    let http = HTTP::new(config.clone())?;
    let app_state = AppState::new(State::new(config, database, http));

    if dry_run {
        tracing::info!("DRY RUN MODE - no pushes will be sent");
    }

    let today = Local::now().date_naive();
    let report = reminder::dispatch(app_state, today, dry_run).await?;

    let total = report.deliveries.len();
    for delivery in report.deliveries {
        delivery.await?;
    }

    tracing::info!(
        "Reminders complete: {} record(s), {} delivery task(s)",
        report.reminded,
        total
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_defaults_to_serve() {
        let cli = Cli::try_parse_from(["petcare"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_send_reminders_dry_run_flag() {
        let cli =
            Cli::try_parse_from(["petcare", "send-reminders", "--dry-run"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::SendReminders { dry_run: true })
        ));
    }
}
