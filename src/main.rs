use clap::Parser;
use tracing::{error, Level};

use petcare::{
    cli::{self, Cli, Commands},
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    handler::reminder,
    migration,
    provider::{DatabasePool, HTTP},
    server,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(Level::INFO)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Migrate) => cli::run_migrate().await,
        Some(Commands::SendReminders { dry_run }) => {
            cli::run_send_reminders(dry_run).await
        },
        Some(Commands::Serve) | None => serve().await,
    }
}

async fn serve() -> Result<(), Error> {
    let (config, database) = match init().await {
        Ok((config, database)) => (config, database),
        Err(e) => return Err(Error::ConfigurationError(e.to_string())),
    };

    let http = HTTP::new(config.clone())?;
    let state = State::new(config, database, http);
    let app_state = AppState::new(state);

    let (_, _) = tokio::try_join!(
        server::server_task(&app_state),
        reminder::reminder_task(app_state.clone()),
    )?;

    Ok(())
}

async fn init() -> Result<(Config, DatabasePool), Error> {
    set_configuration()?;
    let config = get_configuration()?;
    migration::run_migrations(&config.database_url).await?;
    let database = DatabasePool::new(&config).await?;
    Ok((config, database))
}
