use anyhow::Context;
use clap::{Parser, Subcommand};
use tomato_kernel::settings::Settings;

const REDACTED: &str = "<redacted>";

#[derive(Debug, Parser)]
#[command(name = "tomato", version, about = "Operator tooling for the Tomato backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Database commands
    Db {
        #[command(subcommand)]
        command: DbCommand,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Connect, ping, and exit non-zero on failure
    Check,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the effective settings as JSON
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load Tomato settings")?;

    tomato_telemetry::init(&settings.telemetry).ok();

    match cli.command {
        Command::Db {
            command: DbCommand::Check,
        } => db_check(&settings).await,
        Command::Config {
            command: ConfigCommand::Show,
        } => config_show(&settings),
    }
}

async fn db_check(settings: &Settings) -> anyhow::Result<()> {
    let db = tomato_app::bootstrap::connect_or_exit(&settings.database).await;
    let collections = db
        .collection_names()
        .await
        .with_context(|| "failed to list collections")?;

    println!(
        "ok: database '{}' reachable, {} collections",
        db.database().name(),
        collections.len()
    );

    db.shutdown().await;
    Ok(())
}

fn config_show(settings: &Settings) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(&redacted(settings))
        .with_context(|| "failed to render settings")?;
    println!("{rendered}");
    Ok(())
}

/// Copy of `settings` safe to print: the connection string may hold credentials.
fn redacted(settings: &Settings) -> Settings {
    let mut settings = settings.clone();
    if settings.database.uri.is_some() {
        settings.database.uri = Some(REDACTED.to_string());
    }
    settings
}
