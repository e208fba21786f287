use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use practice_settings::{DomainError, PracticeSettingsConfig, SettingsStore, infra};
use practice_settings_sdk::{Settings, SettingsPatch, StoreState};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Practice settings - inspect and edit the stored practice configuration
#[derive(Parser)]
#[command(name = "settings-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current settings
    Show,
    /// Deep-merge a JSON patch into the settings
    Update {
        /// Partial settings document, e.g. '{"notifications":{"marketing":true}}'
        patch: String,
    },
    /// Restore defaults and erase the stored snapshot
    Reset,
    /// Print a resolved feature flag
    Feature {
        id: String,
        /// Value used when the flag has never been set
        #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
        default: bool,
    },
    /// Print the store lifecycle state
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref()
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    init_logging(cli.verbose, cli.json_logs);

    let config = PracticeSettingsConfig::load(cli.config.as_deref())?;
    if cli.print_config {
        print_config(&config)?;
        return Ok(());
    }

    let store = open_store(&config).await;
    let outcome = run_command(&store, cli.command.unwrap_or(Commands::Show)).await;
    store.dispose().await;
    outcome
}

/// Installs the fmt subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn print_config(config: &PracticeSettingsConfig) -> Result<()> {
    let yaml = serde_saphyr::to_string(config).context("failed to render configuration")?;
    println!("Effective configuration:\n{yaml}");
    Ok(())
}

async fn open_store(config: &PracticeSettingsConfig) -> Arc<SettingsStore> {
    let store = Arc::new(SettingsStore::new(
        infra::storage::from_config(&config.storage),
        config.store_config(),
    ));
    if let Err(warning) = store.init().await {
        tracing::warn!(%warning, "Using default settings");
    }
    store
}

async fn run_command(store: &SettingsStore, command: Commands) -> Result<()> {
    match command {
        Commands::Show => print_settings(&store.get_settings()),
        Commands::Update { patch } => update(store, &patch).await,
        Commands::Reset => {
            store.reset_settings().await;
            if let Some(error) = store.status().last_error {
                eprintln!("{error}");
            }
            print_settings(&store.get_settings())
        }
        Commands::Feature { id, default } => {
            println!("{}", store.get_settings().feature_enabled(&id, default));
            Ok(())
        }
        Commands::Status => {
            let status = store.status();
            let state = match status.state {
                StoreState::Uninitialized => "uninitialized",
                StoreState::Ready => "ready",
                StoreState::Error => "error",
            };
            println!("state: {state}");
            if let Some(error) = status.last_error {
                println!("last error: {error}");
            }
            Ok(())
        }
    }
}

async fn update(store: &SettingsStore, raw: &str) -> Result<()> {
    let patch: SettingsPatch = serde_json::from_str(raw).context("invalid settings patch")?;
    if patch.is_empty() {
        tracing::info!("Empty patch, nothing to change");
    }

    match store.update_settings(patch).await {
        Ok(settings) => print_settings(&settings),
        Err(DomainError::PersistenceWrite { applied, source }) => {
            eprintln!("Failed to update settings: {source:#}");
            print_settings(&applied)?;
            Err(source.context("settings were applied in memory only"))
        }
        Err(e) => Err(e.into()),
    }
}

fn print_settings(settings: &Settings) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_update_command() {
        let cli = Cli::try_parse_from([
            "settings-cli",
            "-vv",
            "update",
            r#"{"notifications":{"marketing":true}}"#,
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Update { .. })));
    }

    #[test]
    fn test_parses_feature_default() {
        let cli =
            Cli::try_parse_from(["settings-cli", "feature", "staff_training", "--default", "true"])
                .unwrap();
        let Some(Commands::Feature { id, default }) = cli.command else {
            panic!("expected feature command");
        };
        assert_eq!(id, "staff_training");
        assert!(default);
    }

    #[test]
    fn test_config_and_print_config_without_command() {
        let cli =
            Cli::try_parse_from(["settings-cli", "-c", "settings.yaml", "--print-config"]).unwrap();
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("settings.yaml"))
        );
        assert!(cli.print_config);
        assert!(cli.command.is_none());
    }
}
