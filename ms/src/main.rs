//! Maestro - recipe and tasting-menu co-authoring
//!
//! CLI entry point for the interactive session.

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result};
use tracing::{debug, info};

use maestro::app::App;
use maestro::cli::{Cli, Command, generate_after_help};
use maestro::config::Config;
use maestro::domain::CreationMode;
use maestro::i18n::Locale;
use maestro::repl::ReplSession;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("maestro")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("maestro.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "Maestro loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Chat { mode, locale, courses }) => cmd_chat(config, mode, locale, courses).await,
        Some(Command::Modes) => cmd_modes(),
        Some(Command::ShowConfig) => cmd_show_config(&config),
        None => cmd_chat(config, None, None, None).await,
    }
}

/// Run the interactive session
async fn cmd_chat(
    mut config: Config,
    mode: Option<CreationMode>,
    locale: Option<Locale>,
    courses: Option<u32>,
) -> Result<()> {
    debug!(?mode, ?locale, ?courses, "cmd_chat: called");
    if let Some(locale) = locale {
        config.locale = locale;
    }
    if let Some(courses) = courses {
        config.menu.default_courses = courses;
    }
    config.validate()?;

    let app = App::from_config(&config).context("Failed to initialize generation service")?;
    info!(locale = %config.locale, sor_cards = app.sor().len(), "Session starting");
    let mut session = ReplSession::new(app)?;
    session.run(mode).await
}

/// List creation modes
fn cmd_modes() -> Result<()> {
    debug!("cmd_modes: called");
    println!("Available modes:");
    for mode in CreationMode::ALL {
        let note = if mode.is_generative() { "" } else { " (not conversational)" };
        println!("  {}{}", mode, note);
    }
    Ok(())
}

/// Print the effective configuration as YAML
fn cmd_show_config(config: &Config) -> Result<()> {
    debug!("cmd_show_config: called");
    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    print!("{}", yaml);
    Ok(())
}
