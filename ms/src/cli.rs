//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::CreationMode;
use crate::i18n::Locale;

/// Maestro - conversational recipe and tasting-menu co-authoring
#[derive(Parser)]
#[command(
    name = "maestro",
    about = "Co-author signature dishes and tasting menus with a generative model",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive session (default)
    Chat {
        /// Creation mode to open directly (single, menu)
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<CreationMode>,

        /// Interface language (it, en); overrides the config file
        #[arg(short = 'L', long, value_parser = parse_locale)]
        locale: Option<Locale>,

        /// Number of courses for a menu; overrides the config file
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..=20))]
        courses: Option<u32>,
    },

    /// List creation modes
    Modes,

    /// Print the effective configuration
    ShowConfig,
}

fn parse_mode(s: &str) -> Result<CreationMode, String> {
    debug!(%s, "parse_mode: called");
    CreationMode::parse(s).ok_or_else(|| format!("Unknown mode: {}. Use: single, menu, analysis or calculator", s))
}

fn parse_locale(s: &str) -> Result<Locale, String> {
    debug!(%s, "parse_locale: called");
    Locale::from_code(s).ok_or_else(|| format!("Unknown locale: {}. Use: it or en", s))
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("maestro")
        .join("logs")
        .join("maestro.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let modes: Vec<String> = CreationMode::ALL
        .iter()
        .map(|m| {
            let icon = if m.is_generative() { "\u{2705}" } else { "\u{274C}" };
            format!("  {} {}", icon, m)
        })
        .collect();

    let mut help = String::new();
    help.push_str("Creation Modes:\n");
    help.push_str(&modes.join("\n"));
    help.push_str("\n\n");
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["maestro"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parse_chat_options() {
        let cli = Cli::parse_from(["maestro", "chat", "--mode", "menu", "--locale", "en-US", "-n", "7"]);
        match cli.command {
            Some(Command::Chat { mode, locale, courses }) => {
                assert_eq!(mode, Some(CreationMode::Menu));
                assert_eq!(locale, Some(Locale::En));
                assert_eq!(courses, Some(7));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["maestro", "chat", "--mode", "brunch"]).is_err());
    }

    #[test]
    fn test_cli_rejects_zero_courses() {
        assert!(Cli::try_parse_from(["maestro", "chat", "--courses", "0"]).is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["maestro", "modes", "--log-level", "debug", "-c", "/tmp/m.yml"]);
        assert!(matches!(cli.command, Some(Command::Modes)));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/m.yml")));
    }

    #[test]
    fn test_log_path_under_maestro() {
        let path = get_log_path();
        assert!(path.ends_with("maestro/logs/maestro.log"));
    }

    #[test]
    fn test_after_help_lists_modes() {
        let help = generate_after_help();
        assert!(help.contains("menu"));
        assert!(help.contains("Logs are written to"));
    }
}
