// partview-settings - inspect and edit partview settings from the shell

mod exit_codes;
mod settings_ops;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_INVALID_VALUE, EXIT_STORE, EXIT_SUCCESS, EXIT_UNKNOWN_KEY, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "partview-settings")]
#[command(about = "Inspect and edit partview settings")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Settings file (.json or .toml). Defaults to the user config directory.
    #[arg(long, global = true, env = "PARTVIEW_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the settings file path
    Path,

    /// List settings with their current value
    #[command(after_help = "\
Examples:
  partview-settings show
  partview-settings show --all --json")]
    Show {
        /// Include settings hidden from the settings editor
        #[arg(long)]
        all: bool,

        /// Print a JSON object instead of `key = value` lines
        #[arg(long)]
        json: bool,
    },

    /// Print the value of one setting
    Get {
        /// Setting key, e.g. meshing/quality
        key: String,
    },

    /// Change one setting and save
    #[command(after_help = "\
Examples:
  partview-settings set meshing/quality Precise
  partview-settings set meshing/chordalDeflection 0.05
  partview-settings set graphics/defaultShapeColor 0.8,0.2,0.2")]
    Set {
        /// Setting key, e.g. meshing/quality
        key: String,
        /// New value. Enumerations accept item names or values.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Restore defaults of a group (or of every setting) and save
    Reset {
        /// Group path, e.g. meshing
        group: Option<String>,
    },

    /// List file formats and their parameter groups
    Formats,
}

fn long_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_HASH"), ")")
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self { code: EXIT_STORE, message: msg.into(), hint: None }
    }

    pub fn unknown_key(key: &str) -> Self {
        Self {
            code: EXIT_UNKNOWN_KEY,
            message: format!("unknown setting '{}'", key),
            hint: Some("run `partview-settings show --all` to list keys".to_string()),
        }
    }

    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INVALID_VALUE, message: msg.into(), hint: None }
    }

    pub fn partial(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let path = cli
        .settings
        .unwrap_or_else(partview_config::FileStore::default_path);

    let result = match cli.command {
        None => {
            eprintln!("Usage: partview-settings <command> [options]");
            eprintln!("       partview-settings --help for more information");
            return ExitCode::from(EXIT_USAGE);
        }
        Some(Commands::Path) => {
            println!("{}", path.display());
            Ok(())
        }
        Some(Commands::Show { all, json }) => settings_ops::cmd_show(&path, all, json),
        Some(Commands::Get { key }) => settings_ops::cmd_get(&path, &key),
        Some(Commands::Set { key, value }) => settings_ops::cmd_set(&path, &key, &value),
        Some(Commands::Reset { group }) => settings_ops::cmd_reset(&path, group.as_deref()),
        Some(Commands::Formats) => settings_ops::cmd_formats(&path),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(e.code)
        }
    }
}
