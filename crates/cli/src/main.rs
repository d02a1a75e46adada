// maFile Manager CLI - ASF export and trim modes for Steam Desktop Authenticator files

mod asf;
mod exit_codes;
mod trim;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mafile_config::Settings;

use exit_codes::{EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use trim::TrimModeArg;

#[derive(Parser)]
#[command(name = "mafm")]
#[command(about = "Pair Steam maFiles with login:password lists and export them for ASF")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/mafile-manager/settings.json)
    #[arg(long, global = true, env = "MAFM_SETTINGS")]
    settings: Option<PathBuf>,

    /// Debug logging on stderr (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match maFiles against a roster and write <id>.maFile + <id>.json pairs
    #[command(after_help = "\
Examples:
  mafm asf --mafiles ./maFiles --roster accounts.txt
  mafm asf --mafiles a.maFile b.maFile --roster accounts.txt --output ./asf
  mafm asf --mafiles ./maFiles --roster accounts.txt --json -q > report.json")]
    Asf {
        /// maFiles or folders of maFiles
        #[arg(long, num_args = 1.., required = true)]
        mafiles: Vec<PathBuf>,

        /// login:password list (any of : ; , | space tab as delimiter)
        #[arg(long)]
        roster: PathBuf,

        /// Output folder (default: asf.outputDir from settings)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print the run report as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Suppress per-file progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Rewrite every maFile in a folder for a downstream panel
    #[command(after_help = "\
Examples:
  mafm trim ./maFiles --mode full
  mafm trim ./maFiles --mode fsm
  mafm trim ./maFiles --mode dm --output dm_export")]
    Trim {
        /// Folder containing .maFile files
        folder: PathBuf,

        #[arg(long, short = 'm', value_enum)]
        mode: TrimModeArg,

        /// Subfolder name (default: trim.*Dir from settings)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Print the trim report as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Suppress per-file progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// List the maFiles in a folder
    List {
        folder: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Settings file helpers
    #[command(subcommand)]
    Settings(SettingsCommands),
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print the settings file path
    Path,
    /// Write a commented default settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective settings as JSON
    Show,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  mafile-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    // already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings_path = cli.settings.clone().unwrap_or_else(Settings::config_path);

    let result = match cli.command {
        Commands::Asf { mafiles, roster, output, json, quiet } => {
            let settings = Settings::load_from(&settings_path);
            asf::cmd_asf(asf::AsfArgs { mafiles, roster, output, json, quiet }, &settings)
        }
        Commands::Trim { folder, mode, output, json, quiet } => {
            let settings = Settings::load_from(&settings_path);
            trim::cmd_trim(folder, mode, output, json, quiet, &settings)
        }
        Commands::List { folder, json } => trim::cmd_list(folder, json),
        Commands::Settings(cmd) => cmd_settings(cmd, settings_path),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn cmd_settings(cmd: SettingsCommands, path: PathBuf) -> Result<(), CliError> {
    match cmd {
        SettingsCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        SettingsCommands::Init { force } => {
            Settings::write_default_file(&path, force).map_err(|e| {
                CliError::io(e).with_hint("use --force to overwrite")
            })?;
            eprintln!("wrote {}", path.display());
            Ok(())
        }
        SettingsCommands::Show => {
            let settings = Settings::load_from(&path);
            let json = serde_json::to_string_pretty(&settings)
                .map_err(|e| CliError::error(format!("JSON serialization error: {e}")))?;
            println!("{json}");
            Ok(())
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
