//! `mafm trim` and `mafm list`: folder-level maFile rewrites.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use mafile_config::Settings;
use mafile_io::TrimMode;

use crate::exit_codes::EXIT_PARTIAL;
use crate::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TrimModeArg {
    /// Copy verbatim, renamed to <account_name>.maFile
    Full,
    /// shared_secret, account_name, Session.SteamID
    Fsm,
    /// shared_secret, Session.SteamID
    Dm,
}

impl From<TrimModeArg> for TrimMode {
    fn from(arg: TrimModeArg) -> Self {
        match arg {
            TrimModeArg::Full => TrimMode::Full,
            TrimModeArg::Fsm => TrimMode::Fsm,
            TrimModeArg::Dm => TrimMode::Dm,
        }
    }
}

fn list_or_usage(folder: &Path) -> Result<Vec<String>, CliError> {
    mafile_io::list_mafiles(folder).map_err(|e| {
        CliError::args(e).with_hint("pass the folder that holds your .maFile files")
    })
}

pub fn cmd_trim(
    folder: PathBuf,
    mode: TrimModeArg,
    output: Option<String>,
    json: bool,
    quiet: bool,
    settings: &Settings,
) -> Result<(), CliError> {
    let mode = TrimMode::from(mode);
    let files = list_or_usage(&folder)?;
    if files.is_empty() {
        return Err(CliError::args(format!("no maFiles in {}", folder.display())));
    }

    let output_name = output.unwrap_or_else(|| settings.trim_dir(mode).to_string());
    let report = mafile_io::trim_folder(&folder, &files, mode, &output_name, |pct, label| {
        if !quiet {
            eprintln!("[{pct:>3}%] {label}");
        }
    })
    .map_err(CliError::io)?;

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::error(format!("JSON serialization error: {e}")))?;
        println!("{out}");
    }

    eprintln!(
        "{mode}: {}/{} maFiles written to {}",
        report.processed,
        report.total,
        report.output_dir.display()
    );

    if report.skipped.is_empty() {
        return Ok(());
    }
    if !quiet {
        for skip in &report.skipped {
            eprintln!("  {}: {}", skip.filename, skip.reason);
        }
    }
    Err(CliError {
        code: EXIT_PARTIAL,
        message: format!("{} maFile(s) skipped", report.skipped.len()),
        hint: None,
    })
}

pub fn cmd_list(folder: PathBuf, json: bool) -> Result<(), CliError> {
    let files = list_or_usage(&folder)?;

    if json {
        let out = serde_json::json!({
            "folder": folder,
            "count": files.len(),
            "mafiles": files,
        });
        println!("{out}");
    } else {
        for name in &files {
            println!("{name}");
        }
    }
    eprintln!("{} maFile(s) in {}", files.len(), folder.display());
    Ok(())
}
