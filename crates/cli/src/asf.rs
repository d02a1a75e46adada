//! `mafm asf`: pair maFiles with roster credentials and write ASF bundles.

use std::path::PathBuf;

use mafile_config::Settings;
use mafile_recon::{MaFileInput, ReconOptions, ReconRequest, RunEvent};

use crate::exit_codes::{recon_exit_code, EXIT_IO, EXIT_PARTIAL};
use crate::CliError;

pub struct AsfArgs {
    pub mafiles: Vec<PathBuf>,
    pub roster: PathBuf,
    pub output: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn cmd_asf(args: AsfArgs, settings: &Settings) -> Result<(), CliError> {
    let paths = mafile_io::expand_inputs(&args.mafiles).map_err(CliError::args)?;
    if paths.is_empty() {
        return Err(CliError::args("no maFiles to process")
            .with_hint("pass .maFile files or folders containing them with --mafiles"));
    }

    let roster = mafile_io::read_roster(&args.roster)
        .map_err(|e| CliError { code: EXIT_IO, message: e, hint: None })?;

    let options = ReconOptions {
        template: settings.asf_template(),
        output_dir: args
            .output
            .unwrap_or_else(|| PathBuf::from(&settings.asf_output_dir)),
    };
    let request = ReconRequest {
        mafiles: paths.into_iter().map(MaFileInput::from_path).collect(),
        roster,
        output_dir: None,
    };
    tracing::debug!(files = request.mafiles.len(), "starting reconciliation");

    let handle = mafile_recon::spawn(options, request);
    for event in handle.events() {
        if !args.quiet {
            print_event(&event);
        }
    }

    let report = handle.join().map_err(|e| {
        let code = recon_exit_code(&e);
        let err = CliError { code, message: e.to_string(), hint: None };
        match e {
            mafile_recon::ReconError::RosterEmpty => {
                err.with_hint("each line should look like login:password (also ; , | space or tab)")
            }
            _ => err,
        }
    })?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::error(format!("JSON serialization error: {e}")))?;
        println!("{json}");
    }

    eprintln!(
        "{}/{} maFiles exported to {} ({} auto-assigned)",
        report.success_count,
        report.total,
        report.output_dir.display(),
        report.auto_assigned(),
    );

    if report.failures.is_empty() {
        return Ok(());
    }
    if !args.quiet {
        for failure in &report.failures {
            eprintln!("  {}: {}", failure.filename, failure.reason);
        }
    }
    Err(CliError {
        code: EXIT_PARTIAL,
        message: format!("{} maFile(s) not exported", report.failures.len()),
        hint: None,
    })
}

fn print_event(event: &RunEvent) {
    match event {
        RunEvent::RosterLoaded { entries, encoding } => {
            eprintln!("roster: {entries} entries ({encoding})");
        }
        RunEvent::ReadFailed { filename, message } => {
            eprintln!("warning: {filename}: {message}");
        }
        RunEvent::Matched { filename, login, assignment } => {
            eprintln!("{filename} -> {login} [{assignment}]");
        }
        RunEvent::WriteFailed { filename, message } => {
            eprintln!("error: {filename}: {message}");
        }
        RunEvent::FallbackStarted { remaining, leftover } => {
            eprintln!("auto-assigning {remaining} unmatched maFile(s) from {leftover} leftover login(s)");
        }
        RunEvent::InsufficientLogins { filename } => {
            eprintln!("warning: {filename}: insufficient logins");
        }
        RunEvent::Progress { percent, label } => {
            eprintln!("[{percent:>3}%] {label}");
        }
        RunEvent::Cancelled { completed } => {
            eprintln!("cancelled after {completed} maFile(s)");
        }
        RunEvent::Finished { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::EXIT_USAGE;

    #[test]
    fn empty_input_folder_is_a_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let roster = dir.path().join("roster.txt");
        std::fs::write(&roster, "a:b\n").unwrap();

        let err = cmd_asf(
            AsfArgs {
                mafiles: vec![dir.path().to_path_buf()],
                roster,
                output: None,
                json: false,
                quiet: true,
            },
            &Settings::default(),
        )
        .unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
    }
}
