mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use splitbook_client::ClientError;
use stdout_io::write_stdout_text;

const ROOT_HELP: &str = "Splitbook - commission split ledger

Usage:
  splitbook <command>

Start here:
  splitbook submit --help
  splitbook records list
  splitbook report window
";

const TOP_LEVEL_HELP: &str = "Splitbook - commission split ledger

USAGE: splitbook <command>

Record an order:
  1. splitbook submit --help                              Read the submission schema and workflow
  2. splitbook submit --dry-run <path>                    Validate and preview splits without writing
  3. splitbook submit <path>                              Record the order (one row per payee)

Manage records:
  splitbook records list                                  List records, newest first
  splitbook records approve <id>...                       Approve pending records
  splitbook records reject <id>... --reason <text>        Reject records with a reason
  splitbook records paid <id>...                          Mark approved records as paid
  splitbook records delete <id>...                        Permanently delete records
  splitbook records purge-rejected                        Remove every rejected record

Run reports:
  splitbook report window                                 Settlement totals for the last three days
  splitbook report window --mark-paid                     Settle the window, then report it
  splitbook report month --month 2026-05                  Per-person totals for one order month
  splitbook report month --month all --export out.csv     Every month bucket, exported to CSV

Having issues or errors?
  Run `splitbook submit --help` for submission workflow guidance,
  or `splitbook <command> --help` for command usage.
";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }
    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                if matches!(
                    err.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) && is_top_level_help_request(&raw_args)
                {
                    if write_stdout_text(TOP_LEVEL_HELP).is_err() {
                        return Err(ExitCode::from(2));
                    }
                } else if write_stdout_text(&err.to_string()).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }
            let command_hint = if matches!(
                err.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
            ) {
                command_path_from_args(&raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                ClientError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_command(&cli.command);

    let dispatched = dispatch::dispatch(&cli);
    match dispatched {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing boilerplate (Usage line, "For more information" hint)
/// so our "What to do next" section is the single source of guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// Builds the subcommand path from raw CLI args for use in help hints.
///
/// Collects non-flag arguments after the binary name to form a command
/// string like "records approve" or "report month".
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let non_flags: Vec<&str> = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect();
    if non_flags.is_empty() {
        return None;
    }

    let hint = match non_flags.as_slice() {
        ["submit", ..] => Some("submit"),
        ["records", "list", ..] => Some("records list"),
        ["records", "approve", ..] => Some("records approve"),
        ["records", "reject", ..] => Some("records reject"),
        ["records", "paid", ..] => Some("records paid"),
        ["records", "delete", ..] => Some("records delete"),
        ["records", "purge-rejected", ..] => Some("records purge-rejected"),
        ["records", ..] => Some("records"),
        ["report", "window", ..] => Some("report window"),
        ["report", "month", ..] => Some("report month"),
        ["report", ..] => Some("report"),
        _ => None,
    };
    hint.map(std::string::ToString::to_string)
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if is_internal_error(error) {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn is_internal_error(error: &ClientError) -> bool {
    error.code.starts_with("internal_")
        || matches!(
            error.code.as_str(),
            "ledger_init_permission_denied"
                | "ledger_locked"
                | "ledger_corrupt"
                | "migration_failed"
                | "ledger_init_failed"
        )
}
