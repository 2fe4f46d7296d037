use splitbook_client::commands;
use splitbook_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, RecordsCommand, ReportCommand};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Submit {
            dry_run,
            approve,
            replace,
            json: _,
            path,
        } => commands::submit::run(path.clone(), *dry_run, *approve, replace.clone()),
        Commands::Records { command } => match command {
            RecordsCommand::List { status, search, .. } => {
                commands::records::list(status.clone(), search.clone())
            }
            RecordsCommand::Approve { record_ids, .. } => {
                commands::records::approve(record_ids.clone())
            }
            RecordsCommand::Reject {
                record_ids, reason, ..
            } => commands::records::reject(record_ids.clone(), reason.clone()),
            RecordsCommand::Paid { record_ids, .. } => {
                commands::records::mark_paid(record_ids.clone())
            }
            RecordsCommand::Delete { record_ids, .. } => {
                commands::records::delete(record_ids.clone())
            }
            RecordsCommand::PurgeRejected { .. } => commands::records::purge_rejected(),
        },
        Commands::Report { command } => match command {
            ReportCommand::Window {
                mark_paid, export, ..
            } => commands::report::window(*mark_paid, export.clone()),
            ReportCommand::Month { month, export, .. } => {
                commands::report::month(month.clone(), export.clone())
            }
        },
    }
}
