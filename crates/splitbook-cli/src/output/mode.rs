use crate::cli::{Commands, RecordsCommand, ReportCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Submit { json, .. } => *json,
        Commands::Records { command } => match command {
            RecordsCommand::List { json, .. }
            | RecordsCommand::Approve { json, .. }
            | RecordsCommand::Reject { json, .. }
            | RecordsCommand::Paid { json, .. }
            | RecordsCommand::Delete { json, .. }
            | RecordsCommand::PurgeRejected { json } => *json,
        },
        Commands::Report { command } => match command {
            ReportCommand::Window { json, .. } | ReportCommand::Month { json, .. } => *json,
        },
    };

    if json { OutputMode::Json } else { OutputMode::Text }
}
