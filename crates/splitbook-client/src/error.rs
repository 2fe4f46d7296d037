use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const SUBMIT_HELP_COMMAND: &str = "splitbook submit --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `splitbook {cmd} --help` for usage."),
            None => "Run `splitbook --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_submission_format(message: &str, received_format: &str) -> Self {
        Self::new(
            "invalid_submission_format",
            message,
            vec![
                "Provide one extraction as a single JSON object.".to_string(),
                format!("Run `{SUBMIT_HELP_COMMAND}` to review the submission fields."),
            ],
        )
        .with_data(json!({
            "received_format": received_format,
            "supported_formats": ["json_object"],
        }))
    }

    pub fn submission_validation_failed(message: &str) -> Self {
        Self::new(
            "submission_validation_failed",
            message,
            vec![
                "Fix the listed field in your extraction file.".to_string(),
                "Rerun `splitbook submit --dry-run <path>`.".to_string(),
            ],
        )
    }

    pub fn duplicate_order(payee: &str, order_date: &str, per_person_amount: f64) -> Self {
        Self::new(
            "duplicate_order",
            &format!(
                "Payee `{payee}` already has a record with the same order date and per-person amount. No records were written."
            ),
            vec![
                "Check `splitbook records list --search <name>` for the existing record.".to_string(),
                "If this re-reviews an existing record, rerun with `--replace <record_id>`.".to_string(),
            ],
        )
        .with_data(json!({
            "matched_payee": payee,
            "order_date": order_date,
            "per_person_amount": per_person_amount,
        }))
    }

    pub fn record_not_found(record_id: &str) -> Self {
        Self::new(
            "record_not_found",
            &format!("Record id `{record_id}` was not found."),
            vec!["Run `splitbook records list` to find a valid record id.".to_string()],
        )
        .with_data(json!({
            "record_id": record_id,
        }))
    }

    pub fn invalid_status_transition(record_id: &str, from: &str, to: &str) -> Self {
        Self::new(
            "invalid_status_transition",
            &format!(
                "Record `{record_id}` is `{from}` and cannot become `{to}`. No records were changed."
            ),
            vec![
                "Run `splitbook records list` to inspect record statuses.".to_string(),
                "Retry with record ids that allow this transition.".to_string(),
            ],
        )
        .with_data(json!({
            "record_id": record_id,
            "from_status": from,
            "to_status": to,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn export_failed(path: &str, detail: &str) -> Self {
        Self::new(
            "export_failed",
            &format!("Could not write report export to `{path}`: {detail}"),
            vec!["Verify the export path is writable and retry.".to_string()],
        )
    }

    pub fn ledger_init_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_init_permission_denied",
            &format!("Cannot initialize ledger at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `SPLITBOOK_HOME` to a writable directory."
            )],
        )
    }

    pub fn ledger_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_locked",
            &format!("Ledger database is locked at `{location}`."),
            vec![format!(
                "Close other processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn ledger_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_corrupt",
            &format!("Ledger database appears corrupt at `{location}`."),
            vec![format!(
                "Replace `{location}` with a valid SQLite ledger file or restore from backup."
            )],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "migration_failed",
            &format!("Ledger migration failed at `{location}`: {detail}"),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn ledger_init_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_init_failed",
            &format!("Ledger initialization failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
