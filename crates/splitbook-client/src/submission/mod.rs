pub(crate) mod input;
pub(crate) mod parse;
pub(crate) mod persist;
pub(crate) mod validate;

use std::path::PathBuf;

use crate::contracts::types::{RecordRow, SubmitSummary};
use crate::setup::SetupContext;
use crate::state::open_connection;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub(crate) struct SubmitRequest {
    pub path: Option<String>,
    pub dry_run: bool,
    pub approve: bool,
    pub replace_record_id: Option<String>,
    pub stdin_override: Option<String>,
    pub now_ms: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct SubmitExecutionResult {
    pub dry_run: bool,
    pub submission_id: Option<String>,
    pub message: String,
    pub summary: SubmitSummary,
    pub records: Vec<RecordRow>,
    pub replaced_record_id: Option<String>,
    pub source_used: Option<String>,
}

pub(crate) fn execute(
    setup: &SetupContext,
    request: SubmitRequest,
) -> ClientResult<SubmitExecutionResult> {
    let resolved_source = input::resolve_source(request.path, request.stdin_override)?;
    let extraction = parse::parse_extraction(&resolved_source.content)?;
    let validated = validate::validate_extraction(extraction)?;

    let db_path = PathBuf::from(&setup.db_path);
    let mut connection = open_connection(&db_path)?;

    let persisted = persist::persist_submission(
        &mut connection,
        &db_path,
        persist::PersistInput {
            validated: &validated,
            approve: request.approve,
            replace_record_id: request.replace_record_id.as_deref(),
            source_ref: resolved_source.source_ref.as_deref(),
            now_ms: request.now_ms,
            dry_run: request.dry_run,
        },
    )?;

    let summary = SubmitSummary {
        payees: validated.payees.len() as i64,
        records_inserted: if request.dry_run {
            0
        } else {
            persisted.records.len() as i64
        },
        gross_amount: validated.gross_amount,
        per_person_amount: validated.per_person_amount,
    };

    let message = if request.dry_run {
        "Validation and duplicate check passed. No records were written.".to_string()
    } else if let Some(replaced) = request.replace_record_id.as_deref() {
        format!(
            "Submission committed; replaced record `{replaced}` with {} record(s).",
            persisted.records.len()
        )
    } else {
        format!(
            "Submission committed with {} record(s).",
            persisted.records.len()
        )
    };

    Ok(SubmitExecutionResult {
        dry_run: request.dry_run,
        submission_id: if request.dry_run {
            None
        } else {
            Some(persisted.submission_id)
        },
        message,
        records: persisted.records,
        replaced_record_id: if request.dry_run {
            None
        } else {
            request.replace_record_id
        },
        summary,
        source_used: resolved_source.source_used,
    })
}

pub(crate) fn invalid_input_error(message: &str) -> ClientError {
    ClientError::invalid_argument_with_recovery(
        message,
        vec![
            "Provide one extraction JSON object via path or stdin.".to_string(),
            "Run `splitbook submit --help` to confirm the submission fields.".to_string(),
        ],
    )
}
