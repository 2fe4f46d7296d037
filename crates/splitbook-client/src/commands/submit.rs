use std::path::Path;

use crate::ClientResult;
use crate::commands::common::{load_setup, resolve_now_ms};
use crate::contracts::envelope::SuccessEnvelope;
use crate::contracts::types::SubmitData;
use crate::submission;

#[derive(Debug, Default)]
pub struct SubmitOptions<'a> {
    pub path: Option<String>,
    pub dry_run: bool,
    pub approve: bool,
    pub replace_record_id: Option<String>,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
    pub now_override: Option<i64>,
}

pub fn run(
    path: Option<String>,
    dry_run: bool,
    approve: bool,
    replace_record_id: Option<String>,
) -> ClientResult<SuccessEnvelope> {
    run_with_options(SubmitOptions {
        path,
        dry_run,
        approve,
        replace_record_id,
        home_override: None,
        stdin_override: None,
        now_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: SubmitOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let execution = submission::execute(
        &setup,
        submission::SubmitRequest {
            path: options.path.clone(),
            dry_run: options.dry_run,
            approve: options.approve,
            replace_record_id: options.replace_record_id,
            stdin_override: options.stdin_override,
            now_ms: resolve_now_ms(options.now_override),
        },
    )?;

    let data = SubmitData {
        dry_run: execution.dry_run,
        path: options.path,
        submission_id: execution.submission_id,
        message: execution.message,
        summary: execution.summary,
        records: execution.records,
        replaced_record_id: execution.replaced_record_id,
        source_used: execution.source_used,
    };

    SuccessEnvelope::for_command("submit", data)
}
