use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};
use ulid::Ulid;

use crate::contracts::types::{DistributionBreakdown, DistributionPercentages, RecordRow};
use crate::engine::dedupe::{self, ExistingEntry};
use crate::state::map_sqlite_error;
use crate::submission::validate::ValidatedSubmission;
use crate::{ClientError, ClientResult};

pub(crate) struct PersistInput<'a> {
    pub(crate) validated: &'a ValidatedSubmission,
    pub(crate) approve: bool,
    pub(crate) replace_record_id: Option<&'a str>,
    pub(crate) source_ref: Option<&'a str>,
    pub(crate) now_ms: i64,
    pub(crate) dry_run: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct PersistResult {
    pub(crate) submission_id: String,
    pub(crate) records: Vec<RecordRow>,
}

/// Runs the duplicate gate and writes the whole batch inside one immediate
/// transaction. A dry run goes through every step and then rolls back.
pub(crate) fn persist_submission(
    connection: &mut Connection,
    db_path: &Path,
    input: PersistInput<'_>,
) -> ClientResult<PersistResult> {
    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    if let Some(replace_id) = input.replace_record_id {
        verify_record_exists(&transaction, db_path, replace_id)?;
    }

    let existing = load_existing_entries(&transaction, db_path)?;
    if let Some(hit) = dedupe::find_duplicate(
        &input.validated.payees,
        &input.validated.order_date,
        input.validated.per_person_amount,
        &existing,
        input.replace_record_id,
    ) {
        return Err(ClientError::duplicate_order(
            &hit.payee,
            &input.validated.order_date,
            input.validated.per_person_amount,
        ));
    }

    if let Some(replace_id) = input.replace_record_id {
        transaction
            .execute(
                "DELETE FROM internal_records WHERE record_id = ?1",
                [replace_id],
            )
            .map_err(|error| map_sqlite_error(db_path, &error))?;
    }

    let submission_id = format!("sub_{}", Ulid::new());
    transaction
        .execute(
            "INSERT INTO internal_submissions (
                submission_id,
                created_at,
                gross_amount,
                payee_count,
                source_ref
             ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &submission_id,
                input.now_ms,
                input.validated.gross_amount,
                input.validated.payees.len() as i64,
                input.source_ref
            ],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let status = if input.approve { "approved" } else { "pending" };
    let mut records = Vec::with_capacity(input.validated.payees.len());
    for payee in &input.validated.payees {
        let record = insert_record(
            &transaction,
            db_path,
            &submission_id,
            payee,
            status,
            &input,
        )?;
        records.push(record);
    }

    if input.dry_run {
        transaction
            .rollback()
            .map_err(|error| map_sqlite_error(db_path, &error))?;
    } else {
        transaction
            .commit()
            .map_err(|error| map_sqlite_error(db_path, &error))?;
    }

    Ok(PersistResult {
        submission_id,
        records,
    })
}

fn verify_record_exists(
    transaction: &Transaction<'_>,
    db_path: &Path,
    record_id: &str,
) -> ClientResult<()> {
    let exists = transaction
        .query_row(
            "SELECT 1 FROM internal_records WHERE record_id = ?1 LIMIT 1",
            [record_id],
            |_row| Ok(true),
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?
        .unwrap_or(false);

    if !exists {
        return Err(ClientError::record_not_found(record_id));
    }
    Ok(())
}

fn load_existing_entries(
    transaction: &Transaction<'_>,
    db_path: &Path,
) -> ClientResult<Vec<ExistingEntry>> {
    let mut statement = transaction
        .prepare(
            "SELECT record_id, taker, order_date, amount
             FROM internal_records
             WHERE status != 'rejected'",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let entry_iter = statement
        .query_map([], |row| {
            Ok(ExistingEntry {
                record_id: row.get(0)?,
                payee: row.get(1)?,
                order_date: row.get(2)?,
                amount: row.get(3)?,
            })
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut entries = Vec::new();
    for entry in entry_iter {
        entries.push(entry.map_err(|error| map_sqlite_error(db_path, &error))?);
    }
    Ok(entries)
}

fn insert_record(
    transaction: &Transaction<'_>,
    db_path: &Path,
    submission_id: &str,
    payee: &str,
    status: &str,
    input: &PersistInput<'_>,
) -> ClientResult<RecordRow> {
    let validated = input.validated;
    let record_id = format!("rec_{}", Ulid::new());
    transaction
        .execute(
            "INSERT INTO internal_records (
                record_id,
                submission_id,
                submitted_at,
                status,
                amount,
                taker,
                controller,
                superior,
                order_date,
                content,
                dist_taker,
                dist_controller,
                dist_superior,
                dist_pool,
                dist_platform,
                taker_percentage,
                controller_percentage,
                superior_percentage,
                notes
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, NULL)",
            params![
                &record_id,
                submission_id,
                input.now_ms,
                status,
                validated.per_person_amount,
                payee,
                &validated.controller,
                &validated.superior,
                &validated.order_date,
                &validated.content,
                validated.distribution.taker,
                validated.distribution.controller,
                validated.distribution.superior,
                validated.distribution.pool,
                validated.distribution.platform,
                validated.config.taker_percentage,
                validated.config.controller_percentage,
                validated.config.superior_percentage
            ],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    Ok(RecordRow {
        record_id,
        submission_id: submission_id.to_string(),
        submitted_at: input.now_ms,
        status: status.to_string(),
        amount: validated.per_person_amount,
        taker: payee.to_string(),
        controller: validated.controller.clone(),
        superior: validated.superior.clone(),
        order_date: validated.order_date.clone(),
        content: validated.content.clone(),
        distribution: DistributionBreakdown {
            taker: validated.distribution.taker,
            controller: validated.distribution.controller,
            superior: validated.distribution.superior,
            pool: validated.distribution.pool,
            platform: validated.distribution.platform,
        },
        percentages: DistributionPercentages {
            taker: validated.config.taker_percentage,
            controller: validated.config.controller_percentage,
            superior: validated.config.superior_percentage,
        },
        notes: None,
    })
}
