use std::path::{Path, PathBuf};

use rusqlite::{OptionalExtension, TransactionBehavior, params, params_from_iter};

use crate::commands::common::{ACTIVE_STATUSES, RECORD_ROW_COLUMNS, load_setup, record_row_from_sql};
use crate::contracts::envelope::SuccessEnvelope;
use crate::contracts::types::{
    PurgeRejectedData, RecordRow, RecordsDeleteData, RecordsListData, StatusUpdateData,
};
use crate::state::{map_sqlite_error, open_connection};
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct ListOptions<'a> {
    pub status: Option<String>,
    pub search: Option<String>,
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct MutateOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn list(status: Option<String>, search: Option<String>) -> ClientResult<SuccessEnvelope> {
    list_with_options(ListOptions {
        status,
        search,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn list_with_options(options: ListOptions<'_>) -> ClientResult<SuccessEnvelope> {
    if let Some(status) = options.status.as_deref()
        && !ACTIVE_STATUSES.contains(&status)
    {
        return Err(ClientError::invalid_argument_for_command(
            &format!(
                "Invalid status `{status}`. Supported values: pending, approved, rejected, paid."
            ),
            Some("records list"),
        ));
    }

    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let connection = open_connection(&db_path)?;

    let mut sql = format!("SELECT {RECORD_ROW_COLUMNS} FROM internal_records");
    let mut clauses: Vec<&str> = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(status) = options.status {
        clauses.push("status = ?");
        bindings.push(status);
    }
    if let Some(search) = options.search.as_deref()
        && !search.trim().is_empty()
    {
        clauses.push(
            "(LOWER(taker) LIKE ? OR LOWER(controller) LIKE ? OR LOWER(superior) LIKE ?
              OR LOWER(content) LIKE ? OR LOWER(order_date) LIKE ?)",
        );
        let pattern = format!("%{}%", search.trim().to_lowercase());
        for _ in 0..5 {
            bindings.push(pattern.clone());
        }
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY submitted_at DESC, record_id DESC");

    let mut statement = connection
        .prepare(&sql)
        .map_err(|error| map_sqlite_error(&db_path, &error))?;
    let rows_iter = statement
        .query_map(params_from_iter(bindings.iter()), record_row_from_sql)
        .map_err(|error| map_sqlite_error(&db_path, &error))?;

    let mut rows: Vec<RecordRow> = Vec::new();
    for row in rows_iter {
        rows.push(row.map_err(|error| map_sqlite_error(&db_path, &error))?);
    }

    SuccessEnvelope::for_command(
        "records list",
        RecordsListData {
            total: rows.len() as i64,
            rows,
        },
    )
}

pub fn approve(record_ids: Vec<String>) -> ClientResult<SuccessEnvelope> {
    approve_with_options(record_ids, MutateOptions::default())
}

#[doc(hidden)]
pub fn approve_with_options(
    record_ids: Vec<String>,
    options: MutateOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    apply_transition(record_ids, "approved", None, "records approve", options)
}

pub fn reject(record_ids: Vec<String>, reason: Option<String>) -> ClientResult<SuccessEnvelope> {
    reject_with_options(record_ids, reason, MutateOptions::default())
}

#[doc(hidden)]
pub fn reject_with_options(
    record_ids: Vec<String>,
    reason: Option<String>,
    options: MutateOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    apply_transition(
        record_ids,
        "rejected",
        reason.as_deref(),
        "records reject",
        options,
    )
}

pub fn mark_paid(record_ids: Vec<String>) -> ClientResult<SuccessEnvelope> {
    mark_paid_with_options(record_ids, MutateOptions::default())
}

#[doc(hidden)]
pub fn mark_paid_with_options(
    record_ids: Vec<String>,
    options: MutateOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    apply_transition(record_ids, "paid", None, "records paid", options)
}

pub fn delete(record_ids: Vec<String>) -> ClientResult<SuccessEnvelope> {
    delete_with_options(record_ids, MutateOptions::default())
}

#[doc(hidden)]
pub fn delete_with_options(
    record_ids: Vec<String>,
    options: MutateOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    require_record_ids(&record_ids, "records delete")?;

    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let mut connection = open_connection(&db_path)?;

    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|error| map_sqlite_error(&db_path, &error))?;

    for record_id in &record_ids {
        let exists = transaction
            .query_row(
                "SELECT 1 FROM internal_records WHERE record_id = ?1 LIMIT 1",
                [record_id],
                |_row| Ok(true),
            )
            .optional()
            .map_err(|error| map_sqlite_error(&db_path, &error))?
            .unwrap_or(false);
        if !exists {
            return Err(ClientError::record_not_found(record_id));
        }
        transaction
            .execute(
                "DELETE FROM internal_records WHERE record_id = ?1",
                [record_id],
            )
            .map_err(|error| map_sqlite_error(&db_path, &error))?;
    }

    transaction
        .commit()
        .map_err(|error| map_sqlite_error(&db_path, &error))?;

    SuccessEnvelope::for_command(
        "records delete",
        RecordsDeleteData {
            deleted: record_ids.len() as i64,
            message: format!("Deleted {} record(s).", record_ids.len()),
            record_ids,
        },
    )
}

pub fn purge_rejected() -> ClientResult<SuccessEnvelope> {
    purge_rejected_with_options(MutateOptions::default())
}

#[doc(hidden)]
pub fn purge_rejected_with_options(options: MutateOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let connection = open_connection(&db_path)?;

    let purged = connection
        .execute("DELETE FROM internal_records WHERE status = 'rejected'", [])
        .map_err(|error| map_sqlite_error(&db_path, &error))?;

    SuccessEnvelope::for_command(
        "records purge-rejected",
        PurgeRejectedData {
            purged: purged as i64,
            message: format!("Purged {purged} rejected record(s)."),
        },
    )
}

/// Allowed lifecycle moves. Rejected and paid are terminal short of a hard
/// delete; rejection is reachable from any active state.
fn transition_allowed(from: &str, to: &str) -> bool {
    matches!(
        (from, to),
        ("pending", "approved")
            | ("approved", "paid")
            | ("pending", "rejected")
            | ("approved", "rejected")
    )
}

fn apply_transition(
    record_ids: Vec<String>,
    to_status: &str,
    reason: Option<&str>,
    command: &str,
    options: MutateOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    require_record_ids(&record_ids, command)?;

    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let mut connection = open_connection(&db_path)?;

    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|error| map_sqlite_error(&db_path, &error))?;

    for record_id in &record_ids {
        let current: Option<String> = transaction
            .query_row(
                "SELECT status FROM internal_records WHERE record_id = ?1 LIMIT 1",
                [record_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|error| map_sqlite_error(&db_path, &error))?;

        let Some(from_status) = current else {
            return Err(ClientError::record_not_found(record_id));
        };
        if !transition_allowed(&from_status, to_status) {
            return Err(ClientError::invalid_status_transition(
                record_id,
                &from_status,
                to_status,
            ));
        }

        if to_status == "rejected" {
            transaction
                .execute(
                    "UPDATE internal_records SET status = ?1, notes = ?2 WHERE record_id = ?3",
                    params![to_status, reason, record_id],
                )
                .map_err(|error| map_sqlite_error(&db_path, &error))?;
        } else {
            transaction
                .execute(
                    "UPDATE internal_records SET status = ?1 WHERE record_id = ?2",
                    params![to_status, record_id],
                )
                .map_err(|error| map_sqlite_error(&db_path, &error))?;
        }
    }

    transaction
        .commit()
        .map_err(|error| map_sqlite_error(&db_path, &error))?;

    SuccessEnvelope::for_command(
        command,
        StatusUpdateData {
            status: to_status.to_string(),
            updated: record_ids.len() as i64,
            message: format!(
                "Updated {} record(s) to `{to_status}`.",
                record_ids.len()
            ),
            record_ids,
        },
    )
}

fn require_record_ids(record_ids: &[String], command: &str) -> ClientResult<()> {
    if record_ids.is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "At least one record id is required.",
            Some(command),
        ));
    }
    Ok(())
}
