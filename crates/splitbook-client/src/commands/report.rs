use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, TransactionBehavior, params};

use crate::commands::common::{load_setup, resolve_now_ms};
use crate::contracts::envelope::SuccessEnvelope;
use crate::contracts::types::{
    MonthBucketData, MonthReportData, PersonTotalRow, WindowReportData,
};
use crate::engine::{datekey, window};
use crate::state::{map_sqlite_error, open_connection};
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct WindowOptions<'a> {
    pub mark_paid: bool,
    pub export: Option<String>,
    pub home_override: Option<&'a Path>,
    pub now_override: Option<i64>,
}

#[derive(Debug, Default)]
pub struct MonthOptions<'a> {
    pub month: Option<String>,
    pub export: Option<String>,
    pub home_override: Option<&'a Path>,
    pub now_override: Option<i64>,
}

#[derive(Debug, Clone)]
struct ReportRow {
    share: window::ShareSource,
    amount: f64,
    order_date: String,
}

pub fn window(mark_paid: bool, export: Option<String>) -> ClientResult<SuccessEnvelope> {
    window_with_options(WindowOptions {
        mark_paid,
        export,
        home_override: None,
        now_override: None,
    })
}

#[doc(hidden)]
pub fn window_with_options(options: WindowOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let mut connection = open_connection(&db_path)?;

    let now_ms = resolve_now_ms(options.now_override);
    let (window_start, window_end) = window::rolling_window(now_ms);

    let marked_paid = if options.mark_paid {
        let transaction = connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|error| map_sqlite_error(&db_path, &error))?;
        let changed = transaction
            .execute(
                "UPDATE internal_records SET status = 'paid'
                 WHERE status = 'approved' AND submitted_at BETWEEN ?1 AND ?2",
                params![window_start, window_end],
            )
            .map_err(|error| map_sqlite_error(&db_path, &error))?;
        transaction
            .commit()
            .map_err(|error| map_sqlite_error(&db_path, &error))?;
        Some(changed as i64)
    } else {
        None
    };

    let rows = load_report_rows(
        &connection,
        &db_path,
        "status IN ('approved', 'paid') AND submitted_at BETWEEN ?1 AND ?2",
        params![window_start, window_end],
    )?;

    let shares: Vec<window::ShareSource> = rows.iter().map(|row| row.share.clone()).collect();
    let persons = window::aggregate_person_totals(&shares);
    let grand_total = rows.iter().map(|row| row.amount).sum();

    let export_path = match options.export.as_deref() {
        Some(path) => {
            export_window_csv(path, &persons)?;
            Some(path.to_string())
        }
        None => None,
    };

    SuccessEnvelope::for_command(
        "report window",
        WindowReportData {
            window_start,
            window_end,
            record_count: rows.len() as i64,
            grand_total,
            persons,
            marked_paid,
            export_path,
        },
    )
}

pub fn month(month: Option<String>, export: Option<String>) -> ClientResult<SuccessEnvelope> {
    month_with_options(MonthOptions {
        month,
        export,
        home_override: None,
        now_override: None,
    })
}

#[doc(hidden)]
pub fn month_with_options(options: MonthOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let now_ms = resolve_now_ms(options.now_override);
    let current_month = datekey::current_month_key(now_ms);
    let reference_year = datekey::reference_year(now_ms);

    let selector = parse_month_selector(options.month.as_deref(), &current_month)?;

    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let connection = open_connection(&db_path)?;

    let rows = load_report_rows(
        &connection,
        &db_path,
        "status IN ('approved', 'paid')",
        params![],
    )?;

    // BTreeMap keeps bucket keys sorted; we emit them newest first.
    let mut buckets: BTreeMap<String, Vec<&ReportRow>> = BTreeMap::new();
    for row in &rows {
        let bucket = datekey::month_bucket(&row.order_date, reference_year)
            .unwrap_or_else(|| datekey::UNKNOWN_BUCKET.to_string());
        buckets.entry(bucket).or_default().push(row);
    }

    let mut months: Vec<String> = buckets
        .keys()
        .filter(|key| key.as_str() != datekey::UNKNOWN_BUCKET)
        .cloned()
        .collect();
    if !months.contains(&current_month) {
        months.push(current_month.clone());
    }
    months.sort();
    months.reverse();

    let selected_keys: Vec<String> = match &selector {
        MonthSelector::All => {
            let mut keys: Vec<String> = buckets
                .keys()
                .filter(|key| key.as_str() != datekey::UNKNOWN_BUCKET)
                .cloned()
                .collect();
            keys.sort();
            keys.reverse();
            if buckets.contains_key(datekey::UNKNOWN_BUCKET) {
                keys.push(datekey::UNKNOWN_BUCKET.to_string());
            }
            keys
        }
        MonthSelector::Single(key) => vec![key.clone()],
    };

    let empty: Vec<&ReportRow> = Vec::new();
    let mut bucket_data: Vec<MonthBucketData> = Vec::new();
    for key in selected_keys {
        let bucket_rows = buckets.get(&key).unwrap_or(&empty);
        let shares: Vec<window::ShareSource> =
            bucket_rows.iter().map(|row| row.share.clone()).collect();
        bucket_data.push(MonthBucketData {
            month: key,
            record_count: bucket_rows.len() as i64,
            total: bucket_rows.iter().map(|row| row.amount).sum(),
            taker_total: shares.iter().map(|share| share.dist_taker).sum(),
            controller_total: shares.iter().map(|share| share.dist_controller).sum(),
            superior_total: shares.iter().map(|share| share.dist_superior).sum(),
            persons: window::aggregate_person_totals(&shares),
        });
    }

    let export_path = match options.export.as_deref() {
        Some(path) => {
            export_month_csv(path, &bucket_data)?;
            Some(path.to_string())
        }
        None => None,
    };

    SuccessEnvelope::for_command(
        "report month",
        MonthReportData {
            month: match selector {
                MonthSelector::All => None,
                MonthSelector::Single(key) => Some(key),
            },
            months,
            buckets: bucket_data,
            export_path,
        },
    )
}

enum MonthSelector {
    All,
    Single(String),
}

fn parse_month_selector(
    value: Option<&str>,
    current_month: &str,
) -> ClientResult<MonthSelector> {
    match value {
        None => Ok(MonthSelector::Single(current_month.to_string())),
        Some("all") => Ok(MonthSelector::All),
        Some(raw) => {
            if !looks_like_month_key(raw) {
                return Err(ClientError::invalid_argument_for_command(
                    &format!("Invalid month `{raw}`. Use YYYY-MM or `all`."),
                    Some("report month"),
                ));
            }
            Ok(MonthSelector::Single(raw.to_string()))
        }
    }
}

fn looks_like_month_key(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return false;
    }
    for index in [0usize, 1, 2, 3, 5, 6] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }
    true
}

fn load_report_rows(
    connection: &Connection,
    db_path: &Path,
    where_clause: &str,
    bindings: impl rusqlite::Params,
) -> ClientResult<Vec<ReportRow>> {
    let sql = format!(
        "SELECT taker, controller, superior, dist_taker, dist_controller, dist_superior,
                status, amount, order_date
         FROM internal_records
         WHERE {where_clause}
         ORDER BY submitted_at ASC, record_id ASC"
    );
    let mut statement = connection
        .prepare(&sql)
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    let rows_iter = statement
        .query_map(bindings, |row| {
            Ok(ReportRow {
                share: window::ShareSource {
                    taker: row.get(0)?,
                    controller: row.get(1)?,
                    superior: row.get(2)?,
                    dist_taker: row.get(3)?,
                    dist_controller: row.get(4)?,
                    dist_superior: row.get(5)?,
                    status: row.get(6)?,
                },
                amount: row.get(7)?,
                order_date: row.get(8)?,
            })
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut rows = Vec::new();
    for row in rows_iter {
        rows.push(row.map_err(|error| map_sqlite_error(db_path, &error))?);
    }
    Ok(rows)
}

fn export_window_csv(path: &str, persons: &[PersonTotalRow]) -> ClientResult<()> {
    let mut writer =
        csv::Writer::from_path(path).map_err(|error| ClientError::export_failed(path, &error.to_string()))?;
    writer
        .write_record(["name", "total", "share_count", "fully_paid"])
        .map_err(|error| ClientError::export_failed(path, &error.to_string()))?;
    for person in persons {
        writer
            .write_record([
                person.name.as_str(),
                &format!("{:.2}", person.total),
                &person.share_count.to_string(),
                if person.fully_paid { "yes" } else { "no" },
            ])
            .map_err(|error| ClientError::export_failed(path, &error.to_string()))?;
    }
    writer
        .flush()
        .map_err(|error| ClientError::export_failed(path, &error.to_string()))?;
    Ok(())
}

fn export_month_csv(path: &str, buckets: &[MonthBucketData]) -> ClientResult<()> {
    let mut writer =
        csv::Writer::from_path(path).map_err(|error| ClientError::export_failed(path, &error.to_string()))?;
    writer
        .write_record(["month", "name", "total", "share_count", "fully_paid"])
        .map_err(|error| ClientError::export_failed(path, &error.to_string()))?;
    for bucket in buckets {
        for person in &bucket.persons {
            writer
                .write_record([
                    bucket.month.as_str(),
                    person.name.as_str(),
                    &format!("{:.2}", person.total),
                    &person.share_count.to_string(),
                    if person.fully_paid { "yes" } else { "no" },
                ])
                .map_err(|error| ClientError::export_failed(path, &error.to_string()))?;
        }
    }
    writer
        .flush()
        .map_err(|error| ClientError::export_failed(path, &error.to_string()))?;
    Ok(())
}
