use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Row;

use crate::contracts::types::{DistributionBreakdown, DistributionPercentages, RecordRow};
use crate::setup::{SetupContext, ensure_initialized, ensure_initialized_at};
use crate::ClientResult;

pub(crate) const ACTIVE_STATUSES: [&str; 4] = ["pending", "approved", "rejected", "paid"];

pub(crate) fn load_setup(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    if let Some(path) = home_override {
        return ensure_initialized_at(path);
    }
    ensure_initialized()
}

pub(crate) fn resolve_now_ms(now_override: Option<i64>) -> i64 {
    if let Some(value) = now_override {
        return value;
    }
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_millis() as i64,
        Err(_) => 0,
    }
}

pub(crate) const RECORD_ROW_COLUMNS: &str = "record_id,
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
                notes";

pub(crate) fn record_row_from_sql(row: &Row<'_>) -> rusqlite::Result<RecordRow> {
    Ok(RecordRow {
        record_id: row.get(0)?,
        submission_id: row.get(1)?,
        submitted_at: row.get(2)?,
        status: row.get(3)?,
        amount: row.get(4)?,
        taker: row.get(5)?,
        controller: row.get(6)?,
        superior: row.get(7)?,
        order_date: row.get(8)?,
        content: row.get(9)?,
        distribution: DistributionBreakdown {
            taker: row.get(10)?,
            controller: row.get(11)?,
            superior: row.get(12)?,
            pool: row.get(13)?,
            platform: row.get(14)?,
        },
        percentages: DistributionPercentages {
            taker: row.get(15)?,
            controller: row.get(16)?,
            superior: row.get(17)?,
        },
        notes: row.get::<_, Option<String>>(18)?,
    })
}
