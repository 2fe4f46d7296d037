use std::io;

use chrono::{Local, TimeZone};
use serde_json::Value;

use super::format::{self, Align, Column};

pub fn render_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("records list output requires rows"))?;

    if rows.is_empty() {
        return Ok([
            "No records found.",
            "",
            "Record your first order:",
            "  1. splitbook submit --help",
            "  2. splitbook submit --dry-run <path>",
            "  3. splitbook submit <path>",
        ]
        .join("\n"));
    }

    let count_label = if rows.len() == 1 {
        "1 record found.".to_string()
    } else {
        format!("{} records found.", rows.len())
    };

    let columns = [
        Column {
            name: "Record ID",
            align: Align::Left,
        },
        Column {
            name: "Status",
            align: Align::Left,
        },
        Column {
            name: "Payee",
            align: Align::Left,
        },
        Column {
            name: "Share",
            align: Align::Right,
        },
        Column {
            name: "Order date",
            align: Align::Left,
        },
        Column {
            name: "Submitted (local)",
            align: Align::Left,
        },
    ];

    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                value_str(row, "record_id"),
                value_str(row, "status"),
                value_str(row, "taker"),
                row.get("amount")
                    .and_then(Value::as_f64)
                    .map(format::format_money)
                    .unwrap_or_else(|| "unknown".to_string()),
                value_str(row, "order_date"),
                format_submitted_local(row),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![count_label, String::new(), "Records:".to_string()];
    lines.extend(format::render_table(&columns, &table_rows));

    Ok(lines.join("\n"))
}

pub fn render_status_update(data: &Value) -> io::Result<String> {
    let message = data
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("status update output requires message"))?;

    let mut lines = vec![message.to_string()];
    let record_ids = string_list(data, "record_ids");
    if !record_ids.is_empty() {
        lines.push(String::new());
        lines.push("Records:".to_string());
        for record_id in record_ids {
            lines.push(format!("  {record_id}"));
        }
    }

    Ok(lines.join("\n"))
}

pub fn render_delete(data: &Value) -> io::Result<String> {
    let message = data
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("delete output requires message"))?;

    let mut lines = vec![message.to_string()];
    let record_ids = string_list(data, "record_ids");
    if !record_ids.is_empty() {
        lines.push(String::new());
        lines.push("Deleted:".to_string());
        for record_id in record_ids {
            lines.push(format!("  {record_id}"));
        }
    }

    Ok(lines.join("\n"))
}

pub fn render_purge_rejected(data: &Value) -> io::Result<String> {
    let message = data
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("purge output requires message"))?;

    Ok(message.to_string())
}

fn value_str(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

fn string_list(data: &Value, key: &str) -> Vec<String> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn format_submitted_local(row: &Value) -> String {
    let Some(ms) = row.get("submitted_at").and_then(Value::as_i64) else {
        return "unknown".to_string();
    };

    match Local.timestamp_millis_opt(ms) {
        chrono::LocalResult::Single(moment) => moment.format("%Y-%m-%d %H:%M").to_string(),
        _ => ms.to_string(),
    }
}
