use std::io;

use chrono::{Local, TimeZone};
use serde_json::Value;

use super::format::{self, Align, Column};

pub fn render_window(data: &Value) -> io::Result<String> {
    let persons = data
        .get("persons")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("window report output requires persons"))?;

    let window_start = data.get("window_start").and_then(Value::as_i64);
    let window_end = data.get("window_end").and_then(Value::as_i64);

    let mut lines = vec![format!(
        "Settlement window (local): {} to {}",
        format_epoch_ms_local(window_start),
        format_epoch_ms_local(window_end)
    )];

    if let Some(marked) = data.get("marked_paid").and_then(Value::as_i64) {
        lines.push(String::new());
        if marked == 1 {
            lines.push("Marked 1 approved record in the window as paid.".to_string());
        } else {
            lines.push(format!(
                "Marked {marked} approved records in the window as paid."
            ));
        }
    }

    if persons.is_empty() {
        lines.push(String::new());
        lines.push("No approved or paid records fall inside the window.".to_string());
        lines.push(String::new());
        lines.push("Approve records first:".to_string());
        lines.push("  1. splitbook records list --status pending".to_string());
        lines.push("  2. splitbook records approve <record-id>".to_string());
        return Ok(lines.join("\n"));
    }

    lines.push(String::new());
    lines.push("Per-person totals:".to_string());
    lines.extend(render_person_table(persons));

    lines.push(String::new());
    lines.push("Summary:".to_string());
    let entries = vec![
        (
            "Records:",
            data.get("record_count")
                .and_then(Value::as_i64)
                .unwrap_or(0)
                .to_string(),
        ),
        ("Grand total:", format_money_value(data.get("grand_total"))),
    ];
    lines.extend(format::key_value_rows(&entries, 2));

    if let Some(path) = data.get("export_path").and_then(Value::as_str) {
        lines.push(String::new());
        lines.push(format!("Exported to: {path}"));
    }

    Ok(lines.join("\n"))
}

pub fn render_month(data: &Value) -> io::Result<String> {
    let buckets = data
        .get("buckets")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("month report output requires buckets"))?;

    let mut lines = Vec::new();

    let heading = match data.get("month").and_then(Value::as_str) {
        Some(month) => format!("Monthly report for {month}."),
        None => "Monthly report for every bucket.".to_string(),
    };
    lines.push(heading);

    let months = data
        .get("months")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<&str>>()
        })
        .unwrap_or_default();
    if !months.is_empty() {
        lines.push(format!("Known months: {}", months.join(", ")));
    }

    if buckets.is_empty() {
        lines.push(String::new());
        lines.push("No records found for this report.".to_string());
        return Ok(lines.join("\n"));
    }

    for bucket in buckets {
        let month = bucket
            .get("month")
            .and_then(Value::as_str)
            .unwrap_or("Unknown");
        let record_count = bucket
            .get("record_count")
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let record_label = if record_count == 1 {
            "1 record".to_string()
        } else {
            format!("{record_count} records")
        };

        lines.push(String::new());
        lines.push(format!(
            "{month}: {record_label}, total {}",
            format_money_value(bucket.get("total"))
        ));
        lines.push(format!(
            "  Taker {} / Controller {} / Superior {}",
            format_money_value(bucket.get("taker_total")),
            format_money_value(bucket.get("controller_total")),
            format_money_value(bucket.get("superior_total"))
        ));

        let persons = bucket
            .get("persons")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        if persons.is_empty() {
            lines.push("  (no payable shares)".to_string());
        } else {
            lines.extend(render_person_table(&persons));
        }
    }

    if let Some(path) = data.get("export_path").and_then(Value::as_str) {
        lines.push(String::new());
        lines.push(format!("Exported to: {path}"));
    }

    Ok(lines.join("\n"))
}

fn render_person_table(persons: &[Value]) -> Vec<String> {
    let columns = [
        Column {
            name: "Name",
            align: Align::Left,
        },
        Column {
            name: "Total",
            align: Align::Right,
        },
        Column {
            name: "Shares",
            align: Align::Right,
        },
        Column {
            name: "Fully paid",
            align: Align::Left,
        },
    ];

    let rows = persons
        .iter()
        .map(|person| {
            vec![
                person
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                format_money_value(person.get("total")),
                person
                    .get("share_count")
                    .and_then(Value::as_i64)
                    .unwrap_or(0)
                    .to_string(),
                if person
                    .get("fully_paid")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
                {
                    "yes".to_string()
                } else {
                    "no".to_string()
                },
            ]
        })
        .collect::<Vec<Vec<String>>>();

    format::render_table(&columns, &rows)
}

fn format_money_value(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_f64)
        .map(format::format_money)
        .unwrap_or_else(|| "unknown".to_string())
}

fn format_epoch_ms_local(ms: Option<i64>) -> String {
    let Some(ms) = ms else {
        return "unknown".to_string();
    };

    match Local.timestamp_millis_opt(ms) {
        chrono::LocalResult::Single(moment) => moment.format("%Y-%m-%d %H:%M").to_string(),
        _ => ms.to_string(),
    }
}
