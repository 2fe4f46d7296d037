use std::io;

use serde_json::Value;

use super::format::{self, Align, Column};

pub fn render_submit(data: &Value) -> io::Result<String> {
    let dry_run = data
        .get("dry_run")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let summary = data
        .get("summary")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("submit output requires summary"))?;

    let mut lines = Vec::new();
    if dry_run {
        lines.push("Dry-run validation completed successfully.".to_string());
    } else {
        lines.push("Submission recorded successfully.".to_string());
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());

    let mut entries = Vec::new();
    if !dry_run {
        let submission_id = data
            .get("submission_id")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        entries.push(("Submission ID:", submission_id.to_string()));
    }

    entries.push(("Payees:", get_i64(summary, "payees").to_string()));
    entries.push((
        "Records inserted:",
        get_i64(summary, "records_inserted").to_string(),
    ));
    entries.push((
        "Gross amount:",
        format_money_field(summary, "gross_amount"),
    ));
    entries.push((
        "Per-person amount:",
        format_money_field(summary, "per_person_amount"),
    ));

    lines.extend(format::key_value_rows(&entries, 2));

    if let Some(replaced) = data.get("replaced_record_id").and_then(Value::as_str) {
        lines.push(String::new());
        lines.push(format!("Replaced record: {replaced}"));
    }

    let records = data
        .get("records")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if !records.is_empty() {
        lines.push(String::new());
        lines.push("Records:".to_string());
        lines.extend(render_records_table(&records));
    }

    if dry_run {
        lines.push(String::new());
        lines.push("No rows were written because this was a dry run.".to_string());
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if dry_run {
        lines.push("  1. Review the computed splits above.".to_string());
        lines.push("  2. Run `splitbook submit <path>` to record the order.".to_string());
    } else {
        lines.push("  1. Run `splitbook records list` to review stored records.".to_string());
        lines.push(
            "  2. Run `splitbook records approve <record-id>` once entries are verified."
                .to_string(),
        );
        lines.push("  3. Run `splitbook report window` to see settlement totals.".to_string());
    }

    Ok(lines.join("\n"))
}

fn render_records_table(records: &[Value]) -> Vec<String> {
    let columns = [
        Column {
            name: "Record ID",
            align: Align::Left,
        },
        Column {
            name: "Payee",
            align: Align::Left,
        },
        Column {
            name: "Status",
            align: Align::Left,
        },
        Column {
            name: "Share",
            align: Align::Right,
        },
        Column {
            name: "Taker cut",
            align: Align::Right,
        },
        Column {
            name: "Order date",
            align: Align::Left,
        },
    ];

    let rows = records
        .iter()
        .map(|record| {
            vec![
                value_str(record, "record_id"),
                value_str(record, "taker"),
                value_str(record, "status"),
                format_money_value(record.get("amount")),
                format_money_value(record.get("distribution").and_then(|d| d.get("taker"))),
                value_str(record, "order_date"),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    format::render_table(&columns, &rows)
}

fn value_str(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

fn get_i64(summary: &serde_json::Map<String, Value>, key: &str) -> i64 {
    summary.get(key).and_then(Value::as_i64).unwrap_or(0)
}

fn format_money_field(summary: &serde_json::Map<String, Value>, key: &str) -> String {
    format_money_value(summary.get(key))
}

fn format_money_value(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_f64)
        .map(format::format_money)
        .unwrap_or_else(|| "unknown".to_string())
}
