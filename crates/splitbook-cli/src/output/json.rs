use std::io;

use serde::Serialize;
use serde_json::{Value, json};
use splitbook_client::{ClientError, FailureEnvelope, SuccessEnvelope};

const JSON_VERSION: &str = "v1";

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    let value = match success.command.as_str() {
        "records list" => render_records_list_json(&success.data),
        "submit"
        | "records approve"
        | "records reject"
        | "records paid"
        | "records delete"
        | "records purge-rejected"
        | "report window"
        | "report month" => render_enveloped_json(&success.data),
        _ => {
            return Err(io::Error::other(format!(
                "JSON output is not supported for command `{}`",
                success.command
            )));
        }
    };

    serialize_json_pretty(&value)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    serialize_json_pretty(&FailureEnvelope::from_error(error))
}

fn render_enveloped_json(data: &Value) -> Value {
    json!({
        "ok": true,
        "version": JSON_VERSION,
        "data": data.clone()
    })
}

// `records list` returns the raw row array so scripts can pipe it
// straight into jq without unwrapping an envelope.
fn render_records_list_json(data: &Value) -> Value {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    Value::Array(rows)
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
