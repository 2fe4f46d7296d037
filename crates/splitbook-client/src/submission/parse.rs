use serde_json::Value;

use crate::engine::distribution::DistributionConfig;
use crate::{ClientError, ClientResult};

/// One reviewed extraction as handed over by the upstream extraction step.
/// Field cleanup stops at trimming; splitting and placeholder handling happen
/// during validation.
#[derive(Debug, Clone)]
pub(crate) struct RawExtraction {
    pub amount: f64,
    pub taker: String,
    pub controller: String,
    pub superior: String,
    pub order_date: String,
    pub content: String,
    pub config: DistributionConfig,
}

pub(crate) fn parse_extraction(content: &str) -> ClientResult<RawExtraction> {
    let value: Value = serde_json::from_str(content.trim()).map_err(|error| {
        ClientError::invalid_submission_format(
            &format!("Submission input is not valid JSON: {error}"),
            "invalid_json",
        )
    })?;

    let Value::Object(object) = value else {
        return Err(ClientError::invalid_submission_format(
            "Submission input must be a single JSON object with the extraction fields.",
            json_kind(&value),
        ));
    };

    let amount = object.get("amount").and_then(Value::as_f64).ok_or_else(|| {
        ClientError::submission_validation_failed("`amount` is required and must be a number.")
    })?;

    Ok(RawExtraction {
        amount,
        taker: string_field(&object, "taker"),
        controller: string_field(&object, "controller"),
        superior: string_field(&object, "superior"),
        order_date: string_field(&object, "order_date"),
        content: string_field(&object, "content"),
        config: parse_config(object.get("config")),
    })
}

fn string_field(object: &serde_json::Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("")
        .to_string()
}

/// An absent config object means the standard dials. A supplied config object
/// coerces each missing or non-numeric member to zero rather than erroring.
fn parse_config(config: Option<&Value>) -> DistributionConfig {
    let Some(supplied) = config else {
        return DistributionConfig::default();
    };
    if supplied.is_null() {
        return DistributionConfig::default();
    }

    DistributionConfig {
        taker_percentage: config_member(supplied, "taker_percentage"),
        controller_percentage: config_member(supplied, "controller_percentage"),
        superior_percentage: config_member(supplied, "superior_percentage"),
    }
}

fn config_member(config: &Value, key: &str) -> f64 {
    config.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "json_array",
        Value::String(_) => "json_string",
        Value::Number(_) => "json_number",
        Value::Bool(_) => "json_bool",
        Value::Null => "json_null",
        Value::Object(_) => "json_object",
    }
}

#[cfg(test)]
mod tests {
    use super::parse_extraction;

    #[test]
    fn object_with_all_fields_parses() {
        let result = parse_extraction(
            r#"{
                "amount": 300,
                "taker": "张三,李四",
                "controller": "王五",
                "superior": "赵六",
                "order_date": "2024.5.1",
                "content": "三单合并"
            }"#,
        );
        assert!(result.is_ok());
        if let Ok(extraction) = result {
            assert_eq!(extraction.amount, 300.0);
            assert_eq!(extraction.taker, "张三,李四");
            assert_eq!(extraction.config.taker_percentage, 80.0);
        }
    }

    #[test]
    fn non_object_input_reports_its_format() {
        let result = parse_extraction("[{\"amount\": 10}]");
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "invalid_submission_format");
        }

        assert!(parse_extraction("not json at all").is_err());
    }

    #[test]
    fn missing_amount_fails_validation() {
        let result = parse_extraction("{\"taker\": \"张三\"}");
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "submission_validation_failed");
        }
    }

    #[test]
    fn supplied_config_coerces_missing_members_to_zero() {
        let result = parse_extraction(
            r#"{"amount": 100, "taker": "a", "config": {"taker_percentage": 60}}"#,
        );
        assert!(result.is_ok());
        if let Ok(extraction) = result {
            assert_eq!(extraction.config.taker_percentage, 60.0);
            assert_eq!(extraction.config.controller_percentage, 0.0);
            assert_eq!(extraction.config.superior_percentage, 0.0);
        }
    }

    #[test]
    fn absent_and_null_config_fall_back_to_defaults() {
        for body in [
            r#"{"amount": 100, "taker": "a"}"#,
            r#"{"amount": 100, "taker": "a", "config": null}"#,
        ] {
            let result = parse_extraction(body);
            assert!(result.is_ok());
            if let Ok(extraction) = result {
                assert_eq!(extraction.config.controller_percentage, 15.0);
            }
        }
    }

    #[test]
    fn non_numeric_config_members_coerce_to_zero() {
        let result = parse_extraction(
            r#"{"amount": 100, "taker": "a", "config": {"taker_percentage": "80%"}}"#,
        );
        assert!(result.is_ok());
        if let Ok(extraction) = result {
            assert_eq!(extraction.config.taker_percentage, 0.0);
        }
    }
}
