use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use splitbook_client::commands::report;
use splitbook_client::commands::report::{MonthOptions, WindowOptions};
use splitbook_client::commands::submit;
use splitbook_client::commands::submit::SubmitOptions;
use tempfile::tempdir;

// 2026-01-31T20:00:00Z, which is 2026-02-01 04:00 in Beijing. The rolling
// window is then [2026-01-29 00:00, 2026-01-31 23:59:59.999] Beijing time.
const NOW_MS: i64 = 1_769_889_600_000;
const WINDOW_START_MS: i64 = 1_769_616_000_000;

fn temp_home() -> std::io::Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempdir()?;
    let home = dir.path().join("ledger-home");
    Ok((dir, home))
}

fn submit_at(home: &Path, body: &str, approve: bool, now_ms: i64) {
    let result = submit::run_with_options(SubmitOptions {
        path: None,
        dry_run: false,
        approve,
        replace_record_id: None,
        home_override: Some(home),
        stdin_override: Some(body.to_string()),
        now_override: Some(now_ms),
    });
    assert!(result.is_ok());
}

fn run_window(
    home: &Path,
    mark_paid: bool,
    export: Option<String>,
) -> splitbook_client::ClientResult<splitbook_client::SuccessEnvelope> {
    report::window_with_options(WindowOptions {
        mark_paid,
        export,
        home_override: Some(home),
        now_override: Some(NOW_MS),
    })
}

fn run_month(
    home: &Path,
    month: Option<&str>,
    export: Option<String>,
) -> splitbook_client::ClientResult<splitbook_client::SuccessEnvelope> {
    report::month_with_options(MonthOptions {
        month: month.map(std::string::ToString::to_string),
        export,
        home_override: Some(home),
        now_override: Some(NOW_MS),
    })
}

fn person_names(data: &Value) -> Vec<String> {
    data["persons"]
        .as_array()
        .map(|persons| {
            persons
                .iter()
                .filter_map(|person| person["name"].as_str())
                .map(std::string::ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn window_includes_only_eligible_records_inside_the_window() {
    let home = temp_home();
    assert!(home.is_ok());
    if let Ok((_dir, home_path)) = home {
        // Approved inside the window.
        submit_at(
            &home_path,
            r#"{"amount": 100, "taker": "张三", "order_date": "2024.5.1", "content": "a"}"#,
            true,
            WINDOW_START_MS + 1_000,
        );
        // Approved but submitted today, outside the window.
        submit_at(
            &home_path,
            r#"{"amount": 100, "taker": "李四", "order_date": "2024.5.2", "content": "b"}"#,
            true,
            NOW_MS,
        );
        // Inside the window but still pending review.
        submit_at(
            &home_path,
            r#"{"amount": 100, "taker": "王五", "order_date": "2024.5.3", "content": "c"}"#,
            false,
            WINDOW_START_MS + 2_000,
        );

        let result = run_window(&home_path, false, None);
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            assert_eq!(envelope.data["record_count"], 1);
            assert_eq!(envelope.data["window_start"], WINDOW_START_MS);
            let names = person_names(&envelope.data);
            assert!(names.contains(&"张三".to_string()));
            assert!(!names.contains(&"李四".to_string()));
            assert!(!names.contains(&"王五".to_string()));
        }
    }
}

#[test]
fn mark_paid_settles_every_approved_record_in_the_window() {
    let home = temp_home();
    assert!(home.is_ok());
    if let Ok((_dir, home_path)) = home {
        submit_at(
            &home_path,
            r#"{"amount": 100, "taker": "张三", "order_date": "2024.5.1", "content": "a"}"#,
            true,
            WINDOW_START_MS + 1_000,
        );
        submit_at(
            &home_path,
            r#"{"amount": 200, "taker": "李四", "order_date": "2024.5.2", "content": "b"}"#,
            true,
            WINDOW_START_MS + 2_000,
        );

        let first = run_window(&home_path, true, None);
        assert!(first.is_ok());
        if let Ok(envelope) = first {
            assert_eq!(envelope.data["marked_paid"], 2);
        }

        let second = run_window(&home_path, false, None);
        assert!(second.is_ok());
        if let Ok(envelope) = second {
            assert_eq!(envelope.data["record_count"], 2);
            let persons = envelope.data["persons"].as_array().cloned().unwrap_or_default();
            assert!(!persons.is_empty());
            for person in persons {
                assert_eq!(person["fully_paid"], true);
            }
        }
    }
}

#[test]
fn window_export_writes_a_csv_table() {
    let home = temp_home();
    assert!(home.is_ok());
    if let Ok((_dir, home_path)) = home {
        submit_at(
            &home_path,
            r#"{"amount": 100, "taker": "张三", "order_date": "2024.5.1", "content": "a"}"#,
            true,
            WINDOW_START_MS + 1_000,
        );

        let export_path = home_path.join("window.csv");
        let result = run_window(
            &home_path,
            false,
            Some(export_path.display().to_string()),
        );
        assert!(result.is_ok());

        let body = fs::read_to_string(&export_path);
        assert!(body.is_ok());
        if let Ok(contents) = body {
            assert!(contents.starts_with("name,total,share_count,fully_paid"));
            assert!(contents.contains("张三"));
        }
    }
}

#[test]
fn month_selector_always_offers_the_current_beijing_month() {
    let home = temp_home();
    assert!(home.is_ok());
    if let Ok((_dir, home_path)) = home {
        let result = run_month(&home_path, None, None);
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            let months = envelope.data["months"].as_array().cloned().unwrap_or_default();
            assert_eq!(months, vec![Value::from("2026-02")]);
            assert_eq!(envelope.data["month"], "2026-02");
            assert_eq!(envelope.data["buckets"][0]["record_count"], 0);
        }
    }
}

#[test]
fn month_report_buckets_free_text_dates() {
    let home = temp_home();
    assert!(home.is_ok());
    if let Ok((_dir, home_path)) = home {
        submit_at(
            &home_path,
            r#"{"amount": 100, "taker": "张三", "order_date": "2024.5.1", "content": "a"}"#,
            true,
            NOW_MS,
        );
        submit_at(
            &home_path,
            r#"{"amount": 100, "taker": "李四", "order_date": "5月3日", "content": "b"}"#,
            true,
            NOW_MS,
        );
        submit_at(
            &home_path,
            r#"{"amount": 100, "taker": "王五", "order_date": "下周结算", "content": "c"}"#,
            true,
            NOW_MS,
        );

        let all = run_month(&home_path, Some("all"), None);
        assert!(all.is_ok());
        if let Ok(envelope) = all {
            let bucket_names: Vec<String> = envelope.data["buckets"]
                .as_array()
                .map(|buckets| {
                    buckets
                        .iter()
                        .filter_map(|bucket| bucket["month"].as_str())
                        .map(std::string::ToString::to_string)
                        .collect()
                })
                .unwrap_or_default();
            // 5月3日 borrows the current Beijing year; unknown dates land last.
            assert_eq!(bucket_names, vec!["2026-05", "2024-05", "Unknown"]);

            let months = envelope.data["months"].as_array().cloned().unwrap_or_default();
            assert!(months.contains(&Value::from("2026-02")));
            assert!(months.contains(&Value::from("2024-05")));
            assert!(!months.contains(&Value::from("Unknown")));
        }

        let single = run_month(&home_path, Some("2024-05"), None);
        assert!(single.is_ok());
        if let Ok(envelope) = single {
            assert_eq!(envelope.data["buckets"][0]["month"], "2024-05");
            assert_eq!(envelope.data["buckets"][0]["record_count"], 1);
            let names = envelope.data["buckets"][0]["persons"]
                .as_array()
                .map(|persons| {
                    persons
                        .iter()
                        .filter_map(|person| person["name"].as_str())
                        .map(std::string::ToString::to_string)
                        .collect::<Vec<String>>()
                })
                .unwrap_or_default();
            assert!(names.contains(&"张三".to_string()));
        }

        let invalid = run_month(&home_path, Some("2024-5"), None);
        assert!(invalid.is_err());
    }
}

#[test]
fn month_report_excludes_pending_records() {
    let home = temp_home();
    assert!(home.is_ok());
    if let Ok((_dir, home_path)) = home {
        submit_at(
            &home_path,
            r#"{"amount": 100, "taker": "张三", "order_date": "2026.2.1", "content": "a"}"#,
            true,
            NOW_MS,
        );
        submit_at(
            &home_path,
            r#"{"amount": 100, "taker": "李四", "order_date": "2026.2.2", "content": "b"}"#,
            false,
            NOW_MS,
        );

        let result = run_month(&home_path, Some("2026-02"), None);
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            let bucket = &envelope.data["buckets"][0];
            assert_eq!(bucket["record_count"], 1);
            assert_eq!(bucket["taker_total"], Value::from(80.0));
            let names: Vec<String> = bucket["persons"]
                .as_array()
                .map(|persons| {
                    persons
                        .iter()
                        .filter_map(|person| person["name"].as_str())
                        .map(std::string::ToString::to_string)
                        .collect()
                })
                .unwrap_or_default();
            assert!(names.contains(&"张三".to_string()));
            assert!(!names.contains(&"李四".to_string()));
        }
    }
}

#[test]
fn month_export_writes_bucketed_rows() {
    let home = temp_home();
    assert!(home.is_ok());
    if let Ok((_dir, home_path)) = home {
        submit_at(
            &home_path,
            r#"{"amount": 100, "taker": "张三", "order_date": "2024.5.1", "content": "a"}"#,
            true,
            NOW_MS,
        );

        let export_path = home_path.join("month.csv");
        let result = run_month(
            &home_path,
            Some("2024-05"),
            Some(export_path.display().to_string()),
        );
        assert!(result.is_ok());

        let body = fs::read_to_string(&export_path);
        assert!(body.is_ok());
        if let Ok(contents) = body {
            assert!(contents.starts_with("month,name,total,share_count,fully_paid"));
            assert!(contents.contains("2024-05"));
        }
    }
}
