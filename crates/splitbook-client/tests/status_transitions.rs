use std::path::{Path, PathBuf};

use rusqlite::Connection;
use splitbook_client::commands::records;
use splitbook_client::commands::records::{ListOptions, MutateOptions};
use splitbook_client::commands::submit;
use splitbook_client::commands::submit::SubmitOptions;
use tempfile::tempdir;

const NOW_MS: i64 = 1_769_889_600_000;

fn temp_home() -> std::io::Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempdir()?;
    let home = dir.path().join("ledger-home");
    Ok((dir, home))
}

fn mutate(home: &Path) -> MutateOptions<'_> {
    MutateOptions {
        home_override: Some(home),
    }
}

fn submit_one(
    home: &Path,
    payee: &str,
    order_date: &str,
    approve: bool,
) -> Option<String> {
    let body = format!(
        r#"{{"amount": 100, "taker": "{payee}", "order_date": "{order_date}", "content": "单"}}"#
    );
    let result = submit::run_with_options(SubmitOptions {
        path: None,
        dry_run: false,
        approve,
        replace_record_id: None,
        home_override: Some(home),
        stdin_override: Some(body),
        now_override: Some(NOW_MS),
    });
    assert!(result.is_ok());
    result.ok().and_then(|envelope| {
        envelope.data["records"][0]["record_id"]
            .as_str()
            .map(std::string::ToString::to_string)
    })
}

fn status_count(home: &Path, status: &str) -> i64 {
    let connection = Connection::open(home.join("ledger.db"));
    assert!(connection.is_ok());
    if let Ok(conn) = connection {
        let value = conn.query_row(
            "SELECT COUNT(*) FROM internal_records WHERE status = ?1",
            [status],
            |row| row.get::<_, i64>(0),
        );
        assert!(value.is_ok());
        if let Ok(count) = value {
            return count;
        }
    }
    0
}

#[test]
fn lifecycle_walks_pending_approved_paid() {
    let home = temp_home();
    assert!(home.is_ok());
    if let Ok((_dir, home_path)) = home {
        let record_id = submit_one(&home_path, "张三", "2024.5.1", false);
        assert!(record_id.is_some());
        if let Some(id) = record_id {
            assert!(records::approve_with_options(vec![id.clone()], mutate(&home_path)).is_ok());
            assert_eq!(status_count(&home_path, "approved"), 1);

            assert!(records::mark_paid_with_options(vec![id.clone()], mutate(&home_path)).is_ok());
            assert_eq!(status_count(&home_path, "paid"), 1);

            // Paid is terminal short of a hard delete.
            let rejected = records::reject_with_options(vec![id], None, mutate(&home_path));
            assert!(rejected.is_err());
            if let Err(error) = rejected {
                assert_eq!(error.code, "invalid_status_transition");
            }
        }
    }
}

#[test]
fn pending_records_cannot_be_paid_directly() {
    let home = temp_home();
    assert!(home.is_ok());
    if let Ok((_dir, home_path)) = home {
        let record_id = submit_one(&home_path, "张三", "2024.5.1", false);
        assert!(record_id.is_some());
        if let Some(id) = record_id {
            let result = records::mark_paid_with_options(vec![id], mutate(&home_path));
            assert!(result.is_err());
            if let Err(error) = result {
                assert_eq!(error.code, "invalid_status_transition");
            }
        }
    }
}

#[test]
fn mixed_status_batch_fails_without_changing_any_row() {
    let home = temp_home();
    assert!(home.is_ok());
    if let Ok((_dir, home_path)) = home {
        let pending_id = submit_one(&home_path, "张三", "2024.5.1", false);
        let approved_id = submit_one(&home_path, "李四", "2024.5.2", true);
        assert!(pending_id.is_some());
        assert!(approved_id.is_some());

        if let (Some(pending), Some(approved)) = (pending_id, approved_id) {
            let result =
                records::approve_with_options(vec![pending, approved], mutate(&home_path));
            assert!(result.is_err());
            if let Err(error) = result {
                assert_eq!(error.code, "invalid_status_transition");
            }
        }

        assert_eq!(status_count(&home_path, "pending"), 1);
        assert_eq!(status_count(&home_path, "approved"), 1);
    }
}

#[test]
fn reject_records_the_reason_in_notes() {
    let home = temp_home();
    assert!(home.is_ok());
    if let Ok((_dir, home_path)) = home {
        let record_id = submit_one(&home_path, "张三", "2024.5.1", false);
        assert!(record_id.is_some());
        if let Some(id) = record_id {
            let result = records::reject_with_options(
                vec![id],
                Some("截图模糊".to_string()),
                mutate(&home_path),
            );
            assert!(result.is_ok());

            let listed = records::list_with_options(ListOptions {
                status: Some("rejected".to_string()),
                search: None,
                home_override: Some(&home_path),
            });
            assert!(listed.is_ok());
            if let Ok(envelope) = listed {
                assert_eq!(envelope.data["total"], 1);
                assert_eq!(envelope.data["rows"][0]["notes"], "截图模糊");
            }
        }
    }
}

#[test]
fn list_filters_by_status_and_search_term() {
    let home = temp_home();
    assert!(home.is_ok());
    if let Ok((_dir, home_path)) = home {
        assert!(submit_one(&home_path, "张三", "2024.5.1", false).is_some());
        assert!(submit_one(&home_path, "Bob Smith", "2024.5.2", true).is_some());

        let by_status = records::list_with_options(ListOptions {
            status: Some("approved".to_string()),
            search: None,
            home_override: Some(&home_path),
        });
        assert!(by_status.is_ok());
        if let Ok(envelope) = by_status {
            assert_eq!(envelope.data["total"], 1);
            assert_eq!(envelope.data["rows"][0]["taker"], "Bob Smith");
        }

        let by_search = records::list_with_options(ListOptions {
            status: None,
            search: Some("bob".to_string()),
            home_override: Some(&home_path),
        });
        assert!(by_search.is_ok());
        if let Ok(envelope) = by_search {
            assert_eq!(envelope.data["total"], 1);
        }

        let bad_status = records::list_with_options(ListOptions {
            status: Some("archived".to_string()),
            search: None,
            home_override: Some(&home_path),
        });
        assert!(bad_status.is_err());
    }
}

#[test]
fn delete_and_purge_remove_rows_for_good() {
    let home = temp_home();
    assert!(home.is_ok());
    if let Ok((_dir, home_path)) = home {
        let first = submit_one(&home_path, "张三", "2024.5.1", false);
        let second = submit_one(&home_path, "李四", "2024.5.2", false);
        assert!(first.is_some());
        assert!(second.is_some());

        if let Some(id) = first {
            assert!(records::delete_with_options(vec![id], mutate(&home_path)).is_ok());
        }
        if let Some(id) = second {
            assert!(
                records::reject_with_options(vec![id], None, mutate(&home_path)).is_ok()
            );
        }

        let purge = records::purge_rejected_with_options(mutate(&home_path));
        assert!(purge.is_ok());
        if let Ok(envelope) = purge {
            assert_eq!(envelope.data["purged"], 1);
        }

        assert_eq!(status_count(&home_path, "pending"), 0);
        assert_eq!(status_count(&home_path, "rejected"), 0);
    }
}

#[test]
fn unknown_record_id_fails_the_whole_batch() {
    let home = temp_home();
    assert!(home.is_ok());
    if let Ok((_dir, home_path)) = home {
        let record_id = submit_one(&home_path, "张三", "2024.5.1", false);
        assert!(record_id.is_some());
        if let Some(id) = record_id {
            let result = records::approve_with_options(
                vec![id, "rec_missing".to_string()],
                mutate(&home_path),
            );
            assert!(result.is_err());
            if let Err(error) = result {
                assert_eq!(error.code, "record_not_found");
            }
        }
        assert_eq!(status_count(&home_path, "pending"), 1);
    }
}
