use std::cmp::Ordering;
use std::collections::HashMap;

use crate::contracts::types::PersonTotalRow;
use crate::engine::names;

const DAY_MS: i64 = 86_400_000;
const BEIJING_OFFSET_MS: i64 = 8 * 3_600 * 1_000;
const ROLLING_WINDOW_DAYS: i64 = 3;

/// Inclusive bounds of the rolling payout window: the three full UTC+8 days
/// before today, ending one millisecond before today's Beijing midnight.
pub fn rolling_window(now_ms: i64) -> (i64, i64) {
    let shifted = now_ms + BEIJING_OFFSET_MS;
    let midnight_shifted = shifted.div_euclid(DAY_MS) * DAY_MS;
    let midnight = midnight_shifted - BEIJING_OFFSET_MS;
    (midnight - ROLLING_WINDOW_DAYS * DAY_MS, midnight - 1)
}

/// One record's contribution to person totals: the three role names with
/// their distribution shares, plus the record status for the paid flag.
#[derive(Debug, Clone)]
pub struct ShareSource {
    pub taker: String,
    pub controller: String,
    pub superior: String,
    pub dist_taker: f64,
    pub dist_controller: f64,
    pub dist_superior: f64,
    pub status: String,
}

/// Folds records into per-person totals. A record feeds up to three person
/// buckets, one per role; placeholder names and non-positive shares are
/// skipped. A person is fully paid only when every record they drew a share
/// from is paid. Output is ranked by total descending, first-seen order on
/// ties.
pub fn aggregate_person_totals(rows: &[ShareSource]) -> Vec<PersonTotalRow> {
    let mut totals: Vec<PersonTotalRow> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let record_paid = row.status == "paid";
        let contributions = [
            (row.taker.as_str(), row.dist_taker),
            (row.controller.as_str(), row.dist_controller),
            (row.superior.as_str(), row.dist_superior),
        ];

        for (name, share) in contributions {
            if share <= 0.0 || !names::is_effective_person(name) {
                continue;
            }

            let key = names::aggregation_key(name);
            let index = match index_by_key.get(&key) {
                Some(existing) => *existing,
                None => {
                    totals.push(PersonTotalRow {
                        name: key.clone(),
                        total: 0.0,
                        share_count: 0,
                        fully_paid: true,
                    });
                    let created = totals.len() - 1;
                    index_by_key.insert(key, created);
                    created
                }
            };

            totals[index].total += share;
            totals[index].share_count += 1;
            totals[index].fully_paid = totals[index].fully_paid && record_paid;
        }
    }

    totals.sort_by(|left, right| {
        right
            .total
            .partial_cmp(&left.total)
            .unwrap_or(Ordering::Equal)
    });
    totals
}

#[cfg(test)]
mod tests {
    use super::{ShareSource, aggregate_person_totals, rolling_window};

    fn share(
        taker: &str,
        controller: &str,
        superior: &str,
        amounts: (f64, f64, f64),
        status: &str,
    ) -> ShareSource {
        ShareSource {
            taker: taker.to_string(),
            controller: controller.to_string(),
            superior: superior.to_string(),
            dist_taker: amounts.0,
            dist_controller: amounts.1,
            dist_superior: amounts.2,
            status: status.to_string(),
        }
    }

    #[test]
    fn window_covers_three_full_beijing_days() {
        // 2026-01-31T20:00:00Z is 2026-02-01 04:00 in Beijing.
        let now = 1_769_889_600_000;
        let (start, end) = rolling_window(now);
        assert_eq!(start, 1_769_616_000_000);
        assert_eq!(end, 1_769_875_199_999);
        assert_eq!(end - start, 3 * 86_400_000 - 1);
    }

    #[test]
    fn one_person_in_two_roles_merges_into_one_bucket() {
        let rows = vec![share("张三", "张 三", "李四", (80.0, 3.0, 1.0), "approved")];
        let totals = aggregate_person_totals(&rows);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].name, "张三");
        assert!((totals[0].total - 83.0).abs() < 1e-9);
        assert_eq!(totals[0].share_count, 2);
    }

    #[test]
    fn placeholder_names_and_zero_shares_are_skipped() {
        let rows = vec![share("张三", "无", "未知", (80.0, 3.0, 0.0), "approved")];
        let totals = aggregate_person_totals(&rows);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].name, "张三");
    }

    #[test]
    fn fully_paid_requires_every_contributing_record_paid() {
        let rows = vec![
            share("张三", "李四", "无", (80.0, 3.0, 0.0), "paid"),
            share("张三", "王五", "无", (40.0, 1.5, 0.0), "approved"),
        ];
        let totals = aggregate_person_totals(&rows);
        let zhang = totals.iter().find(|person| person.name == "张三");
        assert!(zhang.is_some());
        if let Some(person) = zhang {
            assert!(!person.fully_paid);
        }
        let li = totals.iter().find(|person| person.name == "李四");
        assert!(li.is_some());
        if let Some(person) = li {
            assert!(person.fully_paid);
        }
    }

    #[test]
    fn ranking_is_descending_with_stable_ties() {
        let rows = vec![
            share("A", "B", "无", (10.0, 10.0, 0.0), "approved"),
            share("C", "无", "无", (30.0, 0.0, 0.0), "approved"),
        ];
        let totals = aggregate_person_totals(&rows);
        let order: Vec<&str> = totals.iter().map(|person| person.name.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }
}
