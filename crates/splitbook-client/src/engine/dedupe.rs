use crate::engine::{datekey, names};

/// Two per-person amounts closer than this are considered the same order.
pub const AMOUNT_TOLERANCE: f64 = 0.01;

/// A stored record reduced to the fields duplicate matching needs. Rejected
/// records are filtered out before they get here.
#[derive(Debug, Clone)]
pub struct ExistingEntry {
    pub record_id: String,
    pub payee: String,
    pub order_date: String,
    pub amount: f64,
}

#[derive(Debug, Clone)]
pub struct DuplicateHit {
    pub payee: String,
    pub matched_record_id: String,
    pub matched_payee: String,
}

/// Checks every payee of an incoming batch against the existing corpus. The
/// first payee that collides on all three axes (equivalent date key,
/// case-insensitive whitespace-stripped name, amount within tolerance) blocks
/// the whole batch. `excluded_record_id` lets a replacement submission skip
/// the record it is replacing.
pub fn find_duplicate(
    payees: &[String],
    order_date: &str,
    per_person_amount: f64,
    existing: &[ExistingEntry],
    excluded_record_id: Option<&str>,
) -> Option<DuplicateHit> {
    for payee in payees {
        let payee_key = names::dedupe_key(payee);
        for entry in existing {
            if excluded_record_id.is_some_and(|excluded| excluded == entry.record_id) {
                continue;
            }
            if !datekey::keys_equal(order_date, &entry.order_date) {
                continue;
            }
            if names::dedupe_key(&entry.payee) != payee_key {
                continue;
            }
            if (per_person_amount - entry.amount).abs() < AMOUNT_TOLERANCE {
                return Some(DuplicateHit {
                    payee: payee.clone(),
                    matched_record_id: entry.record_id.clone(),
                    matched_payee: entry.payee.clone(),
                });
            }
        }
    }

    None
}
