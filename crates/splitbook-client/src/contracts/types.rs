use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DataRange {
    pub earliest: Option<i64>,
    pub latest: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionBreakdown {
    pub taker: f64,
    pub controller: f64,
    pub superior: f64,
    pub pool: f64,
    pub platform: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionPercentages {
    pub taker: f64,
    pub controller: f64,
    pub superior: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordRow {
    pub record_id: String,
    pub submission_id: String,
    pub submitted_at: i64,
    pub status: String,
    pub amount: f64,
    pub taker: String,
    pub controller: String,
    pub superior: String,
    pub order_date: String,
    pub content: String,
    pub distribution: DistributionBreakdown,
    pub percentages: DistributionPercentages,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitSummary {
    pub payees: i64,
    pub records_inserted: i64,
    pub gross_amount: f64,
    pub per_person_amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitData {
    pub dry_run: bool,
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    pub message: String,
    pub summary: SubmitSummary,
    pub records: Vec<RecordRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaced_record_id: Option<String>,
    pub source_used: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordsListData {
    pub total: i64,
    pub rows: Vec<RecordRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateData {
    pub status: String,
    pub updated: i64,
    pub record_ids: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordsDeleteData {
    pub deleted: i64,
    pub record_ids: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurgeRejectedData {
    pub purged: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonTotalRow {
    pub name: String,
    pub total: f64,
    pub share_count: i64,
    pub fully_paid: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowReportData {
    pub window_start: i64,
    pub window_end: i64,
    pub record_count: i64,
    pub grand_total: f64,
    pub persons: Vec<PersonTotalRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marked_paid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthBucketData {
    pub month: String,
    pub record_count: i64,
    pub total: f64,
    pub taker_total: f64,
    pub controller_total: f64,
    pub superior_total: f64,
    pub persons: Vec<PersonTotalRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthReportData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    pub months: Vec<String>,
    pub buckets: Vec<MonthBucketData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<String>,
}
