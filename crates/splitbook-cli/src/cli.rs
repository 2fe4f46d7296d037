use clap::{Parser, Subcommand};

pub fn parse_status_filter(value: &str) -> Result<String, String> {
    match value {
        "pending" | "approved" | "rejected" | "paid" => Ok(value.to_string()),
        _ => Err("status must be one of: pending, approved, rejected, paid".to_string()),
    }
}

pub fn parse_month_selector(value: &str) -> Result<String, String> {
    if value == "all" {
        return Ok(value.to_string());
    }

    let bytes = value.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return Err("month must use YYYY-MM format, or `all`".to_string());
    }
    for index in [0usize, 1, 2, 3, 5, 6] {
        if !bytes[index].is_ascii_digit() {
            return Err("month must use YYYY-MM format, or `all`".to_string());
        }
    }

    Ok(value.to_string())
}

/// Extended help shown after `splitbook submit --help`.
/// Contains workflow guidance, schema, and next-step instructions.
pub const SUBMIT_AFTER_HELP: &str = "\
How submit works:
  Splitbook does not read chat logs or order screenshots directly.
  You extract each order into one JSON object, then submit it.

  Accepted format:
    JSON, one top-level object describing a single order

  <path> is a local file path.
  To read stdin explicitly, use `-` as the path.
  Example: cat order.json | splitbook submit --dry-run -
  One submit call takes one order. For multiple orders, run
  multiple submit commands.

What to do next:
  1. Extract your order into the JSON shape below.
  2. Run `splitbook submit --dry-run <path>` and fix any reported issues.
  3. Run `splitbook submit <path>` once dry-run passes.

Submission schema:
  JSON example (one top-level object):
  {
    \"amount\": 300,
    \"taker\": \"张三, 李四, 王五\",
    \"controller\": \"赵六\",
    \"superior\": \"钱七\",
    \"order_date\": \"2026.5.1\",
    \"content\": \"奶茶三杯\",
    \"config\": {
      \"taker_percentage\": 80,
      \"controller_percentage\": 15,
      \"superior_percentage\": 5
    }
  }

Field rules (very explicit):
  amount (required):
    The gross order amount as a number, not text.
    Must be a finite number greater than zero.
    Example: `300`

  taker (required in practice):
    One payee name, or several separated by `,`, `，`, or `/`.
    Each payee gets an equal per-person share of the amount.
    An empty list falls back to the placeholder payee `未知`.
    Example: `张三, 李四/王五`

  controller (optional):
    The controller name. Absent markers (empty, `无`, `none`,
    `未知`, `unknown`) mean no controller person.

  superior (optional):
    The superior name. When absent, the superior share is zero
    and the platform keeps the remainder of the pool.

  order_date (optional):
    Free text. `2026.5.1`, `5/1`, `2026年5月` and similar all
    bucket into monthly reports. Blank or `无日期` means no date.

  content (optional):
    Free-text order description.

  config (optional):
    Percentage dials for the split. Omitted or null means the
    defaults: taker 80, controller 15, superior 5. When supplied,
    each missing or non-numeric member coerces to 0.
";

#[derive(Debug, Parser)]
#[command(
    name = "splitbook",
    version,
    about = "commission split ledger",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Submit one extracted order and record its per-payee splits
    #[command(after_long_help = SUBMIT_AFTER_HELP)]
    Submit {
        /// Validate and compute the splits without writing to the ledger
        #[arg(long)]
        dry_run: bool,
        /// Insert the new records as approved instead of pending
        #[arg(long)]
        approve: bool,
        /// Replace an existing record: delete it and submit in its place
        #[arg(long, value_name = "RECORD_ID")]
        replace: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
        /// Path to a JSON order file (use `-` for stdin)
        path: Option<String>,
    },
    /// Inspect and manage stored commission records
    #[command(arg_required_else_help = true)]
    Records {
        #[command(subcommand)]
        command: RecordsCommand,
    },
    /// Settlement and monthly reports over stored records
    #[command(arg_required_else_help = true)]
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum RecordsCommand {
    /// List stored records, newest first
    List {
        /// Filter by status: pending, approved, rejected, or paid
        #[arg(long, value_parser = parse_status_filter)]
        status: Option<String>,
        /// Case-insensitive text filter over names, content, and order date
        #[arg(long)]
        search: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Approve pending records
    Approve {
        /// One or more record IDs (e.g. rec_abc123)
        #[arg(required = true)]
        record_ids: Vec<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Reject pending or approved records
    Reject {
        /// One or more record IDs (e.g. rec_abc123)
        #[arg(required = true)]
        record_ids: Vec<String>,
        /// Reason stored in the record notes
        #[arg(long)]
        reason: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Mark approved records as paid
    Paid {
        /// One or more record IDs (e.g. rec_abc123)
        #[arg(required = true)]
        record_ids: Vec<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Permanently delete records regardless of status
    Delete {
        /// One or more record IDs (e.g. rec_abc123)
        #[arg(required = true)]
        record_ids: Vec<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Permanently delete every rejected record
    PurgeRejected {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ReportCommand {
    /// Per-person settlement totals over the rolling three-day window
    Window {
        /// Mark every approved record in the window as paid first
        #[arg(long)]
        mark_paid: bool,
        /// Write the per-person rows to a CSV file
        #[arg(long, value_name = "PATH")]
        export: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Per-person totals bucketed by order month
    Month {
        /// Month to report (YYYY-MM), or `all` for every bucket
        #[arg(long, value_parser = parse_month_selector)]
        month: Option<String>,
        /// Write the bucketed rows to a CSV file
        #[arg(long, value_name = "PATH")]
        export: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
