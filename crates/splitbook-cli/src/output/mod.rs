mod error_text;
mod format;
mod json;
mod mode;
mod records_text;
mod report_text;
mod submit_text;

use std::io;

use splitbook_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "submit" => submit_text::render_submit(&success.data),
        "records list" => records_text::render_list(&success.data),
        "records approve" | "records reject" | "records paid" => {
            records_text::render_status_update(&success.data)
        }
        "records delete" => records_text::render_delete(&success.data),
        "records purge-rejected" => records_text::render_purge_rejected(&success.data),
        "report window" => report_text::render_window(&success.data),
        "report month" => report_text::render_month(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
