use std::io::{self, Write};

/// Stdout writers that treat a closed pipe as success, so output piped into
/// `head` or a closed pager ends the process cleanly instead of panicking.
pub fn write_stdout_text(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    forgive_broken_pipe(stdout.write_all(text.as_bytes()))?;
    forgive_broken_pipe(stdout.flush())
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    forgive_broken_pipe(stdout.write_all(text.as_bytes()))?;
    forgive_broken_pipe(stdout.write_all(b"\n"))?;
    forgive_broken_pipe(stdout.flush())
}

fn forgive_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
