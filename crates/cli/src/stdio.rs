#![forbid(unsafe_code)]

use crate::dispatch::CatalogServer;
use serde_json::Value;
use std::io::{BufRead, Write};

fn write_newline_json<W: Write>(out: &mut W, resp: &Value) -> Result<(), Box<dyn std::error::Error>> {
    writeln!(out, "{}", serde_json::to_string(resp)?)?;
    out.flush()?;
    Ok(())
}

/// One request per line in, one response per line out, until EOF.
/// Lines are read as bytes so a line that is not UTF-8 gets its own error
/// response instead of ending the session.
pub(crate) fn serve_lines<R: BufRead, W: Write>(
    server: &mut CatalogServer,
    mut reader: R,
    out: &mut W,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut handled = 0usize;
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if let Some(resp) = server.handle_bytes(&line) {
            write_newline_json(out, &resp)?;
            handled += 1;
        }
    }
    Ok(handled)
}

pub(crate) fn run_stdio(server: &mut CatalogServer) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    let handled = serve_lines(server, stdin.lock(), &mut stdout)?;
    tracing::info!(requests = handled, "stdin closed; shutting down");
    Ok(())
}
