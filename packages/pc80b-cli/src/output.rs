use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Serialize `value` and write it to `path`, or to stdout when `path` is None.
///
/// Compact output is a single line, suitable for JSONL streams.
pub fn emit_json<T: Serialize>(
    value: &T,
    compact: bool,
    path: Option<&Path>,
) -> Result<(), String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .map_err(|e| format!("JSON serialization failed: {}", e))?;

    match path {
        Some(path) => std::fs::write(path, json)
            .map_err(|e| format!("Failed to write output file '{}': {}", path.display(), e)),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(json.as_bytes())
                .and_then(|_| handle.write_all(b"\n"))
                .map_err(|e| format!("Failed to write to stdout: {}", e))
        }
    }
}
