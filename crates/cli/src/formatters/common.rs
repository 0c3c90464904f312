//! Helpers shared by the formatters: missing-value marker, CSV quoting, and
//! writing results to stdout or a file.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::OutputFormat;

/// Shown in table and CSV cells for absent or empty values.
pub const DEFAULT_MISSING_VALUE: &str = "N/A";

pub fn format_missing(value: Option<&str>) -> &str {
    value
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_MISSING_VALUE)
}

/// RFC 4180 quoting: fields with a comma, quote, or line break are wrapped in
/// quotes and inner quotes are doubled.
pub fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_line<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|f| escape_csv(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

pub fn build_csv_header(fields: &[&str]) -> String {
    csv_line(fields)
}

pub fn build_csv_row(values: &[String]) -> String {
    csv_line(values)
}

/// Print `output` to stdout, or write it to `output_file` and note that on stderr.
pub fn output_result(
    output: &str,
    format: OutputFormat,
    output_file: Option<&PathBuf>,
) -> Result<()> {
    match output_file {
        Some(path) => {
            write_to_file(output, path)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            eprintln!("Results written to {} ({format:?} format)", path.display());
        }
        None if output.ends_with('\n') => print!("{output}"),
        None => println!("{output}"),
    }
    Ok(())
}

/// Replace `path` atomically via a temp file in the same directory, creating
/// missing parent directories first.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in: {}", dir.display()))?;
    temp.write_all(content.as_bytes())
        .and_then(|_| temp.flush())
        .context("Failed to write temp file")?;
    temp.persist(path)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
}
