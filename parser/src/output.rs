//! Output formatting for parsed records.

use netstat_schema_core::{Record, RecordKind, SocketFamily};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Table,
}

/// Formats records in the requested output format.
///
/// # Errors
///
/// Returns a serialization error if JSON or YAML encoding fails.
pub fn format_records(records: &[Record], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(records)?),
        OutputFormat::Table => Ok(records_to_table(records)),
    }
}

fn table_title(kind: RecordKind, family: Option<SocketFamily>) -> String {
    match family {
        Some(SocketFamily::Unix) => format!("{kind} (unix)"),
        Some(SocketFamily::KernelControlModule) => format!("{kind} (kernel control modules)"),
        Some(SocketFamily::KernelEvent) => format!("{kind} (kernel event)"),
        Some(SocketFamily::KernelControl) => format!("{kind} (kernel control)"),
        None => kind.to_string(),
    }
}

/// Renders one aligned table per run of records of the same kind and family.
fn records_to_table(records: &[Record]) -> String {
    let mut out = String::new();

    for group in records.chunk_by(|a, b| a.kind() == b.kind() && a.socket_family() == b.socket_family())
    {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&table_title(group[0].kind(), group[0].socket_family()));
        out.push_str(":\n");

        let mut columns: Vec<&str> = Vec::new();
        for record in group {
            for (key, _) in record.fields().entries() {
                if !columns.contains(&key) {
                    columns.push(key);
                }
            }
        }

        let rows: Vec<Vec<String>> = group
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|key| record.get(key).map_or_else(|| "-".to_string(), |v| v.to_string()))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                rows.iter()
                    .map(|row| row[idx].len())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        push_row(&mut out, columns.iter().copied(), &widths);
        for row in &rows {
            push_row(&mut out, row.iter().map(String::as_str), &widths);
        }
    }

    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
