//! Header and row parsing for the two iostat table schemas.

use crate::metrics::data::{Observation, Schema, TableKind, CPU_ENTITY};

/// First token of a block-device table header.
const DEVICE_MARKER: &str = "Device:";

/// First token of an average-CPU table header.
const CPU_MARKER: &str = "avg-cpu:";

/// Characters that are unsafe in a metric-path segment.
const UNSAFE_CHARS: [char; 3] = ['/', '-', '%'];

/// Replace every unsafe character in a column token with '_'.
fn sanitize_column(token: &str) -> String {
    token
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Try to interpret a line as a table header.
///
/// Returns `None` when the first whitespace-separated token is not one of
/// the two recognized header markers, or when the marker carries no column
/// tokens. An unrecognized line is a normal outcome, not an error.
pub fn extract_schema(line: &str) -> Option<Schema> {
    let mut parts = line.split_whitespace();
    let kind = match parts.next() {
        Some(DEVICE_MARKER) => TableKind::Device,
        Some(CPU_MARKER) => TableKind::Cpu,
        _ => return None,
    };

    let columns: Vec<String> = parts.map(sanitize_column).collect();
    if columns.is_empty() {
        return None;
    }

    Some(Schema { kind, columns })
}

/// Classify a line against the active schema and extract its observations.
///
/// A line with `len(columns) + 1` tokens is a device row (first token is the
/// device name); a line with exactly `len(columns)` tokens is a CPU row
/// (entity `"cpu"`). Anything else, including blank lines, yields an empty
/// vec -- the caller treats that as the end of the current data block.
pub fn extract_observations(line: &str, schema: &Schema) -> Vec<Observation> {
    if line.trim().is_empty() {
        return Vec::new();
    }
    tracing::debug!("data line: {}", line.trim_end());

    let parts: Vec<&str> = line.split_whitespace().collect();
    let (entity, values) = if parts.len() == schema.len() + 1 {
        (parts[0], &parts[1..])
    } else if parts.len() == schema.len() {
        (CPU_ENTITY, &parts[..])
    } else {
        return Vec::new();
    };

    values
        .iter()
        .zip(&schema.columns)
        .map(|(value, metric)| Observation {
            entity: entity.to_string(),
            metric: metric.clone(),
            value: value.to_string(),
        })
        .collect()
}
