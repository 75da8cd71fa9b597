//! Data structures for parsed iostat samples.

use serde::{Deserialize, Serialize};

/// Entity name used for rows of the average-CPU table.
pub const CPU_ENTITY: &str = "cpu";

/// Which of the two iostat tables a schema describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    /// Per-block-device statistics (`Device:` header)
    Device,
    /// Average CPU statistics (`avg-cpu:` header)
    Cpu,
}

/// The column layout announced by the most recent header line.
///
/// Column names are sanitized so they are safe as metric-path segments;
/// a schema always has at least one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Which table the columns belong to
    pub kind: TableKind,
    /// Ordered, sanitized column names
    pub columns: Vec<String>,
}

impl Schema {
    /// Number of value columns a data row of this schema carries.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True if the schema has no columns. Never the case for schemas
    /// produced by [`extract_schema`](crate::metrics::parser::extract_schema).
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One (entity, metric, value) triple extracted from a data row.
///
/// The value is relayed as the original text token; this crate is a
/// transparent relay, not a numeric validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Device name (e.g. "sda"), or [`CPU_ENTITY`] for CPU rows
    pub entity: String,
    /// Sanitized column name (e.g. "r_s")
    pub metric: String,
    /// Raw value token (e.g. "1.00")
    pub value: String,
}
