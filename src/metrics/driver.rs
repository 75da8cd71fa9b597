//! State machine driving the line-by-line translation of the iostat stream.

use crate::metrics::data::{Observation, Schema, TableKind};
use crate::metrics::parser::{extract_observations, extract_schema};

/// Parser state across input lines.
///
/// iostat re-announces its headers on every sampling interval, with the
/// device and CPU tables alternating and blank lines in between, so the
/// driver flips between looking for a header and consuming rows of the
/// schema it last saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverState {
    /// No schema in effect; data lines are ignored until a header arrives
    AwaitingHeader,
    /// Rows are interpreted against this schema until a line breaks shape
    HaveSchema(Schema),
}

/// Feeds each incoming line to the header or row parser depending on state
/// and yields the observations produced.
#[derive(Debug)]
pub struct SampleDriver {
    state: DriverState,
    track_cpu: bool,
}

impl SampleDriver {
    /// Create a driver. When `track_cpu` is false, CPU table headers are
    /// discarded and their data rows never match a schema.
    pub fn new(track_cpu: bool) -> Self {
        Self {
            state: DriverState::AwaitingHeader,
            track_cpu,
        }
    }

    /// Current parser state, for inspection in tests.
    pub fn state(&self) -> &DriverState {
        &self.state
    }

    /// Process one line of iostat output.
    ///
    /// Returns the observations extracted from the line (empty for headers,
    /// blank separators, and anything that does not fit the active schema).
    /// A non-row line while a schema is active resets the driver to header
    /// seeking so the next header of either table is re-acquired instead of
    /// being mis-read as data.
    pub fn process_line(&mut self, line: &str) -> Vec<Observation> {
        match &self.state {
            DriverState::AwaitingHeader => {
                if let Some(schema) = extract_schema(line) {
                    if schema.kind == TableKind::Cpu && !self.track_cpu {
                        tracing::debug!("CPU tracking disabled, skipping avg-cpu header");
                    } else {
                        tracing::debug!("schema acquired: {:?} {:?}", schema.kind, schema.columns);
                        self.state = DriverState::HaveSchema(schema);
                    }
                }
                Vec::new()
            }
            DriverState::HaveSchema(schema) => {
                let observations = extract_observations(line, schema);
                if observations.is_empty() {
                    // Blank separator, next header, or a malformed row: the
                    // current data block is over either way.
                    self.state = DriverState::AwaitingHeader;
                }
                observations
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_awaits_header() {
        let driver = SampleDriver::new(false);
        assert_eq!(*driver.state(), DriverState::AwaitingHeader);
    }

    #[test]
    fn test_header_installs_schema() {
        let mut driver = SampleDriver::new(false);
        assert!(driver.process_line("Device:  r/s  w/s").is_empty());
        match driver.state() {
            DriverState::HaveSchema(schema) => {
                assert_eq!(schema.columns, vec!["r_s", "w_s"]);
            }
            other => panic!("expected HaveSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_rows_keep_schema_active() {
        let mut driver = SampleDriver::new(false);
        driver.process_line("Device:  r/s  w/s");
        let obs = driver.process_line("sda  1.00  2.00");
        assert_eq!(obs.len(), 2);
        let obs = driver.process_line("sdb  3.00  4.00");
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].entity, "sdb");
        assert!(matches!(driver.state(), DriverState::HaveSchema(_)));
    }

    #[test]
    fn test_blank_line_resets_to_header_seeking() {
        let mut driver = SampleDriver::new(false);
        driver.process_line("Device:  r/s  w/s");
        driver.process_line("sda  1.00  2.00");
        assert!(driver.process_line("").is_empty());
        assert_eq!(*driver.state(), DriverState::AwaitingHeader);
    }

    #[test]
    fn test_mismatched_row_resets_and_header_reacquired() {
        let mut driver = SampleDriver::new(false);
        driver.process_line("Device:  r/s  w/s");
        // Wrong token count: no observations, schema forgotten.
        assert!(driver.process_line("sda  1.00  2.00  3.00  4.00").is_empty());
        assert_eq!(*driver.state(), DriverState::AwaitingHeader);
        // The next header must be accepted again.
        driver.process_line("Device:  r/s");
        let obs = driver.process_line("sda  9.00");
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].value, "9.00");
    }

    #[test]
    fn test_cpu_opt_out_ignores_cpu_table() {
        let mut driver = SampleDriver::new(false);
        driver.process_line("avg-cpu:  %user  %system");
        assert_eq!(*driver.state(), DriverState::AwaitingHeader);
        // CPU data rows fall through without a schema.
        assert!(driver.process_line("  0.50  1.25").is_empty());
        assert_eq!(*driver.state(), DriverState::AwaitingHeader);
        // The device table is still tracked afterwards.
        driver.process_line("Device:  r/s");
        assert_eq!(driver.process_line("sda  1.00").len(), 1);
    }

    #[test]
    fn test_cpu_tracking_enabled() {
        let mut driver = SampleDriver::new(true);
        driver.process_line("avg-cpu:  %user  %system");
        let obs = driver.process_line("  0.50  1.25");
        assert_eq!(obs.len(), 2);
        assert!(obs.iter().all(|o| o.entity == "cpu"));
        assert_eq!(obs[0].metric, "_user");
    }

    #[test]
    fn test_alternating_tables_one_interval() {
        let mut driver = SampleDriver::new(true);
        let lines = [
            "Linux 6.1.0 (host1) \t08/29/26 \t_x86_64_\t(4 CPU)",
            "",
            "avg-cpu:  %user   %nice %system %iowait  %steal   %idle",
            "           0.50    0.00    0.25    0.10    0.00   99.15",
            "",
            "Device:         rrqm/s   wrqm/s     r/s     w/s",
            "sda               0.00     1.00    2.00    3.00",
            "sdb               0.00     0.00    0.00    0.00",
            "",
        ];
        let total: usize = lines
            .iter()
            .map(|line| driver.process_line(line).len())
            .sum();
        // 6 CPU metrics + 2 devices x 4 columns.
        assert_eq!(total, 14);
        assert_eq!(*driver.state(), DriverState::AwaitingHeader);
    }

    #[test]
    fn test_header_without_blank_separator_still_reacquired() {
        // A future data source might omit the blank line between blocks;
        // the shape mismatch itself must trigger re-acquisition. The
        // header line that caused the reset is consumed, so the next one
        // is the one that installs the schema.
        let mut driver = SampleDriver::new(false);
        driver.process_line("Device:  r/s  w/s");
        driver.process_line("sda  1.00  2.00");
        assert!(driver.process_line("Device:  r/s  w/s  rkB/s").is_empty());
        assert_eq!(*driver.state(), DriverState::AwaitingHeader);
        driver.process_line("Device:  r/s  w/s  rkB/s");
        assert_eq!(driver.process_line("sda  1.0  2.0  3.0").len(), 3);
    }
}
