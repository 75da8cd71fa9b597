//! Output configuration.

use serde::{Deserialize, Serialize};

use crate::output::AgentKind;

/// Configuration for rendering and delivering metric lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Wire format to produce
    pub agent: AgentKind,
    /// Hostname reported in every metric line
    pub hostname: String,
    /// Address of the machine running the agent
    pub agent_host: String,
    /// Agent port receiving graphite lines
    pub agent_port: u16,
    /// Whether graphite lines are actually sent, or only printed
    pub emit: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            agent: AgentKind::Collectd,
            hostname: OutputConfig::reporting_hostname(None),
            agent_host: crate::DEFAULT_AGENT_HOST.to_string(),
            agent_port: crate::DEFAULT_AGENT_PORT,
            emit: false,
        }
    }
}

impl OutputConfig {
    /// Create a new output configuration for the given agent and hostname.
    pub fn new(agent: AgentKind, hostname: impl Into<String>) -> Self {
        Self {
            agent,
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    /// Set the agent address.
    pub fn with_agent_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.agent_host = host.into();
        self.agent_port = port;
        self
    }

    /// Enable or disable real transmission of graphite lines.
    pub fn with_emit(mut self, emit: bool) -> Self {
        self.emit = emit;
        self
    }

    /// Get the full agent address.
    pub fn agent_address(&self) -> String {
        format!("{}:{}", self.agent_host, self.agent_port)
    }

    /// Resolve the hostname to report.
    ///
    /// An explicit override is used verbatim; otherwise the OS hostname is
    /// used with dots replaced by underscores so it forms a single
    /// metric-path segment.
    pub fn reporting_hostname(override_name: Option<&str>) -> String {
        match override_name {
            Some(name) => name.to_string(),
            None => hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .unwrap_or_else(|| "unknown".to_string())
                .replace('.', "_"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OutputConfig::default();
        assert_eq!(config.agent, AgentKind::Collectd);
        assert_eq!(config.agent_host, crate::DEFAULT_AGENT_HOST);
        assert_eq!(config.agent_port, crate::DEFAULT_AGENT_PORT);
        assert!(!config.emit);
    }

    #[test]
    fn test_builder() {
        let config = OutputConfig::new(AgentKind::Graphite, "host1")
            .with_agent_address("10.0.0.5", 2003)
            .with_emit(true);
        assert_eq!(config.hostname, "host1");
        assert_eq!(config.agent_address(), "10.0.0.5:2003");
        assert!(config.emit);
    }

    #[test]
    fn test_hostname_override_is_verbatim() {
        assert_eq!(
            OutputConfig::reporting_hostname(Some("db1.example.com")),
            "db1.example.com"
        );
    }

    #[test]
    fn test_resolved_hostname_has_no_dots() {
        let name = OutputConfig::reporting_hostname(None);
        assert!(!name.is_empty());
        assert!(!name.contains('.'));
    }
}
