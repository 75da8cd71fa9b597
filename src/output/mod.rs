//! Rendering and delivery of metric lines.
//!
//! Two wire formats are produced:
//!
//! - collectd exec-plugin plain-text protocol. Lines begin with `PUTVAL`,
//!   use the gauge type, and carry `N:<value>` where `N` translates to
//!   epoch time inside collectd.
//! - graphite line protocol with a `host='...'` tag.
//!
//! Lines are always printed to stdout; graphite lines are additionally sent
//! to the agent when transmission is enabled, one short-lived TCP connection
//! per line. No batching, no retry.

pub mod config;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::{RelayError, Result};
use crate::metrics::data::Observation;
pub use config::OutputConfig;

/// Which metrics agent the output lines are written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum AgentKind {
    /// collectd exec-plugin plain-text protocol
    Collectd,
    /// graphite line protocol
    Graphite,
}

/// Render one observation as a single output line (without newline).
pub fn format_observation(obs: &Observation, hostname: &str, agent: AgentKind) -> String {
    match agent {
        AgentKind::Collectd => format!(
            "PUTVAL {}/iostat/gauge-{}/{} N:{}",
            hostname, obs.entity, obs.metric, obs.value
        ),
        AgentKind::Graphite => format!(
            "iostat.{}.{} {} host='{}'",
            obs.entity, obs.metric, obs.value, hostname
        ),
    }
}

/// Writes rendered metric lines to stdout and, optionally, to the agent.
#[derive(Debug, Clone)]
pub struct Emitter {
    config: OutputConfig,
}

impl Emitter {
    /// Create an emitter for the given output configuration.
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// The configuration this emitter was built with.
    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Render and deliver one observation.
    ///
    /// A transport failure is fatal for this single emission attempt; there
    /// is no retry and no queueing.
    pub async fn emit(&self, obs: &Observation) -> Result<()> {
        let line = format_observation(obs, &self.config.hostname, self.config.agent);
        if self.config.emit && self.config.agent == AgentKind::Graphite {
            self.transmit_line(&line).await?;
        }
        println!("{}", line);
        Ok(())
    }

    /// Send one line to the agent over a fresh TCP connection.
    async fn transmit_line(&self, line: &str) -> Result<()> {
        let address = self.config.agent_address();
        debug!("sending to {}: {}", address, line);
        let mut stream = TcpStream::connect(&address)
            .await
            .map_err(|e| RelayError::transport_error(format!("connect {}: {}", address, e)))?;
        stream
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .map_err(|e| RelayError::transport_error(format!("send to {}: {}", address, e)))?;
        stream.shutdown().await.ok();
        Ok(())
    }
}
