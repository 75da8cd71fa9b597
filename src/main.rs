//! iostat_relay - iostat to collectd/graphite bridge binary
//!
//! Runs iostat as a supervised child process and republishes each sample as
//! plain-text metric lines, in the style of a collectd exec plugin.

use anyhow::Context;
use clap::Parser;
use iostat_relay::{
    AgentKind, Emitter, IostatProcess, OutputConfig, SampleDriver, DEFAULT_AGENT_HOST,
    DEFAULT_AGENT_PORT, DEFAULT_DELAY_SECS, DEFAULT_IOSTAT_OPTIONS,
};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "iostat_relay")]
#[command(about = "Relay iostat samples to collectd or graphite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    long_about = "Spawns iostat, parses its device and CPU tables, and prints every \
                  sample as collectd PUTVAL lines or graphite metric lines"
)]
struct Cli {
    /// Track average CPU statistics in addition to block devices
    #[arg(short = 'c', long)]
    get_cpu: bool,

    /// Hostname to report instead of the actual one
    #[arg(short = 'n', long)]
    hostname: Option<String>,

    /// Options to pass to iostat
    #[arg(short = 'i', long, default_value = DEFAULT_IOSTAT_OPTIONS)]
    iostat_options: String,

    /// Delay between iostat queries, in seconds
    #[arg(short = 'd', long, default_value_t = DEFAULT_DELAY_SECS)]
    delay: u64,

    /// Wire format to produce
    #[arg(short = 'a', long, value_enum, default_value_t = AgentKind::Collectd)]
    agent: AgentKind,

    /// IP of the machine running the agent
    #[arg(short = 's', long, default_value = DEFAULT_AGENT_HOST)]
    host: String,

    /// Agent port receiving data
    #[arg(short = 'p', long, default_value_t = DEFAULT_AGENT_PORT)]
    port: u16,

    /// Send points to the agent for real instead of only printing them
    #[arg(short = 'e', long)]
    emit: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    init_logging(&cli)?;

    let code = run(&cli).await?;
    std::process::exit(code);
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Metric lines own stdout; diagnostics go to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Run the bridge until the stream ends. Returns the process exit code:
/// 0 after a requested termination, 1 if iostat stopped on its own.
async fn run(cli: &Cli) -> anyhow::Result<i32> {
    let hostname = OutputConfig::reporting_hostname(cli.hostname.as_deref());
    let config = OutputConfig::new(cli.agent, hostname)
        .with_agent_address(cli.host.clone(), cli.port)
        .with_emit(cli.emit);
    let emitter = Emitter::new(config);

    let mut process = IostatProcess::spawn(&cli.iostat_options, cli.delay)
        .context("failed to start iostat")?;
    let mut lines = process.lines()?;

    let mut sigint = signal(SignalKind::interrupt()).context("failed to install SIGINT handler")?;
    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

    let mut driver = SampleDriver::new(cli.get_cpu);
    let mut terminating = false;

    let code = loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        for obs in driver.process_line(&line) {
                            emitter.emit(&obs).await?;
                        }
                    }
                    None if terminating => {
                        info!("iostat terminated, exiting");
                        break 0;
                    }
                    None => {
                        error!("iostat closed its output unexpectedly");
                        break 1;
                    }
                }
            }
            _ = sigint.recv(), if !terminating => {
                info!("interrupt received, terminating iostat...");
                process.terminate();
                terminating = true;
            }
            _ = sigterm.recv(), if !terminating => {
                info!("terminate received, terminating iostat...");
                process.terminate();
                terminating = true;
            }
        }
    };

    // Reap the child so it never outlives the run as a zombie.
    let _ = process.wait().await;
    Ok(code)
}
