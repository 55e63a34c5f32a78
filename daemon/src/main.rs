//! Surety daemon: entry point for running a registry node.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use surety_node::{init_logging, LogFormat, NodeConfig, SuretyNode};
use surety_rpc::RpcServer;
use surety_types::{AccountAddress, QuorumRule};

#[derive(Parser)]
#[command(name = "surety-daemon", about = "Airline admission registry node")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "SURETY_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the registry snapshot.
    #[arg(long, env = "SURETY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Owner identity for a fresh registry.
    #[arg(long, env = "SURETY_OWNER")]
    owner: Option<AccountAddress>,

    /// Founding airline for a fresh registry.
    #[arg(long, env = "SURETY_FOUNDER")]
    founder: Option<AccountAddress>,

    /// Front-end identity this node authorizes on the caller allowlist.
    #[arg(long, env = "SURETY_APP_ID")]
    app_id: Option<AccountAddress>,

    /// Disable the RPC server.
    #[arg(long, env = "SURETY_DISABLE_RPC")]
    disable_rpc: bool,

    /// RPC server port.
    #[arg(long, env = "SURETY_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Enable Prometheus metrics endpoint.
    #[arg(long, env = "SURETY_ENABLE_METRICS")]
    metrics: bool,

    /// Keep state in memory only.
    #[arg(long, env = "SURETY_NO_PERSIST")]
    no_persist: bool,

    /// Registered airlines at which sponsor votes become mandatory.
    #[arg(long, env = "SURETY_CONSENSUS_THRESHOLD")]
    consensus_threshold: Option<u64>,

    /// Quorum rule: "at_least_half" or "strict_majority".
    #[arg(long, env = "SURETY_QUORUM_RULE")]
    quorum_rule: Option<QuorumRule>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "SURETY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "SURETY_LOG_FORMAT")]
    log_format: Option<String>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Operate the node.
    #[command(name = "node")]
    Node {
        #[command(subcommand)]
        action: NodeAction,
    },
    /// Configuration helpers.
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand)]
enum NodeAction {
    /// Run the node until SIGINT/SIGTERM.
    Run,
}

#[derive(clap::Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
}

impl Cli {
    /// File config (or defaults) with CLI flags and env vars applied on top.
    fn resolve_config(&self) -> anyhow::Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => NodeConfig::from_toml_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => NodeConfig::default(),
        };

        if let Some(v) = &self.data_dir {
            config.data_dir = v.clone();
        }
        if let Some(v) = &self.owner {
            config.owner = v.clone();
        }
        if let Some(v) = &self.founder {
            config.founder = v.clone();
        }
        if let Some(v) = &self.app_id {
            config.app_id = v.clone();
        }
        if self.disable_rpc {
            config.enable_rpc = false;
        }
        if let Some(v) = self.rpc_port {
            config.rpc_port = v;
        }
        config.enable_metrics |= self.metrics;
        if self.no_persist {
            config.persist_snapshots = false;
        }
        if let Some(v) = self.consensus_threshold {
            config.params.consensus_threshold = v;
        }
        if let Some(v) = self.quorum_rule {
            config.params.quorum_rule = v;
        }
        if let Some(v) = &self.log_level {
            config.log_level = v.clone();
        }
        if let Some(v) = &self.log_format {
            config.log_format = v.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    match cli.command {
        Command::Config {
            action: ConfigAction::Show,
        } => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Node {
            action: NodeAction::Run,
        } => run(config).await?,
    }

    Ok(())
}

async fn run(config: NodeConfig) -> anyhow::Result<()> {
    let format: LogFormat = config.log_format.parse()?;
    init_logging(format, &config.log_level)?;

    let rpc = if config.enable_rpc {
        config.rpc_port.to_string()
    } else {
        "off".into()
    };
    tracing::info!(
        data_dir = %config.data_dir.display(),
        %rpc,
        metrics = config.enable_metrics,
        "starting surety node"
    );

    let node = SuretyNode::new(config.clone())?;
    let shutdown = node.shutdown_controller();

    let rpc_handle = config.enable_rpc.then(|| {
        let server = RpcServer::new(config.rpc_port, node.service(), config.enable_metrics);
        let signalled = shutdown.signalled();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = server.start(signalled).await {
                tracing::error!(error = %e, "RPC server error");
                shutdown.shutdown();
            }
        })
    });

    shutdown.wait_for_signal().await;
    tracing::info!("shutdown signal received, stopping node");

    if let Some(handle) = rpc_handle {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "RPC task ended abnormally");
        }
    }
    node.stop().await?;

    tracing::info!("surety daemon exited cleanly");
    Ok(())
}
