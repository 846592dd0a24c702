//! Command-line configuration and logging setup.

use crate::commands::Command;
use anyhow::Context;
use clap::Parser;
use corelib::PartitionerKind;
use replication::PlacementConfig;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "chring")]
#[command(about = "Consistent hash ring with replica-aware placement", long_about = None)]
#[command(version)]
pub struct CliConfig {
    /// JSON placement config ({"replicas": N, "partitioner": "..."})
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Copies kept beyond the primary (overrides the config file)
    #[arg(short, long, global = true)]
    pub replicas: Option<usize>,

    /// Hash family: polynomial, xxh3, siphash or blake3 (overrides the config file)
    #[arg(short, long, global = true, value_parser = PartitionerKind::from_str)]
    pub partitioner: Option<PartitionerKind>,

    /// Log verbosity: -v for debug, -vv for trace. RUST_LOG applies otherwise.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Effective placement settings: defaults, then the config file, then flags.
    pub fn placement(&self) -> anyhow::Result<PlacementConfig> {
        let mut placement = match &self.config {
            Some(path) => PlacementConfig::load(path)
                .with_context(|| format!("loading placement config {}", path.display()))?,
            None => PlacementConfig::default(),
        };
        if let Some(replicas) = self.replicas {
            placement.replicas = replicas;
        }
        if let Some(partitioner) = self.partitioner {
            placement.partitioner = partitioner;
        }
        Ok(placement)
    }

    /// Install the stderr subscriber.
    pub fn init_tracing(&self) -> anyhow::Result<()> {
        let filter = match self.verbose {
            0 => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?,
            1 => EnvFilter::try_new("debug")?,
            _ => EnvFilter::try_new("trace")?,
        };

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))
    }

    pub fn run(&self) -> anyhow::Result<()> {
        self.init_tracing()?;
        let placement = self.placement()?;
        tracing::debug!(
            replicas = placement.replicas,
            partitioner = %placement.partitioner,
            "resolved placement config"
        );

        let output = self.command.execute(&placement)?;
        print!("{output}");
        Ok(())
    }
}
