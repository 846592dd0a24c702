//! Subcommands. Each builds a fresh in-memory ring from its arguments and
//! renders a plain-text (or JSON) report.

use clap::Subcommand;
use corelib::partitioner::{
    Blake3Partitioner, Partitioner, PolynomialPartitioner, SipPartitioner, Xxh3Partitioner,
};
use corelib::{NodeId, PartitionerKind};
use replication::{PlacementConfig, PlacementEngine};
use serde::Serialize;
use std::fmt::Write;

/// Rendered command output.
pub type CommandResult = anyhow::Result<String>;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the ring position of each identifier
    Hash {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Resolve each key to its primary node
    Lookup {
        /// Comma-separated node ids
        #[arg(long, value_delimiter = ',', required = true)]
        nodes: Vec<String>,
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Show the primary and replica nodes for each entry
    Place {
        /// Comma-separated node ids
        #[arg(long, value_delimiter = ',', required = true)]
        nodes: Vec<String>,
        #[arg(required = true)]
        entries: Vec<String>,
    },

    /// Show ring order, positions and ownership
    Inspect {
        /// Comma-separated node ids
        #[arg(long, value_delimiter = ',', required = true)]
        nodes: Vec<String>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Place entries, remove a node, and report which entries survive
    Simulate {
        /// Comma-separated node ids
        #[arg(long, value_delimiter = ',', default_value = "A,E,M,V")]
        nodes: Vec<String>,
        /// Comma-separated entry ids
        #[arg(long, value_delimiter = ',', default_value = "B,G,N,X")]
        entries: Vec<String>,
        /// Node to remove after placement
        #[arg(long, default_value = "M")]
        remove: String,
    },
}

impl Command {
    pub fn execute(&self, config: &PlacementConfig) -> CommandResult {
        match config.partitioner {
            PartitionerKind::Polynomial => {
                self.execute_with(PolynomialPartitioner::default(), config.replicas)
            }
            PartitionerKind::Xxh3 => self.execute_with(Xxh3Partitioner, config.replicas),
            PartitionerKind::Siphash => self.execute_with(SipPartitioner, config.replicas),
            PartitionerKind::Blake3 => self.execute_with(Blake3Partitioner, config.replicas),
        }
    }

    fn execute_with<P>(&self, partitioner: P, replicas: usize) -> CommandResult
    where
        P: Partitioner,
        P::TokenType: Serialize,
    {
        let mut out = String::new();

        match self {
            Command::Hash { ids } => {
                for id in ids {
                    writeln!(out, "{id}\t{}", partitioner.partition(id))?;
                }
            }
            Command::Lookup { nodes, keys } => {
                let engine = engine(partitioner, replicas, nodes);
                for key in keys {
                    let node = engine.ring().lookup(key)?;
                    writeln!(out, "{key} -> {}", node.id())?;
                }
            }
            Command::Place { nodes, entries } => {
                let engine = engine(partitioner, replicas, nodes);
                for entry in entries {
                    let placement = engine.replicas_for(entry)?;
                    let chain: Vec<String> = placement.nodes().map(NodeId::to_string).collect();
                    writeln!(
                        out,
                        "{entry} ({}) -> {}",
                        engine.ring().position(entry),
                        chain.join(", ")
                    )?;
                }
            }
            Command::Inspect { nodes, json } => {
                let engine = engine(partitioner, replicas, nodes);
                let topology = engine.ring().topology();
                if *json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&topology)?)?;
                } else {
                    writeln!(out, "partitioner: {}", topology.partitioner)?;
                    for node in &topology.nodes {
                        writeln!(
                            out,
                            "{:<16} {:>22} {:>8.3}%",
                            node.id.to_string(),
                            node.position.to_string(),
                            node.ownership * 100.0
                        )?;
                    }
                }
            }
            Command::Simulate {
                nodes,
                entries,
                remove,
            } => {
                let mut engine = engine(partitioner, replicas, nodes);
                for entry in entries {
                    let placement = engine.put(entry.as_str(), format!("payload-{entry}"))?;
                    let chain: Vec<String> = placement.nodes().map(NodeId::to_string).collect();
                    writeln!(out, "put {entry} -> {}", chain.join(", "))?;
                }

                report_gets(&mut out, &engine, entries)?;

                let removed = engine.deregister_node(&NodeId::new(remove.as_str()));
                match removed {
                    Some(node) => writeln!(out, "removed {} ({} entries)", node.id(), node.len())?,
                    None => writeln!(out, "{remove} was not registered")?,
                }

                report_gets(&mut out, &engine, entries)?;
            }
        }

        Ok(out)
    }
}

fn engine<P: Partitioner>(
    partitioner: P,
    replicas: usize,
    nodes: &[String],
) -> PlacementEngine<P, String> {
    let mut engine = PlacementEngine::with_partitioner(partitioner, replicas);
    for node in nodes {
        engine.register_node(node.as_str());
    }
    engine
}

fn report_gets<P: Partitioner>(
    out: &mut String,
    engine: &PlacementEngine<P, String>,
    entries: &[String],
) -> anyhow::Result<()> {
    for entry in entries {
        match engine.get(entry)? {
            Some(payload) => writeln!(out, "get {entry} -> {payload}")?,
            None => writeln!(out, "get {entry} -> not found")?,
        }
    }
    Ok(())
}
