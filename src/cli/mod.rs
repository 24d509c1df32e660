use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lookingglass",
    about = "Smart-mirror agent command & configuration core",
    version
)]
pub struct Cli {
    /// Path to the config document (default: ~/.lookingglass/config.json,
    /// or $LOOKINGGLASS_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Route an utterance through the agent and print the response
    Say { text: String },

    /// Simulate a wake-word event
    Wake {
        #[arg(long, default_value = "cli")]
        source: String,
    },

    /// Print the grounded snapshot (config + live data) as JSON
    Snapshot,

    /// Apply a mode preset (default | focus | market)
    Mode { mode: String },

    /// Execute a raw action through the lenient wire boundary
    Action {
        /// Action type, e.g. set_widget_visibility
        kind: String,
        /// JSON payload
        #[arg(long, default_value = "{}")]
        payload: String,
    },

    /// Print the current config document
    Config,
}
