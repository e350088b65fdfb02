//! CLI module for the collaboration service

pub mod serve;

use clap::{Parser, Subcommand};

/// Content Collab - team collaboration and content authorization service
#[derive(Parser)]
#[command(name = "content-collab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,
}
