use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mesh")]
#[command(about = "Send and receive messages through a mailbox exchange", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/mesh-client/config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check connectivity and credentials
    Handshake,

    /// List messages waiting in the inbox
    Inbox,

    /// Send a file (chunked)
    Send {
        /// Destination mailbox
        to: String,

        /// File to send
        file: PathBuf,

        /// Workflow id (default from config)
        #[arg(long, short = 'w')]
        workflow_id: Option<String>,
    },

    /// Download one message
    Read {
        /// Message id
        id: String,

        /// Output file (or write to stdout if omitted)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Acknowledge after a complete download
        #[arg(long)]
        ack: bool,
    },

    /// Acknowledge (mark as read) one message
    Ack {
        /// Message id
        id: String,
    },

    /// Download and acknowledge everything in the inbox
    Poll {
        /// Directory to write messages to
        dir: PathBuf,

        /// Most ids taken per inbox listing
        #[arg(long, default_value = "500")]
        batch_size: usize,

        /// Concurrent downloads
        #[arg(long, default_value = "16")]
        concurrency: usize,

        /// File extension for received messages
        #[arg(long, default_value = "dat")]
        extension: String,
    },
}
