use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "kaska-cli", about = "Command-line client for a kaska broker")]
pub struct Cli {
    #[command(flatten)]
    pub conn: ConnArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct ConnArgs {
    /// Broker host.
    #[arg(long, default_value = "127.0.0.1", env = "KASKA_HOST")]
    pub host: String,

    /// Broker port.
    #[arg(long, default_value_t = 9092, env = "KASKA_PORT")]
    pub port: u16,

    /// Service name to resolve on the broker.
    #[arg(long, default_value = "KaskaSrv")]
    pub service_name: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create topics.
    Create {
        #[arg(required = true)]
        topics: Vec<String>,
    },
    /// List topics.
    List,
    /// Append a UTF-8 text payload to a topic.
    Send { topic: String, text: String },
    /// Read one record.
    Get { topic: String, offset: u64 },
    /// Show the end offset of each topic.
    EndOffsets {
        #[arg(required = true)]
        topics: Vec<String>,
    },
    /// Subscribe and print records as they arrive.
    Consume {
        #[arg(required = true)]
        topics: Vec<String>,

        /// Delay between polls.
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,

        /// Start reading at this offset instead of 0.
        #[arg(long)]
        from: Option<u64>,

        /// Poll once and exit.
        #[arg(long)]
        once: bool,
    },
}
