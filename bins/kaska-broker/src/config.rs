use clap::Parser;

use kaska_broker::BrokerConfig;

use crate::error::ServerError;

#[derive(Parser, Debug)]
#[command(name = "kaska-broker", about = "In-memory publish/subscribe broker")]
pub struct Cli {
    /// Path to TOML configuration file. Without it, built-in defaults apply.
    #[arg(long, env = "KASKA_CONFIG")]
    pub config: Option<String>,

    /// Bind address (overrides config).
    #[arg(long, env = "KASKA_HOST")]
    pub host: Option<String>,

    /// Bind port (overrides config).
    #[arg(long, env = "KASKA_PORT")]
    pub port: Option<u16>,

    /// Name the broker is bound under (overrides config).
    #[arg(long)]
    pub service_name: Option<String>,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn effective(&self) -> Result<BrokerConfig, ServerError> {
        let mut config = match &self.config {
            Some(path) => BrokerConfig::load(path)?,
            None => BrokerConfig::default(),
        };
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(name) = &self.service_name {
            config.service_name = name.clone();
        }
        config.validate()?;
        Ok(config)
    }
}
