#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("{0}")]
    Broker(#[from] kaska_broker::BrokerError),

    #[error("bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },

    #[error("serve: {0}")]
    Serve(std::io::Error),

    #[error("signal: {0}")]
    Signal(std::io::Error),
}
