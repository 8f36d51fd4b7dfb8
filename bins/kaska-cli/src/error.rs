use kaska_client::KaskaError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Kaska(#[from] KaskaError),

    #[error("topic '{0}' does not exist")]
    NoSuchTopic(String),

    #[error("signal: {0}")]
    Signal(#[from] std::io::Error),
}
