/// Category of a contract error. Lets callers tell a broken link from a
/// broken message without parsing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection refused, timeout, non-2xx status.
    Transport,
    /// The peer answered, but the body could not be decoded.
    Protocol,
    /// No service is bound under the requested name.
    NotBound,
    /// Application object could not be encoded/decoded by the client codec.
    Codec,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Transport => f.write_str("transport"),
            ErrorKind::Protocol => f.write_str("protocol"),
            ErrorKind::NotBound => f.write_str("not bound"),
            ErrorKind::Codec => f.write_str("codec"),
        }
    }
}

/// Error returned by every `KaskaSrv` call.
///
/// "Topic missing" and "offset out of range" are NOT errors: they travel as
/// `false`, `None` or omission in the `Ok` value. An `Err` always means the
/// call itself failed.
#[derive(Clone)]
pub struct KaskaError {
    kind: ErrorKind,
    message: String,
}

impl KaskaError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Transport, message: msg.into() }
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Protocol, message: msg.into() }
    }

    pub fn not_bound(name: &str) -> Self {
        Self { kind: ErrorKind::NotBound, message: format!("service '{name}' is not bound") }
    }

    pub fn codec(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Codec, message: msg.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Prepend context to the message, keeping the kind.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        Self { kind: self.kind, message: format!("{ctx}: {}", self.message) }
    }
}

impl std::fmt::Debug for KaskaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::fmt::Display for KaskaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for KaskaError {}
