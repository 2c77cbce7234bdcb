use thiserror::Error;

/// The closed set of failure kinds every fetch is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Decode,
    Other,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Decode => "decode",
            ErrorKind::Other => "other",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single collaborator call.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to parse {endpoint} JSON: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} response is missing required data: {reason}")]
    Schema {
        endpoint: &'static str,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Transport { .. } | FetchError::Status { .. } => ErrorKind::Transport,
            FetchError::Decode { .. } | FetchError::Schema { .. } => ErrorKind::Decode,
            FetchError::Other(_) => ErrorKind::Other,
        }
    }

    /// Logs the failure at the level its kind deserves. Nothing is rethrown.
    pub fn report(&self, what: &str) {
        match self.kind() {
            ErrorKind::Transport | ErrorKind::Decode => {
                tracing::warn!(kind = %self.kind(), "{what}: {self}")
            }
            ErrorKind::Other => tracing::error!(kind = %self.kind(), "{what}: {self}"),
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
