use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed sale identifier '{id}': {reason}")]
    MalformedIdentifier { id: String, reason: &'static str },

    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Invalid rank window ({min_rank}, {max_rank}): bounds must be >= 1 and min <= max")]
    InvalidWindow { min_rank: i64, max_rank: i64 },

    #[error("Invalid weight {weight} for dimension '{dimension}': expected a finite value in [0, 1]")]
    InvalidWeight { dimension: String, weight: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load {source_name} (line {line}): {message}")]
    Load {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Load error without a meaningful line number (headers, whole-file checks).
    pub fn load(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Load {
            source_name: source_name.into(),
            line: 0,
            message: message.into(),
        }
    }

    pub fn load_at(source_name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Error::Load {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
