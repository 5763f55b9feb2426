use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("unsupported sales channel: {0}")]
    UnsupportedChannel(String),
}
