use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable is set but its value cannot be parsed.
    ///
    /// Unset variables fall back to defaults; a present but malformed value is treated
    /// as a deployment mistake and stops startup.
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}
