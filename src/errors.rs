use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Review {0} not found")]
    ReviewNotFound(i64),
    #[error("Rating {0} is outside the accepted range 1-5")]
    InvalidRating(i64),
    #[error("Stored aggregate rating '{0}' is not a valid decimal")]
    CorruptAggregate(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from file '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}
