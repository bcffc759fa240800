use thiserror::Error;

#[derive(Error, Debug)]
pub enum JokeError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    // Parsing errors
    #[error("Joke decoding failed: {0}")]
    Decode(String),

    // Storage errors
    #[error("Persisting favourites failed: {0}")]
    Persistence(String),
}

pub type JokeResult<T> = Result<T, JokeError>;
