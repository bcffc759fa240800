use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::errors::{JokeError, JokeResult};

pub const DEFAULT_ENDPOINT: &str = "https://icanhazdadjoke.com/";
const FAVOURITES_FILE: &str = "favourites.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PERSIST_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Url,
    pub favourites_path: PathBuf,
    /// `None` leaves requests without a deadline
    pub http_timeout: Option<Duration>,
    pub persist_timeout: Duration,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Load `.env` files into the process environment.
    /// Variables already set are left alone, so calling this twice is harmless.
    pub fn load_dotenv() {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();
    }

    pub fn from_env() -> JokeResult<Self> {
        Self::load_dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> JokeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup("DADJOKES_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| JokeError::Config(format!("DADJOKES_ENDPOINT '{}': {}", endpoint, e)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(JokeError::Config(format!(
                "DADJOKES_ENDPOINT must be http(s), got '{}'",
                endpoint.scheme()
            )));
        }

        let favourites_path = lookup("DADJOKES_FAVOURITES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_favourites_path);

        let http_timeout = match parse_secs(&lookup, "DADJOKES_HTTP_TIMEOUT_SECS")? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)),
        };

        let persist_timeout = match parse_secs(&lookup, "DADJOKES_PERSIST_TIMEOUT_SECS")? {
            Some(0) => {
                return Err(JokeError::Config(
                    "DADJOKES_PERSIST_TIMEOUT_SECS must be greater than zero".to_string(),
                ))
            }
            Some(secs) => Duration::from_secs(secs),
            None => Duration::from_secs(DEFAULT_PERSIST_TIMEOUT_SECS),
        };

        Ok(Self {
            endpoint,
            favourites_path,
            http_timeout,
            persist_timeout,
        })
    }

    /// Favourites live in the platform data directory, next to the binary otherwise
    fn default_favourites_path() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("dadjokes"))
            .or_else(Self::exe_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(FAVOURITES_FILE)
    }
}

fn parse_secs<F>(lookup: &F, key: &str) -> JokeResult<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|_| JokeError::Config(format!("{} must be a whole number of seconds, got '{}'", key, raw)))
        })
        .transpose()
}
