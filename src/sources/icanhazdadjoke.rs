use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use url::Url;

use crate::config::Config;
use crate::domain::Joke;
use crate::errors::{JokeError, JokeResult};
use crate::sources::traits::JokeSource;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches jokes from an icanhazdadjoke-compatible endpoint.
pub struct HttpJokeSource {
    client: Client,
    endpoint: Url,
}

impl HttpJokeSource {
    pub fn new(config: &Config) -> JokeResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT);
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl JokeSource for HttpJokeSource {
    async fn fetch_random_joke(&self) -> JokeResult<Joke> {
        tracing::debug!(endpoint = %self.endpoint, "requesting joke");

        let response = self.client.get(self.endpoint.clone()).send().await?;
        // The payload carries its own status; the body decides success.
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(%status, bytes = body.len(), "joke response received");

        decode_joke(&body)
    }
}

/// Decode a response body into a [`Joke`], rejecting jokes with no text.
pub fn decode_joke(body: &[u8]) -> JokeResult<Joke> {
    let joke: Joke = serde_json::from_slice(body).map_err(|e| JokeError::Decode(e.to_string()))?;

    if joke.text.trim().is_empty() {
        return Err(JokeError::Decode(format!("joke '{}' has no text", joke.id)));
    }

    Ok(joke)
}
