use async_trait::async_trait;

use crate::domain::Joke;
use crate::errors::JokeResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JokeSource: Send + Sync {
    /// Fetch one random joke. Fails with `Network` or `Decode`.
    async fn fetch_random_joke(&self) -> JokeResult<Joke>;
}
