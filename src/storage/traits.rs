use std::path::PathBuf;

use crate::domain::Joke;
use crate::errors::JokeResult;

#[cfg_attr(test, mockall::automock)]
pub trait FavouritesRepository: Send + Sync {
    /// Read the saved favourites in order. A missing store is an empty list.
    fn load(&self) -> JokeResult<Vec<Joke>>;

    /// Replace the saved favourites with `jokes`.
    fn save(&self, jokes: &[Joke]) -> JokeResult<()>;

    /// Move saved favourites that could not be loaded out of the way of the next
    /// `save`. Returns where they went, or `None` if there was nothing to move.
    fn set_aside(&self) -> JokeResult<Option<PathBuf>>;
}
