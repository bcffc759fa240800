use crate::domain::{FavouritesStore, Joke};
use crate::errors::JokeResult;
use crate::storage::traits::FavouritesRepository;

/// One-shot access to saved favourites, outside of an interactive session.
pub struct FavouritesService<R: FavouritesRepository> {
    repository: R,
}

impl<R: FavouritesRepository> FavouritesService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// List saved favourites in the order they were added
    pub fn list(&self) -> JokeResult<Vec<Joke>> {
        Ok(FavouritesStore::from_jokes(self.repository.load()?).snapshot())
    }

    /// Append a joke to the saved favourites.
    /// Returns `false` if a joke with the same text is already saved.
    pub fn add(&self, joke: Joke) -> JokeResult<bool> {
        let mut store = FavouritesStore::from_jokes(self.repository.load()?);

        if !store.add(joke) {
            return Ok(false);
        }

        self.repository.save(store.jokes())?;
        Ok(true)
    }
}
