use std::collections::HashSet;

use super::{Joke, JokeKey};

/// Ordered, append-only list of favourite jokes.
///
/// Keeps a key index alongside the list so membership is checked against every
/// favourite, not only the joke currently on screen.
#[derive(Debug, Clone, Default)]
pub struct FavouritesStore {
    jokes: Vec<Joke>,
    keys: HashSet<JokeKey>,
}

impl FavouritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted sequence, keeping the first of any duplicates
    pub fn from_jokes(jokes: Vec<Joke>) -> Self {
        let mut store = Self::new();
        for joke in jokes {
            store.add(joke);
        }
        store
    }

    /// Append `joke`; returns `false` without changing anything if it is already a favourite
    pub fn add(&mut self, joke: Joke) -> bool {
        if !self.keys.insert(joke.key()) {
            return false;
        }
        self.jokes.push(joke);
        true
    }

    pub fn contains(&self, joke: &Joke) -> bool {
        self.keys.contains(&joke.key())
    }

    pub fn jokes(&self) -> &[Joke] {
        &self.jokes
    }

    pub fn len(&self) -> usize {
        self.jokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jokes.is_empty()
    }

    pub fn snapshot(&self) -> Vec<Joke> {
        self.jokes.clone()
    }
}
