pub mod joke;
pub mod favourites;
pub mod lifecycle;

pub use joke::{Joke, JokeKey};
pub use favourites::FavouritesStore;
pub use lifecycle::ScenePhase;
