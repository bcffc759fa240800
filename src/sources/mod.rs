pub mod traits;
pub mod icanhazdadjoke;

pub use traits::JokeSource;
pub use icanhazdadjoke::{decode_joke, HttpJokeSource};
