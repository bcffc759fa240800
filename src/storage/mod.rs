pub mod traits;
pub mod json_file;

pub use traits::FavouritesRepository;
pub use json_file::JsonFileFavouritesRepository;
