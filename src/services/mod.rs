pub mod app_controller;
pub mod favourites_service;

pub use app_controller::{AppController, AppEvent, AppState, ControllerPhase, StateObserver};
pub use favourites_service::FavouritesService;
