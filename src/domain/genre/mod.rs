pub mod error;
pub mod model;
pub mod service;

pub use error::GenreServiceError;
pub use model::{CreateGenreRequest, Genre, GenreWithCount};
pub use service::{GenreService, GenreServiceApi};
