pub mod movie;
pub mod user;

pub use movie::{GenreInput, Movie, MoviePatch, NewMovie};
pub use user::{Credentials, User, UserIdentity};
