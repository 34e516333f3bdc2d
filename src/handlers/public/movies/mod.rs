// handlers/public/movies/mod.rs - Movie catalogue CRUD
//
// /movies      GET (list, ?genre=) | POST (create)
// /movies/:id  GET | PATCH | DELETE

pub mod collection;
pub mod record;

pub use collection::{movies_get, movies_post};
pub use record::{movie_delete, movie_get, movie_patch};
