pub mod movie;
pub mod user;

pub use movie::MovieRow;
pub use user::UserRow;
