// handlers/public/auth/mod.rs - Account creation and session cookie handling
//
// POST /register  create a user
// POST /login     verify credentials, set the access_token cookie
// POST /logout    clear the access_token cookie

pub mod login;
pub mod logout;
pub mod register;

pub use login::login_post;
pub use logout::logout_post;
pub use register::register_post;
