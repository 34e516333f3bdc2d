pub mod session;

pub use session::protected_get;
