mod admin;
mod auth;

pub use admin::*;
pub use auth::*;
