pub mod admin;
pub mod auth;
pub mod garden;
pub mod product;
pub mod profile;
pub mod schedule;
