//! # Gardenmap backend library

#[macro_use]
extern crate tracing;

use std::ops::Deref;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use deadpool_diesel::postgres::{Object, Pool};

mod config;

pub mod controllers;
pub mod error;
pub mod geo;
pub mod hours;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schema;
pub mod schemas;

pub use config::Config;
pub use error::Error;

pub type DbPool = Pool;
pub type DbConn = Object;

/// The id of the authenticated profile, stored on the request by the auth
/// middleware
#[derive(Clone, Copy, Debug)]
pub(crate) struct ProfileId(pub(crate) i32);

impl Deref for ProfileId {
	type Target = i32;

	fn deref(&self) -> &Self::Target { &self.0 }
}

impl std::fmt::Display for ProfileId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Common state of the app
#[derive(Clone)]
pub struct AppState {
	pub config:         Config,
	pub database_pool:  DbPool,
	pub cookie_jar_key: Key,
}

impl FromRef<AppState> for Config {
	fn from_ref(input: &AppState) -> Self { input.config.clone() }
}

impl FromRef<AppState> for DbPool {
	fn from_ref(input: &AppState) -> Self { input.database_pool.clone() }
}

impl FromRef<AppState> for Key {
	fn from_ref(input: &AppState) -> Self { input.cookie_jar_key.clone() }
}
