use deadpool_diesel::postgres::{Manager, Pool};
use time::Duration;

use crate::geo::DistanceStrategy;

#[derive(Clone, Debug)]
pub struct Config {
	pub database_url: String,

	pub access_token_name:     String,
	pub access_token_lifetime: Duration,
	pub cookie_secret:         String,

	pub geo_strategy: DistanceStrategy,
	pub production:   bool,
}

impl Config {
	fn get_env_var(var: &str) -> String {
		std::env::var(var).unwrap_or_else(|_| panic!("{var} must be set"))
	}

	/// Create a new [`Config`] from environment variables
	///
	/// # Panics
	/// Panics if an environment variable is missing or malformed
	#[must_use]
	pub fn from_env() -> Self {
		let database_url = Self::get_env_var("DATABASE_URL");

		let access_token_name = Self::get_env_var("ACCESS_TOKEN_NAME");
		let access_token_lifetime = Duration::minutes(
			Self::get_env_var("ACCESS_TOKEN_LIFETIME_MINUTES")
				.parse::<i64>()
				.unwrap(),
		);

		// Must be at least 64 bytes, it is used as the private cookie jar key
		let cookie_secret = Self::get_env_var("COOKIE_SECRET");

		// Fixed at startup, the strategy never changes per request
		let geo_strategy = Self::get_env_var("GEO_STRATEGY")
			.parse::<DistanceStrategy>()
			.unwrap();

		let production = std::env::var("PRODUCTION")
			.map(|v| v == "true")
			.unwrap_or_default();

		Self {
			database_url,
			access_token_name,
			access_token_lifetime,
			cookie_secret,
			geo_strategy,
			production,
		}
	}

	/// Create a database pool for the given config
	///
	/// # Panics
	/// Panics if creating the pool fails
	#[must_use]
	pub fn create_database_pool(&self) -> Pool {
		let manager = Manager::new(
			self.database_url.to_string(),
			deadpool_diesel::Runtime::Tokio1,
		);

		Pool::builder(manager).build().unwrap()
	}
}
