use std::sync::LazyLock;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher};
use axum::http::StatusCode;
use axum_extra::extract::cookie::Key;
use axum_test::TestServer;
use deadpool_diesel::postgres::{Manager, Pool};
use diesel_migrations::{
	EmbeddedMigrations,
	MigrationHarness,
	embed_migrations,
};
use gardenmap::geo::DistanceStrategy;
use gardenmap::models::{Garden, NewGarden, NewProfile, Profile, Role};
use gardenmap::{AppState, Config, DbConn, DbPool, routes};
use uuid::Uuid;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/");

/// The password every seeded profile logs in with
pub const TEST_PASSWORD: &str = "hunter2hunter2!";

/// Global test database provider
pub static DATABASE_PROVIDER: LazyLock<TestDatabaseFixture> =
	LazyLock::new(TestDatabaseFixture::new);

/// A RAII guard provider which generates temporary test databases
pub struct TestDatabaseFixture {
	base_url:  String,
	root_pool: DbPool,
}

/// A test database RAII guard
pub struct DatabaseGuard {
	root_conn:     DbConn,
	database_name: String,
	database_url:  String,
}

impl TestDatabaseFixture {
	fn new() -> Self {
		let database_url = std::env::var("DATABASE_URL").unwrap();
		let (base_url, _) = database_url.rsplit_once('/').unwrap();
		let base_url = base_url.to_string();

		let manager = Manager::new(
			database_url.to_string(),
			deadpool_diesel::Runtime::Tokio1,
		);

		let root_pool = Pool::builder(manager).build().unwrap();

		Self { base_url, root_pool }
	}

	/// Acquire a new [`DatabaseGuard`] for accessing a temporary test database
	///
	/// # Panics
	/// Panics if creating a database fails
	pub async fn acquire(&self) -> DatabaseGuard {
		let uuid = Uuid::new_v4().simple().to_string();
		let database_name = format!("test_{uuid}");
		let database_url = format!("{}/{}", self.base_url, database_name);

		let root_conn = self
			.root_pool
			.get()
			.await
			.expect("could not get root pool connection");

		let create_db_query = format!("CREATE DATABASE {database_name};");

		root_conn
			.interact(|conn| {
				use diesel::prelude::*;

				diesel::sql_query(create_db_query).execute(conn)
			})
			.await
			.expect("could not interact with root connection")
			.expect("could not create test database");

		DatabaseGuard { root_conn, database_name, database_url }
	}
}

impl DatabaseGuard {
	/// Create a new database pool for this test database guard
	///
	/// # Panics
	/// Panics if creation fails
	#[must_use]
	pub fn create_pool(&self) -> DbPool {
		let manager = Manager::new(
			self.database_url.to_string(),
			deadpool_diesel::Runtime::Tokio1,
		);

		let pool = Pool::builder(manager).build().unwrap();

		futures::executor::block_on(async {
			let conn = pool.get().await.unwrap();
			conn.interact(|conn| {
				conn.run_pending_migrations(MIGRATIONS).map(|_| ())
			})
			.await
			.unwrap()
			.unwrap();
		});

		pool
	}
}

impl Drop for DatabaseGuard {
	fn drop(&mut self) {
		let drop_db_query =
			format!("DROP DATABASE {} WITH (FORCE);", self.database_name);

		futures::executor::block_on(async move {
			self.root_conn
				.interact(|conn| {
					use diesel::prelude::*;

					diesel::sql_query(drop_db_query).execute(conn)
				})
				.await
				.expect("could not interact with root connection")
				.expect("could not drop test database");
		});
	}
}

/// A test server plus the oneshot database it runs against
#[allow(dead_code)]
pub struct TestEnv {
	pub app:  TestServer,
	pub pool: DbPool,
	db_guard: DatabaseGuard,
}

#[allow(dead_code)]
impl TestEnv {
	/// Get a test environment with a oneshot database for running tests
	///
	/// # Panics
	/// Panics if building the test server fails
	pub async fn new() -> Self {
		let db_guard = (*DATABASE_PROVIDER).acquire().await;
		let pool = db_guard.create_pool();

		let config = Config {
			database_url: db_guard.database_url.clone(),

			access_token_name:     "gardenmap_access_token".to_string(),
			access_token_lifetime: time::Duration::minutes(60),
			cookie_secret:         "0".repeat(64),

			geo_strategy: DistanceStrategy::Haversine,
			production:   false,
		};

		let cookie_jar_key = Key::from(&[0u8; 64]);

		let state =
			AppState { config, database_pool: pool.clone(), cookie_jar_key };
		let app = routes::get_app_router(state);

		let app = TestServer::builder().save_cookies().build(app).unwrap();

		Self { app, pool, db_guard }
	}

	/// Insert a profile that can log in with [`TEST_PASSWORD`]
	pub async fn seed_profile(
		&self,
		name: &str,
		email: &str,
		role: Role,
	) -> Profile {
		let salt = SaltString::generate(&mut OsRng);
		let password_hash = Argon2::default()
			.hash_password(TEST_PASSWORD.as_bytes(), &salt)
			.unwrap()
			.to_string();

		let conn = self.pool.get().await.unwrap();

		NewProfile {
			name: name.to_string(),
			email: email.to_string(),
			password_hash,
			phone: None,
			role,
		}
		.insert(&conn)
		.await
		.unwrap()
	}

	/// Insert a garden at the given coordinates
	pub async fn seed_garden(
		&self,
		manager_id: Option<i32>,
		latitude: f64,
		longitude: f64,
		active: bool,
	) -> Garden {
		let conn = self.pool.get().await.unwrap();

		let garden = NewGarden {
			name: format!("garden at {latitude} {longitude}"),
			description: None,
			address: "1 Garden Way".to_string(),
			latitude,
			longitude,
			manager_id,
			cover_photo: None,
		}
		.insert(&conn)
		.await
		.unwrap();

		if !active {
			Garden::soft_delete(garden.id, &conn).await.unwrap();
		}

		garden
	}

	/// Log in as a seeded profile, keeping the access cookie on the server
	pub async fn login(&self, email: &str) {
		let response = self
			.app
			.post("/auth/login")
			.json(&serde_json::json!({
				"email":    email,
				"password": TEST_PASSWORD,
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
	}
}
