//! All controller functions

pub mod admin;
pub mod auth;
pub mod garden;
pub mod product;
pub mod profile;
pub mod schedule;

use axum::extract::State;
use axum::response::NoContent;
use diesel::RunQueryDsl;

use crate::{DbPool, Error};

/// Check the health of the server and its database connection
///
/// # Errors
#[instrument(skip(pool))]
pub(crate) async fn healthcheck(
	State(pool): State<DbPool>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	conn.interact(|conn| diesel::sql_query("SELECT 1").execute(conn))
		.await??;

	Ok(NoContent)
}
