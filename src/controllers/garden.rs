//! Controllers for gardens

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::NoContent;
use chrono::Utc;
use validator::Validate;

use crate::geo::GeoQuery;
use crate::identity::CurrentProfile;
use crate::models::{DaySchedule, Garden, GardenUpdate};
use crate::schemas::garden::{
	CreateGardenRequest,
	GardenResponse,
	NearbyGardenResponse,
	UpdateGardenRequest,
};
use crate::{Config, DbConn, DbPool, Error};

/// Annotate a batch of gardens with their live open state, fetching all of
/// their schedules in one query.
pub(crate) async fn annotate_gardens(
	gardens: Vec<Garden>,
	conn: &DbConn,
) -> Result<Vec<GardenResponse>, Error> {
	let gids = gardens.iter().map(|garden| garden.id).collect();
	let mut schedules = DaySchedule::get_for_gardens(gids, conn).await?;

	let now = Utc::now().naive_utc();

	let annotated = gardens
		.into_iter()
		.map(|garden| {
			let schedule = schedules.remove(&garden.id).unwrap_or_default();

			GardenResponse::build(garden, &schedule, now)
		})
		.collect();

	Ok(annotated)
}

/// List the active gardens
///
/// Deactivated gardens are only visible through the admin routes.
#[instrument(skip(pool))]
pub(crate) async fn get_gardens(
	State(pool): State<DbPool>,
) -> Result<Json<Vec<GardenResponse>>, Error> {
	let conn = pool.get().await?;
	let gardens = Garden::get_all(true, &conn).await?;

	let annotated = annotate_gardens(gardens, &conn).await?;

	Ok(Json(annotated))
}

#[instrument(skip(pool))]
pub(crate) async fn get_garden(
	State(pool): State<DbPool>,
	Path(gid): Path<i32>,
) -> Result<Json<GardenResponse>, Error> {
	let conn = pool.get().await?;

	let garden = Garden::get_by_id(gid, &conn).await?;
	let schedule = DaySchedule::get_for_garden(gid, &conn).await?;

	Ok(Json(GardenResponse::build_now(garden, &schedule)))
}

/// Find active gardens around a point, closest first
#[instrument(skip(pool, config))]
pub(crate) async fn get_nearby_gardens(
	State(pool): State<DbPool>,
	State(config): State<Config>,
	Query(query): Query<GeoQuery>,
) -> Result<Json<Vec<NearbyGardenResponse>>, Error> {
	query.validate()?;

	let conn = pool.get().await?;
	let found = Garden::find_nearby(query, config.geo_strategy, &conn).await?;

	let gids = found.iter().map(|entry| entry.garden.id).collect();
	let mut schedules = DaySchedule::get_for_gardens(gids, &conn).await?;

	let now = Utc::now().naive_utc();

	let annotated = found
		.into_iter()
		.map(|entry| {
			let schedule = schedules.remove(&entry.garden.id).unwrap_or_default();

			NearbyGardenResponse::build(entry, &schedule, now)
		})
		.collect();

	Ok(Json(annotated))
}

#[instrument(skip(pool, profile, create_data))]
pub(crate) async fn create_garden(
	State(pool): State<DbPool>,
	CurrentProfile(profile): CurrentProfile,
	Json(create_data): Json<CreateGardenRequest>,
) -> Result<Json<GardenResponse>, Error> {
	create_data.validate()?;

	if !profile.role.can_manage() {
		return Err(Error::Forbidden);
	}

	let conn = pool.get().await?;
	let new_garden = create_data.to_insertable(profile.id).insert(&conn).await?;

	info!(
		"profile {} created garden {} ({})",
		profile.id, new_garden.id, new_garden.name
	);

	// A fresh garden has no schedule yet, it reports as closed
	Ok(Json(GardenResponse::build_now(new_garden, &[])))
}

#[instrument(skip(pool, profile, update_data))]
pub(crate) async fn update_garden(
	State(pool): State<DbPool>,
	CurrentProfile(profile): CurrentProfile,
	Path(gid): Path<i32>,
	Json(update_data): Json<UpdateGardenRequest>,
) -> Result<Json<GardenResponse>, Error> {
	update_data.validate()?;

	let conn = pool.get().await?;

	let garden = Garden::get_by_id(gid, &conn).await?;
	garden.ensure_managed_by(&profile)?;

	let updated =
		GardenUpdate::from(update_data).apply_to(gid, &conn).await?;
	let schedule = DaySchedule::get_for_garden(gid, &conn).await?;

	Ok(Json(GardenResponse::build_now(updated, &schedule)))
}

/// Deactivate a garden, its data stays around and admins can still list it
#[instrument(skip(pool, profile))]
pub(crate) async fn delete_garden(
	State(pool): State<DbPool>,
	CurrentProfile(profile): CurrentProfile,
	Path(gid): Path<i32>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	let garden = Garden::get_by_id(gid, &conn).await?;
	garden.ensure_managed_by(&profile)?;

	Garden::soft_delete(gid, &conn).await?;

	info!("profile {} deactivated garden {gid}", profile.id);

	Ok(NoContent)
}

/// Permanently remove a garden and everything it owns
///
/// The route is gated by the admin middleware, only the logging needs the
/// caller here.
#[instrument(skip(pool, admin))]
pub(crate) async fn hard_delete_garden(
	State(pool): State<DbPool>,
	CurrentProfile(admin): CurrentProfile,
	Path(gid): Path<i32>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	Garden::hard_delete(gid, &conn).await?;

	warn!("admin {} permanently deleted garden {gid}", admin.id);

	Ok(NoContent)
}
