//! Controllers for a garden's weekly schedule and live open state

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;

use crate::identity::CurrentProfile;
use crate::models::{DaySchedule, DayScheduleUpsert, Garden};
use crate::schemas::garden::GardenResponse;
use crate::schemas::schedule::{
	DayScheduleRequest,
	DayScheduleResponse,
	OpenNowResponse,
	ReplaceScheduleRequest,
	ScheduleResponse,
	SetStatusRequest,
};
use crate::{DbPool, Error};

#[instrument(skip(pool))]
pub(crate) async fn get_schedule(
	State(pool): State<DbPool>,
	Path(gid): Path<i32>,
) -> Result<Json<ScheduleResponse>, Error> {
	let conn = pool.get().await?;

	let garden = Garden::get_by_id(gid, &conn).await?;
	let schedule = DaySchedule::get_for_garden(gid, &conn).await?;

	Ok(Json(ScheduleResponse::build(
		&garden,
		schedule,
		Utc::now().naive_utc(),
	)))
}

#[instrument(skip(pool, profile, day_data))]
pub(crate) async fn upsert_day(
	State(pool): State<DbPool>,
	CurrentProfile(profile): CurrentProfile,
	Path((gid, weekday)): Path<(i32, i32)>,
	Json(day_data): Json<DayScheduleRequest>,
) -> Result<Json<DayScheduleResponse>, Error> {
	let conn = pool.get().await?;

	let garden = Garden::get_by_id(gid, &conn).await?;
	garden.ensure_managed_by(&profile)?;

	let row = day_data.to_upsert(gid, weekday)?.upsert(&conn).await?;

	info!("profile {} set weekday {weekday} of garden {gid}", profile.id);

	Ok(Json(row.into()))
}

/// Replace the whole week in one transaction
///
/// Every entry is validated before anything is written, a single bad entry
/// rejects the whole request.
#[instrument(skip(pool, profile, week_data))]
pub(crate) async fn replace_week(
	State(pool): State<DbPool>,
	CurrentProfile(profile): CurrentProfile,
	Path(gid): Path<i32>,
	Json(week_data): Json<ReplaceScheduleRequest>,
) -> Result<Json<Vec<DayScheduleResponse>>, Error> {
	let conn = pool.get().await?;

	let garden = Garden::get_by_id(gid, &conn).await?;
	garden.ensure_managed_by(&profile)?;

	let entries = week_data
		.days
		.into_iter()
		.map(|entry| entry.to_upsert(gid))
		.collect::<Result<Vec<_>, Error>>()?;

	let rows = DayScheduleUpsert::replace_all(entries, &conn).await?;

	info!("profile {} replaced the schedule of garden {gid}", profile.id);

	Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(pool))]
pub(crate) async fn check_open_now(
	State(pool): State<DbPool>,
	Path(gid): Path<i32>,
) -> Result<Json<OpenNowResponse>, Error> {
	let conn = pool.get().await?;

	let garden = Garden::get_by_id(gid, &conn).await?;
	let schedule = DaySchedule::get_for_garden(gid, &conn).await?;

	Ok(Json(OpenNowResponse::build(
		&garden,
		&schedule,
		Utc::now().naive_utc(),
	)))
}

/// Set the temporary status overlay of a garden
#[instrument(skip(pool, profile, status_data))]
pub(crate) async fn set_status(
	State(pool): State<DbPool>,
	CurrentProfile(profile): CurrentProfile,
	Path(gid): Path<i32>,
	Json(status_data): Json<SetStatusRequest>,
) -> Result<Json<GardenResponse>, Error> {
	let conn = pool.get().await?;

	let garden = Garden::get_by_id(gid, &conn).await?;
	garden.ensure_managed_by(&profile)?;

	let updated = Garden::set_status(
		gid,
		status_data.status,
		status_data.message,
		&conn,
	)
	.await?;

	let schedule = DaySchedule::get_for_garden(gid, &conn).await?;

	info!(
		"profile {} set status of garden {gid} to {:?}",
		profile.id, updated.temporary_status
	);

	Ok(Json(GardenResponse::build_now(updated, &schedule)))
}
