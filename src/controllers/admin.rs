//! Controllers for the admin management surface
//!
//! Every route here sits behind the auth and admin middleware, the handlers
//! only enforce the per-target rules.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::NoContent;

use crate::identity::CurrentProfile;
use crate::models::{DaySchedule, Garden, Profile, Role};
use crate::schemas::admin::{
	AdminGardenQuery,
	AssignManagerRequest,
	DashboardResponse,
	GardenStats,
	ProfileDetailResponse,
	ProfileQuery,
	ProfileStats,
	RoleCount,
	SetActiveRequest,
	SetRoleRequest,
};
use crate::schemas::garden::GardenResponse;
use crate::schemas::profile::ProfileResponse;
use crate::{DbPool, Error};

/// Admins manage their own account through the regular profile routes, never
/// through the management surface.
fn ensure_not_self(admin: &Profile, target_id: i32) -> Result<(), Error> {
	if admin.id == target_id {
		return Err(Error::ValidationError(
			"you cannot manage your own account through the admin routes"
				.to_string(),
		));
	}

	Ok(())
}

fn ensure_deletable(target: &Profile) -> Result<(), Error> {
	if target.role == Role::Admin {
		return Err(Error::ValidationError(
			"admin accounts cannot be deleted".to_string(),
		));
	}

	Ok(())
}

#[instrument(skip(pool))]
pub(crate) async fn get_dashboard(
	State(pool): State<DbPool>,
) -> Result<Json<DashboardResponse>, Error> {
	let conn = pool.get().await?;

	let by_role: Vec<RoleCount> = Profile::count_by_role(&conn)
		.await?
		.into_iter()
		.map(|(role, total)| RoleCount { role, total })
		.collect();
	let total = by_role.iter().map(|count| count.total).sum();

	let (active, inactive) = Garden::count_by_active(&conn).await?;

	Ok(Json(DashboardResponse {
		profiles: ProfileStats { by_role, total },
		gardens:  GardenStats { active, inactive, total: active + inactive },
	}))
}

#[instrument(skip(pool))]
pub(crate) async fn get_profiles(
	State(pool): State<DbPool>,
	Query(filter): Query<ProfileQuery>,
) -> Result<Json<Vec<ProfileResponse>>, Error> {
	let conn = pool.get().await?;
	let profiles = Profile::get_all(filter.role, filter.search, &conn).await?;

	Ok(Json(profiles.into_iter().map(Into::into).collect()))
}

/// Get one profile plus the gardens it manages
#[instrument(skip(pool))]
pub(crate) async fn get_profile_detail(
	State(pool): State<DbPool>,
	Path(pid): Path<i32>,
) -> Result<Json<ProfileDetailResponse>, Error> {
	let conn = pool.get().await?;
	let target = Profile::get(pid, &conn).await?;

	let gardens = if target.role.can_manage() {
		let managed = Garden::get_filtered(Some(pid), None, &conn).await?;

		super::garden::annotate_gardens(managed, &conn).await?
	} else {
		Vec::new()
	};

	Ok(Json(ProfileDetailResponse { profile: target.into(), gardens }))
}

/// Promote or demote a profile
#[instrument(skip(pool, admin))]
pub(crate) async fn set_profile_role(
	State(pool): State<DbPool>,
	CurrentProfile(admin): CurrentProfile,
	Path(pid): Path<i32>,
	Json(role_data): Json<SetRoleRequest>,
) -> Result<Json<ProfileResponse>, Error> {
	ensure_not_self(&admin, pid)?;

	let conn = pool.get().await?;

	Profile::get(pid, &conn).await?;
	let updated = Profile::set_role(pid, role_data.role, &conn).await?;

	info!(
		"admin {} set role of profile {pid} to {:?}",
		admin.id, updated.role
	);

	Ok(Json(updated.into()))
}

/// Enable or disable a profile
#[instrument(skip(pool, admin))]
pub(crate) async fn set_profile_active(
	State(pool): State<DbPool>,
	CurrentProfile(admin): CurrentProfile,
	Path(pid): Path<i32>,
	Json(active_data): Json<SetActiveRequest>,
) -> Result<Json<ProfileResponse>, Error> {
	ensure_not_self(&admin, pid)?;

	let conn = pool.get().await?;

	Profile::get(pid, &conn).await?;
	let updated =
		Profile::set_active(pid, active_data.is_active, &conn).await?;

	info!(
		"admin {} set profile {pid} active = {}",
		admin.id, updated.is_active
	);

	Ok(Json(updated.into()))
}

/// Permanently delete a profile, orphaning any gardens it manages
#[instrument(skip(pool, admin))]
pub(crate) async fn delete_profile(
	State(pool): State<DbPool>,
	CurrentProfile(admin): CurrentProfile,
	Path(pid): Path<i32>,
) -> Result<NoContent, Error> {
	ensure_not_self(&admin, pid)?;

	let conn = pool.get().await?;

	let target = Profile::get(pid, &conn).await?;
	ensure_deletable(&target)?;

	Profile::delete(pid, &conn).await?;

	warn!("admin {} permanently deleted profile {pid}", admin.id);

	Ok(NoContent)
}

#[instrument(skip(pool))]
pub(crate) async fn get_managers(
	State(pool): State<DbPool>,
) -> Result<Json<Vec<ProfileResponse>>, Error> {
	let conn = pool.get().await?;
	let managers = Profile::get_managers(&conn).await?;

	Ok(Json(managers.into_iter().map(Into::into).collect()))
}

/// List every garden, inactive ones included
#[instrument(skip(pool))]
pub(crate) async fn get_all_gardens(
	State(pool): State<DbPool>,
	Query(filter): Query<AdminGardenQuery>,
) -> Result<Json<Vec<GardenResponse>>, Error> {
	let conn = pool.get().await?;
	let gardens =
		Garden::get_filtered(filter.manager_id, filter.active, &conn).await?;

	let annotated = super::garden::annotate_gardens(gardens, &conn).await?;

	Ok(Json(annotated))
}

/// Hand a garden to a new manager
#[instrument(skip(pool, admin))]
pub(crate) async fn assign_manager(
	State(pool): State<DbPool>,
	CurrentProfile(admin): CurrentProfile,
	Path(gid): Path<i32>,
	Json(assign_data): Json<AssignManagerRequest>,
) -> Result<Json<GardenResponse>, Error> {
	let conn = pool.get().await?;

	Garden::get_by_id(gid, &conn).await?;

	let manager = Profile::get(assign_data.manager_id, &conn).await?;
	if !manager.role.can_manage() {
		return Err(Error::ValidationError(format!(
			"profile {} is not a manager",
			manager.id
		)));
	}

	let updated = Garden::assign_manager(gid, manager.id, &conn).await?;
	let schedule = DaySchedule::get_for_garden(gid, &conn).await?;

	info!(
		"admin {} assigned garden {gid} to profile {}",
		admin.id, manager.id
	);

	Ok(Json(GardenResponse::build_now(updated, &schedule)))
}

#[cfg(test)]
mod tests {
	use chrono::NaiveDate;

	use super::*;

	fn profile(id: i32, role: Role) -> Profile {
		Profile {
			id,
			name: format!("profile {id}"),
			email: format!("p{id}@example.com"),
			password_hash: String::new(),
			phone: None,
			role,
			is_active: true,
			created_at: NaiveDate::from_ymd_opt(2025, 6, 1)
				.unwrap()
				.and_hms_opt(0, 0, 0)
				.unwrap(),
		}
	}

	#[test]
	fn admins_cannot_target_themselves() {
		let admin = profile(1, Role::Admin);

		assert!(matches!(
			ensure_not_self(&admin, 1),
			Err(Error::ValidationError(_))
		));
		assert!(ensure_not_self(&admin, 2).is_ok());
	}

	#[test]
	fn other_admins_cannot_be_deleted() {
		assert!(matches!(
			ensure_deletable(&profile(2, Role::Admin)),
			Err(Error::ValidationError(_))
		));
		assert!(ensure_deletable(&profile(3, Role::Manager)).is_ok());
		assert!(ensure_deletable(&profile(4, Role::User)).is_ok());
	}
}
