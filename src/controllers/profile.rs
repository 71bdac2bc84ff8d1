//! Controllers for the authenticated profile

use axum::Json;
use axum::extract::State;

use crate::identity::CurrentProfile;
use crate::models::Garden;
use crate::schemas::garden::GardenResponse;
use crate::schemas::profile::ProfileResponse;
use crate::{DbPool, Error};

pub(crate) async fn get_current_profile(
	CurrentProfile(profile): CurrentProfile,
) -> Json<ProfileResponse> {
	Json(profile.into())
}

/// Get the gardens managed by the caller, inactive ones included
#[instrument(skip(pool, profile))]
pub(crate) async fn get_my_gardens(
	State(pool): State<DbPool>,
	CurrentProfile(profile): CurrentProfile,
) -> Result<Json<Vec<GardenResponse>>, Error> {
	let conn = pool.get().await?;
	let gardens = Garden::get_by_manager(profile.id, &conn).await?;

	let annotated = super::garden::annotate_gardens(gardens, &conn).await?;

	Ok(Json(annotated))
}
