use serde::{Deserialize, Serialize};

use crate::models::Role;
use crate::schemas::garden::GardenResponse;
use crate::schemas::profile::ProfileResponse;

/// Filters for the admin profile listing
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
	pub role:   Option<Role>,
	pub search: Option<String>,
}

/// Filters for the admin garden listing
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminGardenQuery {
	pub manager_id: Option<i32>,
	pub active:     Option<bool>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRoleRequest {
	pub role: Role,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
	pub is_active: bool,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignManagerRequest {
	pub manager_id: i32,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCount {
	pub role:  Role,
	pub total: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
	pub by_role: Vec<RoleCount>,
	pub total:   i64,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenStats {
	pub active:   i64,
	pub inactive: i64,
	pub total:    i64,
}

/// Headline counts for the admin dashboard
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
	pub profiles: ProfileStats,
	pub gardens:  GardenStats,
}

/// A profile together with the gardens it manages
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetailResponse {
	pub profile: ProfileResponse,
	pub gardens: Vec<GardenResponse>,
}
