use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::{Profile, Role};

/// A profile as returned by the API, the password hash stays server-side
#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
	pub id:         i32,
	pub name:       String,
	pub email:      String,
	pub phone:      Option<String>,
	pub role:       Role,
	pub is_active:  bool,
	pub created_at: NaiveDateTime,
}

impl From<Profile> for ProfileResponse {
	fn from(value: Profile) -> Self {
		Self {
			id:         value.id,
			name:       value.name,
			email:      value.email,
			phone:      value.phone,
			role:       value.role,
			is_active:  value.is_active,
			created_at: value.created_at,
		}
	}
}
