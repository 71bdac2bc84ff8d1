use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator_derive::Validate;

use crate::hours::{self, NextOpening};
use crate::models::{
	DaySchedule,
	Garden,
	GardenStatus,
	GardenUpdate,
	GardenWithDistance,
	NewGarden,
};

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGardenRequest {
	#[validate(length(
		min = 3,
		max = 255,
		message = "name must be between 3 and 255 characters"
	))]
	pub name:        String,
	pub description: Option<String>,
	#[validate(length(
		min = 1,
		max = 500,
		message = "address must be between 1 and 500 characters"
	))]
	pub address:     String,
	#[validate(range(
		min = -90.0,
		max = 90.0,
		message = "latitude must be between -90 and 90"
	))]
	pub latitude:    f64,
	#[validate(range(
		min = -180.0,
		max = 180.0,
		message = "longitude must be between -180 and 180"
	))]
	pub longitude:   f64,
	pub cover_photo: Option<String>,
}

impl CreateGardenRequest {
	#[must_use]
	pub fn to_insertable(self, manager_id: i32) -> NewGarden {
		NewGarden {
			name: self.name,
			description: self.description,
			address: self.address,
			latitude: self.latitude,
			longitude: self.longitude,
			manager_id: Some(manager_id),
			cover_photo: self.cover_photo,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGardenRequest {
	#[validate(length(
		min = 3,
		max = 255,
		message = "name must be between 3 and 255 characters"
	))]
	pub name:        Option<String>,
	pub description: Option<String>,
	#[validate(length(
		min = 1,
		max = 500,
		message = "address must be between 1 and 500 characters"
	))]
	pub address:     Option<String>,
	#[validate(range(
		min = -90.0,
		max = 90.0,
		message = "latitude must be between -90 and 90"
	))]
	pub latitude:    Option<f64>,
	#[validate(range(
		min = -180.0,
		max = 180.0,
		message = "longitude must be between -180 and 180"
	))]
	pub longitude:   Option<f64>,
	pub cover_photo: Option<String>,
}

impl From<UpdateGardenRequest> for GardenUpdate {
	fn from(value: UpdateGardenRequest) -> Self {
		Self {
			name:        value.name,
			description: value.description,
			address:     value.address,
			latitude:    value.latitude,
			longitude:   value.longitude,
			cover_photo: value.cover_photo,
		}
	}
}

/// A garden as returned by the API, annotated with its live open state
#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenResponse {
	pub id:               i32,
	pub name:             String,
	pub description:      Option<String>,
	pub address:          String,
	pub latitude:         f64,
	pub longitude:        f64,
	pub manager_id:       Option<i32>,
	pub cover_photo:      Option<String>,
	pub is_active:        bool,
	pub temporary_status: GardenStatus,
	pub status_message:   Option<String>,
	pub is_open_now:      bool,
	pub next_opening:     Option<NextOpening>,
	pub created_at:       NaiveDateTime,
	pub updated_at:       NaiveDateTime,
}

impl GardenResponse {
	/// Annotate a garden with the open/closed state its schedule yields at
	/// the given moment.
	#[must_use]
	pub fn build(
		garden: Garden,
		schedule: &[DaySchedule],
		now: NaiveDateTime,
	) -> Self {
		let is_open_now = hours::is_open_at(schedule, now);
		let next_opening = if is_open_now {
			None
		} else {
			hours::next_opening(schedule, now)
		};

		Self {
			id: garden.id,
			name: garden.name,
			description: garden.description,
			address: garden.address,
			latitude: garden.latitude,
			longitude: garden.longitude,
			manager_id: garden.manager_id,
			cover_photo: garden.cover_photo,
			is_active: garden.is_active,
			temporary_status: garden.temporary_status,
			status_message: garden.status_message,
			is_open_now,
			next_opening,
			created_at: garden.created_at,
			updated_at: garden.updated_at,
		}
	}

	#[must_use]
	pub fn build_now(garden: Garden, schedule: &[DaySchedule]) -> Self {
		Self::build(garden, schedule, Utc::now().naive_utc())
	}
}

/// A [`GardenResponse`] with the distance to the query point, in meters
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyGardenResponse {
	#[serde(flatten)]
	pub garden:     GardenResponse,
	pub distance_m: f64,
}

impl NearbyGardenResponse {
	#[must_use]
	pub fn build(
		found: GardenWithDistance,
		schedule: &[DaySchedule],
		now: NaiveDateTime,
	) -> Self {
		Self {
			garden:     GardenResponse::build(found.garden, schedule, now),
			distance_m: found.distance_m,
		}
	}
}
