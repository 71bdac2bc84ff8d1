use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::Error;
use crate::hours::{self, NextOpening};
use crate::models::{DaySchedule, DayScheduleUpsert, Garden, GardenStatus};

/// The fields of one weekday, the weekday itself comes from the route path
/// or the batch entry
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayScheduleRequest {
	pub is_open:   bool,
	pub opens_at:  Option<NaiveTime>,
	pub closes_at: Option<NaiveTime>,
	pub note:      Option<String>,
}

impl DayScheduleRequest {
	/// Validate this request and convert it into an upsert row.
	///
	/// A closed day always stores null times, whatever the caller sent, so
	/// stale hours are never displayed later.
	///
	/// # Errors
	pub fn to_upsert(
		self,
		garden_id: i32,
		weekday: i32,
	) -> Result<DayScheduleUpsert, Error> {
		if !(0..=6).contains(&weekday) {
			return Err(Error::ValidationError(format!(
				"weekday must be between 0 and 6, got {weekday}"
			)));
		}

		if self.is_open && (self.opens_at.is_none() || self.closes_at.is_none())
		{
			return Err(Error::ValidationError(
				"an open day requires both opensAt and closesAt".to_string(),
			));
		}

		let (opens_at, closes_at) = if self.is_open {
			(self.opens_at, self.closes_at)
		} else {
			(None, None)
		};

		Ok(DayScheduleUpsert {
			garden_id,
			weekday,
			is_open: self.is_open,
			opens_at,
			closes_at,
			note: self.note,
		})
	}
}

/// One entry of a full-week replacement
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekScheduleEntry {
	pub weekday:   i32,
	pub is_open:   bool,
	pub opens_at:  Option<NaiveTime>,
	pub closes_at: Option<NaiveTime>,
	pub note:      Option<String>,
}

impl WeekScheduleEntry {
	/// Validate this entry and convert it into an upsert row.
	///
	/// # Errors
	pub fn to_upsert(
		self,
		garden_id: i32,
	) -> Result<DayScheduleUpsert, Error> {
		let day = DayScheduleRequest {
			is_open:   self.is_open,
			opens_at:  self.opens_at,
			closes_at: self.closes_at,
			note:      self.note,
		};

		day.to_upsert(garden_id, self.weekday)
	}
}

/// Replace-all request body
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceScheduleRequest {
	pub days: Vec<WeekScheduleEntry>,
}

const WEEKDAY_NAMES: [&str; 7] = [
	"Sunday",
	"Monday",
	"Tuesday",
	"Wednesday",
	"Thursday",
	"Friday",
	"Saturday",
];

fn weekday_name(weekday: i32) -> &'static str {
	usize::try_from(weekday)
		.ok()
		.and_then(|i| WEEKDAY_NAMES.get(i))
		.copied()
		.unwrap_or("unknown")
}

#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayScheduleResponse {
	pub weekday:      i32,
	pub weekday_name: String,
	pub is_open:      bool,
	pub opens_at:     Option<NaiveTime>,
	pub closes_at:    Option<NaiveTime>,
	pub note:         Option<String>,
	pub updated_at:   NaiveDateTime,
}

impl From<DaySchedule> for DayScheduleResponse {
	fn from(value: DaySchedule) -> Self {
		Self {
			weekday:      value.weekday,
			weekday_name: weekday_name(value.weekday).to_string(),
			is_open:      value.is_open,
			opens_at:     value.opens_at,
			closes_at:    value.closes_at,
			note:         value.note,
			updated_at:   value.updated_at,
		}
	}
}

/// A garden's full week plus the live open/closed computation
#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
	pub garden_id:        i32,
	pub is_open_now:      bool,
	pub next_opening:     Option<NextOpening>,
	pub temporary_status: GardenStatus,
	pub status_message:   Option<String>,
	pub days:             Vec<DayScheduleResponse>,
}

impl ScheduleResponse {
	#[must_use]
	pub fn build(
		garden: &Garden,
		schedule: Vec<DaySchedule>,
		now: NaiveDateTime,
	) -> Self {
		let is_open_now = hours::is_open_at(&schedule, now);
		let next_opening = if is_open_now {
			None
		} else {
			hours::next_opening(&schedule, now)
		};

		Self {
			garden_id: garden.id,
			is_open_now,
			next_opening,
			temporary_status: garden.temporary_status,
			status_message: garden.status_message.clone(),
			days: schedule.into_iter().map(Into::into).collect(),
		}
	}
}

/// The live open/closed state without the schedule rows
#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenNowResponse {
	pub garden_id:        i32,
	pub is_open_now:      bool,
	pub next_opening:     Option<NextOpening>,
	pub temporary_status: GardenStatus,
	pub status_message:   Option<String>,
}

impl OpenNowResponse {
	#[must_use]
	pub fn build(
		garden: &Garden,
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
			garden_id: garden.id,
			is_open_now,
			next_opening,
			temporary_status: garden.temporary_status,
			status_message: garden.status_message.clone(),
		}
	}
}

/// Temporary status overlay update
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
	pub status:  GardenStatus,
	pub message: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn open_day() -> DayScheduleRequest {
		DayScheduleRequest {
			is_open:   true,
			opens_at:  Some("08:00:00".parse().unwrap()),
			closes_at: Some("18:00:00".parse().unwrap()),
			note:      None,
		}
	}

	#[test]
	fn closed_day_never_stores_times() {
		let request = DayScheduleRequest {
			is_open:   false,
			opens_at:  Some("08:00:00".parse().unwrap()),
			closes_at: Some("18:00:00".parse().unwrap()),
			note:      Some("winter break".to_string()),
		};

		let upsert = request.to_upsert(1, 2).unwrap();

		assert!(!upsert.is_open);
		assert_eq!(upsert.opens_at, None);
		assert_eq!(upsert.closes_at, None);
		assert_eq!(upsert.note.as_deref(), Some("winter break"));
	}

	#[test]
	fn open_day_keeps_its_times() {
		let upsert = open_day().to_upsert(1, 3).unwrap();

		assert!(upsert.is_open);
		assert_eq!(upsert.opens_at, Some("08:00:00".parse().unwrap()));
		assert_eq!(upsert.closes_at, Some("18:00:00".parse().unwrap()));
	}

	#[test]
	fn out_of_range_weekday_is_rejected() {
		assert!(matches!(
			open_day().to_upsert(1, 9),
			Err(Error::ValidationError(_))
		));
		assert!(matches!(
			open_day().to_upsert(1, -1),
			Err(Error::ValidationError(_))
		));
	}

	#[test]
	fn open_day_without_times_is_rejected() {
		let request = DayScheduleRequest {
			is_open:   true,
			opens_at:  None,
			closes_at: Some("18:00:00".parse().unwrap()),
			note:      None,
		};

		assert!(matches!(
			request.to_upsert(1, 1),
			Err(Error::ValidationError(_))
		));
	}

	#[test]
	fn unknown_status_string_is_rejected() {
		let result = serde_json::from_value::<SetStatusRequest>(
			serde_json::json!({ "status": "closed_forever" }),
		);

		assert!(result.is_err());

		let result = serde_json::from_value::<SetStatusRequest>(
			serde_json::json!({ "status": "on_vacation", "message": "back in june" }),
		);

		assert!(result.is_ok());
	}
}
