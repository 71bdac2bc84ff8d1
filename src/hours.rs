//! The opening-hours engine
//!
//! Pure functions over a garden's stored [`DaySchedule`] rows and an explicit
//! "now". Callers pass `Utc::now().naive_utc()`, all schedule times are
//! stored and compared in UTC, which keeps the computation deterministic and
//! trivially testable with fixed timestamps.

use chrono::{Datelike, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::DaySchedule;

/// Days in the schedule week, weekday 0 is Sunday
pub const DAYS_PER_WEEK: i32 = 7;

/// The next future moment a garden opens
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextOpening {
	/// Weekday 0-6, 0 is Sunday
	pub weekday:    i32,
	pub opens_at:   NaiveTime,
	/// Whole days from now until that weekday, 0 means later today
	pub days_until: i32,
}

/// Whether the garden is open at the given instant
///
/// A garden with no schedule row for today's weekday, or a row marked closed,
/// is closed. The open interval is closed on both ends, a garden at exactly
/// its closing minute still counts as open.
#[must_use]
pub fn is_open_at(schedule: &[DaySchedule], now: NaiveDateTime) -> bool {
	let today = i32::try_from(now.weekday().num_days_from_sunday())
		.unwrap_or_default();

	let Some(day) = schedule.iter().find(|d| d.weekday == today) else {
		return false;
	};

	if !day.is_open {
		return false;
	}

	let (Some(opens_at), Some(closes_at)) = (day.opens_at, day.closes_at)
	else {
		return false;
	};

	let time = now.time();

	opens_at <= time && time <= closes_at
}

/// The next future opening of the garden, or [`None`] if no weekday is
/// marked open
///
/// Today is treated as "0 days away" when its weekday is marked open, which
/// only happens when the caller asks for the next opening without first
/// establishing that the garden is closed today.
#[must_use]
pub fn next_opening(
	schedule: &[DaySchedule],
	now: NaiveDateTime,
) -> Option<NextOpening> {
	let today = i32::try_from(now.weekday().num_days_from_sunday())
		.unwrap_or_default();

	schedule
		.iter()
		.filter(|d| d.is_open)
		.filter_map(|d| {
			let opens_at = d.opens_at?;

			let days_until = if d.weekday >= today {
				d.weekday - today
			} else {
				DAYS_PER_WEEK - today + d.weekday
			};

			Some(NextOpening { weekday: d.weekday, opens_at, days_until })
		})
		.min_by_key(|n| (n.days_until, n.weekday))
}

#[cfg(test)]
mod tests {
	use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

	use super::*;
	use crate::models::DaySchedule;

	fn day(weekday: i32, open: Option<(&str, &str)>) -> DaySchedule {
		let stamp = NaiveDate::from_ymd_opt(2025, 6, 1)
			.unwrap()
			.and_hms_opt(0, 0, 0)
			.unwrap();

		DaySchedule {
			id: weekday + 1,
			garden_id: 1,
			weekday,
			is_open: open.is_some(),
			opens_at: open.map(|(o, _)| o.parse().unwrap()),
			closes_at: open.map(|(_, c)| c.parse().unwrap()),
			note: None,
			created_at: stamp,
			updated_at: stamp,
		}
	}

	fn at(date: &str, time: &str) -> NaiveDateTime {
		date.parse::<NaiveDate>()
			.unwrap()
			.and_time(time.parse::<NaiveTime>().unwrap())
	}

	// 2025-06-01 is a Sunday, so 2025-06-02 is Monday (weekday 1), and so on

	#[test]
	fn empty_schedule_is_always_closed() {
		let now = at("2025-06-02", "12:00:00");

		assert!(!is_open_at(&[], now));
		assert_eq!(next_opening(&[], now), None);
	}

	#[test]
	fn open_within_hours() {
		let schedule = vec![day(1, Some(("08:00:00", "18:00:00")))];

		assert!(is_open_at(&schedule, at("2025-06-02", "08:00:00")));
		assert!(is_open_at(&schedule, at("2025-06-02", "12:30:00")));
	}

	#[test]
	fn closed_outside_hours() {
		let schedule = vec![day(1, Some(("08:00:00", "18:00:00")))];

		assert!(!is_open_at(&schedule, at("2025-06-02", "07:59:00")));
		assert!(!is_open_at(&schedule, at("2025-06-02", "19:00:00")));
	}

	#[test]
	fn closing_minute_is_inclusive() {
		let schedule = vec![day(1, Some(("08:00:00", "18:00:00")))];

		assert!(is_open_at(&schedule, at("2025-06-02", "18:00:00")));
		assert!(!is_open_at(&schedule, at("2025-06-02", "18:01:00")));
	}

	#[test]
	fn closed_day_row_means_closed() {
		let schedule = vec![day(1, None)];

		assert!(!is_open_at(&schedule, at("2025-06-02", "12:00:00")));
	}

	#[test]
	fn other_weekday_rows_do_not_leak() {
		// Open on Monday only, queried on Tuesday
		let schedule = vec![day(1, Some(("08:00:00", "18:00:00")))];

		assert!(!is_open_at(&schedule, at("2025-06-03", "12:00:00")));
	}

	#[test]
	fn next_opening_wraps_around_the_week() {
		// Open only on Wednesday (3), queried on Friday (5): 3 - 5 + 7 = 5
		let schedule = vec![day(3, Some(("09:00:00", "17:00:00")))];
		let now = at("2025-06-06", "12:00:00");

		let next = next_opening(&schedule, now).unwrap();

		assert_eq!(next.weekday, 3);
		assert_eq!(next.days_until, 5);
		assert_eq!(next.opens_at, "09:00:00".parse().unwrap());
	}

	#[test]
	fn next_opening_picks_the_soonest_day() {
		// Queried on Monday (1), open on Wednesday (3) and Saturday (6)
		let schedule = vec![
			day(6, Some(("10:00:00", "16:00:00"))),
			day(3, Some(("09:00:00", "17:00:00"))),
		];
		let now = at("2025-06-02", "12:00:00");

		let next = next_opening(&schedule, now).unwrap();

		assert_eq!(next.weekday, 3);
		assert_eq!(next.days_until, 2);
	}

	#[test]
	fn next_opening_ignores_closed_days() {
		let schedule = vec![day(2, None), day(4, Some(("07:00:00", "12:00:00")))];
		let now = at("2025-06-02", "12:00:00");

		let next = next_opening(&schedule, now).unwrap();

		assert_eq!(next.weekday, 4);
		assert_eq!(next.days_until, 3);
	}

	#[test]
	fn next_opening_none_when_every_day_is_closed() {
		let schedule = vec![day(0, None), day(3, None)];
		let now = at("2025-06-02", "12:00:00");

		assert_eq!(next_opening(&schedule, now), None);
	}

	#[test]
	fn next_opening_today_counts_as_zero_days() {
		// Open today (Monday) but queried anyway, days_until stays 0
		let schedule = vec![day(1, Some(("08:00:00", "18:00:00")))];
		let now = at("2025-06-02", "06:00:00");

		let next = next_opening(&schedule, now).unwrap();

		assert_eq!(next.weekday, 1);
		assert_eq!(next.days_until, 0);
	}
}
