use std::collections::HashMap;

use chrono::{NaiveDateTime, NaiveTime};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::Garden;
use crate::schema::day_schedule;
use crate::{DbConn, Error};

/// One weekday's opening configuration for a garden
///
/// At most one row exists per (garden, weekday), weekday 0 is Sunday. A
/// garden with no rows at all is implicitly closed every day.
#[derive(
	Associations,
	Clone,
	Debug,
	Deserialize,
	Identifiable,
	Queryable,
	Selectable,
	Serialize,
)]
#[diesel(belongs_to(Garden))]
#[diesel(table_name = day_schedule)]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
	pub id:         i32,
	pub garden_id:  i32,
	pub weekday:    i32,
	pub is_open:    bool,
	pub opens_at:   Option<NaiveTime>,
	pub closes_at:  Option<NaiveTime>,
	pub note:       Option<String>,
	pub created_at: NaiveDateTime,
	pub updated_at: NaiveDateTime,
}

/// An upsert of one weekday, keyed on (garden, weekday)
///
/// Every field overwrites the stored row, a closed day always stores null
/// times no matter what the caller sent.
#[derive(AsChangeset, Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = day_schedule, treat_none_as_null = true)]
pub struct DayScheduleUpsert {
	pub garden_id: i32,
	pub weekday:   i32,
	pub is_open:   bool,
	pub opens_at:  Option<NaiveTime>,
	pub closes_at: Option<NaiveTime>,
	pub note:      Option<String>,
}

fn upsert_row(
	entry: DayScheduleUpsert,
	conn: &mut PgConnection,
) -> QueryResult<DaySchedule> {
	diesel::insert_into(day_schedule::table)
		.values(entry.clone())
		.on_conflict((day_schedule::garden_id, day_schedule::weekday))
		.do_update()
		.set((&entry, day_schedule::updated_at.eq(diesel::dsl::now)))
		.returning(DaySchedule::as_returning())
		.get_result(conn)
}

impl DayScheduleUpsert {
	/// Insert or overwrite the row for this (garden, weekday) pair.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn upsert(self, conn: &DbConn) -> Result<DaySchedule, Error> {
		let row = conn.interact(move |conn| upsert_row(self, conn)).await??;

		Ok(row)
	}

	/// Apply a whole batch of upserts as a single transaction.
	///
	/// All-or-nothing: if any row fails the whole batch rolls back, callers
	/// never observe a half-updated week.
	///
	/// # Errors
	#[instrument(skip(entries, conn))]
	pub async fn replace_all(
		entries: Vec<Self>,
		conn: &DbConn,
	) -> Result<Vec<DaySchedule>, Error> {
		let rows = conn
			.interact(move |conn| {
				conn.transaction::<_, diesel::result::Error, _>(|conn| {
					entries
						.into_iter()
						.map(|entry| upsert_row(entry, conn))
						.collect::<QueryResult<Vec<_>>>()
				})
			})
			.await??;

		Ok(rows)
	}
}

impl DaySchedule {
	/// Get the full week of a garden, ordered by weekday.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn get_for_garden(
		gid: i32,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let rows = conn
			.interact(move |conn| {
				day_schedule::table
					.filter(day_schedule::garden_id.eq(gid))
					.order(day_schedule::weekday.asc())
					.load(conn)
			})
			.await??;

		Ok(rows)
	}

	/// Get the schedules of a batch of gardens in one query, grouped by
	/// garden id.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn get_for_gardens(
		gids: Vec<i32>,
		conn: &DbConn,
	) -> Result<HashMap<i32, Vec<Self>>, Error> {
		let rows: Vec<Self> = conn
			.interact(move |conn| {
				day_schedule::table
					.filter(day_schedule::garden_id.eq_any(gids))
					.order(day_schedule::weekday.asc())
					.load(conn)
			})
			.await??;

		let mut by_garden: HashMap<i32, Vec<Self>> = HashMap::new();

		for row in rows {
			by_garden.entry(row.garden_id).or_default().push(row);
		}

		Ok(by_garden)
	}
}
