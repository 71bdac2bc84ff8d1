use chrono::NaiveDateTime;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Double;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

use super::{Profile, Role};
use crate::geo::{DistanceStrategy, GeoQuery};
use crate::schema::{day_schedule, garden, product};
use crate::{DbConn, Error};

/// A garden-level status overlay, independent of the weekly schedule
///
/// A non-normal status is reported to clients next to the computed
/// open/closed flag, it never overrides it. The schedule answers "is this a
/// business hour", the overlay answers "is the garden reachable at all".
#[derive(
	Clone,
	Copy,
	DbEnum,
	Debug,
	Default,
	Deserialize,
	Eq,
	PartialEq,
	Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::GardenStatus"]
#[serde(rename_all = "snake_case")]
pub enum GardenStatus {
	#[default]
	Normal,
	TemporarilyClosed,
	OnVacation,
	UnderMaintenance,
}

/// A single community garden
#[derive(
	Clone,
	Debug,
	Deserialize,
	Identifiable,
	Queryable,
	QueryableByName,
	Selectable,
	Serialize,
)]
#[diesel(table_name = garden)]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct Garden {
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
	pub created_at:       NaiveDateTime,
	pub updated_at:       NaiveDateTime,
}

/// A [`Garden`] annotated with its distance to a query point, in meters
#[derive(Debug, QueryableByName)]
pub struct GardenWithDistance {
	#[diesel(embed)]
	pub garden:     Garden,
	#[diesel(sql_type = Double)]
	pub distance_m: f64,
}

/// The haversine formula on the mean Earth radius (6371 km), evaluated by
/// postgres itself when no geography type is available
///
/// $1 is the query latitude, $2 the query longitude, $3 the radius in meters
const NEARBY_HAVERSINE_SQL: &str = "\
	SELECT * \
	FROM ( \
		SELECT \
			garden.*, \
			2.0 * 6371000.0 * atan2(sqrt(h.a), sqrt(1.0 - h.a)) AS distance_m \
		FROM garden \
		CROSS JOIN LATERAL ( \
			SELECT pow(sin(radians(garden.latitude - $1) / 2.0), 2) \
				+ cos(radians($1)) * cos(radians(garden.latitude)) \
				* pow(sin(radians(garden.longitude - $2) / 2.0), 2) AS a \
		) AS h \
		WHERE garden.is_active \
	) AS candidates \
	WHERE candidates.distance_m <= $3 \
	ORDER BY candidates.distance_m ASC";

/// The native geography distance, used when PostGIS is installed
///
/// Same bind order and same filtering semantics as the haversine fallback
const NEARBY_POSTGIS_SQL: &str = "\
	SELECT \
		garden.*, \
		ST_Distance( \
			ST_SetSRID(ST_MakePoint(garden.longitude, garden.latitude), 4326)::geography, \
			ST_SetSRID(ST_MakePoint($2, $1), 4326)::geography \
		) AS distance_m \
	FROM garden \
	WHERE garden.is_active \
		AND ST_DWithin( \
			ST_SetSRID(ST_MakePoint(garden.longitude, garden.latitude), 4326)::geography, \
			ST_SetSRID(ST_MakePoint($2, $1), 4326)::geography, \
			$3 \
		) \
	ORDER BY distance_m ASC";

impl Garden {
	/// Get a [`Garden`] by its id.
	///
	/// # Errors
	pub async fn get_by_id(gid: i32, conn: &DbConn) -> Result<Self, Error> {
		let result = conn
			.interact(move |conn| {
				garden::table.find(gid).first(conn).optional()
			})
			.await??;

		result.ok_or_else(|| Error::NotFound(format!("garden {gid}")))
	}

	/// Get all [`Garden`]s with the given active flag.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn get_all(
		active: bool,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let gardens = conn
			.interact(move |conn| {
				garden::table
					.filter(garden::is_active.eq(active))
					.order(garden::created_at.desc())
					.load(conn)
			})
			.await??;

		Ok(gardens)
	}

	/// Get all [`Garden`]s managed by the given profile.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn get_by_manager(
		profile_id: i32,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let gardens = conn
			.interact(move |conn| {
				garden::table
					.filter(garden::manager_id.eq(profile_id))
					.order(garden::name.asc())
					.load(conn)
			})
			.await??;

		Ok(gardens)
	}

	/// Find all active [`Garden`]s within the query radius, ordered by
	/// ascending distance.
	///
	/// The caller validates the [`GeoQuery`] before this runs; a garden at
	/// exactly the radius boundary is included.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn find_nearby(
		query: GeoQuery,
		strategy: DistanceStrategy,
		conn: &DbConn,
	) -> Result<Vec<GardenWithDistance>, Error> {
		let raw_sql = match strategy {
			DistanceStrategy::Postgis => NEARBY_POSTGIS_SQL,
			DistanceStrategy::Haversine => NEARBY_HAVERSINE_SQL,
		};

		let gardens = conn
			.interact(move |conn| {
				diesel::sql_query(raw_sql)
					.bind::<Double, _>(query.latitude)
					.bind::<Double, _>(query.longitude)
					.bind::<Double, _>(query.radius)
					.load::<GardenWithDistance>(conn)
			})
			.await??;

		Ok(gardens)
	}

	/// Soft-delete a [`Garden`] by flipping its active flag.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn soft_delete(gid: i32, conn: &DbConn) -> Result<(), Error> {
		let affected = conn
			.interact(move |conn| {
				diesel::update(garden::table.filter(garden::id.eq(gid)))
					.set((
						garden::is_active.eq(false),
						garden::updated_at.eq(diesel::dsl::now),
					))
					.execute(conn)
			})
			.await??;

		if affected == 0 {
			return Err(Error::NotFound(format!("garden {gid}")));
		}

		Ok(())
	}

	/// Hard-delete a [`Garden`] and everything it owns.
	///
	/// Products and day schedules go first, then the garden row itself, all
	/// in one transaction. There is no cascading-delete constraint, so the
	/// ordering matters for referential integrity.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn hard_delete(gid: i32, conn: &DbConn) -> Result<(), Error> {
		let affected = conn
			.interact(move |conn| {
				conn.transaction::<_, diesel::result::Error, _>(|conn| {
					diesel::delete(
						product::table.filter(product::garden_id.eq(gid)),
					)
					.execute(conn)?;

					diesel::delete(
						day_schedule::table
							.filter(day_schedule::garden_id.eq(gid)),
					)
					.execute(conn)?;

					diesel::delete(garden::table.filter(garden::id.eq(gid)))
						.execute(conn)
				})
			})
			.await??;

		if affected == 0 {
			return Err(Error::NotFound(format!("garden {gid}")));
		}

		Ok(())
	}

	/// Set the temporary status overlay of a [`Garden`].
	///
	/// An omitted message clears the stored one.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn set_status(
		gid: i32,
		status: GardenStatus,
		message: Option<String>,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let result = conn
			.interact(move |conn| {
				diesel::update(garden::table.filter(garden::id.eq(gid)))
					.set((
						garden::temporary_status.eq(status),
						garden::status_message.eq(message),
						garden::updated_at.eq(diesel::dsl::now),
					))
					.returning(Self::as_returning())
					.get_result(conn)
					.optional()
			})
			.await??;

		result.ok_or_else(|| Error::NotFound(format!("garden {gid}")))
	}

	/// Check that the given profile may write to this garden.
	///
	/// Writes are reserved to the garden's manager and admins. An orphaned
	/// garden only accepts admin writes.
	///
	/// # Errors
	pub fn ensure_managed_by(&self, profile: &Profile) -> Result<(), Error> {
		if profile.role == Role::Admin || self.manager_id == Some(profile.id) {
			Ok(())
		} else {
			Err(Error::Forbidden)
		}
	}

	/// Get all [`Garden`]s, optionally narrowed to one manager or one active
	/// state.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn get_filtered(
		manager: Option<i32>,
		active: Option<bool>,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let gardens = conn
			.interact(move |conn| {
				let mut query = garden::table.into_boxed();

				if let Some(manager_id) = manager {
					query = query.filter(garden::manager_id.eq(manager_id));
				}

				if let Some(active) = active {
					query = query.filter(garden::is_active.eq(active));
				}

				query.order(garden::created_at.desc()).load(conn)
			})
			.await??;

		Ok(gardens)
	}

	/// Hand a [`Garden`] to a new manager.
	///
	/// The caller checks that the target profile exists and has a managing
	/// role.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn assign_manager(
		gid: i32,
		manager_id: i32,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let result = conn
			.interact(move |conn| {
				diesel::update(garden::table.filter(garden::id.eq(gid)))
					.set((
						garden::manager_id.eq(Some(manager_id)),
						garden::updated_at.eq(diesel::dsl::now),
					))
					.returning(Self::as_returning())
					.get_result(conn)
					.optional()
			})
			.await??;

		result.ok_or_else(|| Error::NotFound(format!("garden {gid}")))
	}

	/// Count gardens as (active, inactive).
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn count_by_active(conn: &DbConn) -> Result<(i64, i64), Error> {
		let counts: Vec<(bool, i64)> = conn
			.interact(|conn| {
				garden::table
					.group_by(garden::is_active)
					.select((garden::is_active, diesel::dsl::count_star()))
					.load(conn)
			})
			.await??;

		let mut active = 0;
		let mut inactive = 0;

		for (is_active, total) in counts {
			if is_active {
				active = total;
			} else {
				inactive = total;
			}
		}

		Ok((active, inactive))
	}
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = garden)]
pub struct NewGarden {
	pub name:        String,
	pub description: Option<String>,
	pub address:     String,
	pub latitude:    f64,
	pub longitude:   f64,
	pub manager_id:  Option<i32>,
	pub cover_photo: Option<String>,
}

impl NewGarden {
	/// Insert this [`NewGarden`] into the database.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<Garden, Error> {
		let new_garden = conn
			.interact(|conn| {
				diesel::insert_into(garden::table)
					.values(self)
					.returning(Garden::as_returning())
					.get_result(conn)
			})
			.await??;

		Ok(new_garden)
	}
}

#[derive(AsChangeset, Clone, Debug, Deserialize)]
#[diesel(table_name = garden)]
#[serde(rename_all = "camelCase")]
pub struct GardenUpdate {
	pub name:        Option<String>,
	pub description: Option<String>,
	pub address:     Option<String>,
	pub latitude:    Option<f64>,
	pub longitude:   Option<f64>,
	pub cover_photo: Option<String>,
}

impl GardenUpdate {
	/// Apply this update to the garden with the given id.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn apply_to(
		self,
		gid: i32,
		conn: &DbConn,
	) -> Result<Garden, Error> {
		let updated = conn
			.interact(move |conn| {
				diesel::update(garden::table.filter(garden::id.eq(gid)))
					.set((self, garden::updated_at.eq(diesel::dsl::now)))
					.returning(Garden::as_returning())
					.get_result(conn)
					.optional()
			})
			.await??;

		updated.ok_or_else(|| Error::NotFound(format!("garden {gid}")))
	}
}
