use chrono::NaiveDateTime;
use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

use crate::error::LoginError;
use crate::schema::{garden, profile};
use crate::{DbConn, Error};

/// What a profile is allowed to do
///
/// Managers own gardens and edit their schedules, admins can edit any garden
/// and are the only ones allowed to hard-delete
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
#[ExistingTypePath = "crate::schema::sql_types::UserRole"]
#[serde(rename_all = "snake_case")]
pub enum Role {
	#[default]
	User,
	Manager,
	Admin,
}

impl Role {
	/// Whether a profile with this role may own and run gardens
	#[must_use]
	pub fn can_manage(self) -> bool { matches!(self, Self::Manager | Self::Admin) }
}

/// A single registered profile
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = profile)]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct Profile {
	pub id:            i32,
	pub name:          String,
	pub email:         String,
	#[serde(skip)]
	pub password_hash: String,
	pub phone:         Option<String>,
	pub role:          Role,
	pub is_active:     bool,
	pub created_at:    NaiveDateTime,
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = profile)]
pub struct NewProfile {
	pub name:          String,
	pub email:         String,
	pub password_hash: String,
	pub phone:         Option<String>,
	pub role:          Role,
}

impl NewProfile {
	/// Insert this [`NewProfile`] into the database.
	///
	/// # Errors
	pub async fn insert(self, conn: &DbConn) -> Result<Profile, Error> {
		let new_profile = conn
			.interact(|conn| {
				use self::profile::dsl::*;

				diesel::insert_into(profile)
					.values(self)
					.returning(Profile::as_returning())
					.get_result(conn)
			})
			.await??;

		Ok(new_profile)
	}
}

impl Profile {
	/// Get a [`Profile`] given its id.
	///
	/// # Errors
	pub async fn get(query_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let result = conn
			.interact(move |conn| {
				use self::profile::dsl::*;

				profile.find(query_id).first(conn).optional()
			})
			.await??;

		result.ok_or_else(|| Error::NotFound(format!("profile {query_id}")))
	}

	/// Get a [`Profile`] given its email.
	///
	/// # Errors
	pub async fn get_by_email(
		query_email: String,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let lookup = query_email.clone();

		let result = conn
			.interact(move |conn| {
				use self::profile::dsl::*;

				profile.filter(email.eq(lookup)).first(conn).optional()
			})
			.await??;

		result.ok_or(LoginError::UnknownEmail(query_email).into())
	}

	/// Get all [`Profile`]s, optionally filtered by role and by a name/email
	/// search term.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn get_all(
		role_filter: Option<Role>,
		search: Option<String>,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let profiles = conn
			.interact(move |conn| {
				let mut query = profile::table.into_boxed();

				if let Some(role) = role_filter {
					query = query.filter(profile::role.eq(role));
				}

				if let Some(term) = search {
					let pattern = format!("%{term}%");

					query = query.filter(
						profile::name
							.ilike(pattern.clone())
							.or(profile::email.ilike(pattern)),
					);
				}

				query.order(profile::name.asc()).load(conn)
			})
			.await??;

		Ok(profiles)
	}

	/// Get all [`Profile`]s that may be assigned as a garden manager.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn get_managers(conn: &DbConn) -> Result<Vec<Self>, Error> {
		let managers = conn
			.interact(|conn| {
				profile::table
					.filter(profile::role.eq_any([Role::Manager, Role::Admin]))
					.order(profile::name.asc())
					.load(conn)
			})
			.await??;

		Ok(managers)
	}

	/// Count profiles grouped by role.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn count_by_role(
		conn: &DbConn,
	) -> Result<Vec<(Role, i64)>, Error> {
		let counts = conn
			.interact(|conn| {
				profile::table
					.group_by(profile::role)
					.select((profile::role, count_star()))
					.load(conn)
			})
			.await??;

		Ok(counts)
	}

	/// Change the role of a [`Profile`].
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn set_role(
		pid: i32,
		role: Role,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let result = conn
			.interact(move |conn| {
				diesel::update(profile::table.filter(profile::id.eq(pid)))
					.set(profile::role.eq(role))
					.returning(Self::as_returning())
					.get_result(conn)
					.optional()
			})
			.await??;

		result.ok_or_else(|| Error::NotFound(format!("profile {pid}")))
	}

	/// Enable or disable a [`Profile`].
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn set_active(
		pid: i32,
		active: bool,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let result = conn
			.interact(move |conn| {
				diesel::update(profile::table.filter(profile::id.eq(pid)))
					.set(profile::is_active.eq(active))
					.returning(Self::as_returning())
					.get_result(conn)
					.optional()
			})
			.await??;

		result.ok_or_else(|| Error::NotFound(format!("profile {pid}")))
	}

	/// Permanently delete a [`Profile`].
	///
	/// Gardens the profile manages are orphaned rather than removed, so an
	/// admin can reassign them afterwards. Both steps run in one transaction.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn delete(pid: i32, conn: &DbConn) -> Result<(), Error> {
		let affected = conn
			.interact(move |conn| {
				conn.transaction::<_, diesel::result::Error, _>(|conn| {
					diesel::update(
						garden::table.filter(garden::manager_id.eq(pid)),
					)
					.set(garden::manager_id.eq(None::<i32>))
					.execute(conn)?;

					diesel::delete(profile::table.filter(profile::id.eq(pid)))
						.execute(conn)
				})
			})
			.await??;

		if affected == 0 {
			return Err(Error::NotFound(format!("profile {pid}")));
		}

		Ok(())
	}
}
