use chrono::NaiveDateTime;
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::Garden;
use crate::schema::product;
use crate::{DbConn, Error};

/// A product offered by a garden
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
#[diesel(table_name = product)]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct Product {
	pub id:           i32,
	pub garden_id:    i32,
	pub name:         String,
	pub description:  Option<String>,
	pub category:     Option<String>,
	pub price:        f64,
	pub unit:         String,
	pub stock:        i32,
	pub photo:        Option<String>,
	pub is_available: bool,
	pub created_at:   NaiveDateTime,
	pub updated_at:   NaiveDateTime,
}

impl Product {
	/// Get a [`Product`] by its id.
	///
	/// # Errors
	pub async fn get_by_id(pid: i32, conn: &DbConn) -> Result<Self, Error> {
		let result = conn
			.interact(move |conn| {
				product::table.find(pid).first(conn).optional()
			})
			.await??;

		result.ok_or_else(|| Error::NotFound(format!("product {pid}")))
	}

	/// Get the products of a garden, available ones by default.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn get_for_garden(
		gid: i32,
		available: bool,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let products = conn
			.interact(move |conn| {
				product::table
					.filter(product::garden_id.eq(gid))
					.filter(product::is_available.eq(available))
					.order((product::category.asc(), product::name.asc()))
					.load(conn)
			})
			.await??;

		Ok(products)
	}

	/// Delete a [`Product`] by its id.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn delete_by_id(pid: i32, conn: &DbConn) -> Result<(), Error> {
		let affected = conn
			.interact(move |conn| {
				diesel::delete(product::table.filter(product::id.eq(pid)))
					.execute(conn)
			})
			.await??;

		if affected == 0 {
			return Err(Error::NotFound(format!("product {pid}")));
		}

		Ok(())
	}
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = product)]
pub struct NewProduct {
	pub garden_id:   i32,
	pub name:        String,
	pub description: Option<String>,
	pub category:    Option<String>,
	pub price:       f64,
	pub unit:        String,
	pub stock:       i32,
	pub photo:       Option<String>,
}

impl NewProduct {
	/// Insert this [`NewProduct`] into the database.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<Product, Error> {
		let new_product = conn
			.interact(|conn| {
				diesel::insert_into(product::table)
					.values(self)
					.returning(Product::as_returning())
					.get_result(conn)
			})
			.await??;

		Ok(new_product)
	}
}

#[derive(AsChangeset, Clone, Debug, Deserialize)]
#[diesel(table_name = product)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
	pub name:         Option<String>,
	pub description:  Option<String>,
	pub category:     Option<String>,
	pub price:        Option<f64>,
	pub unit:         Option<String>,
	pub stock:        Option<i32>,
	pub photo:        Option<String>,
	pub is_available: Option<bool>,
}

impl ProductUpdate {
	/// Apply this update to the product with the given id.
	///
	/// # Errors
	#[instrument(skip(conn))]
	pub async fn apply_to(
		self,
		pid: i32,
		conn: &DbConn,
	) -> Result<Product, Error> {
		let updated = conn
			.interact(move |conn| {
				diesel::update(product::table.filter(product::id.eq(pid)))
					.set((self, product::updated_at.eq(diesel::dsl::now)))
					.returning(Product::as_returning())
					.get_result(conn)
					.optional()
			})
			.await??;

		updated.ok_or_else(|| Error::NotFound(format!("product {pid}")))
	}
}
