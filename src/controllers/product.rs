//! Controllers for garden products

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::NoContent;
use serde::Deserialize;
use validator::Validate;

use crate::identity::CurrentProfile;
use crate::models::{Garden, Product, ProductUpdate};
use crate::schemas::product::{CreateProductRequest, UpdateProductRequest};
use crate::{DbPool, Error};

#[derive(Clone, Copy, Debug, Deserialize)]
pub(crate) struct ProductFilter {
	available: Option<bool>,
}

#[instrument(skip(pool))]
pub(crate) async fn get_products(
	State(pool): State<DbPool>,
	Path(gid): Path<i32>,
	Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>, Error> {
	let conn = pool.get().await?;

	// A missing garden yields a 404 rather than an empty list
	Garden::get_by_id(gid, &conn).await?;

	let products =
		Product::get_for_garden(gid, filter.available.unwrap_or(true), &conn)
			.await?;

	Ok(Json(products))
}

#[instrument(skip(pool, profile, create_data))]
pub(crate) async fn create_product(
	State(pool): State<DbPool>,
	CurrentProfile(profile): CurrentProfile,
	Path(gid): Path<i32>,
	Json(create_data): Json<CreateProductRequest>,
) -> Result<Json<Product>, Error> {
	create_data.validate()?;

	let conn = pool.get().await?;

	let garden = Garden::get_by_id(gid, &conn).await?;
	garden.ensure_managed_by(&profile)?;

	let new_product = create_data.to_insertable(gid).insert(&conn).await?;

	info!(
		"profile {} added product {} to garden {gid}",
		profile.id, new_product.id
	);

	Ok(Json(new_product))
}

#[instrument(skip(pool, profile, update_data))]
pub(crate) async fn update_product(
	State(pool): State<DbPool>,
	CurrentProfile(profile): CurrentProfile,
	Path((gid, pid)): Path<(i32, i32)>,
	Json(update_data): Json<UpdateProductRequest>,
) -> Result<Json<Product>, Error> {
	update_data.validate()?;

	let conn = pool.get().await?;

	let garden = Garden::get_by_id(gid, &conn).await?;
	garden.ensure_managed_by(&profile)?;

	let product = Product::get_by_id(pid, &conn).await?;
	if product.garden_id != gid {
		return Err(Error::NotFound(format!("product {pid}")));
	}

	let updated = ProductUpdate::from(update_data).apply_to(pid, &conn).await?;

	Ok(Json(updated))
}

#[instrument(skip(pool, profile))]
pub(crate) async fn delete_product(
	State(pool): State<DbPool>,
	CurrentProfile(profile): CurrentProfile,
	Path((gid, pid)): Path<(i32, i32)>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	let garden = Garden::get_by_id(gid, &conn).await?;
	garden.ensure_managed_by(&profile)?;

	let product = Product::get_by_id(pid, &conn).await?;
	if product.garden_id != gid {
		return Err(Error::NotFound(format!("product {pid}")));
	}

	Product::delete_by_id(pid, &conn).await?;

	info!(
		"profile {} removed product {pid} from garden {gid}",
		profile.id
	);

	Ok(NoContent)
}
