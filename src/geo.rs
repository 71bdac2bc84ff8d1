//! Geographic query primitives for the nearby-garden search

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator_derive::Validate;

/// Mean Earth radius in meters, shared by every distance computation so both
/// strategies agree on the same sphere
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Default search radius in meters
pub const DEFAULT_RADIUS_M: f64 = 5_000.0;

/// How garden distances are computed, fixed once at startup
///
/// A full-featured postgres can delegate to PostGIS geography functions, a
/// managed database without the extension falls back to a haversine
/// expression evaluated by the query itself. Both filter and order
/// identically, callers never see the difference.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DistanceStrategy {
	Postgis,
	Haversine,
}

impl FromStr for DistanceStrategy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"postgis" => Ok(Self::Postgis),
			"haversine" => Ok(Self::Haversine),
			_ => Err(format!(
				"unknown geo strategy '{s}', expected 'postgis' or 'haversine'"
			)),
		}
	}
}

/// An ephemeral nearby-search request, never persisted
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GeoQuery {
	#[validate(range(
		min = -90.0,
		max = 90.0,
		message = "latitude must be between -90 and 90",
		code = "latitude-range"
	))]
	pub latitude:  f64,
	#[validate(range(
		min = -180.0,
		max = 180.0,
		message = "longitude must be between -180 and 180",
		code = "longitude-range"
	))]
	pub longitude: f64,
	/// Search radius in meters
	#[serde(default = "default_radius")]
	#[validate(range(
		min = 100.0,
		max = 50_000.0,
		message = "radius must be between 100 and 50000 meters",
		code = "radius-range"
	))]
	pub radius:    f64,
}

fn default_radius() -> f64 { DEFAULT_RADIUS_M }

/// Great-circle distance in meters between two coordinates, via the
/// haversine formula on the mean Earth radius
///
/// This is the reference implementation of the SQL expression used by
/// [`DistanceStrategy::Haversine`]
#[must_use]
pub fn haversine_distance_m(
	lat1: f64,
	lng1: f64,
	lat2: f64,
	lng2: f64,
) -> f64 {
	let d_lat = (lat2 - lat1).to_radians();
	let d_lng = (lng2 - lng1).to_radians();

	let a = (d_lat / 2.0).sin().powi(2)
		+ lat1.to_radians().cos()
			* lat2.to_radians().cos()
			* (d_lng / 2.0).sin().powi(2);

	2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}
