use axum::http::StatusCode;
use gardenmap::geo::{self, DistanceStrategy, GeoQuery};
use gardenmap::models::Garden;
use gardenmap::schemas::garden::NearbyGardenResponse;

mod common;

use common::TestEnv;

const QUERY_LAT: f64 = -23.5329;
const QUERY_LNG: f64 = -46.7918;

#[tokio::test(flavor = "multi_thread")]
async fn nearby_filters_inactive_and_orders_by_distance() {
	let env = TestEnv::new().await;

	// One degree of latitude is roughly 111.2 km, so these sit at about
	// 1.1 km, 4.4 km, and 6.7 km from the query point
	let near =
		env.seed_garden(None, QUERY_LAT + 0.01, QUERY_LNG, true).await;
	let mid = env.seed_garden(None, QUERY_LAT + 0.04, QUERY_LNG, true).await;
	let far = env.seed_garden(None, QUERY_LAT + 0.06, QUERY_LNG, true).await;
	let hidden =
		env.seed_garden(None, QUERY_LAT + 0.001, QUERY_LNG, false).await;

	let response = env
		.app
		.get("/gardens/nearby")
		.add_query_param("latitude", QUERY_LAT)
		.add_query_param("longitude", QUERY_LNG)
		.await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let found = response.json::<Vec<NearbyGardenResponse>>();
	let ids: Vec<i32> = found.iter().map(|f| f.garden.id).collect();

	// The default 5 km radius keeps the first two, closest first; the
	// inactive garden is the closest of all and still filtered out
	assert_eq!(ids, vec![near.id, mid.id]);
	assert!(!ids.contains(&far.id));
	assert!(!ids.contains(&hidden.id));

	// The SQL expression agrees with the reference haversine to under a
	// meter
	for entry in &found {
		let expected = geo::haversine_distance_m(
			QUERY_LAT,
			QUERY_LNG,
			entry.garden.latitude,
			entry.garden.longitude,
		);

		assert!((entry.distance_m - expected).abs() < 1.0);
	}
}

#[tokio::test(flavor = "multi_thread")]
async fn radius_boundary_is_inclusive() {
	let env = TestEnv::new().await;

	let garden =
		env.seed_garden(None, QUERY_LAT + 0.03, QUERY_LNG, true).await;

	let conn = env.pool.get().await.unwrap();

	// Read back the distance postgres itself computes for this row, so the
	// boundary query below compares bit-identical values
	let wide_query = GeoQuery {
		latitude:  QUERY_LAT,
		longitude: QUERY_LNG,
		radius:    50_000.0,
	};
	let found =
		Garden::find_nearby(wide_query, DistanceStrategy::Haversine, &conn)
			.await
			.unwrap();

	assert_eq!(found.len(), 1);
	assert_eq!(found[0].garden.id, garden.id);

	let exact_distance = found[0].distance_m;

	// A garden at exactly the radius is included
	let at_boundary = GeoQuery {
		latitude:  QUERY_LAT,
		longitude: QUERY_LNG,
		radius:    exact_distance,
	};
	let found =
		Garden::find_nearby(at_boundary, DistanceStrategy::Haversine, &conn)
			.await
			.unwrap();

	assert_eq!(found.len(), 1);

	// A hair under the distance excludes it
	let inside_boundary = GeoQuery {
		latitude:  QUERY_LAT,
		longitude: QUERY_LNG,
		radius:    exact_distance - 0.01,
	};
	let found = Garden::find_nearby(
		inside_boundary,
		DistanceStrategy::Haversine,
		&conn,
	)
	.await
	.unwrap();

	assert!(found.is_empty());
}
