use std::time::Duration;

use axum::Router;
use axum::routing::{delete, get, patch, post, put};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::controllers::admin::{
	assign_manager,
	delete_profile,
	get_all_gardens,
	get_dashboard,
	get_managers,
	get_profile_detail,
	get_profiles,
	set_profile_active,
	set_profile_role,
};
use crate::controllers::auth::{
	login_profile,
	logout_profile,
	register_profile,
};
use crate::controllers::garden::{
	create_garden,
	delete_garden,
	get_garden,
	get_gardens,
	get_nearby_gardens,
	hard_delete_garden,
	update_garden,
};
use crate::controllers::healthcheck;
use crate::controllers::product::{
	create_product,
	delete_product,
	get_products,
	update_product,
};
use crate::controllers::profile::{get_current_profile, get_my_gardens};
use crate::controllers::schedule::{
	check_open_now,
	get_schedule,
	replace_week,
	set_status,
	upsert_day,
};
use crate::middleware::{AdminLayer, AuthLayer};

/// Get the app router
pub fn get_app_router(state: AppState) -> Router {
	let api_routes = Router::new()
		.route("/healthcheck", get(healthcheck))
		.nest("/auth", auth_routes(&state))
		.nest("/profile", profile_routes(&state))
		.nest("/gardens", garden_routes(&state))
		.nest("/admin", admin_routes(&state));

	Router::new()
		.merge(api_routes)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::new(Duration::from_secs(10)))
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}

/// Authentication routes
fn auth_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/register", post(register_profile))
		.route("/login", post(login_profile))
		.route(
			"/logout",
			post(logout_profile).route_layer(AuthLayer::new(state.clone())),
		)
}

/// Profile routes
fn profile_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/me", get(get_current_profile))
		.route("/me/gardens", get(get_my_gardens))
		.route_layer(AuthLayer::new(state.clone()))
}

/// Admin management routes
fn admin_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/dashboard", get(get_dashboard))
		.route("/profiles", get(get_profiles))
		.route(
			"/profiles/{pid}",
			get(get_profile_detail).delete(delete_profile),
		)
		.route("/profiles/{pid}/role", put(set_profile_role))
		.route("/profiles/{pid}/active", put(set_profile_active))
		.route("/managers", get(get_managers))
		.route("/gardens", get(get_all_gardens))
		.route("/gardens/{gid}/manager", put(assign_manager))
		.route_layer(AdminLayer::new())
		.route_layer(AuthLayer::new(state.clone()))
}

/// Garden routes with auth protection for write operations
fn garden_routes(state: &AppState) -> Router<AppState> {
	let protected = Router::new()
		.route("/{gid}/permanent", delete(hard_delete_garden))
		.route_layer(AdminLayer::new())
		.route_layer(AuthLayer::new(state.clone()));

	let authenticated = Router::new()
		.route("/", post(create_garden))
		.route("/{gid}", patch(update_garden).delete(delete_garden))
		.route("/{gid}/schedule", put(replace_week))
		.route("/{gid}/schedule/{weekday}", put(upsert_day))
		.route("/{gid}/status", patch(set_status))
		.route("/{gid}/products", post(create_product))
		.route(
			"/{gid}/products/{pid}",
			patch(update_product).delete(delete_product),
		)
		.route_layer(AuthLayer::new(state.clone()));

	Router::new()
		.route("/", get(get_gardens))
		.route("/nearby", get(get_nearby_gardens))
		.route("/{gid}", get(get_garden))
		.route("/{gid}/schedule", get(get_schedule))
		.route("/{gid}/open-now", get(check_open_now))
		.route("/{gid}/products", get(get_products))
		.merge(authenticated)
		.merge(protected)
}
