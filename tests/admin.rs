use axum::http::StatusCode;
use gardenmap::models::Role;
use gardenmap::schemas::admin::DashboardResponse;
use gardenmap::schemas::garden::GardenResponse;
use gardenmap::schemas::profile::ProfileResponse;

mod common;

use common::{TEST_PASSWORD, TestEnv};

#[tokio::test(flavor = "multi_thread")]
async fn admins_can_promote_and_demote_profiles() {
	let env = TestEnv::new().await;

	env.seed_profile("Ana", "ana@example.com", Role::Admin).await;
	let target = env.seed_profile("Paulo", "paulo@example.com", Role::User).await;

	env.login("ana@example.com").await;

	let response = env
		.app
		.put(&format!("/admin/profiles/{}/role", target.id))
		.json(&serde_json::json!({ "role": "manager" }))
		.await;

	assert_eq!(response.status_code(), StatusCode::OK);
	assert_eq!(response.json::<ProfileResponse>().role, Role::Manager);

	let response = env
		.app
		.put(&format!("/admin/profiles/{}/role", target.id))
		.json(&serde_json::json!({ "role": "user" }))
		.await;

	assert_eq!(response.status_code(), StatusCode::OK);
	assert_eq!(response.json::<ProfileResponse>().role, Role::User);
}

#[tokio::test(flavor = "multi_thread")]
async fn admins_cannot_change_their_own_role() {
	let env = TestEnv::new().await;

	let admin = env.seed_profile("Ana", "ana@example.com", Role::Admin).await;

	env.login("ana@example.com").await;

	let response = env
		.app
		.put(&format!("/admin/profiles/{}/role", admin.id))
		.json(&serde_json::json!({ "role": "user" }))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test(flavor = "multi_thread")]
async fn the_management_surface_is_admin_only() {
	let env = TestEnv::new().await;

	env.seed_profile("Maria", "maria@example.com", Role::Manager).await;

	// Anonymous callers never reach the admin check
	let response = env.app.get("/admin/dashboard").await;
	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

	env.login("maria@example.com").await;

	let response = env.app.get("/admin/dashboard").await;
	assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test(flavor = "multi_thread")]
async fn deactivated_profiles_cannot_log_in() {
	let env = TestEnv::new().await;

	env.seed_profile("Ana", "ana@example.com", Role::Admin).await;
	let target = env.seed_profile("Paulo", "paulo@example.com", Role::User).await;

	env.login("ana@example.com").await;

	let response = env
		.app
		.put(&format!("/admin/profiles/{}/active", target.id))
		.json(&serde_json::json!({ "isActive": false }))
		.await;

	assert_eq!(response.status_code(), StatusCode::OK);
	assert!(!response.json::<ProfileResponse>().is_active);

	let response = env
		.app
		.post("/auth/login")
		.json(&serde_json::json!({
			"email":    "paulo@example.com",
			"password": TEST_PASSWORD,
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test(flavor = "multi_thread")]
async fn assigning_a_manager_requires_a_managing_role() {
	let env = TestEnv::new().await;

	env.seed_profile("Ana", "ana@example.com", Role::Admin).await;
	let user = env.seed_profile("Paulo", "paulo@example.com", Role::User).await;
	let manager =
		env.seed_profile("Maria", "maria@example.com", Role::Manager).await;
	let orphan = env.seed_garden(None, -23.5329, -46.7918, true).await;

	env.login("ana@example.com").await;

	let response = env
		.app
		.put(&format!("/admin/gardens/{}/manager", orphan.id))
		.json(&serde_json::json!({ "managerId": user.id }))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

	let response = env
		.app
		.put(&format!("/admin/gardens/{}/manager", orphan.id))
		.json(&serde_json::json!({ "managerId": manager.id }))
		.await;

	assert_eq!(response.status_code(), StatusCode::OK);
	assert_eq!(response.json::<GardenResponse>().manager_id, Some(manager.id));
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_manager_orphans_their_gardens() {
	let env = TestEnv::new().await;

	env.seed_profile("Ana", "ana@example.com", Role::Admin).await;
	let other_admin =
		env.seed_profile("Bia", "bia@example.com", Role::Admin).await;
	let manager =
		env.seed_profile("Maria", "maria@example.com", Role::Manager).await;
	let garden =
		env.seed_garden(Some(manager.id), -23.5329, -46.7918, true).await;

	env.login("ana@example.com").await;

	// Admin accounts stay, even for another admin
	let response =
		env.app.delete(&format!("/admin/profiles/{}", other_admin.id)).await;
	assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

	let response =
		env.app.delete(&format!("/admin/profiles/{}", manager.id)).await;
	assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

	let response = env.app.get("/admin/gardens").await;
	assert_eq!(response.status_code(), StatusCode::OK);

	let gardens = response.json::<Vec<GardenResponse>>();
	let orphaned = gardens.iter().find(|g| g.id == garden.id).unwrap();

	assert_eq!(orphaned.manager_id, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_reports_profile_and_garden_counts() {
	let env = TestEnv::new().await;

	env.seed_profile("Ana", "ana@example.com", Role::Admin).await;
	env.seed_profile("Maria", "maria@example.com", Role::Manager).await;
	env.seed_profile("Paulo", "paulo@example.com", Role::User).await;
	env.seed_garden(None, -23.5329, -46.7918, true).await;
	env.seed_garden(None, -23.5429, -46.7918, true).await;
	env.seed_garden(None, -23.5529, -46.7918, false).await;

	env.login("ana@example.com").await;

	let response = env.app.get("/admin/dashboard").await;
	assert_eq!(response.status_code(), StatusCode::OK);

	let dashboard = response.json::<DashboardResponse>();

	assert_eq!(dashboard.profiles.total, 3);
	assert_eq!(dashboard.gardens.active, 2);
	assert_eq!(dashboard.gardens.inactive, 1);
	assert_eq!(dashboard.gardens.total, 3);

	let admins = dashboard
		.profiles
		.by_role
		.iter()
		.find(|count| count.role == Role::Admin)
		.unwrap();

	assert_eq!(admins.total, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn soft_deleted_gardens_are_hidden_from_the_public_listing() {
	let env = TestEnv::new().await;

	env.seed_profile("Ana", "ana@example.com", Role::Admin).await;
	let active = env.seed_garden(None, -23.5329, -46.7918, true).await;
	let hidden = env.seed_garden(None, -23.5429, -46.7918, false).await;

	// Anonymous listing only ever shows active gardens
	let response = env.app.get("/gardens").await;
	assert_eq!(response.status_code(), StatusCode::OK);

	let ids: Vec<i32> =
		response.json::<Vec<GardenResponse>>().iter().map(|g| g.id).collect();

	assert!(ids.contains(&active.id));
	assert!(!ids.contains(&hidden.id));

	// The old filter parameter is ignored rather than honored
	let response = env.app.get("/gardens").add_query_param("active", false).await;
	assert_eq!(response.status_code(), StatusCode::OK);

	let ids: Vec<i32> =
		response.json::<Vec<GardenResponse>>().iter().map(|g| g.id).collect();

	assert!(!ids.contains(&hidden.id));

	// Admins see it through the management listing
	env.login("ana@example.com").await;

	let response =
		env.app.get("/admin/gardens").add_query_param("active", false).await;
	assert_eq!(response.status_code(), StatusCode::OK);

	let ids: Vec<i32> =
		response.json::<Vec<GardenResponse>>().iter().map(|g| g.id).collect();

	assert_eq!(ids, vec![hidden.id]);
}
