//! Controllers for registration and session cookies

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::State;
use axum::response::NoContent;
use axum::{Extension, Json};
use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use validator::Validate;

use crate::error::LoginError;
use crate::models::Profile;
use crate::schemas::auth::{LoginRequest, RegisterRequest};
use crate::schemas::profile::ProfileResponse;
use crate::{Config, DbPool, Error, ProfileId};

#[instrument(skip(pool, register_data))]
pub(crate) async fn register_profile(
	State(pool): State<DbPool>,
	Json(register_data): Json<RegisterRequest>,
) -> Result<Json<ProfileResponse>, Error> {
	register_data.validate()?;

	let role = register_data.requested_role()?;

	let salt = SaltString::generate(&mut OsRng);
	let password_hash = Argon2::default()
		.hash_password(register_data.password.as_bytes(), &salt)?
		.to_string();

	let conn = pool.get().await?;
	let new_profile = register_data
		.to_insertable(password_hash, role)
		.insert(&conn)
		.await?;

	info!(
		"registered new profile id: {} email: {}",
		new_profile.id, new_profile.email
	);

	Ok(Json(new_profile.into()))
}

#[instrument(skip(pool, config, jar, login_data))]
pub(crate) async fn login_profile(
	State(pool): State<DbPool>,
	State(config): State<Config>,
	jar: PrivateCookieJar,
	Json(login_data): Json<LoginRequest>,
) -> Result<(PrivateCookieJar, Json<ProfileResponse>), Error> {
	login_data.validate()?;

	let conn = pool.get().await?;
	let profile = Profile::get_by_email(login_data.email, &conn).await?;

	let password_hash = PasswordHash::new(&profile.password_hash)?;
	Argon2::default()
		.verify_password(login_data.password.as_bytes(), &password_hash)?;

	if !profile.is_active {
		return Err(LoginError::Disabled.into());
	}

	let secure = config.production;
	let access_token =
		Cookie::build((config.access_token_name, profile.id.to_string()))
			.domain("")
			.http_only(true)
			.max_age(config.access_token_lifetime)
			.path("/")
			.same_site(SameSite::Lax)
			.secure(secure);

	let jar = jar.add(access_token);

	info!("logged in profile {}", profile.id);

	Ok((jar, Json(profile.into())))
}

#[instrument(skip(config, jar))]
pub(crate) async fn logout_profile(
	State(config): State<Config>,
	jar: PrivateCookieJar,
	Extension(profile_id): Extension<ProfileId>,
) -> Result<(PrivateCookieJar, NoContent), Error> {
	let secure = config.production;

	let revoked_access_token = Cookie::build((config.access_token_name, ""))
		.domain("")
		.http_only(true)
		.max_age(time::Duration::hours(-1))
		.path("/")
		.same_site(SameSite::Lax)
		.secure(secure);

	let jar = jar.add(revoked_access_token);

	info!("logged out profile {profile_id}");

	Ok((jar, NoContent))
}
