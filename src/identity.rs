//! Extractors for the authenticated profile
//!
//! The auth middleware stores the loaded [`Profile`] on the request, these
//! extractors hand it to controllers.
//!
//! ```rs
//! pub async fn foo_route(CurrentProfile(profile): CurrentProfile) -> impl IntoResponse {
//!     println!("{:?}", profile.id);
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::Error;
use crate::error::InternalServerError;
use crate::models::Profile;

/// The profile of the authenticated caller
#[derive(Clone, Debug)]
pub struct CurrentProfile(pub Profile);

impl<S> FromRequestParts<S> for CurrentProfile
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut Parts,
		_state: &S,
	) -> Result<Self, Self::Rejection> {
		let Some(profile) = parts.extensions.get::<Profile>() else {
			return Err(InternalServerError::ProfileWithoutAuthError.into());
		};

		Ok(Self(profile.clone()))
	}
}
