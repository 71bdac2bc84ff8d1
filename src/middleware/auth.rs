//! Middleware to authorize callers and store their profile on the request

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::RequestExt;
use axum::body::Body;
use axum::extract::Request;
use axum::http::Response;
use axum::response::IntoResponse;
use axum_extra::extract::PrivateCookieJar;
use tower::{Layer, Service};

use crate::error::{LoginError, TokenError};
use crate::models::Profile;
use crate::{AppState, Error, ProfileId};

/// Middleware layer that guarantees a request carries a valid access token
/// belonging to an active profile
///
/// The loaded [`Profile`] and its [`ProfileId`] are stored as request
/// extensions, controllers access them through the
/// [`identity`](crate::identity) extractors
#[derive(Clone)]
pub struct AuthLayer {
	state: AppState,
}

impl AuthLayer {
	#[must_use]
	pub fn new(state: AppState) -> Self { Self { state } }
}

impl<S> Layer<S> for AuthLayer {
	type Service = AuthMiddleware<S>;

	fn layer(&self, inner: S) -> Self::Service {
		AuthMiddleware { inner, state: self.state.clone() }
	}
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
	inner: S,
	state: AppState,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
	S: Service<Request, Response = Response<Body>> + Clone + Send + 'static,
	S::Future: Send + 'static,
{
	type Error = S::Error;
	type Future = Pin<
		Box<
			dyn Future<Output = Result<Self::Response, Self::Error>>
				+ Send
				+ 'static,
		>,
	>;
	type Response = S::Response;

	fn poll_ready(
		&mut self,
		cx: &mut Context<'_>,
	) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	#[instrument(skip_all)]
	fn call(&mut self, mut req: Request<Body>) -> Self::Future {
		let cloned_inner = self.inner.clone();
		let mut inner = std::mem::replace(&mut self.inner, cloned_inner);

		let state = self.state.clone();

		Box::pin(async move {
			// Unwrap is safe, extracting a private cookie jar is infallible
			let jar = req
				.extract_parts_with_state::<PrivateCookieJar, _>(&state)
				.await
				.unwrap();

			let Some(access_token) =
				jar.get(&state.config.access_token_name)
			else {
				info!("got request without access token");

				return Ok(
					Error::from(TokenError::MissingAccessToken).into_response()
				);
			};

			// A tampered cookie never survives the private jar, but an old
			// token from a previous deployment might
			let Ok(profile_id) = access_token.value().parse::<i32>() else {
				warn!("got access token with malformed contents");

				return Ok(
					Error::from(TokenError::MissingAccessToken).into_response()
				);
			};

			let conn = match state.database_pool.get().await {
				Ok(conn) => conn,
				Err(e) => return Ok(Error::from(e).into_response()),
			};

			let profile = match Profile::get(profile_id, &conn).await {
				Ok(p) => p,
				Err(e) => return Ok(e.into_response()),
			};

			if !profile.is_active {
				debug!("denied request from disabled profile {}", profile.id);

				return Ok(Error::from(LoginError::Disabled).into_response());
			}

			req.extensions_mut().insert(ProfileId(profile.id));
			req.extensions_mut().insert(profile);

			inner.call(req).await
		})
	}
}
