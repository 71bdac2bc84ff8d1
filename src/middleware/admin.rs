//! Middleware to restrict a route to admins
//!
//! Must sit behind [`AuthLayer`](super::AuthLayer), which loads the profile
//! onto the request.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::Request;
use axum::http::Response;
use axum::response::IntoResponse;
use tower::{Layer, Service};

use crate::Error;
use crate::models::{Profile, Role};

#[derive(Clone)]
pub struct AdminLayer;

impl AdminLayer {
	#[must_use]
	pub fn new() -> Self { Self }
}

impl Default for AdminLayer {
	fn default() -> Self { Self::new() }
}

impl<S> Layer<S> for AdminLayer {
	type Service = AdminMiddleware<S>;

	fn layer(&self, inner: S) -> Self::Service { AdminMiddleware { inner } }
}

#[derive(Clone)]
pub struct AdminMiddleware<S> {
	inner: S,
}

impl<S> Service<Request<Body>> for AdminMiddleware<S>
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
	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let cloned_inner = self.inner.clone();
		let mut inner = std::mem::replace(&mut self.inner, cloned_inner);

		Box::pin(async move {
			let Some(profile) = req.extensions().get::<Profile>() else {
				debug!("got admin-gated request without a loaded profile");

				return Ok(Error::Forbidden.into_response());
			};

			if profile.role != Role::Admin {
				debug!("denied admin route to profile {}", profile.id);

				return Ok(Error::Forbidden.into_response());
			}

			inner.call(req).await
		})
	}
}
