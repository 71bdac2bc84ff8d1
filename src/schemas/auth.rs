use serde::{Deserialize, Serialize};
use validator_derive::Validate;

use crate::Error;
use crate::models::{NewProfile, Role};

/// Self-registration request
#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
	#[validate(length(
		min = 2,
		max = 255,
		message = "name must be between 2 and 255 characters"
	))]
	pub name:     String,
	#[validate(email(message = "email must be a valid email address"))]
	pub email:    String,
	#[validate(length(
		min = 8,
		message = "password must be at least 8 characters"
	))]
	pub password: String,
	pub phone:    Option<String>,
	pub role:     Option<Role>,
}

impl RegisterRequest {
	/// The role the new profile gets, defaulting to a plain user.
	///
	/// Admin accounts are created out of band, never through registration.
	///
	/// # Errors
	pub fn requested_role(&self) -> Result<Role, Error> {
		match self.role {
			None => Ok(Role::User),
			Some(Role::Admin) => Err(Error::ValidationError(
				"admin accounts cannot be self-registered".to_string(),
			)),
			Some(role) => Ok(role),
		}
	}

	#[must_use]
	pub fn to_insertable(&self, password_hash: String, role: Role) -> NewProfile {
		NewProfile {
			name: self.name.clone(),
			email: self.email.clone(),
			password_hash,
			phone: self.phone.clone(),
			role,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
	#[validate(email(message = "email must be a valid email address"))]
	pub email:    String,
	pub password: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn request(role: Option<Role>) -> RegisterRequest {
		RegisterRequest {
			name: "Maria Silva".to_string(),
			email: "maria@example.com".to_string(),
			password: "hunter2hunter2".to_string(),
			phone: None,
			role,
		}
	}

	#[test]
	fn registration_defaults_to_plain_user() {
		assert_eq!(request(None).requested_role().unwrap(), Role::User);
		assert_eq!(
			request(Some(Role::Manager)).requested_role().unwrap(),
			Role::Manager
		);
	}

	#[test]
	fn admin_registration_is_rejected() {
		assert!(matches!(
			request(Some(Role::Admin)).requested_role(),
			Err(Error::ValidationError(_))
		));
	}
}
