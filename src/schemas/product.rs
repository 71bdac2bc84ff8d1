use serde::{Deserialize, Serialize};
use validator_derive::Validate;

use crate::models::{NewProduct, ProductUpdate};

fn default_unit() -> String { "kg".to_string() }

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
	#[validate(length(
		min = 1,
		max = 255,
		message = "name must be between 1 and 255 characters"
	))]
	pub name:        String,
	pub description: Option<String>,
	pub category:    Option<String>,
	#[validate(range(min = 0.0, message = "price must not be negative"))]
	pub price:       f64,
	#[serde(default = "default_unit")]
	pub unit:        String,
	#[validate(range(min = 0, message = "stock must not be negative"))]
	#[serde(default)]
	pub stock:       i32,
	pub photo:       Option<String>,
}

impl CreateProductRequest {
	#[must_use]
	pub fn to_insertable(self, garden_id: i32) -> NewProduct {
		NewProduct {
			garden_id,
			name: self.name,
			description: self.description,
			category: self.category,
			price: self.price,
			unit: self.unit,
			stock: self.stock,
			photo: self.photo,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
	#[validate(length(
		min = 1,
		max = 255,
		message = "name must be between 1 and 255 characters"
	))]
	pub name:         Option<String>,
	pub description:  Option<String>,
	pub category:     Option<String>,
	#[validate(range(min = 0.0, message = "price must not be negative"))]
	pub price:        Option<f64>,
	pub unit:         Option<String>,
	#[validate(range(min = 0, message = "stock must not be negative"))]
	pub stock:        Option<i32>,
	pub photo:        Option<String>,
	pub is_available: Option<bool>,
}

impl From<UpdateProductRequest> for ProductUpdate {
	fn from(value: UpdateProductRequest) -> Self {
		Self {
			name:         value.name,
			description:  value.description,
			category:     value.category,
			price:        value.price,
			unit:         value.unit,
			stock:        value.stock,
			photo:        value.photo,
			is_available: value.is_available,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unit_and_stock_get_defaults() {
		let request: CreateProductRequest = serde_json::from_value(
			serde_json::json!({ "name": "Tomatoes", "price": 4.5 }),
		)
		.unwrap();

		assert_eq!(request.unit, "kg");
		assert_eq!(request.stock, 0);
	}
}
