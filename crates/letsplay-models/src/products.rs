//! Product entities and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use letsplay_core::PaginationParams;
use letsplay_core::serde::{deserialize_nullable, deserialize_optional_uuid};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 19.99)]
    pub price: f64,
    pub category: Option<String>,
    pub stock: i32,
    /// The user who created the product. Never changes.
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/products` and `PUT /api/products/{id}`.
///
/// There is no owner field: the owner always comes from the
/// caller's token, and an `owner_id` key in the body is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Retro Console")]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    #[schema(example = 149.5)]
    pub price: f64,
    #[validate(length(max = 50))]
    #[schema(example = "consoles")]
    pub category: Option<String>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock: i32,
}

impl CreateProductDto {
    pub fn into_new_product(self, owner_id: Uuid) -> NewProduct {
        NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            stock: self.stock,
            owner_id,
        }
    }

    /// Full replacement of the mutable fields. Id, owner and creation time
    /// are kept.
    pub fn replace(self, product: &mut Product) {
        product.name = self.name;
        product.description = self.description;
        product.price = self.price;
        product.category = self.category;
        product.stock = self.stock;
    }
}

/// Body of `PATCH /api/products/{id}`. Only present fields change; an
/// explicit `null` clears `description` or `category`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PatchProductDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(max = 50))]
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
}

impl PatchProductDto {
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
    }
}

/// A validated product with its owner resolved, ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub stock: i32,
    pub owner_id: Uuid,
}

/// Query parameters for `GET /api/products`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProductFilterParams {
    /// Exact category match
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub owner_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Resolved product query handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub owner_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

impl From<ProductFilterParams> for ProductFilter {
    fn from(params: ProductFilterParams) -> Self {
        Self {
            category: params.category.filter(|c| !c.is_empty()),
            owner_id: params.owner_id,
            limit: params.pagination.limit(),
            offset: params.pagination.offset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: "Arcade Stick".to_string(),
            description: None,
            price: 89.0,
            category: Some("controllers".to_string()),
            stock: 4,
            owner_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_create_dto_ignores_owner_id() {
        let dto: CreateProductDto = serde_json::from_str(
            r#"{"name":"Pad","price":10.5,"owner_id":"00000000-0000-0000-0000-000000000000"}"#,
        )
        .unwrap();
        let owner = Uuid::new_v4();
        let new = dto.into_new_product(owner);
        assert_eq!(new.owner_id, owner);
        assert_eq!(new.stock, 0);
    }

    #[test]
    fn test_create_dto_validation() {
        let valid: CreateProductDto =
            serde_json::from_str(r#"{"name":"Pad","price":0,"stock":3}"#).unwrap();
        assert!(valid.validate().is_ok());

        let negative: CreateProductDto =
            serde_json::from_str(r#"{"name":"Pad","price":-1}"#).unwrap();
        assert!(negative.validate().is_err());

        let empty_name: CreateProductDto =
            serde_json::from_str(r#"{"name":"","price":1}"#).unwrap();
        assert!(empty_name.validate().is_err());

        let negative_stock: CreateProductDto =
            serde_json::from_str(r#"{"name":"Pad","price":1,"stock":-2}"#).unwrap();
        assert!(negative_stock.validate().is_err());
    }

    #[test]
    fn test_replace_keeps_identity_and_owner() {
        let mut p = product();
        let (id, owner, created) = (p.id, p.owner_id, p.created_at);
        let dto: CreateProductDto =
            serde_json::from_str(r#"{"name":"Fight Stick","price":120}"#).unwrap();
        dto.replace(&mut p);

        assert_eq!(p.name, "Fight Stick");
        assert_eq!(p.price, 120.0);
        assert_eq!(p.category, None);
        assert_eq!(p.stock, 0);
        assert_eq!((p.id, p.owner_id, p.created_at), (id, owner, created));
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut p = product();
        let patch = PatchProductDto {
            price: Some(75.0),
            ..Default::default()
        };
        patch.apply(&mut p);

        assert_eq!(p.price, 75.0);
        assert_eq!(p.name, "Arcade Stick");
        assert_eq!(p.category.as_deref(), Some("controllers"));
        assert_eq!(p.stock, 4);
    }

    #[test]
    fn test_patch_null_clears_optional_fields() {
        let mut p = product();
        p.description = Some("Six buttons".to_string());

        let patch: PatchProductDto =
            serde_json::from_str(r#"{"description":null,"category":null}"#).unwrap();
        patch.apply(&mut p);
        assert_eq!(p.description, None);
        assert_eq!(p.category, None);

        let mut p = product();
        let patch: PatchProductDto = serde_json::from_str(r#"{"category":"fightsticks"}"#).unwrap();
        patch.apply(&mut p);
        assert_eq!(p.category.as_deref(), Some("fightsticks"));
        assert_eq!(p.name, "Arcade Stick");
    }

    #[test]
    fn test_patch_validation() {
        let patch = PatchProductDto {
            price: Some(-0.01),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
        assert!(PatchProductDto::default().validate().is_ok());
    }

    #[test]
    fn test_filter_from_params() {
        let params = ProductFilterParams {
            category: Some(String::new()),
            owner_id: None,
            pagination: PaginationParams {
                limit: Some(5),
                offset: None,
                page: Some(3),
            },
        };
        let filter = ProductFilter::from(params);
        assert_eq!(filter.category, None);
        assert_eq!(filter.limit, 5);
        assert_eq!(filter.offset, 10);
    }
}
