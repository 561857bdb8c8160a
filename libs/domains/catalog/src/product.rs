use std::borrow::Cow;

use core_proc_macros::ApiResource;
use crud::{CrudError, CrudResult, Resource, unique_index};
use mongodb::IndexModel;
use mongodb::bson::{self, Bson, DateTime, Document, oid::ObjectId, serde_helpers};
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::image::default_active;
use crate::slug::slug_for;

/// Fields holding references to other catalog collections
pub const REFERENCE_FIELDS: [&str; 3] = ["categoryId", "typeId", "brandId"];

/// Sellable variant of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ProductVariant {
    /// Stock Keeping Unit
    #[validate(length(min = 1, max = 64, message = "sku must be between 1 and 64 characters"))]
    pub sku: String,
    /// Unit price
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    /// Units on hand
    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock: i64,
    /// Free-form attributes (size, colour, ...)
    #[serde(default)]
    #[schema(value_type = Object)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// Product entity - stored in the `products` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, ApiResource)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(
        rename(serialize = "id", deserialize = "_id"),
        serialize_with = "serde_helpers::serialize_object_id_as_hex_string"
    )]
    #[schema(value_type = String, example = "64b7f0c2a1b2c3d4e5f60718")]
    pub id: ObjectId,
    /// Product name
    pub name: String,
    /// Short display name
    #[serde(default)]
    pub nickname: Option<String>,
    /// Unique product code
    pub code: String,
    /// Category reference
    #[serde(default, serialize_with = "serialize_optional_object_id")]
    #[schema(value_type = Option<String>)]
    pub category_id: Option<ObjectId>,
    /// Type reference
    #[serde(default, serialize_with = "serialize_optional_object_id")]
    #[schema(value_type = Option<String>)]
    pub type_id: Option<ObjectId>,
    /// Brand reference
    #[serde(default, serialize_with = "serialize_optional_object_id")]
    #[schema(value_type = Option<String>)]
    pub brand_id: Option<ObjectId>,
    /// Rich description (HTML)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    /// Plain text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL slug derived from the name
    pub slug: String,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Creation timestamp
    #[serde(serialize_with = "serde_helpers::serialize_bson_datetime_as_rfc3339_string")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime,
    /// Last update timestamp
    #[serde(serialize_with = "serde_helpers::serialize_bson_datetime_as_rfc3339_string")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200, message = "name must be between 1 and 200 characters"))]
    #[schema(example = "Ultraboost 22")]
    pub name: String,
    #[validate(length(max = 100, message = "nickname must be at most 100 characters"))]
    pub nickname: Option<String>,
    #[validate(length(min = 1, max = 64, message = "code must be between 1 and 64 characters"))]
    #[schema(example = "UB-22")]
    pub code: String,
    #[validate(custom(function = "validate_object_id"))]
    pub category_id: Option<String>,
    #[validate(custom(function = "validate_object_id"))]
    pub type_id: Option<String>,
    #[validate(custom(function = "validate_object_id"))]
    pub brand_id: Option<String>,
    pub body_html: Option<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub variants: Vec<ProductVariant>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// DTO for updating an existing product
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200, message = "name must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 100, message = "nickname must be at most 100 characters"))]
    pub nickname: Option<String>,
    #[validate(length(min = 1, max = 64, message = "code must be between 1 and 64 characters"))]
    pub code: Option<String>,
    #[validate(custom(function = "validate_object_id"))]
    pub category_id: Option<String>,
    #[validate(custom(function = "validate_object_id"))]
    pub type_id: Option<String>,
    #[validate(custom(function = "validate_object_id"))]
    pub brand_id: Option<String>,
    pub body_html: Option<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    /// Replaces the whole variant list
    #[validate(nested)]
    pub variants: Option<Vec<ProductVariant>>,
    pub active: Option<bool>,
}

fn validate_object_id(value: &str) -> Result<(), ValidationError> {
    if ObjectId::parse_str(value).is_ok() {
        return Ok(());
    }
    Err(ValidationError::new("object_id").with_message(Cow::Borrowed("must be a valid ObjectId")))
}

fn serialize_optional_object_id<S: Serializer>(
    id: &Option<ObjectId>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match id {
        Some(id) => serializer.serialize_str(&id.to_hex()),
        None => serializer.serialize_none(),
    }
}

/// Hex strings in reference fields become ObjectIds in the stored document.
fn store_references(document: &mut Document) -> CrudResult<()> {
    for field in REFERENCE_FIELDS {
        let id = match document.get(field) {
            Some(Bson::String(hex)) => ObjectId::parse_str(hex)
                .map_err(|_| CrudError::Invalid(format!("{field}: must be a valid ObjectId")))?,
            _ => continue,
        };
        document.insert(field, id);
    }
    Ok(())
}

impl Resource for Product {
    type Create = CreateProduct;
    type Update = UpdateProduct;

    fn prepare_create(input: CreateProduct) -> CrudResult<Document> {
        let slug = slug_for(&input.name)?;
        let mut document = bson::to_document(&input)?;
        store_references(&mut document)?;
        document.insert("slug", slug);
        Ok(document)
    }

    fn prepare_update(input: UpdateProduct) -> CrudResult<Document> {
        let slug = input.name.as_deref().map(slug_for).transpose()?;
        let mut document = bson::to_document(&input)?;
        store_references(&mut document)?;
        if let Some(slug) = slug {
            document.insert("slug", slug);
        }
        Ok(document)
    }

    fn indexes() -> Vec<IndexModel> {
        vec![unique_index("code"), unique_index("slug")]
    }
}
