use core_proc_macros::ApiResource;
use crud::{CrudResult, Resource, unique_index};
use mongodb::IndexModel;
use mongodb::bson::{self, DateTime, Document, oid::ObjectId, serde_helpers};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::image::{Image, default_active};
use crate::slug::slug_for;

/// Category entity - stored in the `categories` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, ApiResource)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(
        rename(serialize = "id", deserialize = "_id"),
        serialize_with = "serde_helpers::serialize_object_id_as_hex_string"
    )]
    #[schema(value_type = String, example = "64b7f0c2a1b2c3d4e5f60718")]
    pub id: ObjectId,
    /// Category name
    pub name: String,
    /// Category description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL slug derived from the name
    pub slug: String,
    /// Category banner
    #[serde(default)]
    pub image: Option<Image>,
    /// Whether the category is shown in the catalog
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

/// DTO for creating a new category
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 120, message = "name must be between 1 and 120 characters"))]
    #[schema(example = "Running Shoes")]
    pub name: String,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    #[schema(example = "Shoes built for running")]
    pub description: Option<String>,
    #[validate(nested)]
    pub image: Option<Image>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// DTO for updating an existing category
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 120, message = "name must be between 1 and 120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(nested)]
    pub image: Option<Image>,
    pub active: Option<bool>,
}

impl Resource for Category {
    type Create = CreateCategory;
    type Update = UpdateCategory;

    fn prepare_create(input: CreateCategory) -> CrudResult<Document> {
        let slug = slug_for(&input.name)?;
        let mut document = bson::to_document(&input)?;
        document.insert("slug", slug);
        Ok(document)
    }

    fn prepare_update(input: UpdateCategory) -> CrudResult<Document> {
        let slug = input.name.as_deref().map(slug_for).transpose()?;
        let mut document = bson::to_document(&input)?;
        if let Some(slug) = slug {
            document.insert("slug", slug);
        }
        Ok(document)
    }

    fn indexes() -> Vec<IndexModel> {
        vec![unique_index("name"), unique_index("slug")]
    }
}
