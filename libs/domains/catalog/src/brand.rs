use core_proc_macros::ApiResource;
use crud::{CrudResult, Resource, unique_index};
use mongodb::IndexModel;
use mongodb::bson::{self, DateTime, Document, oid::ObjectId, serde_helpers};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::image::{Image, default_active};
use crate::slug::slug_for;

/// Brand entity - stored in the `brands` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, ApiResource)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(
        rename(serialize = "id", deserialize = "_id"),
        serialize_with = "serde_helpers::serialize_object_id_as_hex_string"
    )]
    #[schema(value_type = String, example = "64b7f0c2a1b2c3d4e5f60718")]
    pub id: ObjectId,
    /// Brand name
    pub name: String,
    /// Brand description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL slug derived from the name
    pub slug: String,
    /// Brand logo
    #[serde(default)]
    pub image: Option<Image>,
    /// Whether the brand is shown in the catalog
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

/// DTO for creating a new brand
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateBrand {
    #[validate(length(min = 1, max = 120, message = "name must be between 1 and 120 characters"))]
    #[schema(example = "Adidas")]
    pub name: String,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    #[schema(example = "Sports brand")]
    pub description: Option<String>,
    #[validate(nested)]
    pub image: Option<Image>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// DTO for updating an existing brand
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateBrand {
    #[validate(length(min = 1, max = 120, message = "name must be between 1 and 120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(nested)]
    pub image: Option<Image>,
    pub active: Option<bool>,
}

impl Resource for Brand {
    type Create = CreateBrand;
    type Update = UpdateBrand;

    fn prepare_create(input: CreateBrand) -> CrudResult<Document> {
        let slug = slug_for(&input.name)?;
        let mut document = bson::to_document(&input)?;
        document.insert("slug", slug);
        Ok(document)
    }

    fn prepare_update(input: UpdateBrand) -> CrudResult<Document> {
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
