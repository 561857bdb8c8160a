use core_proc_macros::ApiResource;
use crud::{CrudResult, Resource, unique_index};
use mongodb::IndexModel;
use mongodb::bson::{self, DateTime, Document, oid::ObjectId, serde_helpers};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::image::{Image, default_active};
use crate::slug::slug_for;

/// Product type entity - stored in the `types` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, ApiResource)]
#[api_resource(name = "Type", collection = "types")]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(
        rename(serialize = "id", deserialize = "_id"),
        serialize_with = "serde_helpers::serialize_object_id_as_hex_string"
    )]
    #[schema(value_type = String, example = "64b7f0c2a1b2c3d4e5f60718")]
    pub id: ObjectId,
    /// Product type name
    pub name: String,
    /// Product type description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL slug derived from the name
    pub slug: String,
    /// Product type icon
    #[serde(default)]
    pub image: Option<Image>,
    /// Whether the product type is shown in the catalog
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

/// DTO for creating a new product type
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProductType {
    #[validate(length(min = 1, max = 120, message = "name must be between 1 and 120 characters"))]
    #[schema(example = "Sneakers")]
    pub name: String,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    #[schema(example = "Casual shoes")]
    pub description: Option<String>,
    #[validate(nested)]
    pub image: Option<Image>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// DTO for updating an existing product type
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProductType {
    #[validate(length(min = 1, max = 120, message = "name must be between 1 and 120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(nested)]
    pub image: Option<Image>,
    pub active: Option<bool>,
}

impl Resource for ProductType {
    type Create = CreateProductType;
    type Update = UpdateProductType;

    fn prepare_create(input: CreateProductType) -> CrudResult<Document> {
        let slug = slug_for(&input.name)?;
        let mut document = bson::to_document(&input)?;
        document.insert("slug", slug);
        Ok(document)
    }

    fn prepare_update(input: UpdateProductType) -> CrudResult<Document> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{Bson, doc};
    use serde_json::json;

    #[test]
    fn test_resource_metadata() {
        assert_eq!(ProductType::NAME, "Type");
        assert_eq!(ProductType::COLLECTION, "types");
        assert_eq!(ProductType::URL, "/types");
        assert_eq!(ProductType::TAG, "Types");
    }

    #[test]
    fn test_prepare_create_adds_slug() {
        let input: CreateProductType = serde_json::from_value(json!({ "name": "Áo Khoác" })).unwrap();

        let document = ProductType::prepare_create(input).unwrap();

        assert_eq!(document.get_str("slug").unwrap(), "ao-khoac");
        assert!(document.get_bool("active").unwrap());
    }

    #[test]
    fn test_prepare_create_rejects_unsluggable_name() {
        let input: CreateProductType = serde_json::from_value(json!({ "name": "???" })).unwrap();
        assert!(ProductType::prepare_create(input).is_err());
    }

    #[test]
    fn test_prepare_update_slug_follows_name() {
        let renamed = ProductType::prepare_update(UpdateProductType {
            name: Some("Hiking Boots".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(renamed.get_str("slug").unwrap(), "hiking-boots");

        let untouched = ProductType::prepare_update(UpdateProductType {
            active: Some(false),
            ..Default::default()
        })
        .unwrap();
        assert!(!untouched.contains_key("slug"));
        assert_eq!(untouched.get("name"), Some(&Bson::Null));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = serde_json::from_value::<CreateProductType>(json!({ "name": "Sandals", "slug": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_entity_json_shape() {
        let stored = doc! {
            "_id": ObjectId::parse_str("64b7f0c2a1b2c3d4e5f60718").unwrap(),
            "name": "Sneakers",
            "description": Bson::Null,
            "slug": "adidas",
            "image": Bson::Null,
            "active": true,
            "createdAt": DateTime::from_millis(1_700_000_000_000),
            "updatedAt": DateTime::from_millis(1_700_000_000_000),
        };

        let product_type: ProductType = bson::from_document(stored).unwrap();
        let value = serde_json::to_value(&product_type).unwrap();

        assert_eq!(value["id"], "64b7f0c2a1b2c3d4e5f60718");
        assert!(value.get("_id").is_none());
        assert!(value.get("description").is_none());
        assert_eq!(value["image"], serde_json::Value::Null);
        assert!(
            value["createdAt"]
                .as_str()
                .unwrap()
                .starts_with("2023-11-14T22:13:20")
        );
    }

    #[test]
    fn test_indexes() {
        let keys: Vec<_> = ProductType::indexes().into_iter().map(|i| i.keys).collect();
        assert_eq!(keys, vec![doc! { "name": 1 }, doc! { "slug": 1 }]);
    }
}
