use core_proc_macros::ApiResource;
use mongodb::bson::{self, Document, doc};
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use serde::{Serialize, de::DeserializeOwned};
use validator::Validate;

use crate::error::CrudResult;

/// An entity served through the generic repository, service and router.
///
/// Collection, display name and URL come from [`ApiResource`]. The
/// associated DTOs are what the router accepts on create and update; the
/// hooks turn a validated DTO into the document that is stored.
///
/// ```ignore
/// #[derive(ApiResource, Serialize, Deserialize, ToSchema)]
/// pub struct Brand { ... }
///
/// impl Resource for Brand {
///     type Create = CreateBrand;
///     type Update = UpdateBrand;
///
///     fn prepare_create(input: CreateBrand) -> CrudResult<Document> {
///         let mut document = bson::to_document(&input)?;
///         document.insert("slug", slugify(&input.name));
///         Ok(document)
///     }
/// }
/// ```
pub trait Resource:
    ApiResource + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static
{
    type Create: DeserializeOwned + Serialize + Validate + Send + 'static;
    type Update: DeserializeOwned + Serialize + Validate + Send + 'static;

    fn prepare_create(input: Self::Create) -> CrudResult<Document> {
        Ok(bson::to_document(&input)?)
    }

    /// Fields left out of the body serialize as null and are dropped by
    /// [`clean_update`](crate::clean_update) afterwards.
    fn prepare_update(input: Self::Update) -> CrudResult<Document> {
        Ok(bson::to_document(&input)?)
    }

    /// Indexes created by [`MongoRepository::ensure_indexes`](crate::MongoRepository::ensure_indexes).
    fn indexes() -> Vec<IndexModel> {
        Vec::new()
    }
}

/// Unique ascending index on `field`, named `idx_<field>_unique`.
pub fn unique_index(field: &str) -> IndexModel {
    IndexModel::builder()
        .keys(doc! { field: 1 })
        .options(
            IndexOptions::builder()
                .unique(true)
                .name(format!("idx_{field}_unique"))
                .build(),
        )
        .build()
}
