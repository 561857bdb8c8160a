//! Catalog Domain
//!
//! Brands, categories, product types and products. Each entity plugs into
//! the generic [`crud`] layer through its [`Resource`](crud::Resource)
//! implementation: DTOs, slug generation and unique indexes live here,
//! storage and HTTP handling do not.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crud::{MongoRepository, ResourceService};
//! use domain_catalog::Brand;
//!
//! let repository = MongoRepository::<Brand>::new(&db);
//! repository.ensure_indexes().await?;
//! let brands = crud::router(ResourceService::new(repository), 25);
//! ```

pub mod brand;
pub mod category;
pub mod image;
pub mod product;
pub mod product_type;
pub mod slug;

use utoipa::openapi::{OpenApi, OpenApiBuilder};

// Re-export commonly used types
pub use brand::{Brand, CreateBrand, UpdateBrand};
pub use category::{Category, CreateCategory, UpdateCategory};
pub use image::Image;
pub use product::{CreateProduct, Product, ProductVariant, UpdateProduct};
pub use product_type::{CreateProductType, ProductType, UpdateProductType};
pub use slug::slugify;

/// OpenAPI paths and schemas for every catalog resource under `prefix`.
pub fn openapi(prefix: &str) -> OpenApi {
    let mut doc = OpenApiBuilder::new().build();
    doc.merge(crud::resource_openapi::<Brand>(prefix));
    doc.merge(crud::resource_openapi::<Category>(prefix));
    doc.merge(crud::resource_openapi::<ProductType>(prefix));
    doc.merge(crud::resource_openapi::<Product>(prefix));
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_catalog_path() {
        let doc = openapi("/api");
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for path in [
            "/api/brands",
            "/api/brands/{id}",
            "/api/categories",
            "/api/categories/{id}",
            "/api/types",
            "/api/types/{id}",
            "/api/products",
            "/api/products/{id}",
        ] {
            assert!(paths.contains(&path), "{path}");
        }
    }
}
