//! OpenAPI documentation configuration

use utoipa::openapi::{InfoBuilder, LicenseBuilder, OpenApi, OpenApiBuilder, ServerBuilder};

/// Prefix every resource is nested under
pub const API_PREFIX: &str = "/api";

/// Combined OpenAPI document for every resource served by this binary
pub fn api_doc() -> OpenApi {
    let mut doc = OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("Unified CRM API")
                .version(env!("CARGO_PKG_VERSION"))
                .description(Some(
                    "CRUD endpoints for brands, categories, types, products and users",
                ))
                .license(Some(LicenseBuilder::new().name("MIT").build())),
        )
        .servers(Some(vec![
            ServerBuilder::new()
                .url("http://localhost:3000")
                .description(Some("Local development server"))
                .build(),
        ]))
        .build();

    doc.merge(domain_catalog::openapi(API_PREFIX));
    doc.merge(domain_users::openapi(API_PREFIX));
    doc
}
