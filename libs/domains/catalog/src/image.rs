use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Image embedded in brands, categories and types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Image {
    /// Public URL or storage path
    #[validate(length(min = 1, message = "url must not be empty"))]
    pub url: String,
    /// Alternative text for accessibility
    #[validate(length(min = 1, message = "alt must not be empty"))]
    pub alt: String,
    /// Stored file name
    #[validate(length(min = 1, message = "filename must not be empty"))]
    pub filename: String,
    /// Sort order for display
    #[serde(default)]
    #[validate(range(min = 0, message = "position must not be negative"))]
    pub position: i32,
}

pub(crate) fn default_active() -> bool {
    true
}
