// Re-export proc macros when their features are enabled
#[cfg(feature = "api_resource")]
pub use api_resource::ApiResource;

/// Trait for REST API resource metadata.
///
/// This trait provides constants for the display name used in messages,
/// the MongoDB collection, the URL segment the resource is mounted under,
/// and the API documentation tag. It is typically derived using the
/// `ApiResource` macro.
///
/// # Examples
///
/// ```ignore
/// use core_proc_macros::ApiResource;
///
/// #[derive(ApiResource)]
/// pub struct Brand {
///     id: ObjectId,
///     name: String,
/// }
///
/// assert_eq!(Brand::NAME, "Brand");
/// assert_eq!(Brand::COLLECTION, "brands");
/// assert_eq!(Brand::URL, "/brands");
/// ```
pub trait ApiResource {
    /// Human readable entity name (e.g., "Brand"), used in response messages
    const NAME: &'static str;
    /// The database collection name (e.g., "brands")
    const COLLECTION: &'static str;
    /// The URL segment this resource is nested under (e.g., "/brands")
    const URL: &'static str;
    /// The API documentation tag (e.g., "Brands")
    const TAG: &'static str;

    /// URL path with an `{id}` segment appended
    fn url_with_id() -> String {
        format!("{}/{{id}}", Self::URL)
    }
}
