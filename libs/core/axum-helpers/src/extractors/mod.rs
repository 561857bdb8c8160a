//! Extractors that validate input and reject with [`AppError`](crate::errors::AppError).

pub mod validated_json;
pub mod validated_query;

pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;
