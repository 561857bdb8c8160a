use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::bson;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrudError {
    #[error("{resource} with id {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("Update data must be provided")]
    EmptyUpdate,

    #[error("{0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("Failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CrudResult<T> = Result<T, CrudError>;

impl CrudError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        CrudError::NotFound {
            resource,
            id: id.into(),
        }
    }
}

/// Driver errors pass through untouched so duplicate keys still surface as 409.
impl From<CrudError> for AppError {
    fn from(err: CrudError) -> Self {
        match err {
            CrudError::NotFound { .. } => AppError::NotFound(err.to_string()),
            CrudError::EmptyUpdate | CrudError::Invalid(_) => AppError::BadRequest(err.to_string()),
            CrudError::Database(e) => AppError::Database(e),
            CrudError::Encode(_) | CrudError::Decode(_) | CrudError::Internal(_) => {
                AppError::InternalServerError(err.to_string())
            }
        }
    }
}

impl IntoResponse for CrudError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_not_found_message_names_resource_and_id() {
        let err = CrudError::not_found("Brand", "64b7f0c2a1b2c3d4e5f60718");
        assert_eq!(
            err.to_string(),
            "Brand with id 64b7f0c2a1b2c3d4e5f60718 not found"
        );

        let (status, _, message) = AppError::from(err).normalize();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            message.joined(),
            "Brand with id 64b7f0c2a1b2c3d4e5f60718 not found"
        );
    }

    #[test]
    fn test_empty_update_is_bad_request() {
        let (status, _, message) = AppError::from(CrudError::EmptyUpdate).normalize();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message.joined(), "Update data must be provided");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let (status, _, message) =
            AppError::from(CrudError::Internal("hasher exploded".into())).normalize();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message.joined(), "Internal server error");
    }
}
