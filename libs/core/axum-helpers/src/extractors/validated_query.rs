use crate::errors::AppError;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query string that has been deserialized and validated.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(data) = Query::<T>::from_request_parts(parts, state).await?;
        data.validate()?;
        Ok(ValidatedQuery(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Window {
        #[validate(range(min = 1))]
        page: Option<u64>,
    }

    async fn handler(ValidatedQuery(window): ValidatedQuery<Window>) -> String {
        window.page.unwrap_or(1).to_string()
    }

    async fn status_for(uri: &str) -> StatusCode {
        Router::new()
            .route("/items", get(handler))
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_query_validation() {
        assert_eq!(status_for("/items").await, StatusCode::OK);
        assert_eq!(status_for("/items?page=2").await, StatusCode::OK);
        assert_eq!(status_for("/items?page=0").await, StatusCode::BAD_REQUEST);
        assert_eq!(status_for("/items?page=two").await, StatusCode::BAD_REQUEST);
    }
}
