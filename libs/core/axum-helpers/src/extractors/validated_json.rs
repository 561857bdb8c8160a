//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has been deserialized and validated.
///
/// Malformed JSON and unknown fields (with `deny_unknown_fields`) reject
/// with 400; failed constraints reject with 400 and one message per
/// constraint.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// #[serde(deny_unknown_fields)]
/// struct CreateBrand {
///     #[validate(length(min = 1, max = 120))]
///     name: String,
/// }
///
/// async fn create(ValidatedJson(dto): ValidatedJson<CreateBrand>) -> impl IntoResponse { ... }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
