//! Generic HTTP endpoints for a [`Resource`]
//!
//! | Method      | Path    | Success                                |
//! |-------------|---------|----------------------------------------|
//! | POST        | `/`     | 201, created entity                    |
//! | GET         | `/`     | 200, one page of entities with `meta`  |
//! | GET         | `/{id}` | 200, entity                            |
//! | PATCH / PUT | `/{id}` | 200, updated entity                    |
//! | DELETE      | `/{id}` | 200, `{ "id": ... }`                   |

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{ApiResponse, AppError, ValidatedJson, ValidatedQuery};
use mongodb::bson::Document;
use serde_json::Value;
use validator::Validate;

use crate::clean::clean_update;
use crate::error::CrudError;
use crate::pagination::{DEFAULT_LIMIT, PaginationQuery};
use crate::repository::Repository;
use crate::resource::Resource;
use crate::service::{RemovedId, ResourceService};

pub const LIST_MESSAGE: &str = "Data retrieved successfully";

struct CrudState<T: Resource, R: Repository<T>> {
    service: ResourceService<T, R>,
    default_limit: u64,
}

impl<T: Resource, R: Repository<T>> Clone for CrudState<T, R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            default_limit: self.default_limit,
        }
    }
}

/// Create the router for `T`, meant to be nested under `T::URL`.
///
/// `default_limit` is the page size used when `?limit` is absent.
pub fn router<T, R>(service: ResourceService<T, R>, default_limit: u64) -> Router
where
    T: Resource,
    R: Repository<T> + 'static,
{
    let state = CrudState {
        service,
        default_limit: if default_limit == 0 { DEFAULT_LIMIT } else { default_limit },
    };

    Router::new()
        .route("/", post(create::<T, R>).get(find::<T, R>))
        .route(
            "/{id}",
            get(find_one::<T, R>)
                .patch(update::<T, R>)
                .put(update::<T, R>)
                .delete(remove::<T, R>),
        )
        .with_state(state)
}

fn message<T: Resource>(action: &str) -> String {
    format!("{} {} successfully", T::NAME, action)
}

async fn create<T: Resource, R: Repository<T>>(
    State(state): State<CrudState<T, R>>,
    ValidatedJson(input): ValidatedJson<T::Create>,
) -> Result<impl IntoResponse, AppError> {
    let document = T::prepare_create(input)?;
    let entity = state.service.create(document).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(entity, message::<T>("created")),
    ))
}

async fn find<T: Resource, R: Repository<T>>(
    State(state): State<CrudState<T, R>>,
    ValidatedQuery(query): ValidatedQuery<PaginationQuery>,
) -> Result<ApiResponse<Vec<T>>, AppError> {
    let result = state
        .service
        .find(query.with_default_limit(state.default_limit))
        .await?;
    let meta = result.meta();
    Ok(ApiResponse::ok_with_meta(result.items, meta, LIST_MESSAGE))
}

async fn find_one<T: Resource, R: Repository<T>>(
    State(state): State<CrudState<T, R>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<T>, AppError> {
    let entity = state.service.find_one(&id).await?;
    Ok(ApiResponse::ok(entity, message::<T>("retrieved")))
}

async fn update<T: Resource, R: Repository<T>>(
    State(state): State<CrudState<T, R>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<ApiResponse<T>, AppError> {
    let Json(body) = body?;
    let changes = update_document::<T>(body)?;
    let entity = state.service.update(&id, changes).await?;
    Ok(ApiResponse::ok(entity, message::<T>("updated")))
}

async fn remove<T: Resource, R: Repository<T>>(
    State(state): State<CrudState<T, R>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<RemovedId>, AppError> {
    let removed = state.service.remove(&id).await?;
    Ok(ApiResponse::ok(removed, message::<T>("removed")))
}

/// Body of a PATCH / PUT turned into the `$set` document.
///
/// An empty or non-object body is rejected before anything is decoded.
pub fn update_document<T: Resource>(body: Value) -> Result<Document, AppError> {
    if !matches!(&body, Value::Object(fields) if !fields.is_empty()) {
        return Err(CrudError::EmptyUpdate.into());
    }

    let input: T::Update =
        serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    input.validate()?;

    Ok(clean_update(T::prepare_update(input)?))
}
