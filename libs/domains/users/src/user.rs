use core_proc_macros::ApiResource;
use crud::{CrudResult, Resource, unique_index};
use mongodb::IndexModel;
use mongodb::bson::{self, DateTime, Document, oid::ObjectId, serde_helpers};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::password::hash_password;

/// Document field holding the argon2 hash
pub const PASSWORD_FIELD: &str = "password";

/// User entity - stored in the `users` collection
///
/// The stored password hash is never read back into this type, so it
/// cannot leak through a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, ApiResource)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(
        rename(serialize = "id", deserialize = "_id"),
        serialize_with = "serde_helpers::serialize_object_id_as_hex_string"
    )]
    #[schema(value_type = String, example = "64b7f0c2a1b2c3d4e5f60718")]
    pub id: ObjectId,
    /// Login email, lower-cased (unique)
    pub email: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Creation timestamp
    #[serde(serialize_with = "serde_helpers::serialize_bson_datetime_as_rfc3339_string")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime,
    /// Last update timestamp
    #[serde(serialize_with = "serde_helpers::serialize_bson_datetime_as_rfc3339_string")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime,
}

/// DTO for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUser {
    #[serde(deserialize_with = "normalized_email")]
    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    #[schema(write_only, min_length = 8)]
    pub password: Option<String>,
}

/// DTO for updating an existing user
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUser {
    #[serde(default, deserialize_with = "normalized_optional_email")]
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    #[schema(write_only, min_length = 8)]
    pub password: Option<String>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn normalized_email<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let email = String::deserialize(deserializer)?;
    Ok(normalize_email(&email))
}

fn normalized_optional_email<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let email = Option::<String>::deserialize(deserializer)?;
    Ok(email.as_deref().map(normalize_email))
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|v| v.trim().to_string()))
}

/// Replaces a plain-text password with its hash before anything is stored.
fn store_password(password: Option<String>, document: &mut Document) -> CrudResult<()> {
    if let Some(password) = password {
        document.insert(PASSWORD_FIELD, hash_password(&password)?);
    }
    Ok(())
}

impl Resource for User {
    type Create = CreateUser;
    type Update = UpdateUser;

    fn prepare_create(mut input: CreateUser) -> CrudResult<Document> {
        let password = input.password.take();
        let mut document = bson::to_document(&input)?;
        store_password(password, &mut document)?;
        Ok(document)
    }

    fn prepare_update(mut input: UpdateUser) -> CrudResult<Document> {
        let password = input.password.take();
        let mut document = bson::to_document(&input)?;
        store_password(password, &mut document)?;
        Ok(document)
    }

    fn indexes() -> Vec<IndexModel> {
        vec![unique_index("email")]
    }
}
