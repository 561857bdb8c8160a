//! In-memory repository and a small resource used by the handler tests.

#![allow(dead_code)]

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use core_proc_macros::ApiResource;
use crud::{CrudResult, PaginatedResult, PaginationQuery, Repository, Resource};
use mongodb::bson::{self, DateTime, Document, oid::ObjectId, serde_helpers};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ApiResource)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    #[serde(
        rename(serialize = "id", deserialize = "_id"),
        serialize_with = "serde_helpers::serialize_object_id_as_hex_string"
    )]
    pub id: ObjectId,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateLabel {
    #[validate(length(min = 1, max = 50, message = "name must be between 1 and 50 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "active_default")]
    pub active: bool,
}

fn active_default() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateLabel {
    #[validate(length(min = 1, max = 50, message = "name must be between 1 and 50 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl Resource for Label {
    type Create = CreateLabel;
    type Update = UpdateLabel;
}

/// Stores documents in insertion order, which matches ascending ObjectId order.
pub struct InMemoryRepository<T> {
    documents: Arc<Mutex<Vec<Document>>>,
    update_calls: Arc<AtomicUsize>,
    _resource: PhantomData<fn() -> T>,
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            documents: Arc::default(),
            update_calls: Arc::default(),
            _resource: PhantomData,
        }
    }
}

impl<T> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
            update_calls: Arc::clone(&self.update_calls),
            _resource: PhantomData,
        }
    }
}

impl<T> InMemoryRepository<T> {
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }
}

fn matches_id(document: &Document, id: &str) -> bool {
    match ObjectId::parse_str(id) {
        Ok(oid) => document.get_object_id("_id").ok() == Some(oid),
        Err(_) => false,
    }
}

#[async_trait]
impl<T: Resource> Repository<T> for InMemoryRepository<T> {
    async fn create(&self, mut document: Document) -> CrudResult<T> {
        let now = DateTime::now();
        document.insert("_id", ObjectId::new());
        document.insert("createdAt", now);
        document.insert("updatedAt", now);
        self.documents.lock().unwrap().push(document.clone());
        Ok(bson::from_document(document)?)
    }

    async fn find(&self, query: PaginationQuery) -> CrudResult<PaginatedResult<T>> {
        let documents = self.documents.lock().unwrap().clone();
        let items = documents
            .into_iter()
            .skip(query.skip() as usize)
            .take(query.limit() as usize)
            .map(bson::from_document)
            .collect::<Result<Vec<T>, _>>()?;

        Ok(PaginatedResult {
            items,
            total: self.len() as u64,
            page: query.page(),
            limit: query.limit(),
        })
    }

    async fn find_by_id(&self, id: &str) -> CrudResult<Option<T>> {
        let documents = self.documents.lock().unwrap();
        match documents.iter().find(|d| matches_id(d, id)) {
            Some(document) => Ok(Some(bson::from_document(document.clone())?)),
            None => Ok(None),
        }
    }

    async fn update(&self, id: &str, changes: Document) -> CrudResult<Option<T>> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut documents = self.documents.lock().unwrap();
        let Some(document) = documents.iter_mut().find(|d| matches_id(d, id)) else {
            return Ok(None);
        };
        for (key, value) in changes {
            document.insert(key, value);
        }
        document.insert("updatedAt", DateTime::now());
        Ok(Some(bson::from_document(document.clone())?))
    }

    async fn remove(&self, id: &str) -> CrudResult<bool> {
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|d| !matches_id(d, id));
        Ok(documents.len() < before)
    }
}
