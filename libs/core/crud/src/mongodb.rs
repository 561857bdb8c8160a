//! MongoDB implementation of [`Repository`]

use std::marker::PhantomData;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{self, DateTime, Document, doc, oid::ObjectId},
    options::{FindOptions, ReturnDocument},
};
use tracing::instrument;

use crate::error::CrudResult;
use crate::pagination::{PaginatedResult, PaginationQuery};
use crate::repository::Repository;
use crate::resource::Resource;

pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// Repository over the collection named by `T::COLLECTION`.
pub struct MongoRepository<T: Resource> {
    collection: Collection<Document>,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> MongoRepository<T> {
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let brands = MongoRepository::<Brand>::new(&client.database("unified_crm"));
    /// ```
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Document>(T::COLLECTION),
            _resource: PhantomData,
        }
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }

    /// Creates the indexes declared by `T::indexes()`. Safe to call on
    /// every start; existing indexes with the same keys and options are left alone.
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn ensure_indexes(&self) -> CrudResult<()> {
        let indexes = T::indexes();
        if indexes.is_empty() {
            return Ok(());
        }

        let result = self.collection.create_indexes(indexes).await?;
        tracing::info!(indexes = ?result.index_names, "Indexes ensured");
        Ok(())
    }
}

impl<T: Resource> Clone for MongoRepository<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            _resource: PhantomData,
        }
    }
}

/// Window of one page, oldest documents first.
fn find_options(query: &PaginationQuery) -> FindOptions {
    FindOptions::builder()
        .sort(doc! { "_id": 1 })
        .skip(query.skip())
        .limit(query.limit() as i64)
        .build()
}

fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

#[async_trait]
impl<T: Resource> Repository<T> for MongoRepository<T> {
    #[instrument(skip(self, document), fields(collection = T::COLLECTION))]
    async fn create(&self, mut document: Document) -> CrudResult<T> {
        let id = ObjectId::new();
        let now = DateTime::now();
        document.insert("_id", id);
        document.insert(CREATED_AT, now);
        document.insert(UPDATED_AT, now);

        self.collection.insert_one(&document).await?;

        tracing::info!(id = %id, "{} created successfully", T::NAME);
        Ok(bson::from_document(document)?)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn find(&self, query: PaginationQuery) -> CrudResult<PaginatedResult<T>> {
        let (page, limit) = (query.page(), query.limit());

        let options = find_options(&query);

        let window = async {
            let cursor = self
                .collection
                .find(doc! {})
                .with_options(options)
                .await?;
            cursor.try_collect::<Vec<Document>>().await
        };
        let count = async { self.collection.count_documents(doc! {}).await };

        let (documents, total) = tokio::try_join!(window, count)?;

        let items = documents
            .into_iter()
            .map(bson::from_document)
            .collect::<Result<Vec<T>, _>>()?;

        Ok(PaginatedResult {
            items,
            total,
            page,
            limit,
        })
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn find_by_id(&self, id: &str) -> CrudResult<Option<T>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };

        match self.collection.find_one(doc! { "_id": oid }).await? {
            Some(document) => Ok(Some(bson::from_document(document)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, changes), fields(collection = T::COLLECTION))]
    async fn update(&self, id: &str, mut changes: Document) -> CrudResult<Option<T>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };

        changes.remove("_id");
        changes.remove(CREATED_AT);
        changes.insert(UPDATED_AT, DateTime::now());

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": changes })
            .return_document(ReturnDocument::After)
            .await?;

        match updated {
            Some(document) => {
                tracing::info!(id = %oid, "{} updated successfully", T::NAME);
                Ok(Some(bson::from_document(document)?))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn remove(&self, id: &str) -> CrudResult<bool> {
        let Some(oid) = parse_id(id) else {
            return Ok(false);
        };

        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        if result.deleted_count > 0 {
            tracing::info!(id = %oid, "{} removed successfully", T::NAME);
        }
        Ok(result.deleted_count > 0)
    }
}
