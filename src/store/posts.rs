//! Post persistence

use bson::{doc, oid::ObjectId};

use crate::db::mongo::MongoCollection;
use crate::db::schemas::PostDoc;
use crate::types::DevLinkError;

/// Store for post documents
#[derive(Clone)]
pub struct PostStore {
    collection: MongoCollection<PostDoc>,
}

impl PostStore {
    pub fn new(collection: MongoCollection<PostDoc>) -> Self {
        Self { collection }
    }

    /// All posts, newest first
    pub async fn all(&self) -> Result<Vec<PostDoc>, DevLinkError> {
        self.collection
            .find_many(doc! {}, Some(doc! { "metadata.created_at": -1 }))
            .await
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<PostDoc>, DevLinkError> {
        self.collection.find_one(doc! { "_id": id }).await
    }

    /// Insert a new post, returning the document with its id filled in
    pub async fn insert(&self, mut post: PostDoc) -> Result<PostDoc, DevLinkError> {
        let id = self.collection.insert_one(post.clone()).await?;
        post._id = Some(id);
        Ok(post)
    }

    /// Save a modified post by whole-document replacement
    pub async fn replace(&self, post: PostDoc) -> Result<(), DevLinkError> {
        let id = post
            ._id
            .ok_or_else(|| DevLinkError::Internal("Post has no id".into()))?;
        self.collection.replace_one(doc! { "_id": id }, post).await?;
        Ok(())
    }

    pub async fn delete(&self, id: &ObjectId) -> Result<(), DevLinkError> {
        self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(())
    }
}
