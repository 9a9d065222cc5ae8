//! Profile persistence
//!
//! Embedded experience/education lists are saved by replacing the whole
//! profile document; callers mutate an owned `ProfileDoc` and hand it back
//! through `replace`.

use bson::{doc, oid::ObjectId};

use crate::db::mongo::MongoCollection;
use crate::db::schemas::ProfileDoc;
use crate::types::DevLinkError;

/// Store for profile documents
#[derive(Clone)]
pub struct ProfileStore {
    collection: MongoCollection<ProfileDoc>,
}

impl ProfileStore {
    pub fn new(collection: MongoCollection<ProfileDoc>) -> Self {
        Self { collection }
    }

    pub async fn find_by_user(&self, user: &ObjectId) -> Result<Option<ProfileDoc>, DevLinkError> {
        self.collection.find_one(doc! { "user": user }).await
    }

    pub async fn find_by_handle(&self, handle: &str) -> Result<Option<ProfileDoc>, DevLinkError> {
        self.collection.find_one(doc! { "handle": handle }).await
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<ProfileDoc>, DevLinkError> {
        self.collection.find_one(doc! { "_id": id }).await
    }

    pub async fn all(&self) -> Result<Vec<ProfileDoc>, DevLinkError> {
        self.collection.find_many(doc! {}, None).await
    }

    /// Insert a new profile, returning the document with its id filled in
    pub async fn insert(&self, mut profile: ProfileDoc) -> Result<ProfileDoc, DevLinkError> {
        let id = self.collection.insert_one(profile.clone()).await?;
        profile._id = Some(id);
        Ok(profile)
    }

    /// Save a modified profile by whole-document replacement
    pub async fn replace(&self, profile: ProfileDoc) -> Result<(), DevLinkError> {
        let id = profile
            ._id
            .ok_or_else(|| DevLinkError::Internal("Profile has no id".into()))?;
        self.collection.replace_one(doc! { "_id": id }, profile).await?;
        Ok(())
    }

    pub async fn delete_by_user(&self, user: &ObjectId) -> Result<(), DevLinkError> {
        self.collection.delete_one(doc! { "user": user }).await?;
        Ok(())
    }
}
