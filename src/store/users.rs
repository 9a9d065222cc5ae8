//! User account persistence

use bson::{doc, oid::ObjectId};

use crate::db::mongo::MongoCollection;
use crate::db::schemas::UserDoc;
use crate::types::DevLinkError;

/// Store for user account documents
#[derive(Clone)]
pub struct UserStore {
    collection: MongoCollection<UserDoc>,
}

impl UserStore {
    pub fn new(collection: MongoCollection<UserDoc>) -> Self {
        Self { collection }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserDoc>, DevLinkError> {
        self.collection.find_one(doc! { "email": email }).await
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<UserDoc>, DevLinkError> {
        self.collection.find_one(doc! { "_id": id }).await
    }

    /// Insert a new user, returning the document with its id filled in
    pub async fn insert(&self, mut user: UserDoc) -> Result<UserDoc, DevLinkError> {
        let id = self.collection.insert_one(user.clone()).await?;
        user._id = Some(id);
        Ok(user)
    }

    /// Replace the stored password hash (password reset)
    pub async fn set_password(
        &self,
        id: &ObjectId,
        password_hash: &str,
    ) -> Result<bool, DevLinkError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$set": {
                        "password_hash": password_hash,
                        "metadata.updated_at": bson::DateTime::now(),
                    }
                },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    pub async fn delete(&self, id: &ObjectId) -> Result<(), DevLinkError> {
        self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(())
    }
}
