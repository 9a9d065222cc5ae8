//! Persistence layer over the typed MongoDB collections
//!
//! Resolvers never touch collections directly; every read and write goes
//! through a store so the whole-document sub-list saves stay in one place.

mod posts;
mod profiles;
mod users;

pub use posts::PostStore;
pub use profiles::ProfileStore;
pub use users::UserStore;

use crate::db::mongo::MongoClient;
use crate::db::schemas::{POST_COLLECTION, PROFILE_COLLECTION, USER_COLLECTION};
use crate::types::DevLinkError;

/// All stores, shared across the GraphQL schema
#[derive(Clone)]
pub struct Stores {
    pub users: UserStore,
    pub profiles: ProfileStore,
    pub posts: PostStore,
}

impl Stores {
    /// Build the stores, creating collections and applying their indexes
    pub async fn init(client: &MongoClient) -> Result<Self, DevLinkError> {
        Ok(Self {
            users: UserStore::new(client.collection(USER_COLLECTION).await?),
            profiles: ProfileStore::new(client.collection(PROFILE_COLLECTION).await?),
            posts: PostStore::new(client.collection(POST_COLLECTION).await?),
        })
    }
}
