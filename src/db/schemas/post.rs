//! Post document schema
//!
//! Posts carry denormalized author name/avatar captured at creation time
//! (a deliberate snapshot; later profile edits do not sync back). Likes and
//! comments are embedded lists ordered most-recent-first and mutated by
//! whole-document round trips through the store layer.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for posts
pub const POST_COLLECTION: &str = "posts";

/// Post document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PostDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Author (weak reference; not cascade-deleted with the user)
    pub user: ObjectId,

    /// Post body, 10-300 characters
    pub text: String,

    /// Author name snapshot
    pub name: String,

    /// Author avatar snapshot
    pub avatar: String,

    /// Likes, newest first; at most one per user
    #[serde(default)]
    pub likes: Vec<LikeEntry>,

    /// Comments, newest first
    #[serde(default)]
    pub comments: Vec<CommentEntry>,
}

/// Embedded like entry
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LikeEntry {
    pub user: ObjectId,
}

/// Embedded comment entry
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CommentEntry {
    pub _id: ObjectId,
    pub user: ObjectId,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub created_at: DateTime,
}

impl PostDoc {
    /// Create a new post with author snapshot fields
    pub fn new(user: ObjectId, text: String, name: String, avatar: String) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            user,
            text,
            name,
            avatar,
            likes: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Whether the given user already appears in the likes list
    pub fn has_like(&self, user: &ObjectId) -> bool {
        self.like_index(user).is_some()
    }

    /// Index of a user's like (linear scan)
    pub fn like_index(&self, user: &ObjectId) -> Option<usize> {
        self.likes.iter().position(|l| &l.user == user)
    }

    /// Index of a comment by id (linear scan)
    pub fn comment_index(&self, comment_id: &ObjectId) -> Option<usize> {
        self.comments.iter().position(|c| &c._id == comment_id)
    }
}

impl IntoIndexes for PostDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Author lookups
            (
                doc! { "user": 1 },
                Some(IndexOptions::builder().name("user_index".to_string()).build()),
            ),
        ]
    }
}

impl MutMetadata for PostDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> PostDoc {
        PostDoc::new(
            ObjectId::new(),
            "This is a sufficiently long test post.".to_string(),
            "Alice".to_string(),
            "https://example.com/a.png".to_string(),
        )
    }

    #[test]
    fn like_index_tracks_single_like_per_user() {
        let mut p = post();
        let liker = ObjectId::new();

        assert!(!p.has_like(&liker));
        p.likes.insert(0, LikeEntry { user: liker });
        assert!(p.has_like(&liker));

        let other = ObjectId::new();
        p.likes.insert(0, LikeEntry { user: other });
        // newest first
        assert_eq!(p.likes[0].user, other);
        assert_eq!(p.like_index(&liker), Some(1));

        let idx = p.like_index(&liker).unwrap();
        p.likes.remove(idx);
        assert!(!p.has_like(&liker));
        assert_eq!(p.likes.len(), 1);
    }

    #[test]
    fn comment_index_finds_by_id() {
        let mut p = post();
        let comment = CommentEntry {
            _id: ObjectId::new(),
            user: ObjectId::new(),
            text: "A comment that is long enough to pass.".to_string(),
            name: "Bob".to_string(),
            avatar: String::new(),
            created_at: DateTime::now(),
        };
        p.comments.insert(0, comment.clone());

        assert_eq!(p.comment_index(&comment._id), Some(0));
        assert_eq!(p.comment_index(&ObjectId::new()), None);

        p.comments.remove(0);
        assert!(p.comments.is_empty());
    }
}
