//! Profile document schema
//!
//! One profile per user, holding the public handle plus embedded
//! experience/education lists ordered most-recent-first.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for profiles
pub const PROFILE_COLLECTION: &str = "profiles";

/// Profile document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProfileDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Owning user (weak reference, one profile per user)
    pub user: ObjectId,

    /// Globally unique public handle
    pub handle: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Professional status (required)
    pub status: String,

    /// Skills, split from the comma-separated input
    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub githubusername: Option<String>,

    /// Work history, newest first
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,

    /// Education history, newest first
    #[serde(default)]
    pub education: Vec<EducationEntry>,

    /// Social profile links
    #[serde(default)]
    pub social: SocialLinks,
}

/// Embedded work-history entry
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExperienceEntry {
    pub _id: ObjectId,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: DateTime,
    /// End date; exactly one of `to` / `current` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Embedded education entry
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EducationEntry {
    pub _id: ObjectId,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Optional social profile URLs
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

impl ProfileDoc {
    /// Index of an experience entry by id (linear scan)
    pub fn experience_index(&self, entry_id: &ObjectId) -> Option<usize> {
        self.experience.iter().position(|e| &e._id == entry_id)
    }

    /// Index of an education entry by id (linear scan)
    pub fn education_index(&self, entry_id: &ObjectId) -> Option<usize> {
        self.education.iter().position(|e| &e._id == entry_id)
    }
}

impl IntoIndexes for ProfileDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // One profile per user
            (
                doc! { "user": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("user_unique".to_string())
                        .build(),
                ),
            ),
            // Handle must stay globally unique even though it is mutable
            (
                doc! { "handle": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("handle_unique".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for ProfileDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str) -> ExperienceEntry {
        ExperienceEntry {
            _id: ObjectId::new(),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: None,
            from: DateTime::now(),
            to: None,
            current: true,
            description: None,
        }
    }

    fn profile() -> ProfileDoc {
        ProfileDoc {
            _id: Some(ObjectId::new()),
            metadata: Metadata::new(),
            user: ObjectId::new(),
            handle: "alice".to_string(),
            company: None,
            website: None,
            location: None,
            status: "Developer".to_string(),
            skills: vec!["Rust".to_string()],
            bio: None,
            githubusername: None,
            experience: vec![],
            education: vec![],
            social: SocialLinks::default(),
        }
    }

    #[test]
    fn experience_prepend_keeps_newest_first() {
        let mut p = profile();
        let first = entry("first");
        let second = entry("second");
        p.experience.insert(0, first.clone());
        p.experience.insert(0, second.clone());

        assert_eq!(p.experience[0]._id, second._id);
        assert_eq!(p.experience[1]._id, first._id);
    }

    #[test]
    fn experience_index_finds_entry_by_id() {
        let mut p = profile();
        let a = entry("a");
        let b = entry("b");
        p.experience.push(a.clone());
        p.experience.push(b.clone());

        assert_eq!(p.experience_index(&b._id), Some(1));
        assert_eq!(p.experience_index(&ObjectId::new()), None);

        let idx = p.experience_index(&a._id).unwrap();
        p.experience.remove(idx);
        assert_eq!(p.experience.len(), 1);
        assert_eq!(p.experience[0]._id, b._id);
    }
}
