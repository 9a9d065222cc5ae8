//! Database schemas for DevLink
//!
//! Defines MongoDB document structures for users, profiles, and posts.

mod metadata;
mod post;
mod profile;
mod user;

pub use metadata::Metadata;
pub use post::{CommentEntry, LikeEntry, PostDoc, POST_COLLECTION};
pub use profile::{
    EducationEntry, ExperienceEntry, ProfileDoc, SocialLinks, PROFILE_COLLECTION,
};
pub use user::{UserDoc, USER_COLLECTION};
