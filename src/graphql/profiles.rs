//! Profile resolvers: lookups, edit/upsert, and the embedded
//! experience/education sub-lists

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, InputObject, Object};
use bson::oid::ObjectId;
use tracing::info;

use crate::db::schemas::{
    EducationEntry, ExperienceEntry, Metadata, ProfileDoc, SocialLinks,
};
use crate::graphql::users::User;
use crate::graphql::{
    data, fmt_datetime, parse_object_id, require_auth, MutationResult,
};
use crate::store::Stores;
use crate::types::DevLinkError;
use crate::validation::{
    parse_date, split_skills, validate_education, validate_entry_dates, validate_experience,
    validate_profile, EducationFields, ExperienceFields, ProfileFields,
};

/// A developer profile
pub struct Profile(pub ProfileDoc);

#[Object]
impl Profile {
    async fn id(&self) -> String {
        self.0._id.map(|id| id.to_hex()).unwrap_or_default()
    }

    /// Owning account's public fields, if the account still exists
    async fn user(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<User>> {
        let stores = data::<Arc<Stores>>(ctx).map_err(|e| e.extend())?;
        let user = stores
            .users
            .find_by_id(&self.0.user)
            .await
            .map_err(|e| e.extend())?;
        Ok(user.as_ref().map(User::from))
    }

    async fn handle(&self) -> &str {
        &self.0.handle
    }

    async fn company(&self) -> Option<&str> {
        self.0.company.as_deref()
    }

    async fn website(&self) -> Option<&str> {
        self.0.website.as_deref()
    }

    async fn location(&self) -> Option<&str> {
        self.0.location.as_deref()
    }

    async fn status(&self) -> &str {
        &self.0.status
    }

    async fn skills(&self) -> &[String] {
        &self.0.skills
    }

    async fn bio(&self) -> Option<&str> {
        self.0.bio.as_deref()
    }

    async fn githubusername(&self) -> Option<&str> {
        self.0.githubusername.as_deref()
    }

    async fn experience(&self) -> Vec<Experience> {
        self.0.experience.iter().cloned().map(Experience).collect()
    }

    async fn education(&self) -> Vec<Education> {
        self.0.education.iter().cloned().map(Education).collect()
    }

    async fn social(&self) -> Social {
        Social(self.0.social.clone())
    }

    async fn date(&self) -> Option<String> {
        self.0.metadata.created_at.map(fmt_datetime)
    }
}

/// Embedded work-history entry
pub struct Experience(pub ExperienceEntry);

#[Object]
impl Experience {
    async fn id(&self) -> String {
        self.0._id.to_hex()
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn company(&self) -> &str {
        &self.0.company
    }

    async fn location(&self) -> Option<&str> {
        self.0.location.as_deref()
    }

    async fn from(&self) -> String {
        fmt_datetime(self.0.from)
    }

    async fn to(&self) -> Option<String> {
        self.0.to.map(fmt_datetime)
    }

    async fn current(&self) -> bool {
        self.0.current
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }
}

/// Embedded education entry
pub struct Education(pub EducationEntry);

#[Object]
impl Education {
    async fn id(&self) -> String {
        self.0._id.to_hex()
    }

    async fn school(&self) -> &str {
        &self.0.school
    }

    async fn degree(&self) -> &str {
        &self.0.degree
    }

    async fn fieldofstudy(&self) -> &str {
        &self.0.fieldofstudy
    }

    async fn from(&self) -> String {
        fmt_datetime(self.0.from)
    }

    async fn to(&self) -> Option<String> {
        self.0.to.map(fmt_datetime)
    }

    async fn current(&self) -> bool {
        self.0.current
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }
}

/// Social profile links
pub struct Social(pub SocialLinks);

#[Object]
impl Social {
    async fn youtube(&self) -> Option<&str> {
        self.0.youtube.as_deref()
    }

    async fn twitter(&self) -> Option<&str> {
        self.0.twitter.as_deref()
    }

    async fn facebook(&self) -> Option<&str> {
        self.0.facebook.as_deref()
    }

    async fn linkedin(&self) -> Option<&str> {
        self.0.linkedin.as_deref()
    }

    async fn instagram(&self) -> Option<&str> {
        self.0.instagram.as_deref()
    }
}

#[derive(InputObject)]
pub struct ProfileInput {
    pub handle: String,
    pub status: String,
    /// Comma-separated skills
    pub skills: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

#[derive(InputObject)]
pub struct ExperienceInput {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: String,
    pub to: Option<String>,
    #[graphql(default)]
    pub current: bool,
    pub description: Option<String>,
}

#[derive(InputObject)]
pub struct EducationInput {
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: String,
    pub to: Option<String>,
    #[graphql(default)]
    pub current: bool,
    pub description: Option<String>,
}

#[derive(InputObject)]
pub struct HandleInput {
    pub handle: String,
}

#[derive(InputObject)]
pub struct ProfileByIdInput {
    pub user_id: String,
}

#[derive(InputObject)]
pub struct DeleteExperienceInput {
    pub exp_id: String,
}

#[derive(InputObject)]
pub struct DeleteEducationInput {
    pub edu_id: String,
}

#[derive(Default)]
pub struct ProfileQuery;

#[Object]
impl ProfileQuery {
    /// The authenticated caller's profile
    async fn profile(&self, ctx: &Context<'_>) -> async_graphql::Result<Profile> {
        own_profile(ctx).await.map(Profile).map_err(|e| e.extend())
    }

    /// Every profile
    async fn all_profiles(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Profile>> {
        all_profiles(ctx).await.map_err(|e| e.extend())
    }

    /// Profile lookup by public handle
    async fn profile_by_handle(
        &self,
        ctx: &Context<'_>,
        input: HandleInput,
    ) -> async_graphql::Result<Profile> {
        profile_by_handle(ctx, input).await.map_err(|e| e.extend())
    }

    /// Profile lookup by owning user id
    async fn profile_by_id(
        &self,
        ctx: &Context<'_>,
        input: ProfileByIdInput,
    ) -> async_graphql::Result<Profile> {
        profile_by_id(ctx, input).await.map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct ProfileMutation;

#[Object]
impl ProfileMutation {
    /// Create or update the caller's profile
    async fn edit_profile(
        &self,
        ctx: &Context<'_>,
        input: ProfileInput,
    ) -> async_graphql::Result<Profile> {
        edit_profile(ctx, input).await.map_err(|e| e.extend())
    }

    /// Prepend a work-history entry
    async fn add_experience(
        &self,
        ctx: &Context<'_>,
        input: ExperienceInput,
    ) -> async_graphql::Result<Profile> {
        add_experience(ctx, input).await.map_err(|e| e.extend())
    }

    /// Prepend an education entry
    async fn add_education(
        &self,
        ctx: &Context<'_>,
        input: EducationInput,
    ) -> async_graphql::Result<Profile> {
        add_education(ctx, input).await.map_err(|e| e.extend())
    }

    /// Remove a work-history entry by id
    async fn delete_experience(
        &self,
        ctx: &Context<'_>,
        input: DeleteExperienceInput,
    ) -> async_graphql::Result<Profile> {
        delete_experience(ctx, input).await.map_err(|e| e.extend())
    }

    /// Remove an education entry by id
    async fn delete_education(
        &self,
        ctx: &Context<'_>,
        input: DeleteEducationInput,
    ) -> async_graphql::Result<Profile> {
        delete_education(ctx, input).await.map_err(|e| e.extend())
    }

    /// Delete the caller's profile and account
    async fn delete_profile(&self, ctx: &Context<'_>) -> async_graphql::Result<MutationResult> {
        delete_profile(ctx).await.map_err(|e| e.extend())
    }
}

async fn own_profile(ctx: &Context<'_>) -> Result<ProfileDoc, DevLinkError> {
    let claims = require_auth(ctx)?;
    let stores = data::<Arc<Stores>>(ctx)?;

    let user = parse_object_id(&claims.sub, "There is no profile for this user")?;
    stores
        .profiles
        .find_by_user(&user)
        .await?
        .ok_or_else(|| DevLinkError::NotFound("There is no profile for this user".into()))
}

async fn all_profiles(ctx: &Context<'_>) -> Result<Vec<Profile>, DevLinkError> {
    let stores = data::<Arc<Stores>>(ctx)?;
    let profiles = stores.profiles.all().await?;

    if profiles.is_empty() {
        return Err(DevLinkError::NotFound("There are no profiles".into()));
    }

    Ok(profiles.into_iter().map(Profile).collect())
}

async fn profile_by_handle(
    ctx: &Context<'_>,
    input: HandleInput,
) -> Result<Profile, DevLinkError> {
    let stores = data::<Arc<Stores>>(ctx)?;
    stores
        .profiles
        .find_by_handle(&input.handle)
        .await?
        .map(Profile)
        .ok_or_else(|| DevLinkError::NotFound("Profile not found".into()))
}

async fn profile_by_id(
    ctx: &Context<'_>,
    input: ProfileByIdInput,
) -> Result<Profile, DevLinkError> {
    let stores = data::<Arc<Stores>>(ctx)?;
    let user = parse_object_id(&input.user_id, "Profile not found")?;
    stores
        .profiles
        .find_by_user(&user)
        .await?
        .map(Profile)
        .ok_or_else(|| DevLinkError::NotFound("Profile not found".into()))
}

async fn edit_profile(ctx: &Context<'_>, input: ProfileInput) -> Result<Profile, DevLinkError> {
    let claims = require_auth(ctx)?;

    validate_profile(&ProfileFields {
        handle: &input.handle,
        status: &input.status,
        skills: &input.skills,
        website: input.website.as_deref(),
        youtube: input.youtube.as_deref(),
        twitter: input.twitter.as_deref(),
        facebook: input.facebook.as_deref(),
        linkedin: input.linkedin.as_deref(),
        instagram: input.instagram.as_deref(),
    })?;

    let stores = data::<Arc<Stores>>(ctx)?;
    let user = parse_object_id(&claims.sub, "There is no profile for this user")?;

    // Handle must stay unique across owners; checked on every edit because
    // handles are mutable. The unique index backstops this racy pre-check.
    if let Some(owner) = stores.profiles.find_by_handle(&input.handle).await? {
        if owner.user != user {
            return Err(DevLinkError::Conflict("Handle already exists".into()));
        }
    }

    let skills = split_skills(&input.skills);
    let social = SocialLinks {
        youtube: input.youtube.filter(|s| !s.is_empty()),
        twitter: input.twitter.filter(|s| !s.is_empty()),
        facebook: input.facebook.filter(|s| !s.is_empty()),
        linkedin: input.linkedin.filter(|s| !s.is_empty()),
        instagram: input.instagram.filter(|s| !s.is_empty()),
    };

    let profile = match stores.profiles.find_by_user(&user).await? {
        Some(mut existing) => {
            existing.handle = input.handle;
            existing.status = input.status;
            existing.skills = skills;
            existing.company = input.company.filter(|s| !s.is_empty());
            existing.website = input.website.filter(|s| !s.is_empty());
            existing.location = input.location.filter(|s| !s.is_empty());
            existing.bio = input.bio.filter(|s| !s.is_empty());
            existing.githubusername = input.githubusername.filter(|s| !s.is_empty());
            existing.social = social;
            stores.profiles.replace(existing.clone()).await?;
            existing
        }
        None => {
            let doc = ProfileDoc {
                _id: None,
                metadata: Metadata::new(),
                user,
                handle: input.handle,
                company: input.company.filter(|s| !s.is_empty()),
                website: input.website.filter(|s| !s.is_empty()),
                location: input.location.filter(|s| !s.is_empty()),
                status: input.status,
                skills,
                bio: input.bio.filter(|s| !s.is_empty()),
                githubusername: input.githubusername.filter(|s| !s.is_empty()),
                experience: Vec::new(),
                education: Vec::new(),
                social,
            };
            stores.profiles.insert(doc).await?
        }
    };

    Ok(Profile(profile))
}

async fn add_experience(
    ctx: &Context<'_>,
    input: ExperienceInput,
) -> Result<Profile, DevLinkError> {
    validate_experience(&ExperienceFields {
        title: &input.title,
        company: &input.company,
        from: &input.from,
    })?;
    validate_entry_dates(input.to.as_deref(), input.current)?;

    let mut profile = own_profile(ctx).await?;
    let stores = data::<Arc<Stores>>(ctx)?;

    let entry = ExperienceEntry {
        _id: ObjectId::new(),
        title: input.title,
        company: input.company,
        location: input.location.filter(|s| !s.is_empty()),
        from: parse_date("from", &input.from)?,
        to: input.to.as_deref().map(|t| parse_date("to", t)).transpose()?,
        current: input.current,
        description: input.description.filter(|s| !s.is_empty()),
    };

    profile.experience.insert(0, entry);
    stores.profiles.replace(profile.clone()).await?;

    Ok(Profile(profile))
}

async fn add_education(ctx: &Context<'_>, input: EducationInput) -> Result<Profile, DevLinkError> {
    validate_education(&EducationFields {
        school: &input.school,
        degree: &input.degree,
        fieldofstudy: &input.fieldofstudy,
        from: &input.from,
    })?;
    validate_entry_dates(input.to.as_deref(), input.current)?;

    let mut profile = own_profile(ctx).await?;
    let stores = data::<Arc<Stores>>(ctx)?;

    let entry = EducationEntry {
        _id: ObjectId::new(),
        school: input.school,
        degree: input.degree,
        fieldofstudy: input.fieldofstudy,
        from: parse_date("from", &input.from)?,
        to: input.to.as_deref().map(|t| parse_date("to", t)).transpose()?,
        current: input.current,
        description: input.description.filter(|s| !s.is_empty()),
    };

    profile.education.insert(0, entry);
    stores.profiles.replace(profile.clone()).await?;

    Ok(Profile(profile))
}

async fn delete_experience(
    ctx: &Context<'_>,
    input: DeleteExperienceInput,
) -> Result<Profile, DevLinkError> {
    let entry_id = parse_object_id(&input.exp_id, "Experience not found")?;
    let mut profile = own_profile(ctx).await?;
    let stores = data::<Arc<Stores>>(ctx)?;

    let index = profile
        .experience_index(&entry_id)
        .ok_or_else(|| DevLinkError::NotFound("Experience not found".into()))?;
    profile.experience.remove(index);

    stores.profiles.replace(profile.clone()).await?;

    Ok(Profile(profile))
}

async fn delete_education(
    ctx: &Context<'_>,
    input: DeleteEducationInput,
) -> Result<Profile, DevLinkError> {
    let entry_id = parse_object_id(&input.edu_id, "Education not found")?;
    let mut profile = own_profile(ctx).await?;
    let stores = data::<Arc<Stores>>(ctx)?;

    let index = profile
        .education_index(&entry_id)
        .ok_or_else(|| DevLinkError::NotFound("Education not found".into()))?;
    profile.education.remove(index);

    stores.profiles.replace(profile.clone()).await?;

    Ok(Profile(profile))
}

async fn delete_profile(ctx: &Context<'_>) -> Result<MutationResult, DevLinkError> {
    let claims = require_auth(ctx)?;
    let stores = data::<Arc<Stores>>(ctx)?;

    let user = parse_object_id(&claims.sub, "User not found")?;

    // Posts deliberately survive with their author snapshots
    stores.profiles.delete_by_user(&user).await?;
    stores.users.delete(&user).await?;

    info!("Deleted profile and account for user {}", claims.sub);

    Ok(MutationResult::ok())
}
