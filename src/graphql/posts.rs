//! Post resolvers: the feed, likes, and comments

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, InputObject, Object};
use bson::oid::ObjectId;
use bson::DateTime;
use tracing::info;

use crate::auth::jwt::Claims;
use crate::db::schemas::{CommentEntry, LikeEntry, PostDoc};
use crate::graphql::{data, fmt_datetime, parse_object_id, require_auth, MutationResult};
use crate::store::Stores;
use crate::types::DevLinkError;
use crate::validation::validate_post_text;

/// A feed post with its embedded likes and comments
pub struct Post(pub PostDoc);

#[Object]
impl Post {
    async fn id(&self) -> String {
        self.0._id.map(|id| id.to_hex()).unwrap_or_default()
    }

    /// Author's user id
    async fn user(&self) -> String {
        self.0.user.to_hex()
    }

    async fn text(&self) -> &str {
        &self.0.text
    }

    /// Author name captured at creation time
    async fn name(&self) -> &str {
        &self.0.name
    }

    /// Author avatar captured at creation time
    async fn avatar(&self) -> &str {
        &self.0.avatar
    }

    async fn likes(&self) -> Vec<Like> {
        self.0.likes.iter().cloned().map(Like).collect()
    }

    async fn comments(&self) -> Vec<Comment> {
        self.0.comments.iter().cloned().map(Comment).collect()
    }

    async fn date(&self) -> Option<String> {
        self.0.metadata.created_at.map(fmt_datetime)
    }
}

/// A single like
pub struct Like(pub LikeEntry);

#[Object]
impl Like {
    async fn user(&self) -> String {
        self.0.user.to_hex()
    }
}

/// An embedded comment
pub struct Comment(pub CommentEntry);

#[Object]
impl Comment {
    async fn id(&self) -> String {
        self.0._id.to_hex()
    }

    async fn user(&self) -> String {
        self.0.user.to_hex()
    }

    async fn text(&self) -> &str {
        &self.0.text
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn avatar(&self) -> &str {
        &self.0.avatar
    }

    async fn date(&self) -> String {
        fmt_datetime(self.0.created_at)
    }
}

#[derive(InputObject)]
pub struct PostInput {
    pub text: String,
}

#[derive(InputObject)]
pub struct PostIdInput {
    pub post_id: String,
}

#[derive(InputObject)]
pub struct CommentInput {
    pub post_id: String,
    pub text: String,
}

#[derive(InputObject)]
pub struct DeleteCommentInput {
    pub post_id: String,
    pub comment_id: String,
}

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// The whole feed, newest first
    async fn all_posts(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Post>> {
        all_posts(ctx).await.map_err(|e| e.extend())
    }

    /// Single post lookup
    async fn post_by_id(
        &self,
        ctx: &Context<'_>,
        input: PostIdInput,
    ) -> async_graphql::Result<Post> {
        post_by_id(ctx, input).await.map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    /// Publish a post, snapshotting the caller's name and avatar
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        input: PostInput,
    ) -> async_graphql::Result<Post> {
        create_post(ctx, input).await.map_err(|e| e.extend())
    }

    /// Delete the caller's own post
    async fn delete_post(
        &self,
        ctx: &Context<'_>,
        input: PostIdInput,
    ) -> async_graphql::Result<MutationResult> {
        delete_post(ctx, input).await.map_err(|e| e.extend())
    }

    /// Like a post (at most once per user)
    async fn like_post(&self, ctx: &Context<'_>, input: PostIdInput) -> async_graphql::Result<Post> {
        like_post(ctx, input).await.map_err(|e| e.extend())
    }

    /// Withdraw a previously given like
    async fn unlike_post(
        &self,
        ctx: &Context<'_>,
        input: PostIdInput,
    ) -> async_graphql::Result<Post> {
        unlike_post(ctx, input).await.map_err(|e| e.extend())
    }

    /// Prepend a comment to a post
    async fn comment_on_post(
        &self,
        ctx: &Context<'_>,
        input: CommentInput,
    ) -> async_graphql::Result<Post> {
        comment_on_post(ctx, input).await.map_err(|e| e.extend())
    }

    /// Remove the caller's own comment
    async fn delete_comment(
        &self,
        ctx: &Context<'_>,
        input: DeleteCommentInput,
    ) -> async_graphql::Result<Post> {
        delete_comment(ctx, input).await.map_err(|e| e.extend())
    }
}

async fn all_posts(ctx: &Context<'_>) -> Result<Vec<Post>, DevLinkError> {
    let stores = data::<Arc<Stores>>(ctx)?;
    let posts = stores.posts.all().await?;

    if posts.is_empty() {
        return Err(DevLinkError::NotFound("There are no posts".into()));
    }

    Ok(posts.into_iter().map(Post).collect())
}

async fn post_by_id(ctx: &Context<'_>, input: PostIdInput) -> Result<Post, DevLinkError> {
    let stores = data::<Arc<Stores>>(ctx)?;
    let id = parse_object_id(&input.post_id, "Post not found")?;
    stores
        .posts
        .find_by_id(&id)
        .await?
        .map(Post)
        .ok_or_else(|| DevLinkError::NotFound("Post not found".into()))
}

async fn create_post(ctx: &Context<'_>, input: PostInput) -> Result<Post, DevLinkError> {
    let claims = require_auth(ctx)?;
    validate_post_text(&input.text)?;

    let stores = data::<Arc<Stores>>(ctx)?;
    let user = parse_object_id(&claims.sub, "User not found")?;

    let post = stores
        .posts
        .insert(PostDoc::new(
            user,
            input.text,
            claims.name.clone().unwrap_or_default(),
            claims.avatar.clone().unwrap_or_default(),
        ))
        .await?;

    Ok(Post(post))
}

async fn delete_post(ctx: &Context<'_>, input: PostIdInput) -> Result<MutationResult, DevLinkError> {
    let (claims, post) = fetch_post_for_member(ctx, &input.post_id).await?;
    let stores = data::<Arc<Stores>>(ctx)?;

    let caller = parse_object_id(&claims.sub, "Post not found")?;
    if post.user != caller {
        return Err(DevLinkError::Authorization("User not authorized".into()));
    }

    let id = post
        ._id
        .ok_or_else(|| DevLinkError::Internal("Post has no id".into()))?;
    stores.posts.delete(&id).await?;

    info!("Deleted post {} by user {}", id.to_hex(), claims.sub);

    Ok(MutationResult::ok())
}

async fn like_post(ctx: &Context<'_>, input: PostIdInput) -> Result<Post, DevLinkError> {
    let (claims, mut post) = fetch_post_for_member(ctx, &input.post_id).await?;
    let stores = data::<Arc<Stores>>(ctx)?;

    let caller = parse_object_id(&claims.sub, "Post not found")?;
    if post.has_like(&caller) {
        return Err(DevLinkError::Conflict("Post already liked".into()));
    }

    post.likes.insert(0, LikeEntry { user: caller });
    stores.posts.replace(post.clone()).await?;

    Ok(Post(post))
}

async fn unlike_post(ctx: &Context<'_>, input: PostIdInput) -> Result<Post, DevLinkError> {
    let (claims, mut post) = fetch_post_for_member(ctx, &input.post_id).await?;
    let stores = data::<Arc<Stores>>(ctx)?;

    let caller = parse_object_id(&claims.sub, "Post not found")?;
    let index = post
        .like_index(&caller)
        .ok_or_else(|| DevLinkError::NotFound("Post has not yet been liked".into()))?;
    post.likes.remove(index);

    stores.posts.replace(post.clone()).await?;

    Ok(Post(post))
}

async fn comment_on_post(ctx: &Context<'_>, input: CommentInput) -> Result<Post, DevLinkError> {
    let claims = require_auth(ctx)?;
    validate_post_text(&input.text)?;

    let stores = data::<Arc<Stores>>(ctx)?;
    let id = parse_object_id(&input.post_id, "Post not found")?;
    let mut post = stores
        .posts
        .find_by_id(&id)
        .await?
        .ok_or_else(|| DevLinkError::NotFound("Post not found".into()))?;

    let comment = CommentEntry {
        _id: ObjectId::new(),
        user: parse_object_id(&claims.sub, "User not found")?,
        text: input.text,
        name: claims.name.clone().unwrap_or_default(),
        avatar: claims.avatar.clone().unwrap_or_default(),
        created_at: DateTime::now(),
    };

    post.comments.insert(0, comment);
    stores.posts.replace(post.clone()).await?;

    Ok(Post(post))
}

async fn delete_comment(
    ctx: &Context<'_>,
    input: DeleteCommentInput,
) -> Result<Post, DevLinkError> {
    let claims = require_auth(ctx)?;

    let stores = data::<Arc<Stores>>(ctx)?;
    let id = parse_object_id(&input.post_id, "Post not found")?;
    let mut post = stores
        .posts
        .find_by_id(&id)
        .await?
        .ok_or_else(|| DevLinkError::NotFound("Post not found".into()))?;

    let comment_id = parse_object_id(&input.comment_id, "Comment not found")?;
    let index = post
        .comment_index(&comment_id)
        .ok_or_else(|| DevLinkError::NotFound("Comment not found".into()))?;

    let caller = parse_object_id(&claims.sub, "User not found")?;
    if post.comments[index].user != caller {
        return Err(DevLinkError::Authorization("User not authorized".into()));
    }
    post.comments.remove(index);

    stores.posts.replace(post.clone()).await?;

    Ok(Post(post))
}

/// Shared precondition for member post actions: a valid session, an
/// existing caller profile, and the target post
async fn fetch_post_for_member(
    ctx: &Context<'_>,
    post_id: &str,
) -> Result<(Claims, PostDoc), DevLinkError> {
    let claims = require_auth(ctx)?;
    let stores = data::<Arc<Stores>>(ctx)?;

    let caller = parse_object_id(&claims.sub, "Post not found")?;
    stores
        .profiles
        .find_by_user(&caller)
        .await?
        .ok_or_else(|| DevLinkError::NotFound("Post not found".into()))?;

    let id = parse_object_id(post_id, "Post not found")?;
    let post = stores
        .posts
        .find_by_id(&id)
        .await?
        .ok_or_else(|| DevLinkError::NotFound("Post not found".into()))?;

    Ok((claims, post))
}
