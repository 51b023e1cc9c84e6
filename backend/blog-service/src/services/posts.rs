/// Post service - post lifecycle, home listing and detail pages
use crate::db::BlogRepository;
use crate::error::{AppError, Result};
use crate::middleware::permissions::{check_post_deletion, check_post_update};
use crate::models::{derive_slug, CommentThread, NewPost, Post, PostChanges, PublicUser};
use crate::services::{CommentService, VoteService};
use crate::validators::PostInput;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Everything the post detail page shows.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub author: Option<PublicUser>,
    pub comments: Vec<CommentThread>,
    pub comment_count: i64,
    pub like_count: i64,
    /// Logged in and not liked yet
    pub can_like: bool,
}

pub struct PostService {
    repo: Arc<dyn BlogRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// All posts, newest first. A non-empty `search` keeps posts whose body
    /// contains it.
    pub async fn home(&self, search: Option<&str>) -> Result<Vec<Post>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.repo.list_posts(search).await
    }

    pub async fn create(&self, user_id: Uuid, input: PostInput) -> Result<Post> {
        let slug = derive_slug(&input.title, &input.body);
        let post = self
            .repo
            .insert_post(NewPost {
                user_id,
                title: input.title,
                slug,
                body: input.body,
            })
            .await?;

        info!(post_id = %post.id, %user_id, slug = %post.slug, "post created");
        Ok(post)
    }

    /// Fetch by id; the slug must match the stored one.
    pub async fn get(&self, post_id: Uuid, slug: &str) -> Result<Post> {
        let post = self.find(post_id).await?;
        if post.slug != slug {
            return Err(AppError::NotFound(format!("post {}/{}", post_id, slug)));
        }
        Ok(post)
    }

    pub async fn detail(&self, post_id: Uuid, slug: &str, viewer: Option<Uuid>) -> Result<PostDetail> {
        let post = self.get(post_id, slug).await?;

        let author = self
            .repo
            .find_user(post.user_id)
            .await?
            .map(|u| PublicUser::from(&u));
        let comment_service = CommentService::new(self.repo.clone());
        let vote_service = VoteService::new(self.repo.clone());

        let comments = comment_service.threads(post_id).await?;
        let comment_count = comment_service.count(post_id).await?;
        let like_count = vote_service.like_count(post_id).await?;
        let can_like = match viewer {
            Some(user_id) => vote_service.can_like(post_id, user_id).await?,
            None => false,
        };

        Ok(PostDetail {
            post,
            author,
            comments,
            comment_count,
            like_count,
            can_like,
        })
    }

    /// The post, provided `user_id` may edit it.
    pub async fn get_owned(&self, post_id: Uuid, user_id: Uuid) -> Result<Post> {
        let post = self.find(post_id).await?;
        check_post_update(user_id, &post)?;
        Ok(post)
    }

    /// Owner-only; the slug is derived again from the new title and body.
    pub async fn update(&self, post_id: Uuid, user_id: Uuid, input: PostInput) -> Result<Post> {
        let post = self.find(post_id).await?;
        check_post_update(user_id, &post)?;

        let slug = derive_slug(&input.title, &input.body);
        let updated = self
            .repo
            .update_post(
                post_id,
                PostChanges {
                    title: input.title,
                    slug,
                    body: input.body,
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

        info!(%post_id, %user_id, slug = %updated.slug, "post updated");
        Ok(updated)
    }

    /// Owner-only; comments and votes go with the post.
    pub async fn delete(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        let post = self.find(post_id).await?;
        check_post_deletion(user_id, &post)?;

        if !self.repo.delete_post_cascade(post_id).await? {
            return Err(AppError::NotFound(format!("post {}", post_id)));
        }

        info!(%post_id, %user_id, "post deleted");
        Ok(())
    }

    async fn find(&self, post_id: Uuid) -> Result<Post> {
        self.repo
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))
    }
}
