/// Comment service - comments on posts and one level of replies
use crate::db::BlogRepository;
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentThread, NewComment, Post};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct CommentService {
    repo: Arc<dyn BlogRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// Top-level comment on the post addressed by id and slug.
    pub async fn comment(
        &self,
        post_id: Uuid,
        slug: &str,
        user_id: Uuid,
        body: String,
    ) -> Result<(Post, Comment)> {
        let post = self.find_post(post_id).await?;
        if post.slug != slug {
            return Err(AppError::NotFound(format!("post {}/{}", post_id, slug)));
        }

        let comment = self
            .repo
            .insert_comment(NewComment {
                user_id,
                post_id,
                reply_to: None,
                body,
            })
            .await?;

        info!(comment_id = %comment.id, %post_id, %user_id, "comment created");
        Ok((post, comment))
    }

    /// Reply to a top-level comment of the same post.
    pub async fn reply(
        &self,
        post_id: Uuid,
        parent_id: Uuid,
        user_id: Uuid,
        body: String,
    ) -> Result<(Post, Comment)> {
        let post = self.find_post(post_id).await?;

        let parent = self
            .repo
            .find_comment(parent_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or_else(|| AppError::NotFound(format!("comment {}", parent_id)))?;

        if parent.is_reply {
            return Err(AppError::field("body", "Replies cannot be replied to."));
        }

        let reply = self
            .repo
            .insert_comment(NewComment {
                user_id,
                post_id,
                reply_to: Some(parent.id),
                body,
            })
            .await?;

        info!(comment_id = %reply.id, parent_id = %parent.id, %post_id, %user_id, "reply created");
        Ok((post, reply))
    }

    pub async fn threads(&self, post_id: Uuid) -> Result<Vec<CommentThread>> {
        let comments = self.repo.list_post_comments(post_id).await?;
        Ok(CommentThread::build(comments))
    }

    pub async fn count(&self, post_id: Uuid) -> Result<i64> {
        self.repo.count_post_comments(post_id).await
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Post> {
        self.repo
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))
    }
}
