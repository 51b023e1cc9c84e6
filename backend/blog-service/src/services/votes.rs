/// Vote service - likes, one per user and post
use crate::db::BlogRepository;
use crate::error::{AppError, Result};
use crate::models::Post;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub struct VoteService {
    repo: Arc<dyn BlogRepository>,
}

impl VoteService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// Like the post unless the user already did. Returns the post so the
    /// caller can redirect to it.
    pub async fn like(&self, post_id: Uuid, user_id: Uuid) -> Result<Post> {
        let post = self
            .repo
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

        if self.repo.insert_vote(post_id, user_id).await? {
            info!(%post_id, %user_id, "post liked");
        } else {
            debug!(%post_id, %user_id, "post already liked");
        }
        Ok(post)
    }

    pub async fn like_count(&self, post_id: Uuid) -> Result<i64> {
        self.repo.count_post_votes(post_id).await
    }

    pub async fn can_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        Ok(!self.repo.vote_exists(post_id, user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryRepository;
    use crate::models::{NewPost, NewUser};

    #[tokio::test]
    async fn liking_twice_keeps_one_vote() {
        let repo = Arc::new(MemoryRepository::new());
        let user = repo
            .insert_user(NewUser {
                username: "beni".into(),
                email: "beni@gmail.com".into(),
                password_hash: "x".into(),
            })
            .await
            .unwrap();
        let post = repo
            .insert_post(NewPost {
                user_id: user.id,
                title: "first post".into(),
                slug: "first-post".into(),
                body: "this is first post".into(),
            })
            .await
            .unwrap();
        let votes = VoteService::new(repo.clone());

        assert!(votes.can_like(post.id, user.id).await.unwrap());
        votes.like(post.id, user.id).await.unwrap();
        votes.like(post.id, user.id).await.unwrap();

        assert_eq!(votes.like_count(post.id).await.unwrap(), 1);
        assert_eq!(repo.vote_total().await, 1);
        assert!(!votes.can_like(post.id, user.id).await.unwrap());
    }

    #[tokio::test]
    async fn liking_missing_post_is_not_found() {
        let votes = VoteService::new(Arc::new(MemoryRepository::new()));
        let err = votes.like(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
