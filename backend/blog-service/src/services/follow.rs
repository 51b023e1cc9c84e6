/// Follow service - directed follow edges between users
use crate::db::BlogRepository;
use crate::error::{AppError, Result};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct FollowService {
    repo: Arc<dyn BlogRepository>,
}

impl FollowService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// Create the edge if it is absent. Following yourself is a validation
    /// error; an unknown target is not found.
    pub async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<()> {
        if follower_id == followee_id {
            return Err(AppError::field("user", "You cannot follow yourself."));
        }
        self.ensure_user(followee_id).await?;

        let created = self.repo.insert_relation(follower_id, followee_id).await?;
        if created {
            info!(%follower_id, %followee_id, "follow created");
        }
        Ok(())
    }

    /// Remove the edge if present. Nothing to remove is not an error.
    pub async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<()> {
        self.ensure_user(followee_id).await?;

        let removed = self.repo.delete_relation(follower_id, followee_id).await?;
        if removed {
            info!(%follower_id, %followee_id, "follow removed");
        }
        Ok(())
    }

    pub async fn is_following(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        self.repo.relation_exists(follower_id, followee_id).await
    }

    pub async fn follower_count(&self, user_id: Uuid) -> Result<i64> {
        self.repo.count_followers(user_id).await
    }

    pub async fn following_count(&self, user_id: Uuid) -> Result<i64> {
        self.repo.count_following(user_id).await
    }

    async fn ensure_user(&self, user_id: Uuid) -> Result<()> {
        match self.repo.find_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("user {}", user_id))),
        }
    }
}
