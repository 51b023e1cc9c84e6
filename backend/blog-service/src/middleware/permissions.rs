/// Authorization checks for posts
///
/// Only the author of a post may edit or delete it.
use crate::error::{AppError, Result};
use crate::models::Post;
use uuid::Uuid;

/// Check if a user owns a post
pub fn check_post_ownership(user_id: Uuid, post: &Post) -> Result<()> {
    if post.user_id == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You don't have permission to modify this post".to_string(),
        ))
    }
}

/// Only the owner can update their own posts
pub fn check_post_update(user_id: Uuid, post: &Post) -> Result<()> {
    check_post_ownership(user_id, post)
}

/// Only the owner can delete their own posts
pub fn check_post_deletion(user_id: Uuid, post: &Post) -> Result<()> {
    check_post_ownership(user_id, post)
}
