use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    /// Top-level comment this one answers
    pub reply_to: Option<Uuid>,
    pub is_reply: bool,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub reply_to: Option<Uuid>,
    pub body: String,
}

/// A top-level comment with its replies, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

impl CommentThread {
    /// Group a post's comments into threads. Input order is kept; replies whose
    /// parent is missing from `comments` are dropped.
    pub fn build(comments: Vec<Comment>) -> Vec<CommentThread> {
        let (top_level, replies): (Vec<_>, Vec<_>) =
            comments.into_iter().partition(|c| c.reply_to.is_none());

        let mut threads: Vec<CommentThread> = top_level
            .into_iter()
            .map(|comment| CommentThread {
                comment,
                replies: Vec::new(),
            })
            .collect();

        for reply in replies {
            if let Some(thread) = threads
                .iter_mut()
                .find(|t| Some(t.comment.id) == reply.reply_to)
            {
                thread.replies.push(reply);
            }
        }
        threads
    }
}
