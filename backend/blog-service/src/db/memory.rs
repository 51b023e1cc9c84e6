/// In-process repository
///
/// All tables live behind one `RwLock`, so every write (the post cascade
/// included) is a single critical section. Rows are kept in insertion order.
use super::BlogRepository;
use crate::error::{AppError, Result};
use crate::models::{
    Comment, NewComment, NewPost, NewUser, Post, PostChanges, Relation, Session, User, Vote,
};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: HashMap<String, Session>,
    relations: Vec<Relation>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    votes: Vec<Vote>,
}

#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored votes across all posts.
    pub async fn vote_total(&self) -> usize {
        self.tables.read().await.votes.len()
    }

    /// Number of stored comments across all posts.
    pub async fn comment_total(&self) -> usize {
        self.tables.read().await.comments.len()
    }

    pub async fn relation_total(&self) -> usize {
        self.tables.read().await.relations.len()
    }
}

/// Usernames are unique regardless of case, like `LOWER(username)` in PostgreSQL.
fn same_username(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn newest_first<'a>(posts: impl DoubleEndedIterator<Item = &'a Post>) -> Vec<Post> {
    posts.rev().cloned().collect()
}

#[async_trait::async_trait]
impl BlogRepository for MemoryRepository {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        let taken = tables.users.iter().any(|u| {
            same_username(&u.username, &user.username)
                || u.email.eq_ignore_ascii_case(&user.email)
        });
        if taken {
            return Err(AppError::Conflict("user already exists".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .any(|u| same_username(&u.username, username)))
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn count_users(&self) -> Result<i64> {
        Ok(self.tables.read().await.users.len() as i64)
    }

    async fn insert_session(&self, session: Session) -> Result<()> {
        let mut tables = self.tables.write().await;
        // Abandoned sessions are never presented again; drop them here.
        tables.sessions.retain(|_, s| !s.is_expired());
        tables.sessions.insert(session.token_hash.clone(), session);
        Ok(())
    }

    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>> {
        Ok(self.tables.read().await.sessions.get(token_hash).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> Result<bool> {
        Ok(self
            .tables
            .write()
            .await
            .sessions
            .remove(token_hash)
            .is_some())
    }

    async fn insert_relation(&self, from_user_id: Uuid, to_user_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let exists = tables
            .relations
            .iter()
            .any(|r| r.from_user_id == from_user_id && r.to_user_id == to_user_id);
        if exists {
            return Ok(false);
        }
        tables.relations.push(Relation {
            id: Uuid::new_v4(),
            from_user_id,
            to_user_id,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn delete_relation(&self, from_user_id: Uuid, to_user_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.relations.len();
        tables
            .relations
            .retain(|r| !(r.from_user_id == from_user_id && r.to_user_id == to_user_id));
        Ok(tables.relations.len() < before)
    }

    async fn relation_exists(&self, from_user_id: Uuid, to_user_id: Uuid) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .relations
            .iter()
            .any(|r| r.from_user_id == from_user_id && r.to_user_id == to_user_id))
    }

    async fn count_followers(&self, user_id: Uuid) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables.relations.iter().filter(|r| r.to_user_id == user_id).count() as i64)
    }

    async fn count_following(&self, user_id: Uuid) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .relations
            .iter()
            .filter(|r| r.from_user_id == user_id)
            .count() as i64)
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            user_id: post.user_id,
            title: post.title,
            slug: post.slug,
            body: post.body,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.posts.push(post.clone());
        Ok(post)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == post_id).cloned())
    }

    async fn list_posts(&self, search: Option<&str>) -> Result<Vec<Post>> {
        let tables = self.tables.read().await;
        Ok(match search {
            Some(needle) => newest_first(tables.posts.iter().filter(|p| p.body.contains(needle))),
            None => newest_first(tables.posts.iter()),
        })
    }

    async fn list_user_posts(&self, user_id: Uuid) -> Result<Vec<Post>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables.posts.iter().filter(|p| p.user_id == user_id),
        ))
    }

    async fn update_post(&self, post_id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables.posts.iter_mut().find(|p| p.id == post_id) else {
            return Ok(None);
        };
        post.title = changes.title;
        post.slug = changes.slug;
        post.body = changes.body;
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete_post_cascade(&self, post_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != post_id);
        if tables.posts.len() == before {
            return Ok(false);
        }
        tables.votes.retain(|v| v.post_id != post_id);
        tables.comments.retain(|c| c.post_id != post_id);
        Ok(true)
    }

    async fn count_posts(&self) -> Result<i64> {
        Ok(self.tables.read().await.posts.len() as i64)
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        let comment = Comment {
            id: Uuid::new_v4(),
            user_id: comment.user_id,
            post_id: comment.post_id,
            is_reply: comment.reply_to.is_some(),
            reply_to: comment.reply_to,
            body: comment.body,
            created_at: Utc::now(),
        };
        self.tables.write().await.comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == comment_id).cloned())
    }

    async fn list_post_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn count_post_comments(&self, post_id: Uuid) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().filter(|c| c.post_id == post_id).count() as i64)
    }

    async fn insert_vote(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables
            .votes
            .iter()
            .any(|v| v.post_id == post_id && v.user_id == user_id)
        {
            return Ok(false);
        }
        tables.votes.push(Vote {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn vote_exists(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .votes
            .iter()
            .any(|v| v.post_id == post_id && v.user_id == user_id))
    }

    async fn count_post_votes(&self, post_id: Uuid) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables.votes.iter().filter(|v| v.post_id == post_id).count() as i64)
    }
}
