/// Database access layer
///
/// Every store is reached through `BlogRepository`. Two implementations:
/// - `PgRepository`: PostgreSQL via sqlx, used in every deployed environment
/// - `MemoryRepository`: process-local tables for development and tests
pub mod memory;
pub mod pool;
pub mod postgres;

pub use memory::MemoryRepository;
pub use pool::{create_pool, MIGRATOR};
pub use postgres::PgRepository;

use crate::error::Result;
use crate::models::{Comment, NewComment, NewPost, NewUser, Post, PostChanges, Session, User};
use uuid::Uuid;

/// Storage operations behind the user directory, follow graph, post store,
/// comment tree and vote ledger.
#[async_trait::async_trait]
pub trait BlogRepository: Send + Sync {
    // ----- users -----

    async fn insert_user(&self, user: NewUser) -> Result<User>;

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn username_exists(&self, username: &str) -> Result<bool>;

    /// Case-insensitive
    async fn email_exists(&self, email: &str) -> Result<bool>;

    async fn count_users(&self) -> Result<i64>;

    // ----- sessions -----

    async fn insert_session(&self, session: Session) -> Result<()>;

    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>>;

    /// Returns true if a session was removed
    async fn delete_session(&self, token_hash: &str) -> Result<bool>;

    // ----- follow graph -----

    /// Create-if-absent; returns true if a new edge was inserted
    async fn insert_relation(&self, from_user_id: Uuid, to_user_id: Uuid) -> Result<bool>;

    /// Returns true if an edge was removed
    async fn delete_relation(&self, from_user_id: Uuid, to_user_id: Uuid) -> Result<bool>;

    async fn relation_exists(&self, from_user_id: Uuid, to_user_id: Uuid) -> Result<bool>;

    async fn count_followers(&self, user_id: Uuid) -> Result<i64>;

    async fn count_following(&self, user_id: Uuid) -> Result<i64>;

    // ----- posts -----

    async fn insert_post(&self, post: NewPost) -> Result<Post>;

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>>;

    /// Newest first; `search` keeps posts whose body contains it
    async fn list_posts(&self, search: Option<&str>) -> Result<Vec<Post>>;

    /// Newest first
    async fn list_user_posts(&self, user_id: Uuid) -> Result<Vec<Post>>;

    /// `None` if the post does not exist
    async fn update_post(&self, post_id: Uuid, changes: PostChanges) -> Result<Option<Post>>;

    /// Removes the post with its votes and comments as one unit.
    /// Returns false if the post did not exist.
    async fn delete_post_cascade(&self, post_id: Uuid) -> Result<bool>;

    async fn count_posts(&self) -> Result<i64>;

    // ----- comments -----

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment>;

    async fn find_comment(&self, comment_id: Uuid) -> Result<Option<Comment>>;

    /// Oldest first, replies included
    async fn list_post_comments(&self, post_id: Uuid) -> Result<Vec<Comment>>;

    async fn count_post_comments(&self, post_id: Uuid) -> Result<i64>;

    // ----- votes -----

    /// Create-if-absent; returns true if a new vote was inserted
    async fn insert_vote(&self, post_id: Uuid, user_id: Uuid) -> Result<bool>;

    async fn vote_exists(&self, post_id: Uuid, user_id: Uuid) -> Result<bool>;

    async fn count_post_votes(&self, post_id: Uuid) -> Result<i64>;

    /// Health check (optional)
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
