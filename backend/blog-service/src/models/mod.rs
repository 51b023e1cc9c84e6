/// Data models for blog-service
///
/// - User / Session: identities and their login sessions
/// - Relation: directed follow edge between two users
/// - Post: user-authored post addressed by id + slug
/// - Comment: comment on a post, optionally replying to another comment
/// - Vote: a user's like of a post
pub mod comment;
pub mod post;
pub mod relation;
pub mod session;
pub mod user;
pub mod vote;

pub use comment::{Comment, CommentThread, NewComment};
pub use post::{derive_slug, slugify, NewPost, Post, PostChanges};
pub use relation::Relation;
pub use session::Session;
pub use user::{NewUser, PublicUser, User};
pub use vote::Vote;
