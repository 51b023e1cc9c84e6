/// Business logic layer for blog-service
///
/// Services sit between the HTTP handlers and the repository:
/// - AccountService: registration, credentials, sessions and profiles
/// - FollowService: follow / unfollow between users
/// - PostService: post lifecycle, home listing and detail pages
/// - CommentService: comments and one-level replies
/// - VoteService: likes
pub mod accounts;
pub mod comments;
pub mod follow;
pub mod posts;
pub mod votes;

pub use accounts::{AccountService, Profile};
pub use comments::CommentService;
pub use follow::FollowService;
pub use posts::{PostDetail, PostService};
pub use votes::VoteService;
