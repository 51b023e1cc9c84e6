/// Account service - registration, authentication, sessions and profiles
use crate::db::BlogRepository;
use crate::error::{AppError, FieldErrors, Result};
use crate::models::{NewUser, Post, PublicUser, Session, User};
use crate::security::{generate_session_token, hash_password, hash_session_token, verify_password};
use crate::validators::{Credentials, Registration};
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Public view of a user with their posts and follow counts.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user: PublicUser,
    pub posts: Vec<Post>,
    pub follower_count: i64,
    pub following_count: i64,
    /// Set only for a logged-in viewer looking at someone else
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

pub struct AccountService {
    repo: Arc<dyn BlogRepository>,
}

impl AccountService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// Create a user from already-validated input. Taken usernames and emails
    /// come back as field errors.
    pub async fn register(&self, registration: Registration) -> Result<User> {
        let mut errors = FieldErrors::new();
        if self.repo.username_exists(&registration.username).await? {
            errors.add("username", "A user with that username already exists.");
        }
        if self.repo.email_exists(&registration.email).await? {
            errors.add("email", "A user with that email already exists.");
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let password_hash = hash_password(&registration.password)?;
        let user = self
            .repo
            .insert_user(NewUser {
                username: registration.username,
                email: registration.email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// The matching user, or `None` when the username is unknown or the
    /// password does not verify.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Option<User>> {
        let Some(user) = self
            .repo
            .find_user_by_username(&credentials.username)
            .await?
        else {
            debug!(username = %credentials.username, "login for unknown username");
            return Ok(None);
        };

        if verify_password(&credentials.password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            debug!(user_id = %user.id, "login with wrong password");
            Ok(None)
        }
    }

    /// Open a session and return the raw token for the cookie.
    pub async fn start_session(&self, user_id: Uuid, ttl_hours: i64) -> Result<String> {
        let now = Utc::now();
        let expires_at = Duration::try_hours(ttl_hours)
            .filter(|ttl| *ttl > Duration::zero())
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AppError::Internal(format!("invalid session ttl: {} hours", ttl_hours)))?;

        let token = generate_session_token();
        self.repo
            .insert_session(Session {
                id: Uuid::new_v4(),
                user_id,
                token_hash: hash_session_token(&token),
                created_at: now,
                expires_at,
            })
            .await?;

        info!(%user_id, "session started");
        Ok(token)
    }

    /// Returns true if a session was removed.
    pub async fn end_session(&self, token_hash: &str) -> Result<bool> {
        self.repo.delete_session(token_hash).await
    }

    /// User behind a raw session token. Expired sessions are removed and
    /// treated as absent.
    pub async fn resolve_session(&self, token: &str) -> Result<Option<User>> {
        let token_hash = hash_session_token(token);
        let Some(session) = self.repo.find_session(&token_hash).await? else {
            return Ok(None);
        };

        if session.is_expired() {
            self.repo.delete_session(&token_hash).await?;
            debug!(user_id = %session.user_id, "expired session dropped");
            return Ok(None);
        }

        self.repo.find_user(session.user_id).await
    }

    pub async fn profile(&self, user_id: Uuid, viewer: Option<Uuid>) -> Result<Profile> {
        let user = self
            .repo
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;

        let posts = self.repo.list_user_posts(user_id).await?;
        let follower_count = self.repo.count_followers(user_id).await?;
        let following_count = self.repo.count_following(user_id).await?;

        let is_following = match viewer {
            Some(viewer_id) if viewer_id != user_id => {
                Some(self.repo.relation_exists(viewer_id, user_id).await?)
            }
            _ => None,
        };

        Ok(Profile {
            user: PublicUser::from(&user),
            posts,
            follower_count,
            following_count,
            is_following,
        })
    }
}
