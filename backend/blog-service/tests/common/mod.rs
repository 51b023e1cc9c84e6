//! Shared fixtures for the HTTP integration tests.
//!
//! Every test gets its own in-memory repository; nothing touches PostgreSQL.
#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{http::header, test, web, App};
use blog_service::config::SessionConfig;
use blog_service::db::{BlogRepository, MemoryRepository};
use blog_service::middleware::SessionMiddleware;
use blog_service::models::{NewPost, NewUser, Post, User};
use blog_service::security::hash_password;
use blog_service::services::AccountService;
use blog_service::{routes, AppState};
use std::sync::Arc;
use uuid::Uuid;

pub const PASSWORD: &str = "1234";

pub struct TestContext {
    pub repo: Arc<MemoryRepository>,
    pub state: web::Data<AppState>,
}

impl TestContext {
    pub fn new() -> Self {
        let repo = Arc::new(MemoryRepository::new());
        let state = web::Data::new(AppState::new(repo.clone(), SessionConfig::default()));
        Self { repo, state }
    }

    pub async fn seed_user(&self, username: &str) -> User {
        self.repo
            .insert_user(NewUser {
                username: username.to_string(),
                email: format!("{}@gmail.com", username),
                password_hash: hash_password(PASSWORD).unwrap(),
            })
            .await
            .unwrap()
    }

    pub async fn seed_post(&self, user_id: Uuid) -> Post {
        self.repo
            .insert_post(NewPost {
                user_id,
                title: "first post".to_string(),
                slug: "first-post".to_string(),
                body: "this is first post".to_string(),
            })
            .await
            .unwrap()
    }

    /// Session cookie for `user_id`, as if they had logged in.
    pub async fn login_cookie(&self, user_id: Uuid) -> Cookie<'static> {
        let token = AccountService::new(self.repo.clone())
            .start_session(user_id, 1)
            .await
            .unwrap();
        Cookie::new(SessionConfig::default().cookie_name, token)
    }
}

pub async fn init_app(
    state: web::Data<AppState>,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(state)
            .wrap(SessionMiddleware)
            .configure(routes::configure),
    )
    .await
}

pub fn location<B>(resp: &ServiceResponse<B>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
