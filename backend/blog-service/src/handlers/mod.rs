/// HTTP handlers for blog-service
///
/// - accounts: register, login, logout, profile, follow / unfollow
/// - posts: home, detail, create, update, delete
/// - comments: comments on the detail page and replies
/// - votes: likes
/// - health: liveness and readiness probes
///
/// Pages are answered with a JSON page document naming the view and carrying
/// the context a template would receive.
pub mod accounts;
pub mod comments;
pub mod health;
pub mod posts;
pub mod votes;

use crate::middleware::{AuthUser, RequestContext};
use actix_web::http::header;
use actix_web::HttpResponse;
use serde::Serialize;

pub const HOME_PATH: &str = "/";

/// Page document: the view name, who is looking, and the view's context.
#[derive(Debug, Serialize)]
pub struct Page<'a, T: Serialize> {
    pub view: &'static str,
    pub viewer: Option<&'a AuthUser>,
    #[serde(flatten)]
    pub context: T,
}

/// 200 with the page document for `view`.
pub fn render<T: Serialize>(view: &'static str, ctx: &RequestContext, context: T) -> HttpResponse {
    HttpResponse::Ok().json(Page {
        view,
        viewer: ctx.user.as_ref(),
        context,
    })
}

/// 302 to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn profile_path(user_id: uuid::Uuid) -> String {
    format!("/accounts/profile/{}/", user_id)
}
