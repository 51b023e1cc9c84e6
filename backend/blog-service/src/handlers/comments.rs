/// Comment handlers - comments posted to the detail page and replies
use super::redirect;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::CommentService;
use crate::validators::{validate_comment, CommentForm};
use crate::AppState;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

/// Add a top-level comment, then back to the post
pub async fn create_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(Uuid, String)>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse> {
    let (post_id, slug) = path.into_inner();
    let body = validate_comment(&form)?;

    let (post, _) = CommentService::new(state.repo.clone())
        .comment(post_id, &slug, user.id, body)
        .await?;

    Ok(redirect(&post.detail_path()))
}

/// Reply to a top-level comment, then back to the post
pub async fn create_reply(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(Uuid, Uuid)>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let body = validate_comment(&form)?;

    let (post, _) = CommentService::new(state.repo.clone())
        .reply(post_id, comment_id, user.id, body)
        .await?;

    Ok(redirect(&post.detail_path()))
}
