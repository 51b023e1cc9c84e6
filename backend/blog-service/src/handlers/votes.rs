/// Vote handlers
use super::redirect;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::VoteService;
use crate::AppState;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

/// Like a post, then back to it
pub async fn like_post(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = VoteService::new(state.repo.clone())
        .like(*post_id, user.id)
        .await?;

    Ok(redirect(&post.detail_path()))
}
