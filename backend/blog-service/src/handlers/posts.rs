/// Post handlers - home listing, detail page and owner edits
use super::{redirect, render, HOME_PATH};
use crate::error::Result;
use crate::middleware::{AuthUser, RequestContext};
use crate::models::Post;
use crate::services::{PostDetail, PostService};
use crate::validators::{
    comment_form, post_form, reply_form, search_form, validate_post, validate_search, FormView,
    PostForm, SearchForm,
};
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize)]
struct HomePage {
    posts: Vec<Post>,
    form: FormView,
}

#[derive(Serialize)]
struct DetailPage {
    #[serde(flatten)]
    detail: PostDetail,
    form: FormView,
    reply_form: FormView,
}

#[derive(Serialize)]
struct EditPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    post: Option<Post>,
    form: FormView,
}

/// All posts, optionally filtered by `?search=`
pub async fn home(
    state: web::Data<AppState>,
    ctx: RequestContext,
    query: web::Query<SearchForm>,
) -> Result<HttpResponse> {
    // A blank or missing term lists everything.
    let search = validate_search(&query).ok();
    let posts = PostService::new(state.repo.clone())
        .home(search.as_deref())
        .await?;

    let form = match search {
        Some(term) => search_form().with_initial("search", term),
        None => search_form(),
    };

    Ok(render("home/index", &ctx, HomePage { posts, form }))
}

/// Post detail with comments and likes
pub async fn post_detail(
    state: web::Data<AppState>,
    ctx: RequestContext,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse> {
    let (post_id, slug) = path.into_inner();
    let detail = PostService::new(state.repo.clone())
        .detail(post_id, &slug, ctx.user_id())
        .await?;

    Ok(render(
        "home/detail",
        &ctx,
        DetailPage {
            detail,
            form: comment_form(),
            reply_form: reply_form(),
        },
    ))
}

/// Show the create form
pub async fn create_form(_user: AuthUser, ctx: RequestContext) -> HttpResponse {
    render(
        "home/create",
        &ctx,
        EditPage {
            post: None,
            form: post_form(),
        },
    )
}

/// Create a post and go to it
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthUser,
    form: web::Form<PostForm>,
) -> Result<HttpResponse> {
    let input = validate_post(&form)?;
    let post = PostService::new(state.repo.clone())
        .create(user.id, input)
        .await?;

    Ok(redirect(&post.detail_path()))
}

/// Show the update form prefilled with the current values
pub async fn update_form(
    state: web::Data<AppState>,
    user: AuthUser,
    ctx: RequestContext,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = PostService::new(state.repo.clone())
        .get_owned(*post_id, user.id)
        .await?;

    let form = post_form()
        .with_initial("title", post.title.clone())
        .with_initial("body", post.body.clone());

    Ok(render(
        "home/update",
        &ctx,
        EditPage {
            post: Some(post),
            form,
        },
    ))
}

/// Apply the owner's edits
pub async fn update_post(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
    form: web::Form<PostForm>,
) -> Result<HttpResponse> {
    let posts = PostService::new(state.repo.clone());
    // Non-owners get 403 even with an invalid form.
    posts.get_owned(*post_id, user.id).await?;

    let input = validate_post(&form)?;
    let post = posts.update(*post_id, user.id, input).await?;

    Ok(redirect(&post.detail_path()))
}

/// Delete a post with its comments and likes
pub async fn delete_post(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    PostService::new(state.repo.clone())
        .delete(*post_id, user.id)
        .await?;

    Ok(redirect(HOME_PATH))
}
