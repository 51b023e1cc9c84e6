/// Account handlers - registration, login, logout, profiles and follows
use super::{profile_path, redirect, render, HOME_PATH};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::middleware::{AuthUser, RequestContext};
use crate::services::{AccountService, FollowService};
use crate::validators::{
    login_form, registration_form, validate_login, validate_registration, FormView, LoginForm,
    RegistrationForm,
};
use crate::AppState;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

const LOGIN_FAILED: &str = "Username or password is incorrect.";

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Serialize)]
struct FormPage {
    form: FormView,
}

#[derive(Serialize)]
struct LoginPage {
    form: FormView,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

/// Show the registration form
pub async fn register_form(ctx: RequestContext) -> HttpResponse {
    if ctx.is_authenticated() {
        return redirect(HOME_PATH);
    }
    render(
        "account/register",
        &ctx,
        FormPage {
            form: registration_form(),
        },
    )
}

/// Create an account
pub async fn register(
    state: web::Data<AppState>,
    ctx: RequestContext,
    form: web::Form<RegistrationForm>,
) -> Result<HttpResponse> {
    if ctx.is_authenticated() {
        return Ok(redirect(HOME_PATH));
    }

    let registration = validate_registration(&form)?;
    AccountService::new(state.repo.clone())
        .register(registration)
        .await?;

    Ok(redirect(HOME_PATH))
}

/// Show the login form
pub async fn login_form_page(ctx: RequestContext, query: web::Query<NextQuery>) -> HttpResponse {
    if ctx.is_authenticated() {
        return redirect(HOME_PATH);
    }
    render(
        "account/login",
        &ctx,
        LoginPage {
            form: login_form(),
            next: query.into_inner().next,
            error: None,
        },
    )
}

/// Check credentials and open a session
pub async fn login(
    state: web::Data<AppState>,
    ctx: RequestContext,
    query: web::Query<NextQuery>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse> {
    if ctx.is_authenticated() {
        return Ok(redirect(HOME_PATH));
    }

    let credentials = validate_login(&form)?;
    let accounts = AccountService::new(state.repo.clone());

    let Some(user) = accounts.authenticate(&credentials).await? else {
        return Ok(render(
            "account/login",
            &ctx,
            LoginPage {
                form: login_form().with_initial("username", credentials.username),
                next: query.into_inner().next,
                error: Some(LOGIN_FAILED),
            },
        ));
    };

    let token = accounts
        .start_session(user.id, state.session.ttl_hours)
        .await?;
    info!(user_id = %user.id, "user logged in");

    let target = query
        .next
        .as_deref()
        .filter(|next| is_local_path(next))
        .unwrap_or(HOME_PATH);

    Ok(HttpResponse::Found()
        .insert_header((actix_web::http::header::LOCATION, target))
        .cookie(session_cookie(&state.session, token))
        .finish())
}

/// Drop the session and clear the cookie
pub async fn logout(
    state: web::Data<AppState>,
    user: AuthUser,
    ctx: RequestContext,
) -> Result<HttpResponse> {
    if let Some(token_hash) = ctx.token_hash.as_deref() {
        AccountService::new(state.repo.clone())
            .end_session(token_hash)
            .await?;
    }
    info!(user_id = %user.id, "user logged out");

    let mut removal = Cookie::build(state.session.cookie_name.clone(), "")
        .path("/")
        .finish();
    removal.make_removal();

    Ok(HttpResponse::Found()
        .insert_header((actix_web::http::header::LOCATION, HOME_PATH))
        .cookie(removal)
        .finish())
}

/// Public profile page
pub async fn profile(
    state: web::Data<AppState>,
    ctx: RequestContext,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let profile = AccountService::new(state.repo.clone())
        .profile(*user_id, ctx.user_id())
        .await?;

    Ok(render("account/profile", &ctx, profile))
}

/// Follow a user
pub async fn follow(
    state: web::Data<AppState>,
    user: AuthUser,
    target: web::Path<Uuid>,
) -> Result<HttpResponse> {
    FollowService::new(state.repo.clone())
        .follow(user.id, *target)
        .await?;

    Ok(redirect(&profile_path(*target)))
}

/// Unfollow a user
pub async fn unfollow(
    state: web::Data<AppState>,
    user: AuthUser,
    target: web::Path<Uuid>,
) -> Result<HttpResponse> {
    FollowService::new(state.repo.clone())
        .unfollow(user.id, *target)
        .await?;

    Ok(redirect(&profile_path(*target)))
}

fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone(), token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .max_age(CookieDuration::hours(config.ttl_hours))
        .finish()
}

/// Only same-site absolute paths are followed after login.
fn is_local_path(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
}
