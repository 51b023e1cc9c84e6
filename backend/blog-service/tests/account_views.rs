//! Integration Tests: account views
//!
//! Coverage:
//! - Registration form and submission, including field errors
//! - Login with redirect to `next`, failed login, logout
//! - Profile page
//! - Follow / unfollow

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web};
use blog_service::config::SessionConfig;
use blog_service::db::BlogRepository;
use blog_service::security::hash_session_token;
use blog_service::AppState;
use common::{init_app, location, TestContext};
use serde_json::Value;

#[actix_web::test]
async fn register_view_get() {
    let ctx = TestContext::new();
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::get().uri("/accounts/register/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["view"], "account/register");
    assert_eq!(body["form"]["name"], "registration");
}

#[actix_web::test]
async fn register_view_post() {
    let ctx = TestContext::new();
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/accounts/register/")
        .set_form([
            ("username", "beni"),
            ("email", "benitekser@gmail.com"),
            ("password1", "1234abcd"),
            ("password2", "1234abcd"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert_eq!(ctx.repo.count_users().await.unwrap(), 1);
}

#[actix_web::test]
async fn register_rejects_username_differing_only_in_case() {
    let ctx = TestContext::new();
    ctx.seed_user("beni").await;
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/accounts/register/")
        .set_form([
            ("username", "Beni"),
            ("email", "other@gmail.com"),
            ("password1", "1234abcd"),
            ("password2", "1234abcd"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"]["username"].is_array());
    assert_eq!(ctx.repo.count_users().await.unwrap(), 1);
}

#[actix_web::test]
async fn register_empty_form_reports_every_field() {
    let ctx = TestContext::new();
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/accounts/register/")
        .set_form([("username", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let fields = body["fields"].as_object().unwrap();
    assert_eq!(fields.len(), 4);
    assert_eq!(ctx.repo.count_users().await.unwrap(), 0);
}

#[actix_web::test]
async fn register_rejects_taken_username_and_password_mismatch() {
    let ctx = TestContext::new();
    ctx.seed_user("beni").await;
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/accounts/register/")
        .set_form([
            ("username", "beni"),
            ("email", "other@gmail.com"),
            ("password1", "1234abcd"),
            ("password2", "1234abcd"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"]["username"].is_array());

    let req = test::TestRequest::post()
        .uri("/accounts/register/")
        .set_form([
            ("username", "kevin"),
            ("email", "kevin@gmail.com"),
            ("password1", "1234abcd"),
            ("password2", "abcd1234"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"]["password2"].is_array());

    assert_eq!(ctx.repo.count_users().await.unwrap(), 1);
}

#[actix_web::test]
async fn logged_in_user_is_sent_home_from_register_and_login() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("beni").await;
    let cookie = ctx.login_cookie(user.id).await;
    let app = init_app(ctx.state.clone()).await;

    for uri in ["/accounts/register/", "/accounts/login/"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{}", uri);
        assert_eq!(location(&resp), "/");
    }
}

#[actix_web::test]
async fn login_view_get() {
    let ctx = TestContext::new();
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::get().uri("/accounts/login/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["view"], "account/login");
    assert_eq!(body["form"]["name"], "login");
}

#[actix_web::test]
async fn login_view_post() {
    let ctx = TestContext::new();
    ctx.seed_user("beni").await;
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/accounts/login/")
        .set_form([("username", "beni"), ("password", common::PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "sessionid")
        .expect("session cookie set");
    assert!(!cookie.value().is_empty());
}

#[actix_web::test]
async fn login_with_unusable_session_ttl_fails_cleanly() {
    let ctx = TestContext::new();
    ctx.seed_user("beni").await;
    let state = web::Data::new(AppState::new(
        ctx.repo.clone(),
        SessionConfig {
            ttl_hours: i64::MAX / 1000,
            ..SessionConfig::default()
        },
    ));
    let app = init_app(state).await;

    let req = test::TestRequest::post()
        .uri("/accounts/login/")
        .set_form([("username", "beni"), ("password", common::PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.response().cookies().all(|c| c.name() != "sessionid"));
}

#[actix_web::test]
async fn login_follows_local_next_only() {
    let ctx = TestContext::new();
    ctx.seed_user("beni").await;
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/accounts/login/?next=/post/create/")
        .set_form([("username", "beni"), ("password", common::PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/post/create/");

    let req = test::TestRequest::post()
        .uri("/accounts/login/?next=https://evil.example/")
        .set_form([("username", "beni"), ("password", common::PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn login_with_wrong_password_shows_form_again() {
    let ctx = TestContext::new();
    ctx.seed_user("beni").await;
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/accounts/login/")
        .set_form([("username", "beni"), ("password", "wrong")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.response().cookies().next().is_none());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["view"], "account/login");
    assert!(body["error"].is_string());
    assert_eq!(body["form"]["initial"]["username"], "beni");
}

#[actix_web::test]
async fn login_empty_form_reports_two_fields() {
    let ctx = TestContext::new();
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/accounts/login/")
        .set_form([("username", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fields"].as_object().unwrap().len(), 2);
}

#[actix_web::test]
async fn logout_view_get() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("beni").await;
    let cookie = ctx.login_cookie(user.id).await;
    let token_hash = hash_session_token(cookie.value());
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::get()
        .uri("/accounts/logout/")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert!(ctx.repo.find_session(&token_hash).await.unwrap().is_none());
}

#[actix_web::test]
async fn logout_requires_login() {
    let ctx = TestContext::new();
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::get().uri("/accounts/logout/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/accounts/login/?next=%2Faccounts%2Flogout%2F");
}

#[actix_web::test]
async fn profile_view_get() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("beni").await;
    ctx.seed_post(user.id).await;
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::get()
        .uri(&format!("/accounts/profile/{}/", user.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["view"], "account/profile");
    assert_eq!(body["user"]["username"], "beni");
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);
    assert_eq!(body["follower_count"], 0);
}

#[actix_web::test]
async fn profile_of_unknown_user_is_404() {
    let ctx = TestContext::new();
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::get()
        .uri(&format!("/accounts/profile/{}/", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn follow_view_get() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("beni").await;
    let new_user = ctx.seed_user("kevin").await;
    let cookie = ctx.login_cookie(user.id).await;
    let app = init_app(ctx.state.clone()).await;

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri(&format!("/accounts/follow/{}/", new_user.id))
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            location(&resp),
            format!("/accounts/profile/{}/", new_user.id)
        );
    }

    assert!(ctx.repo.relation_exists(user.id, new_user.id).await.unwrap());
    assert_eq!(ctx.repo.relation_total().await, 1);

    let req = test::TestRequest::get()
        .uri(&format!("/accounts/profile/{}/", new_user.id))
        .cookie(cookie)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["is_following"], true);
    assert_eq!(body["follower_count"], 1);
}

#[actix_web::test]
async fn unfollow_view_get() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("beni").await;
    let new_user = ctx.seed_user("kevin").await;
    ctx.repo.insert_relation(user.id, new_user.id).await.unwrap();
    let cookie = ctx.login_cookie(user.id).await;
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::get()
        .uri(&format!("/accounts/unfollow/{}/", new_user.id))
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        location(&resp),
        format!("/accounts/profile/{}/", new_user.id)
    );
    assert!(!ctx.repo.relation_exists(user.id, new_user.id).await.unwrap());
}

#[actix_web::test]
async fn following_yourself_is_rejected() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("beni").await;
    let cookie = ctx.login_cookie(user.id).await;
    let app = init_app(ctx.state.clone()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/accounts/follow/{}/", user.id))
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.repo.relation_total().await, 0);
}
