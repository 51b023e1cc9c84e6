/// URL table for blog-service
use crate::handlers::{accounts, comments, health, posts, votes};
use actix_web::web;

pub const LOGIN_PATH: &str = "/accounts/login/";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health))
        .route("/health/ready", web::get().to(health::readiness))
        .route("/", web::get().to(posts::home))
        .service(
            web::scope("/accounts")
                .service(
                    web::resource("/register/")
                        .route(web::get().to(accounts::register_form))
                        .route(web::post().to(accounts::register)),
                )
                .service(
                    web::resource("/login/")
                        .route(web::get().to(accounts::login_form_page))
                        .route(web::post().to(accounts::login)),
                )
                .route("/logout/", web::get().to(accounts::logout))
                .route("/profile/{user_id}/", web::get().to(accounts::profile))
                .service(
                    web::resource("/follow/{user_id}/")
                        .route(web::get().to(accounts::follow))
                        .route(web::post().to(accounts::follow)),
                )
                .service(
                    web::resource("/unfollow/{user_id}/")
                        .route(web::get().to(accounts::unfollow))
                        .route(web::post().to(accounts::unfollow)),
                ),
        )
        // Fixed post paths must be registered ahead of `/post/{post_id}/{slug}/`.
        .service(
            web::resource("/post/create/")
                .route(web::get().to(posts::create_form))
                .route(web::post().to(posts::create_post)),
        )
        .service(
            web::resource("/post/update/{post_id}/")
                .route(web::get().to(posts::update_form))
                .route(web::post().to(posts::update_post)),
        )
        .route("/post/delete/{post_id}/", web::get().to(posts::delete_post))
        .service(
            web::resource("/post/{post_id}/{slug}/")
                .route(web::get().to(posts::post_detail))
                .route(web::post().to(comments::create_comment)),
        )
        .route(
            "/reply/{post_id}/{comment_id}/",
            web::post().to(comments::create_reply),
        )
        .route("/like/{post_id}/", web::get().to(votes::like_post));
}
