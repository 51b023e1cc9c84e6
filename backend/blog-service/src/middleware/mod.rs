/// HTTP middleware for blog-service
///
/// `SessionMiddleware` resolves the session cookie once per request and stores
/// a `RequestContext` in the request extensions. Handlers take it back out
/// through the `RequestContext` and `AuthUser` extractors.
pub mod permissions;

pub use permissions::*;

use crate::error::AppError;
use crate::security::hash_session_token;
use crate::services::AccountService;
use crate::AppState;
use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use serde::Serialize;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

// =====================================================================
// Request context
// =====================================================================

/// The logged-in user as handlers see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

/// Per-request authentication state. Anonymous unless the session cookie
/// resolved to a live session.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<AuthUser>,
    /// Digest of the presented token, kept so logout can drop the session
    pub token_hash: Option<String>,
}

impl RequestContext {
    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

// =====================================================================
// Session resolution
// =====================================================================

/// Actix middleware that turns the session cookie into a `RequestContext`.
pub struct SessionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = state
            .as_ref()
            .and_then(|s| req.cookie(&s.session.cookie_name))
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty());

        Box::pin(async move {
            let context = match (state, token) {
                (Some(state), Some(token)) => resolve_context(&state, &token).await,
                _ => RequestContext::default(),
            };
            req.extensions_mut().insert(context);

            service.call(req).await
        })
    }
}

async fn resolve_context(state: &AppState, token: &str) -> RequestContext {
    let accounts = AccountService::new(state.repo.clone());
    match accounts.resolve_session(token).await {
        Ok(Some(user)) => RequestContext {
            user: Some(AuthUser {
                id: user.id,
                username: user.username,
            }),
            token_hash: Some(hash_session_token(token)),
        },
        Ok(None) => RequestContext::default(),
        Err(err) => {
            tracing::warn!(error = %err, "session lookup failed, continuing anonymously");
            RequestContext::default()
        }
    }
}

// =====================================================================
// Extractors
// =====================================================================

impl FromRequest for RequestContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(req
            .extensions()
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default()))
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req
            .extensions()
            .get::<RequestContext>()
            .and_then(|ctx| ctx.user.clone());

        ready(user.ok_or_else(|| AppError::LoginRequired {
            next: req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| req.path().to_string()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn anonymous_request_has_empty_context() {
        let req = TestRequest::default().to_http_request();
        let ctx = RequestContext::extract(&req).await.unwrap();
        assert!(!ctx.is_authenticated());
        assert!(ctx.user_id().is_none());
    }

    #[actix_web::test]
    async fn auth_user_requires_login_with_next() {
        let req = TestRequest::get().uri("/post/create/?x=1").to_http_request();
        let err = AuthUser::extract(&req).await.unwrap_err();
        match err {
            AppError::LoginRequired { next } => assert_eq!(next, "/post/create/?x=1"),
            other => panic!("expected login redirect, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn auth_user_comes_from_context() {
        let req = TestRequest::default().to_http_request();
        let user = AuthUser {
            id: Uuid::new_v4(),
            username: "beni".into(),
        };
        req.extensions_mut().insert(RequestContext {
            user: Some(user.clone()),
            token_hash: None,
        });

        assert_eq!(AuthUser::extract(&req).await.unwrap(), user);
    }
}
