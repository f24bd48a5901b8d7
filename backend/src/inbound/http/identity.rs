//! Bearer-token extractor yielding the acting account.
//!
//! Protected handlers take [`BearerIdentity`] as an argument. The token is
//! read from `Authorization: Bearer <token>` and resolved through
//! [`AccountAuth::resolve_token`](crate::domain::ports::AccountAuth).

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use tracing::error;

use super::state::HttpState;
use crate::domain::{AccountId, Error};

const BEARER_PREFIX: &str = "Bearer ";

/// Account identifier resolved from a valid bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BearerIdentity(AccountId);

impl BearerIdentity {
    /// The acting account.
    #[must_use]
    pub fn account_id(&self) -> &AccountId {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("access token required"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("invalid token"))?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| Error::unauthorized("access token required"))
}

impl FromRequest for BearerIdentity {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let Some(state) = state else {
                error!("HttpState missing from app data; bearer tokens cannot be resolved");
                return Err(Error::internal("authentication is not configured"));
            };
            state.auth.resolve_token(&token).await.map(Self)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockAccountAuth, MockAccountDirectory, MockProfessionalDirectory,
    };
    use actix_web::{App, HttpResponse, http::StatusCode, test};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    const TOKEN: &str = "good-token";

    fn state_resolving(account: AccountId) -> HttpState {
        let mut auth = MockAccountAuth::new();
        auth.expect_resolve_token().returning(move |token| {
            if token == TOKEN {
                Ok(account)
            } else {
                Err(Error::unauthorized("invalid token"))
            }
        });
        HttpState::new(
            Arc::new(auth),
            Arc::new(MockAccountDirectory::new()),
            Arc::new(MockProfessionalDirectory::new()),
        )
    }

    async fn whoami(identity: BearerIdentity) -> HttpResponse {
        HttpResponse::Ok().body(identity.account_id().to_string())
    }

    async fn call(header: Option<&str>) -> actix_web::dev::ServiceResponse {
        let account = AccountId::random();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_resolving(account)))
                .route("/me", web::get().to(whoami)),
        )
        .await;
        let mut req = test::TestRequest::get().uri("/me");
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        test::call_service(&app, req.to_request()).await
    }

    #[rstest]
    #[actix_web::test]
    async fn valid_bearer_token_resolves() {
        let res = call(Some("Bearer good-token")).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert!(
            std::str::from_utf8(&body)
                .expect("utf8")
                .parse::<AccountId>()
                .is_ok()
        );
    }

    #[rstest]
    #[case::missing(None)]
    #[case::wrong_scheme(Some("Basic Zm9vOmJhcg=="))]
    #[case::empty(Some("Bearer   "))]
    #[case::unknown(Some("Bearer forged"))]
    #[actix_web::test]
    async fn unusable_tokens_are_unauthorised(#[case] header: Option<&str>) {
        let res = call(header).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.get("error").and_then(Value::as_str),
            Some("unauthorized")
        );
    }
}
