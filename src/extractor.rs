use axum::extract::FromRequestParts;
use axum_extra::TypedHeader;
use axum_extra::extract::CookieJar;
use axum_extra::headers::{Authorization, authorization::Bearer};
use http::{StatusCode, request::Parts};

use crate::config::APP_CONFIG;
use crate::entities::user;
use crate::services::auth;
use crate::static_service::get_database_connection;
use crate::utils::jwt::JwtManager;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// The user behind the request's token. Taken from the `Authorization: Bearer`
/// header, falling back to the `access_token` cookie set at login.
pub struct AuthUser(pub user::Model);

fn token_from_cookie(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    let value = jar.get(ACCESS_TOKEN_COOKIE)?.value();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then(|| token.to_string())
}

async fn request_token<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
    let header = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await;
    match header {
        Ok(TypedHeader(Authorization(bearer))) => Some(bearer.token().to_string()),
        Err(_) => token_from_cookie(parts),
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = request_token(parts, state)
            .await
            .ok_or_else(|| (StatusCode::UNAUTHORIZED, "Missing bearer token".to_string()))?;

        let jwt = JwtManager::new(&APP_CONFIG.secret_key);
        let user = auth::authenticate(get_database_connection(), &jwt, &token).await?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Request, header};

    fn parts(name: header::HeaderName, value: &str) -> Parts {
        Request::builder()
            .header(name, value)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn bearer_header_wins_over_cookie() {
        let mut parts = parts(header::AUTHORIZATION, "Bearer from-header");
        parts.headers.insert(header::COOKIE, "access_token=from-cookie".parse().unwrap());

        assert_eq!(request_token(&mut parts, &()).await.as_deref(), Some("from-header"));
    }

    #[tokio::test]
    async fn cookie_token_is_used_without_a_header() {
        let mut bare = parts(header::COOKIE, "theme=dark; access_token=abc");
        let mut empty = parts(header::COOKIE, "access_token=");
        let mut other = parts(header::COOKIE, "theme=dark");

        assert_eq!(request_token(&mut bare, &()).await.as_deref(), Some("abc"));
        assert_eq!(request_token(&mut empty, &()).await, None);
        assert_eq!(request_token(&mut other, &()).await, None);
    }
}
