use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use super::dto::{
    CheckAuthResponse, LoginRequest, RegisterRequest, TokenResponse, UpdateProfileRequest,
    UserResponse,
};
use crate::config::APP_CONFIG;
use crate::entities::user;
use crate::extractor::{ACCESS_TOKEN_COOKIE, AuthUser};
use crate::routes::MessageResponse;
use crate::services::auth::{self, ProfileInput, RegisterInput};
use crate::static_service::get_database_connection;
use crate::utils::jwt::JwtManager;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/auth/check-auth", get(check_auth))
        .route("/api/v1/auth/profile", post(update_profile))
}

fn issue_token(
    jar: CookieJar,
    user: user::Model,
) -> Result<(CookieJar, TokenResponse), (StatusCode, String)> {
    let jwt = JwtManager::new(&APP_CONFIG.secret_key);
    let access_token = jwt
        .create_jwt(&user.username, APP_CONFIG.token_expire_minutes)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create token: {}", e),
            )
        })?;

    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, access_token.clone()))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: APP_CONFIG.token_expire_minutes * 60,
            user: user.into(),
        },
    ))
}

/// Register a new account and sign it in
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Invalid email, weak password or mismatched confirmation"),
        (status = 409, description = "Email or username already taken"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Authentication"
)]
pub async fn register(
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<TokenResponse>), (StatusCode, String)> {
    let user = auth::register(
        get_database_connection(),
        RegisterInput {
            email: payload.email,
            username: payload.username,
            full_name: payload.full_name,
            password: payload.password,
            password_confirm: payload.password_confirm,
            is_teacher: payload.is_teacher,
        },
    )
    .await?;

    let (jar, response) = issue_token(jar, user)?;
    Ok((StatusCode::CREATED, jar, Json(response)))
}

/// Login with username or email, returns a JWT and sets the session cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account deactivated"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Authentication"
)]
pub async fn login(
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, CookieJar, Json<TokenResponse>), (StatusCode, String)> {
    let user = auth::login(get_database_connection(), &payload.username, &payload.password).await?;

    tracing::info!(user_id = user.id, "User logged in");

    let (jar, response) = issue_token(jar, user)?;
    Ok((StatusCode::OK, jar, Json(response)))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    ),
    tag = "Authentication"
)]
pub async fn logout(jar: CookieJar) -> (StatusCode, CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"));
    (
        StatusCode::OK,
        jar,
        Json(MessageResponse::new("Logged out")),
    )
}

/// Current user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn me(AuthUser(user): AuthUser) -> (StatusCode, Json<UserResponse>) {
    (StatusCode::OK, Json(user.into()))
}

/// Check whether the caller is signed in
#[utoipa::path(
    get,
    path = "/api/v1/auth/check-auth",
    responses(
        (status = 200, description = "Authenticated", body = CheckAuthResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn check_auth(AuthUser(user): AuthUser) -> (StatusCode, Json<CheckAuthResponse>) {
    (
        StatusCode::OK,
        Json(CheckAuthResponse {
            authenticated: true,
            user: user.into(),
        }),
    )
}

/// Update full name and email
#[utoipa::path(
    post,
    path = "/api/v1/auth/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid email"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already in use"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn update_profile(
    AuthUser(user): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<(StatusCode, Json<UserResponse>), (StatusCode, String)> {
    let user = auth::update_profile(
        get_database_connection(),
        user,
        ProfileInput {
            full_name: payload.full_name,
            email: payload.email,
        },
    )
    .await?;

    Ok((StatusCode::OK, Json(user.into())))
}
