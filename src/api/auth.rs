//! Registration, login, and bearer-token authentication.
//!
//! Passwords are hashed with argon2 (salted, default cost parameters).
//! Bearer tokens are HS256 JWTs carrying `{userId, email}` with a fixed
//! expiry; verification is stateless, so logout is purely client-side and
//! a token stays valid until it expires.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    Json,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{AuthResponse, LoginRequest, RegisterRequest, User, UserResponse, UserRole};
use crate::AppState;

use super::error::ApiError;
use super::validation::{validate_email, validate_password, validate_phone, validate_required};

/// JWT payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub exp: i64,
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Issue a signed bearer token for a user
pub fn issue_token(
    user_id: &str,
    email: &str,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        user_id: user_id.to_string(),
        email: email.to_string(),
        exp: (Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and verify a bearer token, returning its claims
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// The authenticated caller's identity, decoded from the bearer token.
///
/// Rejection happens before any handler logic runs: a missing header is a
/// 401, a bad signature or expired token a 403.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) if header.starts_with("Bearer ") => &header[7..],
            _ => return Err(ApiError::unauthorized("Access token required")),
        };

        let claims = decode_token(token, &state.config.auth.jwt_secret)
            .map_err(|_| ApiError::forbidden("Invalid token"))?;

        Ok(AuthUser {
            user_id: claims.user_id,
            email: claims.email,
        })
    }
}

fn validate_register_request(req: &RegisterRequest) -> Result<UserRole, ApiError> {
    validate_required(&req.name, "Name").map_err(ApiError::validation)?;
    validate_email(&req.email).map_err(ApiError::validation)?;
    validate_password(&req.password).map_err(ApiError::validation)?;
    validate_phone(&req.phone).map_err(ApiError::validation)?;
    validate_required(&req.address, "Address").map_err(ApiError::validation)?;
    req.role.parse::<UserRole>().map_err(ApiError::validation)
}

/// Register a new account
///
/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let role = validate_register_request(&req)?;

    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    if existing.is_some() {
        return Err(ApiError::validation("User already exists"));
    }

    let id = Uuid::new_v4().to_string();
    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal("Failed to hash password")
    })?;
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password_hash, phone, address, role, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(&password_hash)
    .bind(&req.phone)
    .bind(&req.address)
    .bind(role.to_string())
    .bind(&now)
    .execute(&state.db)
    .await?;

    let token = issue_token(
        &id,
        &req.email,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_hours,
    )
    .map_err(|e| {
        tracing::error!("Failed to sign token: {}", e);
        ApiError::internal("Failed to sign token")
    })?;

    tracing::info!(email = %req.email, role = %role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse {
                id,
                name: req.name,
                email: req.email,
                role: role.to_string(),
            },
        }),
    ))
}

/// Log in with email and password
///
/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    // Unknown email and wrong password produce the same error
    let user = user.ok_or_else(|| ApiError::validation("Invalid credentials"))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::validation("Invalid credentials"));
    }

    let token = issue_token(
        &user.id,
        &user.email,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_hours,
    )
    .map_err(|e| {
        tracing::error!("Failed to sign token: {}", e);
        ApiError::internal("Failed to sign token")
    })?;

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}
