//! Authentication service for user registration, login, and token refresh
//!
//! Refresh tokens are stateless JWTs carrying `token_use = "refresh"`; no
//! server-side token table is kept, so a refresh token stays usable until
//! it expires.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::models::User;
use shared::types::UserRole;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// Input for registering a new operator account
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

/// Input for logging in
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Input for refreshing an access token
#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub token_use: String, // "access" or "refresh"
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Response after successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    #[serde(flatten)]
    pub tokens: AuthTokens,
}

/// User row from database
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
    created_at: chrono::DateTime<Utc>,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Register a new operator account
    pub async fn register(&self, input: RegisterInput) -> AppResult<RegisterResponse> {
        let username = input.username.trim().to_string();
        if !Self::is_valid_username(&username) {
            return Err(AppError::Validation {
                field: "username".to_string(),
                message: "Username must be 3-32 characters (letters, digits, . _ -)".to_string(),
            });
        }
        if input.password.len() < 8 {
            return Err(AppError::Validation {
                field: "password".to_string(),
                message: "Password must be at least 8 characters".to_string(),
            });
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(username) = LOWER($1))",
        )
        .bind(&username)
        .fetch_one(&self.db)
        .await?;

        if exists {
            return Err(AppError::DuplicateEntry("username".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, role, created_at
            "#,
        )
        .bind(&username)
        .bind(&password_hash)
        .bind(input.role.as_str())
        .fetch_one(&self.db)
        .await?;

        let tokens = self.generate_tokens(row.id, input.role)?;

        Ok(RegisterResponse {
            user: User {
                id: row.id,
                username: row.username,
                role: input.role,
                created_at: row.created_at,
            },
            tokens,
        })
    }

    /// Authenticate with username and password
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthTokens> {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE username = $1",
        )
        .bind(input.username.trim())
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(&input.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let role = UserRole::from_str(&user.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown role in users table: {}", user.role)))?;

        self.generate_tokens(user.id, role)
    }

    /// Exchange a refresh token for a fresh token pair
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        let claims = self.decode_claims(refresh_token)?;

        if claims.token_use != "refresh" {
            return Err(AppError::InvalidToken);
        }

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        // The account must still exist; the role is re-read so a role change
        // takes effect on the next refresh.
        let role_str = sqlx::query_scalar::<_, String>("SELECT role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::InvalidToken)?;

        let role = UserRole::from_str(&role_str)
            .ok_or_else(|| AppError::Internal(format!("Unknown role in users table: {}", role_str)))?;

        self.generate_tokens(user_id, role)
    }

    /// Fetch the profile of an authenticated user
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        let role = UserRole::from_str(&row.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown role in users table: {}", row.role)))?;

        Ok(User {
            id: row.id,
            username: row.username,
            role,
            created_at: row.created_at,
        })
    }

    /// Generate an access/refresh token pair
    fn generate_tokens(&self, user_id: Uuid, role: UserRole) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let access_token = self.encode_claims(Claims {
            sub: user_id.to_string(),
            role,
            token_use: "access".to_string(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            iat: now.timestamp(),
        })?;
        let refresh_token = self.encode_claims(Claims {
            sub: user_id.to_string(),
            role,
            token_use: "refresh".to_string(),
            exp: (now + Duration::seconds(self.refresh_token_expiry)).timestamp(),
            iat: now.timestamp(),
        })?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    fn encode_claims(&self, claims: Claims) -> AppResult<String> {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    fn decode_claims(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })?;

        Ok(data.claims)
    }

    /// Validate username format
    fn is_valid_username(username: &str) -> bool {
        username.len() >= 3
            && username.len() <= 32
            && username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService {
            db: PgPool::connect_lazy("postgres://localhost/unused").unwrap(),
            jwt_secret: "test-secret".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        }
    }

    #[test]
    fn test_valid_usernames() {
        assert!(AuthService::is_valid_username("admin"));
        assert!(AuthService::is_valid_username("shift.operator_2"));
        assert!(AuthService::is_valid_username("day-shift"));
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(!AuthService::is_valid_username("ab")); // Too short
        assert!(!AuthService::is_valid_username(&"x".repeat(33))); // Too long
        assert!(!AuthService::is_valid_username("has space"));
        assert!(!AuthService::is_valid_username("semi;colon"));
    }

    #[tokio::test]
    async fn test_token_round_trip_preserves_claims() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let tokens = svc.generate_tokens(user_id, UserRole::StickerOperator).unwrap();

        let access = svc.decode_claims(&tokens.access_token).unwrap();
        assert_eq!(access.sub, user_id.to_string());
        assert_eq!(access.role, UserRole::StickerOperator);
        assert_eq!(access.token_use, "access");

        let refresh = svc.decode_claims(&tokens.refresh_token).unwrap();
        assert_eq!(refresh.token_use, "refresh");
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let svc = service();
        let tokens = svc.generate_tokens(Uuid::new_v4(), UserRole::Admin).unwrap();
        let mut tampered = tokens.access_token.clone();
        tampered.push('x');
        assert!(svc.decode_claims(&tampered).is_err());
    }
}
