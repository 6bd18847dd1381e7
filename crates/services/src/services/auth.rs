//! Bearer-token authentication and the register/login flow.

use async_trait::async_trait;
use db::models::user::{User, UserRole};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};
use ts_rs::TS;
use utils::jwt::{JwtError, JwtKeys, bearer_token};

use super::{
    crud::CrudError,
    user::{self, UserPayload},
    validation::{Mode, ValidationErrors, Validator},
};

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// bcrypt on the blocking pool. Cost is configurable so tests stay fast.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: String) -> Result<String, PasswordError> {
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hashed)
    }

    pub async fn verify(&self, password: String, hash: String) -> Result<bool, PasswordError> {
        let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
        Ok(ok)
    }
}

/// The caller behind a verified bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for UserIdentity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unauthenticated.")]
    Unauthenticated,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Token(#[from] JwtError),
    #[error(transparent)]
    Crud(#[from] CrudError),
}

/// Resolves the `Authorization` header of a request to a user.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, authorization: Option<&str>) -> Result<UserIdentity, AuthError>;
}

/// Verifies an HS256 token and checks that its user still exists.
pub struct JwtAuthenticator {
    pool: SqlitePool,
    keys: JwtKeys,
}

impl JwtAuthenticator {
    pub fn new(pool: SqlitePool, keys: JwtKeys) -> Self {
        Self { pool, keys }
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn authenticate(&self, authorization: Option<&str>) -> Result<UserIdentity, AuthError> {
        let token = authorization
            .and_then(bearer_token)
            .ok_or(AuthError::Unauthenticated)?;

        let user_id = match self.keys.verify(token).and_then(|claims| claims.user_id()) {
            Ok(user_id) => user_id,
            Err(e) => {
                debug!(error = %e, "Rejected bearer token");
                return Err(AuthError::Unauthenticated);
            }
        };

        let user = User::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;
        Ok(UserIdentity::from(&user))
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct RegisterPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct RegisterResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    pool: SqlitePool,
    keys: JwtKeys,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(pool: SqlitePool, keys: JwtKeys, hasher: PasswordHasher) -> Self {
        Self { pool, keys, hasher }
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<RegisterResponse, AuthError> {
        let mut v = Validator::new(Mode::Create);
        let account = user::check(
            &mut v,
            UserPayload {
                name: payload.name,
                email: payload.email,
                password: payload.password,
                role: None,
            },
        );
        let mismatch = match (&account.password, &payload.password_confirmation) {
            (Some(password), Some(confirmation)) => password != confirmation,
            _ => false,
        };
        if mismatch {
            v.error("password", "The password field confirmation does not match.");
        }
        user::check_unique(&self.pool, &mut v, account.email.as_deref(), None).await?;
        v.finish()?;

        let user = user::store(&self.pool, &self.hasher, account).await?;
        let token = self.keys.issue(user.id)?;

        info!(user_id = user.id, "Registered user");
        Ok(RegisterResponse { user, token })
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<TokenResponse, AuthError> {
        let mut v = Validator::new(Mode::Create);
        let email = v.text("email", payload.email).required().email().value();
        let password = v.field("password", payload.password).required().value();
        v.finish()?;

        let (Some(email), Some(password)) = (email, password) else {
            return Err(AuthError::InvalidCredentials);
        };

        let Some(user) = User::find_by_email(&self.pool, &email).await? else {
            debug!("Login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };
        if !self
            .hasher
            .verify(password, user.password_hash.clone())
            .await?
        {
            debug!(user_id = user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.keys.issue(user.id)?;
        info!(user_id = user.id, "User logged in");
        Ok(TokenResponse { token })
    }

    pub async fn me(&self, identity: &UserIdentity) -> Result<UserResponse, AuthError> {
        let user = User::find_by_id(&self.pool, identity.user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;
        Ok(UserResponse { user })
    }
}
