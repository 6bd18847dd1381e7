use db::models::user::{CreateUser, UpdateUser, User, UserRole};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use ts_rs::TS;

use super::{
    auth::PasswordHasher,
    crud::{CrudError, deleted, found},
    validation::{Mode, Validator, take},
};

pub const NOT_FOUND: &str = "User not found";

#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct UserPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// `user` or `admin`
    pub role: Option<String>,
}

/// Validated account fields, password still in plain text.
#[derive(Debug, Default)]
pub(crate) struct Account {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

pub(crate) fn check(v: &mut Validator, payload: UserPayload) -> Account {
    Account {
        name: v.text("name", payload.name).required().max_len(255).value(),
        email: v
            .text("email", payload.email)
            .required()
            .email()
            .max_len(255)
            .value(),
        password: v
            .field("password", payload.password)
            .required()
            .min_len(6)
            .value(),
        role: v
            .text("role", payload.role)
            .map(|role| {
                role.parse::<UserRole>()
                    .map_err(|_| "The selected role is invalid.".to_string())
            })
            .value(),
    }
}

pub(crate) async fn check_unique(
    pool: &SqlitePool,
    v: &mut Validator,
    email: Option<&str>,
    except: Option<i64>,
) -> Result<(), sqlx::Error> {
    if let Some(email) = email {
        v.unique("email", User::email_taken(pool, email, except).await?);
    }
    Ok(())
}

/// Hash the password and insert a validated account.
pub(crate) async fn store(
    pool: &SqlitePool,
    hasher: &PasswordHasher,
    account: Account,
) -> Result<User, CrudError> {
    let password = take(account.password, "password")?;
    let data = CreateUser {
        name: take(account.name, "name")?,
        email: take(account.email, "email")?,
        password_hash: hasher.hash(password).await?,
        role: account.role.unwrap_or_default(),
    };
    User::create(pool, &data)
        .await
        .map_err(|e| CrudError::from_write(e, NOT_FOUND, "email"))
}

pub struct UserService;

impl UserService {
    pub async fn list(pool: &SqlitePool) -> Result<Vec<User>, CrudError> {
        Ok(User::find_all(pool).await?)
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<User, CrudError> {
        found(User::find_by_id(pool, id).await?, NOT_FOUND)
    }

    pub async fn create(
        pool: &SqlitePool,
        hasher: &PasswordHasher,
        payload: UserPayload,
    ) -> Result<User, CrudError> {
        let mut v = Validator::new(Mode::Create);
        let account = check(&mut v, payload);
        check_unique(pool, &mut v, account.email.as_deref(), None).await?;
        v.finish()?;

        let user = store(pool, hasher, account).await?;
        info!(user_id = user.id, role = %user.role, "Created user");
        Ok(user)
    }

    pub async fn update(
        pool: &SqlitePool,
        hasher: &PasswordHasher,
        id: i64,
        payload: UserPayload,
    ) -> Result<User, CrudError> {
        Self::find(pool, id).await?;

        let mut v = Validator::new(Mode::Update);
        let account = check(&mut v, payload);
        check_unique(pool, &mut v, account.email.as_deref(), Some(id)).await?;
        v.finish()?;

        let password_hash = match account.password {
            Some(password) => Some(hasher.hash(password).await?),
            None => None,
        };
        let changes = UpdateUser {
            name: account.name,
            email: account.email,
            password_hash,
            role: account.role,
        };
        let user = User::update(pool, id, &changes)
            .await
            .map_err(|e| CrudError::from_write(e, NOT_FOUND, "email"))?;

        info!(user_id = id, "Updated user");
        Ok(user)
    }

    /// Farmers owned by the user stay, with their owner cleared.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), CrudError> {
        deleted(User::delete(pool, id).await?, NOT_FOUND)?;
        info!(user_id = id, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use db::DBService;

    use super::*;

    fn payload(email: &str) -> UserPayload {
        UserPayload {
            name: Some("Juma Mwangi".to_string()),
            email: Some(email.to_string()),
            password: Some("secret123".to_string()),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_role_and_hashes_password() {
        let db = DBService::new_in_memory().await.unwrap();
        let hasher = PasswordHasher::new(4);

        let user = UserService::create(&db.pool, &hasher, payload("juma@example.com"))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::User);
        assert!(bcrypt::verify("secret123", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_invalid_role_and_short_password() {
        let db = DBService::new_in_memory().await.unwrap();
        let hasher = PasswordHasher::new(4);

        let mut bad = payload("juma@example.com");
        bad.role = Some("superuser".to_string());
        bad.password = Some("abc".to_string());
        let err = UserService::create(&db.pool, &hasher, bad).await.unwrap_err();
        let CrudError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["password", "role"]);
    }

    #[tokio::test]
    async fn test_update_rehashes_only_when_password_supplied() {
        let db = DBService::new_in_memory().await.unwrap();
        let hasher = PasswordHasher::new(4);
        let user = UserService::create(&db.pool, &hasher, payload("juma@example.com"))
            .await
            .unwrap();

        let renamed = UserService::update(
            &db.pool,
            &hasher,
            user.id,
            UserPayload {
                name: Some("Juma M.".to_string()),
                role: Some("admin".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "Juma M.");
        assert_eq!(renamed.role, UserRole::Admin);
        assert_eq!(renamed.password_hash, user.password_hash);

        let rekeyed = UserService::update(
            &db.pool,
            &hasher,
            user.id,
            UserPayload {
                password: Some("another-secret".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(bcrypt::verify("another-secret", &rekeyed.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_email_unique_ignores_self_on_update() {
        let db = DBService::new_in_memory().await.unwrap();
        let hasher = PasswordHasher::new(4);
        let juma = UserService::create(&db.pool, &hasher, payload("juma@example.com"))
            .await
            .unwrap();
        UserService::create(&db.pool, &hasher, payload("wanjiru@example.com"))
            .await
            .unwrap();

        let same = UserPayload {
            email: Some("juma@example.com".to_string()),
            ..Default::default()
        };
        UserService::update(&db.pool, &hasher, juma.id, same)
            .await
            .unwrap();

        let taken = UserPayload {
            email: Some("wanjiru@example.com".to_string()),
            ..Default::default()
        };
        let err = UserService::update(&db.pool, &hasher, juma.id, taken)
            .await
            .unwrap_err();
        assert!(matches!(err, CrudError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let db = DBService::new_in_memory().await.unwrap();
        let hasher = PasswordHasher::new(4);

        assert!(matches!(
            UserService::find(&db.pool, 42).await,
            Err(CrudError::NotFound(NOT_FOUND))
        ));
        assert!(matches!(
            UserService::update(&db.pool, &hasher, 42, UserPayload::default()).await,
            Err(CrudError::NotFound(NOT_FOUND))
        ));
        assert!(matches!(
            UserService::delete(&db.pool, 42).await,
            Err(CrudError::NotFound(NOT_FOUND))
        ));
    }
}
