use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::entities::user;
use crate::error::{ServiceError, ServiceResult};
use crate::repositories::{NewUser, NotificationSettingsRepository, UserRepository, UserUpdate};
use crate::utils::jwt::JwtManager;
use crate::utils::validators::{validate_email, validate_password};

#[cfg(not(test))]
const HASH_COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const HASH_COST: u32 = 4;

pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub password: String,
    pub password_confirm: String,
    pub is_teacher: bool,
}

pub struct ProfileInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Creates the account and its notification settings in one transaction.
pub async fn register(db: &DatabaseConnection, input: RegisterInput) -> ServiceResult<user::Model> {
    let email = input.email.trim().to_string();
    let username = input.username.trim().to_string();

    validate_email(&email).map_err(ServiceError::Validation)?;
    validate_password(&input.password).map_err(ServiceError::Validation)?;

    if input.password != input.password_confirm {
        return Err(ServiceError::Validation("Passwords do not match".to_string()));
    }
    if username.is_empty() {
        return Err(ServiceError::Validation("Username cannot be empty".to_string()));
    }

    let user_repo = UserRepository::new(db);
    if user_repo
        .exists_with_email_or_username(&email, &username)
        .await?
    {
        return Err(ServiceError::Conflict(
            "A user with this email or username already exists".to_string(),
        ));
    }

    let hashed_password = bcrypt::hash(&input.password, HASH_COST)
        .map_err(|e| ServiceError::Internal(format!("Failed to hash password: {}", e)))?;

    let txn = db.begin().await?;

    let created = async {
        let user = UserRepository::create_with(
            &txn,
            NewUser {
                email,
                username,
                full_name: input.full_name.filter(|name| !name.trim().is_empty()),
                hashed_password,
                is_teacher: input.is_teacher,
            },
        )
        .await?;
        NotificationSettingsRepository::create_default_with(&txn, user.id).await?;
        Ok::<_, ServiceError>(user)
    }
    .await;

    match created {
        Ok(user) => {
            txn.commit().await?;
            tracing::info!(user_id = user.id, username = %user.username, "User registered");
            Ok(user)
        }
        Err(err) => {
            txn.rollback().await?;
            // Lost a race against a concurrent registration
            if err.is_unique_violation() {
                Err(ServiceError::Conflict(
                    "A user with this email or username already exists".to_string(),
                ))
            } else {
                Err(err)
            }
        }
    }
}

/// `login` may be the username or the email.
pub async fn login(
    db: &DatabaseConnection,
    login: &str,
    password: &str,
) -> ServiceResult<user::Model> {
    let invalid = || ServiceError::Unauthorized("Invalid username or password".to_string());

    let user = UserRepository::new(db)
        .find_by_login(login.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = bcrypt::verify(password, &user.hashed_password)
        .map_err(|e| ServiceError::Internal(format!("Password verification error: {}", e)))?;
    if !password_valid {
        return Err(invalid());
    }

    if !user.is_active {
        return Err(ServiceError::Forbidden("Account is deactivated".to_string()));
    }

    Ok(user)
}

/// Resolves a bearer token to an active user.
pub async fn authenticate(
    db: &DatabaseConnection,
    jwt: &JwtManager,
    token: &str,
) -> ServiceResult<user::Model> {
    let unauthorized = || ServiceError::Unauthorized("Could not validate credentials".to_string());

    let claims = jwt.decode_jwt(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected token");
        unauthorized()
    })?;

    let user = UserRepository::new(db)
        .find_by_username(&claims.sub)
        .await?
        .ok_or_else(unauthorized)?;

    if !user.is_active {
        return Err(unauthorized());
    }

    Ok(user)
}

pub async fn update_profile(
    db: &DatabaseConnection,
    user: user::Model,
    input: ProfileInput,
) -> ServiceResult<user::Model> {
    let user_repo = UserRepository::new(db);

    let email = match input.email.map(|e| e.trim().to_string()) {
        Some(email) if email != user.email => {
            validate_email(&email).map_err(ServiceError::Validation)?;
            if user_repo.is_email_taken_by_other(&email, user.id).await? {
                return Err(ServiceError::Conflict("Email is already in use".to_string()));
            }
            Some(email)
        }
        _ => None,
    };

    let updated = user_repo
        .update(
            user,
            UserUpdate {
                email,
                full_name: input.full_name,
            },
        )
        .await
        .map_err(ServiceError::from)?;

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_user, setup_test_db};

    fn input(username: &str, email: &str) -> RegisterInput {
        RegisterInput {
            email: email.to_string(),
            username: username.to_string(),
            full_name: Some("Test User".to_string()),
            password: "secret123".to_string(),
            password_confirm: "secret123".to_string(),
            is_teacher: false,
        }
    }

    #[tokio::test]
    async fn register_creates_user_and_settings() {
        let (db, _dir) = setup_test_db().await;

        let user = register(&db, input("alice", "alice@example.com")).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(user.hashed_password, "secret123");
        assert!(user.is_active);

        let settings = NotificationSettingsRepository::new(&db)
            .find_by_user(user.id)
            .await
            .unwrap();
        assert!(settings.is_some());
    }

    #[tokio::test]
    async fn register_rejects_bad_input() {
        let (db, _dir) = setup_test_db().await;

        let mut bad_email = input("a", "not-an-email");
        assert!(matches!(
            register(&db, bad_email).await,
            Err(ServiceError::Validation(_))
        ));

        bad_email = input("a", "a@example.com");
        bad_email.password_confirm = "different1".to_string();
        assert!(matches!(
            register(&db, bad_email).await,
            Err(ServiceError::Validation(_))
        ));

        let mut weak = input("a", "a@example.com");
        weak.password = "short".to_string();
        weak.password_confirm = "short".to_string();
        assert!(matches!(register(&db, weak).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts() {
        let (db, _dir) = setup_test_db().await;
        register(&db, input("alice", "alice@example.com")).await.unwrap();

        assert!(matches!(
            register(&db, input("alice", "other@example.com")).await,
            Err(ServiceError::Conflict(_))
        ));
        assert!(matches!(
            register(&db, input("bob", "alice@example.com")).await,
            Err(ServiceError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn login_accepts_username_or_email() {
        let (db, _dir) = setup_test_db().await;
        let user = register(&db, input("alice", "alice@example.com")).await.unwrap();

        assert_eq!(login(&db, "alice", "secret123").await.unwrap().id, user.id);
        assert_eq!(
            login(&db, "alice@example.com", "secret123").await.unwrap().id,
            user.id
        );
        assert!(matches!(
            login(&db, "alice", "wrong-pass1").await,
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(matches!(
            login(&db, "nobody", "secret123").await,
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn authenticate_resolves_token_subject() {
        let (db, _dir) = setup_test_db().await;
        let user = create_user(&db, "alice", false).await;
        let jwt = JwtManager::new("test-secret");

        let token = jwt.create_jwt(&user.username, 5).unwrap();
        assert_eq!(authenticate(&db, &jwt, &token).await.unwrap().id, user.id);

        let ghost = jwt.create_jwt("ghost", 5).unwrap();
        assert!(matches!(
            authenticate(&db, &jwt, &ghost).await,
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(matches!(
            authenticate(&db, &jwt, "garbage").await,
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn profile_email_must_be_valid_and_free() {
        let (db, _dir) = setup_test_db().await;
        let alice = create_user(&db, "alice", false).await;
        create_user(&db, "bob", false).await;

        let taken = update_profile(
            &db,
            alice.clone(),
            ProfileInput {
                full_name: None,
                email: Some("bob@example.com".to_string()),
            },
        )
        .await;
        assert!(matches!(taken, Err(ServiceError::Conflict(_))));

        let updated = update_profile(
            &db,
            alice,
            ProfileInput {
                full_name: Some("Alice A.".to_string()),
                email: Some("new@example.com".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.full_name.as_deref(), Some("Alice A."));
        assert!(updated.updated_at.is_some());
    }
}
