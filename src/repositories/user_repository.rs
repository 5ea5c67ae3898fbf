use crate::entities::user;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, Set,
};

pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

pub struct NewUser {
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub hashed_password: String,
    pub is_teacher: bool,
}

#[derive(Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find_by_id(user_id).one(self.db).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db)
            .await
    }

    /// Login accepts either the username or the email in the same field.
    pub async fn find_by_login(&self, login: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(login))
                    .add(user::Column::Email.eq(login)),
            )
            .one(self.db)
            .await
    }

    pub async fn exists_with_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<bool, DbErr> {
        let count = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(username)),
            )
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn is_email_taken_by_other(&self, email: &str, user_id: i32) -> Result<bool, DbErr> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::Id.ne(user_id))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(&self, new_user: NewUser) -> Result<user::Model, DbErr> {
        Self::create_with(self.db, new_user).await
    }

    pub async fn create_with<C: ConnectionTrait>(
        conn: &C,
        new_user: NewUser,
    ) -> Result<user::Model, DbErr> {
        let user = user::ActiveModel {
            email: Set(new_user.email),
            username: Set(new_user.username),
            full_name: Set(new_user.full_name),
            hashed_password: Set(new_user.hashed_password),
            is_active: Set(true),
            is_verified: Set(false),
            is_teacher: Set(new_user.is_teacher),
            phone_number: Set(None),
            email_notifications: Set(true),
            push_notifications: Set(true),
            created_at: Set(Utc::now().naive_utc()),
            updated_at: Set(None),
            ..Default::default()
        };

        user.insert(conn).await
    }

    pub async fn update(
        &self,
        user: user::Model,
        updates: UserUpdate,
    ) -> Result<user::Model, DbErr> {
        let mut active_model: user::ActiveModel = user.into();

        if let Some(email) = updates.email {
            active_model.email = Set(email);
        }
        if let Some(full_name) = updates.full_name {
            active_model.full_name = Set(Some(full_name));
        }

        active_model.updated_at = Set(Some(Utc::now().naive_utc()));

        active_model.update(self.db).await
    }
}
