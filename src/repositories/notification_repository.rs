use crate::entities::{
    notification,
    sea_orm_active_enums::{NotificationStatus, NotificationType},
};
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, sea_query::Expr,
};

pub struct NotificationRepository<'a> {
    db: &'a DatabaseConnection,
}

pub struct NotificationRow {
    pub user_id: i32,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub related_entity_type: Option<String>,
    pub related_entity_id: Option<i32>,
    pub priority: i16,
    pub is_actionable: bool,
    pub action_url: Option<String>,
    pub expires_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl<'a> NotificationRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts an unread notification.
    pub async fn insert(&self, row: NotificationRow) -> Result<notification::Model, DbErr> {
        let notification = notification::ActiveModel {
            user_id: Set(row.user_id),
            title: Set(row.title),
            message: Set(row.message),
            notification_type: Set(row.notification_type),
            status: Set(NotificationStatus::Unread),
            related_entity_type: Set(row.related_entity_type),
            related_entity_id: Set(row.related_entity_id),
            priority: Set(row.priority),
            is_actionable: Set(row.is_actionable),
            action_url: Set(row.action_url),
            created_at: Set(row.created_at),
            read_at: Set(None),
            expires_at: Set(row.expires_at),
            ..Default::default()
        };

        notification.insert(self.db).await
    }

    pub async fn find_for_user(
        &self,
        notification_id: i32,
        user_id: i32,
    ) -> Result<Option<notification::Model>, DbErr> {
        notification::Entity::find_by_id(notification_id)
            .filter(notification::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    /// Newest first, plus the total matching count.
    pub async fn list_for_user(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
        unread_only: bool,
    ) -> Result<(Vec<notification::Model>, u64), DbErr> {
        let mut query =
            notification::Entity::find().filter(notification::Column::UserId.eq(user_id));

        if unread_only {
            query = query.filter(notification::Column::Status.eq(NotificationStatus::Unread));
        }

        let total = query.clone().count(self.db).await?;
        let notifications = query
            .order_by_desc(notification::Column::CreatedAt)
            .order_by_desc(notification::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok((notifications, total))
    }

    pub async fn count_unread(&self, user_id: i32) -> Result<u64, DbErr> {
        notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::Status.eq(NotificationStatus::Unread))
            .count(self.db)
            .await
    }

    pub async fn mark_read(
        &self,
        notification: notification::Model,
        read_at: NaiveDateTime,
    ) -> Result<notification::Model, DbErr> {
        let mut active_model: notification::ActiveModel = notification.into();
        active_model.status = Set(NotificationStatus::Read);
        active_model.read_at = Set(Some(read_at));
        active_model.update(self.db).await
    }

    pub async fn mark_all_read(&self, user_id: i32, read_at: NaiveDateTime) -> Result<u64, DbErr> {
        let result = notification::Entity::update_many()
            .col_expr(
                notification::Column::Status,
                Expr::value(NotificationStatus::Read),
            )
            .col_expr(notification::Column::ReadAt, Expr::value(read_at))
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::Status.eq(NotificationStatus::Unread))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn archive(
        &self,
        notification: notification::Model,
    ) -> Result<notification::Model, DbErr> {
        let mut active_model: notification::ActiveModel = notification.into();
        active_model.status = Set(NotificationStatus::Archived);
        active_model.update(self.db).await
    }

    pub async fn delete(&self, notification: notification::Model) -> Result<u64, DbErr> {
        let result = notification::Entity::delete_by_id(notification.id)
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
