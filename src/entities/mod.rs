pub mod homework;
pub mod lesson;
pub mod notification;
pub mod notification_settings;
pub mod recurring_lesson;
pub mod sea_orm_active_enums;
pub mod user;
