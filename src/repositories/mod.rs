pub mod homework_repository;
pub mod lesson_repository;
pub mod notification_repository;
pub mod notification_settings_repository;
pub mod user_repository;

pub use homework_repository::{HomeworkRepository, NewHomework, Submission};
pub use lesson_repository::{LessonRepository, NewLesson, NewRecurringLesson};
pub use notification_repository::{NotificationRepository, NotificationRow};
pub use notification_settings_repository::{NotificationSettingsRepository, SettingsUpdate};
pub use user_repository::{NewUser, UserRepository, UserUpdate};
