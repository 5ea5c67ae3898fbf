//! OpenAPI document served by Swagger UI when `--swagger-enabled` is set.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::routes::{
    assistant, auth, dashboard, health, homework, knowledge, notifications, schedule,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());
        components.add_security_scheme("bearer_auth", SecurityScheme::Http(bearer));
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tutor platform API",
        description = "Lessons, homework, notifications, knowledge base and study assistant."
    ),
    paths(
        health::route::health,
        auth::route::register,
        auth::route::login,
        auth::route::logout,
        auth::route::me,
        auth::route::check_auth,
        auth::route::update_profile,
        dashboard::route::get_dashboard,
        schedule::route::day_schedule,
        schedule::route::manage_schedule,
        schedule::route::create_lesson,
        schedule::route::upcoming_lessons,
        schedule::route::get_lesson,
        schedule::route::start_lesson,
        schedule::route::complete_lesson,
        schedule::route::cancel_lesson,
        schedule::route::create_recurring,
        schedule::route::toggle_recurring,
        homework::route::list_homework,
        homework::route::create_homework,
        homework::route::upcoming_homework,
        homework::route::late_homework,
        homework::route::get_homework,
        homework::route::start_homework,
        homework::route::submit_homework,
        homework::route::upload_attachment,
        homework::route::download_attachment,
        homework::route::download_submission,
        homework::route::review_homework,
        notifications::route::list_notifications,
        notifications::route::unread_count,
        notifications::route::mark_read,
        notifications::route::mark_all_read,
        notifications::route::archive,
        notifications::route::delete_notification,
        notifications::route::get_settings,
        notifications::route::update_settings,
        knowledge::route::list_subjects,
        knowledge::route::search,
        knowledge::route::subject_articles,
        knowledge::route::subject_topics,
        knowledge::route::get_article,
        assistant::route::chat,
        assistant::route::chat_history,
        assistant::route::clear_history,
        assistant::route::subject_help,
        assistant::route::explain,
    ),
    components(schemas(
        crate::routes::MessageResponse,
        auth::dto::UserResponse,
        auth::dto::TokenResponse,
        schedule::dto::LessonResponse,
        homework::dto::HomeworkResponse,
        notifications::dto::NotificationResponse,
        notifications::dto::NotificationSettingsResponse,
    )),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Registration, login and profile"),
        (name = "Dashboard", description = "Overview for the signed-in user"),
        (name = "Schedule", description = "Lessons and weekly slots"),
        (name = "Homework", description = "Assignment, submission and late tracking"),
        (name = "Notifications", description = "In-app notifications and channel settings"),
        (name = "Knowledge base", description = "Read-only study articles"),
        (name = "Assistant", description = "Scripted study chatbot")
    )
)]
pub struct ApiDoc;
