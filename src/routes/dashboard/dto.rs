use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::homework::dto::HomeworkResponse;
use crate::routes::schedule::dto::LessonResponse;
use crate::services::dashboard::Dashboard;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub upcoming_lessons: Vec<LessonResponse>,
    pub recent_homework: Vec<HomeworkResponse>,
    pub unread_notifications: u64,
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            upcoming_lessons: dashboard.upcoming_lessons.into_iter().map(Into::into).collect(),
            recent_homework: dashboard.recent_homework.into_iter().map(Into::into).collect(),
            unread_notifications: dashboard.unread_notifications,
        }
    }
}
