use chrono::NaiveDateTime;
use thiserror::Error;

use crate::entities::sea_orm_active_enums::HomeworkStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkAction {
    /// Student starts working on the assignment.
    Start,
    /// Student hands the work in.
    Submit {
        due_date: NaiveDateTime,
        now: NaiveDateTime,
    },
    /// Overdue sweep run while listing late homework.
    MarkLate {
        due_date: NaiveDateTime,
        now: NaiveDateTime,
    },
    /// Teacher grades a submission. No grading workflow exists yet.
    Review,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HomeworkTransitionError {
    #[error("This homework has already been submitted or reviewed")]
    AlreadySubmitted,
    #[error("The submission deadline has passed")]
    PastDue,
    #[error("Reviewing homework is not supported yet")]
    ReviewUnsupported,
}

pub fn next_status(
    current: HomeworkStatus,
    action: HomeworkAction,
) -> Result<Option<HomeworkStatus>, HomeworkTransitionError> {
    match action {
        HomeworkAction::Start => match current {
            HomeworkStatus::Assigned => Ok(Some(HomeworkStatus::InProgress)),
            _ => Ok(None),
        },
        HomeworkAction::Submit { due_date, now } => {
            if matches!(
                current,
                HomeworkStatus::Submitted | HomeworkStatus::Reviewed
            ) {
                return Err(HomeworkTransitionError::AlreadySubmitted);
            }
            if due_date < now {
                return Err(HomeworkTransitionError::PastDue);
            }
            Ok(Some(HomeworkStatus::Submitted))
        }
        HomeworkAction::MarkLate { due_date, now } => {
            if HomeworkStatus::OPEN.contains(&current) && due_date < now {
                Ok(Some(HomeworkStatus::Late))
            } else {
                Ok(None)
            }
        }
        HomeworkAction::Review => Err(HomeworkTransitionError::ReviewUnsupported),
    }
}
