use thiserror::Error;

use crate::entities::sea_orm_active_enums::LessonStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonAction {
    Start,
    Complete,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LessonTransitionError {
    #[error("Lesson has already been completed")]
    AlreadyCompleted,
    #[error("Lesson has already been cancelled")]
    AlreadyCancelled,
}

/// Lessons move forward only: `planned -> in_progress -> completed`, with
/// `cancelled` reachable from either non-terminal state. Repeating the action
/// that produced the current state is a no-op; crossing from one terminal
/// state into the other is rejected.
pub fn next_status(
    current: LessonStatus,
    action: LessonAction,
) -> Result<Option<LessonStatus>, LessonTransitionError> {
    use LessonStatus::*;

    match (current, action) {
        (Planned, LessonAction::Start) => Ok(Some(InProgress)),
        (InProgress, LessonAction::Start) => Ok(None),

        (Planned | InProgress, LessonAction::Complete) => Ok(Some(Completed)),
        (Completed, LessonAction::Complete) => Ok(None),

        (Planned | InProgress, LessonAction::Cancel) => Ok(Some(Cancelled)),
        (Cancelled, LessonAction::Cancel) => Ok(None),

        (Completed, _) => Err(LessonTransitionError::AlreadyCompleted),
        (Cancelled, _) => Err(LessonTransitionError::AlreadyCancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planned_lesson_can_start_complete_or_cancel() {
        assert_eq!(
            next_status(LessonStatus::Planned, LessonAction::Start),
            Ok(Some(LessonStatus::InProgress))
        );
        assert_eq!(
            next_status(LessonStatus::Planned, LessonAction::Complete),
            Ok(Some(LessonStatus::Completed))
        );
        assert_eq!(
            next_status(LessonStatus::Planned, LessonAction::Cancel),
            Ok(Some(LessonStatus::Cancelled))
        );
    }

    #[test]
    fn in_progress_lesson_moves_to_terminal_states() {
        assert_eq!(
            next_status(LessonStatus::InProgress, LessonAction::Complete),
            Ok(Some(LessonStatus::Completed))
        );
        assert_eq!(
            next_status(LessonStatus::InProgress, LessonAction::Cancel),
            Ok(Some(LessonStatus::Cancelled))
        );
        assert_eq!(
            next_status(LessonStatus::InProgress, LessonAction::Start),
            Ok(None)
        );
    }

    #[test]
    fn repeating_terminal_action_is_noop() {
        assert_eq!(
            next_status(LessonStatus::Completed, LessonAction::Complete),
            Ok(None)
        );
        assert_eq!(
            next_status(LessonStatus::Cancelled, LessonAction::Cancel),
            Ok(None)
        );
    }

    #[test]
    fn terminal_states_do_not_cross() {
        assert_eq!(
            next_status(LessonStatus::Completed, LessonAction::Cancel),
            Err(LessonTransitionError::AlreadyCompleted)
        );
        assert_eq!(
            next_status(LessonStatus::Cancelled, LessonAction::Complete),
            Err(LessonTransitionError::AlreadyCancelled)
        );
        assert_eq!(
            next_status(LessonStatus::Completed, LessonAction::Start),
            Err(LessonTransitionError::AlreadyCompleted)
        );
        assert_eq!(
            next_status(LessonStatus::Cancelled, LessonAction::Start),
            Err(LessonTransitionError::AlreadyCancelled)
        );
    }

    #[test]
    fn nothing_returns_to_planned() {
        for status in [
            LessonStatus::Planned,
            LessonStatus::InProgress,
            LessonStatus::Completed,
            LessonStatus::Cancelled,
        ] {
            for action in [LessonAction::Start, LessonAction::Complete, LessonAction::Cancel] {
                if let Ok(Some(next)) = next_status(status, action) {
                    assert_ne!(next, LessonStatus::Planned);
                }
            }
        }
    }
}
