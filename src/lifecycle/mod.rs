//! Status transitions for lessons and homework.
//!
//! Each entity gets one pure function mapping `(current status, action)` to
//! the next status. `Ok(None)` means the action is accepted but changes
//! nothing, which keeps repeated requests harmless.

pub mod homework;
pub mod lesson;

pub use homework::{HomeworkAction, HomeworkTransitionError};
pub use lesson::{LessonAction, LessonTransitionError};
