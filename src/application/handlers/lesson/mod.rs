//! Lesson command and query handlers.

mod create_lesson;
mod get_lesson;
mod get_lesson_pricing;
mod list_enrollments;
mod set_lesson_status;
mod update_lesson;

pub use create_lesson::{CreateLessonCommand, CreateLessonHandler, CreateLessonResult};
pub use get_lesson::{GetLessonHandler, GetLessonQuery, LessonView};
pub use get_lesson_pricing::{GetLessonPricingHandler, GetLessonPricingQuery};
pub use list_enrollments::{ListEnrollmentsHandler, ListEnrollmentsQuery};
pub use set_lesson_status::{SetLessonStatusCommand, SetLessonStatusHandler, SetLessonStatusResult};
pub use update_lesson::{UpdateLessonCommand, UpdateLessonHandler, UpdateLessonResult};
