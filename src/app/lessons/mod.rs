//! 示範課程：每個課程建立幾條獨立的串流管線並把結果印到 Console

pub mod higher_order;
pub mod observables;
pub mod operators;
pub mod subjects;

use crate::adapters::SimulatedUserDirectory;
use crate::config::LessonSettings;
use crate::domain::ports::{Console, Lesson, UserDirectory};
use crate::utils::error::{AppError, RxError};

pub use higher_order::HigherOrderLesson;
pub use observables::ObservablesLesson;
pub use operators::OperatorsLesson;
pub use subjects::SubjectsLesson;

/// 依教學順序排列的全部課程，使用設定中的模擬使用者服務
pub fn catalog(settings: &LessonSettings) -> Vec<Box<dyn Lesson>> {
    let users = SimulatedUserDirectory::new(settings.max_fetch_delay(), settings.seed)
        .with_failure_rate(settings.fetch_failure_rate);
    catalog_with(settings, users)
}

/// 同 [`catalog`]，但由呼叫端提供使用者服務
pub fn catalog_with<D: UserDirectory>(settings: &LessonSettings, users: D) -> Vec<Box<dyn Lesson>> {
    vec![
        Box::new(ObservablesLesson::new(settings.late_emission_delay())),
        Box::new(OperatorsLesson),
        Box::new(HigherOrderLesson::new(users, settings)),
        Box::new(SubjectsLesson::new(settings.replay_buffer_size)),
    ]
}

/// 每個小節開頭的標題列
pub(crate) fn section(console: &dyn Console, title: &str) {
    console.line(&format!("--------------- {} -----------------", title));
}

pub(crate) fn lesson_failed(lesson: &str, source: RxError) -> AppError {
    tracing::warn!("⚠️ Lesson '{}' stream failed: {}", lesson, source);
    AppError::LessonFailed {
        lesson: lesson.to_string(),
        source,
    }
}
