pub mod lessons;
pub mod runner;
pub mod rx;

pub use lessons::{catalog, catalog_with};
pub use runner::{write_report, LessonRunner};
