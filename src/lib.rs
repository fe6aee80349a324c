pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::{catalog, catalog_with, write_report, LessonRunner};
pub use config::LessonSettings;
pub use utils::error::{AppError, Result, RxError, StreamError};
