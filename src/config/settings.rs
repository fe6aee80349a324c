use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 課程執行時使用的設定 (預設值 < TOML < 命令列)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonSettings {
    /// 要執行的課程；空的代表全部
    pub lessons: Vec<String>,
    pub late_emission_delay_ms: u64,
    pub max_fetch_delay_ms: u64,
    /// 模擬使用者查詢失敗的機率 (0 到 1)
    pub fetch_failure_rate: f64,
    pub action_interval_ms: u64,
    pub action_count: usize,
    pub user_count: u32,
    pub debounce_ms: u64,
    pub search_latency_ms: u64,
    pub replay_buffer_size: usize,
    pub lesson_timeout_ms: u64,
    pub seed: Option<u64>,
    pub monitoring: bool,
}

impl Default for LessonSettings {
    fn default() -> Self {
        Self {
            lessons: Vec::new(),
            late_emission_delay_ms: 1000,
            max_fetch_delay_ms: 2000,
            fetch_failure_rate: 0.0,
            action_interval_ms: 300,
            action_count: 5,
            user_count: 5,
            debounce_ms: 300,
            search_latency_ms: 1000,
            replay_buffer_size: 3,
            lesson_timeout_ms: 60_000,
            seed: None,
            monitoring: false,
        }
    }
}

impl LessonSettings {
    pub fn late_emission_delay(&self) -> Duration {
        Duration::from_millis(self.late_emission_delay_ms)
    }

    pub fn max_fetch_delay(&self) -> Duration {
        Duration::from_millis(self.max_fetch_delay_ms)
    }

    pub fn action_interval(&self) -> Duration {
        Duration::from_millis(self.action_interval_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn search_latency(&self) -> Duration {
        Duration::from_millis(self.search_latency_ms)
    }

    pub fn lesson_timeout(&self) -> Duration {
        Duration::from_millis(self.lesson_timeout_ms)
    }
}

impl Validate for LessonSettings {
    fn validate(&self) -> Result<()> {
        for lesson in &self.lessons {
            validate_non_empty_string("lessons", lesson)?;
        }
        validate_range("action_interval_ms", self.action_interval_ms, 1, u64::MAX)?;
        validate_positive_number("action_count", self.action_count, 1)?;
        validate_range("user_count", self.user_count, 1, 1000)?;
        validate_positive_number("replay_buffer_size", self.replay_buffer_size, 1)?;
        validate_range("lesson_timeout_ms", self.lesson_timeout_ms, 1, u64::MAX)?;
        validate_range("max_fetch_delay_ms", self.max_fetch_delay_ms, 0, 60_000)?;
        validate_range("fetch_failure_rate", self.fetch_failure_rate, 0.0, 1.0)?;
        Ok(())
    }
}
