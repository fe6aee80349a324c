use serde::{Deserialize, Serialize};

/// 模擬 API 回傳的使用者資料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub user_id: u32,
    pub user_name: String,
    /// 模擬的回應延遲 (毫秒)
    pub delay: u64,
}

impl UserDetails {
    pub fn new(user_id: u32, delay: u64) -> Self {
        Self {
            user_id,
            user_name: format!("User-{}", user_id),
            delay,
        }
    }
}

/// 單一課程的執行結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonOutcome {
    pub lesson: String,
    pub duration_ms: u64,
}

/// 一次執行的總結
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub lessons: Vec<LessonOutcome>,
    pub total_duration_ms: u64,
}

impl RunReport {
    pub fn lesson_names(&self) -> Vec<&str> {
        self.lessons.iter().map(|o| o.lesson.as_str()).collect()
    }
}
