use crate::domain::model::UserDetails;
use crate::utils::error::{Result, RxError};
use async_trait::async_trait;
use std::sync::Arc;

/// 課程輸出的目的地
pub trait Console: Send + Sync {
    fn line(&self, text: &str);
    fn error_line(&self, text: &str);
}

/// 提供使用者資料的服務 (課程中用來模擬非同步 API)
///
/// rxr 的運算子閉包必須是 `Copy`，所以實作也必須是 `Copy` 的小型值。
#[async_trait]
pub trait UserDirectory: Copy + Send + Sync + 'static {
    async fn fetch_user(&self, user_id: u32) -> std::result::Result<UserDetails, RxError>;
}

/// 一個可以獨立執行的示範課程
#[async_trait]
pub trait Lesson: Send + Sync {
    /// 在命令列上使用的名稱
    fn name(&self) -> &str;

    fn title(&self) -> &str;

    async fn run(&self, console: Arc<dyn Console>) -> Result<()>;
}
