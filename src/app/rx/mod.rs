//! rxr 的補充
//!
//! 大部分的 Observable、運算子與 Subject 都直接使用 rxr。這裡只放 rxr
//! 沒有提供、但課程需要的部分：
//! - 建立函式 (`of`、`timer`、`interval`、`from_future`、`throw_error`、`merge`)
//! - 運算子 (`enumerate`、`catch_error`、`debounce_time`、`distinct_until_changed`)
//! - 在 async 課程中等待串流結束、被取消時自動取消訂閱的 `drive`

pub mod drive;
pub mod operators;
pub mod sources;

pub use drive::{collect, drive, SubscriptionGuard};
pub use operators::LessonOperators;
pub use sources::{from_future, interval, merge, of, task_subscription, throw_error, timer};
